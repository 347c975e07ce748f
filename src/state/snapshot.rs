//! Display presets, their families, and the saved pre-preset values

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Host setting keys touched by the presets and the minimalist toggle
pub mod keys {
    pub const COLOR_THEME: &str = "workbench.colorTheme";
    pub const CURSOR_STYLE: &str = "editor.cursorStyle";
    pub const RENDER_WHITESPACE: &str = "editor.renderWhitespace";
    pub const RENDER_LINE_HIGHLIGHT: &str = "editor.renderLineHighlight";
    pub const INDENT_GUIDES: &str = "editor.guides.indentation";
    pub const FONT_FAMILY: &str = "editor.fontFamily";
    pub const LINE_HEIGHT: &str = "editor.lineHeight";
    pub const LETTER_SPACING: &str = "editor.letterSpacing";
    pub const MINIMAP_ENABLED: &str = "editor.minimap.enabled";
}

/// Group of presets sharing one snapshot/restore slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresetFamily {
    Theme,
    Typography,
}

impl PresetFamily {
    pub const ALL: [PresetFamily; 2] = [PresetFamily::Theme, PresetFamily::Typography];

    /// Durable storage key holding this family's snapshot
    pub fn storage_key(self) -> &'static str {
        match self {
            PresetFamily::Theme => "originalTheme",
            PresetFamily::Typography => "originalEditorSettings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PresetFamily::Theme => "Theme",
            PresetFamily::Typography => "Editor settings",
        }
    }
}

impl fmt::Display for PresetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named bundle of setting writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    HighContrastDark,
    HighContrastLight,
    DyslexiaFriendly,
}

impl Preset {
    pub fn family(self) -> PresetFamily {
        match self {
            Preset::HighContrastDark | Preset::HighContrastLight => PresetFamily::Theme,
            Preset::DyslexiaFriendly => PresetFamily::Typography,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::HighContrastDark => "High Contrast Dark preset",
            Preset::HighContrastLight => "High Contrast Light preset",
            Preset::DyslexiaFriendly => "Dyslexia-friendly mode",
        }
    }

    /// Settings written by this preset, in write order
    pub fn values(self) -> Vec<(&'static str, Value)> {
        match self {
            Preset::HighContrastDark => vec![
                (keys::COLOR_THEME, json!("Default High Contrast")),
                (keys::CURSOR_STYLE, json!("block")),
                (keys::RENDER_WHITESPACE, json!("boundary")),
                (keys::INDENT_GUIDES, json!(true)),
            ],
            Preset::HighContrastLight => vec![
                (keys::COLOR_THEME, json!("Default High Contrast Light")),
                (keys::CURSOR_STYLE, json!("block")),
                (keys::RENDER_LINE_HIGHLIGHT, json!("all")),
            ],
            Preset::DyslexiaFriendly => vec![
                (keys::FONT_FAMILY, json!("Lexend, OpenDyslexic, monospace")),
                (keys::LINE_HEIGHT, json!(26)),
                (keys::LETTER_SPACING, json!(0.5)),
            ],
        }
    }
}

/// Last-known-good values for one family, captured before a preset wrote over them.
///
/// A `null` entry records a key that was unset at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSnapshot {
    pub family: PresetFamily,
    pub values: BTreeMap<String, Value>,
}

impl PresetSnapshot {
    pub fn new(family: PresetFamily) -> Self {
        Self {
            family,
            values: BTreeMap::new(),
        }
    }

    /// Record `value` for `key` unless the key was already captured.
    /// Returns whether the snapshot changed.
    pub fn capture(&mut self, key: &str, value: Option<Value>) -> bool {
        if self.values.contains_key(key) {
            return false;
        }
        self.values
            .insert(key.to_string(), value.unwrap_or(Value::Null));
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Durable representation: a flat object of key to value
    pub fn to_stored(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Parse a stored record. `null` and non-object values mean "no snapshot".
    pub fn from_stored(family: PresetFamily, stored: Option<Value>) -> Option<Self> {
        match stored? {
            Value::Object(map) => Some(Self {
                family,
                values: map.into_iter().collect(),
            }),
            _ => None,
        }
    }
}
