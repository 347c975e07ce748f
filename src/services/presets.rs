//! Apply display presets and restore the settings they replaced

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    services::Notifier,
    state::{Preset, PresetFamily, PresetSnapshot},
    store::{DurableStore, Scope, SettingsStore, StoreError},
};

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to read '{key}': {source}")]
    Read { key: String, source: StoreError },
    #[error("failed to save {family} snapshot: {source}")]
    Snapshot {
        family: PresetFamily,
        source: StoreError,
    },
    #[error("failed to write '{key}': {source}")]
    Write { key: String, source: StoreError },
    #[error("preset state lock poisoned")]
    Poisoned,
}

/// Applies presets to the settings store, keeping at most one snapshot per
/// family of the values they overwrote.
pub struct SettingsPresetManager {
    settings: Arc<dyn SettingsStore>,
    durable: Arc<dyn DurableStore>,
    notifier: Notifier,
    snapshots: Mutex<HashMap<PresetFamily, PresetSnapshot>>,
}

impl SettingsPresetManager {
    /// Create a manager, reloading any snapshot left by a previous run
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        durable: Arc<dyn DurableStore>,
        notifier: Notifier,
    ) -> Result<Self, StoreError> {
        let mut snapshots = HashMap::new();
        for family in PresetFamily::ALL {
            let stored = durable.get(family.storage_key())?;
            if let Some(snapshot) = PresetSnapshot::from_stored(family, stored) {
                info!(
                    "Loaded {} snapshot with {} keys",
                    family,
                    snapshot.values.len()
                );
                snapshots.insert(family, snapshot);
            }
        }

        Ok(Self {
            settings,
            durable,
            notifier,
            snapshots: Mutex::new(snapshots),
        })
    }

    /// Current snapshot for `family`, if one is live
    pub fn snapshot(&self, family: PresetFamily) -> Option<PresetSnapshot> {
        self.lock().ok().and_then(|s| s.get(&family).cloned())
    }

    pub fn has_snapshot(&self, family: PresetFamily) -> bool {
        self.snapshot(family).is_some()
    }

    /// Write `preset`'s values, capturing the values they replace first.
    ///
    /// Keys already captured in the family's live snapshot are never captured
    /// again, so repeated applies cannot record preset values as originals.
    pub fn apply_preset(&self, preset: Preset) -> Result<(), PresetError> {
        let result = self.try_apply(preset);
        match &result {
            Ok(()) => self.notifier.info(format!("{} applied", preset.label())),
            Err(e) => self
                .notifier
                .error(format!("Could not apply {}: {}", preset.label(), e)),
        }
        result
    }

    /// Write the family's snapshot back and clear it.
    /// Returns `Ok(false)` without side effects when no snapshot is live.
    pub fn restore_preset(&self, family: PresetFamily) -> Result<bool, PresetError> {
        let result = self.try_restore(family);
        match &result {
            Ok(true) => self.notifier.info(format!("{} restored", family)),
            Ok(false) => debug!("No {} snapshot to restore", family),
            Err(e) => self
                .notifier
                .error(format!("Could not restore {}: {}", family, e)),
        }
        result
    }

    fn try_apply(&self, preset: Preset) -> Result<(), PresetError> {
        let family = preset.family();
        let values = preset.values();
        let mut snapshots = self.lock()?;

        let mut snapshot = snapshots
            .get(&family)
            .cloned()
            .unwrap_or_else(|| PresetSnapshot::new(family));

        let mut captured = 0;
        for (key, _) in &values {
            if snapshot.contains(key) {
                continue;
            }
            let current = self.settings.get(key).map_err(|source| PresetError::Read {
                key: key.to_string(),
                source,
            })?;
            snapshot.capture(key, current);
            captured += 1;
        }

        if captured > 0 {
            self.durable
                .set(family.storage_key(), Some(snapshot.to_stored()))
                .map_err(|source| PresetError::Snapshot { family, source })?;
            debug!("Captured {} original values for {}", captured, family);
            snapshots.insert(family, snapshot);
        }

        for (key, value) in values {
            self.settings
                .set(key, value, Scope::Global)
                .map_err(|source| PresetError::Write {
                    key: key.to_string(),
                    source,
                })?;
        }

        info!("Applied {:?}", preset);
        Ok(())
    }

    fn try_restore(&self, family: PresetFamily) -> Result<bool, PresetError> {
        let mut snapshots = self.lock()?;
        let Some(snapshot) = snapshots.get(&family) else {
            return Ok(false);
        };

        for (key, value) in &snapshot.values {
            self.settings
                .set(key, value.clone(), Scope::Global)
                .map_err(|source| PresetError::Write {
                    key: key.clone(),
                    source,
                })?;
        }

        // Only drop the snapshot once every value is back, so a failed
        // restore can be retried.
        self.durable
            .set(family.storage_key(), None)
            .map_err(|source| PresetError::Snapshot { family, source })?;
        snapshots.remove(&family);

        info!("Restored {}", family);
        Ok(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PresetFamily, PresetSnapshot>>, PresetError> {
        self.snapshots.lock().map_err(|_| PresetError::Poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::notifier::Level,
        state::keys,
        store::{MemoryStore, MemoryStoreBuilder},
    };
    use serde_json::{json, Value};
    use std::collections::BTreeMap;

    struct Fixture {
        settings: Arc<MemoryStore>,
        durable: Arc<MemoryStore>,
        notifier: Notifier,
        manager: SettingsPresetManager,
    }

    fn base_settings() -> MemoryStoreBuilder {
        MemoryStore::builder()
            .value(keys::COLOR_THEME, json!("Monokai"))
            .value(keys::CURSOR_STYLE, json!("line"))
            .value(keys::FONT_FAMILY, json!("Fira Code"))
            .value(keys::LINE_HEIGHT, json!(20))
    }

    fn fixture() -> Fixture {
        fixture_with(base_settings().build(), MemoryStore::new())
    }

    fn fixture_with(settings: MemoryStore, durable: MemoryStore) -> Fixture {
        let settings = Arc::new(settings);
        let durable = Arc::new(durable);
        let notifier = Notifier::default();
        let manager = SettingsPresetManager::new(
            settings.clone(),
            durable.clone(),
            notifier.clone(),
        )
        .unwrap();
        Fixture {
            settings,
            durable,
            notifier,
            manager,
        }
    }

    #[test]
    fn second_apply_keeps_first_snapshot() {
        let f = fixture();
        f.manager.apply_preset(Preset::HighContrastDark).unwrap();
        let first = f.manager.snapshot(PresetFamily::Theme).unwrap();

        f.manager.apply_preset(Preset::HighContrastDark).unwrap();
        let second = f.manager.snapshot(PresetFamily::Theme).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.values[keys::COLOR_THEME], json!("Monokai"));
    }

    #[test]
    fn restore_returns_touched_keys_to_original() {
        let f = fixture();
        let before = f.settings.entries();

        f.manager.apply_preset(Preset::DyslexiaFriendly).unwrap();
        assert_eq!(
            SettingsStore::get(&*f.settings, keys::LINE_HEIGHT).unwrap(),
            Some(json!(26))
        );

        assert!(f.manager.restore_preset(PresetFamily::Typography).unwrap());
        assert_eq!(f.settings.entries(), before);
        assert!(!f.manager.has_snapshot(PresetFamily::Typography));
        assert_eq!(
            DurableStore::get(&*f.durable, "originalEditorSettings").unwrap(),
            None
        );
    }

    #[test]
    fn restore_without_snapshot_is_silent_noop() {
        let f = fixture();
        let mut notes = f.notifier.subscribe();
        let before = f.settings.entries();

        assert!(!f.manager.restore_preset(PresetFamily::Theme).unwrap());
        assert_eq!(f.settings.entries(), before);
        assert!(!f.manager.has_snapshot(PresetFamily::Theme));
        assert!(notes.try_recv().is_err());
    }

    #[test]
    fn apply_after_restore_captures_fresh_values() {
        let f = fixture();
        f.manager.apply_preset(Preset::HighContrastDark).unwrap();
        f.manager.restore_preset(PresetFamily::Theme).unwrap();

        SettingsStore::set(&*f.settings, keys::COLOR_THEME, json!("Solarized"), Scope::Global)
            .unwrap();
        f.manager.apply_preset(Preset::HighContrastLight).unwrap();

        let snapshot = f.manager.snapshot(PresetFamily::Theme).unwrap();
        assert_eq!(snapshot.values[keys::COLOR_THEME], json!("Solarized"));
    }

    #[test]
    fn mixed_theme_presets_restore_every_touched_key() {
        let f = fixture();
        let before = f.settings.entries();

        f.manager.apply_preset(Preset::HighContrastDark).unwrap();
        f.manager.apply_preset(Preset::HighContrastLight).unwrap();
        assert_eq!(
            SettingsStore::get(&*f.settings, keys::RENDER_LINE_HIGHLIGHT).unwrap(),
            Some(json!("all"))
        );

        f.manager.restore_preset(PresetFamily::Theme).unwrap();
        assert_eq!(f.settings.entries(), before);
    }

    #[test]
    fn families_are_independent() {
        let f = fixture();
        f.manager.apply_preset(Preset::HighContrastDark).unwrap();
        f.manager.apply_preset(Preset::DyslexiaFriendly).unwrap();

        f.manager.restore_preset(PresetFamily::Theme).unwrap();
        assert!(f.manager.has_snapshot(PresetFamily::Typography));
        assert_eq!(
            SettingsStore::get(&*f.settings, keys::FONT_FAMILY).unwrap(),
            Some(json!("Lexend, OpenDyslexic, monospace"))
        );
    }

    #[test]
    fn snapshot_survives_restart() {
        let f = fixture();
        f.manager.apply_preset(Preset::DyslexiaFriendly).unwrap();

        let reopened =
            SettingsPresetManager::new(f.settings.clone(), f.durable.clone(), Notifier::default())
                .unwrap();
        assert_eq!(
            reopened.snapshot(PresetFamily::Typography),
            f.manager.snapshot(PresetFamily::Typography)
        );

        reopened.restore_preset(PresetFamily::Typography).unwrap();
        assert_eq!(
            SettingsStore::get(&*f.settings, keys::FONT_FAMILY).unwrap(),
            Some(json!("Fira Code"))
        );
    }

    #[test]
    fn null_sentinel_in_durable_store_means_no_snapshot() {
        let durable = Arc::new(MemoryStore::with_values([("originalTheme", Value::Null)]));
        let manager = SettingsPresetManager::new(
            Arc::new(MemoryStore::new()),
            durable,
            Notifier::default(),
        )
        .unwrap();
        assert!(!manager.has_snapshot(PresetFamily::Theme));
    }

    #[test]
    fn write_failure_is_reported() {
        let f = fixture_with(
            base_settings()
                .reject_writes_to(keys::LETTER_SPACING)
                .build(),
            MemoryStore::new(),
        );
        let mut notes = f.notifier.subscribe();

        let err = f.manager.apply_preset(Preset::DyslexiaFriendly).unwrap_err();
        assert!(matches!(err, PresetError::Write { ref key, .. } if key == keys::LETTER_SPACING));

        let note = notes.try_recv().unwrap();
        assert_eq!(note.level, Level::Error);

        // the snapshot was persisted before the failing write
        let snapshot = f.manager.snapshot(PresetFamily::Typography).unwrap();
        assert_eq!(snapshot.values[keys::FONT_FAMILY], json!("Fira Code"));
        assert!(DurableStore::get(&*f.durable, "originalEditorSettings")
            .unwrap()
            .is_some());
    }

    #[test]
    fn failed_snapshot_persist_leaves_settings_untouched() {
        let f = fixture_with(
            base_settings().build(),
            MemoryStore::builder()
                .reject_writes_to("originalTheme")
                .build(),
        );
        let before: BTreeMap<String, Value> = f.settings.entries();

        let err = f.manager.apply_preset(Preset::HighContrastDark).unwrap_err();
        assert!(matches!(err, PresetError::Snapshot { family: PresetFamily::Theme, .. }));
        assert_eq!(f.settings.entries(), before);
        assert!(!f.manager.has_snapshot(PresetFamily::Theme));
    }
}
