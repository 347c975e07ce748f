//! Minimalist mode: hide the minimap to declutter the editor

use serde_json::Value;
use tracing::info;

use crate::{
    services::Notifier,
    state::keys,
    store::{Scope, SettingsStore, StoreError},
};

/// Flip `editor.minimap.enabled` and return the new value
pub fn toggle_minimalist(
    settings: &dyn SettingsStore,
    notifier: &Notifier,
) -> Result<bool, StoreError> {
    let result = flip_minimap(settings);
    match &result {
        Ok(enabled) => {
            info!("Minimap enabled: {}", enabled);
            notifier.info("Minimalist mode toggled");
        }
        Err(e) => notifier.error(format!("Could not toggle minimalist mode: {}", e)),
    }
    result
}

fn flip_minimap(settings: &dyn SettingsStore) -> Result<bool, StoreError> {
    // Anything that isn't an explicit `false` counts as enabled, as the host does
    let enabled = !matches!(
        settings.get_or(keys::MINIMAP_ENABLED, Value::Bool(true))?,
        Value::Bool(false)
    );
    settings.set(keys::MINIMAP_ENABLED, Value::Bool(!enabled), Scope::Global)?;
    Ok(!enabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn toggles_back_and_forth_from_default() {
        let store = MemoryStore::new();
        let notifier = Notifier::default();

        assert!(!toggle_minimalist(&store, &notifier).unwrap());
        assert_eq!(
            SettingsStore::get(&store, keys::MINIMAP_ENABLED).unwrap(),
            Some(json!(false))
        );
        assert!(toggle_minimalist(&store, &notifier).unwrap());
    }

    #[test]
    fn rejected_write_notifies_error() {
        let store = MemoryStore::builder()
            .reject_writes_to(keys::MINIMAP_ENABLED)
            .build();
        let notifier = Notifier::default();
        let mut notes = notifier.subscribe();

        assert!(toggle_minimalist(&store, &notifier).is_err());
        assert_eq!(
            notes.try_recv().unwrap().level,
            crate::services::notifier::Level::Error
        );
    }
}
