//! Session configuration
//!
//! Persisted next to the game data in LocalStorage. Switches between the two
//! behaviours the UI has shipped with over time.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore};
use crate::platform::DateStyle;

/// Behaviour switches for a `RiddleSession`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Accept several rounds with the same (date, asker, answerer)
    pub allow_duplicate_rounds: bool,
    /// Overwrite the original-players snapshot on every assignment instead
    /// of only the first one
    pub refresh_original_players_on_every_assignment: bool,
    /// Day string convention for `GameRecord::date`
    pub date_style: DateStyle,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            allow_duplicate_rounds: false,
            refresh_original_players_on_every_assignment: false,
            date_style: DateStyle::Iso,
        }
    }
}

impl SessionConfig {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "riddle-settings";

    /// Lenient config: duplicates allowed, snapshot
    /// refreshed on every assignment
    pub fn permissive() -> Self {
        Self {
            allow_duplicate_rounds: true,
            refresh_original_players_on_every_assignment: true,
            ..Self::default()
        }
    }

    /// Load the config from storage, falling back to defaults
    pub fn load(store: &(impl KeyValueStore + ?Sized)) -> Self {
        match persistence::read_json(store, Self::STORAGE_KEY) {
            Some(config) => {
                log::info!("Loaded session config");
                config
            }
            None => {
                log::info!("Using default session config");
                Self::default()
            }
        }
    }

    /// Save the config to storage
    pub fn save(&self, store: &(impl KeyValueStore + ?Sized)) -> bool {
        let saved = persistence::write_json(store, Self::STORAGE_KEY, self);
        if saved {
            log::info!("Session config saved");
        }
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_load_defaults_when_missing() {
        let store = MemoryStorage::new();
        assert_eq!(SessionConfig::load(&store), SessionConfig::default());
    }

    #[test]
    fn test_save_load() {
        let store = MemoryStorage::new();
        let config = SessionConfig {
            date_style: DateStyle::Locale,
            ..SessionConfig::permissive()
        };
        assert!(config.save(&store));
        assert_eq!(SessionConfig::load(&store), config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let store = MemoryStorage::new();
        store
            .set_item(SessionConfig::STORAGE_KEY, r#"{"allowDuplicateRounds": true}"#)
            .unwrap();
        let config = SessionConfig::load(&store);
        assert!(config.allow_duplicate_rounds);
        assert!(!config.refresh_original_players_on_every_assignment);
        assert_eq!(config.date_style, DateStyle::Iso);
    }

    #[test]
    fn test_malformed_config_uses_defaults() {
        let store = MemoryStorage::new();
        store.set_item(SessionConfig::STORAGE_KEY, "[]").unwrap();
        assert_eq!(SessionConfig::load(&store), SessionConfig::default());
    }
}
