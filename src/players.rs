//! Player session
//!
//! The two names currently at the table, plus a snapshot of the pair as it
//! was first assigned. The game swaps asker/answerer between rounds, so the
//! snapshot is what the UI uses to show a stable "Alice vs Bob" header.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, Slot};
use crate::settings::SessionConfig;

/// Storage key for the current pair
pub const PLAYERS_KEY: &str = "riddle-players";
/// Storage key for the original-players snapshot
pub const ORIGINAL_PLAYERS_KEY: &str = "riddle-original-players";

/// Ordered pair of player names, stored as a two-element JSON array
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPair(pub String, pub String);

impl PlayerPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self(first.into(), second.into())
    }

    /// Build a pair from user input: exactly two names, none blank
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        match names {
            [first, second] => {
                let (first, second) = (first.as_ref(), second.as_ref());
                if first.trim().is_empty() || second.trim().is_empty() {
                    None
                } else {
                    Some(Self::new(first, second))
                }
            }
            _ => None,
        }
    }

    pub fn first(&self) -> &str {
        &self.0
    }

    pub fn second(&self) -> &str {
        &self.1
    }

    /// The same players in the opposite order
    pub fn swapped(&self) -> Self {
        Self(self.1.clone(), self.0.clone())
    }

    pub fn to_vec(&self) -> Vec<String> {
        vec![self.0.clone(), self.1.clone()]
    }
}

/// Current players and their original assignment, written through to storage
pub struct PlayerSession<S: KeyValueStore> {
    store: Rc<S>,
    config: SessionConfig,
    players: Slot<Option<PlayerPair>>,
    original: Slot<Option<PlayerPair>>,
}

impl<S: KeyValueStore> PlayerSession<S> {
    /// Create a session over `store`. Nothing is read until first access.
    pub fn new(store: Rc<S>, config: SessionConfig) -> Self {
        Self {
            store,
            config,
            players: Slot::Unloaded,
            original: Slot::Unloaded,
        }
    }

    /// Set the current players from user input.
    ///
    /// Requires exactly two names, none empty after trimming; otherwise logs
    /// and returns `false` without touching any state. Names are stored as
    /// given.
    pub fn set_players<N: AsRef<str>>(&mut self, names: &[N]) -> bool {
        match PlayerPair::parse(names) {
            Some(pair) => self.set_players_unchecked(pair),
            None => {
                log::warn!(
                    "Rejected player names: expected two non-empty names, got {:?}",
                    names.iter().map(|n| n.as_ref()).collect::<Vec<_>>()
                );
                false
            }
        }
    }

    /// Set the current players without validating them.
    ///
    /// Returns `false` and keeps the previous pair if storage refuses the
    /// write.
    pub fn set_players_unchecked(&mut self, pair: PlayerPair) -> bool {
        if !persistence::write_json(&*self.store, PLAYERS_KEY, &pair) {
            return false;
        }

        // Snapshot goes to storage only if the key is empty there, not merely
        // unloaded in memory
        let refresh = self.config.refresh_original_players_on_every_assignment;
        let snapshot_missing = matches!(self.store.get_item(ORIGINAL_PLAYERS_KEY), Ok(None));
        if refresh || snapshot_missing {
            if persistence::write_json(&*self.store, ORIGINAL_PLAYERS_KEY, &pair) {
                self.original.set(Some(pair.clone()));
            } else {
                // Whatever storage still holds wins on the next read
                self.original.reset();
            }
        }

        log::info!("Players set: {} and {}", pair.first(), pair.second());
        self.players.set(Some(pair));
        true
    }

    /// Current players, read from storage on first access
    pub fn players(&mut self) -> Option<&PlayerPair> {
        let store = &self.store;
        self.players
            .get_or_load(|| persistence::read_json(&**store, PLAYERS_KEY))
            .as_ref()
    }

    /// Players as first assigned, read from storage on first access
    pub fn original_players(&mut self) -> Option<&PlayerPair> {
        let store = &self.store;
        self.original
            .get_or_load(|| persistence::read_json(&**store, ORIGINAL_PLAYERS_KEY))
            .as_ref()
    }

    /// Swap the order of the current players, keeping the snapshot as is.
    /// Returns `false` if no players are set or the write fails.
    pub fn swap_players(&mut self) -> bool {
        let Some(swapped) = self.players().map(PlayerPair::swapped) else {
            return false;
        };
        if !persistence::write_json(&*self.store, PLAYERS_KEY, &swapped) {
            return false;
        }
        self.players.set(Some(swapped));
        true
    }

    /// Forget both the current players and the snapshot
    pub fn clear_players(&mut self) {
        persistence::remove(&*self.store, PLAYERS_KEY);
        persistence::remove(&*self.store, ORIGINAL_PLAYERS_KEY);
        self.players.set(None);
        self.original.set(None);
        log::info!("Players cleared");
    }
}
