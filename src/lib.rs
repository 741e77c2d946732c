//! Riddle Log - state layer for a two-player riddle game
//!
//! Core modules:
//! - `players`: who is playing, plus the original assignment
//! - `games`: log of played rounds
//! - `session`: the shared session object the UI holds
//! - `persistence`: LocalStorage and friends
//! - `platform`: browser/native clock differences
//! - `settings`: behaviour switches

pub mod games;
pub mod persistence;
pub mod platform;
pub mod players;
pub mod session;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use games::{GameLog, GameOutcome, GameRecord, Score, Verdict};
pub use persistence::{KeyValueStore, MemoryStorage, StorageError};
pub use platform::DateStyle;
pub use players::{PlayerPair, PlayerSession};
pub use session::RiddleSession;
pub use settings::SessionConfig;
