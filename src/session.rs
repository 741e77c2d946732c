//! Session state shared by the whole UI
//!
//! Built once at startup and handed to whatever needs players or history.

use std::rc::Rc;

use crate::games::GameLog;
use crate::persistence::KeyValueStore;
use crate::players::PlayerSession;
use crate::settings::SessionConfig;

/// Players and game history over one shared store
pub struct RiddleSession<S: KeyValueStore> {
    store: Rc<S>,
    config: SessionConfig,
    players: PlayerSession<S>,
    games: GameLog<S>,
}

impl<S: KeyValueStore> RiddleSession<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        let store = Rc::new(store);
        Self {
            players: PlayerSession::new(store.clone(), config),
            games: GameLog::new(store.clone(), config),
            store,
            config,
        }
    }

    /// Create a session using the config saved in `store`
    pub fn open(store: S) -> Self {
        let config = SessionConfig::load(&store);
        Self::new(store, config)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn players(&mut self) -> &mut PlayerSession<S> {
        &mut self.players
    }

    pub fn games(&mut self) -> &mut GameLog<S> {
        &mut self.games
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{GameRecord, Verdict};
    use crate::persistence::MemoryStorage;
    use crate::players::PlayerPair;
    use crate::platform::DateStyle;

    #[test]
    fn test_players_then_games() {
        let mut session = RiddleSession::new(MemoryStorage::new(), SessionConfig::default());
        assert!(session.players().set_players(&["Alice", "Bob"]));

        let pair = session.players().players().cloned().unwrap();
        let round = GameRecord::new("2024-01-01", pair.first(), pair.second(), Verdict::Solved);
        assert!(session.games().add_game(round.clone()));

        assert!(session.players().swap_players());
        assert_eq!(session.players().players(), Some(&PlayerPair::new("Bob", "Alice")));
        assert_eq!(session.games().games(), &[round]);
    }

    #[test]
    fn test_open_uses_saved_config() {
        let store = MemoryStorage::new();
        let config = SessionConfig {
            allow_duplicate_rounds: true,
            date_style: DateStyle::Locale,
            ..SessionConfig::default()
        };
        config.save(&store);

        let mut session = RiddleSession::open(store);
        assert_eq!(session.config(), &config);

        let round = GameRecord::new("Mon Jan 01 2024", "Alice", "Bob", Verdict::Solved);
        assert!(session.games().add_game(round.clone()));
        assert!(session.games().add_game(round));
        assert_eq!(session.games().len(), 2);
    }

    #[test]
    fn test_components_share_store() {
        let mut session = RiddleSession::new(MemoryStorage::new(), SessionConfig::default());
        session.players().set_players(&["Alice", "Bob"]);
        session
            .games()
            .add_game(GameRecord::new("2024-01-01", "Alice", "Bob", Verdict::Unsolved));

        // players, original players, games
        assert_eq!(session.store().len(), 3);
    }
}
