//! JavaScript bindings
//!
//! Game records cross the boundary as JSON text, in the same shape they are
//! stored in LocalStorage.

use wasm_bindgen::prelude::*;

use crate::games::GameRecord;
use crate::persistence::{KeyValueStore, LocalStorage, MemoryStorage, Result};
use crate::session::RiddleSession;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
}

/// Falls back to an in-memory store when LocalStorage is blocked, so the
/// game still works for the lifetime of the page.
enum PageStorage {
    Local(LocalStorage),
    Memory(MemoryStorage),
}

impl KeyValueStore for PageStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match self {
            PageStorage::Local(s) => s.get_item(key),
            PageStorage::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        match self {
            PageStorage::Local(s) => s.set_item(key, value),
            PageStorage::Memory(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match self {
            PageStorage::Local(s) => s.remove_item(key),
            PageStorage::Memory(s) => s.remove_item(key),
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize games: {}", e);
        "[]".to_string()
    })
}

/// Session handle for the UI. Create one per page.
#[wasm_bindgen]
pub struct RiddleStore {
    session: RiddleSession<PageStorage>,
}

#[wasm_bindgen]
impl RiddleStore {
    #[wasm_bindgen(constructor)]
    pub fn new() -> RiddleStore {
        let storage = match LocalStorage::open() {
            Ok(local) => PageStorage::Local(local),
            Err(e) => {
                log::warn!("{}, keeping state in memory", e);
                PageStorage::Memory(MemoryStorage::new())
            }
        };
        RiddleStore {
            session: RiddleSession::open(storage),
        }
    }

    #[wasm_bindgen(js_name = setPlayers)]
    pub fn set_players(&mut self, names: Vec<String>) -> bool {
        self.session.players().set_players(names.as_slice())
    }

    #[wasm_bindgen(js_name = getPlayers)]
    pub fn get_players(&mut self) -> Option<Vec<String>> {
        self.session.players().players().map(|p| p.to_vec())
    }

    #[wasm_bindgen(js_name = getOriginalPlayers)]
    pub fn get_original_players(&mut self) -> Option<Vec<String>> {
        self.session.players().original_players().map(|p| p.to_vec())
    }

    #[wasm_bindgen(js_name = swapPlayers)]
    pub fn swap_players(&mut self) -> bool {
        self.session.players().swap_players()
    }

    #[wasm_bindgen(js_name = clearPlayers)]
    pub fn clear_players(&mut self) {
        self.session.players().clear_players();
    }

    /// Returns `false` for duplicate rounds and for JSON that isn't a game record
    #[wasm_bindgen(js_name = addGame)]
    pub fn add_game(&mut self, json: &str) -> bool {
        match serde_json::from_str::<GameRecord>(json) {
            Ok(record) => self.session.games().add_game(record),
            Err(e) => {
                log::warn!("Rejected game record: {}", e);
                false
            }
        }
    }

    #[wasm_bindgen(js_name = getGames)]
    pub fn get_games(&mut self) -> String {
        to_json(self.session.games().games())
    }

    #[wasm_bindgen(js_name = getGamesForToday)]
    pub fn get_games_for_today(&mut self) -> String {
        to_json(&self.session.games().games_for_today())
    }

    #[wasm_bindgen(js_name = findGamesByDate)]
    pub fn find_games_by_date(&mut self, date: &str) -> String {
        to_json(&self.session.games().find_games_by_date(date))
    }

    #[wasm_bindgen(js_name = findGame)]
    pub fn find_game(&mut self, date: &str, asker: &str, answerer: &str) -> Option<String> {
        self.session
            .games()
            .find_game(date, asker, answerer)
            .map(to_json)
    }
}

impl Default for RiddleStore {
    fn default() -> Self {
        Self::new()
    }
}
