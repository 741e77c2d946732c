//! Game log
//!
//! Every finished round, in the order it was played. Persisted to
//! LocalStorage as a single JSON array that is rewritten on each append.
//!
//! Older logs used `question`, `expectedAnswer`, `score` and `responseTime`.
//! Those names are still read, but the next append rewrites the whole log
//! with `riddle`, `answer`, `result` and `timer`.

use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::persistence::{self, KeyValueStore};
use crate::platform;
use crate::settings::SessionConfig;

/// Storage key for the log
pub const GAMES_KEY: &str = "riddle-games";

/// Pass/fail verdict for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Solved,
    Unsolved,
}

/// Graduated score for a round, stored as 0, 0.5 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Wrong,
    Partial,
    Correct,
}

impl Score {
    pub fn value(&self) -> f64 {
        match self {
            Score::Wrong => 0.0,
            Score::Partial => 0.5,
            Score::Correct => 1.0,
        }
    }

    pub fn from_value(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Score::Wrong)
        } else if value == 0.5 {
            Some(Score::Partial)
        } else if value == 1.0 {
            Some(Score::Correct)
        } else {
            None
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole scores stay integers so the JSON reads `0`/`1`, not `0.0`/`1.0`
        match self {
            Score::Wrong => serializer.serialize_u8(0),
            Score::Partial => serializer.serialize_f64(0.5),
            Score::Correct => serializer.serialize_u8(1),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Score::from_value(value).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid score {}, expected 0, 0.5 or 1", value))
        })
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameOutcome {
    Verdict(Verdict),
    Score(Score),
}

impl GameOutcome {
    pub fn is_solved(&self) -> bool {
        match self {
            GameOutcome::Verdict(v) => *v == Verdict::Solved,
            GameOutcome::Score(s) => *s == Score::Correct,
        }
    }
}

impl From<Verdict> for GameOutcome {
    fn from(verdict: Verdict) -> Self {
        GameOutcome::Verdict(verdict)
    }
}

impl From<Score> for GameOutcome {
    fn from(score: Score) -> Self {
        GameOutcome::Score(score)
    }
}

fn non_negative_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(secs) if secs < 0.0 || !secs.is_finite() => Err(serde::de::Error::custom(format!(
            "invalid timer {}, expected non-negative seconds",
            secs
        ))),
        secs => Ok(secs),
    }
}

/// One logged round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Day string, see `DateStyle`
    pub date: String,
    pub asker: String,
    pub answerer: String,
    #[serde(alias = "question")]
    pub riddle: String,
    /// Expected answer
    #[serde(alias = "expectedAnswer")]
    pub answer: String,
    /// What the answerer actually said
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_answer: Option<String>,
    #[serde(alias = "score")]
    pub result: GameOutcome,
    #[serde(default)]
    pub attempts: u32,
    /// Seconds taken to answer
    #[serde(
        default,
        alias = "responseTime",
        deserialize_with = "non_negative_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub timer: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GameRecord {
    pub fn new(
        date: impl Into<String>,
        asker: impl Into<String>,
        answerer: impl Into<String>,
        result: impl Into<GameOutcome>,
    ) -> Self {
        Self {
            id: None,
            date: date.into(),
            asker: asker.into(),
            answerer: answerer.into(),
            riddle: String::new(),
            answer: String::new(),
            actual_answer: None,
            result: result.into(),
            attempts: 0,
            timer: None,
            notes: None,
        }
    }

    /// Same day and same asker/answerer, in that order
    pub fn same_round(&self, date: &str, asker: &str, answerer: &str) -> bool {
        self.date == date && self.asker == asker && self.answerer == answerer
    }
}

/// Ordered log of played rounds, written through to storage
pub struct GameLog<S: KeyValueStore> {
    store: Rc<S>,
    config: SessionConfig,
    games: Vec<GameRecord>,
    loaded: bool,
}

impl<S: KeyValueStore> GameLog<S> {
    /// Create a log over `store`. Nothing is read until first access.
    pub fn new(store: Rc<S>, config: SessionConfig) -> Self {
        Self {
            store,
            config,
            games: Vec::new(),
            loaded: false,
        }
    }

    /// Replace the in-memory log with what storage holds
    pub fn reload(&mut self) {
        self.games = persistence::read_json(&*self.store, GAMES_KEY).unwrap_or_default();
        self.loaded = true;
        log::debug!("Loaded {} games", self.games.len());
    }

    // An empty log is re-read as well, so rounds written by another page
    // show up before the first local append.
    fn ensure_loaded(&mut self) {
        if !self.loaded || self.games.is_empty() {
            self.reload();
        }
    }

    fn save(&self) -> bool {
        let saved = persistence::write_json(&*self.store, GAMES_KEY, &self.games);
        if saved {
            log::info!("Game log saved ({} entries)", self.games.len());
        }
        saved
    }

    /// Append a round.
    ///
    /// Returns `false` and leaves the log alone if duplicates are disallowed
    /// and a round with the same date, asker and answerer is already logged,
    /// or if storage refuses the write.
    pub fn add_game(&mut self, record: GameRecord) -> bool {
        self.ensure_loaded();

        if !self.config.allow_duplicate_rounds
            && self.find_game(&record.date, &record.asker, &record.answerer).is_some()
        {
            log::warn!(
                "Round already logged for {} ({} asking {})",
                record.date,
                record.asker,
                record.answerer
            );
            return false;
        }

        self.games.push(record);
        if !self.save() {
            self.games.pop();
            return false;
        }
        true
    }

    /// All rounds in insertion order
    pub fn games(&mut self) -> &[GameRecord] {
        self.ensure_loaded();
        &self.games
    }

    /// Rounds dated today, re-read from storage first
    pub fn games_for_today(&mut self) -> Vec<GameRecord> {
        self.reload();
        let today = platform::today(self.config.date_style);
        self.find_games_by_date(&today)
    }

    /// Rounds played on `date`, in insertion order
    pub fn find_games_by_date(&mut self, date: &str) -> Vec<GameRecord> {
        self.ensure_loaded();
        let found: Vec<GameRecord> =
            self.games.iter().filter(|g| g.date == date).cloned().collect();
        log::debug!("{} games on {}", found.len(), date);
        found
    }

    /// The round on `date` with this asker and answerer
    pub fn find_game(&mut self, date: &str, asker: &str, answerer: &str) -> Option<&GameRecord> {
        self.ensure_loaded();
        self.games.iter().find(|g| g.same_round(date, asker, answerer))
    }

    pub fn len(&mut self) -> usize {
        self.games().len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.games().is_empty()
    }
}
