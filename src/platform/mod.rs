//! Platform abstraction layer
//!
//! Handles browser/native differences for the wall clock: the game log keys
//! rounds by a day string, and "today" has to be computed the same way the
//! UI wrote it.

use serde::{Deserialize, Serialize};

/// How a calendar day is written into `GameRecord::date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DateStyle {
    /// `2024-01-01`, taken from the UTC clock (JS `toISOString()` date part)
    #[default]
    Iso,
    /// `Mon Jan 01 2024`, taken from the local clock (JS `toDateString()`)
    Locale,
}

impl DateStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateStyle::Iso => "iso",
            DateStyle::Locale => "locale",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "iso" => Some(DateStyle::Iso),
            "locale" | "local" => Some(DateStyle::Locale),
            _ => None,
        }
    }
}

/// Today's day string in the given style
#[cfg(target_arch = "wasm32")]
pub fn today(style: DateStyle) -> String {
    let now = js_sys::Date::new_0();
    match style {
        DateStyle::Iso => {
            let iso = String::from(now.to_iso_string());
            iso.split('T').next().unwrap_or_default().to_string()
        }
        DateStyle::Locale => String::from(now.to_date_string()),
    }
}

/// Today's day string in the given style
#[cfg(not(target_arch = "wasm32"))]
pub fn today(style: DateStyle) -> String {
    match style {
        DateStyle::Iso => day_string(style, chrono::Utc::now().date_naive()),
        DateStyle::Locale => day_string(style, chrono::Local::now().date_naive()),
    }
}

/// Format a calendar day in the given style
#[cfg(not(target_arch = "wasm32"))]
pub fn day_string(style: DateStyle, date: chrono::NaiveDate) -> String {
    match style {
        DateStyle::Iso => date.format("%Y-%m-%d").to_string(),
        DateStyle::Locale => date.format("%a %b %d %Y").to_string(),
    }
}
