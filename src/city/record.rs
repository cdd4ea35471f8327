//! City record and key normalization

use std::fmt;

use serde::{Deserialize, Serialize};

/// A city and its population, exactly as persisted in the document store.
///
/// `city` keeps the display casing of the most recent write; the document
/// id is derived from it with [`normalize_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub city: String,
    pub population: u64,
}

impl CityRecord {
    pub fn new(city: impl Into<String>, population: u64) -> Self {
        Self {
            city: city.into(),
            population,
        }
    }

    /// Document id under which this record is stored
    pub fn key(&self) -> String {
        normalize_key(&self.city)
    }
}

/// Normalize a city name into its document id: trimmed and lowercased.
///
/// "Paris", " paris " and "PARIS" all map to the same record.
pub fn normalize_key(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Whether a write inserted a new document or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOutcome::Created => "created",
            WriteOutcome::Updated => "updated",
        }
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
