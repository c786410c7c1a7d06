use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Weekday column identifiers accepted in weekly mode, in calendar order
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// How the columns of an event are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    /// Columns are ISO calendar dates (`2024-06-03`)
    Specific,
    /// Columns are weekday names (`Monday`)
    Weekly,
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventMode::Specific => write!(f, "specific"),
            EventMode::Weekly => write!(f, "weekly"),
        }
    }
}

/// Daily time range as `HH:MM` strings, half-open `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// Event configuration, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: String,
    pub mode: EventMode,
    pub columns: Vec<String>,
    #[serde(rename = "timeRange")]
    pub time_range: TimeRange,
}

/// One respondent's sparse availability map: slot key -> present.
/// Absent keys read as unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Availability(BTreeMap<String, bool>);

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_available(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), value);
    }

    /// Raw lookup, distinguishing an explicit `false` from an absent key
    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }

    /// Keys currently marked available, in key order
    pub fn selected_keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter(|(_, v)| **v).map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops explicit `false` entries; the result reads identically
    pub fn compact(&self) -> Availability {
        Availability(
            self.0
                .iter()
                .filter(|(_, v)| **v)
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        )
    }
}

impl FromIterator<(String, bool)> for Availability {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Availability(iter.into_iter().collect())
    }
}

// A respondent stored without a map (`null`) reads as available nowhere.
impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Option::<BTreeMap<String, bool>>::deserialize(deserializer)?;
        Ok(Availability(map.unwrap_or_default()))
    }
}

/// All respondents' availability, keyed by display name (case-sensitive)
pub type Responses = BTreeMap<String, Availability>;

/// Aggregate statistics for one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStats {
    pub count: usize,
    pub available_users: Vec<String>,
}

/// A cell tied for the maximum availability count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSlot {
    pub column: String,
    pub time: String,
    pub count: usize,
}

/// The single slot chosen while scheduling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenSlot {
    pub column: String,
    pub time: String,
}
