//! Canonical slot-key addressing.
//!
//! All slot keys are built and parsed here; nothing else in the crate
//! concatenates or splits keys by hand.

use serde::Serialize;

use crate::error::{GridError, Result};
use super::slot_utils::generate_slots;
use super::types::EventConfig;

/// Separator between the column id and the time in a slot key
pub const KEY_SEPARATOR: char = '_';

/// Builds the slot key for a cell: `<columnId>_<HH:MM>`
pub fn to_key(column: &str, time: &str) -> String {
    format!("{}{}{}", column, KEY_SEPARATOR, time)
}

/// Splits a key into `(column, time)` on the last separator
pub fn split_key(key: &str) -> Result<(&str, &str)> {
    key.rsplit_once(KEY_SEPARATOR)
        .ok_or_else(|| GridError::KeyResolution(key.to_string()))
}

/// The fixed `columns × time_slots` grid of one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    columns: Vec<String>,
    time_slots: Vec<String>,
}

impl Grid {
    pub fn new(columns: Vec<String>, time_slots: Vec<String>) -> Self {
        Self { columns, time_slots }
    }

    /// Derives the grid from an event configuration
    pub fn from_config(config: &EventConfig) -> Result<Self> {
        let time_slots = generate_slots(&config.time_range.start, &config.time_range.end)?;
        Ok(Self::new(config.columns.clone(), time_slots))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn time_slots(&self) -> &[String] {
        &self.time_slots
    }

    pub fn cell_count(&self) -> usize {
        self.columns.len() * self.time_slots.len()
    }

    /// Resolves a key to `(column_index, time_index)`
    pub fn to_coordinates(&self, key: &str) -> Result<(usize, usize)> {
        let (column, time) = split_key(key)?;
        let column_index = self.columns.iter().position(|c| c == column);
        let time_index = self.time_slots.iter().position(|t| t == time);
        match (column_index, time_index) {
            (Some(c), Some(t)) => Ok((c, t)),
            _ => Err(GridError::KeyResolution(key.to_string())),
        }
    }

    /// Key of the cell at `(column_index, time_index)`, if inside the grid
    pub fn key_at(&self, column_index: usize, time_index: usize) -> Option<String> {
        let column = self.columns.get(column_index)?;
        let time = self.time_slots.get(time_index)?;
        Some(to_key(column, time))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.to_coordinates(key).is_ok()
    }

    /// Every `(column, time)` pair in scan order: columns outer, time inner
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().flat_map(move |column| {
            self.time_slots
                .iter()
                .map(move |time| (column.as_str(), time.as_str()))
        })
    }

    /// Every slot key in scan order
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.cells().map(|(column, time)| to_key(column, time))
    }
}
