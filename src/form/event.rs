use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{GridError, Result};
use crate::grid::coords::KEY_SEPARATOR;
use crate::grid::slot_utils::{generate_slots, is_slot_aligned};
use crate::grid::types::{EventConfig, EventMode, TimeRange, WEEKDAY_NAMES};

/// Event creation request from frontend
#[derive(Debug, Clone, Deserialize)]
pub struct EventRequest {
    pub name: String,
    pub mode: EventMode,
    pub columns: Vec<String>,
    pub start: String,
    pub end: String,
}

fn invalid(message: impl Into<String>) -> GridError {
    GridError::InvalidEvent(message.into())
}

/// Validates an event creation request and builds its configuration
pub fn validate_event(req: &EventRequest) -> Result<EventConfig> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(invalid("Event name is required"));
    }

    if req.columns.is_empty() {
        return Err(invalid("At least one date or weekday must be selected"));
    }

    let mut seen = HashSet::new();
    for column in &req.columns {
        if !seen.insert(column.as_str()) {
            return Err(invalid(format!("Duplicate column: {}", column)));
        }
        if column.contains(KEY_SEPARATOR) {
            return Err(invalid(format!("Column may not contain '{}': {}", KEY_SEPARATOR, column)));
        }
        match req.mode {
            EventMode::Specific => {
                NaiveDate::parse_from_str(column, "%Y-%m-%d")
                    .map_err(|_| invalid(format!("Invalid date: {}", column)))?;
            }
            EventMode::Weekly => {
                if !WEEKDAY_NAMES.contains(&column.as_str()) {
                    return Err(invalid(format!("Invalid weekday: {}", column)));
                }
            }
        }
    }

    for time in [&req.start, &req.end] {
        if !is_slot_aligned(time) {
            return Err(invalid(format!("Time must be on a half hour: {}", time)));
        }
    }
    // Surfaces InvalidTimeRange for start >= end
    generate_slots(&req.start, &req.end)?;

    Ok(EventConfig {
        name: name.to_string(),
        mode: req.mode,
        columns: req.columns.clone(),
        time_range: TimeRange {
            start: req.start.clone(),
            end: req.end.clone(),
        },
    })
}
