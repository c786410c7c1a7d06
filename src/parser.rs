use csv::Reader;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::grid::coords::{to_key, Grid};
use crate::grid::types::{Availability, Responses};

/// Parses a comma-separated list of times into the slot keys of one column.
/// Times outside the grid are skipped.
fn parse_time_slots(grid: &Grid, column: &str, time_string: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for time_part in time_string.split(',') {
        let time = time_part.trim();
        if time.is_empty() {
            continue;
        }
        let key = to_key(column, time);
        if grid.contains_key(&key) {
            keys.push(key);
        } else {
            warn!(column, time, "Skipping time outside the event grid");
        }
    }
    keys
}

fn is_resubmission(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower.contains("re-submission") || lower.contains("resubmission")
}

/// Loads responses from a CSV file. See [`read_responses`].
pub fn load_responses<P: AsRef<Path>>(csv_path: P, grid: &Grid) -> Result<Responses> {
    let reader = Reader::from_path(csv_path)?;
    read_responses(reader, grid)
}

/// Reads responses with header `respondent,column,times[,submission]`.
///
/// Several rows for the same respondent merge. A row marked as a
/// re-submission replaces everything read earlier for that respondent;
/// further re-submission rows then merge into the replacement.
pub fn read_responses<R: Read>(mut reader: Reader<R>, grid: &Grid) -> Result<Responses> {
    let headers = reader.headers()?.clone();
    let respondent_col = headers.iter().position(|h| h.trim().eq_ignore_ascii_case("respondent")).unwrap_or(0);
    let column_col = headers.iter().position(|h| h.trim().eq_ignore_ascii_case("column")).unwrap_or(1);
    let times_col = headers.iter().position(|h| h.trim().eq_ignore_ascii_case("times")).unwrap_or(2);
    let submission_col = headers.iter().position(|h| h.trim().eq_ignore_ascii_case("submission"));

    let mut responses = Responses::new();
    let mut resubmitted: HashSet<String> = HashSet::new();

    for result in reader.records() {
        let record = result?;

        let name = record.get(respondent_col).unwrap_or("").trim().to_string();
        let column = record.get(column_col).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        if !column.is_empty() && !grid.columns().iter().any(|c| c == column) {
            warn!(respondent = %name, column, "Skipping unknown column");
            continue;
        }

        let resubmission = submission_col
            .and_then(|col| record.get(col))
            .is_some_and(is_resubmission);
        if resubmission && resubmitted.insert(name.clone()) {
            responses.insert(name.clone(), Availability::new());
        }

        let availability = responses.entry(name).or_default();
        if column.is_empty() {
            continue;
        }
        let times = record.get(times_col).unwrap_or("");
        for key in parse_time_slots(grid, column, times) {
            availability.set(key, true);
        }
    }

    info!(respondents = responses.len(), "Loaded responses (resubmissions merged)");
    Ok(responses)
}
