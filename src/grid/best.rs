use std::collections::HashSet;

use tracing::debug;

use super::aggregate::aggregate;
use super::coords::{to_key, Grid};
use super::types::{Availability, BestSlot, Responses};

/// Finds every cell tied at the highest availability count.
///
/// Scans the whole grid in scan order; returns an empty list when nobody is
/// available anywhere.
pub fn find_best(grid: &Grid, responses: &Responses) -> Vec<BestSlot> {
    let counts: Vec<(&str, &str, usize)> = grid
        .cells()
        .map(|(column, time)| (column, time, aggregate(responses, column, time).count))
        .collect();

    let max = counts.iter().map(|(_, _, count)| *count).max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }

    let best: Vec<BestSlot> = counts
        .into_iter()
        .filter(|(_, _, count)| *count == max)
        .map(|(column, time, count)| BestSlot {
            column: column.to_string(),
            time: time.to_string(),
            count,
        })
        .collect();

    debug!(max, tied = best.len(), "Best slots found");
    best
}

/// Restricts every respondent's map to the keys of the best slots
pub fn filter_to_best(responses: &Responses, best: &[BestSlot]) -> Responses {
    let best_keys: HashSet<String> = best.iter().map(|b| to_key(&b.column, &b.time)).collect();

    responses
        .iter()
        .map(|(name, availability)| {
            let filtered: Availability = availability
                .entries()
                .filter(|(key, _)| best_keys.contains(*key))
                .map(|(key, value)| (key.to_string(), value))
                .collect();
            (name.clone(), filtered)
        })
        .collect()
}
