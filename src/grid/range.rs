use crate::error::Result;
use super::coords::Grid;
use super::types::Availability;

/// How a gesture writes into an availability map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Click without drag: flip the targeted key
    Toggle,
    /// Drag: write the same value to every key
    Paint(bool),
}

impl SelectionMode {
    /// Paint mode for a drag starting on a cell in state `start_selected`.
    /// Starting on an unselected cell selects, starting on a selected one deselects.
    pub fn paint_from(start_selected: bool) -> Self {
        SelectionMode::Paint(!start_selected)
    }
}

/// Inclusive rectangle of keys spanned by two cells, independent of drag direction.
///
/// Keys come back in scan order: columns outer, time inner.
pub fn slots_between(grid: &Grid, start_key: &str, end_key: &str) -> Result<Vec<String>> {
    let (start_col, start_time) = grid.to_coordinates(start_key)?;
    let (end_col, end_time) = grid.to_coordinates(end_key)?;

    let columns = start_col.min(end_col)..=start_col.max(end_col);
    let times = start_time.min(end_time)..=start_time.max(end_time);

    Ok(columns
        .flat_map(|c| times.clone().filter_map(move |t| grid.key_at(c, t)))
        .collect())
}

/// Applies a selection to a copy of `availability`; the input is left untouched
pub fn apply_selection(
    availability: &Availability,
    keys: &[String],
    mode: SelectionMode,
) -> Availability {
    let mut updated = availability.clone();
    for key in keys {
        let value = match mode {
            SelectionMode::Toggle => !updated.is_available(key),
            SelectionMode::Paint(value) => value,
        };
        updated.set(key.clone(), value);
    }
    updated
}
