use tracing::debug;

use crate::error::Result;
use super::coords::{split_key, Grid};
use super::types::ChosenSlot;

/// State of the final-slot picker
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Inactive,
    Active { chosen: Option<ChosenSlot> },
}

/// Single-selection mode for picking the slot to schedule.
///
/// At most one cell is chosen at a time; range results of any other size
/// are ignored.
#[derive(Debug, Clone, Default)]
pub struct SchedulingPicker {
    state: PickerState,
}

impl SchedulingPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PickerState::Active { .. })
    }

    /// Enters picking mode, clearing any earlier choice
    pub fn activate(&mut self) {
        self.state = PickerState::Active { chosen: None };
    }

    /// Leaves picking mode and forgets the choice
    pub fn cancel(&mut self) {
        self.state = PickerState::Inactive;
    }

    /// Offers a gesture result. Applied only while active and only when it
    /// covers exactly one cell; returns whether the choice changed.
    pub fn choose(&mut self, grid: &Grid, keys: &[String]) -> Result<bool> {
        let PickerState::Active { chosen } = &mut self.state else {
            return Ok(false);
        };
        let [key] = keys else {
            debug!(cells = keys.len(), "Ignoring multi-cell pick");
            return Ok(false);
        };

        grid.to_coordinates(key)?;
        let (column, time) = split_key(key)?;
        *chosen = Some(ChosenSlot {
            column: column.to_string(),
            time: time.to_string(),
        });
        Ok(true)
    }

    pub fn chosen(&self) -> Option<&ChosenSlot> {
        match &self.state {
            PickerState::Active { chosen } => chosen.as_ref(),
            PickerState::Inactive => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(
            vec!["Monday".into(), "Tuesday".into()],
            vec!["09:00".into(), "09:30".into()],
        )
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_inactive_ignores_choice() {
        let mut picker = SchedulingPicker::new();
        assert!(!picker.choose(&grid(), &keys(&["Monday_09:00"])).unwrap());
        assert_eq!(picker.chosen(), None);
    }

    #[test]
    fn test_choice_replaces_previous() {
        let mut picker = SchedulingPicker::new();
        picker.activate();
        assert_eq!(picker.state(), &PickerState::Active { chosen: None });

        assert!(picker.choose(&grid(), &keys(&["Monday_09:00"])).unwrap());
        assert!(picker.choose(&grid(), &keys(&["Tuesday_09:30"])).unwrap());
        assert_eq!(
            picker.chosen(),
            Some(&ChosenSlot { column: "Tuesday".into(), time: "09:30".into() })
        );
    }

    #[test]
    fn test_multi_cell_result_is_ignored() {
        let mut picker = SchedulingPicker::new();
        picker.activate();
        picker.choose(&grid(), &keys(&["Monday_09:00"])).unwrap();

        let changed = picker
            .choose(&grid(), &keys(&["Monday_09:00", "Monday_09:30"]))
            .unwrap();
        assert!(!changed);
        assert!(!picker.choose(&grid(), &[]).unwrap());
        assert_eq!(picker.chosen().map(|c| c.time.as_str()), Some("09:00"));
    }

    #[test]
    fn test_cancel_and_reactivate_clear_choice() {
        let mut picker = SchedulingPicker::new();
        picker.activate();
        picker.choose(&grid(), &keys(&["Monday_09:00"])).unwrap();
        picker.cancel();
        assert!(!picker.is_active());
        assert_eq!(picker.chosen(), None);

        picker.activate();
        picker.choose(&grid(), &keys(&["Monday_09:00"])).unwrap();
        picker.activate();
        assert_eq!(picker.chosen(), None);
    }

    #[test]
    fn test_stale_key_rejected() {
        let mut picker = SchedulingPicker::new();
        picker.activate();
        assert!(picker.choose(&grid(), &keys(&["Friday_09:00"])).is_err());
    }
}
