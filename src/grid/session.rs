//! Short-lived interaction state for one respondent at one grid.
//!
//! Availability editing and final-slot picking share the pointer gestures
//! but never run at the same time.

use tracing::debug;

use crate::error::Result;
use super::coords::Grid;
use super::picker::SchedulingPicker;
use super::range::{apply_selection, slots_between, SelectionMode};
use super::types::{Availability, ChosenSlot};

/// A drag in progress. The rectangle is always recomputed from the fixed
/// start cell, never accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    pub start_key: String,
    pub mode: SelectionMode,
    pub rectangle: Vec<String>,
}

#[derive(Debug, Clone, Default)]
enum Mode {
    #[default]
    Viewing,
    Editing { respondent: String },
    /// `resume` holds the respondent whose edit was interrupted
    Scheduling {
        picker: SchedulingPicker,
        resume: Option<String>,
    },
}

/// Interaction session: the working availability map, the drag gate and
/// the scheduling picker
#[derive(Debug, Clone, Default)]
pub struct GridSession {
    mode: Mode,
    availability: Availability,
    drag: Option<DragGesture>,
}

impl GridSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing { .. })
    }

    pub fn is_scheduling(&self) -> bool {
        matches!(self.mode, Mode::Scheduling { .. })
    }

    pub fn respondent(&self) -> Option<&str> {
        match &self.mode {
            Mode::Editing { respondent } => Some(respondent),
            _ => None,
        }
    }

    /// The in-progress availability map
    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    pub fn drag(&self) -> Option<&DragGesture> {
        self.drag.as_ref()
    }

    /// Cells covered by the current drag, for highlighting
    pub fn selection_preview(&self) -> &[String] {
        self.drag.as_ref().map(|d| d.rectangle.as_slice()).unwrap_or(&[])
    }

    /// Starts (or restarts) editing for `respondent`, seeded with their
    /// previously submitted map if any
    pub fn begin_editing(&mut self, respondent: impl Into<String>, previous: Option<&Availability>) {
        let respondent = respondent.into();
        debug!(respondent = %respondent, "Editing availability");
        self.availability = previous.cloned().unwrap_or_default();
        self.drag = None;
        self.mode = Mode::Editing { respondent };
    }

    /// Switches to picking the final slot. Any drag in progress is dropped.
    /// An unsubmitted edit is suspended, not discarded: its working map is
    /// kept and editing resumes on `cancel_scheduling`.
    pub fn begin_scheduling(&mut self) {
        let resume = match std::mem::take(&mut self.mode) {
            Mode::Editing { respondent } => Some(respondent),
            Mode::Scheduling { resume, .. } => resume,
            Mode::Viewing => None,
        };
        let mut picker = SchedulingPicker::new();
        picker.activate();
        self.drag = None;
        self.mode = Mode::Scheduling { picker, resume };
    }

    /// Leaves scheduling mode, discarding the chosen slot. Returns to the
    /// suspended edit if there was one, otherwise to viewing.
    pub fn cancel_scheduling(&mut self) {
        if !self.is_scheduling() {
            return;
        }
        let Mode::Scheduling { mut picker, resume } = std::mem::take(&mut self.mode) else {
            return;
        };
        picker.cancel();
        self.drag = None;
        self.mode = match resume {
            Some(respondent) => {
                debug!(respondent = %respondent, "Editing resumed");
                Mode::Editing { respondent }
            }
            None => Mode::Viewing,
        };
    }

    pub fn chosen(&self) -> Option<&ChosenSlot> {
        match &self.mode {
            Mode::Scheduling { picker, .. } => picker.chosen(),
            _ => None,
        }
    }

    /// Pointer pressed on a cell. In editing mode the paint value is fixed
    /// here from the start cell's current state and written immediately.
    pub fn pointer_down(&mut self, grid: &Grid, key: &str) -> Result<()> {
        let rectangle = slots_between(grid, key, key)?;
        let mode = match &self.mode {
            Mode::Viewing => return Ok(()),
            Mode::Editing { .. } => {
                let mode = SelectionMode::paint_from(self.availability.is_available(key));
                self.availability = apply_selection(&self.availability, &rectangle, mode);
                mode
            }
            Mode::Scheduling { .. } => SelectionMode::Paint(true),
        };

        self.drag = Some(DragGesture {
            start_key: key.to_string(),
            mode,
            rectangle,
        });
        Ok(())
    }

    /// Pointer moved onto a cell while dragging. Each write is committed
    /// straight away; cells left behind keep their painted value.
    pub fn pointer_enter(&mut self, grid: &Grid, key: &str) -> Result<()> {
        let Some(drag) = &mut self.drag else {
            return Ok(());
        };

        drag.rectangle = slots_between(grid, &drag.start_key, key)?;
        if let Mode::Editing { .. } = self.mode {
            self.availability = apply_selection(&self.availability, &drag.rectangle, drag.mode);
        }
        Ok(())
    }

    /// Pointer released. In scheduling mode the final rectangle is offered
    /// to the picker; returns whether the chosen slot changed.
    pub fn pointer_up(&mut self, grid: &Grid) -> Result<bool> {
        let Some(drag) = self.drag.take() else {
            return Ok(false);
        };

        match &mut self.mode {
            Mode::Scheduling { picker, .. } => picker.choose(grid, &drag.rectangle),
            _ => Ok(false),
        }
    }

    /// Pointer left the grid: the drag ends without rollback
    pub fn pointer_leave(&mut self) {
        if self.drag.take().is_some() {
            debug!("Drag abandoned");
        }
    }

    /// Click without drag. Flips one cell while editing, picks it while scheduling.
    pub fn click(&mut self, grid: &Grid, key: &str) -> Result<bool> {
        let keys = slots_between(grid, key, key)?;
        match &mut self.mode {
            Mode::Viewing => Ok(false),
            Mode::Editing { .. } => {
                self.availability = apply_selection(&self.availability, &keys, SelectionMode::Toggle);
                Ok(true)
            }
            Mode::Scheduling { picker, .. } => picker.choose(grid, &keys),
        }
    }

    /// Freezes the working map for submission and returns to viewing.
    /// Explicit `false` entries are dropped.
    pub fn submit(&mut self) -> Option<(String, Availability)> {
        if !self.is_editing() {
            return None;
        }
        let Mode::Editing { respondent } = std::mem::take(&mut self.mode) else {
            return None;
        };
        self.drag = None;
        let availability = std::mem::take(&mut self.availability).compact();
        debug!(respondent = %respondent, slots = availability.len(), "Availability submitted");
        Some((respondent, availability))
    }
}
