pub mod types;
pub mod slot_utils;
pub mod coords;
pub mod aggregate;
pub mod range;
pub mod best;
pub mod picker;
pub mod session;

pub use types::{Availability, BestSlot, CellStats, ChosenSlot, EventConfig, EventMode, Responses, TimeRange};
pub use slot_utils::generate_slots;
pub use coords::{to_key, Grid};
pub use aggregate::{aggregate, grid_summary, heatmap_bucket, CellView, HeatBucket};
pub use range::{apply_selection, slots_between, SelectionMode};
pub use best::{filter_to_best, find_best};
pub use picker::SchedulingPicker;
pub use session::GridSession;
