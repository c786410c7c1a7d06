pub mod event;
pub mod export;

pub use event::{validate_event, EventRequest};
pub use export::{calendar_link, export_responses_csv};
