//! Logging setup and structured logging helpers

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize logging based on configuration. `RUST_LOG` takes precedence
/// over the configured level when set.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!(level = %config.level, json = config.json, "Logging initialized");
}

/// Log an availability submission
pub fn log_submission(event_id: &str, respondent: &str, slots: usize) {
    info!(event_id, respondent, slots, "Availability submitted");
}

/// Log a best-slot computation
pub fn log_best_slots(event_id: &str, respondents: usize, best: usize, max: usize) {
    info!(event_id, respondents, best, max, "Best slots computed");
}
