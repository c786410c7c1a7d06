//! Group availability grid: time slot derivation, response aggregation,
//! drag selection and best-slot search, plus the CSV, calendar and HTTP
//! layers around them.

pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod grid;
pub mod logging;
pub mod parser;
pub mod store;
pub mod web;

pub use error::{GridError, Result};
