//! Route handlers, one module per resource area.

pub mod dashboard;
pub mod directory;
pub mod distributions;
pub mod meetings;
pub mod templates;
