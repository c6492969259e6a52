//! End-of-run reporting.

pub mod json;
pub mod text;

pub use json::{read_report, render_json_string, write_report};
pub use text::render_trend;
