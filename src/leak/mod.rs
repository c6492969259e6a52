//! Cross-iteration leak bookkeeping.
//!
//! The harness feeds one heap snapshot per iteration to [`LeakProcessor`]. The
//! processor counts every tracked type, compares with the previous iteration in
//! its [`RunLog`], and keeps the whole history for the final report.

pub mod detector;
pub mod iteration;
pub mod leak_item;
pub mod processor;
pub mod run_log;
pub mod tracked_type;

pub use detector::{LeakDetector, delta, format_delta};
pub use iteration::IterationResult;
pub use leak_item::LeakItem;
pub use processor::LeakProcessor;
pub use run_log::RunLog;
pub use tracked_type::{LeakScenario, TrackedType, TrackedTypes};
