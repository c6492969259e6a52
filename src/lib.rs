//! Cross-iteration leak detection over heap snapshots.
//!
//! After every stress-test iteration the harness hands a heap snapshot to a
//! [`LeakProcessor`]. For each tracked type the processor records the live
//! instance count, prints the change against the previous iteration, and writes a
//! Graphviz retention graph explaining why one surviving instance is still
//! reachable. At the end of the run the whole history is written as JSON.
//!
//! ```ignore
//! let mut processor = LeakProcessor::new(scenario, ProfilerOptions::default());
//! for (label, snapshot) in iterations {
//!     processor.process(Some(&snapshot), false, label, None)?;
//! }
//! processor.report_result()?;
//! ```

pub mod config;
pub mod error;
pub mod heap;
pub mod leak;
pub mod render;
pub mod report;
pub mod retention;

pub use config::{ProfilerOptions, ProfilerType, TraversalLimits};
pub use error::{LeakError, SnapshotError, TraceError};
pub use heap::{EdgeKind, HeapSnapshot, MemorySnapshot, ObjectId, RootKind, TypeInfo};
pub use leak::{IterationResult, LeakItem, LeakProcessor, LeakScenario, RunLog, TrackedType, TrackedTypes};
pub use render::{DotRenderer, GraphRenderer};
pub use retention::{RetentionGraph, RetentionPathExtractor, RetentionStrategy};
