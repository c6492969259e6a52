//! Retention-path extraction.
//!
//! Given a live instance, find why it is still alive: walk referrer edges back to
//! the nearest GC roots and keep the minimal subgraph that connects them. Every
//! edge keeps its [`crate::heap::EdgeKind`], so finalizer and ephemeron holds stay
//! visible rather than being mistaken for ownership.

pub mod extractor;
pub mod graph;
pub mod strategy;
pub mod trace;

pub use extractor::{GRAPHS_DIRECTORY, RetentionPathExtractor};
pub use graph::{RetentionEdge, RetentionGraph, RetentionNode};
pub use strategy::{FirstInstance, RetentionStrategy, ShapeGrouped};
pub use trace::trace_to_roots;
