//! Retention-graph rendering.
//!
//! The extractor only needs "render this graph to text"; the file format belongs
//! to the renderer.

pub mod dot;

pub use dot::DotRenderer;

use crate::retention::RetentionGraph;

/// Serializes a retention graph to a textual graph-description format.
pub trait GraphRenderer: Send + Sync {
    /// File extension for rendered output, without the leading dot.
    fn extension(&self) -> &str;

    fn render(&self, graph: &RetentionGraph) -> String;
}
