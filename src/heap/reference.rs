use std::fmt;

use serde::{Deserialize, Serialize};

use super::ObjectId;

/// How a referrer holds on to the object it points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Named instance or static field.
    Field(String),
    /// Slot of an array or vector-like container.
    ArrayElement(usize),
    /// Entry in the finalization queue. Does not keep the object alive by itself.
    Finalizer,
    /// Value slot of a weak table. Does not keep the object alive by itself.
    Ephemeron,
    /// Any other strong reference the snapshot provider can label.
    Other(String),
}

impl EdgeKind {
    /// Returns `false` for edges that do not prove reachability from a root.
    pub fn is_strong(&self) -> bool {
        !matches!(self, EdgeKind::Finalizer | EdgeKind::Ephemeron)
    }

    /// Label used when instance-specific detail (array slot) should not matter.
    pub fn category(&self) -> &str {
        match self {
            EdgeKind::Field(name) => name,
            EdgeKind::ArrayElement(_) => "[]",
            EdgeKind::Finalizer => "finalizer",
            EdgeKind::Ephemeron => "ephemeron",
            EdgeKind::Other(label) => label,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Field(name) => f.write_str(name),
            EdgeKind::ArrayElement(index) => write!(f, "[{index}]"),
            EdgeKind::Finalizer => f.write_str("finalizer"),
            EdgeKind::Ephemeron => f.write_str("ephemeron"),
            EdgeKind::Other(label) => f.write_str(label),
        }
    }
}

/// Why the collector treats an object as a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootKind {
    Stack,
    Static,
    /// Pinned or explicitly allocated GC handle.
    Handle,
    /// Object waiting for its finalizer. Not a strong root.
    FinalizerQueue,
    ThreadLocal,
    Other(String),
}

impl RootKind {
    pub fn is_strong(&self) -> bool {
        !matches!(self, RootKind::FinalizerQueue)
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootKind::Stack => f.write_str("stack"),
            RootKind::Static => f.write_str("static"),
            RootKind::Handle => f.write_str("handle"),
            RootKind::FinalizerQueue => f.write_str("finalizer queue"),
            RootKind::ThreadLocal => f.write_str("thread local"),
            RootKind::Other(label) => f.write_str(label),
        }
    }
}

/// A reverse edge: `referrer` holds a reference of `kind` to the queried object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub referrer: ObjectId,
    pub kind: EdgeKind,
}

impl Reference {
    pub fn new(referrer: ObjectId, kind: EdgeKind) -> Self {
        Self { referrer, kind }
    }
}
