//! Error types for leak processing and retention tracing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::heap::ObjectId;

/// Failures that escape [`crate::leak::LeakProcessor`] to the harness.
///
/// Analysis problems (absent types, unrooted instances) never show up here; they
/// degrade the affected item instead. Only I/O and serialization failures propagate.
#[derive(Debug, Error)]
pub enum LeakError {
    #[error("i/o error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write diagnostics: {0}")]
    Diagnostics(#[from] io::Error),

    #[error("failed to serialize `{}`: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid profiler options: {0}")]
    Config(#[source] serde_json::Error),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl LeakError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LeakError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a retention path could not be produced for an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("object {0} is not part of the snapshot")]
    UnknownObject(ObjectId),

    #[error("no GC root reaches object {0}")]
    Unrooted(ObjectId),

    #[error("no root found within {limit} hops of object {instance}")]
    DepthExceeded { instance: ObjectId, limit: usize },

    #[error("visited more than {limit} objects while tracing object {instance}")]
    NodeBudgetExceeded { instance: ObjectId, limit: usize },

    #[error("type `{0}` has no live instances to trace")]
    NoInstances(String),
}

/// Problems loading a heap dump into a [`crate::heap::MemorySnapshot`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read heap dump `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed heap dump: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("object id {0} appears more than once")]
    DuplicateObject(ObjectId),

    #[error("reference {from} -> {to} points at an unknown object")]
    DanglingReference { from: ObjectId, to: ObjectId },
}
