//! Profiler options controlling leak detection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LeakError;

const DEFAULT_MAX_DEPTH: usize = 10_000;
const DEFAULT_MAX_NODES: usize = 1_000_000;

/// How much profiling the harness requested for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfilerType {
    /// Leak detection is off; every iteration records an empty leak map.
    Disabled,
    /// Heap snapshots are counted and traced.
    #[default]
    HeapOnly,
}

/// Upper bounds on a single root search.
///
/// Exceeding either bound fails the trace closed (no artifact) instead of
/// blocking the iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalLimits {
    /// Maximum number of referrer hops from the instance.
    pub max_depth: usize,
    /// Maximum number of distinct objects visited.
    pub max_nodes: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// Options for a leak-processing run.
///
/// Defaults:
/// - profiler type: [`ProfilerType::HeapOnly`]
/// - output root: the current directory
/// - traversal: `10_000` hops, `1_000_000` objects
/// - parallel extraction: off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerOptions {
    pub profiler_type: ProfilerType,
    /// Directory that holds `graphs/` and the final report.
    pub output_root: PathBuf,
    pub traversal: TraversalLimits,
    /// Extract retention paths for independent types on the rayon pool.
    pub parallel_extraction: bool,
}

impl Default for ProfilerOptions {
    fn default() -> Self {
        Self {
            profiler_type: ProfilerType::default(),
            output_root: PathBuf::from("."),
            traversal: TraversalLimits::default(),
            parallel_extraction: false,
        }
    }
}

impl ProfilerOptions {
    pub fn disabled() -> Self {
        Self {
            profiler_type: ProfilerType::Disabled,
            ..Self::default()
        }
    }

    pub fn with_profiler_type(mut self, profiler_type: ProfilerType) -> Self {
        self.profiler_type = profiler_type;
        self
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_traversal(mut self, traversal: TraversalLimits) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_parallel_extraction(mut self, enabled: bool) -> Self {
        self.parallel_extraction = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.profiler_type != ProfilerType::Disabled
    }

    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, LeakError> {
        serde_json::from_str(json).map_err(LeakError::Config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LeakError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LeakError::io(path, e))?;
        Self::from_json_str(&text)
    }
}
