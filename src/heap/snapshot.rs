use crate::config::TraversalLimits;
use crate::error::TraceError;
use crate::retention::{RetentionGraph, trace_to_roots};

use super::{ObjectId, Reference, RootKind};

/// Live instances of one type at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: String,
    /// Instances in the snapshot's enumeration order.
    pub objects: Vec<ObjectId>,
}

impl TypeInfo {
    pub fn new(type_name: impl Into<String>, objects: Vec<ObjectId>) -> Self {
        Self {
            type_name: type_name.into(),
            objects,
        }
    }

    pub fn count(&self) -> usize {
        self.objects.len()
    }
}

/// Read access to a captured heap.
///
/// Implementations must enumerate instances and referrers in a stable order;
/// retention paths are only reproducible if they do.
pub trait HeapSnapshot: Sync {
    /// Returns `None` when the snapshot has no knowledge of `type_name`.
    ///
    /// A type that is known but has no live instances returns `Some` with an
    /// empty object list.
    fn try_get_type_info(&self, type_name: &str) -> Option<TypeInfo>;

    /// Type of a live object, or `None` if the id is not in this snapshot.
    fn type_name_of(&self, object: ObjectId) -> Option<&str>;

    /// Objects holding a reference to `object`. Empty for unknown ids.
    fn referrers(&self, object: ObjectId) -> &[Reference];

    /// Root kind if the collector treats `object` as a root.
    fn root_kind(&self, object: ObjectId) -> Option<&RootKind>;

    /// Subgraph of references connecting the nearest GC roots to `object`.
    fn object_graph(
        &self,
        object: ObjectId,
        limits: TraversalLimits,
    ) -> Result<RetentionGraph, TraceError> {
        trace_to_roots(self, object, limits)
    }
}
