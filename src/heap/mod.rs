//! Heap snapshot abstraction.
//!
//! A snapshot is read-only: the engine only enumerates instances of a type and
//! walks referrer edges back towards GC roots. Capturing the snapshot belongs to
//! the harness; [`MemorySnapshot`] is the in-process implementation used for heap
//! dumps and tests.

pub mod memory_snapshot;
pub mod object_id;
pub mod reference;
pub mod snapshot;

pub use memory_snapshot::MemorySnapshot;
pub use object_id::ObjectId;
pub use reference::{EdgeKind, Reference, RootKind};
pub use snapshot::{HeapSnapshot, TypeInfo};
