use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

use super::{EdgeKind, HeapSnapshot, ObjectId, Reference, RootKind, TypeInfo};

#[derive(Debug)]
struct ObjectRecord {
    type_name: String,
    root: Option<RootKind>,
    referrers: Vec<Reference>,
}

/// In-memory heap snapshot.
///
/// Objects live in a dense slot vector indexed through `slots`; enumeration order
/// for a type is insertion order. Built either incrementally (`add_object`,
/// `add_reference`, `add_root`) or from a JSON heap dump.
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    objects: Vec<ObjectRecord>,
    slots: HashMap<ObjectId, usize>,
    by_type: BTreeMap<String, Vec<ObjectId>>,
    next_id: u64,
}

/// Serialized form of a heap dump.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeapDump {
    pub objects: Vec<DumpObject>,
    #[serde(default)]
    pub references: Vec<DumpReference>,
    /// Types known to the runtime that may have no live instances.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpObject {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<RootKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpReference {
    pub from: ObjectId,
    pub to: ObjectId,
    pub kind: EdgeKind,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh object of `type_name` and returns its id.
    pub fn add_object(&mut self, type_name: &str) -> ObjectId {
        while self.slots.contains_key(&ObjectId(self.next_id)) {
            self.next_id += 1;
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.insert(id, type_name);
        id
    }

    /// Inserts an object with a caller-chosen id, as found in a heap dump.
    pub fn add_object_with_id(&mut self, id: ObjectId, type_name: &str) -> Result<(), SnapshotError> {
        if self.slots.contains_key(&id) {
            return Err(SnapshotError::DuplicateObject(id));
        }
        self.insert(id, type_name);
        Ok(())
    }

    fn insert(&mut self, id: ObjectId, type_name: &str) {
        self.slots.insert(id, self.objects.len());
        self.objects.push(ObjectRecord {
            type_name: type_name.to_string(),
            root: None,
            referrers: Vec::new(),
        });
        self.by_type.entry(type_name.to_string()).or_default().push(id);
    }

    /// Registers a type without instances so lookups report a zero count.
    pub fn declare_type(&mut self, type_name: &str) {
        self.by_type.entry(type_name.to_string()).or_default();
    }

    /// Records that `from` references `to`.
    pub fn add_reference(
        &mut self,
        from: ObjectId,
        to: ObjectId,
        kind: EdgeKind,
    ) -> Result<(), SnapshotError> {
        if !self.slots.contains_key(&from) {
            return Err(SnapshotError::DanglingReference { from, to });
        }
        let Some(&slot) = self.slots.get(&to) else {
            return Err(SnapshotError::DanglingReference { from, to });
        };
        self.objects[slot].referrers.push(Reference::new(from, kind));
        Ok(())
    }

    /// Marks `object` as a GC root. Unknown ids are ignored.
    pub fn add_root(&mut self, object: ObjectId, kind: RootKind) {
        if let Some(&slot) = self.slots.get(&object) {
            self.objects[slot].root = Some(kind);
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn from_dump(dump: HeapDump) -> Result<Self, SnapshotError> {
        let mut snapshot = Self::new();
        for object in &dump.objects {
            snapshot.add_object_with_id(object.id, &object.type_name)?;
            if let Some(root) = &object.root {
                snapshot.add_root(object.id, root.clone());
            }
        }
        for reference in dump.references {
            snapshot.add_reference(reference.from, reference.to, reference.kind)?;
        }
        for type_name in &dump.types {
            snapshot.declare_type(type_name);
        }
        Ok(snapshot)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let dump: HeapDump = serde_json::from_str(json)?;
        Self::from_dump(dump)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    fn record(&self, object: ObjectId) -> Option<&ObjectRecord> {
        self.slots.get(&object).map(|&slot| &self.objects[slot])
    }
}

impl HeapSnapshot for MemorySnapshot {
    fn try_get_type_info(&self, type_name: &str) -> Option<TypeInfo> {
        self.by_type
            .get(type_name)
            .map(|objects| TypeInfo::new(type_name, objects.clone()))
    }

    fn type_name_of(&self, object: ObjectId) -> Option<&str> {
        self.record(object).map(|record| record.type_name.as_str())
    }

    fn referrers(&self, object: ObjectId) -> &[Reference] {
        self.record(object)
            .map(|record| record.referrers.as_slice())
            .unwrap_or(&[])
    }

    fn root_kind(&self, object: ObjectId) -> Option<&RootKind> {
        self.record(object).and_then(|record| record.root.as_ref())
    }
}
