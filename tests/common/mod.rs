#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use leakscope::{EdgeKind, LeakScenario, MemorySnapshot, ObjectId, RootKind, TrackedType, TrackedTypes};

/// Scenario with a fixed set of tracked types.
pub struct FixedScenario {
    pub name: String,
    pub types: Vec<TrackedType>,
}

impl FixedScenario {
    pub fn new(name: &str, types: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            types: types.iter().map(|t| TrackedType::new(*t)).collect(),
        }
    }

    pub fn with_cleanup_only(mut self, type_name: &str) -> Self {
        self.types.push(TrackedType::cleanup_only(type_name));
        self
    }
}

impl LeakScenario for FixedScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn leak_attributes(&self) -> TrackedTypes {
        self.types.iter().cloned().collect()
    }
}

/// `Write` sink whose contents stay readable after it is moved into a processor.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Heap where a static `App` root keeps `count` instances of `type_name` in a list.
pub fn listed_heap(type_name: &str, count: usize) -> (MemorySnapshot, Vec<ObjectId>) {
    let mut heap = MemorySnapshot::new();
    let app = heap.add_object("App");
    let list = heap.add_object("List");
    heap.add_root(app, RootKind::Static);
    heap.add_reference(app, list, EdgeKind::Field("items".into()))
        .unwrap();

    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let obj = heap.add_object(type_name);
        heap.add_reference(list, obj, EdgeKind::ArrayElement(i)).unwrap();
        ids.push(obj);
    }
    (heap, ids)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
