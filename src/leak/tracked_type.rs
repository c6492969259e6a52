use std::collections::BTreeMap;
use std::collections::btree_map;

/// A type whose live instances a scenario wants counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedType {
    pub name: String,
    /// Only tracked during the cleanup phase, when instances are expected to be gone.
    pub cleanup_only: bool,
}

impl TrackedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cleanup_only: false,
        }
    }

    pub fn cleanup_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cleanup_only: true,
        }
    }
}

/// Tracked types keyed by name, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedTypes {
    types: BTreeMap<String, TrackedType>,
}

impl TrackedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tracked`, replacing an earlier registration with the same name.
    pub fn insert(&mut self, tracked: TrackedType) {
        self.types.insert(tracked.name.clone(), tracked);
    }

    pub fn get(&self, name: &str) -> Option<&TrackedType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, TrackedType> {
        self.types.values()
    }

    /// Types to check in a given phase.
    ///
    /// Regular types are checked in every phase; cleanup-only types only when
    /// `is_cleanup` is set.
    pub fn for_phase(&self, is_cleanup: bool) -> TrackedTypes {
        self.iter()
            .filter(|tracked| is_cleanup || !tracked.cleanup_only)
            .cloned()
            .collect()
    }
}

impl FromIterator<TrackedType> for TrackedTypes {
    fn from_iter<I: IntoIterator<Item = TrackedType>>(iter: I) -> Self {
        let mut types = TrackedTypes::new();
        for tracked in iter {
            types.insert(tracked);
        }
        types
    }
}

impl<'a> IntoIterator for &'a TrackedTypes {
    type Item = &'a TrackedType;
    type IntoIter = btree_map::Values<'a, String, TrackedType>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Source of tracked types for one stress-test scenario.
pub trait LeakScenario {
    /// Scenario name, used for the report file name.
    fn name(&self) -> &str;

    /// Every type the scenario registers, regardless of phase.
    fn leak_attributes(&self) -> TrackedTypes;

    fn tracked_types(&self, is_cleanup: bool) -> TrackedTypes {
        self.leak_attributes().for_phase(is_cleanup)
    }
}
