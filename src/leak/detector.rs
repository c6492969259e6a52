use std::collections::BTreeMap;
use std::io::Write;

use rayon::prelude::*;

use crate::config::ProfilerOptions;
use crate::error::LeakError;
use crate::heap::{HeapSnapshot, TypeInfo};
use crate::retention::RetentionPathExtractor;

use super::{IterationResult, LeakItem, TrackedTypes};

/// Counts tracked types in one snapshot and traces a retention path for each.
pub struct LeakDetector<'a> {
    options: &'a ProfilerOptions,
    extractor: &'a RetentionPathExtractor,
}

impl<'a> LeakDetector<'a> {
    pub fn new(options: &'a ProfilerOptions, extractor: &'a RetentionPathExtractor) -> Self {
        Self { options, extractor }
    }

    /// Builds the leak map for one iteration and writes a summary line per type to `out`.
    ///
    /// Returns an empty map, without touching the snapshot, when there is no
    /// snapshot, detection is disabled, or nothing is tracked. Types the snapshot
    /// does not know are left out. A type whose path cannot be traced still gets
    /// its count, with no artifact.
    pub fn detect(
        &self,
        snapshot: Option<&dyn HeapSnapshot>,
        is_cleanup: bool,
        previous: Option<&IterationResult>,
        tracked: &TrackedTypes,
        iteration_name: &str,
        out: &mut dyn Write,
    ) -> Result<BTreeMap<String, LeakItem>, LeakError> {
        let Some(snapshot) = snapshot else {
            return Ok(BTreeMap::new());
        };
        if !self.options.is_enabled() {
            return Ok(BTreeMap::new());
        }
        if tracked.is_empty() {
            log::debug!("{iteration_name}: no tracked types (cleanup: {is_cleanup})");
            return Ok(BTreeMap::new());
        }

        let found: Vec<(&str, TypeInfo)> = tracked
            .names()
            .filter_map(|name| snapshot.try_get_type_info(name).map(|info| (name, info)))
            .collect();
        log::debug!(
            "{iteration_name}: {} of {} tracked types present (cleanup: {is_cleanup})",
            found.len(),
            tracked.len()
        );

        let can_extract = !found.is_empty()
            && match self.extractor.ensure_graphs_dir() {
                Ok(()) => true,
                Err(err) => {
                    log::error!(
                        "cannot create {}: {err}; skipping retention paths for {iteration_name}",
                        self.extractor.graphs_dir().display()
                    );
                    false
                }
            };

        let extract = |info: &TypeInfo| {
            if can_extract {
                self.extractor.extract_path(snapshot, info, iteration_name)
            } else {
                None
            }
        };
        // Paths may be traced concurrently; results keep tracked-type order.
        let artifacts: Vec<Option<String>> = if self.options.parallel_extraction {
            found.par_iter().map(|(_, info)| extract(info)).collect()
        } else {
            found.iter().map(|(_, info)| extract(info)).collect()
        };

        let mut leaks = BTreeMap::new();
        for ((name, info), artifact) in found.into_iter().zip(artifacts) {
            leaks.insert(
                name.to_string(),
                LeakItem::new(name, info.count() as u64, artifact),
            );
        }

        writeln!(out, "Live objects count per type:")?;
        for item in leaks.values() {
            writeln!(
                out,
                "{}: {} {}",
                item.class_name,
                item.count,
                format_delta(delta(item, previous))
            )?;
        }

        Ok(leaks)
    }
}

/// Change in live count since `previous`, or `None` when `previous` has no entry
/// for the type.
pub fn delta(item: &LeakItem, previous: Option<&IterationResult>) -> Option<i64> {
    let before = previous?.leak(&item.class_name)?;
    Some(item.count as i64 - before.count as i64)
}

/// Explicitly signed delta (`+2`, `-1`, `+0`), or `(baseline)` without a prior value.
pub fn format_delta(delta: Option<i64>) -> String {
    match delta {
        Some(d) => format!("{d:+}"),
        None => String::from("(baseline)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{EdgeKind, MemorySnapshot, RootKind};
    use crate::leak::TrackedType;

    fn tracked(names: &[&str]) -> TrackedTypes {
        names.iter().map(|name| TrackedType::new(*name)).collect()
    }

    fn heap_with(type_name: &str, count: usize) -> MemorySnapshot {
        let mut heap = MemorySnapshot::new();
        let app = heap.add_object("App");
        heap.add_root(app, RootKind::Static);
        for i in 0..count {
            let obj = heap.add_object(type_name);
            heap.add_reference(app, obj, EdgeKind::ArrayElement(i)).unwrap();
        }
        heap
    }

    #[test]
    fn test_delta_against_previous() {
        let mut leaks = BTreeMap::new();
        leaks.insert("Foo".to_string(), LeakItem::new("Foo", 3, None));
        let previous = IterationResult::new("iter1", leaks, None);

        assert_eq!(delta(&LeakItem::new("Foo", 5, None), Some(&previous)), Some(2));
        assert_eq!(delta(&LeakItem::new("Foo", 1, None), Some(&previous)), Some(-2));
        assert_eq!(delta(&LeakItem::new("Bar", 1, None), Some(&previous)), None);
        assert_eq!(delta(&LeakItem::new("Foo", 1, None), None), None);
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(Some(2)), "+2");
        assert_eq!(format_delta(Some(0)), "+0");
        assert_eq!(format_delta(Some(-4)), "-4");
        assert_eq!(format_delta(None), "(baseline)");
    }

    #[test]
    fn test_disabled_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let options = ProfilerOptions::disabled().with_output_root(dir.path());
        let extractor = RetentionPathExtractor::new(&options);
        let detector = LeakDetector::new(&options, &extractor);
        let heap = heap_with("Foo", 2);

        let mut out = Vec::new();
        let leaks = detector
            .detect(Some(&heap), false, None, &tracked(&["Foo"]), "iter1", &mut out)
            .unwrap();
        assert!(leaks.is_empty());
        assert!(out.is_empty());
        assert!(!dir.path().join("graphs").exists());
    }

    #[test]
    fn test_zero_count_type_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let options = ProfilerOptions::default().with_output_root(dir.path());
        let extractor = RetentionPathExtractor::new(&options);
        let detector = LeakDetector::new(&options, &extractor);
        let mut heap = heap_with("Foo", 1);
        heap.declare_type("Idle");

        let mut out = Vec::new();
        let leaks = detector
            .detect(Some(&heap), false, None, &tracked(&["Foo", "Idle"]), "iter1", &mut out)
            .unwrap();
        assert_eq!(leaks["Idle"], LeakItem::new("Idle", 0, None));
        assert_eq!(leaks["Foo"].count, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Live objects count per type:\nFoo: 1 (baseline)\nIdle: 0 (baseline)\n"
        );
    }

    #[test]
    fn test_graphs_dir_failure_keeps_counts() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the output root should be makes `graphs/` impossible to create.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"").unwrap();
        let options = ProfilerOptions::default().with_output_root(&blocked);
        let extractor = RetentionPathExtractor::new(&options);
        let detector = LeakDetector::new(&options, &extractor);
        let heap = heap_with("Foo", 4);

        let mut out = Vec::new();
        let leaks = detector
            .detect(Some(&heap), false, None, &tracked(&["Foo"]), "iter1", &mut out)
            .unwrap();
        assert_eq!(leaks["Foo"], LeakItem::new("Foo", 4, None));
    }
}
