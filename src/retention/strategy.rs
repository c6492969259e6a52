use crate::config::TraversalLimits;
use crate::error::TraceError;
use crate::heap::{HeapSnapshot, TypeInfo};

use super::graph::RetentionGraph;
use super::trace::trace_to_roots;

/// Chooses which live instance of a type to explain and traces it.
pub trait RetentionStrategy: Send + Sync {
    fn select(
        &self,
        snapshot: &dyn HeapSnapshot,
        type_info: &TypeInfo,
        limits: TraversalLimits,
    ) -> Result<RetentionGraph, TraceError>;
}

/// Traces the first instance in the snapshot's enumeration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstInstance;

impl RetentionStrategy for FirstInstance {
    fn select(
        &self,
        snapshot: &dyn HeapSnapshot,
        type_info: &TypeInfo,
        limits: TraversalLimits,
    ) -> Result<RetentionGraph, TraceError> {
        let Some(&instance) = type_info.objects.first() else {
            return Err(TraceError::NoInstances(type_info.type_name.clone()));
        };
        trace_to_roots(snapshot, instance, limits)
    }
}

/// Traces up to `sample` instances and reports the most common retention shape.
///
/// Instances are grouped by [`RetentionGraph::shape_digest`]. The graph returned
/// is the first one traced for the largest group; ties go to the group seen first.
#[derive(Debug, Clone, Copy)]
pub struct ShapeGrouped {
    pub sample: usize,
}

impl ShapeGrouped {
    pub fn new(sample: usize) -> Self {
        Self {
            sample: sample.max(1),
        }
    }
}

impl RetentionStrategy for ShapeGrouped {
    fn select(
        &self,
        snapshot: &dyn HeapSnapshot,
        type_info: &TypeInfo,
        limits: TraversalLimits,
    ) -> Result<RetentionGraph, TraceError> {
        let mut groups: Vec<([u8; 32], usize, RetentionGraph)> = Vec::new();
        let mut first_error = None;

        for &instance in type_info.objects.iter().take(self.sample.max(1)) {
            match trace_to_roots(snapshot, instance, limits) {
                Ok(graph) => {
                    let digest = graph.shape_digest();
                    match groups.iter_mut().find(|(d, _, _)| *d == digest) {
                        Some(group) => group.1 += 1,
                        None => groups.push((digest, 1, graph)),
                    }
                }
                Err(err) => {
                    log::debug!("skipping {} instance {instance}: {err}", type_info.type_name);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        log::debug!(
            "{}: {} retention shape(s) across {} sampled instance(s)",
            type_info.type_name,
            groups.len(),
            type_info.objects.len().min(self.sample.max(1)),
        );

        let mut best: Option<([u8; 32], usize, RetentionGraph)> = None;
        for group in groups {
            if best.as_ref().is_none_or(|b| group.1 > b.1) {
                best = Some(group);
            }
        }

        match (best, first_error) {
            (Some((_, _, graph)), _) => Ok(graph),
            (None, Some(err)) => Err(err),
            (None, None) => Err(TraceError::NoInstances(type_info.type_name.clone())),
        }
    }
}
