use serde::{Deserialize, Serialize};

use super::IterationResult;

/// Append-only history of a test run, in iteration order.
///
/// The previous iteration is always the last entry appended, never a lookup by
/// label: harnesses may repeat labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    iterations: Vec<IterationResult>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, result: IterationResult) {
        self.iterations.push(result);
    }

    pub fn last(&self) -> Option<&IterationResult> {
        self.iterations.last()
    }

    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IterationResult> {
        self.iterations.iter()
    }

    pub fn iterations(&self) -> &[IterationResult] {
        &self.iterations
    }
}

impl<'a> IntoIterator for &'a RunLog {
    type Item = &'a IterationResult;
    type IntoIter = std::slice::Iter<'a, IterationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
