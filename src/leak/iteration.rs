use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::LeakItem;

/// Outcome of one harness iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationResult {
    /// Label supplied by the harness. Not guaranteed unique.
    pub name: String,
    pub leaks: BTreeMap<String, LeakItem>,
    /// Process memory statistics from the harness, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_stats: Option<Value>,
}

impl IterationResult {
    pub fn new(
        name: impl Into<String>,
        leaks: BTreeMap<String, LeakItem>,
        memory_stats: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            leaks,
            memory_stats,
        }
    }

    pub fn leak(&self, type_name: &str) -> Option<&LeakItem> {
        self.leaks.get(type_name)
    }
}
