use serde::{Deserialize, Serialize};

/// Live-instance count of one tracked type in one iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeakItem {
    pub class_name: String,
    pub count: u64,
    /// Retention graph file, relative to the output root. Absent when no path was traced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_artifact: Option<String>,
}

impl LeakItem {
    pub fn new(class_name: impl Into<String>, count: u64, path_artifact: Option<String>) -> Self {
        Self {
            class_name: class_name.into(),
            count,
            path_artifact,
        }
    }
}
