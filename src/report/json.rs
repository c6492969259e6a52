//! JSON rendering of the run log.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::LeakError;
use crate::leak::RunLog;

/// Pretty-printed JSON for the whole run. Absent optional fields are omitted.
pub fn render_json_string(run_log: &RunLog) -> serde_json::Result<String> {
    serde_json::to_string_pretty(run_log)
}

/// Writes the run log to `path`, replacing any existing file.
pub fn write_report(run_log: &RunLog, path: &Path) -> Result<(), LeakError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LeakError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| LeakError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, run_log).map_err(|source| LeakError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n").map_err(|e| LeakError::io(path, e))?;
    writer.flush().map_err(|e| LeakError::io(path, e))
}

/// Loads a report written by [`write_report`].
pub fn read_report(path: &Path) -> Result<RunLog, LeakError> {
    let text = fs::read_to_string(path).map_err(|e| LeakError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| LeakError::Serialize {
        path: path.to_path_buf(),
        source,
    })
}
