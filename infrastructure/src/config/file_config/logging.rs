use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL dispatch log (one record per dispatch attempt)
    pub dispatch_log: Option<PathBuf>,
    /// Also write diagnostic logs to this file
    pub file: Option<PathBuf>,
}
