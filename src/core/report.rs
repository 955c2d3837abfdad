use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Stage;

/// A tile dropped from the run under `FailurePolicy::SkipTile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTile {
    pub tile: String,
    pub stage: Stage,
    pub reason: String,
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub workspace: PathBuf,
    pub engine: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Directories wiped before the run
    pub cleared: Vec<PathBuf>,
    pub tiles_found: usize,
    /// Non-directory entries in `input/` that were not treated as tiles
    #[serde(default)]
    pub ignored_entries: usize,
    pub imported: Vec<PathBuf>,
    pub corrected: Vec<PathBuf>,
    pub skipped_tiles: Vec<SkippedTile>,
    pub mosaic: Option<PathBuf>,
    pub cutlines: Option<PathBuf>,
    pub enhanced: Option<PathBuf>,
    pub exported: Option<PathBuf>,
}

impl RunReport {
    pub fn start(workspace: PathBuf, engine: &str) -> Self {
        Self {
            workspace,
            engine: engine.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            cleared: Vec::new(),
            tiles_found: 0,
            ignored_entries: 0,
            imported: Vec::new(),
            corrected: Vec::new(),
            skipped_tiles: Vec::new(),
            mosaic: None,
            cutlines: None,
            enhanced: None,
            exported: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}
