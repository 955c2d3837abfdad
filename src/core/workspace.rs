//! Workspace layout and the destructive preparation step.
//!
//! A workspace is a root directory with four fixed subdirectories:
//! `input/` (read-only for the pipeline), `pix/`, `corrected/` and `mosaic/`.
//! Preparation deletes and recreates the three mutable directories; this is
//! irreversible and must only happen after the operator confirmed the run.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;

pub const INPUT_DIR: &str = "input";
pub const PIX_DIR: &str = "pix";
pub const CORRECTED_DIR: &str = "corrected";
pub const MOSAIC_DIR: &str = "mosaic";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
    pub input: PathBuf,
    pub pix: PathBuf,
    pub corrected: PathBuf,
    pub mosaic: PathBuf,
}

/// What `Workspace::prepare` did to each directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareReport {
    pub input_present: bool,
    /// Directories that existed and were wiped
    pub cleared: Vec<PathBuf>,
    /// Directories that did not exist and were created
    pub created: Vec<PathBuf>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            input: root.join(INPUT_DIR),
            pix: root.join(PIX_DIR),
            corrected: root.join(CORRECTED_DIR),
            mosaic: root.join(MOSAIC_DIR),
            root,
        }
    }

    /// The directories `prepare` clears, in clearing order
    pub fn mutable_dirs(&self) -> [&Path; 3] {
        [
            self.corrected.as_path(),
            self.pix.as_path(),
            self.mosaic.as_path(),
        ]
    }

    pub fn has_input(&self) -> bool {
        self.input.is_dir()
    }

    /// Delete and recreate `corrected/`, `pix/` and `mosaic/`.
    ///
    /// A missing `input/` directory is only reported; `input/` is never
    /// created or modified here.
    pub fn prepare(&self) -> Result<PrepareReport> {
        let mut report = PrepareReport {
            input_present: self.has_input(),
            ..Default::default()
        };
        if !report.input_present {
            warn!("Missing input folder: {:?}", self.input);
            warn!("Add unzipped Sentinel-2 tiles to the input folder");
        }

        for dir in self.mutable_dirs() {
            if dir.is_dir() {
                warn!("Clearing {:?}", dir);
                fs::remove_dir_all(dir)?;
                fs::create_dir(dir)?;
                report.cleared.push(dir.to_path_buf());
            } else {
                if dir.exists() {
                    // A stray file where a directory belongs
                    warn!("Replacing non-directory {:?}", dir);
                    fs::remove_file(dir)?;
                }
                fs::create_dir_all(dir)?;
                info!("Created {:?}", dir);
                report.created.push(dir.to_path_buf());
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn is_empty_dir(path: &Path) -> bool {
        path.is_dir() && fs::read_dir(path).unwrap().next().is_none()
    }

    #[test]
    fn derives_fixed_subdirectories() {
        let ws = Workspace::new("/data/mosaic");
        assert_eq!(ws.input, PathBuf::from("/data/mosaic/input"));
        assert_eq!(ws.pix, PathBuf::from("/data/mosaic/pix"));
        assert_eq!(ws.corrected, PathBuf::from("/data/mosaic/corrected"));
        assert_eq!(ws.mosaic, PathBuf::from("/data/mosaic/mosaic"));
    }

    #[test]
    fn creates_missing_directories_without_touching_input() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path());
        let report = ws.prepare().unwrap();
        assert!(!report.input_present);
        assert!(!ws.input.exists());
        assert_eq!(report.created.len(), 3);
        assert!(report.cleared.is_empty());
        for dir in ws.mutable_dirs() {
            assert!(is_empty_dir(dir));
        }
    }

    #[test]
    fn clears_previous_run_and_keeps_input() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path());
        fs::create_dir_all(ws.input.join("T09UXQ")).unwrap();
        fs::write(ws.input.join("T09UXQ").join("MTD_MSIL1C.xml"), "<x/>").unwrap();
        fs::create_dir_all(ws.pix.join("nested")).unwrap();
        fs::write(ws.pix.join("nested").join("tile0.pix"), "old").unwrap();
        fs::create_dir_all(&ws.corrected).unwrap();
        fs::write(ws.corrected.join("tile0_atcor.pix"), "old").unwrap();
        // mosaic/ left as a stray file
        fs::write(&ws.mosaic, "not a directory").unwrap();

        let report = ws.prepare().unwrap();
        assert!(report.input_present);
        assert_eq!(report.cleared, vec![ws.corrected.clone(), ws.pix.clone()]);
        assert_eq!(report.created, vec![ws.mosaic.clone()]);
        for dir in ws.mutable_dirs() {
            assert!(is_empty_dir(dir));
        }
        assert!(ws.input.join("T09UXQ").join("MTD_MSIL1C.xml").is_file());
    }

    #[test]
    fn preparing_twice_is_stable() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path());
        ws.prepare().unwrap();
        let second = ws.prepare().unwrap();
        assert_eq!(second.cleared.len(), 3);
        for dir in ws.mutable_dirs() {
            assert!(is_empty_dir(dir));
        }
    }
}
