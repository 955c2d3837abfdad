use std::path::Path;
use tracing::info;

use crate::core::report::RunReport;
use crate::error::{Error, Result};

/// Write the run report as pretty-printed JSON, creating parent directories
pub fn write_run_report(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json_string = serde_json::to_string_pretty(report).map_err(Error::config)?;
    std::fs::write(path, json_string)?;
    info!("Wrote run report: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn report_round_trips_through_json() {
        let tmp = TempDir::new().unwrap();
        let mut report = RunReport::start(PathBuf::from("/ws"), "dry-run");
        report.tiles_found = 2;
        report.exported = Some(PathBuf::from("/ws/mosaic/mosaic_enhanced.tif"));
        report.finish();

        let path = tmp.path().join("reports").join("run.json");
        write_run_report(&path, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: RunReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.tiles_found, 2);
        assert_eq!(parsed.engine, "dry-run");
        assert_eq!(parsed.exported, report.exported);
        assert!(parsed.finished_at.is_some());
    }
}
