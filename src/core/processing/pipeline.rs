use std::path::Path;

use tracing::{info, warn};

use crate::core::params::PipelineParams;
use crate::core::processing::correction::correct_all;
use crate::core::processing::enhance::enhance;
use crate::core::processing::export::export;
use crate::core::processing::import::import_tiles;
use crate::core::processing::mosaic::build_mosaic;
use crate::core::report::RunReport;
use crate::core::workspace::{PrepareReport, Workspace};
use crate::engine::RasterEngine;
use crate::error::{Error, Result};
use crate::io::gdal::probe;
use crate::types::Stage;

fn stage_banner(stage: Stage) {
    info!("{} Step {}: {} {}", "-".repeat(20), stage.step(), stage, "-".repeat(20));
}

/// The fixed five-stage run: import, correct, mosaic, enhance, export.
///
/// Stages run strictly in order and each consumes the previous stage's
/// return value. Nothing is resumable; after a failure the next run starts
/// again from workspace preparation.
pub struct Pipeline<E: RasterEngine> {
    workspace: Workspace,
    params: PipelineParams,
    engine: E,
}

impl<E: RasterEngine> Pipeline<E> {
    pub fn new(workspace: Workspace, params: PipelineParams, engine: E) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            workspace,
            params,
            engine,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Irreversibly clear the mutable workspace directories
    pub fn prepare(&self) -> Result<PrepareReport> {
        self.workspace.prepare()
    }

    /// Prepare the workspace, then run every stage
    pub fn run(&mut self) -> Result<RunReport> {
        let prepared = self.prepare()?;
        let mut report = self.execute()?;
        report.cleared = prepared.cleared;
        Ok(report)
    }

    /// Run every stage against an already prepared workspace
    pub fn execute(&mut self) -> Result<RunReport> {
        let workspace = &self.workspace;
        let params = &self.params;
        let engine = &mut self.engine;
        let mut report = RunReport::start(workspace.root.clone(), engine.name());

        stage_banner(Stage::Import);
        let imported = import_tiles(engine, workspace, params)?;
        let records = imported.records;
        report.tiles_found = records.len();
        report.ignored_entries = imported.ignored_entries;
        report.imported = records.iter().map(|r| r.imported.clone()).collect();

        stage_banner(Stage::Correction);
        let outcome = correct_all(engine, workspace, &records, params)?;
        report.corrected = outcome.corrected.iter().map(|t| t.corrected.clone()).collect();
        report.skipped_tiles = outcome.skipped;

        stage_banner(Stage::Mosaic);
        let mosaic = build_mosaic(engine, workspace, params)?;
        report.mosaic = Some(mosaic.raster.clone());
        report.cutlines = Some(mosaic.cutlines.clone());

        stage_banner(Stage::Enhancement);
        let enhanced = enhance(engine, workspace, &mosaic, params)?;
        report.enhanced = Some(enhanced.clone());

        stage_banner(Stage::Export);
        let exported = export(engine, workspace, &enhanced, params)?;
        report.exported = Some(exported.clone());

        if params.verify_outputs {
            if engine.produces_rasters() {
                verify_raster(&enhanced, params.enhance.bands.len())?;
                verify_raster(&exported, params.export.bands.len())?;
            } else {
                warn!(
                    "Skipping output verification: engine `{}` does not write rasters",
                    engine.name()
                );
            }
        }

        report.finish();
        info!(
            "Pipeline finished: {} tile(s) corrected, {} skipped, final image {:?}",
            report.corrected.len(),
            report.skipped_tiles.len(),
            exported
        );
        Ok(report)
    }
}

/// Open `path` with GDAL and check its band count
pub fn verify_raster(path: &Path, expected_bands: usize) -> Result<()> {
    let summary = probe(path)?;
    info!(
        "Verified {:?}: {} {}x{} with {} band(s), projection {}",
        path, summary.driver, summary.size_x, summary.size_y, summary.bands, summary.projection
    );
    if summary.bands != expected_bands {
        return Err(Error::Verification {
            path: path.to_path_buf(),
            reason: format!("expected {} band(s), found {}", expected_bands, summary.bands),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdal::DriverManager;
    use tempfile::TempDir;

    fn write_geotiff(path: &Path, bands: usize) {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let ds = driver
            .create_with_band_type::<u8, _>(path, 8, 4, bands)
            .unwrap();
        drop(ds);
    }

    #[test]
    fn band_count_mismatch_fails_verification() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mosaic_enhanced.tif");
        write_geotiff(&path, 1);

        let err = verify_raster(&path, 3).unwrap_err();
        match err {
            Error::Verification { path: failed, reason } => {
                assert_eq!(failed, path);
                assert!(reason.contains("expected 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
        verify_raster(&path, 1).unwrap();
    }

    #[test]
    fn unreadable_output_fails_verification() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mosaic_enhanced.pix");
        std::fs::write(&path, b"").unwrap();
        assert!(matches!(verify_raster(&path, 3), Err(Error::Gdal(_))));
    }
}
