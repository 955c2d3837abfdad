use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::naming::CorrectionNames;
use crate::core::params::PipelineParams;
use crate::core::processing::import::TileRecord;
use crate::core::report::SkippedTile;
use crate::core::workspace::Workspace;
use crate::engine::{Operation, RasterEngine};
use crate::error::{Error, Result};
use crate::types::{FailurePolicy, Stage};

/// A tile after masking, haze removal and atmospheric correction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectedTile {
    pub record: TileRecord,
    pub haze_removed: PathBuf,
    /// Final location inside `corrected/`
    pub corrected: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct CorrectionOutcome {
    pub corrected: Vec<CorrectedTile>,
    pub skipped: Vec<SkippedTile>,
}

/// The three correction calls for one imported tile, in execution order.
/// Masks are written back into the imported file and reused by both later steps.
pub fn correction_operations(imported: &Path, params: &PipelineParams) -> (CorrectionNames, [Operation; 3]) {
    let names = CorrectionNames::for_tile(imported, params.working_format);
    let masking = Operation::Masking {
        sensor: params.sensor.clone(),
        input: imported.to_path_buf(),
        haze_coverage: params.masking.haze_coverage.clone(),
        cloud_thresholds: params.masking.cloud_thresholds.clone(),
        output: imported.to_path_buf(),
    };
    let haze = Operation::HazeRemoval {
        sensor: params.sensor.clone(),
        input: imported.to_path_buf(),
        mask_file: imported.to_path_buf(),
        mask_segments: params.haze.mask_segments.clone(),
        haze_coverage: params.haze.haze_coverage.clone(),
        output: names.haze_removed.clone(),
    };
    let atcor = Operation::AtmosphericCorrection {
        sensor: params.sensor.clone(),
        input: names.haze_removed.clone(),
        mask_file: imported.to_path_buf(),
        atmosphere: params.atcor.atmosphere,
        condition: params.atcor.condition,
        output_units: params.atcor.output_units.clone(),
        output: names.corrected.clone(),
    };
    (names, [masking, haze, atcor])
}

// rename fails across filesystems; only then fall back to copy + remove
fn relocate(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

fn remove_if_present(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove partial output {:?}: {}", path, e),
    }
}

/// Run the correction chain for one tile and move the result into `corrected/`
pub fn correct_tile<E: RasterEngine + ?Sized>(
    engine: &mut E,
    workspace: &Workspace,
    record: &TileRecord,
    params: &PipelineParams,
) -> Result<CorrectedTile> {
    let (names, [masking, haze, atcor]) = correction_operations(&record.imported, params);

    info!("Processing masks for {:?}", record.imported);
    engine.execute(&masking)?;
    info!("Masks for {:?} completed", record.imported);

    info!("Processing haze removal (this may take a while)");
    engine.execute(&haze)?;
    info!("Haze removed from {:?}", record.imported);

    info!("Processing atmospheric correction");
    engine.execute(&atcor)?;
    info!("Atmospheric correction of {:?} completed", record.imported);

    let destination = names.relocated(&workspace.corrected);
    relocate(&names.corrected, &destination)?;
    info!("Corrected file moved to {:?}", destination);

    Ok(CorrectedTile {
        record: record.clone(),
        haze_removed: names.haze_removed,
        corrected: destination,
    })
}

/// Correct every imported tile in order, applying the configured failure policy
pub fn correct_all<E: RasterEngine + ?Sized>(
    engine: &mut E,
    workspace: &Workspace,
    records: &[TileRecord],
    params: &PipelineParams,
) -> Result<CorrectionOutcome> {
    let mut outcome = CorrectionOutcome::default();
    for record in records {
        match correct_tile(engine, workspace, record, params) {
            Ok(tile) => outcome.corrected.push(tile),
            Err(e) => match params.failure_policy {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::SkipTile => {
                    warn!("Skipping tile {} ({}): {}", record.index, record.source.name, e);
                    let names = CorrectionNames::for_tile(&record.imported, params.working_format);
                    remove_if_present(&names.haze_removed);
                    remove_if_present(&names.corrected);
                    remove_if_present(&names.relocated(&workspace.corrected));
                    outcome.skipped.push(SkippedTile {
                        tile: record.source.name.clone(),
                        stage: Stage::Correction,
                        reason: e.to_string(),
                    });
                }
            },
        }
    }
    if outcome.corrected.is_empty() && !records.is_empty() {
        return Err(Error::NoCorrectedTiles {
            failed: outcome.skipped.len(),
        });
    }
    Ok(outcome)
}
