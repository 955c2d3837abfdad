use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::params::PipelineParams;
use crate::core::workspace::Workspace;
use crate::engine::{Operation, RasterEngine};
use crate::error::Result;

pub fn exported_path(workspace: &Workspace, params: &PipelineParams) -> PathBuf {
    workspace.mosaic.join(format!(
        "{}.{}",
        params.export.output_stem,
        params.export.format.extension()
    ))
}

pub fn export_operation(enhanced: &Path, output: &Path, params: &PipelineParams) -> Operation {
    Operation::Export {
        input: enhanced.to_path_buf(),
        bands: params.export.bands.clone(),
        format: params.export.format,
        output: output.to_path_buf(),
    }
}

pub fn export<E: RasterEngine + ?Sized>(
    engine: &mut E,
    workspace: &Workspace,
    enhanced: &Path,
    params: &PipelineParams,
) -> Result<PathBuf> {
    let output = exported_path(workspace, params);
    info!("Exporting mosaic to {} format", params.export.format);
    engine.execute(&export_operation(enhanced, &output, params))?;
    info!("Format conversion complete: {:?}", output);
    Ok(output)
}
