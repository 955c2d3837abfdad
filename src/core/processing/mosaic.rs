use std::path::PathBuf;

use tracing::info;

use crate::core::params::PipelineParams;
use crate::core::workspace::Workspace;
use crate::engine::{Operation, RasterEngine};
use crate::error::Result;

/// Mosaic raster and its companion cutline vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicArtifact {
    pub raster: PathBuf,
    pub cutlines: PathBuf,
}

impl MosaicArtifact {
    pub fn in_workspace(workspace: &Workspace, params: &PipelineParams) -> Self {
        Self {
            raster: workspace.mosaic.join(format!(
                "{}.{}",
                params.mosaic.output_stem,
                params.working_format.extension()
            )),
            cutlines: workspace.mosaic.join(&params.mosaic.cutline_file),
        }
    }
}

/// Single mosaic call over the whole `corrected/` directory
pub fn mosaic_operation(workspace: &Workspace, params: &PipelineParams) -> Operation {
    let artifact = MosaicArtifact::in_workspace(workspace, params);
    Operation::Mosaic {
        input_dir: workspace.corrected.clone(),
        mosaic_type: params.mosaic.mosaic_type,
        format: params.working_format,
        radiometric_correction: params.mosaic.radiometric_correction,
        balance: params.mosaic.balance,
        cutline: params.mosaic.cutline,
        output: artifact.raster,
        cutlines: artifact.cutlines,
    }
}

pub fn build_mosaic<E: RasterEngine + ?Sized>(
    engine: &mut E,
    workspace: &Workspace,
    params: &PipelineParams,
) -> Result<MosaicArtifact> {
    info!("Starting mosaicking of {:?}", workspace.corrected);
    engine.execute(&mosaic_operation(workspace, params))?;
    let artifact = MosaicArtifact::in_workspace(workspace, params);
    info!(
        "Mosaicking completed: {:?} (cutlines {:?})",
        artifact.raster, artifact.cutlines
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mosaic_uses_fixed_names_and_options() {
        let ws = Workspace::new("/ws");
        let op = mosaic_operation(&ws, &PipelineParams::default());
        let args = op.arguments();
        assert!(args.contains(&("input", "/ws/corrected".to_string())));
        assert!(args.contains(&("output", "/ws/mosaic/mosaic_out.pix".to_string())));
        assert!(args.contains(&("cutlines", "/ws/mosaic/cutlines.shp".to_string())));
        assert!(args.contains(&("mosaic_type", "FULL".to_string())));
        assert!(args.contains(&("balance", "NONE".to_string())));
        assert!(args.contains(&("format", "PIX".to_string())));
    }
}
