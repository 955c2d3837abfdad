use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::params::PipelineParams;
use crate::core::processing::mosaic::MosaicArtifact;
use crate::core::workspace::Workspace;
use crate::engine::{Operation, RasterEngine};
use crate::error::Result;

pub fn enhanced_path(workspace: &Workspace, params: &PipelineParams) -> PathBuf {
    workspace.mosaic.join(format!(
        "{}.{}",
        params.enhance.output_stem,
        params.working_format.extension()
    ))
}

/// One stretch per band (in configured order, each into the LUT segment keyed
/// by that band), followed by a single LUT application into `output`.
pub fn enhancement_operations(input: &Path, output: &Path, params: &PipelineParams) -> Vec<Operation> {
    let enhance = &params.enhance;
    let mut operations: Vec<Operation> = enhance
        .bands
        .iter()
        .map(|&band| Operation::Stretch {
            file: input.to_path_buf(),
            band,
            lut_name: enhance.lut_name.clone(),
            lut_description: enhance.lut_description.clone(),
            exponent: enhance.exponent,
        })
        .collect();
    operations.push(Operation::ApplyLut {
        input: input.to_path_buf(),
        bands: enhance.bands.clone(),
        lut_segments: enhance.bands.clone(),
        data_type: enhance.data_type,
        format: params.working_format,
        output: output.to_path_buf(),
    });
    operations
}

pub fn enhance<E: RasterEngine + ?Sized>(
    engine: &mut E,
    workspace: &Workspace,
    mosaic: &MosaicArtifact,
    params: &PipelineParams,
) -> Result<PathBuf> {
    let output = enhanced_path(workspace, params);
    let mut operations = enhancement_operations(&mosaic.raster, &output, params);
    let apply = operations.pop();

    info!("Generating look-up tables for enhancement");
    for operation in &operations {
        engine.execute(operation)?;
    }
    info!("LUT generation complete");

    if let Some(apply) = apply {
        info!("Applying enhancement");
        engine.execute(&apply)?;
    }
    info!("Mosaic enhancement complete: {:?}", output);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band_plan(ops: &[Operation]) -> (Vec<u32>, Vec<u32>, Vec<u32>) {
        let stretched = ops
            .iter()
            .filter_map(|op| match op {
                Operation::Stretch { band, exponent, .. } => {
                    assert_eq!(*exponent, 1);
                    Some(*band)
                }
                _ => None,
            })
            .collect();
        match ops.last() {
            Some(Operation::ApplyLut {
                bands,
                lut_segments,
                ..
            }) => (stretched, bands.clone(), lut_segments.clone()),
            other => panic!("expected LUT application last, got {:?}", other),
        }
    }

    #[test]
    fn stretches_bands_in_order_then_applies_once() {
        let ops = enhancement_operations(
            Path::new("mosaic/mosaic_out.pix"),
            Path::new("mosaic/mosaic_enhanced.pix"),
            &PipelineParams::default(),
        );
        assert_eq!(ops.len(), 4);
        let (stretched, bands, segments) = band_plan(&ops);
        assert_eq!(stretched, vec![4, 3, 2]);
        assert_eq!(bands, vec![4, 3, 2]);
        assert_eq!(segments, vec![4, 3, 2]);
        assert!(ops[3].arguments().contains(&("data_type", "16U".to_string())));
    }

    #[test]
    fn reapplying_on_enhanced_mosaic_keeps_band_plan() {
        let params = PipelineParams::default();
        let first = enhancement_operations(
            Path::new("mosaic/mosaic_out.pix"),
            Path::new("mosaic/mosaic_enhanced.pix"),
            &params,
        );
        let second = enhancement_operations(
            Path::new("mosaic/mosaic_enhanced.pix"),
            Path::new("mosaic/mosaic_enhanced2.pix"),
            &params,
        );
        assert_eq!(band_plan(&first), band_plan(&second));
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn stretch_segments_are_distinct_per_band() {
        let ops = enhancement_operations(
            Path::new("m.pix"),
            Path::new("e.pix"),
            &PipelineParams::default(),
        );
        let (stretched, _, _) = band_plan(&ops);
        let mut unique = stretched.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), stretched.len());
    }
}
