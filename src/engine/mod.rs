//! Boundary to the external geospatial processing engine.
//!
//! Every image-processing step of the pipeline is described as a typed
//! [`Operation`] and handed to a [`RasterEngine`]. The crate never looks
//! inside a raster; engines decide how an operation is carried out.
//! [`CommandEngine`] runs configured external programs, [`DryRunEngine`]
//! records operations and creates empty placeholder outputs.
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    AtmosphereCondition, AtmosphereDefinition, BalanceMethod, CutlineMethod, DataType, MosaicType,
    RadiometricCorrection, RasterFormat,
};

pub mod command;
pub mod dry_run;

pub use command::{CommandEngine, CommandSpec, EngineConfig};
pub use dry_run::DryRunEngine;

/// Errors reported by an engine while executing an operation
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{operation}: no program configured")]
    NotConfigured { operation: OperationKind },

    #[error("{operation}: failed to launch `{program}`: {source}")]
    Spawn {
        operation: OperationKind,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation}: `{program}` exited with {status}: {stderr}")]
    Failed {
        operation: OperationKind,
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{operation}: cannot write {}: {source}", path.display())]
    Output {
        operation: OperationKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation}: {message}")]
    Rejected {
        operation: OperationKind,
        message: String,
    },
}

/// Kinds of external operation, used as keys in engine configuration
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Import,
    Masking,
    HazeRemoval,
    AtmosphericCorrection,
    Mosaic,
    Stretch,
    ApplyLut,
    Export,
}

impl OperationKind {
    pub const ALL: [OperationKind; 8] = [
        OperationKind::Import,
        OperationKind::Masking,
        OperationKind::HazeRemoval,
        OperationKind::AtmosphericCorrection,
        OperationKind::Mosaic,
        OperationKind::Stretch,
        OperationKind::ApplyLut,
        OperationKind::Export,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Import => "import",
            OperationKind::Masking => "masking",
            OperationKind::HazeRemoval => "haze_removal",
            OperationKind::AtmosphericCorrection => "atmospheric_correction",
            OperationKind::Mosaic => "mosaic",
            OperationKind::Stretch => "stretch",
            OperationKind::ApplyLut => "apply_lut",
            OperationKind::Export => "export",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One call into the processing engine with its full parameterization
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Convert a tile (referenced through its qualified descriptor) to the working format
    Import { source: String, output: PathBuf },

    /// Generate cloud/haze masks; `output` is normally the input file itself
    Masking {
        sensor: String,
        input: PathBuf,
        haze_coverage: Vec<u32>,
        cloud_thresholds: Vec<u32>,
        output: PathBuf,
    },

    HazeRemoval {
        sensor: String,
        input: PathBuf,
        mask_file: PathBuf,
        mask_segments: Vec<u32>,
        haze_coverage: Vec<u32>,
        output: PathBuf,
    },

    AtmosphericCorrection {
        sensor: String,
        input: PathBuf,
        mask_file: PathBuf,
        atmosphere: AtmosphereDefinition,
        condition: AtmosphereCondition,
        output_units: String,
        output: PathBuf,
    },

    Mosaic {
        input_dir: PathBuf,
        mosaic_type: MosaicType,
        format: RasterFormat,
        radiometric_correction: RadiometricCorrection,
        balance: BalanceMethod,
        cutline: CutlineMethod,
        output: PathBuf,
        cutlines: PathBuf,
    },

    /// Compute a stretch LUT for one band and store it in a LUT segment of `file`
    Stretch {
        file: PathBuf,
        band: u32,
        lut_name: String,
        lut_description: String,
        exponent: u32,
    },

    ApplyLut {
        input: PathBuf,
        bands: Vec<u32>,
        lut_segments: Vec<u32>,
        data_type: DataType,
        format: RasterFormat,
        output: PathBuf,
    },

    Export {
        input: PathBuf,
        bands: Vec<u32>,
        format: RasterFormat,
        output: PathBuf,
    },
}

fn join_list(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Import { .. } => OperationKind::Import,
            Operation::Masking { .. } => OperationKind::Masking,
            Operation::HazeRemoval { .. } => OperationKind::HazeRemoval,
            Operation::AtmosphericCorrection { .. } => OperationKind::AtmosphericCorrection,
            Operation::Mosaic { .. } => OperationKind::Mosaic,
            Operation::Stretch { .. } => OperationKind::Stretch,
            Operation::ApplyLut { .. } => OperationKind::ApplyLut,
            Operation::Export { .. } => OperationKind::Export,
        }
    }

    /// Named arguments in a stable order, values rendered the way the engine expects them
    pub fn arguments(&self) -> Vec<(&'static str, String)> {
        match self {
            Operation::Import { source, output } => vec![
                ("input", source.clone()),
                ("output", path_arg(output)),
            ],
            Operation::Masking {
                sensor,
                input,
                haze_coverage,
                cloud_thresholds,
                output,
            } => vec![
                ("input", path_arg(input)),
                ("sensor", sensor.clone()),
                ("haze_coverage", join_list(haze_coverage)),
                ("cloud_thresholds", join_list(cloud_thresholds)),
                ("output", path_arg(output)),
            ],
            Operation::HazeRemoval {
                sensor,
                input,
                mask_file,
                mask_segments,
                haze_coverage,
                output,
            } => vec![
                ("input", path_arg(input)),
                ("sensor", sensor.clone()),
                ("mask_file", path_arg(mask_file)),
                ("mask_segments", join_list(mask_segments)),
                ("haze_coverage", join_list(haze_coverage)),
                ("output", path_arg(output)),
            ],
            Operation::AtmosphericCorrection {
                sensor,
                input,
                mask_file,
                atmosphere,
                condition,
                output_units,
                output,
            } => vec![
                ("input", path_arg(input)),
                ("sensor", sensor.clone()),
                ("mask_file", path_arg(mask_file)),
                ("atmosphere", atmosphere.to_string()),
                ("condition", condition.to_string()),
                ("output_units", output_units.clone()),
                ("output", path_arg(output)),
            ],
            Operation::Mosaic {
                input_dir,
                mosaic_type,
                format,
                radiometric_correction,
                balance,
                cutline,
                output,
                cutlines,
            } => vec![
                ("input", path_arg(input_dir)),
                ("mosaic_type", mosaic_type.to_string()),
                ("output", path_arg(output)),
                ("format", format.to_string()),
                ("radiometric_correction", radiometric_correction.to_string()),
                ("balance", balance.to_string()),
                ("cutline_method", cutline.to_string()),
                ("cutlines", path_arg(cutlines)),
            ],
            Operation::Stretch {
                file,
                band,
                lut_name,
                lut_description,
                exponent,
            } => vec![
                ("file", path_arg(file)),
                ("band", band.to_string()),
                ("lut_name", lut_name.clone()),
                ("lut_description", lut_description.clone()),
                ("exponent", exponent.to_string()),
            ],
            Operation::ApplyLut {
                input,
                bands,
                lut_segments,
                data_type,
                format,
                output,
            } => vec![
                ("input", path_arg(input)),
                ("bands", join_list(bands)),
                ("lut_segments", join_list(lut_segments)),
                ("output", path_arg(output)),
                ("data_type", data_type.to_string()),
                ("format", format.to_string()),
            ],
            Operation::Export {
                input,
                bands,
                format,
                output,
            } => vec![
                ("input", path_arg(input)),
                ("output", path_arg(output)),
                ("bands", join_list(bands)),
                ("format", format.to_string()),
            ],
        }
    }

    /// Files this operation writes. In-place operations report their target file.
    pub fn outputs(&self) -> Vec<&Path> {
        match self {
            Operation::Import { output, .. }
            | Operation::Masking { output, .. }
            | Operation::HazeRemoval { output, .. }
            | Operation::AtmosphericCorrection { output, .. }
            | Operation::ApplyLut { output, .. }
            | Operation::Export { output, .. } => vec![output.as_path()],
            Operation::Mosaic {
                output, cutlines, ..
            } => vec![output.as_path(), cutlines.as_path()],
            Operation::Stretch { file, .. } => vec![file.as_path()],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        for (key, value) in self.arguments() {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// A geospatial processing backend able to execute pipeline operations.
///
/// Calls are blocking and strictly sequential; an error aborts the current
/// operation and is surfaced to the stage that issued it.
pub trait RasterEngine {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn execute(&mut self, operation: &Operation) -> Result<(), EngineError>;

    /// Whether outputs are real rasters that GDAL can open
    fn produces_rasters(&self) -> bool {
        true
    }
}

impl<E: RasterEngine + ?Sized> RasterEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&mut self, operation: &Operation) -> Result<(), EngineError> {
        (**self).execute(operation)
    }

    fn produces_rasters(&self) -> bool {
        (**self).produces_rasters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_arguments_render_lists() {
        let op = Operation::Masking {
            sensor: "Sentinel-2".to_string(),
            input: PathBuf::from("pix/tile0.pix"),
            haze_coverage: vec![70],
            cloud_thresholds: vec![17, 22, 1],
            output: PathBuf::from("pix/tile0.pix"),
        };
        let args = op.arguments();
        assert_eq!(args[0], ("input", "pix/tile0.pix".to_string()));
        assert!(args.contains(&("haze_coverage", "70".to_string())));
        assert!(args.contains(&("cloud_thresholds", "17,22,1".to_string())));
        assert_eq!(op.kind(), OperationKind::Masking);
    }

    #[test]
    fn mosaic_writes_raster_and_cutlines() {
        let op = Operation::Mosaic {
            input_dir: PathBuf::from("corrected"),
            mosaic_type: MosaicType::Full,
            format: RasterFormat::Pix,
            radiometric_correction: RadiometricCorrection::None,
            balance: BalanceMethod::None,
            cutline: CutlineMethod::MinDiff,
            output: PathBuf::from("mosaic/mosaic_out.pix"),
            cutlines: PathBuf::from("mosaic/cutlines.shp"),
        };
        assert_eq!(
            op.outputs(),
            vec![
                Path::new("mosaic/mosaic_out.pix"),
                Path::new("mosaic/cutlines.shp")
            ]
        );
        let line = op.to_string();
        assert!(line.starts_with("mosaic input=corrected"));
        assert!(line.contains("cutline_method=MINDIFF"));
        assert!(line.contains("radiometric_correction=NONE"));
    }

    #[test]
    fn operation_kinds_serialize_snake_case() {
        let json = serde_json::to_string(&OperationKind::AtmosphericCorrection).unwrap();
        assert_eq!(json, "\"atmospheric_correction\"");
        for kind in OperationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
