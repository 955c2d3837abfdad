use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{
    AtmosphereCondition, AtmosphereDefinition, BalanceMethod, CutlineMethod, DataType,
    FailurePolicy, MosaicType, RadiometricCorrection, RasterFormat,
};

/// Sensor identifier passed to every correction operation
pub const SENTINEL2_SENSOR: &str = "Sentinel-2";

/// Processing parameters suitable for config files. Defaults reproduce the
/// fixed parameterization of the reference workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub sensor: String,
    /// Format of imported, corrected and mosaicked intermediates
    pub working_format: RasterFormat,
    pub source: SourceParams,
    pub masking: MaskingParams,
    pub haze: HazeParams,
    pub atcor: AtcorParams,
    pub mosaic: MosaicParams,
    pub enhance: EnhanceParams,
    pub export: ExportParams,
    pub failure_policy: FailurePolicy,
    /// Probe stage outputs with GDAL after enhancement and export
    pub verify_outputs: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            sensor: SENTINEL2_SENSOR.to_string(),
            working_format: RasterFormat::Pix,
            source: SourceParams::default(),
            masking: MaskingParams::default(),
            haze: HazeParams::default(),
            atcor: AtcorParams::default(),
            mosaic: MosaicParams::default(),
            enhance: EnhanceParams::default(),
            export: ExportParams::default(),
            failure_policy: FailurePolicy::Abort,
            verify_outputs: false,
        }
    }
}

impl PipelineParams {
    /// Reject parameter sets the engine would choke on halfway through a run
    pub fn validate(&self) -> Result<()> {
        if self.sensor.trim().is_empty() {
            return Err(Error::InvalidArgument {
                arg: "sensor",
                value: self.sensor.clone(),
            });
        }
        if self.source.descriptor_name.trim().is_empty() {
            return Err(Error::InvalidArgument {
                arg: "source.descriptor_name",
                value: self.source.descriptor_name.clone(),
            });
        }
        validate_bands("enhance.bands", &self.enhance.bands)?;
        validate_bands("export.bands", &self.export.bands)?;
        // The enhanced mosaic only carries the stretched bands, renumbered from 1
        let available = self.enhance.bands.len() as u32;
        if let Some(band) = self.export.bands.iter().find(|b| **b > available) {
            return Err(Error::InvalidArgument {
                arg: "export.bands",
                value: band.to_string(),
            });
        }
        if self.enhance.exponent == 0 {
            return Err(Error::InvalidArgument {
                arg: "enhance.exponent",
                value: self.enhance.exponent.to_string(),
            });
        }
        if self.enhance.lut_name.trim().is_empty() {
            return Err(Error::InvalidArgument {
                arg: "enhance.lut_name",
                value: self.enhance.lut_name.clone(),
            });
        }
        Ok(())
    }
}

fn validate_bands(arg: &'static str, bands: &[u32]) -> Result<()> {
    let rendered = || {
        bands
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(",")
    };
    if bands.is_empty() || bands.contains(&0) {
        return Err(Error::InvalidArgument {
            arg,
            value: rendered(),
        });
    }
    for (i, band) in bands.iter().enumerate() {
        if bands[..i].contains(band) {
            return Err(Error::InvalidArgument {
                arg,
                value: rendered(),
            });
        }
    }
    Ok(())
}

/// How a tile folder is referenced when handed to the import operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceParams {
    /// Metadata descriptor expected inside every tile folder
    pub descriptor_name: String,
    /// Band resolution selected through the descriptor qualifier (e.g. "10M")
    pub resolution: String,
}

impl Default for SourceParams {
    fn default() -> Self {
        Self {
            descriptor_name: "MTD_MSIL1C.xml".to_string(),
            resolution: "10M".to_string(),
        }
    }
}

impl SourceParams {
    /// URL-encoded qualifier appended to the descriptor path
    pub fn qualifier(&self) -> String {
        format!("r=%3ABand+Resolution%3A{}", self.resolution)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingParams {
    pub haze_coverage: Vec<u32>,
    /// Cloud reflectance thresholds
    pub cloud_thresholds: Vec<u32>,
}

impl Default for MaskingParams {
    fn default() -> Self {
        Self {
            haze_coverage: vec![70],
            cloud_thresholds: vec![17, 22, 1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazeParams {
    /// Mask channels written by the masking step
    pub mask_segments: Vec<u32>,
    pub haze_coverage: Vec<u32>,
}

impl Default for HazeParams {
    fn default() -> Self {
        Self {
            mask_segments: vec![2, 3, 4],
            haze_coverage: vec![50],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtcorParams {
    pub atmosphere: AtmosphereDefinition,
    pub condition: AtmosphereCondition,
    pub output_units: String,
}

impl Default for AtcorParams {
    fn default() -> Self {
        Self {
            atmosphere: AtmosphereDefinition::Maritime,
            condition: AtmosphereCondition::Subarctic,
            output_units: "Scaled_Reflectance,10.00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicParams {
    pub mosaic_type: MosaicType,
    pub radiometric_correction: RadiometricCorrection,
    pub balance: BalanceMethod,
    pub cutline: CutlineMethod,
    /// File stem of the mosaic raster inside `mosaic/`
    pub output_stem: String,
    /// Cutline vector file name inside `mosaic/`
    pub cutline_file: String,
}

impl Default for MosaicParams {
    fn default() -> Self {
        Self {
            mosaic_type: MosaicType::Full,
            radiometric_correction: RadiometricCorrection::None,
            balance: BalanceMethod::None,
            cutline: CutlineMethod::MinDiff,
            output_stem: "mosaic_out".to_string(),
            cutline_file: "cutlines.shp".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    /// Bands stretched, in processing order; also the LUT segment keys
    pub bands: Vec<u32>,
    /// Stretch exponent; 1 is linear
    pub exponent: u32,
    pub lut_name: String,
    pub lut_description: String,
    pub data_type: DataType,
    pub output_stem: String,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            bands: vec![4, 3, 2],
            exponent: 1,
            lut_name: "LinLUT".to_string(),
            lut_description: "Linear Stretch".to_string(),
            data_type: DataType::U16,
            output_stem: "mosaic_enhanced".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportParams {
    /// Bands of the enhanced mosaic, renumbered 1..n by the LUT step
    pub bands: Vec<u32>,
    pub format: RasterFormat,
    pub output_stem: String,
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            bands: vec![1, 2, 3],
            format: RasterFormat::Tif,
            output_stem: "mosaic_enhanced".to_string(),
        }
    }
}
