//! Shared types and enums used across s2mosaic.
//! Includes raster formats (`RasterFormat`), mosaic options (`MosaicType`,
//! `RadiometricCorrection`, `BalanceMethod`, `CutlineMethod`), atmosphere
//! settings, output data types, the tile `FailurePolicy`, pipeline `Stage` and
//! the CLI `EngineKind`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Raster file formats understood by the engine
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum RasterFormat {
    /// Working format used for every intermediate product
    Pix,
    /// GeoTIFF, used for the exported image
    Tif,
}

impl RasterFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Pix => "pix",
            RasterFormat::Tif => "tif",
        }
    }
}

impl std::fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterFormat::Pix => write!(f, "PIX"),
            RasterFormat::Tif => write!(f, "TIF"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum MosaicType {
    Full,
}

impl std::fmt::Display for MosaicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MosaicType::Full => write!(f, "FULL"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum RadiometricCorrection {
    None,
}

impl std::fmt::Display for RadiometricCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RadiometricCorrection::None => write!(f, "NONE"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum BalanceMethod {
    None,
}

impl std::fmt::Display for BalanceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceMethod::None => write!(f, "NONE"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum CutlineMethod {
    /// Minimum difference between overlapping tiles
    MinDiff,
}

impl std::fmt::Display for CutlineMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CutlineMethod::MinDiff => write!(f, "MINDIFF"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum AtmosphereDefinition {
    Rural,
    Urban,
    Maritime,
    Desert,
}

impl std::fmt::Display for AtmosphereDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AtmosphereDefinition::Rural => "Rural",
            AtmosphereDefinition::Urban => "Urban",
            AtmosphereDefinition::Maritime => "Maritime",
            AtmosphereDefinition::Desert => "Desert",
        };
        write!(f, "{}", s)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum AtmosphereCondition {
    Tropical,
    Midlatitude,
    Subarctic,
}

impl std::fmt::Display for AtmosphereCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AtmosphereCondition::Tropical => "tropical",
            AtmosphereCondition::Midlatitude => "midlatitude",
            AtmosphereCondition::Subarctic => "subarctic",
        };
        write!(f, "{}", s)
    }
}

/// Pixel data type of a LUT output
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum DataType {
    U8,
    U16,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::U8 => write!(f, "8U"),
            DataType::U16 => write!(f, "16U"),
        }
    }
}

/// What to do when a single tile fails during correction
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
pub enum FailurePolicy {
    /// Stop the whole run on the first failing tile
    #[default]
    Abort,
    /// Log the failure, drop the tile and keep going
    SkipTile,
}

/// The five sequential pipeline stages
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Stage {
    Import,
    Correction,
    Mosaic,
    Enhancement,
    Export,
}

impl Stage {
    /// 1-based step number shown in the console separator
    pub fn step(&self) -> usize {
        match self {
            Stage::Import => 1,
            Stage::Correction => 2,
            Stage::Mosaic => 3,
            Stage::Enhancement => 4,
            Stage::Export => 5,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Import => "Import",
            Stage::Correction => "Correction",
            Stage::Mosaic => "Mosaic",
            Stage::Enhancement => "Enhancement",
            Stage::Export => "Export",
        };
        write!(f, "{}", s)
    }
}

/// Engine selected on the command line
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
pub enum EngineKind {
    /// External programs configured per operation
    #[default]
    Command,
    /// Log operations and write empty placeholders
    DryRun,
}
