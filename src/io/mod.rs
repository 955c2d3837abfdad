//! I/O layer: Sentinel-2 tile discovery and descriptor parsing, GDAL-backed
//! raster probing, and `writers` for run reports.
pub mod sentinel2;
pub use sentinel2::{ProductInfo, TileError, TileSource};

pub mod gdal;
pub use gdal::{ProbeError, RasterProbe};

pub mod writers;
