use gdal::{Dataset, errors::GdalError as GdalCrateError};
use std::path::Path;
use thiserror::Error;

/// Errors encountered when probing a raster with GDAL
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("No raster bands found in {0}")]
    NoBands(String),
}

/// Shape and georeferencing summary of a raster written by the engine
#[derive(Debug, Clone)]
pub struct RasterProbe {
    /// GDAL driver short name (e.g. "PCIDSK", "GTiff")
    pub driver: String,
    pub size_x: usize,
    pub size_y: usize,
    pub bands: usize,
    /// Projection as EPSG:XXXX when an authority code is present, WKT otherwise
    pub projection: String,
}

// Helper to extract EPSG code from WKT authority tag
fn parse_epsg(wkt: &str) -> Option<String> {
    const KEY: &str = "AUTHORITY[\"EPSG\",\"";
    let start = wkt.rfind(KEY)? + KEY.len();
    let end = wkt[start..].find('"')?;
    Some(format!("EPSG:{}", &wkt[start..start + end]))
}

/// Open a raster read-only and summarise it
pub fn probe<P: AsRef<Path>>(path: P) -> Result<RasterProbe, ProbeError> {
    let path = path.as_ref();
    let dataset = Dataset::open(path)?;
    let (size_x, size_y) = dataset.raster_size();
    let bands = dataset.raster_count() as usize;
    if bands == 0 {
        return Err(ProbeError::NoBands(path.display().to_string()));
    }
    let proj = dataset.projection();
    let projection = parse_epsg(&proj).unwrap_or(proj);
    Ok(RasterProbe {
        driver: dataset.driver().short_name(),
        size_x: size_x as usize,
        size_y: size_y as usize,
        bands,
        projection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsg_code_is_taken_from_last_authority() {
        let wkt = r#"PROJCS["WGS 84 / UTM zone 9N",GEOGCS["WGS 84",AUTHORITY["EPSG","4326"]],AUTHORITY["EPSG","32609"]]"#;
        assert_eq!(parse_epsg(wkt).as_deref(), Some("EPSG:32609"));
    }

    #[test]
    fn wkt_without_authority_has_no_code() {
        assert_eq!(parse_epsg("LOCAL_CS[\"arbitrary\"]"), None);
    }

    #[test]
    fn probing_a_missing_file_fails() {
        assert!(probe("/definitely/not/here.tif").is_err());
    }
}
