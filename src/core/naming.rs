//! File naming rules for pipeline products.
//!
//! All names are pure functions of their inputs. Derived correction products
//! keep the full stem of the imported tile, so `tile1` and `tile10` map to
//! distinct files regardless of stem length.
use std::path::{Path, PathBuf};

use crate::core::params::SourceParams;
use crate::io::sentinel2::TileSource;
use crate::types::RasterFormat;

pub const TILE_PREFIX: &str = "tile";
pub const HAZE_REMOVED_SUFFIX: &str = "_hzrm";
pub const CORRECTED_SUFFIX: &str = "_atcor";

/// `pix/tile<index>.<ext>`
pub fn imported_tile_path(pix_dir: &Path, index: usize, format: RasterFormat) -> PathBuf {
    pix_dir.join(format!("{}{}.{}", TILE_PREFIX, index, format.extension()))
}

/// Engine reference to a tile: descriptor path plus the band-resolution qualifier
pub fn source_descriptor(tile: &TileSource, source: &SourceParams) -> String {
    format!("{}?{}", tile.descriptor.display(), source.qualifier())
}

/// Sibling of `path` named `<stem><suffix>.<ext>`
pub fn derived_path(path: &Path, suffix: &str, format: RasterFormat) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}{}.{}", stem, suffix, format.extension()))
}

/// Intermediate and final names of one tile's correction chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionNames {
    pub haze_removed: PathBuf,
    /// Atmospheric correction output, written next to the imported tile
    pub corrected: PathBuf,
}

impl CorrectionNames {
    pub fn for_tile(imported: &Path, format: RasterFormat) -> Self {
        Self {
            haze_removed: derived_path(imported, HAZE_REMOVED_SUFFIX, format),
            corrected: derived_path(imported, CORRECTED_SUFFIX, format),
        }
    }

    /// Location of the corrected file once moved into `corrected_dir`
    pub fn relocated(&self, corrected_dir: &Path) -> PathBuf {
        match self.corrected.file_name() {
            Some(name) => corrected_dir.join(name),
            None => corrected_dir.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn imported_tiles_are_zero_based() {
        let pix = Path::new("/ws/pix");
        assert_eq!(
            imported_tile_path(pix, 0, RasterFormat::Pix),
            PathBuf::from("/ws/pix/tile0.pix")
        );
        assert_eq!(
            imported_tile_path(pix, 12, RasterFormat::Pix),
            PathBuf::from("/ws/pix/tile12.pix")
        );
    }

    #[test]
    fn correction_names_use_suffixes() {
        let names = CorrectionNames::for_tile(Path::new("/ws/pix/tile0.pix"), RasterFormat::Pix);
        assert_eq!(names.haze_removed, PathBuf::from("/ws/pix/tile0_hzrm.pix"));
        assert_eq!(names.corrected, PathBuf::from("/ws/pix/tile0_atcor.pix"));
        assert_eq!(
            names.relocated(Path::new("/ws/corrected")),
            PathBuf::from("/ws/corrected/tile0_atcor.pix")
        );
    }

    #[test]
    fn double_digit_tiles_do_not_collide_with_single_digit() {
        let pix = Path::new("pix");
        let one = CorrectionNames::for_tile(&imported_tile_path(pix, 1, RasterFormat::Pix), RasterFormat::Pix);
        let ten = CorrectionNames::for_tile(&imported_tile_path(pix, 10, RasterFormat::Pix), RasterFormat::Pix);
        assert_ne!(one.haze_removed, ten.haze_removed);
        assert_ne!(one.corrected, ten.corrected);
    }

    #[test]
    fn short_stems_are_kept_whole() {
        let names = CorrectionNames::for_tile(Path::new("t1.pix"), RasterFormat::Pix);
        assert_eq!(names.haze_removed, PathBuf::from("t1_hzrm.pix"));
        assert_eq!(names.corrected, PathBuf::from("t1_atcor.pix"));
    }

    #[test]
    fn names_are_unique_across_many_tiles() {
        let pix = Path::new("pix");
        let mut seen = HashSet::new();
        for i in 0..250 {
            let imported = imported_tile_path(pix, i, RasterFormat::Pix);
            let names = CorrectionNames::for_tile(&imported, RasterFormat::Pix);
            assert!(seen.insert(imported));
            assert!(seen.insert(names.haze_removed));
            assert!(seen.insert(names.corrected));
        }
    }

    #[test]
    fn naming_is_deterministic() {
        let a = CorrectionNames::for_tile(Path::new("pix/tile3.pix"), RasterFormat::Pix);
        let b = CorrectionNames::for_tile(Path::new("pix/tile3.pix"), RasterFormat::Pix);
        assert_eq!(a, b);
    }

    #[test]
    fn descriptor_carries_resolution_qualifier() {
        let tile = TileSource::new(PathBuf::from("/ws/input/T09UXQ"), "MTD_MSIL1C.xml");
        assert_eq!(
            source_descriptor(&tile, &SourceParams::default()),
            "/ws/input/T09UXQ/MTD_MSIL1C.xml?r=%3ABand+Resolution%3A10M"
        );
    }
}
