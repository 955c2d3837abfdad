use std::path::PathBuf;

use tracing::{info, warn};

use crate::core::naming::{imported_tile_path, source_descriptor};
use crate::core::params::PipelineParams;
use crate::core::workspace::Workspace;
use crate::engine::{Operation, RasterEngine};
use crate::error::{Error, Result};
use crate::io::sentinel2::{TileSource, list_tile_dirs, parse_product_info};

/// A tile after import into the working format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRecord {
    /// Zero-based position in input enumeration order
    pub index: usize,
    pub source: TileSource,
    pub imported: PathBuf,
}

/// Tile folders found under `input/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDiscovery {
    pub tiles: Vec<TileSource>,
    /// Plain files and other non-directory entries left alone
    pub ignored_entries: usize,
}

/// Result of the import stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub records: Vec<TileRecord>,
    pub ignored_entries: usize,
}

/// Tile folders under `input/`, in enumeration order
pub fn discover_tiles(workspace: &Workspace, params: &PipelineParams) -> Result<TileDiscovery> {
    if !workspace.has_input() {
        return Err(Error::MissingInput {
            path: workspace.input.clone(),
        });
    }
    let (dirs, ignored_entries) = list_tile_dirs(&workspace.input)?;
    if ignored_entries > 0 {
        warn!(
            "Ignored {} non-directory entr{} in {:?}",
            ignored_entries,
            if ignored_entries == 1 { "y" } else { "ies" },
            workspace.input
        );
    }
    if dirs.is_empty() {
        return Err(Error::NoTiles {
            path: workspace.input.clone(),
        });
    }
    Ok(TileDiscovery {
        tiles: dirs
            .into_iter()
            .map(|dir| TileSource::new(dir, &params.source.descriptor_name))
            .collect(),
        ignored_entries,
    })
}

/// Import every tile, one engine call per tile, stopping at the first failure
pub fn import_tiles<E: RasterEngine + ?Sized>(
    engine: &mut E,
    workspace: &Workspace,
    params: &PipelineParams,
) -> Result<ImportOutcome> {
    let TileDiscovery {
        tiles,
        ignored_entries,
    } = discover_tiles(workspace, params)?;
    info!("Found {} tile(s) in {:?}", tiles.len(), workspace.input);

    let mut records = Vec::with_capacity(tiles.len());
    for (index, source) in tiles.into_iter().enumerate() {
        if !source.has_descriptor() {
            return Err(Error::MissingDescriptor {
                tile: source.name.clone(),
                path: source.descriptor.clone(),
            });
        }
        match parse_product_info(&source.descriptor) {
            Ok(product) => info!(
                "Tile {}: {} ({} {}, {}, sensed {})",
                index,
                product.product_uri.as_deref().unwrap_or(&source.name),
                product.spacecraft.as_deref().unwrap_or("unknown spacecraft"),
                product.product_type.as_deref().unwrap_or("unknown type"),
                product.processing_level.as_deref().unwrap_or("unknown level"),
                product.sensing_start.as_deref().unwrap_or("unknown")
            ),
            Err(e) => warn!("Could not read product info of {}: {}", source.name, e),
        }

        let output = imported_tile_path(&workspace.pix, index, params.working_format);
        let operation = Operation::Import {
            source: source_descriptor(&source, &params.source),
            output: output.clone(),
        };
        info!("Starting conversion of tile {}", index);
        engine.execute(&operation)?;
        info!("Conversion completed for {}, output to {:?}", source.name, output);

        records.push(TileRecord {
            index,
            source,
            imported: output,
        });
    }
    Ok(ImportOutcome {
        records,
        ignored_entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DryRunEngine;
    use std::fs;
    use tempfile::TempDir;

    fn workspace(tiles: &[(&str, &str)]) -> (TempDir, Workspace) {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path());
        for (name, descriptor) in tiles {
            let dir = ws.input.join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("MTD_MSIL1C.xml"), descriptor).unwrap();
        }
        fs::create_dir_all(&ws.pix).unwrap();
        (tmp, ws)
    }

    #[test]
    fn stray_files_are_counted_not_imported() {
        let (_tmp, ws) = workspace(&[("T09UXQ", "<Product_Info/>")]);
        fs::write(ws.input.join("readme.txt"), "notes").unwrap();
        fs::write(ws.input.join("T09UXQ.zip"), "zip").unwrap();

        let mut engine = DryRunEngine::new();
        let outcome = import_tiles(&mut engine, &ws, &PipelineParams::default()).unwrap();
        assert_eq!(outcome.ignored_entries, 2);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].imported, ws.pix.join("tile0.pix"));
        assert_eq!(engine.operations().len(), 1);
    }

    #[test]
    fn malformed_descriptor_still_imports() {
        let (_tmp, ws) = workspace(&[("broken_xml", "<a></b>")]);
        let mut engine = DryRunEngine::new();
        let outcome = import_tiles(&mut engine, &ws, &PipelineParams::default()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert!(ws.pix.join("tile0.pix").is_file());
    }

    #[test]
    fn only_files_in_input_means_no_tiles() {
        let (_tmp, ws) = workspace(&[]);
        fs::create_dir_all(&ws.input).unwrap();
        fs::write(ws.input.join("S2A.zip"), "zip").unwrap();
        let err = discover_tiles(&ws, &PipelineParams::default()).unwrap_err();
        assert!(matches!(err, Error::NoTiles { .. }));
    }
}
