use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors encountered when reading Sentinel-2 tile folders
#[derive(Debug, Error)]
pub enum TileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Product-level fields of a Sentinel-2 user product descriptor (MTD_MSIL1C.xml / MTD_MSIL2A.xml)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInfo {
    pub product_uri: Option<String>,
    pub spacecraft: Option<String>,
    pub product_type: Option<String>,
    pub processing_level: Option<String>,
    pub sensing_start: Option<String>,
}

/// One tile folder below the workspace `input/` directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    /// Folder name, used to build the engine-facing reference
    pub name: String,
    pub dir: PathBuf,
    /// Metadata descriptor inside the folder
    pub descriptor: PathBuf,
}

impl TileSource {
    pub fn new(dir: PathBuf, descriptor_name: &str) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let descriptor = dir.join(descriptor_name);
        Self {
            name,
            dir,
            descriptor,
        }
    }

    pub fn has_descriptor(&self) -> bool {
        self.descriptor.is_file()
    }
}

/// Immediate subdirectories of `input_dir`, sorted by name.
/// Returns the directories and the number of skipped non-directory entries.
pub fn list_tile_dirs(input_dir: &Path) -> Result<(Vec<PathBuf>, usize), TileError> {
    let mut dirs = Vec::new();
    let mut skipped = 0;
    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else {
            info!("Skipping non-directory input entry: {:?}", path);
            skipped += 1;
        }
    }
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok((dirs, skipped))
}

/// Parse the general product information of a tile descriptor
pub fn parse_product_info(path: &Path) -> Result<ProductInfo, TileError> {
    let mut reader = Reader::from_file(path)?;
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut curr = String::new();
    let mut info = ProductInfo::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                curr = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
            }
            Event::End(_) => curr.clear(),
            Event::Text(e) => {
                let txt = e.unescape()?.to_string();
                // First occurrence wins; granule sections repeat some tags
                let slot = match curr.as_str() {
                    "PRODUCT_URI" => Some(&mut info.product_uri),
                    "SPACECRAFT_NAME" => Some(&mut info.spacecraft),
                    "PRODUCT_TYPE" => Some(&mut info.product_type),
                    "PROCESSING_LEVEL" => Some(&mut info.processing_level),
                    "PRODUCT_START_TIME" => Some(&mut info.sensing_start),
                    _ => None,
                };
                if let Some(slot) = slot {
                    if slot.is_none() {
                        *slot = Some(txt);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(info)
}
