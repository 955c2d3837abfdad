//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, engine and GDAL errors, and provides semantic variants
//! for workspace problems, argument validation and output verification.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] crate::engine::EngineError),

    #[error("GDAL probe error: {0}")]
    Gdal(#[from] crate::io::ProbeError),

    #[error("Tile reader error: {0}")]
    Tile(#[from] crate::io::TileError),

    #[error("Input directory not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("No tile directories found in {}", path.display())]
    NoTiles { path: PathBuf },

    #[error("Tile {tile} has no metadata descriptor at {}", path.display())]
    MissingDescriptor { tile: String, path: PathBuf },

    #[error("Every tile failed correction ({failed} failed)")]
    NoCorrectedTiles { failed: usize },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Verification failed for {}: {reason}", path.display())]
    Verification { path: PathBuf, reason: String },
}

impl Error {
    pub fn config<E: std::fmt::Display>(e: E) -> Self {
        Error::Config(e.to_string())
    }
}
