use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::params::PipelineParams;
use crate::engine::EngineConfig;
use crate::error::{Error, Result};

/// Contents of a JSON configuration file. Every field is optional.
///
/// ```json
/// {
///   "params": { "failure_policy": "SkipTile", "verify_outputs": true },
///   "engine": {
///     "programs": {
///       "import": { "program": "geo-run", "args": ["fimport"] },
///       "masking": { "program": "geo-run", "args": ["masking"] }
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub params: PipelineParams,
    pub engine: EngineConfig,
}

impl PipelineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(Error::config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::config)
    }
}
