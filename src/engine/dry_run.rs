use std::fs::OpenOptions;

use tracing::info;

use super::{EngineError, Operation, RasterEngine};

/// Engine that performs no processing.
///
/// Each operation is logged and recorded, and its output files are created
/// empty (existing files are left untouched) so later stages find what they
/// expect on disk.
#[derive(Debug, Default)]
pub struct DryRunEngine {
    operations: Vec<Operation>,
}

impl DryRunEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations executed so far, in call order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

impl RasterEngine for DryRunEngine {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn execute(&mut self, operation: &Operation) -> Result<(), EngineError> {
        info!("[dry-run] {}", operation);
        for path in operation.outputs() {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| EngineError::Output {
                    operation: operation.kind(),
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        self.operations.push(operation.clone());
        Ok(())
    }

    fn produces_rasters(&self) -> bool {
        false
    }
}
