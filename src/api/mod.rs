//! High-level library API: build a pipeline for a workspace from a
//! configuration, pick an engine, and run it. Prefer these entrypoints over
//! the individual stage functions when embedding s2mosaic.
use std::path::Path;

use tracing::warn;

use crate::core::config::PipelineConfig;
use crate::core::params::PipelineParams;
use crate::core::processing::pipeline::Pipeline;
use crate::core::report::RunReport;
use crate::core::workspace::Workspace;
use crate::engine::{CommandEngine, DryRunEngine, EngineConfig, RasterEngine};
use crate::error::Result;
use crate::types::EngineKind;

/// Instantiate the engine selected by `kind`. Command engines run their
/// programs from the workspace root.
pub fn engine_for(kind: EngineKind, config: &EngineConfig, workspace: &Workspace) -> Box<dyn RasterEngine> {
    match kind {
        EngineKind::Command => {
            let missing = config.missing();
            if !missing.is_empty() {
                let names: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
                warn!("No program configured for: {}", names.join(", "));
            }
            Box::new(CommandEngine::new(config.clone()).with_working_dir(&workspace.root))
        }
        EngineKind::DryRun => Box::new(DryRunEngine::new()),
    }
}

/// Build a pipeline for the workspace at `root` using `config`
pub fn build_pipeline(
    root: &Path,
    config: &PipelineConfig,
    kind: EngineKind,
) -> Result<Pipeline<Box<dyn RasterEngine>>> {
    let workspace = Workspace::new(root);
    let engine = engine_for(kind, &config.engine, &workspace);
    Pipeline::new(workspace, config.params.clone(), engine)
}

/// Prepare the workspace at `root` and run all stages with `engine`.
/// This clears `pix/`, `corrected/` and `mosaic/` without asking.
pub fn run_workspace<E: RasterEngine>(root: &Path, params: PipelineParams, engine: E) -> Result<RunReport> {
    let mut pipeline = Pipeline::new(Workspace::new(root), params, engine)?;
    pipeline.run()
}
