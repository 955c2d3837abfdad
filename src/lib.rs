#![doc = r#"
s2mosaic: a batch driver for Sentinel-2 correction and mosaicking.

This crate turns a workspace of unzipped Sentinel-2 tiles into one enhanced,
exported mosaic. It imports every tile into a working raster format, masks
clouds and haze, removes haze, applies atmospheric correction, mosaics the
corrected tiles along minimum-difference cutlines, stretches bands 4/3/2
through linear LUTs and exports a 3-band image.

The image processing itself is done by an external geospatial engine behind
the [`RasterEngine`] trait. s2mosaic owns the orchestration: workspace
preparation, tile discovery, deterministic naming, stage ordering, failure
policy, logging and run reporting.

Workspace layout
----------------
```text
<root>/
  input/       one folder per tile, each with MTD_MSIL1C.xml
  pix/         tile0.pix, tile0_hzrm.pix, ...
  corrected/   tile0_atcor.pix, ...
  mosaic/      mosaic_out.pix, cutlines.shp, mosaic_enhanced.pix, mosaic_enhanced.tif
```
`pix/`, `corrected/` and `mosaic/` are deleted and recreated at the start
of every run.

Quick start: dry run over a workspace
-------------------------------------
```rust,no_run
use std::path::Path;
use s2mosaic::{run_workspace, DryRunEngine, PipelineParams};

fn main() -> s2mosaic::Result<()> {
    let report = run_workspace(
        Path::new("/data/mosaic"),
        PipelineParams::default(),
        DryRunEngine::new(),
    )?;
    println!("final image: {:?}", report.exported);
    Ok(())
}
```

External programs from a configuration file
-------------------------------------------
```rust,no_run
use std::path::Path;
use s2mosaic::{build_pipeline, EngineKind, PipelineConfig};

fn main() -> s2mosaic::Result<()> {
    let config = PipelineConfig::load(Path::new("/data/mosaic/s2mosaic.json"))?;
    let mut pipeline = build_pipeline(Path::new("/data/mosaic"), &config, EngineKind::Command)?;
    let report = pipeline.run()?;
    println!("corrected {} tile(s)", report.corrected.len());
    Ok(())
}
```

Error handling
--------------
All public functions return `s2mosaic::Result<T>`; match on `s2mosaic::Error`
to handle specific cases.

```rust,no_run
use std::path::Path;
use s2mosaic::{run_workspace, DryRunEngine, Error, PipelineParams};

fn main() {
    match run_workspace(Path::new("/empty"), PipelineParams::default(), DryRunEngine::new()) {
        Ok(_) => {}
        Err(Error::MissingInput { path }) => eprintln!("add tiles to {}", path.display()),
        Err(Error::Engine(e)) => eprintln!("engine failed: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level entry points.
- [`core`]: parameters, workspace, naming, stages and the pipeline.
- [`engine`]: the engine trait, operations and the bundled engines.
- [`io`]: Sentinel-2 tile reading, GDAL probing, report writing.
- [`types`]: shared enums.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod engine;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::config::PipelineConfig;
pub use core::params::PipelineParams;
pub use core::report::{RunReport, SkippedTile};
pub use core::workspace::{PrepareReport, Workspace};
pub use error::{Error, Result};
pub use types::{EngineKind, FailurePolicy, RasterFormat, Stage};

// Engines
pub use engine::{
    CommandEngine, CommandSpec, DryRunEngine, EngineConfig, EngineError, Operation,
    OperationKind, RasterEngine,
};

// Pipeline
pub use core::processing::pipeline::Pipeline;

// High-level API re-exports
pub use api::{build_pipeline, engine_for, run_workspace};
