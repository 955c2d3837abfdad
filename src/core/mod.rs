//! Core building blocks: processing parameters and configuration, workspace
//! layout, file naming, the per-stage processing functions and the pipeline
//! that sequences them, plus the operator confirmation loop.
pub mod config;
pub mod confirm;
pub mod naming;
pub mod params;
pub mod processing;
pub mod report;
pub mod workspace;
