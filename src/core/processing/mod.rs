//! Pipeline stages. Each stage module builds the engine operations for its
//! step and executes them; `pipeline` sequences the stages.
pub mod correction;
pub mod enhance;
pub mod export;
pub mod import;
pub mod mosaic;
pub mod pipeline;
