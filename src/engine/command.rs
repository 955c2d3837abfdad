use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{EngineError, Operation, OperationKind, RasterEngine};

/// Lines of stderr kept in a failure message
const STDERR_TAIL_LINES: usize = 20;

/// External program invoked for one operation kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    /// Fixed leading arguments, placed before the `key=value` pairs
    #[serde(default)]
    pub args: Vec<String>,
}

/// Program table for [`CommandEngine`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub programs: BTreeMap<OperationKind, CommandSpec>,
}

impl EngineConfig {
    /// Operation kinds without a configured program
    pub fn missing(&self) -> Vec<OperationKind> {
        OperationKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.programs.contains_key(kind))
            .collect()
    }
}

/// Runs each operation as an external process.
///
/// The program configured for the operation kind receives its fixed
/// arguments followed by one `key=value` argument per operation parameter.
/// A non-zero exit status fails the operation.
pub struct CommandEngine {
    config: EngineConfig,
    working_dir: Option<PathBuf>,
}

impl CommandEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            working_dir: None,
        }
    }

    /// Run every program from `dir` instead of the current directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Resolve the program and full argument list for an operation
    pub fn command_line(&self, operation: &Operation) -> Result<(String, Vec<String>), EngineError> {
        let kind = operation.kind();
        let spec = self
            .config
            .programs
            .get(&kind)
            .ok_or(EngineError::NotConfigured { operation: kind })?;
        let mut args = spec.args.clone();
        args.extend(
            operation
                .arguments()
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, value)),
        );
        Ok((spec.program.clone(), args))
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n").trim().to_string()
}

impl RasterEngine for CommandEngine {
    fn name(&self) -> &str {
        "command"
    }

    fn execute(&mut self, operation: &Operation) -> Result<(), EngineError> {
        let kind = operation.kind();
        let (program, args) = self.command_line(operation)?;
        info!("Running {}: {} {}", kind, program, args.join(" "));

        let mut command = Command::new(&program);
        command.args(&args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        let output = command.output().map_err(|source| EngineError::Spawn {
            operation: kind,
            program: program.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{} stdout:\n{}", kind, stdout.trim_end());
        }
        if !output.status.success() {
            return Err(EngineError::Failed {
                operation: kind,
                program,
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RasterFormat;

    fn export_op() -> Operation {
        Operation::Export {
            input: PathBuf::from("mosaic/mosaic_enhanced.pix"),
            bands: vec![1, 2, 3],
            format: RasterFormat::Tif,
            output: PathBuf::from("mosaic/mosaic_enhanced.tif"),
        }
    }

    #[test]
    fn command_line_appends_key_value_pairs() {
        let mut config = EngineConfig::default();
        config.programs.insert(
            OperationKind::Export,
            CommandSpec {
                program: "raster-tool".to_string(),
                args: vec!["export".to_string()],
            },
        );
        let engine = CommandEngine::new(config);
        let (program, args) = engine.command_line(&export_op()).unwrap();
        assert_eq!(program, "raster-tool");
        assert_eq!(
            args,
            vec![
                "export",
                "input=mosaic/mosaic_enhanced.pix",
                "output=mosaic/mosaic_enhanced.tif",
                "bands=1,2,3",
                "format=TIF",
            ]
        );
    }

    #[test]
    fn unconfigured_operation_is_an_error() {
        let mut engine = CommandEngine::new(EngineConfig::default());
        let err = engine.execute(&export_op()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NotConfigured {
                operation: OperationKind::Export
            }
        ));
    }

    #[test]
    fn missing_lists_unconfigured_kinds() {
        let mut config = EngineConfig::default();
        config.programs.insert(
            OperationKind::Import,
            CommandSpec {
                program: "import-tool".to_string(),
                args: Vec::new(),
            },
        );
        let missing = config.missing();
        assert_eq!(missing.len(), OperationKind::ALL.len() - 1);
        assert!(!missing.contains(&OperationKind::Import));
    }

    #[test]
    fn config_parses_from_json() {
        let config: EngineConfig = serde_json::from_str(
            r#"{ "programs": { "haze_removal": { "program": "hazerem" } } }"#,
        )
        .unwrap();
        let spec = &config.programs[&OperationKind::HazeRemoval];
        assert_eq!(spec.program, "hazerem");
        assert!(spec.args.is_empty());
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let text: String = (0..30).map(|i| format!("line {}\n", i)).collect();
        let tail = stderr_tail(text.as_bytes());
        assert!(tail.starts_with("line 10"));
        assert!(tail.ends_with("line 29"));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_fails_the_operation() {
        let mut config = EngineConfig::default();
        config.programs.insert(
            OperationKind::Export,
            CommandSpec {
                program: "false".to_string(),
                args: Vec::new(),
            },
        );
        let mut engine = CommandEngine::new(config);
        let err = engine.execute(&export_op()).unwrap_err();
        assert!(matches!(err, EngineError::Failed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_succeeds() {
        let mut config = EngineConfig::default();
        config.programs.insert(
            OperationKind::Export,
            CommandSpec {
                program: "true".to_string(),
                args: Vec::new(),
            },
        );
        let mut engine = CommandEngine::new(config);
        engine.execute(&export_op()).unwrap();
    }
}
