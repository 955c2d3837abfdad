use std::fs;
use std::io::{self, BufRead, Write};

use tracing::info;
use tracing_subscriber::EnvFilter;

use s2mosaic::core::confirm::{confirm_loop, write_banner};
use s2mosaic::io::writers::report::write_run_report;
use s2mosaic::{PipelineConfig, build_pipeline};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Command-line flags take precedence over the configuration file
fn apply_overrides(config: &mut PipelineConfig, args: &CliArgs) {
    if let Some(policy) = args.on_tile_error {
        config.params.failure_policy = policy;
    }
    if args.verify {
        config.params.verify_outputs = true;
    }
}

/// Run once without asking when `yes` is set, otherwise prompt until declined.
/// Returns the number of completed runs.
fn run_session<R, W, F>(yes: bool, input: &mut R, output: &mut W, mut run: F) -> s2mosaic::Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut() -> s2mosaic::Result<()>,
{
    if yes {
        run()?;
        return Ok(1);
    }
    confirm_loop(input, output, run)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log);

    if !args.workspace.is_dir() {
        return Err(AppError::MissingWorkspace {
            path: args.workspace.clone(),
        }
        .into());
    }
    let root = fs::canonicalize(&args.workspace).map_err(AppError::from)?;

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path).map_err(AppError::from)?,
        None => PipelineConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let mut pipeline = build_pipeline(&root, &config, args.engine).map_err(AppError::from)?;
    info!(
        "Engine: {:?}, failure policy: {:?}",
        args.engine,
        pipeline.params().failure_policy
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_banner(&mut out, pipeline.workspace())?;

    let report_path = args.report.clone();
    let run_once = || -> s2mosaic::Result<()> {
        let report = pipeline.run()?;
        if let Some(path) = &report_path {
            write_run_report(path, &report)?;
        }
        if let Some(seconds) = report.elapsed_seconds() {
            info!("Run took {:.1}s", seconds);
        }
        Ok(())
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let runs = run_session(args.yes, &mut input, &mut out, run_once).map_err(AppError::from)?;
    info!("Session ended after {} run(s)", runs);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use s2mosaic::FailurePolicy;
    use std::io::Cursor;

    fn parse(flags: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("s2mosaic").chain(flags.iter().copied()))
    }

    #[test]
    fn flags_override_the_configuration() {
        let mut config = PipelineConfig::default();
        apply_overrides(&mut config, &parse(&["--on-tile-error", "skip-tile", "--verify"]));
        assert_eq!(config.params.failure_policy, FailurePolicy::SkipTile);
        assert!(config.params.verify_outputs);
    }

    #[test]
    fn absent_flags_keep_configured_values() {
        let mut config = PipelineConfig::default();
        config.params.failure_policy = FailurePolicy::SkipTile;
        config.params.verify_outputs = true;
        apply_overrides(&mut config, &parse(&[]));
        assert_eq!(config.params.failure_policy, FailurePolicy::SkipTile);
        assert!(config.params.verify_outputs);

        apply_overrides(&mut config, &parse(&["--on-tile-error", "abort"]));
        assert_eq!(config.params.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn yes_runs_once_without_prompting() {
        let mut input = Cursor::new(b"y\ny\n".to_vec());
        let mut output = Vec::new();
        let mut calls = 0;
        let runs = run_session(true, &mut input, &mut output, || {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!((runs, calls), (1, 1));
        assert!(output.is_empty());
    }

    #[test]
    fn without_yes_the_operator_decides() {
        let mut input = Cursor::new(b"y\nn\n".to_vec());
        let mut output = Vec::new();
        let mut calls = 0;
        let runs = run_session(false, &mut input, &mut output, || {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!((runs, calls), (1, 1));
        assert!(String::from_utf8(output).unwrap().contains("Continue? (Y/N):"));
    }

    #[test]
    fn defaults_need_confirmation_and_use_the_command_engine() {
        let args = parse(&[]);
        assert!(!args.yes);
        assert!(args.on_tile_error.is_none());
        assert_eq!(args.engine, s2mosaic::EngineKind::Command);
    }
}
