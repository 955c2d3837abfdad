//! Operator confirmation in front of the destructive pipeline run.
//!
//! The loop keeps prompting after each run: every answer starting with
//! `Y`/`y` runs the full pipeline once more (workspace clearing included),
//! anything else, an empty line or end of input ends the session.
use std::io::{BufRead, Write};

use crate::core::workspace::Workspace;
use crate::error::Result;

pub const PROMPT: &str = "Continue? (Y/N):";
pub const GOODBYE: &str = " ----- Goodbye ----- Goodbye -----";
const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Run,
    Quit,
}

/// Only the first byte counts; the rest of the line need not be valid UTF-8
pub fn parse_answer(line: &[u8]) -> Answer {
    match line.first() {
        Some(b'y') | Some(b'Y') => Answer::Run,
        _ => Answer::Quit,
    }
}

/// Header and deletion warning shown before the first prompt
pub fn write_banner<W: Write>(output: &mut W, workspace: &Workspace) -> std::io::Result<()> {
    writeln!(output, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(output, "Sentinel-2 Mosaicking")?;
    writeln!(output, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(output, "\tWorkspace: {}", workspace.root.display())?;
    writeln!(output, "\tUnzip Sentinel-2 input to {}", workspace.input.display())?;
    writeln!(output, "\tRunning this will DELETE existing data")?;
    writeln!(output, "\tfrom corrected, mosaic, and pix folders!")?;
    Ok(())
}

/// Prompt until the operator declines, invoking `run` once per `Y` answer.
/// Returns the number of completed runs; the first failing run ends the loop.
pub fn confirm_loop<R, W, F>(input: &mut R, output: &mut W, mut run: F) -> Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut() -> Result<()>,
{
    let mut runs = 0;
    loop {
        write!(output, "\t{} ", PROMPT)?;
        output.flush()?;

        let mut line = Vec::new();
        let answer = match input.read_until(b'\n', &mut line)? {
            0 => Answer::Quit,
            _ => parse_answer(&line),
        };

        match answer {
            Answer::Run => {
                run()?;
                runs += 1;
                writeln!(output, "{}", "=".repeat(RULE_WIDTH))?;
            }
            Answer::Quit => {
                writeln!(output, "{}", GOODBYE)?;
                return Ok(runs);
            }
        }
    }
}
