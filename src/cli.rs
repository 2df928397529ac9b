//! Command-line argument parsing
//!
//! The binary runs the synchronization core headless: it seeds the
//! session, renders once, optionally moves the cursor, then prints the
//! status line and the rendered markup.

use std::path::PathBuf;

use clap::Parser;

use crate::model::Position;

/// Render a Python buffer as a concrete syntax tree
#[derive(Parser, Debug)]
#[command(name = "cstview", version, about = "Render source text as a concrete syntax tree")]
pub struct CliArgs {
    /// Start from the built-in sample (ignore session restore)
    #[arg(short = 'n', long)]
    pub new: bool,

    /// Load the buffer from this file instead of the session
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Move the cursor to LINE:COL (1-indexed) after rendering
    #[arg(long, value_name = "LINE:COL", value_parser = parse_position)]
    pub cursor: Option<Position>,

    /// Write the rendered markup here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Override the render debounce from config.yaml
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,
}

/// Parse `LINE:COL` into a 1-indexed position
pub fn parse_position(value: &str) -> Result<Position, String> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got '{}'", value))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line '{}'", line))?;
    let column: usize = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{}'", column))?;
    if line == 0 || column == 0 {
        return Err("line and column start at 1".to_string());
    }
    Ok(Position::new(line, column))
}
