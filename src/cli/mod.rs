//! CLI module for EditX
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::ConfigOverrides;

pub mod args;
pub mod commands;

pub use args::{ApplyArgs, CompileArgs, EditArgs, ProbeArgs};

/// EditX clip editor
///
/// Trims a clip and applies simple visual adjustments by compiling them into a
/// single FFmpeg invocation.
#[derive(Parser, Debug)]
#[command(name = "editx")]
#[command(about = "EditX - Trim and filter short video clips with FFmpeg")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "EDITX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: ./editx.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// FFmpeg binary to use instead of the one on PATH
    #[arg(long, global = true)]
    pub ffmpeg: Option<PathBuf>,

    /// FFprobe binary to use instead of the one on PATH
    #[arg(long, global = true)]
    pub ffprobe: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Values that override file and environment configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            ffmpeg_path: self.ffmpeg.clone(),
            ffprobe_path: self.ffprobe.clone(),
            log_level: self.log_level.clone(),
            log_json: self.log_json,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply edits to a clip and write the result
    Apply(ApplyArgs),
    /// Print the engine arguments the edits compile to
    Compile(CompileArgs),
    /// Print the duration of a clip
    Probe(ProbeArgs),
}
