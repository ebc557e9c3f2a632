//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

use crate::domain::errors::DomainError;
use crate::domain::model::{EditParameters, Rotation, TimeSpec, MAX_BLUR};

fn parse_blur(value: &str) -> Result<u32, String> {
    number_range(value, 0, MAX_BLUR)
}

/// Edit parameters shared by `apply` and `compile`
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Trim start (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub start: Option<String>,

    /// Trim end (HH:MM:SS.ms, MM:SS.ms, or seconds); defaults to the clip end
    #[arg(short, long)]
    pub end: Option<String>,

    /// Box blur radius (0-20)
    #[arg(long, default_value_t = 0, value_parser = parse_blur)]
    pub blur: u32,

    /// Remove colour
    #[arg(long)]
    pub grayscale: bool,

    /// Sepia tone
    #[arg(long)]
    pub sepia: bool,

    /// Invert colours
    #[arg(long)]
    pub invert: bool,

    /// Play video and audio backwards
    #[arg(long)]
    pub reverse: bool,

    /// Brightness offset (-1 to 1)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub brightness: f64,

    /// Contrast factor (0 to 2)
    #[arg(long, default_value_t = 1.0)]
    pub contrast: f64,

    /// Clockwise rotation in degrees (0, 90, 180, 270)
    #[arg(long, default_value_t = 0)]
    pub rotate: u16,
}

impl EditArgs {
    /// Build parameters for a source of `duration` seconds
    pub fn to_parameters(&self, duration: f64) -> Result<EditParameters, DomainError> {
        let trim_start = match &self.start {
            Some(value) => TimeSpec::parse(value)?.as_seconds(),
            None => 0.0,
        };
        let trim_end = match &self.end {
            Some(value) => TimeSpec::parse(value)?.as_seconds(),
            None => duration,
        };

        Ok(EditParameters {
            trim_start,
            trim_end,
            blur_amount: self.blur,
            grayscale: self.grayscale,
            sepia: self.sepia,
            invert: self.invert,
            reverse: self.reverse,
            brightness: self.brightness,
            contrast: self.contrast,
            rotation: Rotation::from_degrees(self.rotate)?,
        })
    }
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file path (default: edited_video.mp4)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Source duration in seconds; probed with ffprobe when omitted
    #[arg(long)]
    pub duration: Option<String>,

    #[command(flatten)]
    pub edit: EditArgs,
}

/// Arguments for the compile command
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Source duration (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(long)]
    pub duration: String,

    #[command(flatten)]
    pub edit: EditArgs,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,
}
