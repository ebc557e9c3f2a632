// Domain models - Core types and data structures

use std::collections::VecDeque;
use std::fmt;

use crate::domain::errors::DomainError;

/// Name of the source clip inside the engine's virtual filesystem
pub const INPUT_FILE: &str = "input.mp4";

/// Name of the edited clip inside the engine's virtual filesystem
pub const OUTPUT_FILE: &str = "output.mp4";

/// Download name offered for the edited clip
pub const DOWNLOAD_NAME: &str = "edited_video.mp4";

/// MIME type of the edited clip
pub const OUTPUT_MIME: &str = "video/mp4";

/// Largest blur radius the editing surface offers
pub const MAX_BLUR: u32 = 20;

/// Trim end used before the source duration is known
pub const DEFAULT_TRIM_END: f64 = 10.0;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Seconds as a float
    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string in various formats
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() {
                return Err(DomainError::BadArgs("Time must be a finite number".to_string()));
            }
            if seconds < 0.0 {
                return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = parse_component(minutes, "minutes")?;
                let seconds = parse_seconds(seconds)?;
                Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = parse_component(hours, "hours")?;
                let minutes = parse_component(minutes, "minutes")?;
                let seconds = parse_seconds(seconds)?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs("Minutes must be less than 60".to_string()));
                }
                Ok(Self::from_seconds(
                    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
                ))
            }
            _ => Err(DomainError::BadArgs(
                "Invalid time format. Supported formats: seconds (e.g., 12.5), MM:SS.ms (e.g., 0:12.5), HH:MM:SS.ms (e.g., 0:00:12.5)".to_string(),
            )),
        }
    }

    /// Format as MM:SS.ms or H:MM:SS.ms
    pub fn format_hms(&self) -> String {
        let total_millis = (self.seconds * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let seconds = (total_millis % 60_000) / 1000;
        let milliseconds = total_millis % 1000;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

fn parse_component(value: &str, name: &str) -> Result<u32, DomainError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid {} format", name)))
}

fn parse_seconds(value: &str) -> Result<f64, DomainError> {
    let seconds = value
        .trim()
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::BadArgs("Seconds must be less than 60".to_string()));
    }
    Ok(seconds)
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Clockwise rotation applied to the picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarters,
}

impl Rotation {
    /// Parse from degrees; only multiples of 90 below 360 are accepted
    pub fn from_degrees(degrees: u16) -> Result<Self, DomainError> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Quarter),
            180 => Ok(Rotation::Half),
            270 => Ok(Rotation::ThreeQuarters),
            other => Err(DomainError::BadArgs(format!(
                "Invalid rotation: {}. Valid rotations: 0, 90, 180, 270",
                other
            ))),
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarters => 270,
        }
    }

    /// Next rotation 90 degrees clockwise, wrapping at 360
    pub fn rotate_clockwise(self) -> Self {
        match self {
            Rotation::None => Rotation::Quarter,
            Rotation::Quarter => Rotation::Half,
            Rotation::Half => Rotation::ThreeQuarters,
            Rotation::ThreeQuarters => Rotation::None,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Edit parameters collected for one apply action
///
/// A fresh record is created for every loaded source; callers snapshot it
/// (it is `Clone`) before handing it to the compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct EditParameters {
    /// Trim start in seconds
    pub trim_start: f64,
    /// Trim end in seconds
    pub trim_end: f64,
    /// Box blur radius, 0 disables
    pub blur_amount: u32,
    pub grayscale: bool,
    pub sepia: bool,
    pub invert: bool,
    /// Play video and audio backwards
    pub reverse: bool,
    /// Brightness offset in [-1, 1], 0 is neutral
    pub brightness: f64,
    /// Contrast factor in [0, 2], 1 is neutral
    pub contrast: f64,
    pub rotation: Rotation,
}

impl Default for EditParameters {
    fn default() -> Self {
        Self {
            trim_start: 0.0,
            trim_end: DEFAULT_TRIM_END,
            blur_amount: 0,
            grayscale: false,
            sepia: false,
            invert: false,
            reverse: false,
            brightness: 0.0,
            contrast: 1.0,
            rotation: Rotation::None,
        }
    }
}

impl EditParameters {
    /// Defaults for a source of the given duration (full range, no filters)
    pub fn for_duration(duration: f64) -> Self {
        Self {
            trim_end: duration,
            ..Self::default()
        }
    }

    /// Whether brightness or contrast differ from neutral
    pub fn has_color_adjustment(&self) -> bool {
        self.brightness != 0.0 || self.contrast != 1.0
    }

    /// Whether any pixel or sample level transform is requested
    pub fn has_visual_filters(&self) -> bool {
        self.blur_amount > 0
            || self.grayscale
            || self.has_color_adjustment()
            || self.invert
            || self.rotation != Rotation::None
            || self.sepia
            || self.reverse
    }

    /// Whether the trim range is narrower than the whole source
    pub fn is_strict_subrange(&self, duration: f64) -> bool {
        self.trim_start > 0.0 || self.trim_end < duration
    }

    /// Step the rotation 90 degrees clockwise
    pub fn rotate(&mut self) {
        self.rotation = self.rotation.rotate_clockwise();
    }

    /// Check every field against its allowed range for a source of `duration` seconds
    pub fn validate(&self, duration: f64) -> Result<(), DomainError> {
        let reals = [
            ("trim start", self.trim_start),
            ("trim end", self.trim_end),
            ("brightness", self.brightness),
            ("contrast", self.contrast),
        ];
        if let Some((name, _)) = reals.iter().find(|(_, value)| !value.is_finite()) {
            return Err(DomainError::InvalidParameters(format!(
                "{} must be a finite number",
                name
            )));
        }
        if self.trim_start < 0.0 {
            return Err(DomainError::InvalidParameters(
                "trim start cannot be negative".to_string(),
            ));
        }
        if self.trim_start > self.trim_end {
            return Err(DomainError::InvalidParameters(format!(
                "trim start ({}) must not exceed trim end ({})",
                self.trim_start, self.trim_end
            )));
        }
        if self.trim_end > duration {
            return Err(DomainError::InvalidParameters(format!(
                "trim end ({}) exceeds source duration ({})",
                self.trim_end, duration
            )));
        }
        if self.blur_amount > MAX_BLUR {
            return Err(DomainError::InvalidParameters(format!(
                "blur amount {} exceeds maximum {}",
                self.blur_amount, MAX_BLUR
            )));
        }
        if !(-1.0..=1.0).contains(&self.brightness) {
            return Err(DomainError::InvalidParameters(format!(
                "brightness {} outside [-1, 1]",
                self.brightness
            )));
        }
        if !(0.0..=2.0).contains(&self.contrast) {
            return Err(DomainError::InvalidParameters(format!(
                "contrast {} outside [0, 2]",
                self.contrast
            )));
        }
        Ok(())
    }
}

/// Ordered engine argument list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArguments(Vec<String>);

impl CommandArguments {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a bare token
    pub fn push(&mut self, token: impl Into<String>) {
        self.0.push(token.into());
    }

    /// Append a flag followed by its value
    pub fn push_pair(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        self.0.push(flag.into());
        self.0.push(value.into());
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_flag(&self, flag: &str) -> bool {
        self.0.iter().any(|token| token == flag)
    }

    /// Value following the first occurrence of `flag`
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.0
            .iter()
            .position(|token| token == flag)
            .and_then(|index| self.0.get(index + 1))
            .map(String::as_str)
    }

    /// Every file named by an `-i` flag
    pub fn inputs(&self) -> Vec<&str> {
        self.0
            .windows(2)
            .filter(|pair| pair[0] == "-i")
            .map(|pair| pair[1].as_str())
            .collect()
    }

    /// Output file, which is always the final token
    pub fn output(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for CommandArguments {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl<'a> IntoIterator for &'a CommandArguments {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for CommandArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unloaded,
    Loading,
    Ready,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Unloaded => "unloaded",
            EngineState::Loading => "loading",
            EngineState::Ready => "ready",
        };
        write!(f, "{}", name)
    }
}

/// Fractional completion reported by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Completion in [0, 1]
    pub progress: f64,
    /// Output timestamp reached, in seconds
    pub time_seconds: f64,
}

impl ProgressEvent {
    pub fn new(progress: f64, time_seconds: f64) -> Self {
        Self {
            progress: progress.clamp(0.0, 1.0),
            time_seconds,
        }
    }

    /// Completion as a whole percentage
    pub fn percent(&self) -> u8 {
        (self.progress * 100.0).round() as u8
    }
}

/// One diagnostic line emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub message: String,
}

impl LogEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Source clip loaded into the engine
#[derive(Debug, Clone, PartialEq)]
pub struct SourceClip {
    /// Display name of the original file
    pub name: String,
    /// Size in bytes
    pub size: usize,
    /// Duration in seconds
    pub duration: f64,
}

/// Edited clip produced by a successful apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub file_name: &'static str,
}

impl OutputArtifact {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: OUTPUT_MIME,
            file_name: DOWNLOAD_NAME,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Rolling window over the most recent log lines
#[derive(Debug, Clone)]
pub struct LogTail {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogTail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.lines.into()
    }
}
