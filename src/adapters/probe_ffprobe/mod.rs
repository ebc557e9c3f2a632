//! FFprobe adapter for media file probing
//!
//! Supplies the source duration that the trim range is measured against.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// FFprobe JSON output format
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    configured_binary: Option<PathBuf>,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter; `binary` overrides the `PATH` lookup
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            configured_binary: binary,
        }
    }

    fn resolve_binary(&self) -> Result<PathBuf, DomainError> {
        let name = self
            .configured_binary
            .clone()
            .unwrap_or_else(|| PathBuf::from("ffprobe"));
        if name.is_file() {
            return Ok(name);
        }
        which::which(&name)
            .map_err(|_| DomainError::Probe(format!("{} not found", name.display())))
    }
}

/// Extract the container duration from `ffprobe -print_format json -show_format`
pub fn parse_probe_output(json: &[u8]) -> Result<f64, DomainError> {
    let probe: FfprobeOutput = serde_json::from_slice(json)
        .map_err(|e| DomainError::Probe(format!("Unreadable ffprobe output: {}", e)))?;

    let duration = probe
        .format
        .and_then(|format| format.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .ok_or_else(|| DomainError::Probe("Could not determine media duration".to_string()))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(DomainError::Probe(format!(
            "Invalid media duration: {}",
            duration
        )));
    }
    Ok(duration)
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError> {
        if !file_path.exists() {
            return Err(DomainError::Io(format!(
                "File not found: {}",
                file_path.display()
            )));
        }

        let binary = self.resolve_binary()?;
        debug!("Probing {} with {}", file_path.display(), binary.display());

        let output = Command::new(&binary)
            .args(["-v", "error", "-print_format", "json", "-show_format"])
            .arg(file_path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DomainError::Probe(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(DomainError::Probe(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_probe_output(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = br#"{"format": {"filename": "clip.mp4", "duration": "10.010000"}}"#;
        assert!((parse_probe_output(json).unwrap() - 10.01).abs() < 1e-9);
    }

    #[test]
    fn test_parse_probe_output_without_duration() {
        let json = br#"{"format": {"filename": "clip.mp4"}}"#;
        assert!(matches!(parse_probe_output(json), Err(DomainError::Probe(_))));
        assert!(parse_probe_output(b"not json").is_err());
        assert!(parse_probe_output(br#"{"format": {"duration": "0"}}"#).is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let adapter = FFprobeAdapter::new(None);
        let result = adapter
            .probe_duration(Path::new("/definitely/not/here.mp4"))
            .await;
        assert!(matches!(result, Err(DomainError::Io(_))));
    }
}
