//! FFmpeg progress parsing.
//!
//! The engine is started with `-progress pipe:1`, which prints blocks of
//! `key=value` lines on stdout terminated by `progress=continue` or
//! `progress=end`. The total length comes either from the trim span in the
//! argument list or from the `Duration:` header the engine logs for its input.

use crate::domain::model::{CommandArguments, ProgressEvent, TimeSpec};

/// Turns raw engine output into fractional progress events
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    /// Expected output length in seconds, when known
    total_seconds: Option<f64>,
    /// Whether the total came from the arguments and must not be replaced
    fixed_total: bool,
    out_time_seconds: f64,
    last_progress: f64,
}

impl ProgressTracker {
    /// Tracker primed with the span selected by `-ss`/`-to`, if any
    pub fn for_arguments(args: &CommandArguments) -> Self {
        let start = args.value_of("-ss").and_then(|v| v.parse::<f64>().ok());
        let end = args.value_of("-to").and_then(|v| v.parse::<f64>().ok());
        let span = match (start, end) {
            (Some(start), Some(end)) if end > start => Some(end - start),
            _ => None,
        };

        Self {
            total_seconds: span,
            fixed_total: span.is_some(),
            ..Self::default()
        }
    }

    pub fn total_seconds(&self) -> Option<f64> {
        self.total_seconds
    }

    /// Inspect a stderr line for the input `Duration:` header
    pub fn observe_log_line(&mut self, line: &str) {
        if self.fixed_total || self.total_seconds.is_some() {
            return;
        }
        if let Some(duration) = parse_duration_header(line) {
            if duration > 0.0 {
                self.total_seconds = Some(duration);
            }
        }
    }

    /// Feed one stdout line; returns an event when a progress block completes
    pub fn feed_progress_line(&mut self, line: &str) -> Option<ProgressEvent> {
        let (key, value) = line.trim().split_once('=')?;
        match key {
            // out_time_ms is reported in microseconds as well
            "out_time_us" | "out_time_ms" => {
                if let Ok(micros) = value.trim().parse::<i64>() {
                    if micros >= 0 {
                        self.out_time_seconds = micros as f64 / 1_000_000.0;
                    }
                }
                None
            }
            "progress" => {
                let fraction = if value.trim() == "end" {
                    1.0
                } else {
                    match self.total_seconds {
                        Some(total) if total > 0.0 => self.out_time_seconds / total,
                        _ => 0.0,
                    }
                };
                // never report going backwards within one run
                self.last_progress = fraction.clamp(0.0, 1.0).max(self.last_progress);
                Some(ProgressEvent::new(self.last_progress, self.out_time_seconds))
            }
            _ => None,
        }
    }
}

/// Parse `  Duration: 00:00:10.00, start: 0.000000, bitrate: ...`
pub fn parse_duration_header(line: &str) -> Option<f64> {
    let rest = line.trim_start().strip_prefix("Duration:")?;
    let stamp = rest.split(',').next()?.trim();
    TimeSpec::parse(stamp).ok().map(|t| t.as_seconds())
}
