//! FFmpeg execution adapter
//!
//! Runs an `ffmpeg` executable against a private directory that plays the
//! role of the engine's virtual filesystem. Progress is read from
//! `-progress pipe:1` on stdout; every stderr line is forwarded as a log event.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::adapters::listeners::EventListeners;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

pub mod progress;
pub mod vfs;

use progress::ProgressTracker;
use vfs::VirtualFs;

/// Flags placed in front of every caller-supplied argument list
const ENGINE_PREFIX: &[&str] = &[
    "-hide_banner",
    "-nostdin",
    "-y",
    "-progress",
    "pipe:1",
    "-nostats",
];

/// Default number of diagnostic lines kept for execution errors
pub const DEFAULT_DIAGNOSTIC_LINES: usize = 200;

/// Loaded engine: resolved binary plus its private filesystem
struct EngineRuntime {
    binary: PathBuf,
    vfs: VirtualFs,
}

/// FFmpeg-based engine adapter
pub struct FFmpegEngineAdapter {
    configured_binary: Option<PathBuf>,
    diagnostic_lines: usize,
    state: RwLock<EngineState>,
    runtime: RwLock<Option<Arc<EngineRuntime>>>,
    init_lock: tokio::sync::Mutex<()>,
    listeners: EventListeners,
}

impl FFmpegEngineAdapter {
    /// Create new FFmpeg adapter; `binary` overrides the `PATH` lookup
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            configured_binary: binary,
            diagnostic_lines: DEFAULT_DIAGNOSTIC_LINES,
            state: RwLock::new(EngineState::Unloaded),
            runtime: RwLock::new(None),
            init_lock: tokio::sync::Mutex::new(()),
            listeners: EventListeners::new(),
        }
    }

    /// Bound the number of engine lines attached to execution errors
    pub fn with_diagnostic_lines(mut self, lines: usize) -> Self {
        self.diagnostic_lines = lines.max(1);
        self
    }

    /// Resolved engine binary, once loaded
    pub fn binary(&self) -> Option<PathBuf> {
        self.current_runtime().map(|runtime| runtime.binary.clone())
    }

    fn set_state(&self, state: EngineState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    fn current_runtime(&self) -> Option<Arc<EngineRuntime>> {
        self.runtime.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn ready_runtime(&self, operation: &str) -> Result<Arc<EngineRuntime>, DomainError> {
        match (self.state(), self.current_runtime()) {
            (EngineState::Ready, Some(runtime)) => Ok(runtime),
            (state, _) => Err(DomainError::NotReady(format!(
                "cannot {} while engine is {}",
                operation, state
            ))),
        }
    }

    fn resolve_binary(&self) -> Result<PathBuf, DomainError> {
        match &self.configured_binary {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => which::which(path).map_err(|e| {
                DomainError::Initialization(format!(
                    "Engine binary {} not found: {}",
                    path.display(),
                    e
                ))
            }),
            None => which::which("ffmpeg").map_err(|_| {
                DomainError::Initialization("FFmpeg not found in PATH".to_string())
            }),
        }
    }

    async fn load(&self) -> Result<EngineRuntime, DomainError> {
        let binary = self.resolve_binary()?;
        debug!("Verifying engine binary: {}", binary.display());

        let output = Command::new(&binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::Initialization(format!(
                    "Failed to start {}: {}",
                    binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(DomainError::Initialization(format!(
                "{} -version exited with {}",
                binary.display(),
                output.status
            )));
        }

        let banner = String::from_utf8_lossy(&output.stdout);
        if let Some(first) = banner.lines().next() {
            info!("Engine ready: {}", first);
        }

        let vfs = VirtualFs::create()?;
        Ok(EngineRuntime { binary, vfs })
    }
}

/// One engine output line; metadata may carry bytes that are not UTF-8
fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}

#[async_trait]
impl EnginePort for FFmpegEngineAdapter {
    async fn initialize(&self) -> Result<(), DomainError> {
        let _guard = self.init_lock.lock().await;
        if self.state() == EngineState::Ready {
            return Ok(());
        }

        self.set_state(EngineState::Loading);
        match self.load().await {
            Ok(runtime) => {
                *self.runtime.write().unwrap_or_else(|e| e.into_inner()) =
                    Some(Arc::new(runtime));
                self.set_state(EngineState::Ready);
                Ok(())
            }
            Err(e) => {
                warn!("Engine failed to load: {}", e);
                self.set_state(EngineState::Unloaded);
                Err(e)
            }
        }
    }

    fn state(&self) -> EngineState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let runtime = self.ready_runtime("write file")?;
        runtime.vfs.write(name, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), name);
        Ok(())
    }

    async fn execute(&self, args: &CommandArguments) -> Result<(), DomainError> {
        let runtime = self.ready_runtime("execute")?;

        for input in args.inputs() {
            if !runtime.vfs.exists(input).await? {
                return Err(DomainError::Io(format!(
                    "Input {} has not been written to the engine",
                    input
                )));
            }
        }

        info!("Running engine: ffmpeg {}", args);

        let mut child = Command::new(&runtime.binary)
            .args(ENGINE_PREFIX)
            .args(args.iter())
            .current_dir(runtime.vfs.root())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DomainError::Execution {
                exit_code: None,
                log: vec![format!("Failed to start engine: {}", e)],
            })?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                return Err(DomainError::Execution {
                    exit_code: None,
                    log: vec!["Engine output streams were not captured".to_string()],
                })
            }
        };

        let mut progress_reader = BufReader::new(stdout);
        let mut log_reader = BufReader::new(stderr);
        // Partial lines stay in these buffers across select! iterations.
        let mut progress_buf = Vec::new();
        let mut log_buf = Vec::new();
        let mut tracker = ProgressTracker::for_arguments(args);
        let mut diagnostics: VecDeque<String> = VecDeque::new();
        let mut progress_open = true;
        let mut log_open = true;

        while progress_open || log_open {
            tokio::select! {
                read = progress_reader.read_until(b'\n', &mut progress_buf), if progress_open => match read {
                    Ok(0) => progress_open = false,
                    Ok(_) => {
                        let line = decode_line(&progress_buf);
                        progress_buf.clear();
                        if let Some(event) = tracker.feed_progress_line(&line) {
                            self.listeners.emit_progress(&event);
                        }
                    }
                    Err(e) => {
                        warn!("Lost engine progress stream: {}", e);
                        progress_open = false;
                    }
                },
                read = log_reader.read_until(b'\n', &mut log_buf), if log_open => match read {
                    Ok(0) => log_open = false,
                    Ok(_) => {
                        let line = decode_line(&log_buf);
                        log_buf.clear();
                        tracker.observe_log_line(&line);
                        self.listeners.emit_log(&LogEvent::new(line.clone()));
                        if diagnostics.len() == self.diagnostic_lines {
                            diagnostics.pop_front();
                        }
                        diagnostics.push_back(line);
                    }
                    Err(e) => {
                        warn!("Lost engine log stream: {}", e);
                        log_open = false;
                    }
                },
            }
        }

        let status = child.wait().await.map_err(|e| DomainError::Execution {
            exit_code: None,
            log: vec![format!("Failed to wait for engine: {}", e)],
        })?;

        if status.success() {
            debug!("Engine finished successfully");
            Ok(())
        } else {
            warn!("Engine exited with {}", status);
            Err(DomainError::Execution {
                exit_code: status.code(),
                log: diagnostics.into(),
            })
        }
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        let runtime = self.ready_runtime("read file")?;
        runtime.vfs.read(name).await
    }

    fn on_progress(&self, handler: ProgressHandler) {
        self.listeners.set_progress(handler);
    }

    fn on_log(&self, handler: LogHandler) {
        self.listeners.set_log(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line_strips_terminator() {
        assert_eq!(decode_line(b"progress=end\n"), "progress=end");
        assert_eq!(decode_line(b"frame=1\r\n"), "frame=1");
        assert_eq!(decode_line(b"no newline"), "no newline");
    }

    #[test]
    fn test_decode_line_keeps_invalid_utf8_lines() {
        assert_eq!(decode_line(b"    title : caf\xe9\n"), "    title : caf\u{fffd}");
    }
}
