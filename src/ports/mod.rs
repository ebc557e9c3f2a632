// Ports - Interface definitions (contracts)

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Listener for engine progress events
pub type ProgressHandler = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Listener for engine log lines
pub type LogHandler = Arc<dyn Fn(&LogEvent) + Send + Sync>;

/// Port for the external media-processing engine
///
/// Lifecycle is `Unloaded -> Loading -> Ready`. A failed load returns to
/// `Unloaded`, so `initialize` may simply be called again. Every file and
/// execution operation requires `Ready` and fails with
/// [`DomainError::NotReady`] otherwise.
///
/// The adapter does not serialize concurrent calls; callers sequence
/// `write_file` before `execute` and `execute` before `read_file`.
#[async_trait]
pub trait EnginePort: Send + Sync {
    /// Load the engine once; later calls are no-ops
    async fn initialize(&self) -> Result<(), DomainError>;

    /// Current lifecycle state
    fn state(&self) -> EngineState;

    /// Write bytes into the virtual filesystem, replacing any file of that name
    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError>;

    /// Run the engine and wait for it to finish
    async fn execute(&self, args: &CommandArguments) -> Result<(), DomainError>;

    /// Read a file produced in the virtual filesystem
    async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError>;

    /// Register the progress listener, replacing the previous one
    fn on_progress(&self, handler: ProgressHandler);

    /// Register the log listener, replacing the previous one
    fn on_log(&self, handler: LogHandler);
}

/// Port for source clip inspection
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Duration of the media file in seconds
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError>;
}
