// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Engine assets could not be located or instantiated; retry by initializing again
    #[error("Engine initialization failed: {0}")]
    Initialization(String),
    /// Operation attempted before the engine reached the ready state
    #[error("Engine not ready: {0}")]
    NotReady(String),
    /// Virtual file missing, invalid or not writable
    #[error("I/O error: {0}")]
    Io(String),
    /// Engine reported failure
    #[error("Engine execution failed: {}", describe_failure(.exit_code, .log))]
    Execution {
        exit_code: Option<i32>,
        log: Vec<String>,
    },
    /// Edit parameters outside their allowed ranges
    #[error("Invalid edit parameters: {0}")]
    InvalidParameters(String),
    /// An apply action is already in flight
    #[error("An edit is already being processed")]
    Busy,
    /// No source clip has been loaded
    #[error("No source clip loaded")]
    NoSource,
    /// Source inspection failed
    #[error("Probe failed: {0}")]
    Probe(String),
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),
}

fn describe_failure(exit_code: &Option<i32>, log: &[String]) -> String {
    let status = match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "terminated without exit code".to_string(),
    };
    match log.last() {
        Some(line) => format!("{} ({})", status, line),
        None => status,
    }
}

impl DomainError {
    /// Diagnostic lines captured from the engine, if any
    pub fn diagnostics(&self) -> &[String] {
        match self {
            DomainError::Execution { log, .. } => log,
            _ => &[],
        }
    }
}
