// Mock engine adapter - In-process engine double for tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::adapters::listeners::EventListeners;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// What the mock does when asked to execute
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Copy the first input to the output name
    CopyInput,
    /// Fail with the given exit code after logging the lines
    Fail { exit_code: i32, log: Vec<String> },
}

/// Engine double with an in-memory virtual filesystem
///
/// Records every executed argument list and emits a short progress
/// sequence (0, 0.5, 1) plus one log line per run.
pub struct MockEngineAdapter {
    state: RwLock<EngineState>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    executions: Mutex<Vec<CommandArguments>>,
    outcome: Mutex<MockOutcome>,
    pending_init_failures: Mutex<usize>,
    init_attempts: Mutex<usize>,
    gate: Option<Arc<Notify>>,
    listeners: EventListeners,
}

impl Default for MockEngineAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngineAdapter {
    /// Create new mock engine adapter
    pub fn new() -> Self {
        Self {
            state: RwLock::new(EngineState::Unloaded),
            files: Mutex::new(HashMap::new()),
            executions: Mutex::new(Vec::new()),
            outcome: Mutex::new(MockOutcome::CopyInput),
            pending_init_failures: Mutex::new(0),
            init_attempts: Mutex::new(0),
            gate: None,
            listeners: EventListeners::new(),
        }
    }

    /// Fail the next `count` initialization attempts
    pub fn failing_initializations(self, count: usize) -> Self {
        *self.pending_init_failures.lock().unwrap_or_else(|e| e.into_inner()) = count;
        self
    }

    /// Hold every execution until the gate is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Change the outcome of subsequent executions
    pub fn set_outcome(&self, outcome: MockOutcome) {
        *self.outcome.lock().unwrap_or_else(|e| e.into_inner()) = outcome;
    }

    /// Argument lists executed so far
    pub fn executions(&self) -> Vec<CommandArguments> {
        self.executions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn init_attempts(&self) -> usize {
        *self.init_attempts.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Direct view of a virtual file, bypassing the ready check
    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    fn set_state(&self, state: EngineState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    fn require_ready(&self, operation: &str) -> Result<(), DomainError> {
        match self.state() {
            EngineState::Ready => Ok(()),
            state => Err(DomainError::NotReady(format!(
                "cannot {} while engine is {}",
                operation, state
            ))),
        }
    }
}

#[async_trait]
impl EnginePort for MockEngineAdapter {
    async fn initialize(&self) -> Result<(), DomainError> {
        if self.state() == EngineState::Ready {
            return Ok(());
        }
        *self.init_attempts.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        self.set_state(EngineState::Loading);

        let fail = {
            let mut pending = self
                .pending_init_failures
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if *pending > 0 {
                *pending -= 1;
                true
            } else {
                false
            }
        };

        if fail {
            self.set_state(EngineState::Unloaded);
            return Err(DomainError::Initialization(
                "mock engine assets unavailable".to_string(),
            ));
        }
        self.set_state(EngineState::Ready);
        Ok(())
    }

    fn state(&self) -> EngineState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        self.require_ready("write file")?;
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn execute(&self, args: &CommandArguments) -> Result<(), DomainError> {
        self.require_ready("execute")?;

        let inputs: Vec<String> = args.inputs().into_iter().map(str::to_string).collect();
        let first_input = {
            let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(missing) = inputs.iter().find(|name| !files.contains_key(*name)) {
                return Err(DomainError::Io(format!(
                    "Input {} has not been written to the engine",
                    missing
                )));
            }
            inputs.first().and_then(|name| files.get(name).cloned())
        };

        self.executions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(args.clone());
        self.listeners
            .emit_log(&LogEvent::new(format!("mock engine: {}", args)));
        self.listeners.emit_progress(&ProgressEvent::new(0.0, 0.0));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let outcome = self
            .outcome
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match outcome {
            MockOutcome::CopyInput => {
                self.listeners.emit_progress(&ProgressEvent::new(0.5, 0.0));
                if let (Some(output), Some(bytes)) = (args.output(), first_input) {
                    self.files
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .insert(output.to_string(), bytes);
                }
                self.listeners.emit_progress(&ProgressEvent::new(1.0, 0.0));
                Ok(())
            }
            MockOutcome::Fail { exit_code, log } => {
                for line in &log {
                    self.listeners.emit_log(&LogEvent::new(line.clone()));
                }
                Err(DomainError::Execution {
                    exit_code: Some(exit_code),
                    log,
                })
            }
        }
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        self.require_ready("read file")?;
        self.file(name)
            .ok_or_else(|| DomainError::Io(format!("Virtual file not found: {}", name)))
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

    #[tokio::test]
    async fn test_operations_require_ready() {
        let engine = MockEngineAdapter::new();
        assert!(matches!(
            engine.write_file(INPUT_FILE, b"x").await,
            Err(DomainError::NotReady(_))
        ));
        assert!(matches!(
            engine.read_file(OUTPUT_FILE).await,
            Err(DomainError::NotReady(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_initialization_allows_retry() {
        let engine = MockEngineAdapter::new().failing_initializations(1);

        assert!(matches!(
            engine.initialize().await,
            Err(DomainError::Initialization(_))
        ));
        assert_eq!(engine.state(), EngineState::Unloaded);

        engine.initialize().await.unwrap();
        assert_eq!(engine.state(), EngineState::Ready);

        engine.initialize().await.unwrap();
        assert_eq!(engine.init_attempts(), 2);
    }

    #[tokio::test]
    async fn test_execute_copies_input_to_output() {
        let engine = MockEngineAdapter::new();
        engine.initialize().await.unwrap();
        engine.write_file(INPUT_FILE, b"clip").await.unwrap();

        let args = crate::domain::rules::ParameterCompiler::compile(
            &EditParameters::for_duration(10.0),
            10.0,
        );
        engine.execute(&args).await.unwrap();

        assert_eq!(engine.read_file(OUTPUT_FILE).await.unwrap(), b"clip");
        assert_eq!(engine.executions(), vec![args]);
    }
}
