// Edit interactor - Orchestrates one editing session against the engine

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};

use crate::adapters::tracing_log::TracingLogAdapter;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Number of engine log lines kept for display
pub const LOG_TAIL_LINES: usize = 5;

/// Progress and log state fed by engine listeners
#[derive(Debug)]
struct ActivityState {
    percent: u8,
    log_tail: LogTail,
}

/// Parameters, source and last output for the session
#[derive(Debug, Default)]
struct SessionState {
    source: Option<SourceClip>,
    parameters: EditParameters,
    last_output: Option<OutputArtifact>,
}

/// Clears the in-flight flag however an apply ends
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Interactor for one editing session
///
/// Holds the engine handle it was given, the loaded source clip and the
/// current edit parameters. Only one apply may be in flight at a time.
pub struct EditInteractor {
    engine: Arc<dyn EnginePort>,
    state: Mutex<SessionState>,
    activity: Arc<Mutex<ActivityState>>,
    busy: AtomicBool,
}

impl EditInteractor {
    /// Create new edit interactor with the injected engine
    pub fn new(engine: Arc<dyn EnginePort>) -> Self {
        Self {
            engine,
            state: Mutex::new(SessionState::default()),
            activity: Arc::new(Mutex::new(ActivityState {
                percent: 0,
                log_tail: LogTail::with_capacity(LOG_TAIL_LINES),
            })),
            busy: AtomicBool::new(false),
        }
    }

    fn session(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn activity(&self) -> std::sync::MutexGuard<'_, ActivityState> {
        self.activity.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, line: String) {
        self.activity().log_tail.push(line);
    }

    /// Load the engine and attach progress and log listeners
    ///
    /// Safe to call again after a failure; listeners are replaced, not added.
    pub async fn load_engine(&self) -> Result<(), DomainError> {
        if let Err(e) = self.engine.initialize().await {
            error!("Error loading engine: {}", e);
            self.record(format!("Error loading engine: {}", e));
            return Err(e);
        }

        let activity = Arc::clone(&self.activity);
        self.engine.on_progress(Arc::new(move |event: &ProgressEvent| {
            activity.lock().unwrap_or_else(|e| e.into_inner()).percent = event.percent();
            TracingLogAdapter::progress(event);
        }));

        let activity = Arc::clone(&self.activity);
        self.engine.on_log(Arc::new(move |event: &LogEvent| {
            activity
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .log_tail
                .push(event.message.clone());
            TracingLogAdapter::engine_line(event);
        }));

        info!("Engine loaded");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.engine.state() == EngineState::Ready
    }

    /// Load a new source clip
    ///
    /// Parameters are reset to defaults for `duration` and any previous
    /// output is discarded before the bytes are written as `input.mp4`.
    /// Fails with [`DomainError::Busy`] while an apply is in flight.
    pub async fn load_source(
        &self,
        name: &str,
        bytes: &[u8],
        duration: f64,
    ) -> Result<SourceClip, DomainError> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(DomainError::InvalidParameters(format!(
                "source duration must be a non-negative number, got {}",
                duration
            )));
        }
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(DomainError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        {
            let mut session = self.session();
            session.source = None;
            session.parameters = EditParameters::for_duration(duration);
            session.last_output = None;
        }

        self.engine.write_file(INPUT_FILE, bytes).await?;

        let source = SourceClip {
            name: name.to_string(),
            size: bytes.len(),
            duration,
        };
        info!(
            "Loaded source {} ({} bytes, {})",
            source.name,
            source.size,
            TimeSpec::from_seconds(duration)
        );
        self.session().source = Some(source.clone());
        Ok(source)
    }

    pub fn source(&self) -> Option<SourceClip> {
        self.session().source.clone()
    }

    /// Snapshot of the current parameters
    pub fn parameters(&self) -> EditParameters {
        self.session().parameters.clone()
    }

    pub fn set_parameters(&self, parameters: EditParameters) {
        self.session().parameters = parameters;
    }

    /// Modify the current parameters in place
    pub fn update_parameters<F>(&self, update: F)
    where
        F: FnOnce(&mut EditParameters),
    {
        update(&mut self.session().parameters);
    }

    /// Step rotation 90 degrees clockwise and return the new value
    pub fn rotate(&self) -> Rotation {
        let mut session = self.session();
        session.parameters.rotate();
        session.parameters.rotation
    }

    /// Arguments the current parameters compile to
    pub fn preview_arguments(&self) -> Result<CommandArguments, DomainError> {
        let session = self.session();
        let source = session.source.as_ref().ok_or(DomainError::NoSource)?;
        Ok(ParameterCompiler::compile(&session.parameters, source.duration))
    }

    /// Apply the current parameters to the loaded source
    ///
    /// On failure the previous output is kept, progress returns to zero and
    /// the error is appended to the log tail.
    pub async fn apply(&self) -> Result<OutputArtifact, DomainError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(DomainError::Busy);
        }
        let _guard = BusyGuard(&self.busy);
        self.activity().percent = 0;

        match self.run_apply().await {
            Ok(artifact) => {
                self.session().last_output = Some(artifact.clone());
                info!("Edit applied: {} bytes", artifact.len());
                Ok(artifact)
            }
            Err(e) => {
                error!("Error processing: {}", e);
                for line in e.diagnostics() {
                    debug!(target: "editx::engine", "{}", line);
                }
                self.activity().percent = 0;
                self.record(format!("Error processing: {}", e));
                Err(e)
            }
        }
    }

    async fn run_apply(&self) -> Result<OutputArtifact, DomainError> {
        let (parameters, source) = {
            let session = self.session();
            let source = session.source.clone().ok_or(DomainError::NoSource)?;
            (session.parameters.clone(), source)
        };

        parameters.validate(source.duration)?;
        let args = ParameterCompiler::compile(&parameters, source.duration);
        debug!("Compiled arguments: {}", args);

        self.engine.execute(&args).await?;
        let bytes = self.engine.read_file(OUTPUT_FILE).await?;
        Ok(OutputArtifact::new(bytes))
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Last reported progress as a whole percentage
    pub fn progress_percent(&self) -> u8 {
        self.activity().percent
    }

    /// Most recent engine and error lines, oldest first
    pub fn log_tail(&self) -> Vec<String> {
        self.activity().log_tail.lines()
    }

    /// Output of the last successful apply
    pub fn last_output(&self) -> Option<OutputArtifact> {
        self.session().last_output.clone()
    }
}
