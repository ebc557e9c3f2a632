//! EditX clip editor library
//!
//! Compiles clip edit parameters (trim range, blur, colour adjustments,
//! rotation, reverse) into a single FFmpeg invocation and runs it against an
//! isolated working directory.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    CommandArguments, EditParameters, EngineState, LogEvent, OutputArtifact, ProgressEvent,
    Rotation, TimeSpec,
};
pub use domain::rules::ParameterCompiler;
pub use error::{EditxError, EditxResult};
