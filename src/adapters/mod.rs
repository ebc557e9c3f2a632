// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod listeners;
pub mod mock_engine;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegEngineAdapter;
pub use mock_engine::{MockEngineAdapter, MockOutcome};
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::{ConfigOverrides, EditxConfig, TomlConfigAdapter};
pub use tracing_log::TracingLogAdapter;
