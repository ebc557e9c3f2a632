use std::sync::Arc;

use crate::adapters::{EditxConfig, FFmpegEngineAdapter, FFprobeAdapter};
use crate::app::edit_interactor::EditInteractor;
use crate::ports::{EnginePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn edit_interactor(&self) -> Arc<EditInteractor>;
    fn probe(&self) -> Arc<dyn ProbePort>;
    fn engine(&self) -> Arc<dyn EnginePort>;
}

/// Wires the single engine instance into the session that uses it
pub struct DefaultAppContainer {
    engine: Arc<dyn EnginePort>,
    probe: Arc<dyn ProbePort>,
    edit_interactor: Arc<EditInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &EditxConfig) -> Self {
        let engine = Arc::new(
            FFmpegEngineAdapter::new(config.engine.ffmpeg_path.clone())
                .with_diagnostic_lines(config.engine.diagnostic_lines),
        );
        let probe = Arc::new(FFprobeAdapter::new(config.engine.ffprobe_path.clone()));

        Self::with_ports(engine, probe)
    }

    /// Build around existing adapters
    pub fn with_ports(engine: Arc<dyn EnginePort>, probe: Arc<dyn ProbePort>) -> Self {
        let edit_interactor = Arc::new(EditInteractor::new(Arc::clone(&engine)));

        Self {
            engine,
            probe,
            edit_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn edit_interactor(&self) -> Arc<EditInteractor> {
        Arc::clone(&self.edit_interactor)
    }

    fn probe(&self) -> Arc<dyn ProbePort> {
        Arc::clone(&self.probe)
    }

    fn engine(&self) -> Arc<dyn EnginePort> {
        Arc::clone(&self.engine)
    }
}
