// Single-slot event listeners shared by engine adapters

use std::sync::RwLock;

use crate::domain::model::{LogEvent, ProgressEvent};
use crate::ports::{LogHandler, ProgressHandler};

/// Holds at most one listener per event class.
///
/// Registering again replaces the previous listener, so a caller that
/// re-registers after a retry never sees duplicate events.
#[derive(Default)]
pub struct EventListeners {
    progress: RwLock<Option<ProgressHandler>>,
    log: RwLock<Option<LogHandler>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_progress(&self, handler: ProgressHandler) {
        let mut slot = self.progress.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(handler);
    }

    pub fn set_log(&self, handler: LogHandler) {
        let mut slot = self.log.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(handler);
    }

    pub fn emit_progress(&self, event: &ProgressEvent) {
        // Clone out of the lock so a handler may re-register.
        let handler = self
            .progress
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(handler) = handler {
            handler(event);
        }
    }

    pub fn emit_log(&self, event: &LogEvent) {
        let handler = self.log.read().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(handler) = handler {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_reregistration_replaces_listener() {
        let listeners = EventListeners::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&first);
        listeners.set_log(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = Arc::clone(&second);
        listeners.set_log(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        listeners.emit_log(&LogEvent::new("frame=1"));

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_without_listener_is_noop() {
        let listeners = EventListeners::new();
        listeners.emit_progress(&ProgressEvent::new(0.5, 1.0));
        listeners.emit_log(&LogEvent::new("ignored"));
    }

    #[test]
    fn test_progress_listener_receives_event() {
        let listeners = EventListeners::new();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        listeners.set_progress(Arc::new(move |event| {
            sink.lock().unwrap().push(event.progress);
        }));

        listeners.emit_progress(&ProgressEvent::new(0.25, 2.5));
        listeners.emit_progress(&ProgressEvent::new(1.0, 10.0));

        assert_eq!(*seen.lock().unwrap(), vec![0.25, 1.0]);
    }
}
