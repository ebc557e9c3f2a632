//! Editing session tests against the in-process engine double

use std::sync::Arc;

use tokio::sync::Notify;

use editx_cli::adapters::{MockEngineAdapter, MockOutcome};
use editx_cli::app::EditInteractor;
use editx_cli::domain::model::{INPUT_FILE, OUTPUT_FILE};
use editx_cli::ports::EnginePort;
use editx_cli::*;

const CLIP: &[u8] = b"fake mp4 payload";

/// Ready session with `CLIP` loaded as a 10 second source
async fn loaded_session(engine: Arc<MockEngineAdapter>) -> EditInteractor {
    let session = EditInteractor::new(engine);
    session.load_engine().await.unwrap();
    session.load_source("clip.mp4", CLIP, 10.0).await.unwrap();
    session
}

#[tokio::test]
async fn test_load_source_writes_input_and_resets_parameters() {
    let engine = Arc::new(MockEngineAdapter::new());
    let session = loaded_session(Arc::clone(&engine)).await;

    assert_eq!(engine.file(INPUT_FILE).as_deref(), Some(CLIP));
    let source = session.source().unwrap();
    assert_eq!(source.name, "clip.mp4");
    assert_eq!(source.size, CLIP.len());

    session.update_parameters(|p| {
        p.blur_amount = 7;
        p.trim_start = 2.0;
    });
    session.apply().await.unwrap();
    assert!(session.last_output().is_some());

    session.load_source("other.mp4", b"other", 6.5).await.unwrap();

    assert_eq!(session.parameters(), EditParameters::for_duration(6.5));
    assert!(session.last_output().is_none());
    assert_eq!(engine.file(INPUT_FILE).as_deref(), Some(&b"other"[..]));
}

#[tokio::test]
async fn test_load_source_before_engine_is_not_ready() {
    let engine = Arc::new(MockEngineAdapter::new());
    let session = EditInteractor::new(engine);

    let result = session.load_source("clip.mp4", CLIP, 10.0).await;

    assert!(matches!(result, Err(DomainError::NotReady(_))));
    assert!(session.source().is_none());
}

#[tokio::test]
async fn test_apply_runs_compiled_arguments() {
    let engine = Arc::new(MockEngineAdapter::new());
    let session = loaded_session(Arc::clone(&engine)).await;

    session.update_parameters(|p| {
        p.trim_start = 1.0;
        p.trim_end = 4.5;
        p.grayscale = true;
        p.reverse = true;
    });
    assert_eq!(session.rotate(), Rotation::Quarter);

    let artifact = session.apply().await.unwrap();

    assert_eq!(artifact.bytes, CLIP);
    assert_eq!(artifact.mime_type, "video/mp4");
    assert_eq!(artifact.file_name, "edited_video.mp4");
    assert_eq!(session.progress_percent(), 100);

    let executions = engine.executions();
    assert_eq!(executions.len(), 1);
    assert_eq!(
        executions[0].to_string(),
        "-i input.mp4 -ss 1 -to 4.5 -vf hue=s=0,transpose=1,reverse -af areverse -preset ultrafast output.mp4"
    );
    assert_eq!(executions[0], session.preview_arguments().unwrap());
    assert_eq!(engine.file(OUTPUT_FILE).as_deref(), Some(CLIP));
}

#[tokio::test]
async fn test_apply_without_source() {
    let engine = Arc::new(MockEngineAdapter::new());
    let session = EditInteractor::new(engine.clone());
    session.load_engine().await.unwrap();

    assert!(matches!(session.apply().await, Err(DomainError::NoSource)));
    assert!(matches!(
        session.preview_arguments(),
        Err(DomainError::NoSource)
    ));
    assert!(engine.executions().is_empty());
}

#[tokio::test]
async fn test_invalid_parameters_never_reach_engine() {
    let engine = Arc::new(MockEngineAdapter::new());
    let session = loaded_session(Arc::clone(&engine)).await;

    session.update_parameters(|p| {
        p.trim_start = 6.0;
        p.trim_end = 3.0;
    });
    assert!(matches!(
        session.apply().await,
        Err(DomainError::InvalidParameters(_))
    ));

    session.set_parameters(EditParameters {
        trim_end: 12.0,
        ..EditParameters::for_duration(10.0)
    });
    assert!(matches!(
        session.apply().await,
        Err(DomainError::InvalidParameters(_))
    ));

    assert!(engine.executions().is_empty());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_failure_keeps_previous_output() {
    let engine = Arc::new(MockEngineAdapter::new());
    let session = loaded_session(Arc::clone(&engine)).await;

    let first = session.apply().await.unwrap();

    engine.set_outcome(MockOutcome::Fail {
        exit_code: 1,
        log: vec!["Error while filtering".to_string()],
    });
    session.update_parameters(|p| p.invert = true);
    let result = session.apply().await;

    match result {
        Err(DomainError::Execution { exit_code, log }) => {
            assert_eq!(exit_code, Some(1));
            assert_eq!(log, vec!["Error while filtering".to_string()]);
        }
        other => panic!("expected execution failure, got {:?}", other),
    }
    assert_eq!(session.last_output(), Some(first));
    assert_eq!(session.progress_percent(), 0);
    assert!(!session.is_busy());

    let tail = session.log_tail();
    assert_eq!(tail[tail.len() - 2], "Error while filtering");
    assert!(tail[tail.len() - 1].starts_with("Error processing: "));
}

#[tokio::test]
async fn test_log_tail_keeps_last_five_lines() {
    let engine = Arc::new(MockEngineAdapter::new());
    let session = loaded_session(Arc::clone(&engine)).await;

    let log: Vec<String> = (1..=8).map(|i| format!("line {}", i)).collect();
    engine.set_outcome(MockOutcome::Fail { exit_code: 1, log });

    assert!(session.apply().await.is_err());

    let tail = session.log_tail();
    assert_eq!(tail.len(), 5);
    assert_eq!(tail[0], "line 5");
    assert_eq!(tail[3], "line 8");
    assert!(tail[4].starts_with("Error processing: "));
}

#[tokio::test]
async fn test_concurrent_apply_is_rejected() {
    let gate = Arc::new(Notify::new());
    let engine = Arc::new(MockEngineAdapter::new().with_gate(Arc::clone(&gate)));
    let session = Arc::new(loaded_session(Arc::clone(&engine)).await);

    let running = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.apply().await })
    };
    while engine.executions().is_empty() {
        tokio::task::yield_now().await;
    }

    assert!(session.is_busy());
    assert!(matches!(session.apply().await, Err(DomainError::Busy)));

    gate.notify_one();
    running.await.unwrap().unwrap();

    assert!(!session.is_busy());
    assert_eq!(engine.executions().len(), 1);
}

#[tokio::test]
async fn test_load_source_during_apply_is_rejected() {
    let gate = Arc::new(Notify::new());
    let engine = Arc::new(MockEngineAdapter::new().with_gate(Arc::clone(&gate)));
    let session = Arc::new(EditInteractor::new(engine.clone()));
    session.load_engine().await.unwrap();
    session.load_source("a.mp4", b"AAAA", 10.0).await.unwrap();

    let running = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.apply().await })
    };
    while engine.executions().is_empty() {
        tokio::task::yield_now().await;
    }

    let result = session.load_source("b.mp4", b"BBBB", 8.0).await;

    assert!(matches!(result, Err(DomainError::Busy)));
    assert_eq!(session.source().unwrap().name, "a.mp4");
    assert_eq!(engine.file(INPUT_FILE).as_deref(), Some(&b"AAAA"[..]));

    gate.notify_one();
    let artifact = running.await.unwrap().unwrap();
    assert_eq!(artifact.bytes, b"AAAA");
    assert_eq!(session.last_output(), Some(artifact));

    session.load_source("b.mp4", b"BBBB", 8.0).await.unwrap();
    assert_eq!(session.source().unwrap().name, "b.mp4");
    assert!(session.last_output().is_none());
}

#[tokio::test]
async fn test_reload_after_failed_init_does_not_duplicate_listeners() {
    let engine = Arc::new(MockEngineAdapter::new().failing_initializations(1));
    let session = EditInteractor::new(engine.clone());

    assert!(matches!(
        session.load_engine().await,
        Err(DomainError::Initialization(_))
    ));
    assert!(!session.is_ready());
    assert!(session.log_tail()[0].starts_with("Error loading engine: "));

    session.load_engine().await.unwrap();
    session.load_engine().await.unwrap();
    assert!(session.is_ready());
    assert_eq!(engine.init_attempts(), 2);

    session.load_source("clip.mp4", CLIP, 10.0).await.unwrap();
    session.apply().await.unwrap();

    let engine_lines = session
        .log_tail()
        .iter()
        .filter(|line| line.starts_with("mock engine: "))
        .count();
    assert_eq!(engine_lines, 1);
}

#[tokio::test]
async fn test_engine_rejects_execute_before_input_written() {
    let engine = MockEngineAdapter::new();
    engine.initialize().await.unwrap();

    let args = ParameterCompiler::compile(&EditParameters::for_duration(10.0), 10.0);

    assert!(matches!(engine.execute(&args).await, Err(DomainError::Io(_))));
}
