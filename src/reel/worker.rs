use std::any::Any;
use std::sync::mpsc;
use std::thread;

use super::config::PipelineConfig;
use super::engine::{CancelToken, SystemMediaEngine};
use super::error::{ReelError, Stage};
use super::pipeline::AssemblyPipeline;
use super::request::{AssemblyRequest, PipelineResult};

/// Run one assembly request on an isolated worker. The request goes in and a
/// single `PipelineResult` comes back over a channel; a worker that dies
/// without reporting becomes a `WorkerCrash` failure instead of taking the
/// host down with it.
pub fn run_isolated(
    config: &PipelineConfig,
    request: AssemblyRequest,
    cancel: CancelToken,
    show_progress: bool,
) -> PipelineResult {
    let config = config.clone();
    run_on_worker(move || {
        let engine = SystemMediaEngine::new(&config)
            .with_cancel(cancel)
            .with_progress(show_progress);
        AssemblyPipeline::new(&config, &engine).run(&request)
    })
}

fn run_on_worker<F>(job: F) -> PipelineResult
where
    F: FnOnce() -> PipelineResult + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("promoreel-assembly".to_string())
        .spawn(move || {
            let _ = tx.send(job());
        });
    let handle = match handle {
        Ok(handle) => handle,
        Err(e) => {
            return PipelineResult::Failed {
                stage: Stage::Worker,
                error: ReelError::WorkerCrash(format!("failed to spawn worker: {e}")),
            };
        }
    };

    match rx.recv() {
        Ok(result) => {
            let _ = handle.join();
            result
        }
        Err(_) => {
            // The sender dropped without delivering a result.
            let reason = match handle.join() {
                Ok(()) => "worker exited without reporting a result".to_string(),
                Err(payload) => panic_message(payload),
            };
            PipelineResult::Failed {
                stage: Stage::Worker,
                error: ReelError::WorkerCrash(reason),
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("worker panicked: {message}")
    } else {
        "worker panicked".to_string()
    }
}
