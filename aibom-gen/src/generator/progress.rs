//! Progress events
//!
//! Typed events emitted through a user-supplied callback while the
//! orchestrator works. The callback is assumed non-blocking; callers that
//! need buffering wrap it with a queue.

/// One progress update.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    FetchStart {
        model_id: String,
        index: usize,
        total: usize,
    },
    FetchApiComplete {
        model_id: String,
    },
    FetchReadmeComplete {
        model_id: String,
    },
    BuildStart {
        model_id: String,
    },
    BuildComplete {
        model_id: String,
    },
    DatasetStart {
        model_id: String,
        dataset_id: String,
    },
    DatasetComplete {
        model_id: String,
        dataset_id: String,
    },
    ModelComplete {
        model_id: String,
        datasets: usize,
    },
    Error {
        model_id: String,
        message: String,
    },
}

/// Callback receiving progress events.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;
