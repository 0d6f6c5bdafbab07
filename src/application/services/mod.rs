mod queue_engine;
pub mod status_projection;

pub use queue_engine::{
    CooldownConfig, EngineError, JobView, QueueEngine, QueueSnapshot, SubmittedFile,
};
