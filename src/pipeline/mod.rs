pub mod orchestrator;
pub mod processing;
pub mod summary;

pub use orchestrator::{rank, Pipeline, PipelineRun};
pub use summary::summarize;
