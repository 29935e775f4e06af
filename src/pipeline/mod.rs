// Voice translation pipeline - fixed six-stage sequence over external providers

pub mod orchestrator;
pub mod stages;
pub mod types;

pub use orchestrator::{Pipeline, PipelineError};
pub use stages::Collaborators;
pub use types::*;
