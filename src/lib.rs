//! Parlance - voice translation with emotion and meaning detection
//!
//! Takes a recorded voice clip through a six-stage pipeline: speech
//! recognition, language detection, translation, sentiment analysis,
//! meaning analysis, and speech synthesis. Each stage is a narrow
//! request/response call to an external provider; the value of this
//! crate is sequencing them and presenting the intermediate results.

pub mod config;
pub mod display;
pub mod pipeline;
pub mod watch;

pub use config::{Credentials, PipelineConfig};
pub use pipeline::{Pipeline, PipelineError, PipelineOutcome};
