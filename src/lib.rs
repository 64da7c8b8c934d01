pub mod aggregate;
pub mod chat;
pub mod config;
pub mod dataset;
pub mod error;
pub mod events;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod server;
pub mod types;

pub use error::{PipelineError, Result};
