//! Extraction provider boundary

pub mod client;
pub mod prompt;

pub use client::{AnthropicClient, TableExtractor, VisionError, ANTHROPIC_VERSION};
