//! # PitchPlot Common Library
//!
//! Shared code for the PitchPlot services including:
//! - Pitch record model and validation
//! - Model-reply JSON extraction
//! - Usage filtering
//! - Plot geometry and pitch color tables
//! - Configuration loading

pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod plot;
pub mod record;

pub use error::{Error, Result};
pub use record::PitchRecord;
