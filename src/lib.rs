//! Bilingual (Arabic/English) CV analysis: ATS compatibility scoring, CV
//! strength scoring, achievement and responsibility drafting, and recovery
//! of JSON from generated text.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod llm;
pub mod output;

pub use error::{AtharError, Result};
pub use config::Config;
