//! Text generation flows and recovery of their structured output

pub mod achievement;
pub mod generator;
pub mod job_description;
pub mod json_extractor;
pub mod prompts;

pub use generator::{CommandGenerator, TextGenerator};
pub use json_extractor::{extract_json, extract_json_as, extract_json_value};
