//! Text processing, keyword matching and scoring

pub mod ats_engine;
pub mod keyword_matcher;
pub mod strength_scorer;
pub mod text_processor;
