//! Report rendering for analysis results

pub mod formatter;

pub use formatter::{save_report_to_file, OutputFormatter, ReportGenerator};
