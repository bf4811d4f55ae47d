//! CLI interface for athar-cv

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "athar-cv")]
#[command(about = "Bilingual CV analysis for the humanitarian and development sector")]
#[command(long_about = "Score Arabic and English CVs for ATS compatibility and overall strength, turn duties into achievements and draft job responsibilities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the ATS compatibility analysis on a CV
    Analyze {
        /// Path to CV file (TXT, MD)
        #[arg(long)]
        cv: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Compute the five-criterion strength score of a CV
    Score {
        /// Path to CV file (TXT, MD, JSON)
        #[arg(long)]
        cv: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Score ATS compatibility with the built-in heuristic instead of the full engine
        #[arg(long)]
        no_ats: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Rewrite task descriptions as achievement statements
    Achieve {
        /// One or more task descriptions
        #[arg(required = true)]
        tasks: Vec<String>,

        /// Sector used to fill templates
        #[arg(long)]
        sector: Option<String>,

        /// Skip the template strategy
        #[arg(long)]
        no_templates: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draft responsibilities for a job title
    Responsibilities {
        /// Job title
        #[arg(short, long)]
        title: String,

        /// Hiring organization
        #[arg(long, default_value = "")]
        organization: String,

        /// Extra context passed to the generator
        #[arg(long)]
        context: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract a JSON object from free-form text (stdin when no file is given)
    ExtractJson {
        /// Input file
        file: Option<PathBuf>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Console));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.TXT"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.pdf"), &["txt", "md"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["txt"]).is_err());
    }

    #[test]
    fn test_parse_achieve_command() {
        let cli = Cli::try_parse_from([
            "athar-cv",
            "achieve",
            "تنسيق توزيع المساعدات",
            "متابعة المشاريع",
            "--sector",
            "WASH",
            "--no-templates",
        ])
        .unwrap();

        match cli.command {
            Commands::Achieve { tasks, sector, no_templates, json } => {
                assert_eq!(tasks.len(), 2);
                assert_eq!(sector.as_deref(), Some("WASH"));
                assert!(no_templates);
                assert!(!json);
            }
            _ => panic!("expected achieve"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "athar-cv",
            "analyze",
            "--cv",
            "cv.txt",
            "--verbose",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
