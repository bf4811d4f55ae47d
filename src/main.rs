//! athar-cv: bilingual CV analysis for the humanitarian sector

use athar_cv::cli::{self, Cli, Commands, ConfigAction};
use athar_cv::config::{Config, OutputFormat};
use athar_cv::error::{AtharError, Result};
use athar_cv::input::InputManager;
use athar_cv::llm::achievement::{AchievementGenerator, TransformOptions};
use athar_cv::llm::job_description::JobDescriptionGenerator;
use athar_cv::llm::{extract_json, CommandGenerator, TextGenerator};
use athar_cv::output::formatter::{save_report_to_file, ReportGenerator};
use athar_cv::processing::ats_engine::AtsEngine;
use athar_cv::processing::strength_scorer::{ScoreOptions, StrengthScorer};
use clap::Parser;
use colored::Colorize;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Analyze { cv, job, output, save } => {
            info!("Starting ATS analysis");
            let format = resolve_format(output.as_deref(), &config)?;

            cli::validate_file_extension(&cv, &["txt", "md", "markdown"])
                .map_err(|e| AtharError::InvalidInput(format!("CV file: {}", e)))?;

            let mut input_manager = InputManager::new();
            let cv_text = input_manager.extract_text(&cv).await?;
            let job_text = load_job(&mut input_manager, job.as_deref()).await?;

            let engine = AtsEngine::from_config(&config)?;
            let result = engine.analyze(&cv_text, job_text.as_deref()).await?;

            let report = report_generator(&config, format).analysis_report(&result, format)?;
            emit(&report, save.as_deref())?;
        }

        Commands::Score { cv, job, no_ats, output, save } => {
            info!("Starting CV strength scoring");
            let format = resolve_format(output.as_deref(), &config)?;

            cli::validate_file_extension(&cv, &["txt", "md", "markdown", "json"])
                .map_err(|e| AtharError::InvalidInput(format!("CV file: {}", e)))?;

            let mut input_manager = InputManager::new();
            let cv_input = input_manager.load_cv(&cv).await?;
            let job_text = load_job(&mut input_manager, job.as_deref()).await?;

            let scorer = StrengthScorer::new(AtsEngine::from_config(&config)?);
            let options = ScoreOptions {
                include_ats: config.scoring.include_ats && !no_ats,
                job_description: job_text,
                detailed_analysis: config.scoring.detailed_analysis,
            };
            let score = scorer.score_cv(&cv_input, &options).await?;

            let report = report_generator(&config, format).strength_report(&score, format)?;
            emit(&report, save.as_deref())?;
        }

        Commands::Achieve { tasks, sector, no_templates, json } => {
            let mut generator = AchievementGenerator::new()?;
            if let Some(backend) = text_generator(&config) {
                generator = generator.with_generator(backend);
            }

            let options = TransformOptions {
                sector: sector.unwrap_or_else(|| config.generation.default_sector.clone()),
                use_templates: !no_templates,
                ..TransformOptions::default()
            };
            let outcomes = generator.transform_multiple(&tasks, &options).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcomes)?);
                return Ok(());
            }

            for outcome in &outcomes {
                println!("{} {}", "Task:".bold(), outcome.task);
                match (&outcome.achievement, &outcome.error) {
                    (Some(achievement), _) => {
                        println!("  {} {}", "→".green(), achievement.text);
                        println!(
                            "  source: {} | quality: {} ({:?})",
                            achievement.source, achievement.quality.score, achievement.quality.level
                        );
                        for improvement in generator.suggest_improvements(&achievement.text) {
                            println!("  💡 {}", improvement.message);
                        }
                    }
                    (None, Some(e)) => println!("  {} {}", "✗".red(), e),
                    (None, None) => {}
                }
                println!();
            }
        }

        Commands::Responsibilities { title, organization, context, json } => {
            let mut generator = JobDescriptionGenerator::new()?;
            if let Some(backend) = text_generator(&config) {
                generator = generator.with_generator(backend);
            }

            let description = generator
                .generate_responsibilities(&title, &organization, context.as_deref())
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&description)?);
                return Ok(());
            }

            println!("{} {}", "Responsibilities for".bold(), title.bold());
            if let Some(focus) = &description.focus_area {
                println!("Focus area: {}", focus);
            }
            for item in &description.responsibilities {
                println!("  • {}", item);
            }

            let validation = generator.validate_description(&description.responsibilities);
            for issue in &validation.issues {
                println!("  {} {}", "⚠".yellow(), issue);
            }
        }

        Commands::ExtractJson { file } => {
            let text = match file {
                Some(path) => tokio::fs::read_to_string(&path).await?,
                None => {
                    let mut buffer = String::new();
                    tokio::io::stdin().read_to_string(&mut buffer).await?;
                    buffer
                }
            };

            let value = extract_json(&text)
                .ok_or_else(|| AtharError::InvalidInput("No JSON object could be recovered".to_string()))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                println!("{}", config.to_toml()?);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::reset(&config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

fn resolve_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(format) => cli::parse_output_format(format).map_err(AtharError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn load_job(input_manager: &mut InputManager, job: Option<&Path>) -> Result<Option<String>> {
    match job {
        Some(path) => {
            cli::validate_file_extension(path, &["txt", "md", "markdown"])
                .map_err(|e| AtharError::InvalidInput(format!("Job description file: {}", e)))?;
            Ok(Some(input_manager.extract_text(path).await?))
        }
        None => Ok(None),
    }
}

fn report_generator(config: &Config, format: OutputFormat) -> ReportGenerator {
    let use_colors = config.output.color_output && format == OutputFormat::Console;
    ReportGenerator::with_options(use_colors, config.output.detailed, true)
}

fn text_generator(config: &Config) -> Option<Arc<dyn TextGenerator>> {
    let generation = &config.generation;
    generation.command.as_ref().map(|program| {
        info!("Using generator command '{}'", program);
        Arc::new(CommandGenerator::new(
            program.clone(),
            generation.args.clone(),
            generation.timeout_secs,
        )) as Arc<dyn TextGenerator>
    })
}

fn emit(report: &str, save: Option<&Path>) -> Result<()> {
    match save {
        Some(path) => {
            save_report_to_file(report, path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", report),
    }
    Ok(())
}
