//! Integration tests for athar-cv

use athar_cv::config::Config;
use athar_cv::input::manager::InputManager;
use athar_cv::llm::achievement::{AchievementGenerator, Strategy, TransformOptions};
use athar_cv::llm::job_description::{DescriptionSource, JobDescriptionGenerator};
use athar_cv::llm::extract_json;
use athar_cv::output::formatter::{MarkdownFormatter, OutputFormatter};
use athar_cv::processing::ats_engine::{AtsEngine, AtsLevel, ErrorKind};
use athar_cv::processing::keyword_matcher::Section;
use athar_cv::processing::strength_scorer::{CvInput, ScoreOptions, StrengthScorer};
use athar_cv::AtharError;
use std::path::Path;

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_cv.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Rana Khalil"));
    assert!(text.contains("قاد فريق الاستجابة الطارئة"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_cv.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Rana Khalil"));
    assert!(text.contains("Professional Summary"));
    assert!(text.contains("GIS"));
    // Markdown syntax is gone
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
    assert!(!text.contains('`'));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_cv.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(AtharError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(AtharError::InvalidInput(_))));
}

#[tokio::test]
async fn test_ats_analysis_of_strong_cv() {
    let mut manager = InputManager::new();
    let cv = manager.extract_text(Path::new("tests/fixtures/sample_cv.txt")).await.unwrap();

    let result = AtsEngine::new().unwrap().analyze(&cv, None).await.unwrap();

    assert!(result.sections.all_found(), "missing {:?}", result.sections.missing);
    assert!(result.errors.is_empty(), "errors {:?}", result.errors);
    assert!(result.keywords.total >= 20);
    assert!(result.breakdown.job_match.is_none());
    assert!(result.score >= 70, "score {}", result.score);
    assert!(matches!(result.level, AtsLevel::Excellent | AtsLevel::Good));
}

#[tokio::test]
async fn test_ats_analysis_with_job_description() {
    let mut manager = InputManager::new();
    let cv = manager.extract_text(Path::new("tests/fixtures/sample_cv.txt")).await.unwrap();
    let job = manager.extract_text(Path::new("tests/fixtures/job.txt")).await.unwrap();

    let result = AtsEngine::new().unwrap().analyze(&cv, Some(&job)).await.unwrap();

    let matched = result.keywords.job_matched.as_ref().unwrap();
    assert!(matched.contains(&"WASH".to_string()));
    assert!(matched.contains(&"Procurement".to_string()));
    assert!(result.keywords.job_missing.is_some());
    assert!(result.breakdown.job_match.unwrap() > 0.0);
}

#[tokio::test]
async fn test_ats_analysis_of_weak_cv() {
    let mut manager = InputManager::new();
    let cv = manager.extract_text(Path::new("tests/fixtures/weak_cv.txt")).await.unwrap();

    let result = AtsEngine::new().unwrap().analyze(&cv, None).await.unwrap();

    assert_eq!(result.level, AtsLevel::Poor);
    assert!(result.has_error(ErrorKind::NoKeywords));
    assert!(result.has_error(ErrorKind::MissingSections));
    assert!(!result.suggestions.is_empty());
}

#[tokio::test]
async fn test_markdown_cv_keeps_section_headers() {
    let mut manager = InputManager::new();
    let cv = manager.extract_text(Path::new("tests/fixtures/sample_cv.md")).await.unwrap();

    let result = AtsEngine::new().unwrap().analyze(&cv, None).await.unwrap();
    assert_eq!(result.sections.found, Section::ALL.to_vec());
}

#[tokio::test]
async fn test_strength_scores_rank_cvs() {
    let mut manager = InputManager::new();
    let strong = manager.load_cv(Path::new("tests/fixtures/sample_cv.txt")).await.unwrap();
    let weak = manager.load_cv(Path::new("tests/fixtures/weak_cv.txt")).await.unwrap();

    let scorer = StrengthScorer::new(AtsEngine::new().unwrap());
    let options = ScoreOptions::default();

    let strong_score = scorer.score_cv(&strong, &options).await.unwrap();
    let weak_score = scorer.score_cv(&weak, &options).await.unwrap();

    assert!(strong_score.total > weak_score.total);
    assert!(strong_score.total <= 100);
    let details = strong_score.details.as_ref().unwrap();
    assert!(details.ats.is_some());
    assert!(details.achievements.has_quantifiable_results);
    assert!(!weak_score.suggestions.is_empty());
}

#[tokio::test]
async fn test_structured_cv_is_scored() {
    let mut manager = InputManager::new();
    let cv = manager.load_cv(Path::new("tests/fixtures/sample_cv.json")).await.unwrap();
    assert!(matches!(cv, CvInput::Structured(_)));

    let scorer = StrengthScorer::without_ats().unwrap();
    let options = ScoreOptions {
        detailed_analysis: false,
        ..ScoreOptions::default()
    };
    let score = scorer.score_cv(&cv, &options).await.unwrap();

    assert!(score.details.is_none());
    assert!(score.breakdown.skills > 0.0);

    let report = MarkdownFormatter::new(false).format_strength(&score).unwrap();
    assert!(report.contains(&format!("{}/100", score.total)));
}

#[tokio::test]
async fn test_extract_json_from_fenced_generator_output() {
    let text = std::fs::read_to_string("tests/fixtures/generated_response.txt").unwrap();
    let value = extract_json(&text).unwrap();

    let items = value["responsibilities"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], "إدارة برامج المياه والصرف الصحي");
}

#[tokio::test]
async fn test_achievement_without_generator_uses_templates() {
    let generator = AchievementGenerator::new().unwrap().with_seed(7);
    let tasks = vec!["تنسيق توزيع المساعدات الغذائية".to_string(), "   ".to_string()];

    let outcomes = generator.transform_multiple(&tasks, &TransformOptions::default()).await;

    assert_eq!(outcomes.len(), 2);
    let first = outcomes[0].achievement.as_ref().unwrap();
    assert_eq!(first.source, Strategy::Template);
    assert!(!outcomes[1].success());
    assert!(outcomes[1].error.is_some());
}

#[tokio::test]
async fn test_known_title_uses_builtin_template() {
    let generator = JobDescriptionGenerator::new().unwrap();
    let description = generator
        .generate_responsibilities("WASH Officer", "UNICEF", None)
        .await
        .unwrap();

    assert_eq!(description.source, DescriptionSource::Template);
    assert!(!description.responsibilities.is_empty());
    assert!(description.focus_area.is_some());
}

#[tokio::test]
async fn test_config_keywords_reach_the_engine() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[taxonomy]
technical = ["Kobo Toolbox"]

[scoring]
include_ats = true
detailed_analysis = false

[generation]
timeout_secs = 30
default_sector = "WASH"

[output]
format = "Json"
detailed = true
color_output = false
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.generation.default_sector, "WASH");

    let engine = AtsEngine::from_config(&config).unwrap();
    let result = engine
        .analyze("Skills: Kobo Toolbox data collection", None)
        .await
        .unwrap();
    assert!(result.keywords.found.contains(&"Kobo Toolbox".to_string()));
}
