//! ATS (Applicant Tracking System) scoring engine
//!
//! Sections (30) + taxonomy keywords (40) + job-description overlap (20,
//! only when a job description is given) + error bucket (10).

use crate::config::Config;
use crate::error::Result;
use crate::processing::keyword_matcher::{
    KeywordCategory, KeywordMatcher, KeywordTaxonomy, Section, SectionFindings,
};
use crate::processing::strength_scorer::Criterion;
use crate::processing::text_processor::TextProcessor;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SECTIONS_WEIGHT: f64 = 30.0;
pub const KEYWORDS_WEIGHT: f64 = 40.0;
pub const JOB_MATCH_WEIGHT: f64 = 20.0;
pub const ERRORS_WEIGHT: f64 = 10.0;

/// Keyword count that earns the full keyword bucket
const KEYWORDS_FOR_FULL_SCORE: f64 = 20.0;
const ERROR_PENALTY: f64 = 2.5;
const MIN_KEYWORDS: usize = 10;
const GOOD_KEYWORD_COUNT: usize = 15;
const GOOD_JOB_MATCH_COUNT: usize = 10;
const MIN_SUMMARY_LENGTH: usize = 100;
const SUMMARY_WINDOW: usize = 500;
const JOB_MISSING_SUGGESTED: usize = 5;

const ACHIEVEMENT_PATTERN: &str =
    r"(?i)achieved|accomplished|increased|decreased|improved|reduced|حقق|أنجز|زاد|خفض|حسّن|قلل";
const SUMMARY_PATTERN: &str = r"(?i)summary|objective|ملخص|الهدف";

/// Severity of an error finding, reused as suggestion priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{}", name)
    }
}

/// The fixed catalog of recognized CV errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoKeywords,
    ComplexFormat,
    MissingSections,
    NoQuantifiable,
    GenericSummary,
    Typos,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::NoKeywords,
        ErrorKind::ComplexFormat,
        ErrorKind::MissingSections,
        ErrorKind::NoQuantifiable,
        ErrorKind::GenericSummary,
        ErrorKind::Typos,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ErrorKind::NoKeywords => "no_keywords",
            ErrorKind::ComplexFormat => "complex_format",
            ErrorKind::MissingSections => "missing_sections",
            ErrorKind::NoQuantifiable => "no_quantifiable",
            ErrorKind::GenericSummary => "generic_summary",
            ErrorKind::Typos => "typos",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::NoKeywords => "Missing keywords",
            ErrorKind::ComplexFormat => "Complex formatting",
            ErrorKind::MissingSections => "Missing sections",
            ErrorKind::NoQuantifiable => "No measurable achievements",
            ErrorKind::GenericSummary => "Generic summary",
            ErrorKind::Typos => "Spelling mistakes",
        }
    }

    pub fn severity(&self) -> Priority {
        match self {
            ErrorKind::NoKeywords => Priority::Critical,
            ErrorKind::ComplexFormat | ErrorKind::MissingSections => Priority::High,
            ErrorKind::NoQuantifiable | ErrorKind::GenericSummary => Priority::Medium,
            ErrorKind::Typos => Priority::Low,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::NoKeywords => "The CV does not contain enough keywords from the job posting",
            ErrorKind::ComplexFormat => {
                "Complex layouts (tables, columns, images) can prevent ATS software from reading the CV"
            }
            ErrorKind::MissingSections => "The CV is missing important sections",
            ErrorKind::NoQuantifiable => "Achievements are not backed by numbers or tangible results",
            ErrorKind::GenericSummary => "The professional summary is too generic and not tailored to the role",
            ErrorKind::Typos => "The CV contains spelling or grammar mistakes",
        }
    }

    pub fn finding(self) -> ErrorFinding {
        ErrorFinding {
            id: self,
            label: self.label().to_string(),
            severity: self.severity(),
            description: self.description().to_string(),
        }
    }
}

/// A triggered catalog error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorFinding {
    pub id: ErrorKind,
    pub label: String,
    pub severity: Priority,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Sections,
    Keywords,
    JobMatch,
    Error,
    Criterion(Criterion),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub priority: Priority,
    pub text: String,
}

/// Points awarded per bucket. `job_match` is absent, not zero, when no job
/// description was analysed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AtsBreakdown {
    pub sections: f64,
    pub keywords: f64,
    pub job_match: Option<f64>,
    pub errors: f64,
}

impl AtsBreakdown {
    pub fn total(&self) -> f64 {
        self.sections + self.keywords + self.job_match.unwrap_or(0.0) + self.errors
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeywordFindings {
    pub found: Vec<String>,
    pub by_category: BTreeMap<KeywordCategory, Vec<String>>,
    pub job_matched: Option<Vec<String>>,
    pub job_missing: Option<Vec<String>>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtsLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl AtsLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => AtsLevel::Excellent,
            60..=79 => AtsLevel::Good,
            40..=59 => AtsLevel::Fair,
            _ => AtsLevel::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AtsLevel::Excellent => "Excellent",
            AtsLevel::Good => "Good",
            AtsLevel::Fair => "Fair",
            AtsLevel::Poor => "Poor",
        }
    }

    /// Display color token
    pub fn color(&self) -> &'static str {
        match self {
            AtsLevel::Excellent => "#10b981",
            AtsLevel::Good => "#3b82f6",
            AtsLevel::Fair => "#f59e0b",
            AtsLevel::Poor => "#ef4444",
        }
    }
}

impl fmt::Display for AtsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32,
    pub max_score: u32,
    pub breakdown: AtsBreakdown,
    pub keywords: KeywordFindings,
    pub sections: SectionFindings,
    pub errors: Vec<ErrorFinding>,
    pub suggestions: Vec<Suggestion>,
    pub strengths: Vec<String>,
    pub level: AtsLevel,
    pub level_label: String,
    pub level_color: String,
}

impl AnalysisResult {
    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.id == kind)
    }
}

/// Result of the unscored quick check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAnalysis {
    pub score: u32,
    pub keywords: usize,
    pub sections: usize,
    pub has_numbers: bool,
    pub has_action_verbs: bool,
}

/// ATS scoring engine. Holds only immutable matching data built at construction.
#[derive(Debug, Clone)]
pub struct AtsEngine {
    matcher: KeywordMatcher,
    processor: TextProcessor,
    achievement_regex: Regex,
    summary_regex: Regex,
}

impl AtsEngine {
    /// Engine over the built-in taxonomy
    pub fn new() -> Result<Self> {
        Self::with_taxonomy(KeywordTaxonomy::humanitarian())
    }

    /// Engine over the built-in taxonomy extended with configured keywords
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_taxonomy(config.taxonomy.build_taxonomy())
    }

    pub fn with_taxonomy(taxonomy: KeywordTaxonomy) -> Result<Self> {
        Ok(Self {
            matcher: KeywordMatcher::with_taxonomy(taxonomy)?,
            processor: TextProcessor::new(),
            achievement_regex: Regex::new(ACHIEVEMENT_PATTERN)?,
            summary_regex: Regex::new(SUMMARY_PATTERN)?,
        })
    }

    pub fn matcher(&self) -> &KeywordMatcher {
        &self.matcher
    }

    /// Analyze a CV, optionally against a job description
    pub async fn analyze(&self, cv_text: &str, job_description: Option<&str>) -> Result<AnalysisResult> {
        info!("Running ATS analysis ({} chars)", cv_text.chars().count());
        let job_description = job_description.filter(|job| !job.trim().is_empty());

        let mut breakdown = AtsBreakdown::default();

        // 1. Sections
        let sections = self.matcher.detect_sections(cv_text);
        breakdown.sections =
            (sections.found.len() as f64 / Section::ALL.len() as f64 * SECTIONS_WEIGHT).round();
        debug!("Sections found: {}/{}", sections.found.len(), Section::ALL.len());

        // 2. Taxonomy keywords
        let matches = self.matcher.find_keywords(cv_text);
        let mut keywords = KeywordFindings {
            total: matches.total(),
            found: matches.found,
            by_category: matches.by_category,
            job_matched: None,
            job_missing: None,
        };
        breakdown.keywords = keyword_points(keywords.total);

        // 3. Job description overlap
        if let Some(job) = job_description {
            self.compare_with_job(cv_text, job, &mut keywords, &mut breakdown).await;
        }

        // 4. Common errors
        let errors = self.detect_errors(cv_text, &keywords, &sections);
        breakdown.errors = (ERRORS_WEIGHT - ERROR_PENALTY * errors.len() as f64).max(0.0);

        // 5. Score and level
        let score = (breakdown.total().round() as u32).min(100);
        let level = AtsLevel::from_score(score);

        // 6. Suggestions and strengths
        let suggestions = Self::build_suggestions(&keywords, &sections, &errors);
        let strengths = Self::build_strengths(&keywords, &sections);

        info!("ATS analysis completed with score {} ({})", score, level);

        Ok(AnalysisResult {
            score,
            max_score: 100,
            breakdown,
            keywords,
            sections,
            errors,
            suggestions,
            strengths,
            level,
            level_label: level.label().to_string(),
            level_color: level.color().to_string(),
        })
    }

    async fn compare_with_job(
        &self,
        cv_text: &str,
        job_description: &str,
        keywords: &mut KeywordFindings,
        breakdown: &mut AtsBreakdown,
    ) {
        let job_keywords = self.matcher.extract_job_keywords(job_description, &self.processor);
        let (matched, missing) = self.matcher.partition_terms(cv_text, &job_keywords);

        debug!(
            "Job description yielded {} keywords, {} matched",
            job_keywords.len(),
            matched.len()
        );

        if !job_keywords.is_empty() {
            let points = matched.len() as f64 / job_keywords.len() as f64 * JOB_MATCH_WEIGHT;
            breakdown.job_match = Some(points.round());
        }

        keywords.job_matched = Some(matched);
        keywords.job_missing = Some(missing);
    }

    fn detect_errors(
        &self,
        cv_text: &str,
        keywords: &KeywordFindings,
        sections: &SectionFindings,
    ) -> Vec<ErrorFinding> {
        let text = cv_text.to_lowercase();
        let mut errors = Vec::new();

        if keywords.total < MIN_KEYWORDS {
            errors.push(ErrorKind::NoKeywords.finding());
        }

        if !sections.missing.is_empty() {
            errors.push(ErrorKind::MissingSections.finding());
        }

        let has_numbers = self.processor.has_digits(&text);
        let has_achievements = self.achievement_regex.is_match(&text);
        if !has_numbers || !has_achievements {
            errors.push(ErrorKind::NoQuantifiable.finding());
        }

        if self.summary_region_length(&text) < MIN_SUMMARY_LENGTH {
            errors.push(ErrorKind::GenericSummary.finding());
        }

        errors
    }

    /// Characters in the summary header plus up to 500 following characters,
    /// 0 when there is no summary header at all
    fn summary_region_length(&self, text: &str) -> usize {
        match self.summary_regex.find(text) {
            Some(header) => {
                let following = text[header.end()..].chars().take(SUMMARY_WINDOW).count();
                header.as_str().chars().count() + following
            }
            None => 0,
        }
    }

    fn build_suggestions(
        keywords: &KeywordFindings,
        sections: &SectionFindings,
        errors: &[ErrorFinding],
    ) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        if !sections.missing.is_empty() {
            let names: Vec<&str> = sections.missing.iter().map(|s| s.name()).collect();
            suggestions.push(Suggestion {
                kind: SuggestionKind::Sections,
                priority: Priority::High,
                text: format!("Add the following sections: {}", names.join(", ")),
            });
        }

        if keywords.total < GOOD_KEYWORD_COUNT {
            suggestions.push(Suggestion {
                kind: SuggestionKind::Keywords,
                priority: Priority::High,
                text: "Add more keywords relevant to the humanitarian sector".to_string(),
            });
        }

        if let Some(missing) = keywords.job_missing.as_ref().filter(|m| !m.is_empty()) {
            let first: Vec<&str> = missing.iter().take(JOB_MISSING_SUGGESTED).map(|k| k.as_str()).collect();
            suggestions.push(Suggestion {
                kind: SuggestionKind::JobMatch,
                priority: Priority::Critical,
                text: format!("Add these keywords from the job posting: {}", first.join(", ")),
            });
        }

        for error in errors {
            suggestions.push(Suggestion {
                kind: SuggestionKind::Error,
                priority: error.severity,
                text: error.description.clone(),
            });
        }

        suggestions
    }

    fn build_strengths(keywords: &KeywordFindings, sections: &SectionFindings) -> Vec<String> {
        let mut strengths = Vec::new();

        if keywords.total >= GOOD_KEYWORD_COUNT {
            strengths.push("Good number of keywords".to_string());
        }
        if sections.all_found() {
            strengths.push("All required sections are present".to_string());
        }
        if keywords
            .job_matched
            .as_ref()
            .map_or(false, |m| m.len() >= GOOD_JOB_MATCH_COUNT)
        {
            strengths.push("Strong match with the job requirements".to_string());
        }

        strengths
    }

    /// Fast unscored check: plain substring counts, no boundary rules
    pub fn quick_analyze(&self, cv_text: &str) -> QuickAnalysis {
        let text = cv_text.to_lowercase();
        let taxonomy = self.matcher.taxonomy();

        let keywords = taxonomy
            .iter()
            .filter(|(_, keyword)| text.contains(&keyword.to_lowercase()))
            .count();

        let sections = Section::ALL
            .iter()
            .filter(|section| text.contains(&section.name().to_lowercase()))
            .count();

        let has_numbers = self.processor.has_digits(&text);
        let has_action_verbs = taxonomy
            .keywords(KeywordCategory::ActionVerbs)
            .iter()
            .any(|verb| text.contains(&verb.to_lowercase()));

        let mut score = keywords * 2 + sections * 5;
        if has_numbers {
            score += 10;
        }
        if has_action_verbs {
            score += 10;
        }

        QuickAnalysis {
            score: score.min(100) as u32,
            keywords,
            sections,
            has_numbers,
            has_action_verbs,
        }
    }
}

/// Keyword bucket: linear up to 20 keywords, capped at 40
pub fn keyword_points(found: usize) -> f64 {
    (found as f64 / KEYWORDS_FOR_FULL_SCORE * KEYWORDS_WEIGHT)
        .min(KEYWORDS_WEIGHT)
        .round()
}
