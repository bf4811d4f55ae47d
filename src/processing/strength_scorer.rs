//! CV strength scoring over five weighted criteria

use crate::error::Result;
use crate::processing::ats_engine::{AnalysisResult, AtsEngine, Priority, Suggestion, SuggestionKind};
use crate::processing::keyword_matcher::{contains_bounded, KeywordCategory, KeywordMatcher, Section};
use crate::processing::text_processor::TextProcessor;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Verbs that open a strong Arabic achievement statement
pub const STRONG_VERBS: [&str; 16] = [
    "قاد", "طور", "أنشأ", "حقق", "أدار", "نسق", "نفذ", "صمم",
    "حسّن", "عزز", "أسس", "بنى", "حوّل", "جدد", "أطلق", "وجه",
];

/// Passive or vague verbs that weaken a CV
pub const WEAK_VERBS: [&str; 6] = ["ساعد", "شارك", "عمل", "قام", "كان", "تم"];

const ACHIEVEMENT_WORDS: [&str; 5] = ["حقق", "أنجز", "نجح", "تفوق", "تميز"];
const IMPACT_WORDS: [&str; 4] = ["تحسين", "زيادة", "تطوير", "تعزيز"];
const STANDARD_SECTIONS: [&str; 3] = ["experience", "education", "skills"];

const LANGUAGE_NAMES: [&str; 16] = [
    "Arabic", "English", "French", "Spanish", "Kurdish", "Turkish", "German", "Russian",
    "العربية", "الإنجليزية", "الانجليزية", "الفرنسية", "الإسبانية", "الكردية", "التركية", "الألمانية",
];

/// The five scoring criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Writing,
    Clarity,
    Ats,
    Skills,
    Achievements,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Writing,
        Criterion::Clarity,
        Criterion::Ats,
        Criterion::Skills,
        Criterion::Achievements,
    ];

    /// Points available for this criterion; the weights sum to 100
    pub fn weight(&self) -> f64 {
        match self {
            Criterion::Writing | Criterion::Clarity => 20.0,
            Criterion::Ats => 30.0,
            Criterion::Skills | Criterion::Achievements => 15.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Writing => "Writing",
            Criterion::Clarity => "Clarity",
            Criterion::Ats => "ATS compatibility",
            Criterion::Skills => "Skills",
            Criterion::Achievements => "Achievements",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Criterion::Writing => "Quality of professional wording",
            Criterion::Clarity => "Clear information that is easy to read",
            Criterion::Ats => "Readability by automated screening systems",
            Criterion::Skills => "Range and quality of listed skills",
            Criterion::Achievements => "Measurable, meaningful achievements",
        }
    }

    /// The fixed improvement tip offered when this criterion is weak
    pub fn improvement_tip(&self) -> (Priority, &'static str) {
        match self {
            Criterion::Writing => (
                Priority::High,
                "Open each statement with a strong verb such as قاد, طور or حقق",
            ),
            Criterion::Clarity => (Priority::High, "Organise the CV into clear, consistent sections"),
            Criterion::Ats => (Priority::Critical, "Add more keywords related to your field"),
            Criterion::Skills => (Priority::Medium, "Add a varied mix of technical and soft skills"),
            Criterion::Achievements => (Priority::High, "Turn tasks into achievements that state their results"),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// CV content to score: raw text or a structured record
#[derive(Debug, Clone, PartialEq)]
pub enum CvInput {
    Text(String),
    Structured(serde_json::Value),
}

impl CvInput {
    /// Text used by every check. Structured records are serialized as
    /// compact JSON with sorted keys, so the same record always yields the
    /// same text.
    pub fn text(&self) -> Result<Cow<'_, str>> {
        match self {
            CvInput::Text(text) => Ok(Cow::Borrowed(text.as_str())),
            CvInput::Structured(value) => Ok(Cow::Owned(serde_json::to_string(value)?)),
        }
    }
}

impl From<String> for CvInput {
    fn from(text: String) -> Self {
        CvInput::Text(text)
    }
}

impl From<&str> for CvInput {
    fn from(text: &str) -> Self {
        CvInput::Text(text.to_string())
    }
}

impl From<serde_json::Value> for CvInput {
    fn from(value: serde_json::Value) -> Self {
        CvInput::Structured(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOptions {
    pub include_ats: bool,
    pub job_description: Option<String>,
    pub detailed_analysis: bool,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            include_ats: true,
            job_description: None,
            detailed_analysis: true,
        }
    }
}

/// Layout checks that cannot be judged from plain text. The defaults treat
/// every document as consistently formatted and free of complex layout.
pub trait FormattingInspector: Send + Sync + fmt::Debug {
    fn has_consistent_formatting(&self, _text: &str) -> bool {
        true
    }

    fn has_complex_formatting(&self, _text: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormatting;

impl FormattingInspector for PlainTextFormatting {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Soft,
    Language,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: SkillCategory,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrengthBreakdown {
    pub writing: f64,
    pub clarity: f64,
    pub ats: f64,
    pub skills: f64,
    pub achievements: f64,
}

impl StrengthBreakdown {
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Writing => self.writing,
            Criterion::Clarity => self.clarity,
            Criterion::Ats => self.ats,
            Criterion::Skills => self.skills,
            Criterion::Achievements => self.achievements,
        }
    }

    pub fn total(&self) -> f64 {
        Criterion::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingDetails {
    pub strong_verbs: Vec<String>,
    pub weak_verbs: Vec<String>,
    pub sentence_count: usize,
    pub word_count: usize,
    /// Unique over total words, as a percentage
    pub vocabulary_diversity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarityDetails {
    pub sections: Vec<Section>,
    pub has_contact_info: bool,
    pub has_clear_dates: bool,
    pub consistent_formatting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDetails {
    pub total: usize,
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub languages: Vec<String>,
    pub categories: Vec<SkillCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDetails {
    pub has_quantifiable_results: bool,
    pub achievement_indicators: Vec<String>,
    pub impact_statements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthDetails {
    pub writing: WritingDetails,
    pub clarity: ClarityDetails,
    /// Present only when the ATS engine scored the CV
    pub ats: Option<Box<AnalysisResult>>,
    pub skills: SkillDetails,
    pub achievements: AchievementDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    Excellent,
    VeryGood,
    Good,
    Fair,
    NeedsWork,
}

impl StrengthLevel {
    pub fn from_total(total: u32) -> Self {
        match total {
            85.. => StrengthLevel::Excellent,
            75..=84 => StrengthLevel::VeryGood,
            65..=74 => StrengthLevel::Good,
            50..=64 => StrengthLevel::Fair,
            _ => StrengthLevel::NeedsWork,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthLevel::Excellent => "Excellent",
            StrengthLevel::VeryGood => "Very good",
            StrengthLevel::Good => "Good",
            StrengthLevel::Fair => "Fair",
            StrengthLevel::NeedsWork => "Needs work",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            StrengthLevel::Excellent => "#10b981",
            StrengthLevel::VeryGood => "#3b82f6",
            StrengthLevel::Good => "#8b5cf6",
            StrengthLevel::Fair => "#f59e0b",
            StrengthLevel::NeedsWork => "#ef4444",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StrengthLevel::Excellent => "🌟",
            StrengthLevel::VeryGood => "⭐",
            StrengthLevel::Good => "✨",
            StrengthLevel::Fair => "💫",
            StrengthLevel::NeedsWork => "⚠️",
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A criterion singled out as a strength or a weakness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionAssessment {
    pub criterion: Criterion,
    pub score: f64,
    pub max_score: f64,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthScore {
    pub total: u32,
    pub breakdown: StrengthBreakdown,
    pub level: StrengthLevel,
    pub strengths: Vec<CriterionAssessment>,
    pub weaknesses: Vec<CriterionAssessment>,
    pub suggestions: Vec<Suggestion>,
    pub details: Option<StrengthDetails>,
}

/// Weighted-rubric CV scorer. The ATS criterion is delegated to an
/// [`AtsEngine`] when one is attached; otherwise a basic check is used.
#[derive(Debug)]
pub struct StrengthScorer {
    ats: Option<AtsEngine>,
    matcher: KeywordMatcher,
    processor: TextProcessor,
    formatting: Box<dyn FormattingInspector>,
}

impl StrengthScorer {
    /// Scorer backed by the given ATS engine
    pub fn new(ats: AtsEngine) -> Self {
        let matcher = ats.matcher().clone();
        Self {
            ats: Some(ats),
            matcher,
            processor: TextProcessor::new(),
            formatting: Box::new(PlainTextFormatting),
        }
    }

    /// Scorer without an ATS engine; the ATS criterion always uses the basic check
    pub fn without_ats() -> Result<Self> {
        Ok(Self {
            ats: None,
            matcher: KeywordMatcher::new()?,
            processor: TextProcessor::new(),
            formatting: Box::new(PlainTextFormatting),
        })
    }

    pub fn with_formatting(mut self, formatting: Box<dyn FormattingInspector>) -> Self {
        self.formatting = formatting;
        self
    }

    pub fn has_ats_engine(&self) -> bool {
        self.ats.is_some()
    }

    /// Score a CV. ATS engine errors propagate; the basic ATS check is used
    /// only when no engine is attached or `include_ats` is off.
    pub async fn score_cv(&self, cv: &CvInput, options: &ScoreOptions) -> Result<StrengthScore> {
        let text = cv.text()?;
        let text = text.as_ref();
        info!("Scoring CV strength ({} chars)", text.chars().count());

        let mut breakdown = StrengthBreakdown::default();

        breakdown.writing = self.score_writing(text);
        breakdown.clarity = self.score_clarity(text);

        let mut ats_analysis = None;
        match (&self.ats, options.include_ats) {
            (Some(engine), true) => {
                let analysis = engine.analyze(text, options.job_description.as_deref()).await?;
                breakdown.ats = analysis.score as f64 / 100.0 * Criterion::Ats.weight();
                ats_analysis = Some(Box::new(analysis));
            }
            _ => {
                debug!("Using basic ATS check");
                breakdown.ats = self.score_ats_basic(text);
            }
        }

        let skills = self.extract_skills(text);
        breakdown.skills = Self::score_skills(&skills);
        breakdown.achievements = self.score_achievements(text);

        let total = (breakdown.total().round() as u32).min(100);
        let level = StrengthLevel::from_total(total);
        let (strengths, weaknesses) = Self::classify(&breakdown);
        let suggestions = Self::build_suggestions(&weaknesses);

        let details = if options.detailed_analysis {
            Some(StrengthDetails {
                writing: self.analyze_writing(text),
                clarity: self.analyze_clarity(text),
                ats: ats_analysis,
                skills: Self::analyze_skills(&skills),
                achievements: self.analyze_achievements(text),
            })
        } else {
            None
        };

        info!("CV strength scored {} ({})", total, level);

        Ok(StrengthScore {
            total,
            breakdown,
            level,
            strengths,
            weaknesses,
            suggestions,
            details,
        })
    }

    fn score_writing(&self, text: &str) -> f64 {
        let mut score = 0.0;

        let strong = present(text, &STRONG_VERBS).len() as f64;
        score += (strong / 5.0 * 8.0).min(8.0);

        let weak = present(text, &WEAK_VERBS).len() as f64;
        score += (4.0 - weak).max(0.0);

        let stats = self.processor.stats(text);
        let avg = stats.average_sentence_length;
        if (50.0..=150.0).contains(&avg) {
            score += 4.0;
        } else if (30.0..=200.0).contains(&avg) {
            score += 2.0;
        }

        score += (stats.vocabulary_ratio() * 8.0).min(4.0);

        score.min(Criterion::Writing.weight())
    }

    fn analyze_writing(&self, text: &str) -> WritingDetails {
        let stats = self.processor.stats(text);
        WritingDetails {
            strong_verbs: owned(present(text, &STRONG_VERBS)),
            weak_verbs: owned(present(text, &WEAK_VERBS)),
            sentence_count: stats.sentence_count,
            word_count: stats.word_count,
            vocabulary_diversity: stats.vocabulary_ratio() * 100.0,
        }
    }

    fn score_clarity(&self, text: &str) -> f64 {
        let mut score = 0.0;

        let sections = self.matcher.detect_sections(text);
        score += (sections.found.len() as f64 / Section::ALL.len() as f64 * 8.0).min(8.0);

        if self.formatting.has_consistent_formatting(text) {
            score += 6.0;
        }
        if self.processor.has_contact_info(text) {
            score += 3.0;
        }
        if self.processor.has_clear_dates(text) {
            score += 3.0;
        }

        score.min(Criterion::Clarity.weight())
    }

    fn analyze_clarity(&self, text: &str) -> ClarityDetails {
        ClarityDetails {
            sections: self.matcher.detect_sections(text).found,
            has_contact_info: self.processor.has_contact_info(text),
            has_clear_dates: self.processor.has_clear_dates(text),
            consistent_formatting: self.formatting.has_consistent_formatting(text),
        }
    }

    /// ATS estimate used without an engine: long words, simple layout and
    /// the presence of the standard section names
    fn score_ats_basic(&self, text: &str) -> f64 {
        let mut score = 0.0;

        let long_words = self
            .processor
            .words(text)
            .iter()
            .filter(|w| w.chars().count() > 4)
            .count() as f64;
        score += (long_words / 20.0 * 12.0).min(12.0);

        if !self.formatting.has_complex_formatting(text) {
            score += 9.0;
        }

        let lowered = text.to_lowercase();
        let found = present(&lowered, &STANDARD_SECTIONS).len() as f64;
        score += found / STANDARD_SECTIONS.len() as f64 * 9.0;

        score.min(Criterion::Ats.weight())
    }

    /// Skills named in the text: taxonomy technical and soft keywords plus
    /// language names
    pub fn extract_skills(&self, text: &str) -> Vec<Skill> {
        let matches = self.matcher.find_keywords(text);
        let mut skills = Vec::new();

        for (keyword_category, skill_category) in [
            (KeywordCategory::Technical, SkillCategory::Technical),
            (KeywordCategory::Soft, SkillCategory::Soft),
        ] {
            for name in matches.in_category(keyword_category) {
                skills.push(Skill {
                    name: name.clone(),
                    category: skill_category,
                });
            }
        }

        let lowered = text.to_lowercase();
        for language in LANGUAGE_NAMES {
            if contains_bounded(&lowered, &language.to_lowercase()) {
                skills.push(Skill {
                    name: language.to_string(),
                    category: SkillCategory::Language,
                });
            }
        }

        skills
    }

    fn categories(skills: &[Skill]) -> Vec<SkillCategory> {
        let mut categories = Vec::new();
        for skill in skills {
            if !categories.contains(&skill.category) {
                categories.push(skill.category);
            }
        }
        categories
    }

    fn score_skills(skills: &[Skill]) -> f64 {
        let mut score = 0.0;

        score += (skills.len() as f64 / 10.0 * 7.0).min(7.0);
        score += (Self::categories(skills).len() as f64 / 3.0 * 4.0).min(4.0);

        let technical = skills
            .iter()
            .filter(|s| s.category == SkillCategory::Technical)
            .count() as f64;
        score += (technical / 5.0 * 4.0).min(4.0);

        score.min(Criterion::Skills.weight())
    }

    fn analyze_skills(skills: &[Skill]) -> SkillDetails {
        let names = |category: SkillCategory| -> Vec<String> {
            skills
                .iter()
                .filter(|s| s.category == category)
                .map(|s| s.name.clone())
                .collect()
        };

        SkillDetails {
            total: skills.len(),
            technical: names(SkillCategory::Technical),
            soft: names(SkillCategory::Soft),
            languages: names(SkillCategory::Language),
            categories: Self::categories(skills),
        }
    }

    fn score_achievements(&self, text: &str) -> f64 {
        let mut score = 0.0;

        if self.processor.has_digits(text) {
            score += 7.0;
        }

        let achievements = present(text, &ACHIEVEMENT_WORDS).len() as f64;
        score += (achievements * 2.0).min(5.0);

        let impact = present(text, &IMPACT_WORDS).len() as f64;
        score += impact.min(3.0);

        score.min(Criterion::Achievements.weight())
    }

    fn analyze_achievements(&self, text: &str) -> AchievementDetails {
        AchievementDetails {
            has_quantifiable_results: self.processor.has_digits(text),
            achievement_indicators: owned(present(text, &ACHIEVEMENT_WORDS)),
            impact_statements: owned(present(text, &IMPACT_WORDS)),
        }
    }

    /// Strengths reach 80% of the criterion weight, weaknesses stay under 60%
    fn classify(breakdown: &StrengthBreakdown) -> (Vec<CriterionAssessment>, Vec<CriterionAssessment>) {
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();

        for criterion in Criterion::ALL {
            let score = breakdown.get(criterion);
            let percentage = score / criterion.weight() * 100.0;
            let assessment = CriterionAssessment {
                criterion,
                score,
                max_score: criterion.weight(),
                percentage: percentage.round() as u32,
            };

            if percentage >= 80.0 {
                strengths.push(assessment);
            } else if percentage < 60.0 {
                weaknesses.push(assessment);
            }
        }

        (strengths, weaknesses)
    }

    fn build_suggestions(weaknesses: &[CriterionAssessment]) -> Vec<Suggestion> {
        weaknesses
            .iter()
            .map(|weakness| {
                let (priority, text) = weakness.criterion.improvement_tip();
                Suggestion {
                    kind: SuggestionKind::Criterion(weakness.criterion),
                    priority,
                    text: text.to_string(),
                }
            })
            .collect()
    }
}

/// Words from `list` that occur anywhere in `text`
fn present<'a>(text: &str, list: &[&'a str]) -> Vec<&'a str> {
    list.iter().filter(|w| text.contains(**w)).copied().collect()
}

fn owned(words: Vec<&str>) -> Vec<String> {
    words.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scorer() -> StrengthScorer {
        StrengthScorer::new(AtsEngine::new().unwrap())
    }

    #[derive(Debug)]
    struct ComplexLayout;

    impl FormattingInspector for ComplexLayout {
        fn has_consistent_formatting(&self, _text: &str) -> bool {
            false
        }

        fn has_complex_formatting(&self, _text: &str) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_empty_cv() {
        let score = scorer()
            .score_cv(&CvInput::from(""), &ScoreOptions::default())
            .await
            .unwrap();

        // Only the formatting hook contributes on empty input
        assert_eq!(score.breakdown.clarity, 6.0);
        assert_eq!(score.breakdown.ats, 0.0);
        assert_eq!(score.breakdown.writing, 4.0);
        assert_eq!(score.total, 10);
        assert_eq!(score.level, StrengthLevel::NeedsWork);
    }

    #[tokio::test]
    async fn test_breakdown_never_exceeds_weights() {
        let text = "قاد طور أنشأ حقق أدار نسق. نجح تفوق تميز أنجز في تحسين زيادة تطوير تعزيز 2023. \
            Skills: WASH, Protection, MEAL, GIS, Finance, Leadership, Arabic, English. \
            Education, Experience, Languages, Summary, contact someone@example.org";
        let score = scorer()
            .score_cv(&CvInput::from(text), &ScoreOptions::default())
            .await
            .unwrap();

        for criterion in Criterion::ALL {
            assert!(score.breakdown.get(criterion) <= criterion.weight());
            assert!(score.breakdown.get(criterion) >= 0.0);
        }
        assert_eq!(score.total, score.breakdown.total().round() as u32);
        assert!(score.total <= 100);
        assert_eq!(score.breakdown.achievements, 15.0);
    }

    #[tokio::test]
    async fn test_basic_ats_when_disabled() {
        let options = ScoreOptions {
            include_ats: false,
            ..ScoreOptions::default()
        };
        let score = scorer()
            .score_cv(&CvInput::from("experience education skills"), &options)
            .await
            .unwrap();

        // 3 long words -> 1.8, simple layout -> 9, all standard sections -> 9
        assert!((score.breakdown.ats - 19.8).abs() < 1e-9);
        assert!(score.details.unwrap().ats.is_none());
    }

    #[tokio::test]
    async fn test_basic_ats_without_engine_and_with_formatting_hook() {
        let scorer = StrengthScorer::without_ats()
            .unwrap()
            .with_formatting(Box::new(ComplexLayout));
        assert!(!scorer.has_ats_engine());

        let score = scorer
            .score_cv(&CvInput::from("skills"), &ScoreOptions::default())
            .await
            .unwrap();

        assert!((score.breakdown.ats - 3.6).abs() < 1e-9);
        assert!((score.breakdown.clarity - 8.0 / 6.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_ats_criterion_rescales_engine_score() {
        let text = "Skills: WASH, Protection. Education";
        let scorer = scorer();
        let score = scorer
            .score_cv(&CvInput::from(text), &ScoreOptions::default())
            .await
            .unwrap();
        let ats = score.details.as_ref().unwrap().ats.as_ref().unwrap();

        assert!((score.breakdown.ats - ats.score as f64 / 100.0 * 30.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_structured_input_is_scored_as_serialized_text() {
        let record = json!({
            "skills": ["WASH", "Leadership"],
            "experience": "قاد فريق من 12 شخص",
        });
        let text = CvInput::from(record.clone()).text().unwrap().into_owned();
        assert_eq!(text, serde_json::to_string(&record).unwrap());

        let structured = scorer()
            .score_cv(&CvInput::Structured(record), &ScoreOptions::default())
            .await
            .unwrap();
        let plain = scorer()
            .score_cv(&CvInput::Text(text), &ScoreOptions::default())
            .await
            .unwrap();
        assert_eq!(structured.total, plain.total);
    }

    #[test]
    fn test_skill_extraction_categories() {
        let scorer = StrengthScorer::without_ats().unwrap();
        let skills = scorer.extract_skills("WASH, GIS, Leadership, التواصل, Arabic and English");

        let details = StrengthScorer::analyze_skills(&skills);
        assert_eq!(details.technical, vec!["WASH".to_string(), "GIS".to_string()]);
        assert_eq!(details.soft, vec!["التواصل".to_string(), "Leadership".to_string()]);
        assert_eq!(details.languages, vec!["Arabic".to_string(), "English".to_string()]);
        assert_eq!(details.categories.len(), 3);

        // 6 skills -> 4.2, 3 categories -> 4, 2 technical -> 1.6
        assert!((StrengthScorer::score_skills(&skills) - 9.8).abs() < 1e-9);
    }

    #[test]
    fn test_weak_verbs_reduce_writing() {
        let scorer = StrengthScorer::without_ats().unwrap();
        let strong = scorer.score_writing("قاد طور");
        let weak = scorer.score_writing("قاد طور ساعد شارك");
        assert!(weak < strong);
    }

    #[test]
    fn test_strengths_and_weaknesses() {
        let breakdown = StrengthBreakdown {
            writing: 18.0,
            clarity: 14.0,
            ats: 10.0,
            skills: 12.0,
            achievements: 0.0,
        };
        let (strengths, weaknesses) = StrengthScorer::classify(&breakdown);

        let strong: Vec<Criterion> = strengths.iter().map(|s| s.criterion).collect();
        let weak: Vec<Criterion> = weaknesses.iter().map(|s| s.criterion).collect();
        assert_eq!(strong, vec![Criterion::Writing, Criterion::Skills]);
        assert_eq!(weak, vec![Criterion::Ats, Criterion::Achievements]);

        let suggestions = StrengthScorer::build_suggestions(&weaknesses);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].priority, Priority::Critical);
        assert_eq!(suggestions[0].kind, SuggestionKind::Criterion(Criterion::Ats));
    }

    #[test]
    fn test_level_bands() {
        assert_eq!(StrengthLevel::from_total(85), StrengthLevel::Excellent);
        assert_eq!(StrengthLevel::from_total(84), StrengthLevel::VeryGood);
        assert_eq!(StrengthLevel::from_total(65), StrengthLevel::Good);
        assert_eq!(StrengthLevel::from_total(50), StrengthLevel::Fair);
        assert_eq!(StrengthLevel::from_total(49), StrengthLevel::NeedsWork);
        assert_eq!(StrengthLevel::Good.color(), "#8b5cf6");
    }

    #[test]
    fn test_weights_sum_to_100() {
        let sum: f64 = Criterion::ALL.iter().map(|c| c.weight()).sum();
        assert_eq!(sum, 100.0);
    }
}
