//! Turning task statements into achievement sentences
//!
//! Three strategies are tried in a fixed order: an attached text generator,
//! category templates, then a basic rewrite that cannot fail.

use crate::error::{AtharError, Result};
use crate::llm::generator::TextGenerator;
use crate::llm::json_extractor::extract_json;
use crate::llm::prompts::{AchievementPromptParams, PromptTemplates};
use crate::processing::ats_engine::Priority;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Verbal nouns an achievement should open with
pub const POWER_VERBS: [&str; 18] = [
    "قيادة", "تطوير", "تحسين", "تعزيز", "تحقيق", "إنجاز",
    "تنفيذ", "تصميم", "إنشاء", "بناء", "تأسيس", "إطلاق",
    "تحويل", "تجديد", "تحديث", "تطبيق", "إدارة", "توجيه",
];

const OUTCOMES: [&str; 8] = [
    "نتائج ملموسة", "تأثير إيجابي", "تحسين ملحوظ", "نجاح باهر",
    "تقدم كبير", "إنجاز متميز", "أداء استثنائي", "جودة عالية",
];

const METHODS: [&str; 8] = [
    "منهجية احترافية", "نهج استراتيجي", "أسلوب مبتكر", "طريقة فعالة",
    "آلية متطورة", "عملية منظمة", "خطة شاملة", "استراتيجية متكاملة",
];

const PROFESSIONAL_CONTEXT: &str = " وفقاً لأفضل الممارسات المهنية";
const CONTEXT_MARKERS: [&str; 2] = ["وفقاً", "من خلال"];

const MIN_ACHIEVEMENT_LEN: usize = 20;

/// How an achievement was produced, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Generated,
    Template,
    Basic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Generated => "generated",
            Strategy::Template => "template",
            Strategy::Basic => "basic",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Management,
    Technical,
    Coordination,
    Impact,
}

impl TaskCategory {
    fn templates(&self) -> &'static [&'static str] {
        match self {
            TaskCategory::Management => &[
                "قيادة {team} في تحقيق {goal} من خلال {method}",
                "إدارة {project} بنجاح مع ضمان {outcome}",
                "تطوير وتنفيذ {initiative} التي أدت إلى {result}",
                "توجيه {team} لتحقيق {milestone} في {context}",
            ],
            TaskCategory::Technical => &[
                "تنفيذ {project} وفقاً لـ {standards} مع تحقيق {outcome}",
                "تصميم وتطبيق {solution} لمعالجة {challenge}",
                "إجراء {analysis} شامل أدى إلى {improvement}",
                "تطوير {system} لتحسين {process}",
            ],
            TaskCategory::Coordination => &[
                "تنسيق {activity} بين {stakeholders} لضمان {outcome}",
                "تسهيل {process} من خلال {method} مما أدى إلى {result}",
                "ربط {parties} لتحقيق {goal} المشترك",
                "تنظيم {event} بمشاركة {participants} وتحقيق {success}",
            ],
            TaskCategory::Impact => &[
                "المساهمة في {outcome} من خلال {action}",
                "تحقيق {result} عبر {method} المبتكر",
                "إحداث {change} إيجابي في {area} من خلال {initiative}",
                "تعزيز {aspect} عبر {approach} الاستراتيجي",
            ],
        }
    }
}

/// Placeholder values shared by every template; `{project}` is built from the sector
const PLACEHOLDERS: [(&str, &str); 26] = [
    ("{team}", "فريق متعدد التخصصات"),
    ("{goal}", "الأهداف المحددة"),
    ("{method}", "منهجية احترافية"),
    ("{outcome}", "تحقيق نتائج ملموسة"),
    ("{initiative}", "مبادرة استراتيجية"),
    ("{result}", "تحسين ملحوظ في الأداء"),
    ("{milestone}", "إنجازات رئيسية"),
    ("{context}", "بيئة عمل تحديّة"),
    ("{standards}", "المعايير الدولية"),
    ("{solution}", "حل مبتكر"),
    ("{challenge}", "التحديات الميدانية"),
    ("{analysis}", "تحليل"),
    ("{improvement}", "تحسينات جوهرية"),
    ("{system}", "نظام متكامل"),
    ("{process}", "العمليات التشغيلية"),
    ("{activity}", "الأنشطة الميدانية"),
    ("{stakeholders}", "الشركاء المعنيين"),
    ("{parties}", "الأطراف ذات الصلة"),
    ("{event}", "فعالية مهنية"),
    ("{participants}", "المشاركين"),
    ("{success}", "نجاح باهر"),
    ("{action}", "إجراءات فعالة"),
    ("{change}", "تغيير إيجابي"),
    ("{area}", "المجال المستهدف"),
    ("{aspect}", "الجوانب الرئيسية"),
    ("{approach}", "نهج"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformOptions {
    pub sector: String,
    pub style: String,
    pub use_generator: bool,
    pub use_templates: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            sector: "general".to_string(),
            style: "professional".to_string(),
            use_generator: true,
            use_templates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAnalysis {
    pub has_action: bool,
    pub has_outcome: bool,
    pub category: TaskCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => QualityLevel::Excellent,
            60..=79 => QualityLevel::Good,
            40..=59 => QualityLevel::Fair,
            _ => QualityLevel::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub score: u32,
    pub level: QualityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub text: String,
    pub source: Strategy,
    pub quality: QualityAssessment,
}

/// Outcome of one task in a batch transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformOutcome {
    pub task: String,
    pub achievement: Option<Achievement>,
    pub error: Option<String>,
}

impl TransformOutcome {
    pub fn success(&self) -> bool {
        self.achievement.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementKind {
    Verb,
    Outcome,
    Length,
    Numbers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub kind: ImprovementKind,
    pub priority: Priority,
    pub message: String,
}

pub struct AchievementGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
    prompts: PromptTemplates,
    percentage_regex: Regex,
    rng: Mutex<StdRng>,
}

impl AchievementGenerator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            generator: None,
            prompts: PromptTemplates::default(),
            percentage_regex: Regex::new(r"\d+\s*[%٪]")?,
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Attach a text generator, enabling the generated strategy
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Fix the random source used for template and verb selection
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn can_generate(&self) -> bool {
        self.generator.is_some()
    }

    /// Transform a task using the first strategy that succeeds
    pub async fn transform_to_achievement(&self, task: &str, options: &TransformOptions) -> Result<Achievement> {
        let task = task.trim();
        if task.is_empty() {
            return Err(AtharError::InvalidInput("Task statement is empty".to_string()));
        }

        if options.use_generator && self.can_generate() {
            match self.transform_generated(task, options).await {
                Ok(achievement) => return Ok(achievement),
                Err(e) => warn!("Generated achievement rejected, falling back: {}", e),
            }
        }

        if options.use_templates {
            return Ok(self.transform_with_template(task, &options.sector));
        }

        Ok(self.transform_basic(task))
    }

    /// Ask the attached generator and accept its answer only if it validates
    pub async fn transform_generated(&self, task: &str, options: &TransformOptions) -> Result<Achievement> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| AtharError::Generation("No text generator attached".to_string()))?;

        let prompt = self.prompts.render_achievement(&AchievementPromptParams {
            task: task.to_string(),
            sector: options.sector.clone(),
            style: options.style.clone(),
        });

        debug!("Requesting achievement from {}", generator.name());
        let response = generator.generate(&prompt).await?;
        let text = Self::read_response(&response);

        if !self.validate_achievement(&text) {
            return Err(AtharError::Generation(
                "Generated achievement did not meet quality standards".to_string(),
            ));
        }

        Ok(self.achievement(text, Strategy::Generated))
    }

    /// Fill a random template of the task's category
    pub fn transform_with_template(&self, task: &str, sector: &str) -> Achievement {
        let analysis = self.analyze_task(task);
        let templates = analysis.category.templates();

        let template = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            templates.choose(&mut *rng).copied().unwrap_or(templates[0])
        };

        let text = Self::fill_template(template, sector);
        self.achievement(text, Strategy::Template)
    }

    /// Prefix a power verb when missing and append a professional context
    pub fn transform_basic(&self, task: &str) -> Achievement {
        let task = task.trim();
        let mut text = if Self::starts_with_power_verb(task) {
            task.to_string()
        } else {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let verb = POWER_VERBS.choose(&mut *rng).copied().unwrap_or(POWER_VERBS[0]);
            format!("{} {}", verb, task)
        };

        if !CONTEXT_MARKERS.iter().any(|m| text.contains(m)) {
            text.push_str(PROFESSIONAL_CONTEXT);
        }

        self.achievement(text, Strategy::Basic)
    }

    pub fn analyze_task(&self, task: &str) -> TaskAnalysis {
        let task = task.to_lowercase();

        let category = if task.contains("إدارة") || task.contains("قيادة") {
            TaskCategory::Management
        } else if task.contains("تنسيق") || task.contains("تنظيم") {
            TaskCategory::Coordination
        } else if task.contains("تنفيذ") || task.contains("تطوير") {
            TaskCategory::Technical
        } else {
            TaskCategory::Impact
        };

        TaskAnalysis {
            has_action: POWER_VERBS.iter().any(|v| task.contains(v)),
            has_outcome: OUTCOMES.iter().any(|o| task.contains(o)),
            category,
        }
    }

    /// At least 20 characters, no percentage figures, opens with a power verb
    pub fn validate_achievement(&self, text: &str) -> bool {
        text.trim().chars().count() >= MIN_ACHIEVEMENT_LEN
            && !self.percentage_regex.is_match(text)
            && Self::starts_with_power_verb(text)
    }

    pub fn assess_quality(&self, text: &str) -> QualityAssessment {
        let mut score = 0;

        if Self::starts_with_power_verb(text) {
            score += 30;
        }
        if OUTCOMES.iter().any(|o| text.contains(o)) {
            score += 25;
        }
        if METHODS.iter().any(|m| text.contains(m)) {
            score += 20;
        }
        let length = text.chars().count();
        if (50..=200).contains(&length) {
            score += 15;
        }
        if !self.percentage_regex.is_match(text) {
            score += 10;
        }

        QualityAssessment {
            score,
            level: QualityLevel::from_score(score),
        }
    }

    pub fn suggest_improvements(&self, text: &str) -> Vec<Improvement> {
        let mut improvements = Vec::new();

        if !Self::starts_with_power_verb(text) {
            improvements.push(Improvement {
                kind: ImprovementKind::Verb,
                priority: Priority::High,
                message: "Start with a strong verb such as قيادة, تطوير or تحقيق".to_string(),
            });
        }
        if !OUTCOMES.iter().any(|o| text.contains(o)) {
            improvements.push(Improvement {
                kind: ImprovementKind::Outcome,
                priority: Priority::High,
                message: "State the result or impact that was achieved".to_string(),
            });
        }
        if text.chars().count() < 50 {
            improvements.push(Improvement {
                kind: ImprovementKind::Length,
                priority: Priority::Medium,
                message: "Add detail to make the achievement more convincing".to_string(),
            });
        }
        if self.percentage_regex.is_match(text) {
            improvements.push(Improvement {
                kind: ImprovementKind::Numbers,
                priority: Priority::Critical,
                message: "Avoid unverified percentages".to_string(),
            });
        }

        improvements
    }

    /// Transform several tasks in order; a failing task does not stop the batch
    pub async fn transform_multiple(&self, tasks: &[String], options: &TransformOptions) -> Vec<TransformOutcome> {
        let mut outcomes = Vec::with_capacity(tasks.len());

        for task in tasks {
            let outcome = match self.transform_to_achievement(task, options).await {
                Ok(achievement) => TransformOutcome {
                    task: task.clone(),
                    achievement: Some(achievement),
                    error: None,
                },
                Err(e) => {
                    warn!("Failed to transform task '{}': {}", task, e);
                    TransformOutcome {
                        task: task.clone(),
                        achievement: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    fn achievement(&self, text: String, source: Strategy) -> Achievement {
        let quality = self.assess_quality(&text);
        Achievement { text, source, quality }
    }

    fn starts_with_power_verb(text: &str) -> bool {
        let text = text.trim_start();
        POWER_VERBS.iter().any(|v| text.starts_with(v))
    }

    fn fill_template(template: &str, sector: &str) -> String {
        let mut filled = template.replace("{project}", &format!("مشروع {}", sector));
        for (placeholder, value) in PLACEHOLDERS {
            filled = filled.replace(placeholder, value);
        }
        filled
    }

    /// Generator text, or the `achievement`/`text` field of a JSON reply
    fn read_response(response: &str) -> String {
        let trimmed = response.trim();
        if trimmed.contains('{') {
            if let Some(value) = extract_json(trimmed) {
                for field in ["achievement", "text"] {
                    if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                        return text.trim().to_string();
                    }
                }
            }
        }
        trimmed.trim_matches('"').trim().to_string()
    }
}
