//! Responsibilities for a job title: built-in templates, generated text, or
//! a generic fallback

use crate::error::{AtharError, Result};
use crate::llm::generator::TextGenerator;
use crate::llm::json_extractor::extract_json;
use crate::llm::prompts::{PromptTemplates, ResponsibilitiesPromptParams};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

const MIN_ITEMS: usize = 3;
const MAX_ITEMS: usize = 5;
const GENERIC_ITEMS: usize = 4;
const MIN_ITEM_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbCategory {
    Management,
    Technical,
    Coordination,
    Support,
}

impl VerbCategory {
    pub const ALL: [VerbCategory; 4] = [
        VerbCategory::Management,
        VerbCategory::Technical,
        VerbCategory::Coordination,
        VerbCategory::Support,
    ];

    /// Professional verbal nouns a responsibility may open with
    pub fn verbs(&self) -> &'static [&'static str] {
        match self {
            VerbCategory::Management => &[
                "إدارة", "قيادة", "توجيه", "إشراف", "تنسيق", "تخطيط",
                "تطوير", "تنظيم", "تحسين", "تعزيز",
            ],
            VerbCategory::Technical => &[
                "تنفيذ", "تصميم", "تطبيق", "تحليل", "تقييم", "مراقبة",
                "قياس", "توثيق", "إعداد", "تطوير",
            ],
            VerbCategory::Coordination => &[
                "تنسيق", "تسهيل", "ربط", "تواصل", "تعاون", "تشبيك",
                "تنظيم", "ترتيب", "جدولة", "متابعة",
            ],
            VerbCategory::Support => &[
                "دعم", "مساعدة", "مساندة", "تقديم", "توفير", "ضمان",
                "تيسير", "تسهيل", "تمكين", "تعزيز",
            ],
        }
    }
}

struct JobTemplate {
    title: &'static str,
    category: VerbCategory,
    responsibilities: [&'static str; 5],
}

const JOB_TEMPLATES: [JobTemplate; 8] = [
    JobTemplate {
        title: "wash officer",
        category: VerbCategory::Technical,
        responsibilities: [
            "تنفيذ أنشطة المياه والصرف الصحي والنظافة الصحية وفقاً لمعايير Sphere",
            "إجراء تقييمات احتياجات WASH في المجتمعات المستهدفة",
            "مراقبة جودة المياه وضمان سلامتها للاستخدام البشري",
            "تنسيق مع الشركاء المحليين لتنفيذ حملات التوعية الصحية",
            "إعداد تقارير فنية دورية عن تقدم الأنشطة والتحديات",
        ],
    },
    JobTemplate {
        title: "wash coordinator",
        category: VerbCategory::Management,
        responsibilities: [
            "قيادة فريق WASH وتوجيه الأنشطة الميدانية",
            "تطوير خطط عمل WASH بالتنسيق مع الشركاء",
            "ضمان الامتثال لمعايير الجودة والمساءلة في جميع التدخلات",
            "تمثيل المنظمة في اجتماعات كتلة WASH",
            "إدارة ميزانية المشروع ومراقبة الإنفاق",
        ],
    },
    JobTemplate {
        title: "protection officer",
        category: VerbCategory::Technical,
        responsibilities: [
            "تنفيذ أنشطة الحماية وفقاً للمبادئ الإنسانية",
            "إجراء تقييمات المخاطر والاحتياجات الحمائية",
            "تقديم الدعم النفسي والاجتماعي للفئات الضعيفة",
            "توثيق حالات الحماية وإحالتها للجهات المختصة",
            "تنسيق مع الشركاء لضمان الاستجابة المتكاملة",
        ],
    },
    JobTemplate {
        title: "meal officer",
        category: VerbCategory::Technical,
        responsibilities: [
            "تصميم وتنفيذ أدوات المراقبة والتقييم للمشاريع",
            "جمع وتحليل البيانات الكمية والنوعية",
            "إعداد تقارير MEAL دورية للمانحين والإدارة",
            "تطوير آليات المساءلة وتلقي الشكاوى",
            "تقديم التدريب للفرق الميدانية على أدوات MEAL",
        ],
    },
    JobTemplate {
        title: "project manager",
        category: VerbCategory::Management,
        responsibilities: [
            "إدارة دورة حياة المشروع من التخطيط إلى الإغلاق",
            "قيادة الفريق متعدد التخصصات وتوزيع المهام",
            "ضمان تحقيق الأهداف ضمن الميزانية والجدول الزمني",
            "إعداد تقارير سردية ومالية للمانحين",
            "إدارة المخاطر وتطوير خطط التخفيف",
        ],
    },
    JobTemplate {
        title: "logistics officer",
        category: VerbCategory::Technical,
        responsibilities: [
            "إدارة سلسلة التوريد وضمان توفر المواد في الوقت المناسب",
            "تنسيق عمليات الشراء وفقاً لسياسات المنظمة",
            "إدارة المخازن وضمان التخزين السليم للمواد",
            "تتبع حركة البضائع وإعداد تقارير المخزون",
            "التنسيق مع الموردين والشركاء اللوجستيين",
        ],
    },
    JobTemplate {
        title: "hr officer",
        category: VerbCategory::Support,
        responsibilities: [
            "إدارة عمليات التوظيف من الإعلان إلى التعيين",
            "تطوير وتنفيذ سياسات الموارد البشرية",
            "إدارة ملفات الموظفين وضمان سرية المعلومات",
            "تنسيق برامج التدريب والتطوير المهني",
            "معالجة قضايا الموظفين وضمان بيئة عمل إيجابية",
        ],
    },
    JobTemplate {
        title: "finance officer",
        category: VerbCategory::Technical,
        responsibilities: [
            "إدارة العمليات المالية اليومية وفقاً للمعايير المحاسبية",
            "إعداد التقارير المالية الشهرية والربع سنوية",
            "مراقبة الميزانية وتتبع الإنفاق",
            "ضمان الامتثال لسياسات المانحين المالية",
            "دعم عمليات التدقيق الداخلي والخارجي",
        ],
    },
];

const ORGANIZATION_FOCUS: [(&str, &str); 8] = [
    ("UNHCR", "Protection and Shelter"),
    ("UNICEF", "Child Protection and Education"),
    ("WFP", "Food Security and Nutrition"),
    ("WHO", "Health"),
    ("IOM", "Migration and Displacement"),
    ("IRC", "Multi-sector"),
    ("NRC", "Shelter and WASH"),
    ("Save the Children", "Child Protection and Education"),
];

/// Main sector of a well-known organization
pub fn organization_focus(organization: &str) -> Option<&'static str> {
    let organization = organization.trim();
    ORGANIZATION_FOCUS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(organization))
        .map(|(_, focus)| *focus)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionSource {
    Template,
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub responsibilities: Vec<String>,
    pub source: DescriptionSource,
    /// Verb category of the matched template, absent for other sources
    pub category: Option<VerbCategory>,
    pub focus_area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

pub struct JobDescriptionGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
    prompts: PromptTemplates,
    percentage_regex: Regex,
    rng: Mutex<StdRng>,
}

impl JobDescriptionGenerator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            generator: None,
            prompts: PromptTemplates::default(),
            percentage_regex: Regex::new(r"\d+\s*[%٪]")?,
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Responsibilities for a job title. Known titles use a built-in template;
    /// other titles ask the generator and fall back to generic items.
    pub async fn generate_responsibilities(
        &self,
        job_title: &str,
        organization: &str,
        context: Option<&str>,
    ) -> Result<JobDescription> {
        let title = job_title.trim();
        if title.is_empty() {
            return Err(AtharError::InvalidInput("Job title is empty".to_string()));
        }

        let focus_area = organization_focus(organization).map(String::from);

        if let Some(template) = Self::find_template(&title.to_lowercase()) {
            info!("Using built-in responsibilities for '{}'", template.title);
            let mut responsibilities: Vec<String> =
                template.responsibilities.iter().map(|r| r.to_string()).collect();
            {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                responsibilities.shuffle(&mut *rng);
            }
            responsibilities.truncate(responsibilities.len().clamp(MIN_ITEMS, MAX_ITEMS));

            return Ok(JobDescription {
                responsibilities,
                source: DescriptionSource::Template,
                category: Some(template.category),
                focus_area,
            });
        }

        if let Some(generator) = &self.generator {
            let params = ResponsibilitiesPromptParams {
                job_title: title.to_string(),
                organization: organization.to_string(),
                focus_area: focus_area.clone(),
                context: context.map(String::from),
            };
            match self.generate_with(generator.as_ref(), &params).await {
                Ok(responsibilities) => {
                    return Ok(JobDescription {
                        responsibilities,
                        source: DescriptionSource::Generated,
                        category: None,
                        focus_area,
                    });
                }
                Err(e) => warn!("Generated responsibilities unusable, using generic items: {}", e),
            }
        }

        Ok(JobDescription {
            responsibilities: Self::generic_responsibilities(title),
            source: DescriptionSource::Fallback,
            category: None,
            focus_area,
        })
    }

    async fn generate_with(
        &self,
        generator: &dyn TextGenerator,
        params: &ResponsibilitiesPromptParams,
    ) -> Result<Vec<String>> {
        let prompt = self.prompts.render_responsibilities(params);
        let response = generator.generate(&prompt).await?;

        let items: Vec<String> = extract_json(&response)
            .as_ref()
            .and_then(|value| value.get("responsibilities"))
            .and_then(|list| list.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|item| item.as_str())
                    .map(|item| item.trim().to_string())
                    .filter(|item| !item.is_empty())
                    .take(MAX_ITEMS)
                    .collect()
            })
            .unwrap_or_default();

        if items.is_empty() {
            return Err(AtharError::Generation(
                "Response has no responsibilities list".to_string(),
            ));
        }

        Ok(items)
    }

    /// Exact title first, then either title containing the other
    fn find_template(title: &str) -> Option<&'static JobTemplate> {
        JOB_TEMPLATES
            .iter()
            .find(|t| t.title == title)
            .or_else(|| {
                JOB_TEMPLATES
                    .iter()
                    .find(|t| title.contains(t.title) || t.title.contains(title))
            })
    }

    fn generic_responsibilities(title: &str) -> Vec<String> {
        let verbs = VerbCategory::Technical.verbs();
        let items = [
            format!("{} الأنشطة المتعلقة بـ {} وفقاً للمعايير المهنية", verbs[0], title),
            format!("{} خطط عمل تفصيلية لتحقيق أهداف المشروع", verbs[1]),
            format!("{} مع الفرق الميدانية والشركاء المحليين", verbs[2]),
            format!("{} تقارير دورية عن التقدم والتحديات", verbs[3]),
            format!("{} الامتثال للسياسات والإجراءات المعتمدة", verbs[4]),
        ];
        items.into_iter().take(GENERIC_ITEMS).collect()
    }

    /// Flag items that do not open with a professional verb, are too short,
    /// or quote percentages
    pub fn validate_description(&self, responsibilities: &[String]) -> ValidationReport {
        let mut issues = Vec::new();

        for (index, item) in responsibilities.iter().enumerate() {
            let number = index + 1;
            let item = item.trim();

            let starts_with_verb = VerbCategory::ALL
                .iter()
                .flat_map(|c| c.verbs().iter())
                .any(|verb| item.starts_with(verb));
            if !starts_with_verb {
                issues.push(format!("Item {} does not start with a professional verb", number));
            }
            if item.chars().count() < MIN_ITEM_LEN {
                issues.push(format!("Item {} is too short", number));
            }
            if self.percentage_regex.is_match(item) {
                issues.push(format!("Item {} contains percentages", number));
            }
        }

        ValidationReport {
            is_valid: issues.is_empty(),
            issues,
        }
    }
}
