//! Prompt templates for the generation flows

use serde::{Deserialize, Serialize};

/// Prompt templates with `{placeholder}` slots
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub achievement: String,
    pub responsibilities: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            achievement: ACHIEVEMENT_TEMPLATE.to_string(),
            responsibilities: RESPONSIBILITIES_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementPromptParams {
    pub task: String,
    pub sector: String,
    pub style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsibilitiesPromptParams {
    pub job_title: String,
    pub organization: String,
    pub focus_area: Option<String>,
    pub context: Option<String>,
}

impl PromptTemplates {
    /// Prompt asking for one achievement sentence as JSON
    pub fn render_achievement(&self, params: &AchievementPromptParams) -> String {
        self.achievement
            .replace("{task}", params.task.trim())
            .replace("{sector}", &params.sector)
            .replace("{style}", &params.style)
    }

    /// Prompt asking for 3 to 5 responsibilities as JSON
    pub fn render_responsibilities(&self, params: &ResponsibilitiesPromptParams) -> String {
        let mut details = String::new();
        if let Some(focus) = &params.focus_area {
            details.push_str(&format!("Organization focus: {}\n", focus));
        }
        if let Some(context) = params.context.as_deref().filter(|c| !c.trim().is_empty()) {
            details.push_str(&format!("Additional context: {}\n", context.trim()));
        }

        self.responsibilities
            .replace("{job_title}", params.job_title.trim())
            .replace("{organization}", params.organization.trim())
            .replace("{details}", &details)
    }
}

const ACHIEVEMENT_TEMPLATE: &str = r#"You are an expert in writing professional CV achievements for the humanitarian sector.

Task: {task}
Sector: {sector}
Style: {style}

Rewrite this task as one strong, professional achievement in Arabic.

Mandatory rules:
1. Start with a strong verbal noun (قيادة، تطوير، تحقيق، إنجاز، تنفيذ)
2. State the result or impact
3. Do not invent numbers or unverified percentages
4. Avoid vague, generic phrasing
5. Keep it specific and ATS friendly

Return JSON only, with no extra text:
{"achievement": "..."}"#;

const RESPONSIBILITIES_TEMPLATE: &str = r#"You are an expert in writing job descriptions for humanitarian and development organizations.

Job title: {job_title}
Organization: {organization}
{details}
Write 3 to 5 professional responsibilities for this role in Arabic.

Mandatory rules:
1. Each item starts with a professional Arabic verbal noun (إدارة، تنسيق، تنفيذ، تطوير، مراقبة)
2. Each item is clear, specific and tied to the job title
3. Each item is ATS friendly
4. Do not use invented numbers or percentages
5. Avoid generic phrases such as "performing assigned duties"
6. Use established humanitarian-sector terminology

Return JSON only, with no extra text:
{"responsibilities": ["...", "...", "..."]}"#;
