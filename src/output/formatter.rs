//! Output formatters for ATS analyses and strength scores

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::ats_engine::{AnalysisResult, Priority, Suggestion};
use crate::processing::keyword_matcher::Section;
use crate::processing::strength_scorer::{Criterion, StrengthScore};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering analysis results
pub trait OutputFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String>;
    fn format_strength(&self, score: &StrengthScore) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON output for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown output for sharing reports
pub struct MarkdownFormatter {
    include_details: bool,
}

/// Coordinates the formatters behind a single entry point
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

/// `#rrggbb` level token to a terminal color
fn hex_color(hex: &str) -> Color {
    let parsed = hex.strip_prefix('#').filter(|h| h.len() == 6 && h.is_ascii()).and_then(|h| {
        let r = u8::from_str_radix(&h[0..2], 16).ok()?;
        let g = u8::from_str_radix(&h[2..4], 16).ok()?;
        let b = u8::from_str_radix(&h[4..6], 16).ok()?;
        Some(Color::TrueColor { r, g, b })
    });
    parsed.unwrap_or(Color::White)
}

fn section_list(sections: &[Section]) -> String {
    sections.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_badge(&self, label: &str, hex: &str) -> String {
        let badge = label.to_uppercase();
        if self.use_colors {
            format!("[{}]", badge.color(hex_color(hex)).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority_icon(&self, priority: Priority) -> &'static str {
        match (self.use_colors, priority) {
            (true, Priority::Critical) => "🚨",
            (true, Priority::High) => "⚠️",
            (true, Priority::Medium) => "📋",
            (true, Priority::Low) => "💡",
            (false, Priority::Critical) => "[!]",
            (false, Priority::High) => "[*]",
            (false, Priority::Medium) => "[-]",
            (false, Priority::Low) => "[+]",
        }
    }

    fn format_suggestions(&self, suggestions: &[Suggestion]) -> String {
        let mut output = String::new();
        for suggestion in suggestions {
            output.push_str(&format!(
                "  {} {}\n",
                self.format_priority_icon(suggestion.priority),
                suggestion.text
            ));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("ATS COMPATIBILITY ANALYSIS", 1));
        output.push_str(&format!(
            "Score: {}/{} {}\n",
            result.score,
            result.max_score,
            self.format_badge(&result.level_label, &result.level_color)
        ));

        output.push_str(&self.format_header("Score Breakdown", 3));
        output.push_str(&format!("  Sections:  {:>5.1}\n", result.breakdown.sections));
        output.push_str(&format!("  Keywords:  {:>5.1}\n", result.breakdown.keywords));
        if let Some(job_match) = result.breakdown.job_match {
            output.push_str(&format!("  Job match: {:>5.1}\n", job_match));
        }
        output.push_str(&format!("  Errors:    {:>5.1}\n", result.breakdown.errors));

        if !result.strengths.is_empty() {
            output.push_str(&self.format_header("Strengths", 3));
            for strength in &result.strengths {
                output.push_str(&format!("  • {}\n", self.colorize(strength, Color::Green)));
            }
        }

        if !result.errors.is_empty() {
            output.push_str(&self.format_header("Issues", 3));
            for error in &result.errors {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    self.format_priority_icon(error.severity),
                    self.colorize(&error.label, Color::Red),
                    error.description
                ));
            }
        }

        if !result.suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions", 2));
            output.push_str(&self.format_suggestions(&result.suggestions));
        }

        if self.detailed {
            output.push_str(&self.format_header("Sections", 3));
            output.push_str(&format!("  Found:   {}\n", section_list(&result.sections.found)));
            if !result.sections.missing.is_empty() {
                output.push_str(&format!(
                    "  Missing: {}\n",
                    self.colorize(&section_list(&result.sections.missing), Color::Yellow)
                ));
            }

            output.push_str(&self.format_header(&format!("Keywords ({})", result.keywords.total), 3));
            for (category, keywords) in &result.keywords.by_category {
                output.push_str(&format!("  {}: {}\n", category, keywords.join(", ")));
            }
            if let Some(missing) = result.keywords.job_missing.as_ref().filter(|m| !m.is_empty()) {
                output.push_str(&format!(
                    "  Missing from job description: {}\n",
                    self.colorize(&missing.join(", "), Color::Yellow)
                ));
            }
        }

        Ok(output)
    }

    fn format_strength(&self, score: &StrengthScore) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("CV STRENGTH SCORE", 1));
        output.push_str(&format!(
            "{} Total: {}/100 {}\n",
            score.level.icon(),
            score.total,
            self.format_badge(score.level.label(), score.level.color())
        ));

        output.push_str(&self.format_header("Criteria", 3));
        for criterion in Criterion::ALL {
            output.push_str(&format!(
                "  {:<18} {:>5.1} / {:.0}\n",
                criterion.name(),
                score.breakdown.get(criterion),
                criterion.weight()
            ));
        }

        if !score.strengths.is_empty() {
            output.push_str(&self.format_header("Strengths", 3));
            for assessment in &score.strengths {
                let line = format!("{} ({}%)", assessment.criterion.name(), assessment.percentage);
                output.push_str(&format!("  • {}\n", self.colorize(&line, Color::Green)));
            }
        }

        if !score.weaknesses.is_empty() {
            output.push_str(&self.format_header("Weaknesses", 3));
            for assessment in &score.weaknesses {
                let line = format!("{} ({}%)", assessment.criterion.name(), assessment.percentage);
                output.push_str(&format!("  • {}\n", self.colorize(&line, Color::Yellow)));
            }
        }

        if !score.suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions", 2));
            output.push_str(&self.format_suggestions(&score.suggestions));
        }

        if let (true, Some(details)) = (self.detailed, &score.details) {
            output.push_str(&self.format_header("Details", 3));
            output.push_str(&format!(
                "  Strong verbs: {}\n",
                details.writing.strong_verbs.join(", ")
            ));
            if !details.writing.weak_verbs.is_empty() {
                output.push_str(&format!(
                    "  Weak verbs:   {}\n",
                    self.colorize(&details.writing.weak_verbs.join(", "), Color::Yellow)
                ));
            }
            output.push_str(&format!(
                "  Sections:     {}\n",
                section_list(&details.clarity.sections)
            ));
            output.push_str(&format!(
                "  Skills:       {} technical, {} soft, {} languages\n",
                details.skills.technical.len(),
                details.skills.soft.len(),
                details.skills.languages.len()
            ));
            output.push_str(&format!(
                "  Quantified results: {}\n",
                if details.achievements.has_quantifiable_results { "yes" } else { "no" }
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        self.render(result)
    }

    fn format_strength(&self, score: &StrengthScore) -> Result<String> {
        self.render(score)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_details: bool) -> Self {
        Self { include_details }
    }

    fn markdown_badge(label: &str, hex: &str) -> String {
        let dot = match hex {
            "#10b981" => "🟢",
            "#3b82f6" | "#8b5cf6" => "🔵",
            "#f59e0b" => "🟠",
            _ => "🔴",
        };
        format!("{} {}", dot, label)
    }

    fn format_markdown_suggestions(suggestions: &[Suggestion]) -> String {
        let mut output = String::from("## Suggestions\n\n");
        for (index, suggestion) in suggestions.iter().enumerate() {
            output.push_str(&format!(
                "{}. **[{}]** {}\n",
                index + 1,
                suggestion.priority,
                suggestion.text
            ));
        }
        output.push('\n');
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        let mut output = String::from("# ATS Compatibility Report\n\n");

        output.push_str(&format!(
            "**Score:** {}/{} {}\n\n",
            result.score,
            result.max_score,
            Self::markdown_badge(&result.level_label, &result.level_color)
        ));

        output.push_str("## Score Breakdown\n\n");
        output.push_str("| Component | Points |\n");
        output.push_str("|-----------|--------|\n");
        output.push_str(&format!("| Sections | {:.1} |\n", result.breakdown.sections));
        output.push_str(&format!("| Keywords | {:.1} |\n", result.breakdown.keywords));
        if let Some(job_match) = result.breakdown.job_match {
            output.push_str(&format!("| Job match | {:.1} |\n", job_match));
        }
        output.push_str(&format!("| Errors | {:.1} |\n\n", result.breakdown.errors));

        if !result.strengths.is_empty() {
            output.push_str("## Strengths\n\n");
            for strength in &result.strengths {
                output.push_str(&format!("- {}\n", strength));
            }
            output.push('\n');
        }

        if !result.errors.is_empty() {
            output.push_str("## Issues\n\n");
            for error in &result.errors {
                output.push_str(&format!("- **{}** ({}): {}\n", error.label, error.severity, error.description));
            }
            output.push('\n');
        }

        if !result.suggestions.is_empty() {
            output.push_str(&Self::format_markdown_suggestions(&result.suggestions));
        }

        if self.include_details {
            output.push_str("## Sections\n\n");
            for section in Section::ALL {
                let mark = if result.sections.found.contains(&section) { "x" } else { " " };
                output.push_str(&format!("- [{}] {}\n", mark, section.name()));
            }
            output.push('\n');

            if !result.keywords.found.is_empty() {
                output.push_str(&format!("## Keywords ({})\n\n", result.keywords.total));
                output.push_str(&format!("`{}`\n\n", result.keywords.found.join("`, `")));
            }
            if let Some(missing) = result.keywords.job_missing.as_ref().filter(|m| !m.is_empty()) {
                output.push_str(&format!("**Missing from job description:** `{}`\n\n", missing.join("`, `")));
            }
        }

        Ok(output)
    }

    fn format_strength(&self, score: &StrengthScore) -> Result<String> {
        let mut output = String::from("# CV Strength Report\n\n");

        output.push_str(&format!(
            "**Total:** {}/100 {}\n\n",
            score.total,
            Self::markdown_badge(score.level.label(), score.level.color())
        ));

        output.push_str("## Criteria\n\n");
        output.push_str("| Criterion | Score | Max |\n");
        output.push_str("|-----------|-------|-----|\n");
        for criterion in Criterion::ALL {
            output.push_str(&format!(
                "| {} | {:.1} | {:.0} |\n",
                criterion.name(),
                score.breakdown.get(criterion),
                criterion.weight()
            ));
        }
        output.push('\n');

        if !score.strengths.is_empty() {
            output.push_str("## Strengths\n\n");
            for assessment in &score.strengths {
                output.push_str(&format!("- {} ({}%)\n", assessment.criterion.name(), assessment.percentage));
            }
            output.push('\n');
        }

        if !score.weaknesses.is_empty() {
            output.push_str("## Weaknesses\n\n");
            for assessment in &score.weaknesses {
                output.push_str(&format!("- {} ({}%)\n", assessment.criterion.name(), assessment.percentage));
            }
            output.push('\n');
        }

        if !score.suggestions.is_empty() {
            output.push_str(&Self::format_markdown_suggestions(&score.suggestions));
        }

        if let (true, Some(details)) = (self.include_details, &score.details) {
            output.push_str("## Skills\n\n");
            for (label, skills) in [
                ("Technical", &details.skills.technical),
                ("Soft", &details.skills.soft),
                ("Languages", &details.skills.languages),
            ] {
                if !skills.is_empty() {
                    output.push_str(&format!("- **{}:** {}\n", label, skills.join(", ")));
                }
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(detailed),
        }
    }

    pub fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn analysis_report(&self, result: &AnalysisResult, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_analysis(result)
    }

    pub fn strength_report(&self, score: &StrengthScore, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_strength(score)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// Default report file name derived from the CV file name
pub fn suggest_filename(format: OutputFormat, cv_name: &str) -> String {
    let base_name = Path::new(cv_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    match format {
        OutputFormat::Console => format!("{}_report.txt", base_name),
        OutputFormat::Json => format!("{}_report.json", base_name),
        OutputFormat::Markdown => format!("{}_report.md", base_name),
    }
}
