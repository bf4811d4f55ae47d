//! Boundary-safe keyword and section matching across Latin and Arabic script

use crate::error::{AtharError, Result};
use crate::processing::text_processor::TextProcessor;
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Upper bound on the keywords harvested from a job description
pub const MAX_JOB_KEYWORDS: usize = 30;

/// Minimum letters for a generic job-description token
const MIN_JOB_TOKEN_LEN: usize = 4;

/// Character classes that decide whether a match sits on a word boundary.
///
/// A regex `\b` only knows about one script at a time, so the classification
/// is done explicitly: ASCII letters, digits and `_` form Latin words, the
/// Arabic block `U+0600..=U+06FF` forms Arabic words, everything else
/// (whitespace, punctuation, other scripts) separates words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    LatinWord,
    ArabicWord,
    Other,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        if c.is_ascii_alphanumeric() || c == '_' {
            CharClass::LatinWord
        } else if ('\u{0600}'..='\u{06FF}').contains(&c) {
            CharClass::ArabicWord
        } else {
            CharClass::Other
        }
    }

    pub fn is_word(self) -> bool {
        !matches!(self, CharClass::Other)
    }
}

/// Whether the span `start..end` of `haystack` has no word character of
/// either script directly on its left or right
pub fn is_bounded(haystack: &str, start: usize, end: usize) -> bool {
    let left_ok = haystack[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !CharClass::of(c).is_word());
    let right_ok = haystack[end..]
        .chars()
        .next()
        .map_or(true, |c| !CharClass::of(c).is_word());

    left_ok && right_ok
}

/// Whether `needle` occurs in `haystack` without touching a word character of
/// either script on its left or right. Both arguments are expected to be
/// lower-cased already; the needle is compared literally.
pub fn contains_bounded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    // Every char offset is a candidate so overlapping occurrences are still seen
    haystack
        .char_indices()
        .filter(|(start, _)| haystack[*start..].starts_with(needle))
        .any(|(start, _)| is_bounded(haystack, start, start + needle.len()))
}

/// Keyword categories of the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Technical,
    Soft,
    Organizations,
    ActionVerbs,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 4] = [
        KeywordCategory::Technical,
        KeywordCategory::Soft,
        KeywordCategory::Organizations,
        KeywordCategory::ActionVerbs,
    ];
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeywordCategory::Technical => "technical",
            KeywordCategory::Soft => "soft",
            KeywordCategory::Organizations => "organizations",
            KeywordCategory::ActionVerbs => "action verbs",
        };
        write!(f, "{}", name)
    }
}

/// Curated, immutable keyword lists per category
#[derive(Debug, Clone)]
pub struct KeywordTaxonomy {
    categories: Vec<(KeywordCategory, Vec<String>)>,
}

impl KeywordTaxonomy {
    /// Built-in humanitarian-sector taxonomy
    pub fn humanitarian() -> Self {
        let categories = KeywordCategory::ALL
            .iter()
            .map(|category| {
                let keywords = Self::default_keywords(*category)
                    .iter()
                    .map(|k| k.to_string())
                    .collect();
                (*category, keywords)
            })
            .collect();

        Self { categories }
    }

    /// Append extra keywords to a category, skipping ones it already holds
    pub fn with_additional(mut self, category: KeywordCategory, extra: &[String]) -> Self {
        if let Some((_, keywords)) = self.categories.iter_mut().find(|(c, _)| *c == category) {
            for keyword in extra {
                let keyword = keyword.trim();
                if keyword.is_empty() {
                    continue;
                }
                let exists = keywords.iter().any(|k| k.to_lowercase() == keyword.to_lowercase());
                if !exists {
                    keywords.push(keyword.to_string());
                }
            }
        }
        self
    }

    /// Keywords of one category in their curated order
    pub fn keywords(&self, category: KeywordCategory) -> &[String] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, keywords)| keywords.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over `(category, keyword)` pairs in taxonomy order
    pub fn iter(&self) -> impl Iterator<Item = (KeywordCategory, &str)> + '_ {
        self.categories
            .iter()
            .flat_map(|(category, keywords)| keywords.iter().map(move |k| (*category, k.as_str())))
    }

    /// Total number of keyword entries across categories
    pub fn len(&self) -> usize {
        self.categories.iter().map(|(_, k)| k.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn default_keywords(category: KeywordCategory) -> &'static [&'static str] {
        match category {
            KeywordCategory::Technical => &[
                "WASH", "Protection", "MEAL", "M&E", "Monitoring", "Evaluation",
                "Accountability", "Learning", "Nutrition", "Health", "Education",
                "Shelter", "CCCM", "Camp Coordination", "Camp Management",
                "Cash Transfer", "CVA", "Cash and Voucher", "Livelihoods",
                "Food Security", "NFI", "Non-Food Items", "Logistics",
                "Supply Chain", "Procurement", "HR", "Human Resources",
                "Finance", "Budget", "Grant Management", "Proposal Writing",
                "Report Writing", "Data Analysis", "Database Management",
                "GIS", "Geographic Information System", "Mapping",
            ],
            KeywordCategory::Soft => &[
                "Communication", "التواصل", "Leadership", "القيادة",
                "Teamwork", "العمل الجماعي", "Problem Solving", "حل المشكلات",
                "Critical Thinking", "التفكير النقدي", "Adaptability", "التكيف",
                "Time Management", "إدارة الوقت", "Multitasking", "تعدد المهام",
                "Coordination", "التنسيق", "Negotiation", "التفاوض",
                "Conflict Resolution", "حل النزاعات", "Cultural Sensitivity", "الحساسية الثقافية",
            ],
            KeywordCategory::Organizations => &[
                "UN", "UNHCR", "UNICEF", "WFP", "WHO", "IOM", "UNDP",
                "OCHA", "FAO", "UNESCO", "UNRWA", "IRC", "NRC",
                "Norwegian Refugee Council", "International Rescue Committee",
                "Save the Children", "Oxfam", "CARE", "Mercy Corps",
                "World Vision", "Islamic Relief", "Red Cross", "Red Crescent",
                "MSF", "Médecins Sans Frontières", "Doctors Without Borders",
            ],
            KeywordCategory::ActionVerbs => &[
                "Managed", "أدار", "Coordinated", "نسق", "Developed", "طور",
                "Implemented", "نفذ", "Led", "قاد", "Established", "أسس",
                "Designed", "صمم", "Conducted", "أجرى", "Facilitated", "يسر",
                "Monitored", "راقب", "Evaluated", "قيّم", "Analyzed", "حلل",
                "Improved", "حسّن", "Achieved", "حقق", "Delivered", "قدّم",
            ],
        }
    }
}

impl Default for KeywordTaxonomy {
    fn default() -> Self {
        Self::humanitarian()
    }
}

/// The six canonical CV sections, in their fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    PersonalInformation,
    ProfessionalSummary,
    WorkExperience,
    Education,
    Skills,
    Languages,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::PersonalInformation,
        Section::ProfessionalSummary,
        Section::WorkExperience,
        Section::Education,
        Section::Skills,
        Section::Languages,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::PersonalInformation => "Personal Information",
            Section::ProfessionalSummary => "Professional Summary",
            Section::WorkExperience => "Work Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Languages => "Languages",
        }
    }

    /// Header synonyms in both languages, as regex alternation branches
    fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Section::PersonalInformation => {
                &[r"personal\s+information", r"معلومات\s+شخصية", "contact", "الاتصال"]
            }
            Section::ProfessionalSummary => {
                &[r"professional\s+summary", "summary", r"ملخص\s+مهني", "objective", "الهدف"]
            }
            Section::WorkExperience => {
                &[r"work\s+experience", "experience", r"خبرة\s+عملية", "employment", "الوظائف"]
            }
            Section::Education => &["education", "تعليم", "academic", "الدراسة"],
            Section::Skills => &["skills", "مهارات", "competencies", "الكفاءات"],
            Section::Languages => &["languages", "لغات", r"language\s+skills"],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Compiled recognition patterns for the canonical sections
#[derive(Debug, Clone)]
pub struct SectionSpec {
    patterns: Vec<(Section, Regex)>,
}

impl SectionSpec {
    pub fn new() -> Result<Self> {
        let mut patterns = Vec::with_capacity(Section::ALL.len());
        for section in Section::ALL {
            let pattern = format!("(?i){}", section.synonyms().join("|"));
            patterns.push((section, Regex::new(&pattern)?));
        }
        Ok(Self { patterns })
    }

    /// Partition the canonical sections into found and missing
    pub fn detect(&self, text: &str) -> SectionFindings {
        let lowered = text.to_lowercase();
        let mut findings = SectionFindings::default();

        for (section, pattern) in &self.patterns {
            if pattern.is_match(&lowered) {
                findings.found.push(*section);
            } else {
                findings.missing.push(*section);
            }
        }

        findings
    }
}

/// Found/missing partition over the six canonical sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionFindings {
    pub found: Vec<Section>,
    pub missing: Vec<Section>,
}

impl SectionFindings {
    pub fn all_found(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Taxonomy keywords present in a text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatches {
    /// Each matched keyword once, in taxonomy order
    pub found: Vec<String>,
    /// Matches per category; a keyword listed under two categories shows up in both
    pub by_category: BTreeMap<KeywordCategory, Vec<String>>,
}

impl KeywordMatches {
    pub fn total(&self) -> usize {
        self.found.len()
    }

    pub fn in_category(&self, category: KeywordCategory) -> &[String] {
        self.by_category
            .get(&category)
            .map(|k| k.as_slice())
            .unwrap_or(&[])
    }
}

/// Keyword and section matcher over a fixed taxonomy
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    taxonomy: KeywordTaxonomy,
    /// `(category, keyword, pattern id)` in taxonomy order
    entries: Vec<(KeywordCategory, String, usize)>,
    automaton: AhoCorasick,
    pattern_count: usize,
    sections: SectionSpec,
}

impl KeywordMatcher {
    /// Matcher over the built-in humanitarian taxonomy
    pub fn new() -> Result<Self> {
        Self::with_taxonomy(KeywordTaxonomy::humanitarian())
    }

    pub fn with_taxonomy(taxonomy: KeywordTaxonomy) -> Result<Self> {
        // One automaton pattern per distinct lower-cased keyword
        let mut patterns: Vec<String> = Vec::new();
        let mut entries = Vec::with_capacity(taxonomy.len());

        for (category, keyword) in taxonomy.iter() {
            let lowered = keyword.to_lowercase();
            if lowered.is_empty() {
                continue;
            }
            let id = match patterns.iter().position(|p| *p == lowered) {
                Some(id) => id,
                None => {
                    patterns.push(lowered);
                    patterns.len() - 1
                }
            };
            entries.push((category, keyword.to_string(), id));
        }

        // Standard semantics so overlapping hits ("UN" inside "UN Women") all surface
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| AtharError::TextProcessing(format!("Failed to build keyword matcher: {}", e)))?;

        debug!("Built keyword automaton over {} patterns", patterns.len());

        Ok(Self {
            taxonomy,
            entries,
            automaton,
            pattern_count: patterns.len(),
            sections: SectionSpec::new()?,
        })
    }

    pub fn taxonomy(&self) -> &KeywordTaxonomy {
        &self.taxonomy
    }

    /// Find every taxonomy keyword present in the text
    pub fn find_keywords(&self, text: &str) -> KeywordMatches {
        let lowered_text = text.to_lowercase();
        let mut hit = vec![false; self.pattern_count];

        for m in self.automaton.find_overlapping_iter(&lowered_text) {
            if is_bounded(&lowered_text, m.start(), m.end()) {
                hit[m.pattern().as_usize()] = true;
            }
        }

        let mut matches = KeywordMatches::default();
        let mut seen = HashSet::new();

        for (category, keyword, id) in &self.entries {
            if !hit[*id] {
                continue;
            }

            matches
                .by_category
                .entry(*category)
                .or_default()
                .push(keyword.clone());

            if seen.insert(keyword.as_str()) {
                matches.found.push(keyword.clone());
            }
        }

        debug!("Matched {} taxonomy keywords", matches.found.len());
        matches
    }

    /// Detect the canonical sections
    pub fn detect_sections(&self, text: &str) -> SectionFindings {
        self.sections.detect(text)
    }

    /// Keywords worth looking for in a CV, derived from a job description:
    /// taxonomy hits first, then generic 4+ letter tokens, capped at
    /// [`MAX_JOB_KEYWORDS`] and deduplicated case-insensitively.
    pub fn extract_job_keywords(&self, job_text: &str, processor: &TextProcessor) -> Vec<String> {
        let mut keywords = Vec::new();
        let mut seen = HashSet::new();

        for keyword in self.find_keywords(job_text).found {
            if seen.insert(keyword.to_lowercase()) {
                keywords.push(keyword);
            }
        }

        for token in processor.alphabetic_tokens(job_text, MIN_JOB_TOKEN_LEN) {
            if seen.insert(token.clone()) {
                keywords.push(token);
            }
        }

        keywords.truncate(MAX_JOB_KEYWORDS);
        keywords
    }

    /// Split `terms` into those present in `text` and those missing
    pub fn partition_terms(&self, text: &str, terms: &[String]) -> (Vec<String>, Vec<String>) {
        let lowered_text = text.to_lowercase();
        terms
            .iter()
            .cloned()
            .partition(|term| contains_bounded(&lowered_text, &term.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_classes() {
        assert_eq!(CharClass::of('a'), CharClass::LatinWord);
        assert_eq!(CharClass::of('_'), CharClass::LatinWord);
        assert_eq!(CharClass::of('7'), CharClass::LatinWord);
        assert_eq!(CharClass::of('ق'), CharClass::ArabicWord);
        assert_eq!(CharClass::of(' '), CharClass::Other);
        assert_eq!(CharClass::of('-'), CharClass::Other);
        assert_eq!(CharClass::of('é'), CharClass::Other);
    }

    #[test]
    fn test_bounded_match_whole_word() {
        assert!(contains_bounded("i care a lot about care international", "care"));
        assert!(!contains_bounded("scared", "care"));
        assert!(!contains_bounded("washington", "wash"));
        assert!(contains_bounded("wash, protection", "wash"));
    }

    #[test]
    fn test_bounded_match_at_text_edges() {
        assert!(contains_bounded("wash", "wash"));
        assert!(contains_bounded("led", "led"));
        assert!(!contains_bounded("", "led"));
        assert!(!contains_bounded("led", ""));
    }

    #[test]
    fn test_bounded_match_respects_arabic_letters() {
        // "قاد" glued to a following Arabic letter is a different word
        assert!(!contains_bounded("قادة الفرق", "قاد"));
        assert!(contains_bounded("قاد فريق", "قاد"));
        // Latin keyword next to Arabic letters is not a boundary either
        assert!(!contains_bounded("washمياه", "wash"));
        assert!(contains_bounded("مياه wash مياه", "wash"));
    }

    #[test]
    fn test_bounded_match_literal_metacharacters() {
        assert!(contains_bounded("skilled in m&e and reporting", "m&e"));
        assert!(!contains_bounded("mxe", "m&e"));
    }

    #[test]
    fn test_bounded_match_overlapping_candidates() {
        assert!(contains_bounded("xa a a", "a a"));
    }

    #[test]
    fn test_find_keywords_skips_embedded_hits_and_keeps_later_ones() {
        let matcher = KeywordMatcher::new().unwrap();
        let matches = matcher.find_keywords("I was scared of nothing, then joined CARE International");

        assert_eq!(matches.in_category(KeywordCategory::Organizations), &["CARE".to_string()]);
    }

    #[test]
    fn test_find_keywords_reports_overlapping_organizations() {
        let matcher = KeywordMatcher::new().unwrap();
        let matches = matcher.find_keywords("Seconded to UN agencies: UNICEF, then Red Crescent");

        let orgs = matches.in_category(KeywordCategory::Organizations);
        assert_eq!(
            orgs,
            &["UN".to_string(), "UNICEF".to_string(), "Red Crescent".to_string()]
        );
        // "UNICEF" alone does not count as "UN"
        let only_unicef = matcher.find_keywords("UNICEF");
        assert_eq!(only_unicef.found, vec!["UNICEF".to_string()]);
    }

    #[test]
    fn test_find_keywords_literal_and_arabic_boundaries() {
        let matcher = KeywordMatcher::new().unwrap();

        let matches = matcher.find_keywords("Strong M&E background, قاد فريق");
        assert!(matches.found.contains(&"M&E".to_string()));
        assert!(matches.found.contains(&"قاد".to_string()));

        let glued = matcher.find_keywords("قادة WASHمياه");
        assert!(!glued.found.contains(&"قاد".to_string()));
        assert!(!glued.found.contains(&"WASH".to_string()));
    }

    #[test]
    fn test_find_keywords_is_set_semantics() {
        let matcher = KeywordMatcher::new().unwrap();
        let matches = matcher.find_keywords("WASH wash WASH and Protection");

        assert_eq!(matches.found, vec!["WASH".to_string(), "Protection".to_string()]);
        assert_eq!(matches.total(), 2);
    }

    #[test]
    fn test_find_keywords_mixed_scripts() {
        let matcher = KeywordMatcher::new().unwrap();
        let matches = matcher.find_keywords("أدار فريق التواصل مع UNICEF.");

        assert!(matches.found.contains(&"أدار".to_string()));
        assert!(matches.found.contains(&"التواصل".to_string()));
        assert!(matches.found.contains(&"UNICEF".to_string()));
        assert_eq!(matches.in_category(KeywordCategory::Organizations), &["UNICEF".to_string()]);
    }

    #[test]
    fn test_empty_text_matches_nothing() {
        let matcher = KeywordMatcher::new().unwrap();

        assert_eq!(matcher.find_keywords("").total(), 0);
        let sections = matcher.detect_sections("");
        assert!(sections.found.is_empty());
        assert_eq!(sections.missing.len(), 6);
    }

    #[test]
    fn test_cross_category_duplicates_recorded_in_both() {
        let taxonomy = KeywordTaxonomy::humanitarian()
            .with_additional(KeywordCategory::Soft, &["Budget".to_string()]);
        let matcher = KeywordMatcher::with_taxonomy(taxonomy).unwrap();
        let matches = matcher.find_keywords("Budget follow-up");

        assert_eq!(matches.found, vec!["Budget".to_string()]);
        assert_eq!(matches.in_category(KeywordCategory::Technical), &["Budget".to_string()]);
        assert_eq!(matches.in_category(KeywordCategory::Soft), &["Budget".to_string()]);
    }

    #[test]
    fn test_with_additional_skips_existing() {
        let base = KeywordTaxonomy::humanitarian();
        let extended = base.clone().with_additional(
            KeywordCategory::Technical,
            &["wash".to_string(), "Kobo Toolbox".to_string(), "  ".to_string()],
        );

        assert_eq!(extended.len(), base.len() + 1);
        assert!(extended.keywords(KeywordCategory::Technical).contains(&"Kobo Toolbox".to_string()));
    }

    #[test]
    fn test_section_detection_bilingual() {
        let matcher = KeywordMatcher::new().unwrap();
        let text = "معلومات شخصية\nملخص مهني\nWork Experience\nالدراسة\nمهارات\nLanguages";
        let sections = matcher.detect_sections(text);

        assert_eq!(sections.found, Section::ALL.to_vec());
        assert!(sections.all_found());
    }

    #[test]
    fn test_section_partition_is_exhaustive() {
        let matcher = KeywordMatcher::new().unwrap();
        for text in ["", "Skills only", "EDUCATION and experience", "random words"] {
            let sections = matcher.detect_sections(text);
            assert_eq!(sections.found.len() + sections.missing.len(), 6);
        }
    }

    #[test]
    fn test_job_keywords_capped_and_deduplicated() {
        let matcher = KeywordMatcher::new().unwrap();
        let processor = TextProcessor::new();
        let job = "WASH Officer needed. Protection experience. wash protection \
            alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima mike \
            november oscar papa quebec romeo sierra tango uniform victor whiskey xray yankee zulu";
        let keywords = matcher.extract_job_keywords(job, &processor);

        assert_eq!(keywords.len(), MAX_JOB_KEYWORDS);
        assert_eq!(keywords[0], "WASH");
        assert_eq!(keywords[1], "Protection");
        let wash_count = keywords.iter().filter(|k| k.eq_ignore_ascii_case("wash")).count();
        assert_eq!(wash_count, 1);
    }

    #[test]
    fn test_partition_terms() {
        let matcher = KeywordMatcher::new().unwrap();
        let terms = vec!["WASH".to_string(), "budget".to_string(), "GIS".to_string()];
        let (matched, missing) = matcher.partition_terms("Managed the WASH budget", &terms);

        assert_eq!(matched, vec!["WASH".to_string(), "budget".to_string()]);
        assert_eq!(missing, vec!["GIS".to_string()]);
    }
}
