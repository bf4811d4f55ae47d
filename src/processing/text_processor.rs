//! Text measurement helpers shared by the scorers

use regex::Regex;
use std::collections::HashSet;

/// Sentence terminators: Latin full stop and exclamation, Arabic question mark.
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '\u{061F}'];

#[derive(Debug, Clone)]
pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    digit_regex: Regex,
    contact_regex: Regex,
    date_regex: Regex,
    latin_word_regex: Regex,
}

/// Surface statistics of a block of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextStats {
    pub sentence_count: usize,
    pub average_sentence_length: f64,
    pub word_count: usize,
    pub unique_word_count: usize,
}

impl TextStats {
    /// Unique words over total words, 0.0 for text without words
    pub fn vocabulary_ratio(&self) -> f64 {
        if self.word_count == 0 {
            0.0
        } else {
            self.unique_word_count as f64 / self.word_count as f64
        }
    }
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let stop_words = Self::create_stop_words();

        let digit_regex = Regex::new(r"[0-9]").expect("Invalid digit regex");

        let contact_regex = Regex::new(r"(?i)[0-9]{10}|@|email")
            .expect("Invalid contact regex");

        let date_regex = Regex::new(r"[0-9]{4}|20[0-9]{2}")
            .expect("Invalid date regex");

        let latin_word_regex = Regex::new(r"[A-Za-z0-9_]+").expect("Invalid word regex");

        Self {
            stop_words,
            digit_regex,
            contact_regex,
            date_regex,
            latin_word_regex,
        }
    }

    /// Split text into sentences on `.`, `!` and `؟`, dropping blank pieces
    pub fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split(|c: char| SENTENCE_TERMINATORS.contains(&c))
            .filter(|s| !s.trim().is_empty())
            .collect()
    }

    /// Whitespace-separated words
    pub fn words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_whitespace().collect()
    }

    /// Compute sentence and vocabulary statistics
    pub fn stats(&self, text: &str) -> TextStats {
        let sentences = self.split_sentences(text);
        let sentence_count = sentences.len();

        // Lengths are counted in characters, untrimmed
        let average_sentence_length = if sentence_count == 0 {
            0.0
        } else {
            let total: usize = sentences.iter().map(|s| s.chars().count()).sum();
            total as f64 / sentence_count as f64
        };

        let words = self.words(text);
        let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();

        TextStats {
            sentence_count,
            average_sentence_length,
            word_count: words.len(),
            unique_word_count: unique.len(),
        }
    }

    /// Whether the text contains any ASCII digit
    pub fn has_digits(&self, text: &str) -> bool {
        self.digit_regex.is_match(text)
    }

    /// Phone-like digit run, an `@`, or the word "email"
    pub fn has_contact_info(&self, text: &str) -> bool {
        self.contact_regex.is_match(text)
    }

    /// Four-digit year-like figures
    pub fn has_clear_dates(&self, text: &str) -> bool {
        self.date_regex.is_match(text)
    }

    /// Harvest lower-cased ASCII alphabetic tokens of at least `min_len`
    /// letters that are not stop words, in order of first appearance.
    ///
    /// Tokens are runs of ASCII word characters, so apostrophes and Arabic
    /// letters split them (`donor's` gives `donor`) while runs mixing in
    /// digits or `_` are skipped whole.
    pub fn alphabetic_tokens(&self, text: &str, min_len: usize) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tokens = Vec::new();

        for word in self.latin_word_regex.find_iter(text).map(|m| m.as_str()) {
            if word.len() < min_len || !word.chars().all(|c| c.is_ascii_alphabetic()) {
                continue;
            }

            let normalized = word.to_ascii_lowercase();
            if self.stop_words.contains(normalized.as_str()) {
                continue;
            }

            if seen.insert(normalized.clone()) {
                tokens.push(normalized);
            }
        }

        tokens
    }

    /// Common English function words ignored when harvesting job-description terms
    fn create_stop_words() -> HashSet<&'static str> {
        [
            "the", "and", "for", "with", "this", "that", "from", "have", "will",
            "your", "their",
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_split_handles_arabic_question_mark() {
        let processor = TextProcessor::new();
        let sentences = processor.split_sentences("قاد الفريق. هل نجح المشروع؟ نعم!");

        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn test_stats_on_empty_text() {
        let processor = TextProcessor::new();
        let stats = processor.stats("");

        assert_eq!(stats.sentence_count, 0);
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.average_sentence_length, 0.0);
        assert_eq!(stats.vocabulary_ratio(), 0.0);
    }

    #[test]
    fn test_vocabulary_ratio() {
        let processor = TextProcessor::new();
        let stats = processor.stats("data data Data analysis");

        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.unique_word_count, 2);
        assert!((stats.vocabulary_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contact_and_dates() {
        let processor = TextProcessor::new();

        assert!(processor.has_contact_info("reach me at someone@example.org"));
        assert!(processor.has_contact_info("Phone 0791234567"));
        assert!(processor.has_contact_info("EMAIL on request"));
        assert!(!processor.has_contact_info("no way to reach"));

        assert!(processor.has_clear_dates("2019 - 2023"));
        assert!(!processor.has_clear_dates("since 99"));
    }

    #[test]
    fn test_alphabetic_tokens_skip_stop_words_and_short_words() {
        let processor = TextProcessor::new();
        let tokens = processor.alphabetic_tokens(
            "The officer will coordinate with partners and donors, data2 team",
            4,
        );

        assert_eq!(tokens, vec!["officer", "coordinate", "partners", "donors", "team"]);
    }

    #[test]
    fn test_alphabetic_tokens_ignore_arabic() {
        let processor = TextProcessor::new();
        let tokens = processor.alphabetic_tokens("منسق مشاريع WASH Officer", 4);

        assert_eq!(tokens, vec!["wash", "officer"]);
    }

    #[test]
    fn test_alphabetic_tokens_split_on_apostrophes_and_arabic() {
        let processor = TextProcessor::new();
        let tokens = processor.alphabetic_tokens("The officer's role: manage donor's grants, WASHمياه", 4);

        assert_eq!(tokens, vec!["officer", "role", "manage", "donor", "grants", "wash"]);
    }
}
