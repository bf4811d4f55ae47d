//! Text extraction from supported file formats

use crate::error::Result;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

/// Renders markdown to plain text, one block per line, so section headers
/// survive as their own lines for section detection
pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(Self::markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak | Event::Rule => text.push('\n'),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_))
                | Event::End(Tag::TableRow)
                | Event::End(Tag::TableHead) => text.push('\n'),
                Event::End(Tag::TableCell) => text.push(' '),
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_blocks_become_lines() {
        let markdown = "# الملخص المهني\n\nمنسق مشاريع **ذو خبرة** في UNICEF.\n\n## Skills\n\n- M&E\n- `Excel`\n";
        let text = MarkdownExtractor::markdown_to_text(markdown);

        assert_eq!(
            text,
            "الملخص المهني\nمنسق مشاريع ذو خبرة في UNICEF.\nSkills\nM&E\nExcel"
        );
    }

    #[tokio::test]
    async fn test_plain_text_extractor_reads_utf8() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "الخبرة العملية\nProject Officer").unwrap();

        let text = PlainTextExtractor.extract(&path).await.unwrap();
        assert_eq!(text, "الخبرة العملية\nProject Officer");
    }
}
