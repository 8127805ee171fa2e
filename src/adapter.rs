use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pipeline::{Context, Stage};
use crate::tree::{Paragraph, Run, Tree};

/// Builds a fresh flat container from `Context::text`, one paragraph per
/// non-blank line. Page breaks count as line breaks. Running it again
/// replaces the tree, so it belongs before the hierarchy stages only.
pub struct TextToParagraphs;

pub fn paragraphs_from_text(text: &str) -> Vec<Paragraph> {
    text.split(['\n', '\x0c'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Paragraph::text)
        .collect()
}

impl Stage for TextToParagraphs {
    fn name(&self) -> &str {
        "text-to-paragraphs"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let paragraphs = paragraphs_from_text(&context.text);
        debug!(paragraphs = paragraphs.len(), "split text into paragraphs");
        context.tree = Tree::from_paragraphs(paragraphs);
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ParagraphInput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    runs: Option<Vec<Run>>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    centered: bool,
    #[serde(default)]
    src: Option<String>,
}

impl ParagraphInput {
    fn into_paragraph(self, index: usize) -> Result<Paragraph> {
        let runs = match (self.runs, self.text) {
            (Some(runs), _) => runs,
            (None, Some(text)) => vec![Run {
                text,
                bold: self.bold,
                italic: false,
            }],
            (None, None) if self.src.is_some() => Vec::new(),
            (None, None) => {
                return Err(Error::InvalidInput(format!(
                    "paragraph {index} has neither text, runs nor src"
                )));
            }
        };
        Ok(Paragraph {
            runs,
            centered: self.centered,
            src: self.src,
            ..Paragraph::default()
        })
    }
}

pub fn paragraphs_from_json(bytes: &[u8]) -> Result<Tree> {
    let inputs = serde_json::from_slice::<Vec<ParagraphInput>>(bytes)
        .map_err(|err| Error::InvalidInput(format!("paragraph JSON: {err}")))?;
    if inputs.is_empty() {
        return Err(Error::InvalidInput("paragraph list is empty".to_string()));
    }

    let paragraphs = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| input.into_paragraph(index))
        .collect::<Result<Vec<Paragraph>>>()?;
    Ok(Tree::from_paragraphs(paragraphs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lines_become_paragraphs() {
        let paragraphs = paragraphs_from_text("  first \n\n second\x0cthird\n");
        let texts = paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<String>>();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn json_paragraphs_keep_formatting() {
        let json = br#"[
            {"text": "CHAPTER 1", "bold": true, "centered": true},
            {"runs": [{"text": "1. "}, {"text": "Definitions", "italic": true}]},
            {"src": "figure-1.png"}
        ]"#;
        let tree = paragraphs_from_json(json).expect("valid paragraph JSON");
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 3);

        let heading = tree.paragraph(children[0]).expect("paragraph");
        assert!(heading.is_bold() && heading.centered);
        let runs = tree.paragraph(children[1]).expect("paragraph");
        assert_eq!(runs.plain_text(), "1. Definitions");
        let image = tree.paragraph(children[2]).expect("paragraph");
        assert_eq!(image.src.as_deref(), Some("figure-1.png"));
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        assert!(matches!(
            paragraphs_from_json(b"{\"text\": 1}"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            paragraphs_from_json(b"[]"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            paragraphs_from_json(b"[{\"centered\": true}]"),
            Err(Error::InvalidInput(_))
        ));
    }
}
