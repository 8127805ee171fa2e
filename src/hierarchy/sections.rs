use super::*;

/// Recognises numbered section lines: `26.`, `1. Definitions`,
/// `62. (1) For the purpose...` and `3 Application of Act (1) This Act...`.
///
/// Text before an inline `(1)` only becomes the heading when a capitalised
/// sentence follows the marker and the text does not end on a reference word,
/// so `5. Subject to subsection (1) of section 4...` stays body text. A number
/// followed by other prose only counts as a section when the line before it
/// reads like a heading.
pub struct IdentifySections {
    pattern: Regex,
    first_subsection: Regex,
    inline_subsection: Regex,
    subsection_reference: Regex,
    any_subsection: Regex,
}

impl IdentifySections {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(
                "section line",
                r"^(?P<num>\d{1,4}[a-zA-Z]{0,2})(?P<stop>\.)?(?:[ \t]+(?P<rest>.*))?$",
            )?,
            first_subsection: compile("first subsection", r"^\(1\)(?:[ \t]|$)")?,
            inline_subsection: compile(
                "inline first subsection",
                r"^(?P<heading>.+?)[ \t]+\(1\)[ \t]+\p{Lu}",
            )?,
            subsection_reference: compile(
                "subsection reference",
                r"(?i)\b(?:sub-?section|section|paragraph)$",
            )?,
            any_subsection: compile("subsection marker", r"(?:^|[ \t])\(1\)(?:[ \t]|$)")?,
        })
    }

    fn recognise(&self, tree: &mut Tree, id: NodeId) -> bool {
        let Some(text) = paragraph_text(tree, id) else {
            return false;
        };
        let Some(caps) = self.pattern.captures(&text) else {
            return false;
        };

        let (num, _) = clean_num(&caps["num"]);
        let stop = caps.name("stop").is_some();
        let mut block = Block::new(BlockKind::Section).with_num(num);
        block.num_stop_stripped = stop;

        let previous_is_heading = tree
            .prev_sibling(id)
            .and_then(|prev| tree.paragraph(prev))
            .map(is_heading_candidate)
            .unwrap_or(false);

        let Some(rest) = caps.name("rest").filter(|m| !m.as_str().trim().is_empty()) else {
            if stop || previous_is_heading {
                replace_with_block(tree, id, block);
                return true;
            }
            return false;
        };
        let rest_text = rest.as_str();

        if self.first_subsection.is_match(rest_text) {
            precede_with_block(tree, id, block, rest.start());
            return true;
        }

        if let Some(inline) = self.inline_subsection.captures(rest_text) {
            let heading = &inline["heading"];
            let is_reference = self.subsection_reference.is_match(heading.trim_end())
                || self.any_subsection.is_match(heading);
            if is_plausible_heading(heading) && !is_reference {
                let (heading, heading_stop) = clean_heading(heading);
                block.heading = Some(heading);
                block.stop_stripped = heading_stop;
                let consumed = rest.start() + inline["heading"].len();
                precede_with_block(tree, id, block, consumed);
                return true;
            }
        }

        if self.any_subsection.is_match(rest_text) {
            precede_with_block(tree, id, block, rest.start());
            return true;
        }

        if is_plausible_heading(rest_text) {
            let (heading, heading_stop) = clean_heading(rest_text);
            block.heading = Some(heading);
            block.stop_stripped = heading_stop;
            replace_with_block(tree, id, block);
            return true;
        }

        if previous_is_heading {
            precede_with_block(tree, id, block, rest.start());
            return true;
        }

        false
    }
}

impl Stage for IdentifySections {
    fn name(&self) -> &str {
        "identify-sections"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let mut found = 0usize;
        for id in top_level_paragraphs(&context.tree) {
            if context.tree.is_attached(id) && self.recognise(&mut context.tree, id) {
                found += 1;
            }
        }
        debug!(found, "identified sections");
        Ok(())
    }
}

pub struct NumberedParagraphsAgain;

impl Stage for NumberedParagraphsAgain {
    fn name(&self) -> &str {
        "numbered-paragraphs-again"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let mut demoted = 0usize;

        for id in tree.children(tree.root()) {
            let Some(block) = tree.block(id) else {
                continue;
            };
            if block.kind != BlockKind::Section || block.heading.is_none() {
                continue;
            }

            let next_is_numbered = tree
                .next_sibling(id)
                .and_then(|next| tree.block(next))
                .map(|next| match next.kind {
                    BlockKind::Section => true,
                    BlockKind::Paragraph => next
                        .num
                        .as_deref()
                        .and_then(|num| num.chars().next())
                        .map(|ch| ch.is_ascii_digit())
                        .unwrap_or(false),
                    _ => false,
                })
                .unwrap_or(false);
            if !next_is_numbered {
                continue;
            }

            let Some(block) = tree.block_mut(id) else {
                continue;
            };
            block.kind = BlockKind::Paragraph;
            let stop = std::mem::take(&mut block.stop_stripped);
            let Some(mut text) = block.heading.take() else {
                continue;
            };
            if stop {
                text.push('.');
            }
            let prose = tree.new_paragraph(Paragraph::text(text));
            tree.insert_after(id, prose);
            demoted += 1;
        }

        debug!(demoted, "demoted numbered sections");
        Ok(())
    }
}

pub struct IdentifySectionHeadings;

impl Stage for IdentifySectionHeadings {
    fn name(&self) -> &str {
        "identify-section-headings"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let mut promoted = 0usize;

        for id in tree.children(tree.root()) {
            let headless_section = tree
                .block(id)
                .map(|block| block.kind == BlockKind::Section && block.heading.is_none())
                .unwrap_or(false);
            if !headless_section {
                continue;
            }

            let Some(prev) = tree.prev_sibling(id) else {
                continue;
            };
            let Some(paragraph) = tree.paragraph(prev) else {
                continue;
            };
            if !is_heading_candidate(paragraph) {
                continue;
            }

            let (heading, stop) = clean_heading(&paragraph.plain_text());
            if let Some(block) = tree.block_mut(id) {
                block.heading = Some(heading);
                block.stop_stripped = stop;
            }
            tree.detach(prev);
            promoted += 1;
        }

        debug!(promoted, "promoted section headings");
        Ok(())
    }
}
