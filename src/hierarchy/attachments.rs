use super::*;

const MAX_ATTACHMENT_REST_CHARS: usize = 100;

pub struct IdentifyAttachments {
    pattern: Regex,
}

impl IdentifyAttachments {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(
                "attachment line",
                r"(?i)^(?P<label>(?:(?:first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)[ \t]+)?(?P<keyword>schedule|annexure|annex|appendix|attachment)(?:[ \t]+(?P<num>\d{1,3}[a-z]?|[ivxlc]{1,6}|[a-z]))?)\b(?P<stop>\.)?[ \t]*(?:[-–—:][ \t]*)?(?P<rest>.*)$",
            )?,
        })
    }

    fn kind_for(keyword: &str) -> BlockKind {
        match keyword.to_ascii_lowercase().as_str() {
            "schedule" => BlockKind::Schedule,
            "appendix" => BlockKind::Appendix,
            "attachment" => BlockKind::Attachment,
            _ => BlockKind::Annexure,
        }
    }

    fn recognise(&self, tree: &mut Tree, id: NodeId) -> bool {
        let Some(text) = paragraph_text(tree, id) else {
            return false;
        };
        let Some(caps) = self.pattern.captures(&text) else {
            return false;
        };

        let rest = caps["rest"].trim();
        if starts_lowercase(rest) || rest.chars().count() > MAX_ATTACHMENT_REST_CHARS {
            note_ambiguous("attachment", &text);
            return false;
        }

        let mut block = Block::new(Self::kind_for(&caps["keyword"]))
            .with_heading(caps["label"].trim().to_string());
        if let Some(num) = caps.name("num") {
            block.num = Some(clean_num(num.as_str()).0);
        }
        block.num_stop_stripped = caps.name("stop").is_some();
        if !rest.is_empty() {
            block.subheading = Some(clean_heading(rest).0);
        }

        replace_with_block(tree, id, block);
        true
    }
}

impl Stage for IdentifyAttachments {
    fn name(&self) -> &str {
        "identify-attachments"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let mut found = 0usize;
        for id in top_level_paragraphs(&context.tree) {
            if context.tree.is_attached(id) && self.recognise(&mut context.tree, id) {
                found += 1;
            }
        }
        debug!(found, "identified attachments");
        Ok(())
    }
}

pub struct DemoteAttachmentSections;

impl Stage for DemoteAttachmentSections {
    fn name(&self) -> &str {
        "demote-attachment-sections"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let mut demoted = 0usize;

        // Before indentation everything is still flat under the root.
        let mut inside_attachment = false;
        for id in tree.children(tree.root()) {
            match tree.kind(id) {
                Some(kind) if kind.is_attachment() => inside_attachment = true,
                Some(BlockKind::Section) if inside_attachment => {
                    demoted += usize::from(demote(tree, id));
                }
                _ => {}
            }
        }

        // Re-runs see attachments that already own their content.
        for id in tree.descendants(tree.root()) {
            let in_attachment = tree.kind(id) == Some(BlockKind::Section)
                && ancestors(tree, id).any(|ancestor| {
                    tree.kind(ancestor)
                        .map(BlockKind::is_attachment)
                        .unwrap_or(false)
                });
            if in_attachment {
                demoted += usize::from(demote(tree, id));
            }
        }

        debug!(demoted, "demoted attachment sections");
        Ok(())
    }
}

fn demote(tree: &mut Tree, id: NodeId) -> bool {
    let Some(block) = tree.block_mut(id) else {
        return false;
    };
    block.kind = BlockKind::Paragraph;
    if let Some(heading) = block.heading.take() {
        let mut text = heading;
        if std::mem::take(&mut block.stop_stripped) {
            text.push('.');
        }
        let prose = tree.new_paragraph(Paragraph::text(text));
        tree.insert_after(id, prose);
    }
    true
}

fn ancestors(tree: &Tree, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(tree.parent(id), move |current| tree.parent(*current))
}

pub struct IdentifyAttachmentSubheadings;

impl Stage for IdentifyAttachmentSubheadings {
    fn name(&self) -> &str {
        "identify-attachment-subheadings"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        for id in tree.descendants(tree.root()) {
            let wants_subheading = tree
                .block(id)
                .map(|block| block.kind.is_attachment() && block.subheading.is_none())
                .unwrap_or(false);
            if !wants_subheading {
                continue;
            }

            let Some(first) = tree.first_child(id) else {
                continue;
            };
            if !is_prose(tree, first) {
                continue;
            }
            let Some(text) = paragraph_text(tree, first).filter(|text| !text.is_empty()) else {
                continue;
            };

            if let Some(block) = tree.block_mut(id) {
                block.subheading = Some(text);
            }
            tree.detach(first);
        }
        Ok(())
    }
}
