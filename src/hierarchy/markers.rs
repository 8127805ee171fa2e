use super::*;

pub struct MarkBody;

impl Stage for MarkBody {
    fn name(&self) -> &str {
        "mark-body"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        if context.fragment.is_some() {
            return Ok(());
        }
        let tree = &mut context.tree;
        let root = tree.root();
        let children = tree.children(root);
        if children
            .iter()
            .any(|id| tree.kind(*id) == Some(BlockKind::Body))
        {
            return Ok(());
        }

        let first_body_block = children.into_iter().find(|id| {
            tree.kind(*id)
                .map(|kind| {
                    !matches!(kind, BlockKind::Preface | BlockKind::Preamble)
                        && !kind.is_attachment()
                })
                .unwrap_or(false)
        });
        if let Some(anchor) = first_body_block {
            let body = tree.new_block(Block::new(BlockKind::Body));
            tree.insert_before(anchor, body);
            debug!("marked body");
        }
        Ok(())
    }
}

pub struct MarkPreamble {
    pattern: Regex,
}

impl MarkPreamble {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile("preamble line", r"(?i)^preamble[ \t]*[.:]?$")?,
        })
    }
}

impl Stage for MarkPreamble {
    fn name(&self) -> &str {
        "mark-preamble"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        if context.fragment.is_some() {
            return Ok(());
        }
        let tree = &mut context.tree;
        let root = tree.root();
        let children = tree.children(root);
        if children
            .iter()
            .any(|id| tree.kind(*id) == Some(BlockKind::Preamble))
        {
            return Ok(());
        }

        let literal = children
            .into_iter()
            .take_while(|id| tree.is_paragraph(*id))
            .find(|id| {
                paragraph_text(tree, *id)
                    .map(|text| self.pattern.is_match(&text))
                    .unwrap_or(false)
            });
        if let Some(anchor) = literal {
            let preamble = tree.new_block(Block::new(BlockKind::Preamble));
            tree.insert_before(anchor, preamble);
            debug!("marked preamble");
        }
        Ok(())
    }
}

pub struct MarkPreface;

impl Stage for MarkPreface {
    fn name(&self) -> &str {
        "mark-preface"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        if context.fragment.is_some() {
            return Ok(());
        }
        let tree = &mut context.tree;
        let root = tree.root();
        let opens_with_prose = tree
            .first_child(root)
            .map(|first| tree.is_paragraph(first))
            .unwrap_or(false);
        if opens_with_prose {
            let preface = tree.new_block(Block::new(BlockKind::Preface));
            tree.prepend_child(root, preface);
            debug!("marked preface");
        }
        Ok(())
    }
}

pub struct PromoteContainerHeadings;

impl Stage for PromoteContainerHeadings {
    fn name(&self) -> &str {
        "promote-container-headings"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let mut promoted = 0usize;

        for id in tree.descendants(tree.root()) {
            let headless_container = tree
                .block(id)
                .map(|block| {
                    matches!(
                        block.kind,
                        BlockKind::Part | BlockKind::Subpart | BlockKind::Chapter
                    ) && block.heading.is_none()
                })
                .unwrap_or(false);
            if !headless_container {
                continue;
            }

            let children = tree.children(id);
            let Some((&first, rest)) = children.split_first() else {
                continue;
            };
            if rest.is_empty() || !rest.iter().all(|child| tree.is_block(*child)) {
                continue;
            }
            if !is_prose(tree, first) {
                continue;
            }
            let Some(text) = paragraph_text(tree, first).filter(|text| is_plausible_heading(text))
            else {
                continue;
            };

            let (heading, stop) = clean_heading(&text);
            if let Some(block) = tree.block_mut(id) {
                block.heading = Some(heading);
                block.stop_stripped = stop;
            }
            tree.detach(first);
            promoted += 1;
        }

        debug!(promoted, "promoted container headings");
        Ok(())
    }
}
