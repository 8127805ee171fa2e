use super::*;

pub struct IdentifySpeeches {
    pattern: Regex,
}

impl IdentifySpeeches {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(
                "speaker line",
                r"^(?P<from>(?:(?:THE[ \t]+)?(?:HON|MR|MRS|MS|DR|PROF|ADV|REV)\.?[ \t]+[A-Z][A-Z .'’-]*?|THE[ \t]+[A-Z][A-Z -]*?)(?:[ \t]*\[[^\]]+\])?|\[[^\]]+\])[ \t]*:[ \t]*(?P<rest>.*)$",
            )?,
        })
    }
}

impl Stage for IdentifySpeeches {
    fn name(&self) -> &str {
        "identify-speeches"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let mut found = 0usize;
        for id in top_level_paragraphs(tree) {
            let Some(text) = paragraph_text(tree, id) else {
                continue;
            };
            let Some(caps) = self.pattern.captures(&text) else {
                continue;
            };

            let speaker = caps["from"].trim().to_string();
            let consumed = caps.name("rest").map(|m| m.start()).unwrap_or(text.len());
            precede_with_block(tree, id, Block::new(BlockKind::Speech).with_heading(speaker), consumed);
            found += 1;
        }
        debug!(found, "identified speeches");
        Ok(())
    }
}

pub struct IdentifyRemarks {
    pattern: Regex,
}

impl IdentifyRemarks {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile("remark line", r"^(?:\([^()]*\)|\[[^\[\]]*\])\.?$")?,
        })
    }
}

impl Stage for IdentifyRemarks {
    fn name(&self) -> &str {
        "identify-remarks"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let mut found = 0usize;
        for id in tree.descendants(tree.root()) {
            let is_remark = paragraph_text(tree, id)
                .map(|text| self.pattern.is_match(&text))
                .unwrap_or(false);
            if !is_remark {
                continue;
            }
            if let Some(paragraph) = tree.paragraph_mut(id) {
                paragraph.role = ParagraphRole::Remark;
                found += 1;
            }
        }
        debug!(found, "identified remarks");
        Ok(())
    }
}

pub struct WrapDebate;

impl Stage for WrapDebate {
    fn name(&self) -> &str {
        "wrap-debate"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let root = tree.root();
        let children = tree.children(root);
        if children
            .iter()
            .any(|id| tree.kind(*id) == Some(BlockKind::Body))
        {
            return Ok(());
        }

        let content = children
            .into_iter()
            .filter(|id| tree.kind(*id) != Some(BlockKind::Preface))
            .collect::<Vec<NodeId>>();
        if content.is_empty() {
            return Ok(());
        }

        let body = tree.new_block(Block::new(BlockKind::Body));
        let section = tree.new_block(Block::new(BlockKind::DebateSection));
        tree.insert_before(content[0], body);
        tree.append_child(body, section);
        for id in content {
            tree.append_child(section, id);
        }
        debug!("wrapped debate body");
        Ok(())
    }
}
