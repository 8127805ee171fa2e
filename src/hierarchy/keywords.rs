use super::*;

const MAX_INLINE_HEADING_CHARS: usize = 100;

pub struct IdentifyKeywordBlocks {
    name: &'static str,
    kind: BlockKind,
    pattern: Regex,
}

impl IdentifyKeywordBlocks {
    pub fn new(name: &'static str, kind: BlockKind, keyword: &str) -> Result<Self> {
        let pattern = format!(
            r"^(?i:{keyword})[ \t]+(?P<num>(?i:\d{{1,4}}[a-z]{{0,2}}|[ivxlcdm]+|[a-z]))(?P<stop>\.)?(?:[ \t]*$|[ \t]*(?P<sep>[-–—:.])[ \t]*(?P<after>.*)$|[ \t]+(?P<heading>.+)$)"
        );
        Ok(Self {
            name,
            kind,
            pattern: compile("keyword block", &pattern)?,
        })
    }

    pub fn articles() -> Result<Self> {
        Self::new("identify-articles", BlockKind::Article, "article")
    }

    pub fn parts() -> Result<Self> {
        Self::new("identify-parts", BlockKind::Part, "part")
    }

    pub fn subparts() -> Result<Self> {
        Self::new("identify-subparts", BlockKind::Subpart, "subpart")
    }

    pub fn chapters() -> Result<Self> {
        Self::new("identify-chapters", BlockKind::Chapter, "chapter")
    }

    fn recognise(&self, tree: &mut Tree, id: NodeId) -> bool {
        let Some(text) = paragraph_text(tree, id) else {
            return false;
        };
        let Some(caps) = self.pattern.captures(&text) else {
            return false;
        };

        let inline = caps
            .name("heading")
            .or_else(|| caps.name("after"))
            .map(|m| m.as_str().trim())
            .unwrap_or("");
        if starts_lowercase(inline) || inline.chars().count() > MAX_INLINE_HEADING_CHARS {
            note_ambiguous(self.kind.as_str(), &text);
            return false;
        }

        let (num, _) = clean_num(&caps["num"]);
        let mut block = Block::new(self.kind).with_num(num);
        block.num_stop_stripped = caps.name("stop").is_some();
        if !inline.is_empty() {
            let (heading, stop) = clean_heading(inline);
            block.heading = Some(heading);
            block.stop_stripped = stop;
        }
        let ends_on_separator = inline.is_empty() && caps.name("sep").is_some();

        let marker = replace_with_block(tree, id, block);
        if ends_on_separator {
            self.take_heading_from_next(tree, marker);
        }
        true
    }

    fn take_heading_from_next(&self, tree: &mut Tree, marker: NodeId) {
        let Some(next) = tree.next_sibling(marker) else {
            return;
        };
        let Some(paragraph) = tree.paragraph(next) else {
            return;
        };
        if !is_heading_candidate(paragraph) {
            return;
        }

        let (heading, stop) = clean_heading(&paragraph.plain_text());
        if let Some(block) = tree.block_mut(marker) {
            block.heading = Some(heading);
            block.stop_stripped = stop;
        }
        tree.detach(next);
    }
}

impl Stage for IdentifyKeywordBlocks {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let mut found = 0usize;
        for id in top_level_paragraphs(&context.tree) {
            if context.tree.is_attached(id) && self.recognise(&mut context.tree, id) {
                found += 1;
            }
        }
        debug!(kind = self.kind.as_str(), found, "identified keyword blocks");
        Ok(())
    }
}
