use super::*;

pub struct IdentifySubsections {
    pattern: Regex,
}

impl IdentifySubsections {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(
                "subsection marker",
                r"^\((?P<num>\d{1,3}[a-zA-Z]{0,2})\)(?:[ \t]+|$)",
            )?,
        })
    }
}

impl Stage for IdentifySubsections {
    fn name(&self) -> &str {
        "identify-subsections"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let found = mark_numbered(&mut context.tree, BlockKind::Subsection, |text| {
            let caps = self.pattern.captures(text)?;
            Some((format!("({})", &caps["num"]), false, caps.get(0)?.end()))
        });
        debug!(found, "identified subsections");
        Ok(())
    }
}

pub struct IdentifyParagraphs {
    lettered: Regex,
    dotted: Regex,
}

impl IdentifyParagraphs {
    pub fn new() -> Result<Self> {
        Ok(Self {
            lettered: compile(
                "lettered paragraph marker",
                r"^\((?P<num>[a-zA-Z]{1,4})\)(?:[ \t]+|$)",
            )?,
            dotted: compile(
                "dotted paragraph marker",
                r"^(?P<num>\d{1,3}[a-zA-Z]{0,2}(?:\.\d{1,3}[a-zA-Z]{0,2})*)(?P<stop>\.)?[ \t]+",
            )?,
        })
    }

    fn marker(&self, text: &str) -> Option<(String, bool, usize)> {
        if let Some(caps) = self.lettered.captures(text) {
            return Some((format!("({})", &caps["num"]), false, caps.get(0)?.end()));
        }
        let caps = self.dotted.captures(text)?;
        let (num, _) = clean_num(&caps["num"]);
        Some((num, caps.name("stop").is_some(), caps.get(0)?.end()))
    }
}

impl Stage for IdentifyParagraphs {
    fn name(&self) -> &str {
        "identify-paragraphs"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let found = mark_numbered(&mut context.tree, BlockKind::Paragraph, |text| {
            self.marker(text)
        });
        debug!(found, "identified paragraphs");
        Ok(())
    }
}

fn mark_numbered<F>(tree: &mut Tree, kind: BlockKind, matcher: F) -> usize
where
    F: Fn(&str) -> Option<(String, bool, usize)>,
{
    let mut found = 0usize;
    for id in top_level_paragraphs(tree) {
        if !tree.is_attached(id) {
            continue;
        }
        let Some(text) = paragraph_text(tree, id) else {
            continue;
        };
        let Some((num, num_stop_stripped, consumed)) = matcher(&text) else {
            continue;
        };

        let mut block = Block::new(kind).with_num(num);
        block.num_stop_stripped = num_stop_stripped;
        precede_with_block(tree, id, block, consumed);
        found += 1;
    }
    found
}
