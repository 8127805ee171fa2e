use super::*;

pub struct ValidateTree;

const STAGE: &str = "validate-tree";

impl ValidateTree {
    fn check_top_level(tree: &Tree) -> Result<()> {
        let mut seen_block = false;
        for (index, id) in tree.children(tree.root()).into_iter().enumerate() {
            if tree.is_block(id) {
                seen_block = true;
            } else if seen_block {
                let text = paragraph_text(tree, id).unwrap_or_default();
                return Err(Error::parse_failure_at(
                    STAGE,
                    format!("paragraph after the first block at top level: {text}"),
                    format!("child {index}"),
                ));
            }
        }
        Ok(())
    }

    fn check_blocks(context: &Context) -> Result<()> {
        let tree = &context.tree;
        let root = tree.root();
        for id in tree.descendants(root) {
            if let Some(block) = tree.block(id) {
                let front_matter = matches!(block.kind, BlockKind::Preface | BlockKind::Preamble);
                if front_matter && tree.parent(id) != Some(root) {
                    return Err(Error::parse_failure_at(
                        STAGE,
                        format!("{} is not a child of the container", block.kind.as_str()),
                        block.id.clone().unwrap_or_default(),
                    ));
                }
                if let Some(num) = block.num.as_deref() {
                    if num.ends_with('.') || num.trim() != num {
                        return Err(Error::parse_failure_at(
                            STAGE,
                            format!("{} number '{num}' was not cleaned", block.kind.as_str()),
                            block.id.clone().unwrap_or_default(),
                        ));
                    }
                }
            }

            if let Some(src) = tree.paragraph(id).and_then(|paragraph| paragraph.src.as_deref()) {
                if context.attachment(src).is_none() {
                    return Err(Error::parse_failure(
                        STAGE,
                        format!("image source '{src}' has no matching attachment"),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Stage for ValidateTree {
    fn name(&self) -> &str {
        STAGE
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        Self::check_top_level(&context.tree)?;
        Self::check_blocks(context)?;
        let counts = count_kinds(&context.tree);
        debug!(
            blocks = counts.values().sum::<usize>(),
            kinds = counts.len(),
            "validated tree"
        );
        Ok(())
    }
}
