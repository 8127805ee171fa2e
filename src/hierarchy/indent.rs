use super::*;

pub struct IndentBlocks;

impl Stage for IndentBlocks {
    fn name(&self) -> &str {
        "indent-blocks"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let mut current: Option<NodeId> = None;
        let mut moved = 0usize;

        for id in tree.children(tree.root()) {
            if tree.is_block(id) {
                current = Some(id);
            } else if let Some(block) = current {
                tree.append_child(block, id);
                moved += 1;
            }
        }

        debug!(moved, "indented paragraphs");
        Ok(())
    }
}
