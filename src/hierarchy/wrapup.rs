use super::*;

const LIST_PARENTS: [BlockKind; 4] = [
    BlockKind::Section,
    BlockKind::Subsection,
    BlockKind::Paragraph,
    BlockKind::Subparagraph,
];

fn is_list_entry(tree: &Tree, id: NodeId) -> bool {
    matches!(
        tree.kind(id),
        Some(BlockKind::Paragraph | BlockKind::Subparagraph)
    )
}

/// Moves the closing sentence of a list out of its last entry.
///
/// A PARAGRAPH or SUBPARAGRAPH holding exactly its own text plus one more
/// prose paragraph gives that trailing prose back to its parent block, as
/// long as it closes a run of entries of its own kind. A lone numbered
/// paragraph keeps its body.
pub struct DedentWrapUps;

impl DedentWrapUps {
    fn dedent(tree: &mut Tree, id: NodeId) -> usize {
        let mut moved = 0;
        for child in tree.children(id) {
            if tree.is_block(child) {
                moved += Self::dedent(tree, child);
            }
        }

        if !is_list_entry(tree, id) || tree.child_count(id) != 2 || tree.next_sibling(id).is_some()
        {
            return moved;
        }
        let parent_is_block = tree
            .parent(id)
            .map(|parent| tree.is_block(parent))
            .unwrap_or(false);
        let closes_run = tree
            .prev_sibling(id)
            .map(|prev| tree.kind(prev) == tree.kind(id))
            .unwrap_or(false);
        let Some(last) = tree.last_child(id) else {
            return moved;
        };
        if parent_is_block && closes_run && is_prose(tree, last) {
            tree.insert_after(id, last);
            moved += 1;
        }
        moved
    }
}

impl Stage for DedentWrapUps {
    fn name(&self) -> &str {
        "dedent-wrapups"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let root = tree.root();
        let mut moved = 0;
        for child in tree.children(root) {
            if tree.is_block(child) {
                moved += Self::dedent(tree, child);
            }
        }
        debug!(moved, "dedented wrap-up paragraphs");
        Ok(())
    }
}

/// Wraps list-shaped content that paragraph nesting could not resolve into an
/// explicit ITEMS block.
///
/// Applies when numbered entries repeat a number, or when prose runs of two or
/// more paragraphs sit between or before them. The introductory paragraph and
/// everything up to the last entry go into ITEMS; entries become ITEM, and
/// prose between entries joins the entry above it.
pub struct CoerceBlockLists;

impl CoerceBlockLists {
    fn needs_coercion(tree: &Tree, children: &[NodeId], last: usize) -> bool {
        let mut seen = HashSet::new();
        let duplicated = children
            .iter()
            .filter(|id| is_list_entry(tree, **id))
            .filter_map(|id| tree.block(*id).and_then(|block| block.num.clone()))
            .any(|num| !seen.insert(num));
        if duplicated {
            return true;
        }

        children[..last]
            .windows(2)
            .any(|pair| is_prose(tree, pair[0]) && is_prose(tree, pair[1]))
    }

    fn coerce(tree: &mut Tree, id: NodeId) -> bool {
        let children = tree.children(id);
        let entries = children
            .iter()
            .enumerate()
            .filter(|(_, child)| is_list_entry(tree, **child))
            .map(|(index, _)| index)
            .collect::<Vec<usize>>();
        let (Some(&first), Some(&last)) = (entries.first(), entries.last()) else {
            return false;
        };
        if !Self::needs_coercion(tree, &children, last) {
            return false;
        }

        let intro = first
            .checked_sub(1)
            .map(|index| children[index])
            .filter(|candidate| is_prose(tree, *candidate));

        let items = tree.new_block(Block::new(BlockKind::Items));
        tree.insert_before(intro.unwrap_or(children[first]), items);
        if let Some(intro) = intro {
            tree.append_child(items, intro);
        }

        let mut current_item: Option<NodeId> = None;
        for &child in &children[first..=last] {
            if is_list_entry(tree, child) {
                if let Some(block) = tree.block_mut(child) {
                    block.kind = BlockKind::Item;
                }
                tree.append_child(items, child);
                current_item = Some(child);
            } else if let Some(item) = current_item {
                tree.append_child(item, child);
            }
        }

        if let Some(item) = current_item {
            if tree.child_count(item) > 1 {
                if let Some(trailing) = tree.last_child(item).filter(|last| is_prose(tree, *last)) {
                    tree.insert_after(items, trailing);
                }
            }
        }
        true
    }
}

impl Stage for CoerceBlockLists {
    fn name(&self) -> &str {
        "coerce-block-lists"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let mut coerced = 0usize;
        for id in tree.descendants(tree.root()) {
            let is_candidate = tree
                .kind(id)
                .map(|kind| LIST_PARENTS.contains(&kind))
                .unwrap_or(false);
            if is_candidate && Self::coerce(tree, id) {
                coerced += 1;
            }
        }
        debug!(coerced, "coerced block lists");
        Ok(())
    }
}
