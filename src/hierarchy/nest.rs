use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rank {
    Never,
    High,
    Low(usize),
    Discovered,
}

const LOW_ORDER: [BlockKind; 6] = [
    BlockKind::Subpart,
    BlockKind::Article,
    BlockKind::Section,
    BlockKind::Subsection,
    BlockKind::Paragraph,
    BlockKind::Subparagraph,
];

fn rank(kind: BlockKind) -> Rank {
    match kind {
        BlockKind::Preface | BlockKind::Preamble => Rank::Never,
        BlockKind::Body
        | BlockKind::Schedule
        | BlockKind::Annexure
        | BlockKind::Appendix
        | BlockKind::Attachment => Rank::High,
        other => LOW_ORDER
            .iter()
            .position(|low| *low == other)
            .map(Rank::Low)
            .unwrap_or(Rank::Discovered),
    }
}

/// Folds sibling block markers into each other.
///
/// High-tier markers (BODY and attachments) swallow everything up to the next
/// high-tier marker. Between the rest, SUBPART > ARTICLE > SECTION >
/// SUBSECTION > PARAGRAPH > SUBPARAGRAPH is fixed, anything else outranks that
/// chain, and the relative order of the remaining kinds (PART, CHAPTER, ...)
/// is the order in which they first appear in the document.
pub struct NestBlocks;

impl NestBlocks {
    fn discovery_order(tree: &Tree) -> HashMap<BlockKind, usize> {
        let mut order = HashMap::new();
        for id in tree.descendants(tree.root()) {
            if let Some(kind) = tree.kind(id) {
                if rank(kind) == Rank::Discovered && !order.contains_key(&kind) {
                    let next = order.len();
                    order.insert(kind, next);
                }
            }
        }
        order
    }

    fn contains(outer: BlockKind, inner: BlockKind, order: &HashMap<BlockKind, usize>) -> bool {
        match (rank(outer), rank(inner)) {
            (Rank::Never, _) | (_, Rank::Never) | (_, Rank::High) => false,
            (Rank::High, _) => true,
            (Rank::Low(outer), Rank::Low(inner)) => outer < inner,
            (Rank::Discovered, Rank::Low(_)) => true,
            (Rank::Low(_), Rank::Discovered) => false,
            (Rank::Discovered, Rank::Discovered) => {
                match (order.get(&outer), order.get(&inner)) {
                    (Some(outer), Some(inner)) => outer < inner,
                    _ => false,
                }
            }
        }
    }

    fn nest_children(tree: &mut Tree, parent: NodeId, order: &HashMap<BlockKind, usize>) {
        let mut cursor = tree.first_child(parent);
        while let Some(current) = cursor {
            if let Some(outer) = tree.kind(current) {
                while let Some(next) = tree.next_sibling(current) {
                    let Some(inner) = tree.kind(next) else {
                        break;
                    };
                    if !Self::contains(outer, inner, order) {
                        break;
                    }
                    tree.append_child(current, next);
                }
                Self::nest_children(tree, current, order);
            }
            cursor = tree.next_sibling(current);
        }
    }
}

impl Stage for NestBlocks {
    fn name(&self) -> &str {
        "nest-blocks"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let order = Self::discovery_order(tree);
        let root = tree.root();
        Self::nest_children(tree, root, &order);
        debug!(
            discovered = ?order.keys().map(|kind| kind.as_str()).collect::<Vec<&str>>(),
            "nested blocks"
        );
        Ok(())
    }
}
