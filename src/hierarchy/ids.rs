use super::*;

/// Assigns hierarchical identifiers such as `chp_2__sec_3__subsec_1`.
///
/// The main document and every attachment are separate components, each with
/// its own uniqueness scope. BODY is transparent; blocks without a number use
/// `nn_<n>` counted among their same-kind siblings. Collisions inside a
/// component get `_2`, `_3`... suffixes. Reassigning from scratch makes the
/// stage idempotent.
pub struct AssignIds;

fn prefix(kind: BlockKind) -> Option<&'static str> {
    Some(match kind {
        BlockKind::Body => return None,
        BlockKind::Preface => "preface",
        BlockKind::Preamble => "preamble",
        BlockKind::Part => "part",
        BlockKind::Subpart => "subpart",
        BlockKind::Article => "art",
        BlockKind::Chapter => "chp",
        BlockKind::Section => "sec",
        BlockKind::Subsection => "subsec",
        BlockKind::Paragraph => "para",
        BlockKind::Subparagraph => "subpara",
        BlockKind::Items => "list",
        BlockKind::Item => "item",
        BlockKind::Schedule | BlockKind::Annexure | BlockKind::Appendix | BlockKind::Attachment => {
            "att"
        }
        BlockKind::DebateSection => "dbsect",
        BlockKind::Speech => "speech",
    })
}

fn sanitize_num_for_id(num: &str) -> String {
    let mut out = String::with_capacity(num.len());
    for ch in num.chars() {
        if ch.is_ascii_alphanumeric() || ch == '.' {
            out.push(ch);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches(['-', '.']).to_string()
}

struct Scope {
    seen: HashSet<String>,
}

impl Scope {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    fn claim(&mut self, base: String) -> String {
        if self.seen.insert(base.clone()) {
            return base;
        }
        let mut suffix = 2usize;
        loop {
            let candidate = format!("{base}_{suffix}");
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

impl AssignIds {
    fn assign(tree: &mut Tree, parent: NodeId, parent_id: Option<&str>, scope: &mut Scope) -> usize {
        let mut assigned = 0usize;
        let mut unnumbered = HashMap::<BlockKind, usize>::new();
        let mut attachments = 0usize;

        for child in tree.children(parent) {
            let Some(block) = tree.block(child) else {
                continue;
            };
            let kind = block.kind;

            let Some(prefix) = prefix(kind) else {
                if let Some(block) = tree.block_mut(child) {
                    block.id = None;
                }
                assigned += Self::assign(tree, child, parent_id, scope);
                continue;
            };

            if kind.is_attachment() {
                attachments += 1;
                let id = scope.claim(format!("{prefix}_{attachments}"));
                if let Some(block) = tree.block_mut(child) {
                    block.id = Some(id.clone());
                }
                let mut component = Scope::new();
                assigned += 1 + Self::assign(tree, child, Some(&id), &mut component);
                continue;
            }

            let token = match kind {
                BlockKind::Preface | BlockKind::Preamble => None,
                _ => Some(
                    block
                        .num
                        .as_deref()
                        .map(sanitize_num_for_id)
                        .filter(|token| !token.is_empty())
                        .unwrap_or_else(|| {
                            let count = unnumbered.entry(kind).or_insert(0);
                            *count += 1;
                            format!("nn_{count}")
                        }),
                ),
            };
            let local = match token {
                Some(token) => format!("{prefix}_{token}"),
                None => prefix.to_string(),
            };
            let base = match parent_id {
                Some(parent_id) => format!("{parent_id}__{local}"),
                None => local,
            };

            let id = scope.claim(base);
            if let Some(block) = tree.block_mut(child) {
                block.id = Some(id.clone());
            }
            assigned += 1 + Self::assign(tree, child, Some(&id), scope);
        }

        assigned
    }
}

impl Stage for AssignIds {
    fn name(&self) -> &str {
        "assign-ids"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let root = tree.root();
        let assigned = Self::assign(tree, root, None, &mut Scope::new());
        debug!(assigned, "assigned block ids");
        Ok(())
    }
}
