use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Preface,
    Preamble,
    Body,
    Part,
    Subpart,
    Article,
    Chapter,
    Section,
    Subsection,
    Paragraph,
    Subparagraph,
    Items,
    Item,
    Schedule,
    Annexure,
    Appendix,
    Attachment,
    DebateSection,
    Speech,
}

impl BlockKind {
    pub const ALL: [BlockKind; 19] = [
        BlockKind::Preface,
        BlockKind::Preamble,
        BlockKind::Body,
        BlockKind::Part,
        BlockKind::Subpart,
        BlockKind::Article,
        BlockKind::Chapter,
        BlockKind::Section,
        BlockKind::Subsection,
        BlockKind::Paragraph,
        BlockKind::Subparagraph,
        BlockKind::Items,
        BlockKind::Item,
        BlockKind::Schedule,
        BlockKind::Annexure,
        BlockKind::Appendix,
        BlockKind::Attachment,
        BlockKind::DebateSection,
        BlockKind::Speech,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Preface => "preface",
            BlockKind::Preamble => "preamble",
            BlockKind::Body => "body",
            BlockKind::Part => "part",
            BlockKind::Subpart => "subpart",
            BlockKind::Article => "article",
            BlockKind::Chapter => "chapter",
            BlockKind::Section => "section",
            BlockKind::Subsection => "subsection",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Subparagraph => "subparagraph",
            BlockKind::Items => "items",
            BlockKind::Item => "item",
            BlockKind::Schedule => "schedule",
            BlockKind::Annexure => "annexure",
            BlockKind::Appendix => "appendix",
            BlockKind::Attachment => "attachment",
            BlockKind::DebateSection => "debatesection",
            BlockKind::Speech => "speech",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_attachment(self) -> bool {
        matches!(
            self,
            BlockKind::Schedule | BlockKind::Annexure | BlockKind::Appendix | BlockKind::Attachment
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphRole {
    #[default]
    Prose,
    Remark,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub centered: bool,
    pub role: ParagraphRole,
    pub src: Option<String>,
}

impl Paragraph {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::plain(text)],
            ..Self::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run {
                text: text.into(),
                bold: true,
                italic: false,
            }],
            ..Self::default()
        }
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    pub fn plain_text(&self) -> String {
        let joined = self.runs.iter().map(|run| run.text.as_str()).collect::<String>();
        joined.trim().to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_none() && self.runs.iter().all(|run| run.text.trim().is_empty())
    }

    pub fn is_bold(&self) -> bool {
        let mut visible = self
            .runs
            .iter()
            .filter(|run| !run.text.trim().is_empty())
            .peekable();
        visible.peek().is_some() && visible.all(|run| run.bold)
    }

    /// Removes the first `len` bytes of [`Paragraph::plain_text`] across run
    /// boundaries, then trims leading whitespace from the first surviving
    /// run. Whitespace inside and between later runs is left untouched.
    pub fn consume_prefix(&mut self, len: usize) {
        // plain_text() trims leading whitespace, so skip it here too.
        let mut leading = true;
        let mut remaining = len;
        for run in &mut self.runs {
            if leading {
                let trimmed = run.text.trim_start();
                if trimmed.is_empty() {
                    run.text.clear();
                    continue;
                }
                run.text = trimmed.to_string();
                leading = false;
            }
            if remaining == 0 {
                break;
            }
            let take = remaining.min(run.text.len());
            let cut = floor_char_boundary(&run.text, take);
            run.text.replace_range(..cut, "");
            remaining -= cut;
            if cut < take {
                break;
            }
        }

        self.runs.retain(|run| !run.text.is_empty());
        if let Some(first) = self.runs.first_mut() {
            first.text = first.text.trim_start().to_string();
        }
        self.runs.retain(|run| !run.text.is_empty());
    }
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub num: Option<String>,
    pub num_stop_stripped: bool,
    pub heading: Option<String>,
    pub stop_stripped: bool,
    pub subheading: Option<String>,
    pub id: Option<String>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            num: None,
            num_stop_stripped: false,
            heading: None,
            stop_stripped: false,
            subheading: None,
            id: None,
        }
    }

    pub fn with_num(mut self, num: impl Into<String>) -> Self {
        self.num = Some(num.into());
        self
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Root,
    Paragraph(Paragraph),
    Block(Block),
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: Node::Root,
                parent: None,
                first_child: None,
                last_child: None,
                prev_sibling: None,
                next_sibling: None,
            }],
        }
    }

    pub fn from_paragraphs(paragraphs: impl IntoIterator<Item = Paragraph>) -> Self {
        let mut tree = Self::new();
        let root = tree.root();
        for paragraph in paragraphs {
            let id = tree.new_paragraph(paragraph);
            tree.append_child(root, id);
        }
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn add(&mut self, node: Node) -> NodeId {
        self.slots.push(Slot {
            node,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        });
        NodeId(self.slots.len() - 1)
    }

    pub fn new_paragraph(&mut self, paragraph: Paragraph) -> NodeId {
        self.add(Node::Paragraph(paragraph))
    }

    pub fn new_block(&mut self, block: Block) -> NodeId {
        self.add(Node::Block(block))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.slots[id.0].node
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.slots[id.0].node
    }

    pub fn block(&self, id: NodeId) -> Option<&Block> {
        match self.node(id) {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn block_mut(&mut self, id: NodeId) -> Option<&mut Block> {
        match self.node_mut(id) {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn paragraph(&self, id: NodeId) -> Option<&Paragraph> {
        match self.node(id) {
            Node::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    pub fn paragraph_mut(&mut self, id: NodeId) -> Option<&mut Paragraph> {
        match self.node_mut(id) {
            Node::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    pub fn kind(&self, id: NodeId) -> Option<BlockKind> {
        self.block(id).map(|block| block.kind)
    }

    pub fn is_block(&self, id: NodeId) -> bool {
        matches!(self.node(id), Node::Block(_))
    }

    pub fn is_paragraph(&self, id: NodeId) -> bool {
        matches!(self.node(id), Node::Paragraph(_))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].prev_sibling
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.first_child(id);
        while let Some(child) = cursor {
            out.push(child);
            cursor = self.next_sibling(child);
        }
        out
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut cursor = self.first_child(id);
        while let Some(child) = cursor {
            count += 1;
            cursor = self.next_sibling(child);
        }
        count
    }

    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = self.children(id);
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut children = self.children(next);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let slot = &self.slots[id.0];
            (slot.parent, slot.prev_sibling, slot.next_sibling)
        };

        if let Some(prev) = prev {
            self.slots[prev.0].next_sibling = next;
        } else if let Some(parent) = parent {
            self.slots[parent.0].first_child = next;
        }

        if let Some(next) = next {
            self.slots[next.0].prev_sibling = prev;
        } else if let Some(parent) = parent {
            self.slots[parent.0].last_child = prev;
        }

        let slot = &mut self.slots[id.0];
        slot.parent = None;
        slot.prev_sibling = None;
        slot.next_sibling = None;
    }

    pub fn append_child(&mut self, parent: NodeId, id: NodeId) {
        debug_assert!(parent != id && !self.is_ancestor(id, parent));
        self.detach(id);
        let last = self.slots[parent.0].last_child;
        {
            let slot = &mut self.slots[id.0];
            slot.parent = Some(parent);
            slot.prev_sibling = last;
        }
        match last {
            Some(last) => self.slots[last.0].next_sibling = Some(id),
            None => self.slots[parent.0].first_child = Some(id),
        }
        self.slots[parent.0].last_child = Some(id);
    }

    pub fn prepend_child(&mut self, parent: NodeId, id: NodeId) {
        match self.first_child(parent) {
            Some(first) => self.insert_before(first, id),
            None => self.append_child(parent, id),
        }
    }

    pub fn insert_before(&mut self, anchor: NodeId, id: NodeId) {
        debug_assert!(anchor != id && !self.is_ancestor(id, anchor));
        self.detach(id);
        let parent = self.parent(anchor);
        let prev = self.prev_sibling(anchor);
        {
            let slot = &mut self.slots[id.0];
            slot.parent = parent;
            slot.prev_sibling = prev;
            slot.next_sibling = Some(anchor);
        }
        self.slots[anchor.0].prev_sibling = Some(id);
        match prev {
            Some(prev) => self.slots[prev.0].next_sibling = Some(id),
            None => {
                if let Some(parent) = parent {
                    self.slots[parent.0].first_child = Some(id);
                }
            }
        }
    }

    pub fn insert_after(&mut self, anchor: NodeId, id: NodeId) {
        debug_assert!(anchor != id && !self.is_ancestor(id, anchor));
        self.detach(id);
        let parent = self.parent(anchor);
        let next = self.next_sibling(anchor);
        {
            let slot = &mut self.slots[id.0];
            slot.parent = parent;
            slot.prev_sibling = Some(anchor);
            slot.next_sibling = next;
        }
        self.slots[anchor.0].next_sibling = Some(id);
        match next {
            Some(next) => self.slots[next.0].prev_sibling = Some(id),
            None => {
                if let Some(parent) = parent {
                    self.slots[parent.0].last_child = Some(id);
                }
            }
        }
    }

    pub fn count_blocks(&self, kind: BlockKind) -> usize {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| self.kind(*id) == Some(kind))
            .count()
    }

    pub fn view(&self) -> Vec<NodeView> {
        self.children(self.root())
            .into_iter()
            .map(|id| self.view_of(id))
            .collect()
    }

    pub fn view_of(&self, id: NodeId) -> NodeView {
        match self.node(id) {
            Node::Root => NodeView::Block {
                kind: BlockKind::Body,
                num: None,
                num_stop_stripped: false,
                heading: None,
                stop_stripped: false,
                subheading: None,
                id: None,
                children: self.view(),
            },
            Node::Paragraph(paragraph) => NodeView::Paragraph {
                text: paragraph.plain_text(),
                bold: paragraph.is_bold(),
                centered: paragraph.centered,
                role: paragraph.role,
                src: paragraph.src.clone(),
            },
            Node::Block(block) => NodeView::Block {
                kind: block.kind,
                num: block.num.clone(),
                num_stop_stripped: block.num_stop_stripped,
                heading: block.heading.clone(),
                stop_stripped: block.stop_stripped,
                subheading: block.subheading.clone(),
                id: block.id.clone(),
                children: self
                    .children(id)
                    .into_iter()
                    .map(|child| self.view_of(child))
                    .collect(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeView {
    Paragraph {
        text: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        bold: bool,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        centered: bool,
        role: ParagraphRole,
        #[serde(skip_serializing_if = "Option::is_none")]
        src: Option<String>,
    },
    Block {
        kind: BlockKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        num: Option<String>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        num_stop_stripped: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        heading: Option<String>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        stop_stripped: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        subheading: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        children: Vec<NodeView>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tree: &Tree, parent: NodeId) -> Vec<String> {
        tree.children(parent)
            .into_iter()
            .filter_map(|id| tree.paragraph(id).map(Paragraph::plain_text))
            .collect()
    }

    #[test]
    fn sibling_links_survive_reparenting() {
        let mut tree = Tree::from_paragraphs(["a", "b", "c"].map(Paragraph::text));
        let root = tree.root();
        let children = tree.children(root);
        let block = tree.new_block(Block::new(BlockKind::Section));
        tree.insert_before(children[1], block);
        tree.append_child(block, children[1]);
        tree.append_child(block, children[2]);

        assert_eq!(tree.children(root), vec![children[0], block]);
        assert_eq!(texts(&tree, block), vec!["b", "c"]);
        assert_eq!(tree.prev_sibling(block), Some(children[0]));
        assert_eq!(tree.next_sibling(block), None);
        assert_eq!(tree.last_child(root), Some(block));
        assert_eq!(tree.parent(children[2]), Some(block));
    }

    #[test]
    fn insert_after_last_child_updates_parent_tail() {
        let mut tree = Tree::from_paragraphs(["a"].map(Paragraph::text));
        let root = tree.root();
        let first = tree.children(root)[0];
        let second = tree.new_paragraph(Paragraph::text("b"));
        tree.insert_after(first, second);
        assert_eq!(tree.last_child(root), Some(second));
        assert_eq!(texts(&tree, root), vec!["a", "b"]);

        tree.detach(first);
        assert_eq!(tree.first_child(root), Some(second));
        assert!(!tree.is_attached(first));
    }

    #[test]
    fn consume_prefix_spans_runs_and_trims() {
        let mut paragraph = Paragraph {
            runs: vec![Run::plain("  (1"), Run::plain(")  The "), Run::plain("Minister")],
            ..Paragraph::default()
        };
        paragraph.consume_prefix("(1)".len());
        assert_eq!(paragraph.plain_text(), "The Minister");
        assert_eq!(paragraph.runs.len(), 2);
    }

    #[test]
    fn bold_requires_every_visible_run() {
        let mut paragraph = Paragraph::bold("Heading");
        assert!(paragraph.is_bold());
        paragraph.runs.push(Run::plain(" tail"));
        assert!(!paragraph.is_bold());
        assert!(!Paragraph::text("").is_bold());
    }

    #[test]
    fn block_kind_names_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(BlockKind::from_name("nope"), None);
    }
}
