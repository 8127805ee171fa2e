use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::registry::{Locale, Registry};
use crate::tree::{BlockKind, NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocElement {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    pub heading: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcomponent: Option<String>,
    pub children: Vec<TocElement>,
}

impl TocElement {
    pub fn walk(&self) -> Vec<&TocElement> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

pub type TitleFn = fn(BlockKind, Option<&str>, Option<&str>) -> String;

pub struct TocBuilder {
    kinds: Vec<BlockKind>,
    non_unique: Vec<BlockKind>,
    title: TitleFn,
}

const MAIN_COMPONENT: &str = "main";

fn label(kind: BlockKind) -> String {
    let name = kind.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn synthesized_heading(kind: BlockKind, num: Option<&str>) -> String {
    match num {
        Some(num) => format!("{} {num}", label(kind)),
        None => label(kind),
    }
}

pub fn generic_title(kind: BlockKind, num: Option<&str>, heading: Option<&str>) -> String {
    let mut title = synthesized_heading(kind, num);
    if let Some(heading) = heading.filter(|heading| !heading.is_empty()) {
        title.push_str(" - ");
        title.push_str(heading);
    }
    title
}

pub fn za_title(kind: BlockKind, num: Option<&str>, heading: Option<&str>) -> String {
    match (kind, num, heading) {
        (BlockKind::Section, Some(num), Some(heading)) => format!("{num}. {heading}"),
        _ => generic_title(kind, num, heading),
    }
}

impl TocBuilder {
    pub fn new(kinds: &[BlockKind], non_unique: &[BlockKind], title: TitleFn) -> Self {
        Self {
            kinds: kinds.to_vec(),
            non_unique: non_unique.to_vec(),
            title,
        }
    }

    pub fn generic() -> Self {
        Self::new(
            &[
                BlockKind::Preface,
                BlockKind::Preamble,
                BlockKind::Part,
                BlockKind::Subpart,
                BlockKind::Chapter,
                BlockKind::Article,
                BlockKind::Section,
            ],
            &[BlockKind::Part, BlockKind::Subpart, BlockKind::Chapter],
            generic_title,
        )
    }

    pub fn za() -> Self {
        Self::new(
            &[
                BlockKind::Preface,
                BlockKind::Preamble,
                BlockKind::Part,
                BlockKind::Chapter,
                BlockKind::Section,
            ],
            &[BlockKind::Part, BlockKind::Chapter],
            za_title,
        )
    }

    pub fn build(&self, tree: &Tree) -> Vec<TocElement> {
        let mut attachments = HashMap::new();
        let elements = self.walk(tree, tree.root(), MAIN_COMPONENT, None, &mut attachments);
        debug!(
            top_level = elements.len(),
            attachments = attachments.values().sum::<usize>(),
            "built table of contents"
        );
        elements
    }

    fn walk(
        &self,
        tree: &Tree,
        parent: NodeId,
        component: &str,
        parent_path: Option<&str>,
        attachments: &mut HashMap<BlockKind, usize>,
    ) -> Vec<TocElement> {
        let mut out = Vec::new();
        for child in tree.children(parent) {
            let Some(block) = tree.block(child) else {
                continue;
            };
            let kind = block.kind;

            if kind.is_attachment() {
                let count = attachments.entry(kind).or_insert(0);
                *count += 1;
                let name = format!("{}{count}", kind.as_str());
                let children = self.walk(tree, child, &name, None, attachments);
                let heading = block
                    .heading
                    .clone()
                    .unwrap_or_else(|| synthesized_heading(kind, block.num.as_deref()));
                out.push(TocElement {
                    kind,
                    num: block.num.clone(),
                    title: attachment_title(&heading, block.subheading.as_deref()),
                    heading,
                    id: block.id.clone(),
                    component: name,
                    subcomponent: None,
                    children,
                });
                continue;
            }

            if !self.kinds.contains(&kind) {
                out.extend(self.walk(tree, child, component, parent_path, attachments));
                continue;
            }

            let segment = match block.num.as_deref() {
                Some(num) => format!("{}/{num}", kind.as_str()),
                None => kind.as_str().to_string(),
            };
            let path = match parent_path {
                Some(parent_path) if self.non_unique.contains(&kind) => {
                    format!("{parent_path}/{segment}")
                }
                _ => segment,
            };

            let children = self.walk(tree, child, component, Some(&path), attachments);
            out.push(TocElement {
                kind,
                num: block.num.clone(),
                heading: block
                    .heading
                    .clone()
                    .unwrap_or_else(|| synthesized_heading(kind, block.num.as_deref())),
                title: (self.title)(kind, block.num.as_deref(), block.heading.as_deref()),
                id: block.id.clone(),
                component: component.to_string(),
                subcomponent: Some(path),
                children,
            });
        }
        out
    }
}

fn attachment_title(heading: &str, subheading: Option<&str>) -> String {
    match subheading.filter(|subheading| !subheading.is_empty()) {
        Some(subheading) => format!("{heading} - {subheading}"),
        None => heading.to_string(),
    }
}

pub fn build_toc(registry: &Registry, tree: &Tree, locale: &Locale) -> Result<Vec<TocElement>> {
    let builder = registry.toc_builder(locale)?;
    Ok(builder.build(tree))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn za_titles_follow_section_conventions() {
        assert_eq!(
            za_title(BlockKind::Chapter, Some("5"), Some("Taxation")),
            "Chapter 5 - Taxation"
        );
        assert_eq!(
            za_title(BlockKind::Section, Some("3"), Some("Definitions")),
            "3. Definitions"
        );
        assert_eq!(za_title(BlockKind::Section, Some("3"), None), "Section 3");
        assert_eq!(za_title(BlockKind::Preface, None, None), "Preface");
    }

    #[test]
    fn attachment_titles_join_subheading() {
        assert_eq!(
            attachment_title("FIRST ANNEX", Some("(Section 5)")),
            "FIRST ANNEX - (Section 5)"
        );
        assert_eq!(attachment_title("Schedule 1", None), "Schedule 1");
    }
}
