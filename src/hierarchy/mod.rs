//! Hierarchicalization stages.
//!
//! Recognisers turn top-level paragraphs into typed block markers; the
//! indenter, nester and paragraph-list nester then fold the flat sequence
//! into a tree. Recognisers always iterate a snapshot of the container's
//! children and mutate through the tree interface, so a paragraph consumed by
//! an earlier step of the same pass is skipped via [`Tree::is_attached`].

use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result, compile};
use crate::pipeline::{Context, Stage};
use crate::tree::{Block, BlockKind, NodeId, Paragraph, ParagraphRole, Tree};

mod attachments;
mod cleaning;
mod debate;
mod ids;
mod indent;
mod keywords;
mod markers;
mod nest;
mod numbered;
mod paragraphs;
mod sections;
#[cfg(test)]
mod tests;
mod validate;
mod wrapup;

pub use attachments::{DemoteAttachmentSections, IdentifyAttachmentSubheadings, IdentifyAttachments};
pub use cleaning::{clean_heading, clean_num, is_plausible_heading};
pub use debate::{IdentifyRemarks, IdentifySpeeches, WrapDebate};
pub use ids::AssignIds;
pub use indent::IndentBlocks;
pub use keywords::IdentifyKeywordBlocks;
pub use markers::{MarkBody, MarkPreamble, MarkPreface, PromoteContainerHeadings};
pub use nest::NestBlocks;
pub use numbered::{IdentifyParagraphs, IdentifySubsections};
pub use paragraphs::{NestParagraphs, NumberingFormat, classify_num};
pub use sections::{IdentifySectionHeadings, IdentifySections, NumberedParagraphsAgain};
pub use validate::ValidateTree;
pub use wrapup::{CoerceBlockLists, DedentWrapUps};

use cleaning::*;

fn top_level_paragraphs(tree: &Tree) -> Vec<NodeId> {
    tree.children(tree.root())
        .into_iter()
        .filter(|id| tree.is_paragraph(*id))
        .collect()
}

fn paragraph_text(tree: &Tree, id: NodeId) -> Option<String> {
    tree.paragraph(id).map(Paragraph::plain_text)
}

fn is_prose(tree: &Tree, id: NodeId) -> bool {
    tree.paragraph(id)
        .map(|paragraph| paragraph.role == ParagraphRole::Prose && paragraph.src.is_none())
        .unwrap_or(false)
}

fn replace_with_block(tree: &mut Tree, id: NodeId, block: Block) -> NodeId {
    let marker = tree.new_block(block);
    tree.insert_before(id, marker);
    tree.detach(id);
    marker
}

fn precede_with_block(tree: &mut Tree, id: NodeId, block: Block, consumed: usize) -> NodeId {
    let marker = tree.new_block(block);
    tree.insert_before(id, marker);
    let emptied = match tree.paragraph_mut(id) {
        Some(paragraph) => {
            paragraph.consume_prefix(consumed);
            paragraph.is_empty()
        }
        None => false,
    };
    if emptied {
        tree.detach(id);
    }
    marker
}

fn note_ambiguous(what: &str, fragment: &str) {
    let err = Error::Ambiguous {
        what: what.to_string(),
        fragment: fragment.to_string(),
    };
    warn!(error = %err, "treating fragment as prose");
}

fn count_kinds(tree: &Tree) -> HashMap<BlockKind, usize> {
    let mut counts = HashMap::new();
    for id in tree.descendants(tree.root()) {
        if let Some(kind) = tree.kind(id) {
            *counts.entry(kind).or_insert(0) += 1;
        }
    }
    counts
}
