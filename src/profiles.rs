use tracing::info;

use crate::adapter::TextToParagraphs;
use crate::error::Result;
use crate::frbr::FrbrUri;
use crate::hierarchy::{
    AssignIds, CoerceBlockLists, DedentWrapUps, DemoteAttachmentSections, IdentifyAttachmentSubheadings,
    IdentifyAttachments, IdentifyKeywordBlocks, IdentifyParagraphs, IdentifyRemarks,
    IdentifySectionHeadings, IdentifySections, IdentifySpeeches, IdentifySubsections, IndentBlocks,
    MarkBody, MarkPreamble, MarkPreface, NestBlocks, NestParagraphs, NumberedParagraphsAgain,
    PromoteContainerHeadings, ValidateTree, WrapDebate,
};
use crate::normalize::{
    Boilerplate, Dehyphenate, LineBreaker, LineUnbreaker, Ligatures, Quotes, SubsectionNumbers,
    TextStage, Whitespace,
};
use crate::pipeline::{Pipeline, Stage, TraceHook};
use crate::registry::{Locale, Registry};
use crate::toc::TocBuilder;

pub const NORMALISE: &str = "normalise";
pub const HIERARCHY: &str = "hierarchicalize";
pub const DEBATE_HIERARCHY: &str = "hierarchicalize-debate";

pub const NORMALISE_STAGES: &[&str] = &[
    "normalise-quotes",
    "dehyphenate",
    "expand-ligatures",
    "normalise-whitespace",
    "clean-subsection-numbers",
    "strip-boilerplate",
    "unbreak-lines",
    "break-lines",
];

pub const HIERARCHY_STAGES: &[&str] = &[
    "identify-articles",
    "identify-parts",
    "identify-subparts",
    "identify-chapters",
    "identify-sections",
    "identify-subsections",
    "identify-paragraphs",
    "numbered-paragraphs-again",
    "identify-section-headings",
    "identify-attachments",
    "demote-attachment-sections",
    "mark-body",
    "mark-preamble",
    "mark-preface",
    "indent-blocks",
    "identify-attachment-subheadings",
    "nest-blocks",
    "promote-container-headings",
    "nest-paragraphs",
    "dedent-wrapups",
    "coerce-block-lists",
    "assign-ids",
    "validate-tree",
];

pub const DEBATE_STAGES: &[&str] = &[
    "identify-speeches",
    "identify-remarks",
    "mark-preface",
    "indent-blocks",
    "wrap-debate",
    "assign-ids",
    "validate-tree",
];

fn boxed<S: Stage + 'static>(stage: S) -> Result<Box<dyn Stage>> {
    Ok(Box::new(stage))
}

fn register_normalise_stages(registry: &mut Registry) {
    registry.register_stage("normalise-quotes", || boxed(TextStage::new(Quotes)));
    registry.register_stage("dehyphenate", || boxed(TextStage::new(Dehyphenate)));
    registry.register_stage("expand-ligatures", || boxed(TextStage::new(Ligatures)));
    registry.register_stage("normalise-whitespace", || boxed(TextStage::new(Whitespace)));
    registry.register_stage("clean-subsection-numbers", || {
        boxed(TextStage::new(SubsectionNumbers::new()?))
    });
    registry.register_stage("strip-boilerplate", || {
        boxed(TextStage::new(Boilerplate::generic()?))
    });
    registry.register_stage_for(Locale::country("za"), "strip-boilerplate", || {
        boxed(TextStage::new(Boilerplate::za()?))
    });
    registry.register_stage("unbreak-lines", || boxed(TextStage::new(LineUnbreaker::new()?)));
    registry.register_stage("break-lines", || boxed(TextStage::new(LineBreaker::new()?)));
    registry.register_stage("text-to-paragraphs", || boxed(TextToParagraphs));
}

fn register_hierarchy_stages(registry: &mut Registry) {
    registry.register_stage("identify-articles", || boxed(IdentifyKeywordBlocks::articles()?));
    registry.register_stage("identify-parts", || boxed(IdentifyKeywordBlocks::parts()?));
    registry.register_stage("identify-subparts", || boxed(IdentifyKeywordBlocks::subparts()?));
    registry.register_stage("identify-chapters", || boxed(IdentifyKeywordBlocks::chapters()?));
    registry.register_stage("identify-sections", || boxed(IdentifySections::new()?));
    registry.register_stage("identify-subsections", || boxed(IdentifySubsections::new()?));
    registry.register_stage("identify-paragraphs", || boxed(IdentifyParagraphs::new()?));
    registry.register_stage("numbered-paragraphs-again", || boxed(NumberedParagraphsAgain));
    registry.register_stage("identify-section-headings", || boxed(IdentifySectionHeadings));
    registry.register_stage("identify-attachments", || boxed(IdentifyAttachments::new()?));
    registry.register_stage("demote-attachment-sections", || boxed(DemoteAttachmentSections));
    registry.register_stage("mark-body", || boxed(MarkBody));
    registry.register_stage("mark-preamble", || boxed(MarkPreamble::new()?));
    registry.register_stage("mark-preface", || boxed(MarkPreface));
    registry.register_stage("indent-blocks", || boxed(IndentBlocks));
    registry.register_stage("identify-attachment-subheadings", || {
        boxed(IdentifyAttachmentSubheadings)
    });
    registry.register_stage("nest-blocks", || boxed(NestBlocks));
    registry.register_stage("promote-container-headings", || boxed(PromoteContainerHeadings));
    registry.register_stage("nest-paragraphs", || boxed(NestParagraphs));
    registry.register_stage("dedent-wrapups", || boxed(DedentWrapUps));
    registry.register_stage("coerce-block-lists", || boxed(CoerceBlockLists));
    registry.register_stage("assign-ids", || boxed(AssignIds));
    registry.register_stage("validate-tree", || boxed(ValidateTree));

    registry.register_stage("identify-speeches", || boxed(IdentifySpeeches::new()?));
    registry.register_stage("identify-remarks", || boxed(IdentifyRemarks::new()?));
    registry.register_stage("wrap-debate", || boxed(WrapDebate));
}

pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    register_normalise_stages(&mut registry);
    register_hierarchy_stages(&mut registry);

    registry.register_pipeline(Locale::any(), NORMALISE, NORMALISE_STAGES);
    registry.register_pipeline(Locale::any(), HIERARCHY, HIERARCHY_STAGES);
    registry.register_pipeline(Locale::any(), DEBATE_HIERARCHY, DEBATE_STAGES);

    registry.register_toc_builder(Locale::any(), TocBuilder::generic());
    registry.register_toc_builder(Locale::country("za"), TocBuilder::za());
    registry
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Act,
    Debate,
}

impl DocumentKind {
    pub fn for_uri(uri: Option<&FrbrUri>) -> Self {
        match uri {
            Some(uri) if uri.is_debate() => DocumentKind::Debate,
            _ => DocumentKind::Act,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Act => "act",
            DocumentKind::Debate => "debate",
        }
    }

    pub fn hierarchy(self) -> &'static str {
        match self {
            DocumentKind::Act => HIERARCHY,
            DocumentKind::Debate => DEBATE_HIERARCHY,
        }
    }
}

pub fn text_pipeline(registry: &Registry, kind: DocumentKind, locale: &Locale) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new(kind.as_str()).hook(TraceHook);
    pipeline.push(Box::new(registry.pipeline(NORMALISE, locale)?));
    pipeline.push(registry.stage("text-to-paragraphs", locale)?);
    pipeline.push(Box::new(registry.pipeline(kind.hierarchy(), locale)?));
    info!(pipeline = kind.as_str(), %locale, "assembled text pipeline");
    Ok(pipeline)
}

pub fn paragraph_pipeline(
    registry: &Registry,
    kind: DocumentKind,
    locale: &Locale,
) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new(kind.as_str()).hook(TraceHook);
    pipeline.push(Box::new(registry.pipeline(kind.hierarchy(), locale)?));
    Ok(pipeline)
}
