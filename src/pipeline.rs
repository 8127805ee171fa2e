use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::frbr::FrbrUri;
use crate::registry::Locale;
use crate::tree::Tree;

pub trait Stage {
    fn name(&self) -> &str;

    fn apply(&self, context: &mut Context) -> Result<()>;
}

#[derive(Debug, Clone)]
pub enum Source {
    Text(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct Context {
    pub source: Source,
    pub text: String,
    pub tree: Tree,
    pub frbr_uri: Option<FrbrUri>,
    pub fragment: Option<String>,
    pub attachments: Vec<Attachment>,
    pub locale: Locale,
    cancel: CancelToken,
}

impl Context {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let text = String::from_utf8(bytes.clone())
            .map_err(|err| Error::InvalidInput(format!("source is not valid UTF-8: {err}")))?;
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("source is empty".to_string()));
        }

        let mut context = Self::from_text(text);
        context.source = Source::Bytes(bytes);
        Ok(context)
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            source: Source::Text(text.clone()),
            text,
            tree: Tree::new(),
            frbr_uri: None,
            fragment: None,
            attachments: Vec::new(),
            locale: Locale::any(),
            cancel: CancelToken::new(),
        }
    }

    pub fn from_tree(tree: Tree) -> Self {
        let mut context = Self::from_text(String::new());
        context.tree = tree;
        context
    }

    pub fn with_frbr_uri(mut self, uri: FrbrUri) -> Self {
        self.locale = uri.locale();
        self.frbr_uri = Some(uri);
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|item| item.name == name)
    }
}

pub trait StageHook {
    fn before(&self, _stage: &str, _context: &Context) {}

    fn after(&self, _stage: &str, _context: &Context) {}
}

pub struct TraceHook;

impl StageHook for TraceHook {
    fn after(&self, stage: &str, context: &Context) {
        let root = context.tree.root();
        debug!(
            stage = %stage,
            top_level = context.tree.child_count(root),
            nodes = context.tree.descendants(root).len(),
            text_len = context.text.len(),
            "stage finished"
        );
    }
}

pub struct Pipeline {
    name: String,
    stages: Vec<Box<dyn Stage>>,
    hooks: Vec<Box<dyn StageHook>>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            hooks: Vec::new(),
        }
    }

    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push(&mut self, stage: Box<dyn Stage>) {
        self.stages.push(stage);
    }

    pub fn hook(mut self, hook: impl StageHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Stage for Pipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        for stage in &self.stages {
            if context.cancel.is_cancelled() {
                return Err(Error::Cancelled {
                    stage: stage.name().to_string(),
                });
            }

            for hook in &self.hooks {
                hook.before(stage.name(), context);
            }

            let started = Instant::now();
            stage.apply(context)?;
            debug!(
                pipeline = %self.name,
                stage = %stage.name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "applied stage"
            );

            for hook in &self.hooks {
                hook.after(stage.name(), context);
            }
        }

        Ok(())
    }
}

pub fn run_pipeline(pipeline: &Pipeline, mut context: Context) -> Result<Context> {
    info!(pipeline = %pipeline.name(), stages = pipeline.len(), "running pipeline");
    pipeline.apply(&mut context)?;
    Ok(context)
}

pub struct FnStage<F> {
    name: &'static str,
    func: F,
}

impl<F> FnStage<F>
where
    F: Fn(&mut Context) -> Result<()>,
{
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Stage for FnStage<F>
where
    F: Fn(&mut Context) -> Result<()>,
{
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        (self.func)(context)
    }
}
