pub mod normalize;
pub mod parse;
pub mod stages;
pub mod toc;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use legistree::profiles::{self, DocumentKind};
use legistree::{
    Attachment, BlockKind, Context, FrbrUri, Locale, Pipeline, Registry, Tree, adapter,
};

use crate::cli::{InputFormat, LocaleArgs, ParseArgs};
use crate::model::{ParseRunLocale, ParseRunManifest, SourceHash};
use crate::util::{now_utc_string, read_file, sha256_bytes, utc_compact_string, write_json_pretty};

pub fn resolve_locale(args: &LocaleArgs) -> Result<(Option<FrbrUri>, Locale)> {
    let uri = args
        .frbr_uri
        .as_deref()
        .map(FrbrUri::parse)
        .transpose()
        .context("failed to parse --frbr-uri")?;
    let base = uri.as_ref().map(FrbrUri::locale).unwrap_or_default();

    let locale = Locale::new(
        args.country.as_deref().or(base.country.as_deref()),
        args.language.as_deref().or(base.language.as_deref()),
        args.locality.as_deref().or(base.locality.as_deref()),
    );
    Ok((uri, locale))
}

pub fn stage_list(
    registry: &Registry,
    kind: DocumentKind,
    format: InputFormat,
    locale: &Locale,
) -> Result<Vec<String>> {
    let mut stages = Vec::new();
    if format == InputFormat::Text {
        stages.extend(registry.pipeline_stages(profiles::NORMALISE, locale)?.iter().cloned());
        stages.push("text-to-paragraphs".to_string());
    }
    stages.extend(registry.pipeline_stages(kind.hierarchy(), locale)?.iter().cloned());
    Ok(stages)
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))
}

pub struct PreparedRun {
    pub started_ts: DateTime<Utc>,
    pub started_at: String,
    pub run_id: String,
    pub kind: DocumentKind,
    pub pipeline: Pipeline,
    pub stages: Vec<String>,
    pub source: SourceHash,
    pub attachments: Vec<SourceHash>,
}

pub fn prepare(registry: &Registry, args: &ParseArgs) -> Result<(PreparedRun, Context)> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let (uri, locale) = resolve_locale(&args.locale)?;
    let kind = DocumentKind::for_uri(uri.as_ref());

    let bytes = read_file(&args.input)?;
    let source = SourceHash {
        name: file_name(&args.input)?,
        bytes: bytes.len(),
        sha256: sha256_bytes(&bytes),
    };

    let (mut context, pipeline) = match args.format {
        InputFormat::Text => (
            Context::from_bytes(bytes)
                .with_context(|| format!("failed to read {}", args.input.display()))?,
            profiles::text_pipeline(registry, kind, &locale)?,
        ),
        InputFormat::Json => {
            let tree: Tree = adapter::paragraphs_from_json(&bytes)
                .with_context(|| format!("failed to read {}", args.input.display()))?;
            (
                Context::from_tree(tree),
                profiles::paragraph_pipeline(registry, kind, &locale)?,
            )
        }
    };
    if let Some(uri) = uri {
        context = context.with_frbr_uri(uri);
    }
    context = context.with_locale(locale.clone());
    context.fragment = args.fragment.clone();

    let mut attachments = Vec::with_capacity(args.attachments.len());
    for path in &args.attachments {
        let data = read_file(path)?;
        let name = file_name(path)?;
        attachments.push(SourceHash {
            name: name.clone(),
            bytes: data.len(),
            sha256: sha256_bytes(&data),
        });
        context.attachments.push(Attachment {
            name,
            mime_type: mime_type_for(path).to_string(),
            data,
        });
    }

    let stages = stage_list(registry, kind, args.format, &locale)?;
    info!(
        run_id = %run_id,
        input = %args.input.display(),
        pipeline = kind.as_str(),
        %locale,
        stages = stages.len(),
        "prepared parse run"
    );

    let run = PreparedRun {
        started_ts,
        started_at,
        run_id,
        kind,
        pipeline,
        stages,
        source,
        attachments,
    };
    Ok((run, context))
}

pub fn block_counts(tree: &Tree) -> BTreeMap<String, usize> {
    BlockKind::ALL
        .into_iter()
        .map(|kind| (kind.as_str().to_string(), tree.count_blocks(kind)))
        .filter(|(_, count)| *count > 0)
        .collect()
}

fn render_command(command: &str, args: &ParseArgs) -> String {
    let mut rendered = format!("legistree {command} {}", args.input.display());
    if let Some(uri) = &args.locale.frbr_uri {
        rendered.push_str(&format!(" --frbr-uri {uri}"));
    }
    if let Some(fragment) = &args.fragment {
        rendered.push_str(&format!(" --fragment {fragment}"));
    }
    if args.format == InputFormat::Json {
        rendered.push_str(" --format json");
    }
    rendered
}

pub fn write_manifest(
    command: &str,
    args: &ParseArgs,
    run: &PreparedRun,
    context: &Context,
    toc_entries: usize,
) -> Result<()> {
    let Some(path) = &args.manifest_path else {
        return Ok(());
    };

    let manifest = ParseRunManifest {
        manifest_version: 1,
        run_id: run.run_id.clone(),
        status: "completed".to_string(),
        started_at: run.started_at.clone(),
        completed_at: now_utc_string(),
        command: render_command(command, args),
        frbr_uri: context.frbr_uri.as_ref().map(FrbrUri::work_uri),
        fragment: context.fragment.clone(),
        locale: ParseRunLocale {
            country: context.locale.country.clone(),
            language: context.locale.language.clone(),
            locality: context.locale.locality.clone(),
        },
        pipeline: run.kind.as_str().to_string(),
        stages: run.stages.clone(),
        source: run.source.clone(),
        attachments: run.attachments.clone(),
        block_counts: block_counts(&context.tree),
        toc_entries,
    };

    write_json_pretty(path, &manifest)?;
    info!(
        path = %path.display(),
        started = %utc_compact_string(run.started_ts),
        "wrote parse run manifest"
    );
    Ok(())
}
