use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SourceHash {
    pub name: String,
    pub bytes: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseRunLocale {
    pub country: Option<String>,
    pub language: Option<String>,
    pub locality: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub completed_at: String,
    pub command: String,
    pub frbr_uri: Option<String>,
    pub fragment: Option<String>,
    pub locale: ParseRunLocale,
    pub pipeline: String,
    pub stages: Vec<String>,
    pub source: SourceHash,
    pub attachments: Vec<SourceHash>,
    pub block_counts: BTreeMap<String, usize>,
    pub toc_entries: usize,
}
