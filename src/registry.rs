//! Locale-keyed plugin registry.
//!
//! Components are registered against a `(country, language, locality)` key in
//! which `None` is a wildcard. Lookup keeps only the keys compatible with the
//! requested locale and picks the highest lexicographic score, where an exact
//! component outranks a wildcard. On equal scores the later registration wins,
//! so a profile can override a built-in by registering after it.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::pipeline::{Pipeline, Stage, TraceHook};
use crate::toc::TocBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Locale {
    pub country: Option<String>,
    pub language: Option<String>,
    pub locality: Option<String>,
}

impl Locale {
    pub fn new(country: Option<&str>, language: Option<&str>, locality: Option<&str>) -> Self {
        let clean = |value: Option<&str>| {
            value
                .map(|value| value.trim().to_ascii_lowercase())
                .filter(|value| !value.is_empty())
        };
        Self {
            country: clean(country),
            language: clean(language),
            locality: clean(locality),
        }
    }

    pub fn any() -> Self {
        Self::default()
    }

    pub fn country(country: &str) -> Self {
        Self::new(Some(country), None, None)
    }

    fn score(&self, requested: &Locale) -> Option<[u8; 3]> {
        fn component(key: &Option<String>, wanted: &Option<String>) -> Option<u8> {
            match (key, wanted) {
                (None, _) => Some(0),
                (Some(key), Some(wanted)) if key == wanted => Some(1),
                _ => None,
            }
        }

        Some([
            component(&self.country, &requested.country)?,
            component(&self.language, &requested.language)?,
            component(&self.locality, &requested.locality)?,
        ])
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |value: &Option<String>| value.clone().unwrap_or_else(|| "*".to_string());
        write!(
            f,
            "({}, {}, {})",
            part(&self.country),
            part(&self.language),
            part(&self.locality)
        )
    }
}

pub type StageFactory = Arc<dyn Fn() -> Result<Box<dyn Stage>> + Send + Sync>;

struct Entry<T> {
    locale: Locale,
    name: String,
    value: T,
}

fn best_match<'a, T>(entries: &'a [Entry<T>], name: &str, locale: &Locale) -> Option<&'a T> {
    let mut best: Option<([u8; 3], &T)> = None;
    for entry in entries.iter().filter(|entry| entry.name == name) {
        let Some(score) = entry.locale.score(locale) else {
            continue;
        };
        if best.map(|(current, _)| score >= current).unwrap_or(true) {
            best = Some((score, &entry.value));
        }
    }
    best.map(|(_, value)| value)
}

#[derive(Default)]
pub struct Registry {
    stages: Vec<Entry<StageFactory>>,
    toc_builders: Vec<Entry<Arc<TocBuilder>>>,
    pipelines: Vec<Entry<Vec<String>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_stage<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Result<Box<dyn Stage>> + Send + Sync + 'static,
    {
        self.register_stage_for(Locale::any(), name, factory);
    }

    pub fn register_stage_for<F>(&mut self, locale: Locale, name: &str, factory: F)
    where
        F: Fn() -> Result<Box<dyn Stage>> + Send + Sync + 'static,
    {
        self.stages.push(Entry {
            locale,
            name: name.to_string(),
            value: Arc::new(factory),
        });
    }

    pub fn register_toc_builder(&mut self, locale: Locale, builder: TocBuilder) {
        self.toc_builders.push(Entry {
            locale,
            name: String::new(),
            value: Arc::new(builder),
        });
    }

    pub fn register_pipeline(&mut self, locale: Locale, name: &str, stages: &[&str]) {
        self.pipelines.push(Entry {
            locale,
            name: name.to_string(),
            value: stages.iter().map(|stage| stage.to_string()).collect(),
        });
    }

    pub fn stage(&self, name: &str, locale: &Locale) -> Result<Box<dyn Stage>> {
        let factory =
            best_match(&self.stages, name, locale).ok_or_else(|| Error::PluginLookupFailure {
                what: "stage",
                name: name.to_string(),
                locale: locale.to_string(),
            })?;
        factory()
    }

    pub fn toc_builder(&self, locale: &Locale) -> Result<Arc<TocBuilder>> {
        best_match(&self.toc_builders, "", locale)
            .cloned()
            .ok_or_else(|| Error::PluginLookupFailure {
                what: "toc builder",
                name: "toc".to_string(),
                locale: locale.to_string(),
            })
    }

    pub fn pipeline_stages(&self, name: &str, locale: &Locale) -> Result<&[String]> {
        best_match(&self.pipelines, name, locale)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::PluginLookupFailure {
                what: "pipeline",
                name: name.to_string(),
                locale: locale.to_string(),
            })
    }

    pub fn pipeline(&self, name: &str, locale: &Locale) -> Result<Pipeline> {
        let mut pipeline = Pipeline::new(name).hook(TraceHook);
        for stage in self.pipeline_stages(name, locale)? {
            pipeline.push(self.stage(stage, locale)?);
        }
        Ok(pipeline)
    }

    pub fn stage_names(&self) -> Vec<&str> {
        let mut names = self
            .stages
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<&str>>();
        names.sort_unstable();
        names.dedup();
        names
    }
}
