use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::debug;

use crate::error::{Result, compile};
use crate::pipeline::{Context, Stage};

mod boilerplate;
mod lines;

pub use boilerplate::Boilerplate;
pub use lines::{LineBreaker, LineUnbreaker};

pub trait TextRule {
    fn name(&self) -> &'static str;

    fn apply(&self, text: &str) -> String;
}

pub struct TextStage<R> {
    rule: R,
}

impl<R: TextRule> TextStage<R> {
    pub fn new(rule: R) -> Self {
        Self { rule }
    }
}

impl<R: TextRule> Stage for TextStage<R> {
    fn name(&self) -> &str {
        self.rule.name()
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let before = context.text.len();
        context.text = self.rule.apply(&context.text);
        debug!(
            rule = self.rule.name(),
            before,
            after = context.text.len(),
            "normalised text"
        );
        Ok(())
    }
}

const QUOTE_FORMS: [&str; 8] = ["‘‘", "’’", "``", "''", "‟", "“", "”", "„"];

pub fn normalise_quotes(text: &str) -> String {
    let mut out = text.to_string();
    for form in QUOTE_FORMS {
        if out.contains(form) {
            out = out.replace(form, "\"");
        }
    }
    out
}

pub fn expand_ligatures(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            'ﬁ' => out.push_str("fi"),
            'ﬂ' => out.push_str("fl"),
            'ﬀ' => out.push_str("ff"),
            'ﬃ' => out.push_str("ffi"),
            'ﬄ' => out.push_str("ffl"),
            'ﬆ' | 'ﬅ' => out.push_str("st"),
            'ı' => out.push('i'),
            other => out.push(other),
        }
    }
    out
}

fn is_horizontal_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{a0}' | '\u{2009}' | '\u{202f}')
}

pub fn normalise_whitespace(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let mut out = String::with_capacity(line.len());
            let mut pending_space = false;
            for ch in line.trim_end_matches('\r').chars() {
                if is_horizontal_space(ch) {
                    pending_space = !out.is_empty() && !out.ends_with('\x0c');
                    continue;
                }
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(ch);
            }
            out
        })
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn dehyphenate(text: &str) -> String {
    let (lines, merges) = merge_hyphenated_lines(text.split('\n'));
    if merges > 0 {
        debug!(merges, "dehyphenated line breaks");
    }
    lines.join("\n")
}

fn merge_hyphenated_lines<'a>(lines: impl Iterator<Item = &'a str>) -> (Vec<String>, usize) {
    let mut merged = Vec::<String>::new();
    let mut merges = 0usize;

    for line in lines {
        if let Some(previous) = merged.last_mut() {
            if should_merge_hyphenated_pair(previous, line) {
                let kept = previous.trim_end().trim_end_matches('-').len();
                previous.truncate(kept);
                previous.push_str(line.trim_start());
                merges += 1;
                continue;
            }
        }
        merged.push(line.to_string());
    }

    (merged, merges)
}

fn should_merge_hyphenated_pair(current: &str, next: &str) -> bool {
    let left = current.trim_end();
    if !left.ends_with('-') || left.ends_with("--") {
        return false;
    }

    let starts_with_lowercase = next
        .trim_start()
        .chars()
        .next()
        .map(char::is_lowercase)
        .unwrap_or(false);
    if !starts_with_lowercase {
        return false;
    }

    left.trim_end_matches('-')
        .chars()
        .last()
        .map(char::is_lowercase)
        .unwrap_or(false)
}

pub struct Quotes;

impl TextRule for Quotes {
    fn name(&self) -> &'static str {
        "normalise-quotes"
    }

    fn apply(&self, text: &str) -> String {
        normalise_quotes(text)
    }
}

pub struct Dehyphenate;

impl TextRule for Dehyphenate {
    fn name(&self) -> &'static str {
        "dehyphenate"
    }

    fn apply(&self, text: &str) -> String {
        dehyphenate(text)
    }
}

pub struct Ligatures;

impl TextRule for Ligatures {
    fn name(&self) -> &'static str {
        "expand-ligatures"
    }

    fn apply(&self, text: &str) -> String {
        expand_ligatures(text)
    }
}

pub struct Whitespace;

impl TextRule for Whitespace {
    fn name(&self) -> &'static str {
        "normalise-whitespace"
    }

    fn apply(&self, text: &str) -> String {
        normalise_whitespace(text)
    }
}

pub struct SubsectionNumbers {
    pattern: Regex,
}

impl SubsectionNumbers {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile("subsection number spacing", r"\([ \t]*([a-zA-Z0-9]{1,4})[ \t]*\)")?,
        })
    }
}

impl TextRule for SubsectionNumbers {
    fn name(&self) -> &'static str {
        "clean-subsection-numbers"
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, "($1)").into_owned()
    }
}

fn detect_repeated_edge_lines(pages: &[&str], header: bool) -> HashSet<String> {
    let mut counts = HashMap::<String, usize>::new();
    for page in pages {
        let lines = page.lines().map(str::trim).collect::<Vec<&str>>();
        let candidate = if header {
            lines.iter().copied().find(|line| !line.is_empty())
        } else {
            lines.iter().rev().copied().find(|line| !line.is_empty())
        };

        let Some(candidate) = candidate else {
            continue;
        };

        let normalized = normalize_edge_line(candidate);
        if normalized.is_empty() || normalized.len() > 120 {
            continue;
        }
        *counts.entry(normalized).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter_map(|(candidate, count)| if count >= 3 { Some(candidate) } else { None })
        .collect()
}

fn normalize_edge_line(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_ascii_lowercase()
}
