use super::*;

const MAX_HEADING_CHARS: usize = 80;

pub fn clean_num(raw: &str) -> (String, bool) {
    let trimmed = raw.trim();
    let (trimmed, stop) = match trimmed.strip_suffix('.') {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };
    let cleaned = trimmed
        .trim_end_matches([':', ';', '-', '–', '—'])
        .trim()
        .to_string();
    (cleaned, stop)
}

pub fn clean_heading(raw: &str) -> (String, bool) {
    let trimmed = raw
        .trim()
        .trim_start_matches(['-', '–', '—', ':'])
        .trim_start();
    match trimmed.strip_suffix('.') {
        Some(rest) => (rest.trim_end().to_string(), true),
        None => (trimmed.to_string(), false),
    }
}

pub fn is_plausible_heading(text: &str) -> bool {
    let text = text.trim();
    let Some(first) = text.chars().next() else {
        return false;
    };
    text.chars().count() <= MAX_HEADING_CHARS
        && !first.is_lowercase()
        && !text.ends_with(['-', '–', '—', ';', ':'])
}

pub(super) fn is_heading_candidate(paragraph: &Paragraph) -> bool {
    if paragraph.src.is_some() || paragraph.is_empty() {
        return false;
    }
    if paragraph.centered || paragraph.is_bold() {
        return true;
    }

    let text = paragraph.plain_text();
    let Some(first) = text.chars().next() else {
        return false;
    };
    text.chars().count() <= MAX_HEADING_CHARS
        && first.is_uppercase()
        && !text.ends_with(['.', ';', ':', ',', '-', '–', '—'])
}

pub(super) fn starts_lowercase(text: &str) -> bool {
    text.trim_start()
        .chars()
        .next()
        .map(char::is_lowercase)
        .unwrap_or(false)
}
