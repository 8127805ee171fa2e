use super::*;

use tracing::info;

/// Removes publisher headers, footers and page-number lines.
///
/// Text extracted with page breaks (`\x0c`) additionally loses the first and
/// last lines of each page when they are a bare number or repeat across three
/// or more pages. Elsewhere a bare number is kept, since it may be a section
/// number on a line of its own.
pub struct Boilerplate {
    line_patterns: Vec<Regex>,
    edge_number: Regex,
}

const PAGE_NUMBER_PATTERNS: &[&str] = &[
    r"^(?i:page)\s+\d{1,4}(?:\s+(?i:of)\s+\d{1,4})?$",
    r"^[-–]\s*\d{1,4}\s*[-–]$",
];

const ZA_PATTERNS: &[&str] = &[
    r"(?i)^(?:no\.\s*\d+\s+)?government\s+gazette(?:,.*)?$",
    r"(?i)^(?:\d+\s+)?government\s+gazette,?\s+\d{1,2}\s+[a-z]+\s+\d{4}(?:\s+no\.\s*\d+)?$",
    r"(?i)^(?:no\.\s*\d+\s+)?staatskoerant(?:,.*)?$",
    r"(?i)^this\s+gazette\s+is\s+also\s+available\s+free\s+online\s+at\b.*$",
    r"(?i)^.*\bwww\.gpwonline\.co\.za\b.*$",
    r"(?i)^printed\s+by\s+and\s+obtainable\s+from\s+the\s+government\s+printer\b.*$",
    r"(?i)^act\s+no\.\s*\d+\s+of\s+\d{4}\s+[a-z ,'()-]+\s+act,?\s+\d{4}$",
];

impl Boilerplate {
    pub fn generic() -> Result<Self> {
        Self::with_patterns(PAGE_NUMBER_PATTERNS.iter().copied())
    }

    pub fn za() -> Result<Self> {
        Self::with_patterns(PAGE_NUMBER_PATTERNS.iter().chain(ZA_PATTERNS).copied())
    }

    pub fn with_patterns<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let line_patterns = patterns
            .into_iter()
            .map(|pattern| compile("boilerplate line", pattern))
            .collect::<Result<Vec<Regex>>>()?;
        Ok(Self {
            line_patterns,
            edge_number: compile("page edge number", r"^\d{1,4}$")?,
        })
    }

    fn is_boilerplate(&self, line: &str) -> bool {
        let line = line.trim();
        !line.is_empty() && self.line_patterns.iter().any(|pattern| pattern.is_match(line))
    }

    fn strip_repeated_edges(&self, text: &str) -> (String, usize) {
        let pages = text.split('\x0c').collect::<Vec<&str>>();
        if pages.len() < 2 {
            return (text.to_string(), 0);
        }

        let (headers, footers) = if pages.len() >= 3 {
            (
                detect_repeated_edge_lines(&pages, true),
                detect_repeated_edge_lines(&pages, false),
            )
        } else {
            (HashSet::new(), HashSet::new())
        };
        let is_edge = |line: &str, repeated: &HashSet<String>| {
            self.edge_number.is_match(line.trim()) || repeated.contains(&normalize_edge_line(line))
        };
        let mut removed = 0usize;

        let cleaned = pages
            .iter()
            .map(|page| {
                let mut lines = page.lines().map(str::to_string).collect::<Vec<String>>();

                if let Some(index) = lines.iter().position(|line| !line.trim().is_empty()) {
                    if is_edge(lines[index].as_str(), &headers) {
                        lines.remove(index);
                        removed += 1;
                    }
                }
                if let Some(index) = lines.iter().rposition(|line| !line.trim().is_empty()) {
                    if is_edge(lines[index].as_str(), &footers) {
                        lines.remove(index);
                        removed += 1;
                    }
                }

                lines.join("\n")
            })
            .collect::<Vec<String>>()
            .join("\n");

        (cleaned, removed)
    }
}

impl TextRule for Boilerplate {
    fn name(&self) -> &'static str {
        "strip-boilerplate"
    }

    fn apply(&self, text: &str) -> String {
        let (text, edge_lines) = self.strip_repeated_edges(text);

        let mut pattern_lines = 0usize;
        let kept = text
            .split('\n')
            .filter(|line| {
                let drop = self.is_boilerplate(line);
                pattern_lines += usize::from(drop);
                !drop
            })
            .collect::<Vec<&str>>()
            .join("\n");

        if edge_lines + pattern_lines > 0 {
            info!(edge_lines, pattern_lines, "removed boilerplate lines");
        }
        kept
    }
}
