use super::*;

const STRUCTURAL_START: &str = r"(?x)
    ^(?:
        \(\s*[a-zA-Z0-9]{1,4}\s*\)
      | \d{1,4}[a-zA-Z]{0,2}(?:\.\d{1,3}[a-zA-Z]{0,2})*\.?(?:\s|$)
      | (?i:part|chapter|article|subpart|schedule|annexure|annex|appendix|attachment|preamble)\b
    )";

pub struct LineUnbreaker {
    structural: Regex,
    year: Regex,
}

impl LineUnbreaker {
    pub fn new() -> Result<Self> {
        Ok(Self {
            structural: compile("structural line start", STRUCTURAL_START)?,
            year: compile("leading year", r"^\d{4}(?:[\s,;:)]|$)")?,
        })
    }

    fn can_join(&self, previous: &str, next: &str) -> bool {
        let previous = previous.trim_end();
        let next = next.trim_start_matches(|ch: char| ch.is_whitespace());

        let Some(last) = previous.chars().last() else {
            return false;
        };
        if !(last.is_lowercase() || last.is_ascii_digit() || matches!(last, ',' | '-' | ')')) {
            return false;
        }

        let Some(first) = next.chars().next() else {
            return false;
        };
        if self.year.is_match(next) {
            return true;
        }
        if self.structural.is_match(next) {
            return false;
        }

        first.is_lowercase() || first == '0' || first.is_uppercase()
    }
}

impl TextRule for LineUnbreaker {
    fn name(&self) -> &'static str {
        "unbreak-lines"
    }

    fn apply(&self, text: &str) -> String {
        let mut lines = Vec::<String>::new();
        for line in text.split('\n') {
            if let Some(previous) = lines.last_mut() {
                if self.can_join(previous, line) {
                    let next = line.trim_start_matches(|ch: char| ch.is_whitespace());
                    if !previous.ends_with('-') {
                        previous.push(' ');
                    }
                    previous.push_str(next);
                    continue;
                }
            }
            lines.push(line.to_string());
        }
        lines.join("\n")
    }
}

pub struct LineBreaker {
    rules: Vec<(Regex, &'static str)>,
}

const BREAK_RULES: &[(&str, &str)] = &[
    // ". New title 62. (1) For the purpose"
    (
        r"([.;:])[ \t]+([A-Z][A-Za-z ,'’-]{0,80}?)[ \t]+(\d{1,4}[A-Za-z]{0,2}\.[ \t]+\(1\)[ \t])",
        "$1\n$2\n$3",
    ),
    // ". 62. (1) For the purpose"
    (r"([.;:])[ \t]+(\d{1,4}[A-Za-z]{0,2}\.[ \t]+\(1\)[ \t])", "$1\n$2"),
    // "; and (b)" / "; or (b)"
    (r";[ \t]+(and|or)[ \t]+(\([a-z]{1,4}\)[ \t])", "; $1\n$2"),
    // "foo; (b) bar"
    (r";[ \t]+(\([a-z]{1,4}\)[ \t])", ";\n$1"),
    // "(c) the end. (3) A new subsection", but not "62. (1)"
    (r"([^\d\s][.;:])[ \t]+(\(\d{1,3}[a-z]{0,2}\)[ \t])", "$1\n$2"),
    // "\"a\" means x; \"b\" means y"
    (r#";[ \t]+("[^"\n]{1,80}"[ \t]+(?:means|includes)\b)"#, ";\n$1"),
    // "GENERAL PROVISIONS OF ACT Definitions"
    (r"\b([A-Z]{2,}(?:[ \t]+[A-Z]{2,}){2,})[ \t]+([A-Z][a-z])", "$1\n$2"),
];

impl LineBreaker {
    pub fn new() -> Result<Self> {
        let rules = BREAK_RULES
            .iter()
            .map(|(pattern, replacement)| {
                compile("line break rule", pattern).map(|regex| (regex, *replacement))
            })
            .collect::<Result<Vec<(Regex, &'static str)>>>()?;
        Ok(Self { rules })
    }
}

impl TextRule for LineBreaker {
    fn name(&self) -> &'static str {
        "break-lines"
    }

    fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (pattern, replacement) in &self.rules {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
        out
    }
}
