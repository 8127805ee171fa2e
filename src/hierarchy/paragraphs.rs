use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberingFormat {
    LowerAlpha,
    LowerRoman,
    UpperAlpha,
    UpperRoman,
    DoubledLower,
    DoubledUpper,
    Dotted(usize),
    Unknown,
}

impl NumberingFormat {
    pub fn ordinal(self) -> usize {
        match self {
            NumberingFormat::LowerAlpha => 0,
            NumberingFormat::LowerRoman => 1,
            NumberingFormat::UpperAlpha => 2,
            NumberingFormat::UpperRoman => 3,
            NumberingFormat::DoubledLower => 4,
            NumberingFormat::DoubledUpper => 5,
            NumberingFormat::Dotted(depth) => depth,
            NumberingFormat::Unknown => 99,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NumberingFormat::LowerAlpha => "a",
            NumberingFormat::LowerRoman => "i",
            NumberingFormat::UpperAlpha => "A",
            NumberingFormat::UpperRoman => "I",
            NumberingFormat::DoubledLower => "aa",
            NumberingFormat::DoubledUpper => "AA",
            NumberingFormat::Dotted(_) => "1",
            NumberingFormat::Unknown => "unknown",
        }
    }

    fn is_first(self, core: &str) -> bool {
        match self {
            NumberingFormat::LowerAlpha => core == "a",
            NumberingFormat::LowerRoman => core == "i",
            NumberingFormat::UpperAlpha => core == "A",
            NumberingFormat::UpperRoman => core == "I",
            NumberingFormat::DoubledLower => core == "aa",
            NumberingFormat::DoubledUpper => core == "AA",
            NumberingFormat::Dotted(_) => core.rsplit('.').next() == Some("1"),
            NumberingFormat::Unknown => false,
        }
    }
}

fn core_of(num: &str) -> &str {
    num.trim()
        .trim_start_matches('(')
        .trim_end_matches(['.', ')'])
}

fn roman_value(value: &str) -> Option<u32> {
    fn digit(ch: char) -> Option<u32> {
        Some(match ch {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            'c' => 100,
            'd' => 500,
            'm' => 1000,
            _ => return None,
        })
    }

    let digits = value
        .chars()
        .map(|ch| digit(ch.to_ascii_lowercase()))
        .collect::<Option<Vec<u32>>>()?;
    if digits.is_empty() {
        return None;
    }
    let mut total = 0i64;
    for (index, current) in digits.iter().enumerate() {
        match digits.get(index + 1) {
            Some(next) if next > current => total -= i64::from(*current),
            _ => total += i64::from(*current),
        }
    }
    u32::try_from(total).ok()
}

fn to_roman(mut value: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (step, symbol) in TABLE {
        while value >= step {
            out.push_str(symbol);
            value -= step;
        }
    }
    out
}

fn is_roman_marker(value: &str) -> bool {
    match roman_value(value) {
        Some(number) if number > 0 => to_roman(number) == value.to_ascii_lowercase(),
        _ => false,
    }
}

fn is_doubled(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => value.len() >= 2 && chars.all(|ch| ch == first),
        None => false,
    }
}

/// Classifies a list number. `previous` is the preceding item at the same
/// level together with the style that level was given, `next` the number of
/// the following item in the run. Both resolve letters that are also roman
/// numerals: `(i)` after `(h)` is alphabetic unless `(ii)` follows, and
/// `(v)`/`(x)` keep roman style only after a roman predecessor.
pub fn classify_num(
    num: &str,
    previous: Option<(&str, NumberingFormat)>,
    next: Option<&str>,
) -> NumberingFormat {
    let core = core_of(num);
    let Some(first) = core.chars().next() else {
        return NumberingFormat::Unknown;
    };

    if first.is_ascii_digit() {
        return NumberingFormat::Dotted(core.matches('.').count());
    }
    if !core.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return NumberingFormat::Unknown;
    }

    let lower = core.chars().all(|ch| ch.is_ascii_lowercase());
    let upper = core.chars().all(|ch| ch.is_ascii_uppercase());
    if !lower && !upper {
        return NumberingFormat::Unknown;
    }
    let (alpha, roman, doubled) = if lower {
        (
            NumberingFormat::LowerAlpha,
            NumberingFormat::LowerRoman,
            NumberingFormat::DoubledLower,
        )
    } else {
        (
            NumberingFormat::UpperAlpha,
            NumberingFormat::UpperRoman,
            NumberingFormat::DoubledUpper,
        )
    };

    let previous_core = previous.map(|(num, _)| core_of(num));
    let previous_format = previous.map(|(_, format)| format);
    let next_core = next.map(core_of);

    if core.len() == 1 {
        let letter = first.to_ascii_lowercase();
        if letter == 'i' {
            let after_h = previous_core
                .map(|prev| prev.eq_ignore_ascii_case("h"))
                .unwrap_or(false);
            let before_ii = next_core
                .map(|next| next.eq_ignore_ascii_case("ii"))
                .unwrap_or(false);
            return if after_h && !before_ii { alpha } else { roman };
        }
        if matches!(letter, 'v' | 'x') && previous_format == Some(roman) {
            return roman;
        }
        return alpha;
    }

    if is_doubled(core) {
        let continues_alpha = previous_format == Some(alpha)
            && previous_core
                .map(|prev| prev.eq_ignore_ascii_case("z") || is_doubled(prev))
                .unwrap_or(false);
        if continues_alpha {
            return alpha;
        }
        if previous_format == Some(doubled) {
            return doubled;
        }
    }
    if is_roman_marker(core) {
        return roman;
    }
    if is_doubled(core) {
        return doubled;
    }
    NumberingFormat::Unknown
}

pub struct NestParagraphs;

impl NestParagraphs {
    fn num(tree: &Tree, id: NodeId) -> String {
        tree.block(id)
            .and_then(|block| block.num.clone())
            .unwrap_or_default()
    }

    fn runs(tree: &Tree, parent: NodeId) -> Vec<Vec<NodeId>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for child in tree.children(parent) {
            if tree.kind(child) == Some(BlockKind::Paragraph) {
                current.push(child);
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    fn nest_level(
        tree: &mut Tree,
        items: &[NodeId],
        start: usize,
        format: NumberingFormat,
        parent: Option<NodeId>,
        open: &mut Vec<NumberingFormat>,
    ) -> usize {
        let mut position = start;
        let mut previous: Option<(NodeId, String)> = None;
        open.push(format);

        while position < items.len() {
            let item = items[position];
            let num = Self::num(tree, item);

            if let Some((previous_id, previous_num)) = &previous {
                let next = items.get(position + 1).map(|next| Self::num(tree, *next));
                let style =
                    classify_num(&num, Some((previous_num.as_str(), format)), next.as_deref());

                if style == format {
                    if style.is_first(core_of(&num)) {
                        break;
                    }
                } else if open[..open.len() - 1].contains(&style)
                    || style.ordinal() < format.ordinal()
                {
                    break;
                } else {
                    let previous_id = *previous_id;
                    position = Self::nest_level(tree, items, position, style, Some(previous_id), open);
                    continue;
                }
            }

            if let Some(parent) = parent {
                tree.append_child(parent, item);
            }
            previous = Some((item, num));
            position += 1;
        }

        open.pop();
        position
    }

    fn nest_run(tree: &mut Tree, items: &[NodeId]) {
        let container = tree.parent(items[0]);
        let mut position = 0;
        let mut previous: Option<(String, NumberingFormat)> = None;
        while position < items.len() {
            let num = Self::num(tree, items[position]);
            let next = items.get(position + 1).map(|next| Self::num(tree, *next));
            let format = classify_num(
                &num,
                previous.as_ref().map(|(num, format)| (num.as_str(), *format)),
                next.as_deref(),
            );
            // A level always keeps the item it starts on.
            let end = Self::nest_level(tree, items, position, format, None, &mut Vec::new())
                .max(position + 1);
            let last_top = items[position..end]
                .iter()
                .rev()
                .find(|item| tree.parent(**item) == container)
                .copied()
                .unwrap_or(items[position]);
            previous = Some((Self::num(tree, last_top), format));
            position = end;
        }
    }
}

impl Stage for NestParagraphs {
    fn name(&self) -> &str {
        "nest-paragraphs"
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let tree = &mut context.tree;
        let root = tree.root();

        let mut parents = vec![root];
        parents.extend(tree.descendants(root).into_iter().filter(|id| {
            tree.kind(*id)
                .map(|kind| !matches!(kind, BlockKind::Paragraph | BlockKind::Subparagraph))
                .unwrap_or(false)
        }));

        for parent in parents {
            for run in Self::runs(tree, parent) {
                if run.len() > 1 {
                    Self::nest_run(tree, &run);
                }
            }
        }

        let mut retagged = 0usize;
        for id in tree.descendants(root) {
            let nested = tree.kind(id) == Some(BlockKind::Paragraph)
                && tree
                    .parent(id)
                    .and_then(|parent| tree.kind(parent))
                    .map(|kind| matches!(kind, BlockKind::Paragraph | BlockKind::Subparagraph))
                    .unwrap_or(false);
            if nested {
                if let Some(block) = tree.block_mut(id) {
                    block.kind = BlockKind::Subparagraph;
                    retagged += 1;
                }
            }
        }

        debug!(retagged, "nested paragraph lists");
        Ok(())
    }
}
