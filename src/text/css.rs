//! CSS `font` shorthand parsing.
//!
//! Only the family list matters to the font monitor, but the list can only be
//! located reliably by walking the shorthand: optional style, variant and
//! weight keywords, a required size, an optional `/line-height`, then the
//! comma separated families.
//!
//! ```text
//! italic small-caps bold 12px/1.5 "Open Sans", Arial, sans-serif
//! └──────── keywords ──────┘ └size┘└lh┘ └──────── families ────────┘
//! ```

/// Generic family keywords. The layout engine always resolves these.
pub const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
];

const STYLE_KEYWORDS: &[&str] = &[
    "normal",
    "italic",
    "oblique",
    "small-caps",
    "bold",
    "bolder",
    "lighter",
];

const SIZE_KEYWORDS: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller", "larger",
];

const LENGTH_UNITS: &[&str] = &["px", "pt", "pc", "em", "ex", "in", "cm", "mm", "%"];

/// Whether `family` is a generic family keyword (case-insensitive).
pub fn is_generic_family(family: &str) -> bool {
    GENERIC_FAMILIES
        .iter()
        .any(|generic| generic.eq_ignore_ascii_case(family))
}

/// Extract the ordered family names referenced by a CSS font shorthand.
///
/// Quotes are stripped from quoted names. Returns `None` when the shorthand
/// has no size or no families.
///
/// ```
/// use tile_label_core::text::parse_font_families;
///
/// let families = parse_font_families("bold 12px/1.2 'Open Sans', serif").unwrap();
/// assert_eq!(families, vec!["Open Sans", "serif"]);
///
/// assert_eq!(parse_font_families("Arial"), None);
/// ```
pub fn parse_font_families(font: &str) -> Option<Vec<String>> {
    let rest = skip_to_families(font.trim())?;
    let families: Vec<String> = FamilyList::new(rest).collect::<Option<_>>()?;
    if families.is_empty() {
        None
    } else {
        Some(families)
    }
}

/// Consume keywords, size and line height. Returns the remaining family list.
fn skip_to_families(font: &str) -> Option<&str> {
    let mut rest = font;
    // At most three leading keywords: style, variant, weight.
    for _ in 0..=3 {
        let (token, after) = next_token(rest)?;
        let size_part = token.split('/').next().unwrap_or(token);
        if is_size(size_part) {
            return skip_line_height(token, after);
        }
        if !is_style_keyword(token) {
            return None;
        }
        rest = after;
    }
    None
}

/// Handle `12px/1.5`, `12px /1.5` and `12px / 1.5`.
fn skip_line_height<'a>(size_token: &'a str, after: &'a str) -> Option<&'a str> {
    if let Some((_, line_height)) = size_token.split_once('/') {
        if line_height.is_empty() {
            let (token, after) = next_token(after)?;
            return is_line_height(token).then_some(after);
        }
        return is_line_height(line_height).then_some(after);
    }

    let trimmed = after.trim_start();
    if let Some(stripped) = trimmed.strip_prefix('/') {
        let stripped = stripped.trim_start();
        let (token, after) = next_token(stripped)?;
        return is_line_height(token).then_some(after);
    }
    Some(after)
}

fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn is_style_keyword(token: &str) -> bool {
    STYLE_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(token))
        || is_numeric_weight(token)
}

fn is_numeric_weight(token: &str) -> bool {
    token.len() == 3
        && token.ends_with("00")
        && matches!(token.as_bytes()[0], b'1'..=b'9')
}

fn is_size(token: &str) -> bool {
    SIZE_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(token))
        || is_length(token)
}

fn is_length(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    LENGTH_UNITS.iter().any(|unit| {
        lower
            .strip_suffix(unit)
            .is_some_and(|number| is_number(number))
    })
}

fn is_line_height(token: &str) -> bool {
    token.eq_ignore_ascii_case("normal") || is_number(token) || is_length(token)
}

fn is_number(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().any(|b| b.is_ascii_digit())
        && s.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && s.bytes().filter(|&b| b == b'.').count() <= 1
}

// =============================================================================
// Family List
// =============================================================================

/// Iterator over a comma separated family list.
///
/// Yields `None` for a malformed entry (unterminated quote, trailing garbage
/// after a quoted name, or an empty entry between commas).
#[derive(Clone)]
struct FamilyList<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> FamilyList<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }
}

impl Iterator for FamilyList<'_> {
    type Item = Option<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.source.as_bytes();
        let len = bytes.len();
        let mut pos = self.pos;
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len {
            self.pos = len;
            return None;
        }

        let first = bytes[pos];
        if first == b'"' || first == b'\'' {
            let start = pos + 1;
            let Some(close) = self.source[start..].find(char::from(first)) else {
                self.pos = len;
                return Some(None);
            };
            let name = self.source[start..start + close].trim();
            pos = start + close + 1;

            // Only whitespace may separate the closing quote from the comma.
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos < len {
                if bytes[pos] != b',' {
                    self.pos = len;
                    return Some(None);
                }
                pos += 1;
            }
            self.pos = pos;
            return Some((!name.is_empty()).then(|| name.to_string()));
        }

        let end = self.source[pos..]
            .find(',')
            .map_or(len, |offset| pos + offset);
        let name = self.source[pos..end].trim();
        self.pos = if end < len { end + 1 } else { len };
        Some((!name.is_empty()).then(|| name.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
