//! Blank-line normalization for plain-text bodies

/// Marker that replaces each kept blank line
pub const BLANK: &str = "\n";

/// Longest run of blank lines kept between two paragraphs
const MAX_BLANK_RUN: usize = 2;

/// Normalize a sequence of already-trimmed lines.
///
/// Blank lines before the first and after the last non-blank line are
/// dropped, interior runs of blank lines are capped at two, and every kept
/// blank becomes [`BLANK`]. Non-blank lines pass through untouched.
///
/// A line counts as blank when it is empty after [`trim_line`], so the output
/// of this function is itself a fixed point.
#[must_use]
pub fn normalize_lines<'a, I>(lines: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Vec::new();
    let mut pending_blanks = 0usize;

    for line in lines {
        if trim_line(line).is_empty() {
            // Leading blanks never get flushed
            if !out.is_empty() {
                pending_blanks += 1;
            }
            continue;
        }
        let kept = pending_blanks.min(MAX_BLANK_RUN);
        out.extend(std::iter::repeat_n(BLANK, kept));
        pending_blanks = 0;
        out.push(line);
    }

    out
}

/// Unicode whitespace plus the information separators `\x1c`..=`\x1f`,
/// which mail text also treats as blank
fn is_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\x1c'..='\x1f')
}

/// Strip surrounding whitespace, separators included
#[must_use]
pub fn trim_line(line: &str) -> &str {
    line.trim_matches(is_space)
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split `text` on every line terminator, treating `\r\n` as one.
///
/// A terminator at the very end does not produce a trailing empty line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..idx]);
        let mut end = idx + c.len_utf8();
        if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            chars.next();
            end += 1;
        }
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Render one plain-text part: split into lines, trim each, normalize, and
/// concatenate with no separator.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    normalize_lines(split_lines(text).into_iter().map(trim_line)).concat()
}
