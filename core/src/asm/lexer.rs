//! file: core/src/asm/lexer.rs
//! description: line-level scanning helpers for the assembler.
//!
//! All scanners here are quote-aware: a `'` or `"` opens a span that runs to
//! the matching quote, and a backslash inside the span escapes the next
//! character. Comment markers and commas inside such spans are plain text.

pub(crate) const COMMENT_CHARS: [char; 2] = [';', '#'];
pub(crate) const LABEL_SUFFIX: char = ':';

/// Tracks whether the scanner is inside a quoted span.
#[derive(Default)]
struct QuoteState {
    open: Option<char>,
    escaped: bool,
}

impl QuoteState {
    /// Feeds one character and reports whether it sat inside quotes.
    fn feed(&mut self, ch: char) -> bool {
        match self.open {
            Some(q) => {
                if self.escaped {
                    self.escaped = false;
                } else if ch == '\\' {
                    self.escaped = true;
                } else if ch == q {
                    self.open = None;
                }
                true
            }
            None => {
                if ch == '\'' || ch == '"' {
                    self.open = Some(ch);
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Drops a trailing `;` or `#` comment that is not inside quotes.
pub(crate) fn strip_comment(line: &str) -> &str {
    let mut quotes = QuoteState::default();
    for (i, ch) in line.char_indices() {
        let quoted = quotes.feed(ch);
        if !quoted && COMMENT_CHARS.contains(&ch) {
            return &line[..i];
        }
    }
    line
}

pub(crate) fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits `name: rest` into the label name and the trimmed remainder.
pub(crate) fn split_label(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(LABEL_SUFFIX)?;
    let name = &line[..colon];
    if !is_identifier(name) {
        return None;
    }
    Some((name, line[colon + 1..].trim()))
}

/// Splits an instruction into its mnemonic and the rest of the text.
pub(crate) fn split_mnemonic(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim()),
        None => (text, ""),
    }
}

/// Splits operand text on commas outside quotes. Fragments are trimmed and
/// empty ones dropped.
pub(crate) fn split_operands(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut quotes = QuoteState::default();
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        let quoted = quotes.feed(ch);
        if !quoted && ch == ',' {
            push_fragment(&mut out, &text[start..i]);
            start = i + 1;
        }
    }
    push_fragment(&mut out, &text[start..]);
    out
}

fn push_fragment(out: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        out.push(fragment.to_string());
    }
}
