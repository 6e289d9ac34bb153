//! Pattern matchers: lazily compiled regexes plus hand-rolled scanners.
//!
//! The regex table is compiled on first use and cached for the lifetime of
//! the engine instance.  A pattern that fails to compile is logged and its
//! pass degrades to a no-op.  The word splitter and the quote-pair matcher
//! need look-behind and back-references, which the `regex` engine does not
//! offer, so they are scanners instead.

use regex::Regex;

use crate::strings;

/// Matches a protection token: the reserved delimiter, a decimal id, `C;`,
/// and the delimiter again.
const CODE_REF: &str = "\u{F601}([0-9]+)C;\u{F601}";

/// Matches legacy `%%nopot`/`%%textdomain` directive lines.
const DIRECTIVE: &str =
    "(\r\n|\n|\r|^)%%(?:nopot|textdomain)[ \t]+.*?(\r\n|\n|\r|$)";

/// Matches a `~` code fence opener; group 1 is the tilde run.
const TILDE_CODE_FENCE: &str = "(?m)^ {0,3}(~{3,})";

#[derive(Default)]
pub(crate) struct RegexCache {
    code_ref: Option<Regex>,
    directive: Option<Regex>,
    tilde_code_fence: Option<Regex>,
}

impl RegexCache {
    pub(crate) fn code_ref(&mut self) -> Option<&Regex> {
        compiled(&mut self.code_ref, CODE_REF)
    }

    pub(crate) fn directive(&mut self) -> Option<&Regex> {
        compiled(&mut self.directive, DIRECTIVE)
    }

    pub(crate) fn tilde_code_fence(&mut self) -> Option<&Regex> {
        compiled(&mut self.tilde_code_fence, TILDE_CODE_FENCE)
    }
}

fn compiled<'a>(slot: &'a mut Option<Regex>, pattern: &str) -> Option<&'a Regex> {
    if slot.is_none() {
        match Regex::new(pattern) {
            Ok(re) => *slot = Some(re),
            Err(err) => {
                log::error!("pattern {pattern:?} failed to compile: {err}");
                return None;
            }
        }
    }
    slot.as_ref()
}

/// Splits `text` into alternating word and separator tokens.
///
/// Separator runs are kept as tokens of their own so the caller can rebuild
/// the string by simple concatenation.  A separator immediately preceded by a
/// backslash stays glued to its word, which lets documents escape whitespace
/// inside a word candidate.
pub(crate) fn split_words(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = vec![String::new()];
    let mut in_separator = false;
    let mut prev: Option<char> = None;
    for c in text.chars() {
        let sep = strings::is_word_separator(c) && prev != Some('\\');
        if sep != in_separator && !tokens.last().unwrap().is_empty() {
            tokens.push(String::new());
        }
        in_separator = sep;
        tokens.last_mut().unwrap().push(c);
        prev = Some(c);
    }
    tokens
}

fn quote_glyphs(open: char) -> (&'static str, &'static str) {
    if open == '\'' {
        ("\u{2018}", "\u{2019}")
    } else {
        ("\u{201C}", "\u{201D}")
    }
}

/// Replaces dumb quote pairs with typographic quotes.
///
/// A pair is an opener at a boundary, a minimal non-empty body, and the same
/// quote character followed by a boundary or the end of text.  Matched pairs
/// do not overlap; the scan resumes after the closer.
pub(crate) fn replace_smart_quote_pairs(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let quotable = matches!(c, '\'' | '"' | crate::pua::QUOT);
        if quotable && (i == 0 || strings::is_quote_boundary(chars[i - 1])) {
            let mut j = i + 2; // body is at least one character
            let mut close = None;
            while j < chars.len() {
                if chars[j] == '\n' {
                    // A pair never spans lines.
                    break;
                }
                let at_end = j + 1 == chars.len();
                if chars[j] == c && (at_end || strings::is_quote_boundary(chars[j + 1])) {
                    close = Some(j);
                    break;
                }
                j += 1;
            }
            if let Some(j) = close {
                let (l, r) = quote_glyphs(c);
                out.push_str(l);
                out.extend(&chars[i + 1..j]);
                out.push_str(r);
                i = j + 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}
