//! String-level transforms shared by the builder and the rendering coda.

use unicode_categories::UnicodeCategories;
use unicode_width::UnicodeWidthChar;

use crate::pua;
use crate::scanners;

const fn byte_set(chars: &[u8]) -> [bool; 256] {
    let mut set = [false; 256];
    let mut i = 0;
    while i < chars.len() {
        set[chars[i] as usize] = true;
        i += 1;
    }
    set
}

/// Characters that need escaping in normal HTML text.
const HTML_ESC: [bool; 256] = byte_set(b"\"&<>");

/// Characters safe in URL attributes; everything else is percent-encoded.
const URL_SAFE: [bool; 256] = byte_set(
    b"~-_.+!*(),%#@?=;:/,+$abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
);

/// Appends `text` with `&<>"` replaced by their reserved-codepoint stand-ins.
/// The final spelling (entity or raw character) is decided at release time.
pub(crate) fn escape_html_into(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_ascii() && HTML_ESC[c as usize] {
            match c {
                '&' => out.push(pua::AMP),
                '<' => out.push(pua::LT),
                '>' => out.push(pua::GT),
                _ => out.push(pua::QUOT),
            }
        } else {
            out.push(c);
        }
    }
}

/// Appends `text` percent-encoded for use in a URL attribute.
pub(crate) fn escape_url_into(out: &mut String, text: &str) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    for &b in text.as_bytes() {
        if URL_SAFE[b as usize] {
            out.push(b as char);
        } else if b == b'&' {
            out.push_str("&amp;");
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0xf) as usize] as char);
        }
    }
}

/// Escapes `text` for interpolation into a markup attribute or title.
pub(crate) fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// String length in terminal columns, aware of the reserved codepoints the
/// pipeline splices into working text: the emphasis/strong brackets occupy no
/// columns, zero-width characters count zero, wide characters count two.
pub(crate) fn col_width(s: &str) -> usize {
    let mut len = 0;
    for c in s.chars() {
        if (pua::EM_OPEN..=pua::STRONG_CLOSE).contains(&c) {
            continue;
        }
        len += match UnicodeWidthChar::width(c) {
            Some(0) => 0,
            Some(2) => 2,
            _ => 1,
        };
    }
    len
}

/// Naive `<span>` and `<tt>` tag stripper.
///
/// Erases the tags without semantic checking; good enough for measuring the
/// markup this pipeline generates itself.
pub(crate) fn strip_markup_spans_fast(s: &mut String) {
    for tag in ["<span ", "</span>", "<span>", "<tt>", "</tt>"] {
        while let Some(p) = s.find(tag) {
            match s[p..].find('>') {
                Some(q) => s.replace_range(p..p + q + 1, ""),
                None => break,
            }
        }
    }
}

/// Removes every `<...>` run, leaving plain text for length measurement.
pub(crate) fn strip_all_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Normalizes inline code content: line endings become spaces, and one
/// leading plus trailing space is dropped when the content is not all blank.
pub(crate) fn normalize_code(v: &str) -> String {
    let bytes = v.as_bytes();
    let mut r = Vec::with_capacity(bytes.len());
    let mut contains_nonspace = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                if i + 1 == bytes.len() || bytes[i + 1] != b'\n' {
                    r.push(b' ');
                }
            }
            b'\n' => r.push(b' '),
            c => r.push(c),
        }
        if bytes[i] != b' ' && bytes[i] != b'\r' && bytes[i] != b'\n' {
            contains_nonspace = true;
        }
        i += 1;
    }
    if contains_nonspace && r.len() > 1 && r[0] == b' ' && r[r.len() - 1] == b' ' {
        r.remove(0);
        r.pop();
    }
    String::from_utf8(r).expect("code content is UTF-8")
}

/// Rewrites dumb quote pairs and `--` runs into their typographic forms.
///
/// Analyzes the text first and leaves it untouched when no candidate exists.
/// When `escaping` is on, double quotes travel as their reserved codepoint.
pub(crate) fn smart_text(target: &mut String, escaping: bool) {
    const APOS: u8 = 1 << 0;
    const QUOT: u8 = 1 << 1;
    const MDASH: u8 = 1 << 2;

    let mut found = 0u8;
    let chars: Vec<char> = target.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\'' => {
                // Leave it's, let's and so on alone.
                let prev_alpha = i > 0 && chars[i - 1].is_ascii_alphabetic();
                let next_alpha = chars.get(i + 1).is_some_and(|n| n.is_ascii_alphabetic());
                if i == 0 || !prev_alpha || !next_alpha {
                    found |= APOS;
                }
            }
            pua::QUOT => found |= QUOT,
            '"' if !escaping => found |= QUOT,
            '-' => {
                if chars.get(i + 1) == Some(&'-') {
                    found |= MDASH;
                }
            }
            _ => {}
        }
    }
    if found == 0 {
        return;
    }

    // Space padding gives the pair matcher a boundary at both ends.
    let mut work = format!(" {} ", target);
    if found & MDASH != 0 {
        work = work.replace(" -- ", " \u{2014} ");
    }
    if found & (APOS | QUOT) != 0 {
        work = scanners::replace_smart_quote_pairs(&work);
    }
    *target = work[1..work.len() - 1].to_string();
}

/// True for the characters that bound a quotable region: space separators,
/// punctuation and the hard-break stand-in.
pub(crate) fn is_quote_boundary(c: char) -> bool {
    c == pua::BR || c.is_separator_space() || c.is_punctuation()
}

/// Word separators for auto code span discovery: space separators, vertical
/// whitespace and the reserved codepoints that bracket rendered inlines.
pub(crate) fn is_word_separator(c: char) -> bool {
    matches!(
        c,
        '\u{000B}' | '\u{000C}' | '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    ) || matches!(
        c,
        pua::BR
            | pua::EM_OPEN
            | pua::EM_CLOSE
            | pua::STRONG_OPEN
            | pua::STRONG_CLOSE
            | pua::QUOT
            | pua::CODE
    ) || c.is_separator_space()
}
