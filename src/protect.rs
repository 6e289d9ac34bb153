//! Content-addressed stash tables and the placeholder tokens that name them.
//!
//! Rendered inline spans, raw HTML and link destinations are stashed here and
//! replaced in working text by opaque reference tokens, so the later text
//! transforms cannot mangle them.  Identical content is stashed once.

use regex::Regex;

use crate::pua;

#[derive(Default)]
pub(crate) struct ProtectStore {
    code_table: Vec<String>,
    link_table: Vec<String>,
}

/// Encodes `id` as a code reference token.
pub(crate) fn make_code_ref(id: usize) -> String {
    format!("{m}{id}C;{m}", m = pua::CODE)
}

/// The id a code reference token names, or None if `text` does not start
/// with the token delimiter.
fn code_ref_id(text: &str) -> Option<usize> {
    let rest = text.strip_prefix(pua::CODE)?;
    Some(leading_decimal(rest))
}

/// Ditto for link destination references.
fn link_ref_id(text: &str) -> Option<usize> {
    let rest = text.strip_prefix(pua::LINK)?;
    Some(leading_decimal(rest))
}

fn leading_decimal(s: &str) -> usize {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

impl ProtectStore {
    pub(crate) fn clear(&mut self) {
        self.code_table.clear();
        self.link_table.clear();
    }

    /// Stashes a code span (or anything else that must survive the text
    /// transforms).  Stashing a reference token returns the id it names.
    pub(crate) fn stash_code(&mut self, code: &str) -> usize {
        if let Some(id) = code_ref_id(code) {
            return id;
        }
        if let Some(id) = self.code_table.iter().position(|c| c == code) {
            return id;
        }
        self.code_table.push(code.to_string());
        self.code_table.len() - 1
    }

    /// Stashes a link URI or image path.
    pub(crate) fn stash_link_dest(&mut self, dest: &str) -> usize {
        if let Some(id) = link_ref_id(dest) {
            return id;
        }
        if let Some(id) = self.link_table.iter().position(|d| d == dest) {
            return id;
        }
        self.link_table.push(dest.to_string());
        self.link_table.len() - 1
    }

    pub(crate) fn link_dest(&self, id: usize) -> Option<&str> {
        self.link_table.get(id).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn code_table_len(&self) -> usize {
        self.code_table.len()
    }

    /// Stashes `text` and returns the reference token that stands in for it.
    pub(crate) fn protect(&mut self, text: &str) -> String {
        make_code_ref(self.stash_code(text))
    }

    /// Replaces every reference token in `s` with the content it names and
    /// returns the replacement count.  Tokens naming an absent id pass
    /// through unchanged and are not counted, so repeated application always
    /// reaches a fixed point.
    pub(crate) fn release_once(&self, s: &mut String, re: &Regex) -> usize {
        let mut count = 0;
        let mut out = String::with_capacity(s.len());
        let mut last = 0;
        for caps in re.captures_iter(s) {
            let m = caps.get(0).expect("whole match");
            out.push_str(&s[last..m.start()]);
            let id: usize = caps[1].parse().unwrap_or(usize::MAX);
            match self.code_table.get(id) {
                Some(code) => {
                    out.push_str(code);
                    count += 1;
                }
                None => out.push_str(m.as_str()),
            }
            last = m.end();
        }
        if last > 0 {
            out.push_str(&s[last..]);
            *s = out;
        }
        count
    }

    /// Releases reference tokens until none resolve; protected content can
    /// itself contain nested tokens (an image inside link text).
    pub(crate) fn release_to_fixed_point(&self, s: &mut String, re: &Regex) -> usize {
        let mut total = 0;
        loop {
            let n = self.release_once(s, re);
            if n == 0 {
                return total;
            }
            total += n;
        }
    }
}
