//! The conversion engine: per-instance state and the document driver.

use crate::builder;
use crate::coda;
use crate::options::Options;
use crate::protect::ProtectStore;
use crate::pua;
use crate::scanners::{self, RegexCache};
use crate::strings;
use crate::tags::{self, Format, TagSet};
use crate::units::UnitKind;
use crate::words::{self, WordKind};

/// Conversion errors.  These report caller contract violations; malformed
/// documents never error, the grammar being total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `convert` was called before an output format was selected.
    #[error("no output format selected")]
    FormatNotSet,
}

/// A markdown conversion engine.
///
/// One instance holds the per-document state (unit queue, protection
/// tables) plus lazily compiled pattern matchers reused across sequential
/// conversions.  Instances are single-threaded; give each thread its own.
///
/// ```rust
/// use polymark::{Engine, Format, Options};
/// let mut engine = Engine::new(Options::default());
/// engine.set_format(Format::Html);
/// assert_eq!(engine.convert("*hi*\n").unwrap(), "<p><em>hi</em></p>");
/// ```
pub struct Engine {
    /// Extension and tweak flags; adjustable between conversions.
    pub options: Options,
    format: Option<Format>,
    pub(crate) escaping: bool,
    pub(crate) inside_table: bool,
    pub(crate) store: ProtectStore,
    pub(crate) regexes: RegexCache,
}

impl Engine {
    /// Creates an engine.  Select an output format before converting.
    pub fn new(options: Options) -> Engine {
        Engine {
            options,
            format: None,
            escaping: false,
            inside_table: false,
            store: ProtectStore::default(),
            regexes: RegexCache::default(),
        }
    }

    /// Selects the output format.  Must happen before the first `convert`.
    pub fn set_format(&mut self, format: Format) {
        self.format = Some(format);
    }

    /// The selected output format, if any.
    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub(crate) fn out_format(&self) -> Format {
        self.format.expect("output format is selected")
    }

    pub(crate) fn html_output(&self) -> bool {
        self.format == Some(Format::Html)
    }

    pub(crate) fn tags(&self) -> &'static TagSet {
        self.out_format().tags()
    }

    /// The destination stashed under `id` during the last conversion, in
    /// the form `<url-escaped>\n<verbatim>`.
    pub fn link_dest(&self, id: usize) -> Option<&str> {
        self.store.link_dest(id)
    }

    /// Converts `markdown` to the selected output format.
    ///
    /// All document-scoped state resets at the start of the call; only the
    /// matcher cache survives between conversions.  Empty input produces an
    /// empty string.
    pub fn convert(&mut self, markdown: &str) -> Result<String, Error> {
        let format = self.format.ok_or(Error::FormatNotSet)?;
        self.store.clear();
        self.inside_table = false;
        self.escaping = self.options.render.escape || format == Format::Html;
        if markdown.is_empty() {
            return Ok(String::new());
        }

        let mut text = markdown
            .strip_prefix('\u{feff}')
            .unwrap_or(markdown)
            .to_string();

        // Shebang extension: fence the whole document as one code block,
        // one tilde longer than any fence the document itself carries.
        let mut in_shebang = false;
        if self.options.extension.shebang {
            let b = text.as_bytes();
            if b.len() > 2 && b[0] == b'#' && b[1] == b'!' {
                let mut k = 2;
                while k < b.len() && (b[k] == b' ' || b[k] == b'\t') {
                    k += 1;
                }
                if k < b.len() && b[k] == b'/' {
                    in_shebang = true;
                    let longest = self.tilde_fence_max(&text);
                    let fence = "~".repeat(if longest > 0 { longest + 1 } else { 3 });
                    text.insert_str(0, &format!("{}\n", fence));
                }
            }
        }

        // Directive extraction is unsupported; erase the legacy spellings
        // for compatibility with existing documents.
        if !in_shebang {
            if let Some(re) = self.regexes.directive() {
                text = re
                    .replace_all(&text, |caps: &regex::Captures| {
                        let lead = &caps[1];
                        if lead.is_empty() {
                            caps[2].to_string()
                        } else {
                            lead.to_string()
                        }
                    })
                    .into_owned();
            }
        }

        let mut q = builder::run(self, &text);
        drop(text);
        coda::run(self, &mut q);

        // Join every live unit's text, in document order.  Arguments that
        // were never merged into a text field sink for good.
        let mut out = String::new();
        for unit in q.iter() {
            if matches!(unit.kind, UnitKind::Arg | UnitKind::Junk) {
                continue;
            }
            if let Some(text) = &unit.text {
                out.push_str(text);
            }
        }

        // Release (re)protected spans, then the reserved singletons.
        while self.release_protected(&mut out) > 0 {}
        self.release_singletons(&mut out);

        if out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }

    /// Stashes `text` and returns the opaque token standing in for it.
    pub(crate) fn protect(&mut self, text: &str) -> String {
        self.store.protect(text)
    }

    /// One release pass over `s`; returns the replacement count.
    pub(crate) fn release_protected(&mut self, s: &mut String) -> usize {
        match self.regexes.code_ref() {
            Some(re) => self.store.release_once(s, re),
            None => 0,
        }
    }

    /// Releases to fixed point, then strips the markup spans, leaving clear
    /// text (possibly still holding reserved singletons) for measurement.
    pub(crate) fn release_protected_unmarked(&mut self, s: &mut String) -> usize {
        let total = match self.regexes.code_ref() {
            Some(re) => self.store.release_to_fixed_point(s, re),
            None => 0,
        };
        if total > 0 {
            strings::strip_markup_spans_fast(s);
        }
        total
    }

    fn tilde_fence_max(&mut self, text: &str) -> usize {
        match self.regexes.tilde_code_fence() {
            Some(re) => re
                .captures_iter(text)
                .map(|caps| caps[1].len())
                .max()
                .unwrap_or(0),
            None => 0,
        }
    }

    /// Replaces the reserved singletons with their format-specific final
    /// spelling.
    fn release_singletons(&self, s: &mut String) {
        let tags = self.tags();
        let mut br = String::from(tags.br);
        if self.html_output() {
            br.push_str(if self.options.render.html5 { ">\n" } else { " />\n" });
        }
        let (amp, lt, gt, quot) = if self.escaping {
            ("&amp;", "&lt;", "&gt;", "&quot;")
        } else {
            ("&", "<", ">", "'")
        };
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                pua::BR => out.push_str(&br),
                pua::EM_OPEN => out.push_str(tags.em_start),
                pua::EM_CLOSE => out.push_str(tags.em_end),
                pua::STRONG_OPEN => out.push_str(tags.strong_start),
                pua::STRONG_CLOSE => out.push_str(tags.strong_end),
                pua::AMP => out.push_str(amp),
                pua::LT => out.push_str(lt),
                pua::GT => out.push_str(gt),
                pua::QUOT => out.push_str(quot),
                _ => out.push(c),
            }
        }
        *s = out;
    }

    /// Stashes the destination and renders a link through the selected
    /// format's builder.
    pub(crate) fn build_link(
        &mut self,
        text: Option<&str>,
        dest: Option<&str>,
        title: Option<&str>,
    ) -> String {
        let id = match dest {
            Some(d) => self.store.stash_link_dest(d) as i32,
            None => -1,
        };
        match self.out_format() {
            Format::Html => link_html(text, dest, title),
            Format::Pango => self.link_pango(text, dest, title, id),
            Format::Ansi => link_ansi(text, dest, title),
            Format::Tty | Format::Text => link_text(text, dest, title),
        }
    }

    /// Ditto for images.
    pub(crate) fn build_image(
        &mut self,
        text: Option<&str>,
        dest: Option<&str>,
        title: Option<&str>,
    ) -> String {
        let id = match dest {
            Some(d) => self.store.stash_link_dest(d) as i32,
            None => -1,
        };
        match self.out_format() {
            Format::Html => self.image_html(text, dest, title),
            Format::Pango => self.image_pango(text, title, id),
            Format::Ansi => image_ansi(text, dest, title),
            Format::Tty | Format::Text => image_text(text, dest, title),
        }
    }

    /// Builds the Pango link span.  Extra data for the text view piggybacks
    /// the font VARIATIONS attribute: `font="@dest=Lu<id>dest=Tl<len>"`,
    /// decoded on the far side with [`tag_info`](crate::tag_info) and
    /// resolved through [`Engine::link_dest`].
    fn link_pango(
        &mut self,
        text: Option<&str>,
        dest: Option<&str>,
        title: Option<&str>,
        id: i32,
    ) -> String {
        let mut merge_img = String::new();
        let markup;
        let text_len;
        match text {
            Some(t) => {
                // The text can arrive encoded; decode to tell what it
                // holds.  Its length is taken after stripping markup, as
                // the text will appear on screen.
                let mut decoded = t.to_string();
                let replaced = self.release_protected(&mut decoded);
                text_len = strings::strip_all_tags(&decoded).chars().count();
                if replaced > 0 {
                    // A markdown image inside the link text merges its
                    // font metadata into the link span.
                    let image_id = tags::tag_info(&decoded, tags::TagInfo::DestImagePathId);
                    if image_id >= 0 {
                        merge_img = format!("@dest=Ip{}", image_id);
                        let needle = format!("font=\"{}\"", merge_img);
                        if let Some(p) = decoded.find(&needle) {
                            decoded.replace_range(p..p + needle.len(), "");
                        }
                    }
                }
                markup = self.protect(&decoded);
            }
            None => {
                markup = "\u{2BC5}\u{2BC5}".to_string();
                text_len = markup.chars().count();
            }
        }
        let title = title
            .map(|t| format!(" ({})", strings::escape_markup(t)))
            .unwrap_or_default();
        if dest.is_some() && id >= 0 {
            format!(
                "<span font=\"{}@dest=Lu{}dest=Tl{}{}\" {}>{}</span>{}",
                if self.inside_table { "monospace " } else { "" },
                id,
                text_len,
                merge_img,
                tags::STYLE_PANGO_URL,
                markup,
                title
            )
        } else {
            // A link without destination, [text](), is valid CommonMark.
            format!(
                "<span {}{}>{}</span>{}",
                if self.inside_table { "font=\"monospace\"" } else { "" },
                tags::STYLE_PANGO_URL,
                markup,
                title
            )
        }
    }

    fn image_pango(&self, text: Option<&str>, title: Option<&str>, id: i32) -> String {
        // Text view tags only exist together with text; for an empty alt
        // fall back, arbitrarily, to the stringified destination id.
        let fallback;
        let alt = match text {
            Some(t) => t,
            None => {
                fallback = id.to_string();
                &fallback
            }
        };
        let title = title
            .map(|t| format!(" ({})", strings::escape_markup(t)))
            .unwrap_or_default();
        format!(
            "<span font=\"{}@dest=Ip{}\" {}>{}</span>{}",
            if self.inside_table { "monospace " } else { "" },
            id,
            tags::STYLE_PANGO_IMAGE,
            alt,
            title
        )
    }

    fn image_html(&self, text: Option<&str>, dest: Option<&str>, title: Option<&str>) -> String {
        let bracket = if self.options.render.html5 { ">" } else { " />" };
        let src = dest.map(escaped_half).unwrap_or("");
        let alt = text.map(strings::escape_markup).unwrap_or_default();
        match title {
            Some(t) => format!(
                "<img src=\"{}\" alt=\"{}\" title=\"{}\"{}",
                src,
                alt,
                strings::escape_markup(t),
                bracket
            ),
            None => format!("<img src=\"{}\" alt=\"{}\"{}", src, alt, bracket),
        }
    }

    /// Discovers auto code spans in `text` and replaces them with protected
    /// renditions: URL and email candidates become links, everything else a
    /// code span.  A word-initial backslash excuses the word.
    pub(crate) fn replace_auto_spans(&mut self, text: &mut String) {
        let auto_code = self.options.extension.auto_code;
        let tags = self.tags();
        let mut tokens = scanners::split_words(text);
        for token in tokens.iter_mut() {
            if token.len() <= 3 {
                continue;
            }
            if token.starts_with('\\') {
                token.remove(0);
                continue;
            }
            let (kind, span) = words::word_type(token.as_bytes());
            if kind == WordKind::Unknown || span.is_empty() {
                continue;
            }
            let body = cleaned_span(&token.as_bytes()[span.clone()]);
            let replacement = match kind {
                WordKind::Uri | WordKind::UriFlanked | WordKind::Email => {
                    let target = if kind == WordKind::Email {
                        format!("mailto:{}", body)
                    } else {
                        body.clone()
                    };
                    let mut pair = String::new();
                    strings::escape_url_into(&mut pair, &target);
                    pair.push('\n');
                    pair.push_str(&target);
                    let built = self.build_link(Some(&body), Some(&pair), None);
                    self.protect(&built)
                }
                _ if auto_code => {
                    let wrapped =
                        format!("{}{}{}", tags.code_span_start, body, tags.code_span_end);
                    self.protect(&wrapped)
                }
                _ => continue,
            };
            let mut rebuilt = String::with_capacity(token.len() + replacement.len());
            rebuilt.push_str(&token[..span.start]);
            rebuilt.push_str(&replacement);
            rebuilt.push_str(&token[span.end..]);
            *token = rebuilt;
        }
        *text = tokens.concat();
    }
}

/// Deletes unescaped interior backslashes from a discovered span; they
/// escaped word separators during splitting.
fn cleaned_span(span: &[u8]) -> String {
    let mut out = Vec::with_capacity(span.len());
    let mut escaped = false;
    for (i, &b) in span.iter().enumerate() {
        if i + 1 == span.len() {
            out.push(b);
            break;
        }
        if b == b'\\' {
            escaped = !escaped;
            if escaped {
                continue;
            }
        }
        out.push(b);
        escaped = false;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// The URL-escaped half of a destination pair.
fn escaped_half(pair: &str) -> &str {
    pair.split_once('\n').map_or(pair, |(escaped, _)| escaped)
}

/// The verbatim half of a destination pair.
fn verbatim_half(pair: &str) -> &str {
    pair.split_once('\n').map_or(pair, |(_, verbatim)| verbatim)
}

fn link_html(text: Option<&str>, dest: Option<&str>, title: Option<&str>) -> String {
    let href = dest.map(escaped_half).unwrap_or("");
    match title {
        Some(t) => format!(
            "<a href=\"{}\" title=\"{}\">{}</a>",
            href,
            strings::escape_markup(t),
            text.unwrap_or("")
        ),
        None => format!("<a href=\"{}\">{}</a>", href, text.unwrap_or("")),
    }
}

fn link_text(text: Option<&str>, dest: Option<&str>, title: Option<&str>) -> String {
    let dest = dest.map(verbatim_half);
    let mut out = String::new();
    out.push_str(text.unwrap_or(""));
    if text.is_some() && dest.is_some() {
        out.push(' ');
    }
    if let Some(d) = dest {
        out.push('<');
        out.push_str(d);
        out.push('>');
    }
    if let Some(t) = title {
        if text.is_some() || dest.is_some() {
            out.push(' ');
        }
        out.push('(');
        out.push_str(t);
        out.push(')');
    }
    out
}

fn link_ansi(text: Option<&str>, dest: Option<&str>, title: Option<&str>) -> String {
    let dest = dest.map(verbatim_half);
    let mut out = format!("\x1b[1;93m{}\x1b[0m", text.unwrap_or(""));
    if text.is_some() {
        out.push(' ');
    }
    out.push_str("\x1b[4;32m");
    if let Some(d) = dest {
        out.push('<');
        out.push_str(d);
        out.push('>');
    }
    out.push_str("\x1b[0m");
    if let Some(t) = title {
        if text.is_some() || dest.is_some() {
            out.push(' ');
        }
        out.push_str("\x1b[37m(");
        out.push_str(t);
        out.push_str(")\x1b[0m");
    }
    out
}

fn image_text(text: Option<&str>, dest: Option<&str>, title: Option<&str>) -> String {
    let dest = dest.map(verbatim_half);
    let mut out = String::new();
    out.push_str(text.unwrap_or(""));
    if text.is_some() {
        out.push(' ');
    }
    match title {
        Some(t) => {
            if let Some(d) = dest {
                out.push('{');
                out.push_str(d);
                out.push('}');
            }
            if text.is_some() || dest.is_some() {
                out.push(' ');
            }
            out.push('(');
            out.push_str(t);
            out.push(')');
        }
        None => {
            if let Some(d) = dest {
                out.push('<');
                out.push_str(d);
                out.push('>');
            }
        }
    }
    out
}

fn image_ansi(text: Option<&str>, dest: Option<&str>, title: Option<&str>) -> String {
    let dest = dest.map(verbatim_half);
    let mut out = format!("\x1b[1;93m{}\x1b[0m", text.unwrap_or(""));
    if text.is_some() {
        out.push(' ');
    }
    out.push_str("\x1b[4;32m");
    if let Some(d) = dest {
        out.push('{');
        out.push_str(d);
        out.push('}');
    }
    out.push_str("\x1b[0m");
    if let Some(t) = title {
        if text.is_some() || dest.is_some() {
            out.push(' ');
        }
        out.push_str("\x1b[37m(");
        out.push_str(t);
        out.push_str(")\x1b[0m");
    }
    out
}
