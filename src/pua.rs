//! Reserved Unicode private-use codepoints spliced into working text.
//!
//! The pipeline stands in hard breaks, emphasis brackets, escaped HTML
//! characters and protection tokens with PUA codepoints so that the text
//! transform passes cannot confuse them with document content.  Input
//! markdown must not contain these codepoints.

/// Hard line break (two trailing spaces in the source).
pub(crate) const BR: char = '\u{F600}';

/// Delimits a protection token for stashed code spans and sundries.
pub(crate) const CODE: char = '\u{F601}';

/// Delimits a reference into the link/image destination table.
pub(crate) const LINK: char = '\u{F602}';

/// `<em>`
pub(crate) const EM_OPEN: char = '\u{F608}';
/// `</em>`
pub(crate) const EM_CLOSE: char = '\u{F609}';
/// `<strong>`
pub(crate) const STRONG_OPEN: char = '\u{F60A}';
/// `</strong>`
pub(crate) const STRONG_CLOSE: char = '\u{F60B}';

/// `&amp;`
pub(crate) const AMP: char = '\u{F60C}';
/// `&lt;`
pub(crate) const LT: char = '\u{F60D}';
/// `&gt;`
pub(crate) const GT: char = '\u{F60E}';
/// `&quot;`
pub(crate) const QUOT: char = '\u{F60F}';

/// Filler for Pango `<span>`s that exist for structural reasons only.
///
/// The Pango renderer inserts spans to carry blockquote and list nesting
/// metadata.  Spans containing this codepoint carry no content of their own;
/// the application should render them empty after decoding the metadata.
pub const PANGO_EMPTY_SPAN: char = '\u{F610}';

pub(crate) const BR_STR: &str = "\u{F600}";
pub(crate) const EM_OPEN_STR: &str = "\u{F608}";
pub(crate) const EM_CLOSE_STR: &str = "\u{F609}";
pub(crate) const STRONG_OPEN_STR: &str = "\u{F60A}";
pub(crate) const STRONG_CLOSE_STR: &str = "\u{F60B}";
