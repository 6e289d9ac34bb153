//! A markdown rendering pipeline with five output encodings.
//!
//! polymark consumes the event stream of a CommonMark parser
//! (pulldown-cmark) and renders it as ANSI escape text, vt100/tty escape
//! text, plain text, a Pango markup dialect for GUI text widgets, or an
//! HTML fragment — all through one shared multi-pass algorithm.
//!
//! The Pango output embeds positional metadata (link ids, nesting levels,
//! list ordinals) that a text widget recovers with [`tag_info`] and
//! [`Engine::link_dest`] instead of re-parsing the document.
//!
//! ```rust
//! use polymark::{markdown_to, Format, Options};
//!
//! let mut options = Options::default();
//! options.extension.smart_text = true;
//! assert_eq!(
//!     markdown_to("Hello -- *world*\n", Format::Html, &options),
//!     "<p>Hello \u{2014} <em>world</em></p>",
//! );
//! ```

#![deny(missing_docs)]
#![allow(clippy::collapsible_if, clippy::too_many_arguments)]

mod builder;
mod coda;
mod engine;
mod options;
mod protect;
mod pua;
mod scanners;
mod strings;
mod tags;
#[cfg(test)]
mod tests;
mod units;
mod words;

pub use engine::{Engine, Error};
pub use options::{ExtensionOptions, Options, RenderOptions};
pub use pua::PANGO_EMPTY_SPAN;
pub use tags::{tag_info, Format, TagInfo, SAFE_HTML};

/// One-shot conversion of `markdown` to `format` with the given options.
///
/// For repeated conversions, or when the Pango metadata accessors are
/// needed afterwards, hold an [`Engine`] instead.
pub fn markdown_to(markdown: &str, format: Format, options: &Options) -> String {
    let mut engine = Engine::new(options.clone());
    engine.set_format(format);
    engine.convert(markdown).expect("format is set")
}
