//! Configuration for the conversion pipeline.

/// Umbrella options struct.
#[derive(Default, Debug, Clone)]
pub struct Options {
    /// Enable markdown extensions.
    pub extension: ExtensionOptions,

    /// Configure render-time tweaks.
    pub render: RenderOptions,
}

/// Options to select extensions.
#[derive(Default, Debug, Clone)]
pub struct ExtensionOptions {
    /// Renders a document that starts with `#!` and an interpreter path as
    /// one code block, by fencing the whole file.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// options.extension.shebang = true;
    /// assert_eq!(markdown_to("#!/bin/sh\necho hi\n", Format::Text, &options),
    ///            "#!/bin/sh\necho hi");
    /// ```
    pub shebang: bool,

    /// Replaces dumb quote pairs and `--` with their typographic forms.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// options.extension.smart_text = true;
    /// assert_eq!(markdown_to("\"hello\"\n", Format::Html, &options),
    ///            "<p>\u{201C}hello\u{201D}</p>");
    /// ```
    pub smart_text: bool,

    /// Discovers code-like words (paths, identifiers, bug references...) and
    /// renders them as code spans; URLs and email addresses become links.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// options.extension.auto_code = true;
    /// assert_eq!(markdown_to("run FOO_BAR now\n", Format::Html, &options),
    ///            "<p>run <code>FOO_BAR</code> now</p>");
    /// ```
    pub auto_code: bool,

    /// Renders unmarked URLs and email addresses as links.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// options.extension.permissive_autolinks = true;
    /// assert_eq!(markdown_to("See http://x.io now\n", Format::Html, &options),
    ///            "<p>See <a href=\"http://x.io\">http://x.io</a> now</p>");
    /// ```
    pub permissive_autolinks: bool,

    /// Recorded for the viewer collaborator: prefer opening
    /// `File.$LANG.ext` over `File.ext`.  Has no effect on conversion.
    pub auto_lang: bool,

    /// Enables markdown tables.  Outside HTML output, cell contents are
    /// measured and justified for a monospace rendering context.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// options.extension.table = true;
    /// assert_eq!(markdown_to("| a |\n|---|\n| b |\n", Format::Html, &options),
    ///            concat!("<table>\n<thead>\n<tr>\n<th>a</th>\n</tr>\n</thead>\n",
    ///                    "<tbody>\n<tr>\n<td>b</td>\n</tr>\n</tbody>\n</table>"));
    /// ```
    pub table: bool,
}

/// Options for render-time tweaks.
#[derive(Default, Debug, Clone)]
pub struct RenderOptions {
    /// Keeps the trailing blank line at the end of a fenced code block, the
    /// way cmark spells it.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// assert_eq!(markdown_to("```\nx\n```\n", Format::Html, &options),
    ///            "<pre><code>x</code></pre>");
    /// options.render.code_block_end = true;
    /// assert_eq!(markdown_to("```\nx\n```\n", Format::Html, &options),
    ///            "<pre><code>x\n</code></pre>");
    /// ```
    pub code_block_end: bool,

    /// Includes raw HTML in HTML output instead of the safety comment.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// assert_eq!(markdown_to("hello <b>world</b>\n", Format::Html, &options),
    ///            "<p>hello <!-- raw HTML omitted -->world<!-- raw HTML omitted --></p>");
    /// options.render.unsafe_html = true;
    /// assert_eq!(markdown_to("hello <b>world</b>\n", Format::Html, &options),
    ///            "<p>hello <b>world</b></p>");
    /// ```
    pub unsafe_html: bool,

    /// Renders soft breaks as new lines.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// assert_eq!(markdown_to("a\nb\n", Format::Html, &options), "<p>a b</p>");
    /// options.render.soft_break = true;
    /// assert_eq!(markdown_to("a\nb\n", Format::Html, &options), "<p>a\nb</p>");
    /// ```
    pub soft_break: bool,

    /// HTML5 void-element spelling instead of the default XHTML.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// assert_eq!(markdown_to("---\n", Format::Html, &options), "<hr />");
    /// options.render.html5 = true;
    /// assert_eq!(markdown_to("---\n", Format::Html, &options), "<hr>");
    /// ```
    pub html5: bool,

    /// Escapes `&<>"` in any output format, not only HTML.
    ///
    /// ```rust
    /// # use polymark::{markdown_to, Format, Options};
    /// let mut options = Options::default();
    /// options.render.escape = true;
    /// assert_eq!(markdown_to("1 < 2\n", Format::Text, &options), "1 &lt; 2");
    /// ```
    pub escape: bool,
}
