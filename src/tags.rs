//! Per-format literal markup tables and the embedded metadata accessor.

/// Output encodings the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// ANSI CSI escape text, imitating lowdown's palette.
    Ansi,
    /// Linux console / vt100 escape text.
    Tty,
    /// Plain text.
    Text,
    /// Pango markup for a GUI text widget.
    Pango,
    /// HTML fragment (XHTML void elements unless the HTML5 tweak is on).
    Html,
}

impl Format {
    /// Whether list items are rendered with leading indentation.
    pub fn indents_list_items(self) -> bool {
        matches!(self, Format::Ansi | Format::Text | Format::Tty)
    }

    pub(crate) fn tags(self) -> &'static TagSet {
        match self {
            Format::Ansi => &ANSI_TAGS,
            Format::Tty => &TTY_TAGS,
            Format::Text => &TEXT_TAGS,
            Format::Pango => &PANGO_TAGS,
            Format::Html => &HTML_TAGS,
        }
    }
}

/// Raw HTML replacement when the unsafe-HTML tweak is off, as cmark does.
pub const SAFE_HTML: &str = "<!-- raw HTML omitted -->";

/// Literal start/end markup for every construct of one output format.
///
/// The HTML `rule`, `br`, `codeblock_start` and cell stems intentionally lack
/// their closing `>`: the builder appends attributes (void-element spelling,
/// code language class, cell alignment) before closing them.
pub(crate) struct TagSet {
    pub blockquote_start: &'static str,
    pub blockquote_end: &'static str,
    pub olist_start: &'static str,
    pub olist_end: &'static str,
    /// Alternating even/odd list bullets.
    pub li_start: [&'static str; 2],
    pub li_end: &'static str,
    pub em_start: &'static str,
    pub em_end: &'static str,
    pub strong_start: &'static str,
    pub strong_end: &'static str,
    pub code_span_start: &'static str,
    pub code_span_end: &'static str,
    pub codeblock_start: &'static str,
    pub codeblock_end: &'static str,
    pub strikethrough_start: &'static str,
    pub strikethrough_end: &'static str,
    pub h_start: [&'static str; 6],
    pub h_end: [&'static str; 6],
    pub ulist_start: &'static str,
    pub ulist_end: &'static str,
    pub rule: &'static str,
    pub para_start: &'static str,
    pub para_end: &'static str,
    pub br: &'static str,
    pub table_start: &'static str,
    pub table_end: &'static str,
    pub thead_start: &'static str,
    pub thead_end: &'static str,
    pub tbody_start: &'static str,
    pub tbody_end: &'static str,
    pub tr_start: &'static str,
    pub tr_end: &'static str,
    pub th_start: &'static str,
    pub th_end: &'static str,
    pub td_start: &'static str,
    pub td_end: &'static str,
}

pub(crate) const STYLE_PANGO_URL: &str = "fgcolor=\"#048\" underline=\"single\"";
pub(crate) const STYLE_PANGO_IMAGE: &str = "underline=\"double\"";

static PANGO_TAGS: TagSet = TagSet {
    em_start: "<i>",
    em_end: "</i>",
    strong_start: "<b>",
    strong_end: "</b>",
    code_span_start: "<tt><span fgcolor=\"#B56\">",
    code_span_end: "</span></tt>",
    codeblock_start: "<tt><span bgcolor=\"#FFF\" fgcolor=\"#B56\">",
    codeblock_end: "</span></tt>\n",
    strikethrough_start: "<s>",
    strikethrough_end: "</s>",
    h_start: [
        "<b><span fgcolor=\"#444\" size=\"200%\">",
        "<b><span fgcolor=\"#444\" size=\"150%\">",
        "<b><span fgcolor=\"#444\" size=\"117%\">",
        "<b><span fgcolor=\"#000\" size=\"100%\" variant=\"smallcaps\">",
        "<b><span fgcolor=\"#000\" size=\"83%\">",
        "<b><span fgcolor=\"#000\" size=\"67%\">",
    ],
    h_end: [
        "</span></b>\n",
        "</span></b>\n",
        "</span></b>\n",
        "</span></b>\n",
        "</span></b>\n",
        "</span></b>\n",
    ],
    // U+250C / U+2514 markers; NO newlines, closers can collapse.
    blockquote_start: "<span fgcolor=\"silver\">\u{250C}   </span>",
    blockquote_end: "<span fgcolor=\"silver\">\u{2514}</span>",
    olist_start: "",
    olist_end: "",
    ulist_start: "",
    ulist_end: "",
    li_start: ["\u{2022}", "\u{25E6}"],
    li_end: "\n",
    rule: "\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\u{23AF}\n",
    para_start: "",
    para_end: "\n",
    br: "\n",
    table_start: "<tt><span bgcolor=\"#FBFBFB\" fgcolor=\"#EBEBEB\" size=\"108%\">",
    table_end: "</span></tt>\n",
    thead_start: "<tt><span bgcolor=\"#F4F4FF\" fgcolor=\"#E4E4E4\">",
    thead_end: "</span></tt>",
    tbody_start: "",
    tbody_end: "",
    tr_start: "",
    tr_end: "\u{2502}\n",
    th_start: "\u{2502}<span bgcolor=\"#F4F4F4\" fgcolor=\"#222\" weight=\"bold\"> ",
    th_end: " </span>",
    td_start: "\u{2502}<span bgcolor=\"#FBFBFB\" fgcolor=\"#000\"> ",
    td_end: " </span>",
};

static HTML_TAGS: TagSet = TagSet {
    em_start: "<em>",
    em_end: "</em>",
    strong_start: "<strong>",
    strong_end: "</strong>",
    code_span_start: "<code>",
    code_span_end: "</code>",
    codeblock_start: "<pre><code",
    codeblock_end: "</code></pre>\n",
    strikethrough_start: "<del>",
    strikethrough_end: "</del>",
    h_start: ["<h1>", "<h2>", "<h3>", "<h4>", "<h5>", "<h6>"],
    h_end: [
        "</h1>\n",
        "</h2>\n",
        "</h3>\n",
        "</h4>\n",
        "</h5>\n",
        "</h6>\n",
    ],
    blockquote_start: "<blockquote>\n",
    blockquote_end: "</blockquote>\n",
    olist_start: "",
    olist_end: "</ol>\n",
    ulist_start: "<ul>\n",
    ulist_end: "</ul>\n",
    li_start: ["<li>", "<li>"],
    li_end: "</li>\n",
    rule: "<hr",
    para_start: "<p>",
    para_end: "</p>\n",
    br: "<br",
    table_start: "<table>\n",
    table_end: "</table>\n",
    thead_start: "<thead>\n",
    thead_end: "</thead>\n",
    tbody_start: "<tbody>\n",
    tbody_end: "</tbody>\n",
    tr_start: "<tr>\n",
    tr_end: "</tr>\n",
    th_start: "<th",
    th_end: "</th>\n",
    td_start: "<td",
    td_end: "</td>\n",
};

static TTY_TAGS: TagSet = TagSet {
    em_start: "\x1b[4m",
    em_end: "\x1b[0m",
    strong_start: "\x1b[1m",
    strong_end: "\x1b[0m",
    code_span_start: "\x1b[36m",
    code_span_end: "\x1b[39m",
    codeblock_start: "\x1b[36m",
    codeblock_end: "\x1b[39m\n",
    strikethrough_start: "--",
    strikethrough_end: "--",
    h_start: [
        "\x1b[7;1m",
        "\x1b[7m",
        "\x1b[1m",
        "\x1b[1m",
        "\x1b[1m",
        "\x1b[1m",
    ],
    h_end: [
        "\x1b[27;21m\n",
        "\x1b[27m\n",
        "\x1b[21m\n",
        "\x1b[21m\n",
        "\x1b[21m\n",
        "\x1b[21m\n",
    ],
    blockquote_start: "\x1b[1m>",
    blockquote_end: "\x1b[21m\n",
    olist_start: "",
    olist_end: "",
    ulist_start: "",
    ulist_end: "",
    li_start: ["*", "-"],
    li_end: "\n",
    rule: " -----\n",
    para_start: "",
    para_end: "\n",
    br: "\n",
    table_start: "",
    table_end: "",
    thead_start: "",
    thead_end: "",
    tbody_start: "",
    tbody_end: "",
    tr_start: "",
    tr_end: "\u{2502}\n",
    th_start: "\u{2502} ",
    th_end: " ",
    td_start: "\u{2502} ",
    td_end: " ",
};

// Unlike vt100, ANSI CSI reset is all-or-nothing.
static ANSI_TAGS: TagSet = TagSet {
    em_start: "\x1b[3m",
    em_end: "\x1b[0m",
    strong_start: "\x1b[1m",
    strong_end: "\x1b[0m",
    code_span_start: "\x1b[1;94m",
    code_span_end: "\x1b[0m",
    codeblock_start: "\x1b[1;94m",
    codeblock_end: "\x1b[0m\n",
    strikethrough_start: "--",
    strikethrough_end: "--",
    h_start: [
        "\x1b[1;91m",
        "\x1b[1;36m",
        "\x1b[1;36m",
        "\x1b[1;36m",
        "\x1b[1;36m",
        "\x1b[1;36m",
    ],
    h_end: [
        "\x1b[0m\n",
        "\x1b[0m\n",
        "\x1b[0m\n",
        "\x1b[0m\n",
        "\x1b[0m\n",
        "\x1b[0m\n",
    ],
    blockquote_start: "\x1b[1;36m>",
    blockquote_end: "\x1b[0m\n",
    olist_start: "",
    olist_end: "",
    ulist_start: "",
    ulist_end: "",
    li_start: ["\x1b[93m*\x1b[0m", "\x1b[93m-\x1b[0m"],
    li_end: "\n",
    rule: " \x1b[93m-----\x1b[0m\n",
    para_start: "",
    para_end: "\n",
    br: "\n",
    table_start: "",
    table_end: "",
    thead_start: "",
    thead_end: "",
    tbody_start: "",
    tbody_end: "",
    tr_start: "",
    tr_end: "\u{2502}\n",
    th_start: "\u{2502} ",
    th_end: " ",
    td_start: "\u{2502} ",
    td_end: " ",
};

static TEXT_TAGS: TagSet = TagSet {
    em_start: "",
    em_end: "",
    strong_start: "",
    strong_end: "",
    code_span_start: "",
    code_span_end: "",
    codeblock_start: "",
    codeblock_end: "\n",
    strikethrough_start: "",
    strikethrough_end: "",
    h_start: ["[", "-", "~", "|", "{", "<"],
    h_end: ["]\n", "-\n", "~\n", "|\n", "}\n", ">\n"],
    blockquote_start: ">",
    blockquote_end: "",
    olist_start: "",
    olist_end: "",
    ulist_start: "",
    ulist_end: "",
    li_start: ["*", "-"],
    li_end: "\n",
    rule: " -----\n",
    para_start: "",
    para_end: "\n",
    br: "\n",
    table_start: "",
    table_end: "",
    thead_start: "",
    thead_end: "",
    tbody_start: "",
    tbody_end: "",
    tr_start: "",
    tr_end: "\u{2502}\n",
    th_start: "\u{2502} ",
    th_end: " ",
    td_start: "\u{2502} ",
    td_end: " ",
};

/// The positional metadata fields embedded in Pango-format tags.
///
/// The GUI collaborator recovers document structure from the rendered markup
/// through these fields alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagInfo {
    /// Link destination table id.
    DestLinkUriId,
    /// Rendered link text length in characters.
    DestLinkTextLen,
    /// Image path table id.
    DestImagePathId,
    /// Blockquote nesting level.
    BlockquoteLevel,
    /// 1 on a blockquote opener, 0 on a closer.
    BlockquoteOpen,
    /// Ordered/unordered list nesting level.
    ListLevel,
    /// List item nesting level.
    ItemLevel,
    /// List item ordinal; negative for unordered lists.
    ItemOrdinal,
    /// Bullet length in characters.
    ItemBulletLen,
    /// Unique list item id.
    ItemId,
}

pub(crate) fn info_token(subject: TagInfo) -> &'static str {
    match subject {
        TagInfo::DestLinkUriId => "dest=Lu",
        TagInfo::DestLinkTextLen => "dest=Tl",
        TagInfo::DestImagePathId => "dest=Ip",
        TagInfo::BlockquoteLevel => "blckqtLvl=",
        TagInfo::BlockquoteOpen => "blckqtOpn=",
        TagInfo::ListLevel => "olUlLvl=",
        TagInfo::ItemLevel => "liLvl=",
        TagInfo::ItemOrdinal => "liOrd=",
        TagInfo::ItemBulletLen => "liBLen=",
        TagInfo::ItemId => "liId=",
    }
}

/// Parses `subject`'s value out of a rendered Pango "font" tag.
///
/// Returns -1 when the tag does not carry the field.
///
/// ```rust
/// use polymark::{tag_info, TagInfo};
/// let tag = "font=\"@dest=Lu1dest=Tl5\"";
/// assert_eq!(tag_info(tag, TagInfo::DestLinkUriId), 1);
/// assert_eq!(tag_info(tag, TagInfo::DestLinkTextLen), 5);
/// assert_eq!(tag_info(tag, TagInfo::DestImagePathId), -1);
/// ```
pub fn tag_info(tag: &str, subject: TagInfo) -> i32 {
    let token = info_token(subject);
    match tag.find(token) {
        Some(p) => {
            let rest = &tag[p + token.len()..];
            let end = rest
                .char_indices()
                .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && c == '-'))
                .map(|(i, c)| i + c.len_utf8())
                .last()
                .unwrap_or(0);
            rest[..end].parse().unwrap_or(0)
        }
        None => -1,
    }
}
