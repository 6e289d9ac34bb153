//! Converts pulldown-cmark events into the parser unit queue.
//!
//! One handler per event kind.  Openers push a unit; closers push a matching
//! close unit carrying, as arguments, the exact end-tag text to use, so the
//! coda can special-case collapsing of adjacent closers.  Values unknown at
//! open time (link destinations, heading tags, ordinals, cell alignment)
//! travel as argument brackets merged down into the parent unit.

use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, Options as ParserOptions, Parser, Tag, TagEnd,
};

use crate::coda;
use crate::engine::Engine;
use crate::pua;
use crate::strings;
use crate::units::{UnitKind, UnitQueue};

/// Maximum tracked ordered/unordered list nesting depth.
pub(crate) const MAX_LIST_DEPTH: usize = 32;

pub(crate) fn run(engine: &mut Engine, text: &str) -> UnitQueue {
    let mut parser_options = ParserOptions::empty();
    parser_options.insert(ParserOptions::ENABLE_STRIKETHROUGH);
    if engine.options.extension.table {
        parser_options.insert(ParserOptions::ENABLE_TABLES);
    }
    let events: Vec<Event> = Parser::new_ext(text, parser_options).collect();
    let list_loose = scan_list_looseness(&events);

    let mut builder = Builder {
        e: engine,
        q: UnitQueue::default(),
        image_nesting: 0,
        li_level: -1,
        li_tight: 0,
        li_ordinal: [0; MAX_LIST_DEPTH],
        list_loose,
        next_list: 0,
        inside_table: false,
        in_table_head: false,
        pending_tbody: false,
        tbody_open: false,
        alignments: Vec::new(),
        column: 0,
    };
    // Stack bottom, corresponding to the start of the document.
    builder.q.push(UnitKind::Null, true, false, false);
    for event in events {
        builder.event(event);
    }
    builder.q
}

#[derive(Clone, Copy)]
enum Frame {
    List(usize),
    Item,
    Other,
}

/// pulldown-cmark encodes list tightness structurally: loose items wrap
/// their content in paragraph events.  One pre-scan recovers a per-list
/// flag from that shape.
fn scan_list_looseness(events: &[Event]) -> Vec<bool> {
    let mut loose = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    for event in events {
        match event {
            Event::Start(Tag::List(_)) => {
                stack.push(Frame::List(loose.len()));
                loose.push(false);
            }
            Event::Start(Tag::Item) => stack.push(Frame::Item),
            Event::Start(Tag::Paragraph) => {
                let n = stack.len();
                if n >= 2 {
                    if let (Frame::List(ix), Frame::Item) = (stack[n - 2], stack[n - 1]) {
                        loose[ix] = true;
                    }
                }
                stack.push(Frame::Other);
            }
            Event::Start(_) => stack.push(Frame::Other),
            Event::End(_) => {
                stack.pop();
            }
            _ => {}
        }
    }
    loose
}

fn heading_index(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

struct Builder<'e> {
    e: &'e mut Engine,
    q: UnitQueue,
    /// Depth of image labels; content inside a label renders as plain text.
    image_nesting: u32,
    li_level: i32,
    /// One bit per nesting level.
    li_tight: u64,
    li_ordinal: [i64; MAX_LIST_DEPTH],
    list_loose: Vec<bool>,
    next_list: usize,
    inside_table: bool,
    in_table_head: bool,
    pending_tbody: bool,
    tbody_open: bool,
    alignments: Vec<Alignment>,
    column: usize,
}

impl<'e> Builder<'e> {
    fn tags(&self) -> &'static crate::tags::TagSet {
        self.e.tags()
    }

    /// Grows the top unit's text.  An argument bracket materializes its
    /// buffer even for an empty write, so a sealed argument is `Some("")`
    /// rather than absent.
    fn emit(&mut self, s: &str) {
        let top = self.q.top();
        if top.kind == UnitKind::Arg || !s.is_empty() {
            top.append_text(s);
        }
    }

    fn begin_arg(&mut self) {
        self.q.push(UnitKind::Arg, true, false, false);
    }

    /// Coalesces the open argument bracket into the next argument of the
    /// unit below it.
    fn seal_arg(&mut self) {
        let unit = self.q.pop();
        debug_assert_eq!(unit.kind, UnitKind::Arg);
        let below = self.q.top();
        below.args.as_mut().expect("argument receiver").push(unit.text);
    }

    fn begin_arg_inlines(&mut self) {
        self.q.push(UnitKind::ArgInlines, true, false, false);
    }

    /// Coalesces everything above the open inlines bracket into one argument
    /// of the unit below it.  Nested images render and protect in place;
    /// links cannot nest inside a label, and code spans carry plain text.
    fn seal_arg_inlines(&mut self) {
        let mark = (0..self.q.len())
            .rev()
            .find(|&i| self.q[i].kind == UnitKind::ArgInlines)
            .expect("inlines bracket is open");
        let mut value: Option<String> = None;
        for i in mark..self.q.len() {
            if self.q[i].kind == UnitKind::Image {
                coda::render_link_unit(self.e, &mut self.q[i], true);
                let text = self.q[i].text.take().unwrap_or_default();
                let reference = self.e.protect(&text);
                self.q[i].text = Some(reference);
            }
            if let Some(text) = &self.q[i].text {
                value.get_or_insert_with(String::new).push_str(text);
            }
        }
        self.q.truncate(mark);
        let below = self.q.top();
        below.args.as_mut().expect("argument receiver").push(value);
    }

    fn event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(t) => self.text(&t),
            Event::Code(t) => self.code_span(&t),
            Event::Html(t) => self.block_html_text(&t),
            Event::InlineHtml(t) => self.inline_html(&t),
            Event::SoftBreak => {
                let soft = self.e.options.render.soft_break && self.image_nesting == 0;
                self.emit(if soft { "\n" } else { " " });
            }
            Event::HardBreak => {
                let s = if self.image_nesting == 0 { pua::BR_STR } else { " " };
                self.emit(s);
            }
            Event::Rule => self.rule(),
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        if let Tag::Image { .. } = tag {
            self.image_nesting += 1;
            if self.image_nesting > 1 {
                return;
            }
        } else if self.image_nesting > 0 {
            // Inside a label only text() content survives.
            return;
        }
        match tag {
            Tag::Paragraph => self.open_paragraph(),
            Tag::Heading { level, .. } => self.open_heading(heading_index(level)),
            Tag::BlockQuote(_) => {
                self.q.push(UnitKind::BlockQuote, true, false, false);
                let t = self.tags().blockquote_start;
                self.emit(t);
            }
            Tag::CodeBlock(kind) => self.open_code_block(&kind),
            Tag::HtmlBlock => {
                if self.e.html_output() {
                    self.q.push(UnitKind::HtmlBlock, true, false, false);
                }
            }
            Tag::List(start) => self.open_list(start),
            Tag::Item => self.open_item(),
            Tag::Table(alignments) => self.open_table(alignments),
            Tag::TableHead => self.open_table_head(),
            Tag::TableRow => self.open_table_row(),
            Tag::TableCell => self.open_table_cell(),
            Tag::Emphasis => self.emit(pua::EM_OPEN_STR),
            Tag::Strong => self.emit(pua::STRONG_OPEN_STR),
            Tag::Strikethrough => {
                let t = self.tags().strikethrough_start;
                self.emit(t);
            }
            Tag::Link {
                dest_url, title, ..
            } => self.open_link(&dest_url, &title),
            Tag::Image {
                dest_url, title, ..
            } => self.open_image(&dest_url, &title),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if let TagEnd::Image = tag {
            self.image_nesting -= 1;
            if self.image_nesting > 0 {
                return;
            }
            self.close_image();
            return;
        }
        if self.image_nesting > 0 {
            return;
        }
        match tag {
            TagEnd::Paragraph => self.close_paragraph(),
            TagEnd::Heading(level) => self.close_heading(heading_index(level)),
            TagEnd::BlockQuote(_) => {
                self.q.push(UnitKind::BlockQuote, false, true, false);
                let t = self.tags().blockquote_end;
                self.emit(t);
            }
            TagEnd::CodeBlock => self.close_code_block(),
            TagEnd::HtmlBlock => {
                if self.e.html_output() {
                    self.q.push(UnitKind::HtmlBlock, false, true, false);
                }
            }
            TagEnd::List(ordered) => self.close_list(ordered),
            TagEnd::Item => self.close_item(),
            TagEnd::Table => self.close_table(),
            TagEnd::TableHead => self.close_table_head(),
            TagEnd::TableRow => self.close_table_row(),
            TagEnd::TableCell => self.close_table_cell(),
            TagEnd::Emphasis => self.emit(pua::EM_CLOSE_STR),
            TagEnd::Strong => self.emit(pua::STRONG_CLOSE_STR),
            TagEnd::Strikethrough => {
                let t = self.tags().strikethrough_end;
                self.emit(t);
            }
            TagEnd::Link => self.close_link(),
            _ => {}
        }
    }

    fn text(&mut self, t: &str) {
        if self.e.escaping {
            let mut buf = String::with_capacity(t.len());
            strings::escape_html_into(&mut buf, t);
            self.emit(&buf);
        } else {
            self.emit(t);
        }
    }

    fn open_paragraph(&mut self) {
        // Imitate cmark's output in loose lists.
        if self.e.html_output() && self.q.below_top_is(&[UnitKind::Item], true, false) {
            self.emit("\n");
        }
        self.q.push(UnitKind::Paragraph, true, false, true);
        self.begin_arg();
        let t = self.tags().para_start;
        self.emit(t);
        self.seal_arg();
        // For inlines to come (auto-closing).
        self.q.push(UnitKind::Inlines, true, false, false);
    }

    fn close_paragraph(&mut self) {
        self.q.push(UnitKind::Paragraph, false, true, true);
        self.begin_arg();
        let t = self.tags().para_end;
        self.emit(t);
        self.seal_arg();
    }

    fn open_heading(&mut self, level: usize) {
        self.q.push(UnitKind::Heading, true, false, true);
        self.begin_arg();
        let t = self.tags().h_start[level - 1];
        self.emit(t);
        self.seal_arg();
        self.q.push(UnitKind::Inlines, true, false, false);
    }

    fn close_heading(&mut self, level: usize) {
        self.q.push(UnitKind::Heading, false, true, true);
        self.begin_arg();
        let t = self.tags().h_end[level - 1];
        self.emit(t);
        self.seal_arg();
    }

    fn open_code_block(&mut self, kind: &CodeBlockKind) {
        self.q.push(UnitKind::CodeBlock, true, false, false);
        let tags = self.tags();
        if self.e.html_output() {
            let mut open = String::from(tags.codeblock_start);
            if let CodeBlockKind::Fenced(info) = kind {
                if let Some(lang) = info.split_whitespace().next() {
                    open.push_str(" class=\"language-");
                    strings::escape_html_into(&mut open, lang);
                    open.push('"');
                }
            }
            open.push('>');
            self.emit(&open);
        } else {
            self.emit(tags.codeblock_start);
        }
    }

    fn close_code_block(&mut self) {
        // The end tag travels as an argument so the coda can reach the
        // opening unit's text without prying it open.
        self.q.push(UnitKind::CodeBlock, false, true, true);
        self.begin_arg();
        let t = self.tags().codeblock_end;
        self.emit(t);
        self.seal_arg();
    }

    fn block_html_text(&mut self, t: &str) {
        if !self.e.html_output() || self.image_nesting > 0 {
            return;
        }
        if self.q.top_is(&[UnitKind::HtmlBlock], true, false) {
            // Line inside a larger HTML block.
            self.emit(t);
        } else {
            self.inline_html(t);
        }
    }

    fn inline_html(&mut self, t: &str) {
        if !self.e.html_output() || self.image_nesting > 0 {
            return;
        }
        let is_inline = self.q.top_is(&[UnitKind::Inlines], true, false);
        self.q.push(UnitKind::RawHtml, false, false, false);
        self.emit(t);
        if is_inline {
            self.q.push(UnitKind::Inlines, true, false, false);
        }
    }

    fn code_span(&mut self, code: &str) {
        let normalized = strings::normalize_code(code);
        if self.image_nesting > 0 {
            self.text(&normalized);
            return;
        }
        self.q.push(UnitKind::CodeSpan, true, false, false);
        let tags = self.tags();
        self.emit(tags.code_span_start);
        self.text(&normalized);
        self.emit(tags.code_span_end);
        self.q.push(UnitKind::Inlines, true, false, false);
    }

    fn rule(&mut self) {
        self.q.push(UnitKind::Rule, true, true, false);
        let t = self.tags().rule;
        self.emit(t);
        if self.e.html_output() {
            let html5 = self.e.options.render.html5;
            self.emit(if html5 { ">\n" } else { " />\n" });
        }
    }

    fn open_list(&mut self, start: Option<u64>) {
        let loose = self.list_loose.get(self.next_list).copied().unwrap_or(false);
        self.next_list += 1;

        self.li_level += 1;
        let level = self.li_level.max(0) as usize;
        if !loose {
            self.li_tight |= 1 << (level as u32 % 64);
        }
        self.li_ordinal[level % MAX_LIST_DEPTH] = start.map_or(-1, |s| s as i64);

        let add_newline = !self.q.top_ends_line();
        let kind = if start.is_some() {
            UnitKind::OrderedList
        } else {
            UnitKind::BulletList
        };
        self.q.push(kind, true, false, false);
        if add_newline && self.li_level > 0 {
            self.emit("\n");
        }

        let tags = self.tags();
        match start {
            Some(start) if self.e.html_output() => {
                if start == 1 {
                    self.emit("<ol>\n");
                } else {
                    self.emit(&format!("<ol start=\"{}\">\n", start));
                }
            }
            Some(_) => self.emit(tags.olist_start),
            None => self.emit(tags.ulist_start),
        }
    }

    fn close_list(&mut self, ordered: bool) {
        let (kind, end) = if ordered {
            (UnitKind::OrderedList, self.tags().olist_end)
        } else {
            (UnitKind::BulletList, self.tags().ulist_end)
        };
        self.q.push(kind, false, true, false);
        self.emit(end);
        let level = self.li_level.max(0) as usize;
        self.li_tight &= !(1 << (level as u32 % 64));
        self.li_level -= 1;
    }

    fn open_item(&mut self) {
        let level = self.li_level.max(0) as usize;
        let ordinal = self.li_ordinal[level % MAX_LIST_DEPTH];
        if ordinal >= 0 {
            self.li_ordinal[level % MAX_LIST_DEPTH] += 1;
        }
        let tight = self.li_tight & (1 << (level as u32 % 64)) != 0;

        self.q.push(UnitKind::Item, true, false, true);

        self.begin_arg();
        let tags = self.tags();
        if self.e.html_output() {
            self.emit(tags.li_start[level % 2]);
        } else {
            if self.e.out_format().indents_list_items() {
                self.emit(&"  ".repeat(1 + level % MAX_LIST_DEPTH));
            }
            if ordinal >= 0 {
                self.emit(&format!("{}. ", ordinal));
            } else {
                self.emit(&format!("{} ", tags.li_start[level % 2]));
            }
        }
        self.seal_arg();

        self.begin_arg();
        self.emit(if tight { "T" } else { "F" });
        self.seal_arg();

        self.begin_arg();
        self.emit(&format!("{}", self.li_level + 1));
        self.seal_arg();

        self.begin_arg();
        self.emit(&format!("{}", ordinal));
        self.seal_arg();

        self.q.push(UnitKind::Inlines, true, false, false);
    }

    fn close_item(&mut self) {
        // Outside HTML, collapse runs of closers to preserve vertical space:
        // </p></li> in loose lists, </li></li> and </ol|ul></li> in nested
        // lists.
        let collapse = self.q.top_is(
            &[
                UnitKind::Paragraph,
                UnitKind::Item,
                UnitKind::OrderedList,
                UnitKind::BulletList,
            ],
            false,
            true,
        );
        self.q.push(UnitKind::Item, false, true, true);
        self.begin_arg();
        if self.e.html_output() || !collapse {
            let t = self.tags().li_end;
            self.emit(t);
        }
        self.seal_arg();
    }

    fn open_link(&mut self, dest: &str, title: &str) {
        self.q.push(UnitKind::Link, true, false, true);

        // Both spellings travel together: <url-escaped>\n<verbatim>.
        self.begin_arg();
        let mut pair = String::new();
        strings::escape_url_into(&mut pair, dest);
        pair.push('\n');
        pair.push_str(dest);
        self.emit(&pair);
        self.seal_arg();

        self.begin_arg();
        if !title.is_empty() {
            if self.e.escaping {
                let mut buf = String::new();
                strings::escape_html_into(&mut buf, title);
                self.emit(&buf);
            } else {
                self.emit(title);
            }
        }
        self.seal_arg();

        // The upcoming inlines are this span's text; the first byte records
        // whether the span sits inside a table, so the coda can compensate
        // column alignment.
        self.begin_arg_inlines();
        self.emit(if self.inside_table { "1" } else { "0" });
    }

    fn close_link(&mut self) {
        self.seal_arg_inlines();
        self.q.push(UnitKind::Inlines, true, false, false);
    }

    fn open_image(&mut self, dest: &str, title: &str) {
        self.q.push(UnitKind::Image, true, false, true);

        self.begin_arg();
        let mut pair = String::new();
        strings::escape_url_into(&mut pair, dest);
        pair.push('\n');
        pair.push_str(dest);
        self.emit(&pair);
        self.seal_arg();

        self.begin_arg();
        if !title.is_empty() {
            self.emit(title);
        }
        self.seal_arg();

        // Alt text flows into this argument as plain text; for nested
        // images it stays open until the outermost label closes.
        self.begin_arg();
        self.emit(if self.inside_table { "1" } else { "0" });
    }

    fn close_image(&mut self) {
        self.seal_arg();
        self.q.push(UnitKind::Inlines, true, false, false);
    }

    fn open_table(&mut self, alignments: Vec<Alignment>) {
        self.inside_table = true;
        self.alignments = alignments;
        self.pending_tbody = false;
        self.tbody_open = false;
        self.q.push(UnitKind::Table, true, false, true);
        let tags = self.tags();
        if self.e.html_output() {
            self.emit(tags.table_start);
        } else {
            // Placeholder for the serialized column widths.
            self.begin_arg();
            self.emit("");
            self.seal_arg();
            self.emit(tags.table_start);
        }
    }

    fn close_table(&mut self) {
        if self.tbody_open {
            self.table_body(false);
            self.tbody_open = false;
        }
        self.inside_table = false;
        self.q.push(UnitKind::Table, false, true, true);
        let t = self.tags().table_end;
        self.emit(t);
    }

    fn table_body(&mut self, open: bool) {
        self.q.push(UnitKind::TableBody, open, !open, true);
        let tags = self.tags();
        let tag = if open { tags.tbody_start } else { tags.tbody_end };
        if self.e.html_output() {
            self.emit(tag);
        } else {
            self.begin_arg();
            self.emit(tag);
            self.seal_arg();
        }
    }

    fn open_table_head(&mut self) {
        self.column = 0;
        self.in_table_head = true;
        self.q.push(UnitKind::TableHead, true, false, true);
        let tags = self.tags();
        self.emit(tags.thead_start);
        self.q.push(UnitKind::TableRow, true, false, true);
        self.emit(tags.tr_start);
    }

    fn close_table_head(&mut self) {
        let tags = self.tags();
        self.q.push(UnitKind::TableRow, false, true, true);
        self.emit(tags.tr_end);
        self.q.push(UnitKind::TableHead, false, true, true);
        self.emit(tags.thead_end);
        self.in_table_head = false;
        // A body element materializes only if rows follow.
        self.pending_tbody = true;
    }

    fn open_table_row(&mut self) {
        if self.pending_tbody {
            self.table_body(true);
            self.pending_tbody = false;
            self.tbody_open = true;
        }
        self.column = 0;
        self.q.push(UnitKind::TableRow, true, false, true);
        let t = self.tags().tr_start;
        self.emit(t);
    }

    fn close_table_row(&mut self) {
        self.q.push(UnitKind::TableRow, false, true, true);
        let t = self.tags().tr_end;
        self.emit(t);
    }

    fn open_table_cell(&mut self) {
        let align = self
            .alignments
            .get(self.column)
            .copied()
            .unwrap_or(Alignment::None);
        self.column += 1;
        let kind = if self.in_table_head {
            UnitKind::HeadCell
        } else {
            UnitKind::DataCell
        };
        self.q.push(kind, true, false, true);
        let tags = self.tags();
        let stem = if kind == UnitKind::HeadCell {
            tags.th_start
        } else {
            tags.td_start
        };
        if self.e.html_output() {
            let attr = match align {
                Alignment::Left => " align=\"left\"",
                Alignment::Center => " align=\"center\"",
                Alignment::Right => " align=\"right\"",
                Alignment::None => "",
            };
            self.emit(&format!("{}{}>", stem, attr));
        } else {
            // Prefix the cell with its alignment as one ASCII byte; this
            // also keeps empty cells from sinking before they reach the
            // queue.
            self.emit(match align {
                Alignment::None => "N",
                Alignment::Left => "L",
                Alignment::Center => "C",
                Alignment::Right => "R",
            });
            self.begin_arg();
            self.emit(stem);
            self.seal_arg();
        }
    }

    fn close_table_cell(&mut self) {
        let kind = if self.in_table_head {
            UnitKind::HeadCell
        } else {
            UnitKind::DataCell
        };
        self.q.push(kind, false, true, true);
        let tags = self.tags();
        let t = if kind == UnitKind::HeadCell {
            tags.th_end
        } else {
            tags.td_end
        };
        self.emit(t);
    }
}
