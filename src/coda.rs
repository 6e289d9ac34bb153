//! The rendering coda: a fixed sequence of passes over the completed unit
//! queue.  Order matters; each pass assumes invariants established by the
//! earlier ones.  Structural mismatches here are programming errors in the
//! builder, never a property of the document, and assert unconditionally.

use crate::engine::Engine;
use crate::pua;
use crate::strings;
use crate::tags::{Format, SAFE_HTML};
use crate::units::{Unit, UnitKind, UnitQueue};

pub(crate) fn run(e: &mut Engine, q: &mut UnitQueue) {
    consolidate(e, q);
    collapse_blocks(e, q);
    if e.out_format() == Format::Pango && q.seen & UnitKind::BlockQuote.bit() != 0 {
        elide_quote_pairs(q);
    }
    let do_tables = e.options.extension.table
        && e.out_format() != Format::Html
        && q.seen & UnitKind::Table.bit() != 0;
    if do_tables {
        measure_tables(e, q);
        justify_tables(q);
    }
    transform_blocks(e, q);
}

/// First pass: raw HTML is protected (or replaced by the safety comment),
/// argument-bearing inline spans render through the format builders, code
/// spans and code blocks seal their text against later transforms.
fn consolidate(e: &mut Engine, q: &mut UnitQueue) {
    for i in 0..q.len() {
        match q[i].kind {
            // Raw HTML stands for an inline tag or one line of a larger
            // block; it only reaches the queue in HTML output mode.
            UnitKind::HtmlBlock | UnitKind::RawHtml => {
                if q[i].kind == UnitKind::HtmlBlock && q[i].close {
                    continue;
                }
                let unsafe_html = e.options.render.unsafe_html;
                let text = q[i].text.take().unwrap_or_default();
                let mut protected = if unsafe_html {
                    e.protect(&text)
                } else {
                    e.protect(SAFE_HTML)
                };
                if q[i].kind == UnitKind::HtmlBlock && !unsafe_html {
                    protected.push('\n');
                }
                q[i].text = Some(protected);
            }

            UnitKind::Link => render_link_unit(e, &mut q[i], false),
            UnitKind::Image => render_link_unit(e, &mut q[i], true),

            UnitKind::CodeSpan => {
                let text = q[i].text.take().unwrap_or_default();
                q[i].text = Some(e.protect(&text));
            }

            UnitKind::CodeBlock => {
                if q[i].open {
                    if !e.options.render.code_block_end {
                        if let Some(text) = &mut q[i].text {
                            if text.ends_with('\n') {
                                text.pop();
                            }
                        }
                    }
                } else {
                    assert!(q[i].text.is_none());
                    assert_eq!(q[i].arg_count(), 1);
                    let end_tag = q[i].arg(0).unwrap_or("").to_string();
                    q[i].consume();
                    // The opening unit sits right below; all code text
                    // accrued there.
                    let j = i - 1;
                    assert!(q[j].kind == UnitKind::CodeBlock && q[j].open);
                    if q[j].text.is_none() {
                        assert_eq!(e.out_format(), Format::Text);
                        q[j].text = Some(String::new());
                    }
                    q[j].append_text(&end_tag);
                    let text = q[j].text.take().expect("code block text");
                    q[j].text = Some(e.protect(&text));
                }
            }

            _ => {}
        }
    }
}

/// Renders a link or image span from its three arguments (destination,
/// title, bracketed text), protects the result and stores it as the unit's
/// text.  The coda calls this for top-level spans; the builder calls it
/// early for images nested inside a link label.
pub(crate) fn render_link_unit(e: &mut Engine, unit: &mut Unit, image: bool) {
    assert_eq!(unit.arg_count(), 3);
    let dest = unit.arg(0).map(str::to_string);
    let title = unit.arg(1).map(str::to_string);
    let text = unit.arg(2).expect("span text argument").to_string();

    // The first byte records whether the span sits inside a table.
    let mut chars = text.chars();
    e.inside_table = chars.next() == Some('1');
    let mut body = chars.as_str().to_string();
    if !body.is_empty() && e.options.extension.smart_text {
        strings::smart_text(&mut body, e.escaping);
    }
    let body = if body.is_empty() { None } else { Some(body.as_str()) };
    let rendered = if image {
        e.build_image(body, dest.as_deref(), title.as_deref())
    } else {
        e.build_link(body, dest.as_deref(), title.as_deref())
    };
    unit.text = Some(e.protect(&rendered));
    e.inside_table = false;
}

/// Harvests inline unit text into the opening block units.  Between an
/// opening block unit and its closer sits a mix of inline spans, text and
/// raw HTML references; their text concatenates onto the opener and the
/// emptied units junk.  List items delegate to contained paragraphs when
/// the list is loose.
fn collapse_blocks(e: &mut Engine, q: &mut UnitQueue) {
    let mut i = 0;
    while i < q.len() {
        match q[i].kind {
            UnitKind::Heading | UnitKind::Paragraph if q[i].open => {
                let kind = q[i].kind;
                assert_eq!(q[i].arg_count(), 1);
                assert!(q[i].text.is_none());
                let mut j = i + 1;
                let mut closer = None;
                while j < q.len() {
                    if q[j].kind == kind && q[j].close {
                        closer = Some(j);
                        break;
                    }
                    if q[j].kind != UnitKind::Junk {
                        if let Some(text) = q[j].text.take() {
                            if !text.is_empty() {
                                q[i].append_text(&text);
                            }
                        }
                        q[j].consume();
                    }
                    j += 1;
                }
                if let Some(c) = closer {
                    if e.out_format() == Format::Html {
                        assert!(q[c].text.is_none());
                        assert_eq!(q[c].arg_count(), 1);
                    }
                    // Markdown doesn't produce empty paragraphs.
                    if kind == UnitKind::Paragraph && q[i].text.is_none() {
                        q[i].consume();
                        q[c].consume();
                    }
                }
                i = j;
            }

            UnitKind::Item if q[i].open => {
                assert_eq!(q[i].arg_count(), 4);
                assert!(q[i].text.is_none());
                let tight = q[i].arg(1) == Some("T");
                if tight {
                    // Harvest up to the closer or the start of a sub-list.
                    q[i].text = Some(String::new());
                    let mut j = i + 1;
                    while j < q.len() {
                        if (q[j].kind == UnitKind::Item && q[j].close)
                            || ((q[j].kind == UnitKind::OrderedList
                                || q[j].kind == UnitKind::BulletList)
                                && q[j].open)
                        {
                            break;
                        }
                        if q[j].kind != UnitKind::Junk {
                            if let Some(text) = q[j].text.clone() {
                                if !text.is_empty() {
                                    q[i].append_text(&text);
                                }
                            }
                        }
                        // Container blocks don't consume each other.
                        if q[j].kind != UnitKind::BlockQuote {
                            q[j].consume();
                        }
                        j += 1;
                    }
                    if j < q.len() && q[j].kind == UnitKind::Item {
                        assert!(q[j].text.is_none());
                        assert_eq!(q[j].arg_count(), 1);
                    }
                    i = j;
                }
            }

            UnitKind::HeadCell | UnitKind::DataCell if q[i].open => {
                let kind = q[i].kind;
                if e.out_format() != Format::Html {
                    assert_eq!(q[i].arg_count(), 1);
                }
                let mut j = i + 1;
                while j < q.len() {
                    if q[j].kind == kind && q[j].close {
                        break;
                    }
                    if q[j].kind != UnitKind::Junk {
                        if let Some(text) = q[j].text.take() {
                            if !text.is_empty() {
                                q[i].append_text(&text);
                            }
                        }
                    }
                    q[j].consume();
                    j += 1;
                }
                i = j;
            }

            _ => {}
        }
        i += 1;
    }
}

/// Pango only: a closing blockquote immediately followed (modulo junk) by
/// an opening one is a no-visual-effect transition.  Both junk; the level
/// metadata emitted downstream compensates for the lost structure.
fn elide_quote_pairs(q: &mut UnitQueue) {
    let mut i = 0;
    while i < q.len() {
        if q[i].kind == UnitKind::BlockQuote && q[i].close {
            let mut j = i + 1;
            while j < q.len() && q[j].kind == UnitKind::Junk {
                j += 1;
            }
            if j < q.len() && q[j].kind == UnitKind::BlockQuote && q[j].open {
                q[i].consume();
                q[j].consume();
                // Backtrack to reassess the enclosing container.
                i = i.saturating_sub(1);
                continue;
            }
        }
        i += 1;
    }
}

/// Walks cells computing each one's rendered display width and serializes
/// the per-column maxima onto the table's opening unit.  Widths assume a
/// monospace rendering context; that approximation is deliberate.
fn measure_tables(e: &mut Engine, q: &mut UnitQueue) {
    let mut widths: Vec<usize> = Vec::new();
    let mut open_index = 0;
    let mut column = 0;
    for i in 0..q.len() {
        match q[i].kind {
            UnitKind::Table if q[i].open => {
                widths.clear();
                open_index = i;
            }
            UnitKind::Table => {
                let serialized: String = widths.iter().map(|w| format!("{} ", w)).collect();
                q[open_index].args.as_mut().expect("width placeholder")[0] = Some(serialized);
            }
            UnitKind::TableRow if q[i].open => column = 0,
            UnitKind::HeadCell | UnitKind::DataCell if q[i].open => {
                // The cell text is {N,L,C,R} followed by the content, which
                // may hold protected references; measure what will render.
                let text = q[i].text.clone().expect("cell text");
                assert!(!text.is_empty());
                let mut released = text;
                e.release_protected_unmarked(&mut released);
                let width = strings::col_width(&released);
                // Pass the width downstream to the justification pass.
                q[i].text
                    .as_mut()
                    .unwrap()
                    .insert_str(0, &format!("{}:", width));
                if column >= widths.len() {
                    widths.push(0);
                }
                if width > widths[column] {
                    widths[column] = width;
                }
                column += 1;
            }
            _ => {}
        }
    }
}

/// Re-walks cells padding each to its column's maximum width, honoring the
/// alignment recorded at parse time.  Center splits padding with any odd
/// remainder on the right.
fn justify_tables(q: &mut UnitQueue) {
    let mut widths: Vec<usize> = Vec::new();
    let mut column = 0;
    for i in 0..q.len() {
        match q[i].kind {
            UnitKind::Table if q[i].open => {
                widths = q[i]
                    .arg(0)
                    .unwrap_or("")
                    .split_ascii_whitespace()
                    .map(|t| t.parse().unwrap_or(0))
                    .collect();
            }
            UnitKind::TableRow if q[i].open => column = 0,
            UnitKind::HeadCell | UnitKind::DataCell if q[i].open => {
                let text = q[i].text.take().expect("measured cell");
                let (width, rest) = text.split_once(':').expect("cell width prefix");
                let width: usize = width.parse().expect("cell width prefix");
                let align = rest.chars().next().expect("cell alignment prefix");
                let content = &rest[1..];
                let max = widths.get(column).copied().unwrap_or(width);
                let pad = max.saturating_sub(width);
                let justified = match align {
                    'R' => format!("{}{}", " ".repeat(pad), content),
                    'C' => format!(
                        "{}{}{}",
                        " ".repeat(pad / 2),
                        content,
                        " ".repeat(pad - pad / 2)
                    ),
                    _ => format!("{}{}", content, " ".repeat(pad)),
                };
                let start = q[i].arg(0).unwrap_or("").to_string();
                q[i].text = Some(format!("{}{}", start, justified));
                column += 1;
            }
            _ => {}
        }
    }
}

/// Runs auto code discovery and smart text over block text, inserts the
/// blocks' start and end tags, and for Pango output injects the metadata
/// spans that let the application compute hanging indentation.
fn transform_blocks(e: &mut Engine, q: &mut UnitQueue) {
    let do_autolink =
        e.options.extension.auto_code || e.options.extension.permissive_autolinks;
    let do_smart = e.options.extension.smart_text;
    let do_margin = e.out_format() == Format::Pango;
    let tags = e.tags();

    let mut quote_level: i32 = 0;
    let mut list_level: i32 = 0;
    let mut quote_open_text: Option<String> = None;

    for i in 0..q.len() {
        match q[i].kind {
            UnitKind::Heading | UnitKind::Paragraph => {
                assert_eq!(q[i].arg_count(), 1);
                if q[i].open {
                    if let Some(mut text) = q[i].text.take() {
                        if do_autolink {
                            e.replace_auto_spans(&mut text);
                        }
                        if do_smart {
                            strings::smart_text(&mut text, e.escaping);
                        }
                        q[i].text = Some(text);
                    }
                    let start = q[i].arg(0).unwrap_or("").to_string();
                    match &mut q[i].text {
                        Some(text) => text.insert_str(0, &start),
                        None => q[i].text = Some(start),
                    }
                } else {
                    let end = q[i].arg(0).unwrap_or("").to_string();
                    q[i].text = Some(end);
                }
            }

            UnitKind::Item => {
                if q[i].open {
                    assert_eq!(q[i].arg_count(), 4);
                    let tight = q[i].arg(1) == Some("T");
                    if q[i].text.is_some() {
                        // A loose item's paragraphs transform themselves.
                        if tight {
                            let mut text = q[i].text.take().unwrap();
                            if do_autolink {
                                e.replace_auto_spans(&mut text);
                            }
                            if do_smart {
                                strings::smart_text(&mut text, e.escaping);
                            }
                            q[i].text = Some(text);
                        }
                    } else {
                        q[i].text = Some(String::new());
                    }
                    let bullet = q[i].arg(0).unwrap_or("").to_string();
                    if !do_margin {
                        q[i].text.as_mut().unwrap().insert_str(0, &bullet);
                    } else {
                        // Never embed the item contents in the font span;
                        // the text view's markup insertion cannot nest it.
                        let level = q[i].arg(2).unwrap_or("").to_string();
                        let ordinal = q[i].arg(3).unwrap_or("").to_string();
                        let prefix = format!(
                            "<span font=\"@liLvl={}liOrd={}liBLen={}liId={}\">{}</span>",
                            level,
                            ordinal,
                            bullet.chars().count(),
                            i,
                            bullet
                        );
                        let text = q[i].text.as_mut().unwrap();
                        text.insert_str(0, &prefix);
                        text.push_str(&format!(
                            "<span font=\"@liId={}\">{}</span>",
                            i,
                            pua::PANGO_EMPTY_SPAN
                        ));
                    }
                } else {
                    assert_eq!(q[i].arg_count(), 1);
                    // The argument stays null when a closer run collapsed.
                    let end = q[i].arg(0).unwrap_or("").to_string();
                    q[i].text = Some(end);
                }
            }

            // Output the usual tags and, for Pango, bracket them in spans
            // conveying the blockquote level.  Newlines stay out of the
            // Pango quote tags so closer runs can collapse.
            UnitKind::BlockQuote if do_margin => {
                let open = q[i].open;
                let mut j = i + 1;
                while j < q.len() && q[j].kind == UnitKind::Junk {
                    j += 1;
                }
                let next_is_quote = j < q.len() && q[j].kind == UnitKind::BlockQuote;
                let collapse =
                    next_is_quote && (if open { q[j].open } else { q[j].close });

                // Filler keeps Pango from dropping an empty span.
                if q[i].text.as_deref().map_or(true, str::is_empty) {
                    q[i].text = Some(if open {
                        "    ".to_string()
                    } else {
                        pua::PANGO_EMPTY_SPAN.to_string()
                    });
                }

                // The markdown quote level is the number of leading '>';
                // zero is never sent to the application.
                let gap_level = if open {
                    quote_level += 1;
                    quote_level
                } else {
                    let level = quote_level;
                    quote_level -= 1;
                    level
                };
                let gap = format!(
                    "<span font=\"@blckqtLvl={}blckqtOpn={}\">",
                    gap_level, open as i32
                );

                if open {
                    if collapse {
                        q[i].text = Some(String::new());
                    } else {
                        if quote_open_text.is_none() {
                            quote_open_text = q[i].text.clone();
                        }
                        let text = q[i].text.as_mut().unwrap();
                        text.insert_str(0, &gap);
                        text.push_str("</span>");
                    }
                } else if collapse {
                    q[i].text = Some(String::new());
                } else {
                    if next_is_quote && q[j].close {
                        // Sink runs of closers to avoid visual noise.
                        q[i].text = Some(String::new());
                    } else {
                        let text = q[i].text.as_mut().unwrap();
                        text.push_str("</span>\n");
                        text.insert_str(0, &gap);
                    }
                    // Level decreased but still inside a quote: tell the
                    // application which level is current by re-opening.
                    if quote_level > 0 {
                        let opener = quote_open_text
                            .as_deref()
                            .unwrap_or(tags.blockquote_start)
                            .to_string();
                        let reopen = format!(
                            "<span font=\"@blckqtLvl={}blckqtOpn=1\">{}</span>",
                            quote_level, opener
                        );
                        q[i].text.as_mut().unwrap().push_str(&reopen);
                    }
                }
            }

            // Same treatment for lists, except endings never collapse.
            UnitKind::OrderedList | UnitKind::BulletList if do_margin => {
                let open = q[i].open;
                if open {
                    list_level += 1;
                } else {
                    list_level -= 1;
                }
                if q[i].text.as_deref().map_or(true, str::is_empty) {
                    q[i].text = Some(pua::PANGO_EMPTY_SPAN.to_string());
                }
                let gap = format!("<span font=\"@olUlLvl={}\">", list_level);
                let text = q[i].text.as_mut().unwrap();
                if open {
                    text.insert_str(0, &gap);
                    text.push_str("</span>");
                } else if list_level == 0 {
                    // No need to tag higher levels.
                    text.push_str("</span>");
                    text.insert_str(0, &gap);
                }
            }

            _ => {}
        }
    }
}
