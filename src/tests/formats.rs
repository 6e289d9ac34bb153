use super::{render, ALL_FORMATS};
use crate::{Engine, Format, Options};

#[test]
fn ansi_heading_and_emphasis() {
    let out = render("# Title\n\nBody *x*\n", Format::Ansi, |_| ());
    assert_eq!(
        out,
        "\u{1b}[1;91mTitle\u{1b}[0m\nBody \u{1b}[3mx\u{1b}[0m"
    );
}

#[test]
fn tty_heading_uses_standout() {
    let out = render("# T\n", Format::Tty, |_| ());
    assert_eq!(out, "\u{1b}[7;1mT\u{1b}[27;21m");
}

#[test]
fn text_headings_use_bracket_pairs() {
    assert_eq!(render("# T\n", Format::Text, |_| ()), "[T]");
    assert_eq!(render("## T\n", Format::Text, |_| ()), "-T-");
    assert_eq!(render("###### T\n", Format::Text, |_| ()), "<T>");
}

#[test]
fn text_emphasis_is_silent() {
    assert_eq!(render("a *b* **c**\n", Format::Text, |_| ()), "a b c");
}

#[test]
fn text_list_items_are_indented() {
    assert_eq!(
        render("- a\n- b\n", Format::Text, |_| ()),
        "  * a\n  * b"
    );
    assert_eq!(
        render("- a\n  - b\n", Format::Text, |_| ()),
        "  * a\n    - b"
    );
}

#[test]
fn text_ordered_items_render_their_ordinal() {
    assert_eq!(
        render("4. a\n5. b\n", Format::Text, |_| ()),
        "  4. a\n  5. b"
    );
}

#[test]
fn text_link_renders_text_and_destination() {
    assert_eq!(
        render("[t](u)\n", Format::Text, |_| ()),
        "t <u>"
    );
}

#[test]
fn ansi_rule() {
    assert_eq!(
        render("---\n", Format::Ansi, |_| ()),
        " \u{1b}[93m-----\u{1b}[0m"
    );
}

#[test]
fn every_format_stashes_the_same_link_destinations() {
    let doc = "[one](u1) two [three](u3)\n\nSee [five](u5).\n";
    for format in ALL_FORMATS {
        let mut engine = Engine::new(Options::default());
        engine.set_format(format);
        engine.convert(doc).unwrap();
        assert_eq!(engine.link_dest(0), Some("u1\nu1"), "{:?}", format);
        assert_eq!(engine.link_dest(1), Some("u3\nu3"), "{:?}", format);
        assert_eq!(engine.link_dest(2), Some("u5\nu5"), "{:?}", format);
        assert_eq!(engine.link_dest(3), None, "{:?}", format);
    }
}

#[test]
fn block_order_matches_input_order_everywhere() {
    let doc = "# AAA\n\nBBB\n\n- CCC\n";
    for format in ALL_FORMATS {
        let out = render(doc, format, |_| ());
        let a = out.find("AAA").expect("heading text");
        let b = out.find("BBB").expect("paragraph text");
        let c = out.find("CCC").expect("item text");
        assert!(a < b && b < c, "{:?}: {:?}", format, out);
    }
}

#[test]
fn empty_input_renders_empty_everywhere() {
    for format in ALL_FORMATS {
        assert_eq!(render("", format, |_| ()), "", "{:?}", format);
    }
}
