use crate::{markdown_to, Engine, Error, Format, Options};

#[test]
fn convert_requires_a_format() {
    let mut engine = Engine::new(Options::default());
    assert_eq!(engine.convert("x\n"), Err(Error::FormatNotSet));
}

#[test]
fn empty_input_is_not_an_error() {
    let mut engine = Engine::new(Options::default());
    engine.set_format(Format::Html);
    assert_eq!(engine.convert(""), Ok(String::new()));
}

#[test]
fn a_bom_is_skipped() {
    let mut engine = Engine::new(Options::default());
    engine.set_format(Format::Html);
    assert_eq!(engine.convert("\u{feff}hi\n").unwrap(), "<p>hi</p>");
}

#[test]
fn document_state_resets_between_conversions() {
    let mut engine = Engine::new(Options::default());
    engine.set_format(Format::Html);
    engine.convert("[a](u)\n").unwrap();
    assert_eq!(engine.link_dest(0), Some("u\nu"));

    engine.convert("plain\n").unwrap();
    assert_eq!(engine.link_dest(0), None);
}

#[test]
fn one_engine_renders_many_formats() {
    let mut engine = Engine::new(Options::default());
    engine.set_format(Format::Html);
    assert_eq!(engine.convert("*x*\n").unwrap(), "<p><em>x</em></p>");
    engine.set_format(Format::Text);
    assert_eq!(engine.convert("*x*\n").unwrap(), "x");
}

#[test]
fn markdown_to_is_a_one_shot() {
    assert_eq!(
        markdown_to("**b**\n", Format::Html, &Options::default()),
        "<p><strong>b</strong></p>"
    );
}

#[test]
fn list_indentation_depends_on_format() {
    assert!(Format::Ansi.indents_list_items());
    assert!(Format::Tty.indents_list_items());
    assert!(Format::Text.indents_list_items());
    assert!(!Format::Pango.indents_list_items());
    assert!(!Format::Html.indents_list_items());
}

#[test]
fn malformed_markdown_still_renders() {
    // The grammar is total: the worst outcome is ugly output, not an error.
    for format in super::ALL_FORMATS {
        let mut options = Options::default();
        options.extension.table = true;
        let mut engine = Engine::new(options);
        engine.set_format(format);
        for doc in ["[unclosed(\n", "``\n", "> > >\n", "|||\n", "*_*_~~\n"] {
            assert!(engine.convert(doc).is_ok(), "{:?} as {:?}", doc, format);
        }
    }
}
