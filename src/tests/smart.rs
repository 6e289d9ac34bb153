use super::{html_opts, render};
use crate::Format;

#[test]
fn double_quote_pairs() {
    html_opts!(
        [extension.smart_text],
        "\"hello\"\n",
        "<p>\u{201C}hello\u{201D}</p>"
    );
    html_opts!(
        [extension.smart_text],
        "say \"a b\" now\n",
        "<p>say \u{201C}a b\u{201D} now</p>"
    );
}

#[test]
fn single_quote_pairs() {
    html_opts!(
        [extension.smart_text],
        "'abc'\n",
        "<p>\u{2018}abc\u{2019}</p>"
    );
}

#[test]
fn word_internal_apostrophes_stay() {
    html_opts!([extension.smart_text], "it's fine\n", "<p>it's fine</p>");
}

#[test]
fn quoted_contraction_keeps_its_apostrophe() {
    html_opts!(
        [extension.smart_text],
        "\"it's\"\n",
        "<p>\u{201C}it's\u{201D}</p>"
    );
}

#[test]
fn unpaired_quotes_are_left_dumb() {
    html_opts!(
        [extension.smart_text],
        "say \"yes\n",
        "<p>say &quot;yes</p>"
    );
}

#[test]
fn dash_runs_become_em_dashes() {
    html_opts!(
        [extension.smart_text],
        "a -- b\n",
        "<p>a \u{2014} b</p>"
    );
}

#[test]
fn smart_text_spares_protected_spans() {
    // The code span carries its quotes through the transform untouched.
    let out = render("`\"x\"` and \"y\"\n", Format::Text, |opts| {
        opts.extension.smart_text = true;
    });
    assert_eq!(out, "\"x\" and \u{201C}y\u{201D}");
}

#[test]
fn smart_text_applies_to_link_text() {
    let out = render("[\"q\"](u)\n", Format::Html, |opts| {
        opts.extension.smart_text = true;
    });
    assert_eq!(out, "<p><a href=\"u\">\u{201C}q\u{201D}</a></p>");
}
