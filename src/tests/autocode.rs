use super::{html_opts, render};
use crate::Format;

#[test]
fn urls_and_calls_discovered_together() {
    html_opts!(
        [extension.auto_code, extension.smart_text],
        "# Hello\n\nSee http://x.io and call foo() now.\n",
        concat!(
            "<h1>Hello</h1>\n",
            "<p>See <a href=\"http://x.io\">http://x.io</a> ",
            "and call <code>foo()</code> now.</p>"
        ),
    );
}

#[test]
fn uppercase_identifiers_become_code() {
    html_opts!(
        [extension.auto_code],
        "run FOO_BAR now\n",
        "<p>run <code>FOO_BAR</code> now</p>"
    );
}

#[test]
fn bug_references_become_code() {
    html_opts!(
        [extension.auto_code],
        "see #1234 please\n",
        "<p>see <code>#1234</code> please</p>"
    );
}

#[test]
fn absolute_paths_become_code() {
    html_opts!(
        [extension.auto_code],
        "look in /usr/local now\n",
        "<p>look in <code>/usr/local</code> now</p>"
    );
}

#[test]
fn diff_files_become_code() {
    html_opts!(
        [extension.auto_code],
        "apply fix.patch today\n",
        "<p>apply <code>fix.patch</code> today</p>"
    );
}

#[test]
fn emails_become_mailto_links() {
    html_opts!(
        [extension.permissive_autolinks],
        "mail bob@x.io now\n",
        "<p>mail <a href=\"mailto:bob@x.io\">bob@x.io</a> now</p>"
    );
}

#[test]
fn urls_link_with_either_flag() {
    for flag in ["auto_code", "permissive_autolinks"] {
        let out = render("go http://x.io now\n", Format::Html, |opts| {
            match flag {
                "auto_code" => opts.extension.auto_code = true,
                _ => opts.extension.permissive_autolinks = true,
            };
        });
        assert_eq!(
            out,
            "<p>go <a href=\"http://x.io\">http://x.io</a> now</p>",
            "with {} enabled",
            flag
        );
    }
}

#[test]
fn autolinks_alone_leave_identifiers_untouched() {
    html_opts!(
        [extension.permissive_autolinks],
        "run FOO_BAR now\n",
        "<p>run FOO_BAR now</p>"
    );
}

#[test]
fn leading_backslash_excuses_a_word() {
    html_opts!(
        [extension.auto_code],
        "run \\FOO_BAR now\n",
        "<p>run FOO_BAR now</p>"
    );
}

#[test]
fn short_words_are_skipped() {
    html_opts!([extension.auto_code], "a A_B c\n", "<p>a A_B c</p>");
}

#[test]
fn surrounding_punctuation_stays_outside_the_span() {
    html_opts!(
        [extension.auto_code],
        "(see MY_CONST).\n",
        "<p>(see <code>MY_CONST</code>).</p>"
    );
}

#[test]
fn marked_up_code_spans_are_not_rediscovered() {
    html_opts!(
        [extension.auto_code],
        "`FOO_BAR` stays\n",
        "<p><code>FOO_BAR</code> stays</p>"
    );
}

#[test]
fn tty_auto_code_uses_the_tty_wrappers() {
    let out = render("x FOO_BAR y\n", Format::Tty, |opts| {
        opts.extension.auto_code = true;
    });
    assert_eq!(out, "x \u{1b}[36mFOO_BAR\u{1b}[39m y");
}
