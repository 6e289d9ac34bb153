use super::{html, html_opts, render};
use crate::Format;

#[test]
fn basic() {
    html(
        concat!(
            "My **document**.\n",
            "\n",
            "It's mine.\n",
            "\n",
            "> Yes.\n",
            "\n",
            "## Hi!\n",
            "\n",
            "Okay.\n"
        ),
        concat!(
            "<p>My <strong>document</strong>.</p>\n",
            "<p>It's mine.</p>\n",
            "<blockquote>\n",
            "<p>Yes.</p>\n",
            "</blockquote>\n",
            "<h2>Hi!</h2>\n",
            "<p>Okay.</p>"
        ),
    );
}

#[test]
fn codefence() {
    html(
        "``` rust\nfn main<'a>();\n```\n",
        "<pre><code class=\"language-rust\">fn main&lt;'a&gt;();</code></pre>",
    );
}

#[test]
fn codefence_no_info() {
    html("```\nplain\n```\n", "<pre><code>plain</code></pre>");
}

#[test]
fn lists() {
    html(
        "2. Hello.\n3. Hi.\n",
        concat!(
            "<ol start=\"2\">\n",
            "<li>Hello.</li>\n",
            "<li>Hi.</li>\n",
            "</ol>"
        ),
    );

    html(
        "- Hello.\n- Hi.\n",
        concat!("<ul>\n", "<li>Hello.</li>\n", "<li>Hi.</li>\n", "</ul>"),
    );
}

#[test]
fn loose_list() {
    html(
        "- a\n\n- b\n",
        concat!(
            "<ul>\n",
            "<li>\n<p>a</p>\n</li>\n",
            "<li>\n<p>b</p>\n</li>\n",
            "</ul>"
        ),
    );
}

#[test]
fn nested_list() {
    html(
        "- a\n  - b\n",
        concat!(
            "<ul>\n",
            "<li>a\n",
            "<ul>\n",
            "<li>b</li>\n",
            "</ul>\n",
            "</li>\n",
            "</ul>"
        ),
    );
}

#[test]
fn thematic_break() {
    html("---\n", "<hr />");
    html_opts!([render.html5], "---\n", "<hr>");
}

#[test]
fn hard_break() {
    html("a  \nb\n", "<p>a<br />\nb</p>");
    html_opts!([render.html5], "a  \nb\n", "<p>a<br>\nb</p>");
}

#[test]
fn soft_break() {
    html("a\nb\n", "<p>a b</p>");
    html_opts!([render.soft_break], "a\nb\n", "<p>a\nb</p>");
}

#[test]
fn heading_levels() {
    html("# a\n\n###### b\n", "<h1>a</h1>\n<h6>b</h6>");
}

#[test]
fn escaped_characters() {
    html("1 < 2 & 3\n", "<p>1 &lt; 2 &amp; 3</p>");
    html("a &amp; b\n", "<p>a &amp; b</p>");
}

#[test]
fn inline_code() {
    html("a `b` c\n", "<p>a <code>b</code> c</p>");
}

#[test]
fn strikethrough() {
    html("~~x~~\n", "<p><del>x</del></p>");
}

#[test]
fn code_block_ending_tweak() {
    html("```\nx\n```\n", "<pre><code>x</code></pre>");
    html_opts!(
        [render.code_block_end],
        "```\nx\n```\n",
        "<pre><code>x\n</code></pre>"
    );
}

#[test]
fn raw_html_is_omitted_by_default() {
    html(
        "<script>\nalert(1)\n</script>\n",
        "<!-- raw HTML omitted -->",
    );
    html(
        "hello <b>world</b>\n",
        "<p>hello <!-- raw HTML omitted -->world<!-- raw HTML omitted --></p>",
    );
}

#[test]
fn raw_html_with_unsafe_tweak() {
    html_opts!(
        [render.unsafe_html],
        "<script>\nalert(1)\n</script>\n",
        "<script>\nalert(1)\n</script>"
    );
    html_opts!(
        [render.unsafe_html],
        "hello <b>world</b>\n",
        "<p>hello <b>world</b></p>"
    );
}

#[test]
fn raw_html_never_reaches_plain_output() {
    let out = render("a\n\n<div>\nsecret\n</div>\n\nb\n", Format::Text, |_| ());
    assert!(!out.contains("secret"));
    assert!(out.contains('a') && out.contains('b'));
}

#[test]
fn shebang_fences_the_document() {
    let out = render("#!/bin/sh\necho hi\n", Format::Text, |opts| {
        opts.extension.shebang = true;
    });
    assert_eq!(out, "#!/bin/sh\necho hi");

    let out = render("#!/bin/sh\necho hi\n", Format::Html, |opts| {
        opts.extension.shebang = true;
    });
    assert_eq!(out, "<pre><code>#!/bin/sh\necho hi</code></pre>");
}

#[test]
fn shebang_fence_outgrows_document_fences() {
    // The document's own tilde fence must not terminate the shebang fence.
    let out = render("#!/bin/sh\n~~~~\necho hi\n", Format::Text, |opts| {
        opts.extension.shebang = true;
    });
    assert_eq!(out, "#!/bin/sh\n~~~~\necho hi");
}

#[test]
fn directives_are_erased() {
    html("a\n%%nopot yes\nb\n", "<p>a b</p>");
    html("%%textdomain foo\nhello\n", "<p>hello</p>");
}

#[test]
fn link_with_title() {
    html(
        "[t](u \"ti\")\n",
        "<p><a href=\"u\" title=\"ti\">t</a></p>",
    );
}

#[test]
fn image() {
    html(
        "![alt](i.png)\n",
        "<p><img src=\"i.png\" alt=\"alt\" /></p>",
    );
    html_opts!(
        [render.html5],
        "![alt](i.png)\n",
        "<p><img src=\"i.png\" alt=\"alt\"></p>"
    );
}

#[test]
fn link_destination_is_percent_escaped() {
    html(
        "[t](</a b>)\n",
        "<p><a href=\"/a%20b\">t</a></p>",
    );
}
