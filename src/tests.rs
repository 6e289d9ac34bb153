use crate::{markdown_to, Format, Options};

mod api;
mod autocode;
mod core;
mod formats;
mod protect;
mod smart;
mod words;

#[track_caller]
pub(crate) fn html(input: &str, expected: &str) {
    html_opts_i(input, expected, |_| ());
}

#[track_caller]
pub(crate) fn html_opts_i<F>(input: &str, expected: &str, opts: F)
where
    F: Fn(&mut Options),
{
    let mut options = Options::default();
    opts(&mut options);
    let output = markdown_to(input, Format::Html, &options);
    pretty_assertions::assert_eq!(output, expected, "on input: {:?}", input);
}

macro_rules! html_opts {
    ([$($optclass:ident.$optname:ident),*], $lhs:expr, $rhs:expr $(,)?) => {
        $crate::tests::html_opts_i($lhs, $rhs, |opts| {
            $(opts.$optclass.$optname = true;)*
        })
    };
}

pub(crate) use html_opts;

#[track_caller]
pub(crate) fn render<F>(input: &str, format: Format, opts: F) -> String
where
    F: Fn(&mut Options),
{
    let mut options = Options::default();
    opts(&mut options);
    markdown_to(input, format, &options)
}

pub(crate) const ALL_FORMATS: [Format; 5] = [
    Format::Ansi,
    Format::Tty,
    Format::Text,
    Format::Pango,
    Format::Html,
];
