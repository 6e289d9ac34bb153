use crate::words::{word_type, WordKind};

#[track_caller]
fn classify(word: &str) -> (WordKind, &str) {
    let (kind, range) = word_type(word.as_bytes());
    (kind, &word[range])
}

#[test]
fn uri_detection_skips_punctuation_trimming() {
    assert_eq!(
        classify("https://a.b/c).)"),
        (WordKind::Uri, "https://a.b/c).)")
    );
    assert_eq!(classify("http://x.io"), (WordKind::Uri, "http://x.io"));
    assert_eq!(classify("ftp://x.io/"), (WordKind::Uri, "ftp://x.io/"));
}

#[test]
fn flanked_uri_drops_the_parentheses() {
    assert_eq!(
        classify("(http://x.io)"),
        (WordKind::UriFlanked, "http://x.io")
    );
}

#[test]
fn apostrophes_never_classify() {
    assert_eq!(classify("it's").0, WordKind::Unknown);
}

#[test]
fn quoted_words_are_dequoted_first() {
    assert_eq!(classify("'/usr/bin'"), (WordKind::AbsPath, "/usr/bin"));
    assert_eq!(classify("'abc'").0, WordKind::Unknown);
}

#[test]
fn bug_reference_absorbs_the_hash() {
    assert_eq!(classify("#123"), (WordKind::BugRef, "#123"));
}

#[test]
fn function_name_absorbs_the_parentheses() {
    assert_eq!(classify("foo()"), (WordKind::FuncName, "foo()"));
    // Not an identifier: no function call.
    assert_eq!(classify("f.o()").0, WordKind::Unknown);
}

#[test]
fn uppercase_identifier_requires_an_underscore() {
    assert_eq!(classify("MY_CONST"), (WordKind::UpperIdent, "MY_CONST"));
    assert_eq!(classify("myconst").0, WordKind::Unknown);
    assert_eq!(classify("MYCONST").0, WordKind::Unknown);
    assert_eq!(classify("$MY_VAR"), (WordKind::UpperIdent, "$MY_VAR"));
}

#[test]
fn diff_file_requires_a_stem() {
    assert_eq!(classify("a.diff"), (WordKind::FileDiff, "a.diff"));
    assert_eq!(classify("fix.patch"), (WordKind::FileDiff, "fix.patch"));
    assert_eq!(classify(".diff").0, WordKind::Unknown);
}

#[test]
fn absolute_path_needs_four_bytes() {
    assert_eq!(classify("/usr/bin"), (WordKind::AbsPath, "/usr/bin"));
    assert_eq!(classify("/usr/bin/."), (WordKind::AbsPath, "/usr/bin/"));
}

#[test]
fn email_needs_one_at_and_a_dot() {
    assert_eq!(classify("bob@x.io"), (WordKind::Email, "bob@x.io"));
    assert_eq!(classify("bob@xio").0, WordKind::Unknown);
    assert_eq!(classify("a@b@x.io").0, WordKind::Unknown);
}

#[test]
fn bracket_flanked_email_is_an_autolink_already() {
    assert_eq!(classify("[bob@x.io]").0, WordKind::Unknown);
}

#[test]
fn trailing_punctuation_is_trimmed_but_underscore_kept() {
    assert_eq!(classify("MY_CONST."), (WordKind::UpperIdent, "MY_CONST"));
    assert_eq!(classify("CONST_,"), (WordKind::UpperIdent, "CONST_"));
}

#[test]
fn non_ascii_words_are_left_alone() {
    assert_eq!(classify("caf\u{E9}s").0, WordKind::Unknown);
}
