use crate::protect::ProtectStore;
use crate::scanners::RegexCache;

fn code_ref_regex() -> regex::Regex {
    RegexCache::default()
        .code_ref()
        .expect("code ref pattern compiles")
        .clone()
}

#[test]
fn protect_then_release_round_trips() {
    let re = code_ref_regex();
    let mut store = ProtectStore::default();
    let token = store.protect("hello world");
    assert_ne!(token, "hello world");
    let mut s = token;
    assert_eq!(store.release_once(&mut s, &re), 1);
    assert_eq!(s, "hello world");
}

#[test]
fn release_reaches_fixed_point_through_nesting() {
    let re = code_ref_regex();
    let mut store = ProtectStore::default();
    let inner = store.protect("inner");
    let outer = store.protect(&format!("outer {}", inner));
    let mut s = outer;
    store.release_to_fixed_point(&mut s, &re);
    assert_eq!(s, "outer inner");
}

#[test]
fn placeholder_shaped_content_is_not_misdecoded() {
    // Content that merely looks like a token names no table entry and must
    // survive the round trip byte for byte.
    let re = code_ref_regex();
    let mut store = ProtectStore::default();
    let tricky = format!("a {m}99C;{m} b", m = '\u{F601}');
    let token = store.protect(&tricky);
    let mut s = token;
    store.release_to_fixed_point(&mut s, &re);
    assert_eq!(s, tricky);
}

#[test]
fn identical_content_dedupes() {
    let mut store = ProtectStore::default();
    let a = store.stash_code("same");
    let b = store.stash_code("same");
    assert_eq!(a, b);
    assert_eq!(store.code_table_len(), 1);
    let c = store.stash_code("other");
    assert_ne!(a, c);
    assert_eq!(store.code_table_len(), 2);
}

#[test]
fn protecting_a_token_does_not_double_encode() {
    let mut store = ProtectStore::default();
    let token = store.protect("content");
    let again = store.protect(&token);
    assert_eq!(token, again);
    assert_eq!(store.code_table_len(), 1);
}

#[test]
fn link_destinations_dedupe_too() {
    let mut store = ProtectStore::default();
    let a = store.stash_link_dest("u\nu");
    let b = store.stash_link_dest("u\nu");
    let c = store.stash_link_dest("v\nv");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(store.link_dest(a), Some("u\nu"));
    assert_eq!(store.link_dest(c), Some("v\nv"));
    assert_eq!(store.link_dest(99), None);
}
