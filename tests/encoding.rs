use typed_uri::{
    component::{Query, Segment},
    pct_enc::{
        encode,
        encoder::{Path, Query as QueryEnc, QueryParamValue},
        is_normal_form, normalise, table, EStr, EString,
    },
};

#[test]
fn encode_with_table() {
    assert_eq!(encode("", table::PATH), "");
    assert_eq!(encode("a b", table::PATH), "a%20b");
    assert_eq!(encode("/a?b#c", table::PATH), "/a%3Fb%23c");
    assert_eq!(encode("/a?b#c", table::QUERY), "/a?b%23c");
    assert_eq!(encode("50%", table::QUERY), "50%25");
    assert_eq!(encode("张三", table::SEGMENT), "%E5%BC%A0%E4%B8%89");
    assert_eq!(encode("a:b", table::SEGMENT_NZ_NC), "a%3Ab");
    assert_eq!(encode("~-._", table::UNRESERVED), "~-._");
}

#[test]
fn normalise_with_table() {
    let cases = [
        ("abc", None),
        ("%7e", Some("~")),
        ("%7E", Some("~")),
        ("%2f", Some("%2F")),
        ("%2F", None),
        ("%e5%bc%a0", Some("%E5%BC%A0")),
        ("%", Some("%25")),
        ("a%2", Some("a%252")),
        ("%zz", Some("%25zz")),
        (" ", Some("%20")),
        ("Ab%43", Some("AbC")),
    ];
    for (input, expected) in cases {
        let n = normalise(input, table::PATH, table::RESERVED);
        assert_eq!(n.as_deref(), expected, "{input}");
        assert_eq!(
            is_normal_form(input, table::PATH, table::RESERVED),
            expected.is_none(),
            "{input}"
        );
        if let Some(n) = n {
            assert!(is_normal_form(&n, table::PATH, table::RESERVED), "{input}");
        }
    }

    // A character outside the table stays encoded.
    assert_eq!(normalise("%3F", table::PATH, table::RESERVED), None);
    assert_eq!(normalise("%3f", table::QUERY, table::RESERVED).unwrap(), "%3F");

    // Nothing is left encoded with an empty set.
    assert_eq!(
        normalise("%2F%3f", table::PATH, table::Table::new(b"")).unwrap(),
        "/%3F"
    );
}

#[test]
fn estr() {
    assert!(EStr::<Path>::new("a%20b/c").is_some());
    assert!(EStr::<Path>::new("a b").is_none());
    assert!(EStr::<Path>::new("%2").is_none());
    assert!(EStr::<Path>::new("%g0").is_none());

    let s = EStr::<Path>::new_or_panic("a/%2Fb/c");
    assert!(s.split('/').eq(["a", "%2Fb", "c"]));
    assert!(s.split('/').rev().eq(["c", "%2Fb", "a"]));
    let segs: Vec<_> = s.split('/').map(|seg| seg.decode().to_string().unwrap()).collect();
    assert_eq!(segs, ["a", "/b", "c"]);

    let (k, v) = EStr::<QueryEnc>::new_or_panic("k=v=w")
        .split_once('=')
        .unwrap();
    assert_eq!(k, "k");
    assert_eq!(v, "v=w");
    assert!(EStr::<QueryEnc>::new_or_panic("kv").split_once('=').is_none());

    assert!(!EStr::<Path>::new_or_panic("%41").is_normal_form());
    assert_eq!(EStr::<Path>::new_or_panic("%41").normalise().unwrap(), "A");
    assert!(EStr::<Path>::new_or_panic("A").normalise().is_none());
}

#[test]
#[should_panic = "splitting with non-reserved character"]
fn split_with_unreserved() {
    let _ = EStr::<Path>::new_or_panic("a-b").split('-');
}

#[test]
fn decode() {
    let s = EStr::<Path>::new_or_panic("%C2%A1Hola%21+x");
    assert_eq!(s.decode().to_string().unwrap(), "¡Hola!+x");

    let s = EStr::<Path>::new_or_panic("%FFa");
    assert_eq!(*s.decode().to_bytes(), [0xff, b'a']);
    assert!(s.decode().to_string().is_err());
    assert_eq!(s.decode().to_string_lossy(), "\u{fffd}a");

    // Nothing to decode.
    let s = EStr::<Path>::new_or_panic("plain");
    assert!(matches!(s.decode().to_bytes(), std::borrow::Cow::Borrowed(_)));
}

#[test]
fn estring() {
    let mut s = EString::<QueryEnc>::new();
    s.encode_str::<QueryParamValue>("a&b");
    s.push('&');
    s.encode_str::<QueryParamValue>("c d");
    assert_eq!(s, "a%26b&c%20d");
    assert_eq!(s.split('&').count(), 2);

    let q = Query::from(s.clone());
    assert_eq!(q.get_first("c d").unwrap(), "");
    assert_eq!(q.get_first("a&b").unwrap(), "");
    assert_eq!(q.params().count(), 2);
    assert_eq!(s.into_string(), "a%26b&c%20d");

    let seg = Segment::encode("a/b c");
    assert_eq!(seg, "a%2Fb%20c");
    assert_eq!(seg.decode().to_string().unwrap(), "a/b c");
}
