use typed_uri::{
    component::Port,
    error::{NormaliseError, ReferenceKind},
    normalize::Normalizer,
    scheme::SchemeRegistry,
    *,
};

#[track_caller]
fn check(input: &str, expected: &str) {
    let r = Uri::parse(input).unwrap();
    let n = r.normalise();
    assert_eq!(n.as_str(), expected, "{input}");
    assert_eq!(r.is_normal_form(), input == expected, "{input}");
    assert!(n.is_normal_form(), "{input}");
    assert_eq!(n.normalise(), n, "{input}");
}

#[test]
fn normalise() {
    // Example from Section 6.2 of RFC 3986.
    check("eXAMPLE://a/./b/../b/%63/%7bfoo%7d", "example://a/b/c/%7Bfoo%7D");

    // Lowercase percent-encoded octet.
    check("%3a", "%3A");
    check("http://example.com/%2a", "http://example.com/%2A");

    // Uppercase letters in scheme and registered name.
    check("HTTP://www.EXAMPLE.com/", "http://www.example.com/");

    // Empty and default ports.
    check("http://example.com:/", "http://example.com/");
    check("http://example.com:80/", "http://example.com/");
    check("https://example.com:443", "https://example.com");
    check("https://example.com:0080", "https://example.com:80");
    check("ws://example.com:80/chat", "ws://example.com/chat");

    // Underflow in path normalisation.
    check("http://a/../../../g", "http://a/g");

    // Percent-encoded dot segments.
    check("http://a/b/c/%2E/%2E./%2e%2E/d", "http://a/d");

    // Dot segments are removed from rootless paths too.
    check("a/./b/../c", "a/c");
    check("foo:a/./b/../c", "foo:a/c");
    check("foo/../bar", "bar");
    check("foo:bar/../baz", "foo:baz");

    // A rootless path stays rootless.
    check("../a", "../a");
    check("a/../../b", "../b");
    check("a/..", "./");
    check("foo:a/..?q", "foo:./?q");
    check("a/..//b", ".//b");
    check("./a:b", "./a:b");
    check("x/../a:b", "./a:b");
    check("foo:./a:b", "foo:a:b");

    // The NSS of a URN is opaque.
    check("urn:isbn:a/../b", "urn:isbn:a/../b");
    check("urn:%49SBN:a/./b", "urn:isbn:a/./b");

    // And removed from absolute ones.
    check("/foo/../bar", "/bar");
    check("foo:/bar/./../baz", "foo:/baz");

    // A path without authority never starts with "//".
    check("foo:/.//@@", "foo:/@@");
    check("/.//a", "/a");

    // Percent-encoded uppercase letters in registered name.
    check("HTTP://%45XAMPLE.%43Om", "http://example.com");

    // Percent-encoded unreserved characters.
    check("%41%7e%2D%5f", "A~-_");

    // Reserved characters stay encoded.
    check("?a%3Db%26c", "?a%3Db%26c");

    // IPv6 addresses.
    check("http://[2001:DB8:0::1]/", "http://[2001:db8::1]/");
    check("http://[::FFFF:1.2.3.4]/", "http://[::ffff:1.2.3.4]/");
    check("http://[V1.X]/", "http://[v1.x]/");

    // Userinfo is case-sensitive.
    check("http://User%3a@example.com/", "http://User%3A@example.com/");

    // URN namespace identifiers are case-insensitive.
    check("URN:ISBN:0451450523", "urn:isbn:0451450523");
    check("urn:Example:%7eFoo", "urn:example:~Foo");
}

#[test]
fn empty_path_after_authority() {
    check("http://example.com", "http://example.com");
    check("http://user@example.com", "http://user@example.com/");
    check("http://example.com?q", "http://example.com/?q");
    check("http://example.com#f", "http://example.com/#f");
    check("//example.com", "//example.com/");
}

#[test]
fn kind_changes() {
    let url = BaseUrl::parse("http://example.com:").unwrap();
    let n = url.normalise();
    assert_eq!(Uri::from(n.clone()).kind(), ReferenceKind::Origin);
    assert_eq!(n.as_str(), "http://example.com");

    let url = BaseUrl::parse("http://example.com:80/").unwrap();
    assert!(matches!(url.normalise(), ServersideAbsoluteUrl::BaseUrl(_)));

    let uri = OpaqueUri::parse("urn:%41b:c").unwrap();
    let n = uri.normalise();
    assert_eq!(Uri::from(n.clone()).kind(), ReferenceKind::Urn);
    assert_eq!(n.as_str(), "urn:ab:c");
    assert!(n.is_normal_form());
}

#[test]
fn memoised() {
    let uri = AbsoluteUri::parse("HTTP://example.com/a/../b").unwrap();
    assert!(!uri.is_normal_form());
    let first = uri.normalise();
    let second = uri.normalise();
    assert_eq!(first, second);
    assert_eq!(first.as_str(), "http://example.com/b");

    let copy = uri.clone();
    assert_eq!(copy.normalise(), first);
}

#[test]
fn normalizer() {
    let uri = Uri::parse("http://example.com/a/../..").unwrap();
    assert_eq!(
        Normalizer::new().normalise(&uri).unwrap().as_str(),
        "http://example.com/"
    );
    assert_eq!(
        Normalizer::new()
            .allow_path_underflow(false)
            .normalise(&uri)
            .unwrap_err(),
        NormaliseError::PathUnderflow
    );

    // A leading ".." kept in a rootless path is an underflow too.
    let uri = Uri::parse("../a").unwrap();
    assert_eq!(Normalizer::new().normalise(&uri).unwrap().as_str(), "../a");
    assert_eq!(
        Normalizer::new()
            .allow_path_underflow(false)
            .normalise(&uri)
            .unwrap_err(),
        NormaliseError::PathUnderflow
    );
    let uri = Uri::parse("a/../b").unwrap();
    assert!(Normalizer::new()
        .allow_path_underflow(false)
        .normalise(&uri)
        .is_ok());

    // The registry given decides the default port.
    let empty = SchemeRegistry::empty();
    let uri = Uri::parse("http://example.com:80/").unwrap();
    assert_eq!(
        Normalizer::new()
            .registry(&empty)
            .normalise(&uri)
            .unwrap()
            .as_str(),
        "http://example.com:80/"
    );
    assert_eq!(uri.normalise().as_str(), "http://example.com/");

    let registry = SchemeRegistry::empty();
    registry.register("myproto", Some(Port::of(7000).unwrap())).unwrap();
    let url = AbsoluteUrl::parse("MyProto://host:7000/").unwrap();
    assert_eq!(
        Normalizer::new()
            .registry(&registry)
            .normalise(&url)
            .unwrap()
            .as_str(),
        "myproto://host/"
    );
    assert_eq!(url.normalise().as_str(), "myproto://host:7000/");

    let base = BaseUrl::parse("http://example.com:").unwrap();
    let n: ServersideAbsoluteUrl = Normalizer::new().normalise(&base).unwrap();
    assert_eq!(n.as_str(), "http://example.com");
}
