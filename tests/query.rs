use typed_uri::{component::Query, Uri};

#[test]
fn lookup() {
    let q = Query::parse("name=%E5%BC%A0&lang=rust&lang=c&flag&=empty").unwrap();
    assert_eq!(q.get("lang"), ["rust", "c"]);
    assert_eq!(q.get_first("name").unwrap().decode().to_string().unwrap(), "张");
    assert_eq!(q.get_first("flag").unwrap(), "");
    assert_eq!(q.get_first("").unwrap(), "empty");
    assert!(q.contains("flag"));
    assert!(!q.contains("missing"));
    assert!(q.keys().eq(["name", "lang", "lang", "flag", ""]));

    let params: Vec<_> = q.params().collect();
    assert_eq!(params[3].value, None);
    assert_eq!(params[3].value_or_empty(), "");
}

#[test]
fn modify() {
    let q = Query::parse("name=%E5%BC%A0&lang=rust&lang=c&flag&=empty").unwrap();
    let q = q.remove("lang").put("name", "李 四").append("x", "1&2");
    assert_eq!(q, "name=%E6%9D%8E%20%E5%9B%9B&flag&=empty&x=1%262");
    assert_eq!(q.get("x"), ["1%262"]);
    assert_eq!(
        q.get_first("x").unwrap().decode().to_string().unwrap(),
        "1&2"
    );

    // `put` replaces the first occurrence in place.
    let q = Query::of([("a", "1"), ("b", "2"), ("a", "3")]);
    assert_eq!(q.put("a", "x"), "a=x&b=2");
    assert_eq!(q.put("b", "y"), "a=1&b=y&a=3");
    assert_eq!(q.remove_value("a", "1"), "b=2&a=3");
    assert_eq!(q.remove_value("a", "4"), q);
    assert_eq!(q.remove("z"), q);

    // Empty parameters are dropped by modifications.
    let q = Query::parse("&a=1&&b=2&").unwrap();
    assert_eq!(q.params().count(), 2);
    assert_eq!(q.remove("c"), "a=1&b=2");
}

#[test]
fn decoded_keys() {
    let q = Query::parse("%61=1&a=2&%2561=3").unwrap();
    assert_eq!(q.get("a"), ["1", "2"]);
    assert_eq!(q.get("%61"), ["3"]);
    assert_eq!(q.remove("a"), "%2561=3");
    assert_eq!(q.append("a=b", "c"), "%61=1&a=2&%2561=3&a%3Db=c");
}

#[test]
fn in_reference() {
    let uri = Uri::parse("http://example.com/search?q=uri&page=2#results").unwrap();
    let query = uri.query().unwrap();
    assert_eq!(query.get_first("page").unwrap(), "2");

    let uri = uri
        .thaw()
        .set_query(query.put("page", "3").append("lang", "en"))
        .build()
        .unwrap();
    assert_eq!(
        uri.as_str(),
        "http://example.com/search?q=uri&page=3&lang=en#results"
    );
}
