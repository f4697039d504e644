#![no_main]
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};
use typed_uri::{
    component::{Authority, Fragment, Path, Query},
    scheme::Scheme,
    Uri,
};

#[derive(Arbitrary, Debug)]
struct Components<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fuzz_target!(|c: Components<'_>| {
    let Ok(scheme) = c.scheme.map(Scheme::parse).transpose() else {
        return;
    };
    let Ok(authority) = c.authority.map(Authority::parse).transpose() else {
        return;
    };
    let Ok(path) = Path::parse(c.path) else {
        return;
    };
    let Ok(query) = c.query.map(Query::parse).transpose() else {
        return;
    };
    let Ok(fragment) = c.fragment.map(Fragment::parse).transpose() else {
        return;
    };

    let Ok(u1) = Uri::builder()
        .set_scheme(scheme.clone())
        .set_authority(authority.clone())
        .set_path(path.clone())
        .set_query(query.clone())
        .set_fragment(fragment.clone())
        .build()
    else {
        return;
    };

    assert_eq!(u1.scheme(), scheme.as_ref());
    assert_eq!(u1.authority(), authority.as_ref());
    assert_eq!(u1.path(), &path);
    assert_eq!(u1.query(), query.as_ref());
    assert_eq!(u1.fragment(), fragment.as_ref());

    let u2 = Uri::parse(u1.as_str()).unwrap();
    assert_eq!(u1, u2);
    assert_eq!(u1.kind(), u2.kind());
    assert_eq!(u2.authority(), authority.as_ref());
    assert_eq!(u2.path(), &path);
});
