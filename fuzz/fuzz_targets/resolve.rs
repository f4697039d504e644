#![no_main]
use libfuzzer_sys::fuzz_target;
use typed_uri::{AbsoluteUri, Uri};

fuzz_target!(|data: (&str, &str)| {
    let (Ok(base), Ok(r)) = (AbsoluteUri::parse(data.0), Uri::parse(data.1)) else {
        return;
    };

    let u1 = base.resolve(&r);
    let u2 = AbsoluteUri::parse(u1.as_str()).unwrap();

    assert_eq!(u1.scheme(), u2.scheme());
    assert_eq!(u1.authority(), u2.authority());
    assert_eq!(u1.path(), u2.path());
    assert_eq!(u1.query(), u2.query());
    assert_eq!(u1.fragment(), u2.fragment());
    assert_eq!(Uri::from(u1.clone()).kind(), Uri::from(u2).kind());

    // Resolving the target again changes nothing but its normal form.
    assert_eq!(base.resolve(&u1.clone().into()), u1.normalise());
});
