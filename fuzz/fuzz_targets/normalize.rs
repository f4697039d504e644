#![no_main]
use libfuzzer_sys::fuzz_target;
use typed_uri::Uri;

fuzz_target!(|data: &str| {
    let Ok(r) = Uri::parse(data) else {
        return;
    };

    let r1 = r.normalise();
    let r2 = Uri::parse(r1.as_str()).unwrap();

    assert_eq!(r1.kind(), r2.kind());
    assert_eq!(r1.scheme(), r2.scheme());
    assert_eq!(r1.authority().is_some(), r2.authority().is_some());

    if let Some(a1) = r1.authority() {
        let a2 = r2.authority().unwrap();
        assert_eq!(a1.user_info(), a2.user_info());
        assert_eq!(a1.host(), a2.host());
        assert_eq!(a1.host().kind(), a2.host().kind());
        assert_eq!(a1.maybe_port(), a2.maybe_port());
    }

    assert_eq!(r1.path(), r2.path());
    assert_eq!(r1.query(), r2.query());
    assert_eq!(r1.fragment(), r2.fragment());

    assert!(r1.is_normal_form());
    assert_eq!(r.is_normal_form(), r == r1);
    assert_eq!(r1.normalise(), r1);
});
