#![no_main]
use libfuzzer_sys::fuzz_target;
use typed_uri::Uri;

fuzz_target!(|data: &str| {
    let Ok(r) = Uri::parse(data) else {
        return;
    };
    let mut buf = String::with_capacity(data.len());
    if let Some(s) = r.scheme() {
        buf.push_str(s.as_str());
        buf.push(':');
    }
    if let Some(a) = r.authority() {
        buf.push_str("//");
        let start = buf.len();
        if let Some(ui) = a.user_info() {
            buf.push_str(&ui.to_string());
            buf.push('@');
        }
        buf.push_str(a.host().as_str());
        match a.maybe_port() {
            Some(Some(p)) => {
                buf.push(':');
                buf.push_str(&p.to_string());
            }
            Some(None) => buf.push(':'),
            None => {}
        }
        assert_eq!(&buf[start..], a.to_string());
    }
    buf.push_str(r.path().as_str());
    if let Some(q) = r.query() {
        buf.push('?');
        buf.push_str(q.as_str());
    }
    if let Some(f) = r.fragment() {
        buf.push('#');
        buf.push_str(f.as_str());
    }
    assert_eq!(data, buf);
    assert_eq!(data, r.as_str());
});
