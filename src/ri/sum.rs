use super::{
    leaf::urn_nid_end, sum_type, widen, BaseUrl, FragmentUrl, OpaqueUri, Origin, PathAndQuery,
    QueryUrl, RelativeRef, SchemeRelativeUrl, Urn,
};
use crate::{
    component::{Authority, Fragment, Path, Query},
    internal::{Parts, Sealed},
    memo::Cache,
    scheme::Scheme,
};

sum_type! {
    /// A URI reference of any kind.
    ///
    /// Parsing a `Uri` never fails for a well-formed reference: the kind of
    /// reference is found from the components present, and can be matched on.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_uri::{error::ReferenceKind, Uri};
    ///
    /// let uri = Uri::parse("foo://user@example.com:8042/over/there?name=ferret#nose")?;
    /// assert_eq!(uri.kind(), ReferenceKind::FragmentUrl);
    /// assert_eq!(uri.scheme().unwrap().as_str(), "foo");
    /// let auth = uri.authority().unwrap();
    /// assert_eq!(auth.user_info().unwrap().username(), "user");
    /// assert_eq!(auth.host(), "example.com");
    /// assert_eq!(auth.port().unwrap().value(), 8042);
    /// assert_eq!(uri.path(), "/over/there");
    /// assert_eq!(uri.query().unwrap(), "name=ferret");
    /// assert_eq!(uri.fragment().unwrap(), "nose");
    ///
    /// assert_eq!(Uri::parse("urn:example:animal")?.kind(), ReferenceKind::Urn);
    /// assert_eq!(Uri::parse("../a")?.kind(), ReferenceKind::RelativeRef);
    /// # Ok::<_, typed_uri::error::IllegalUriReference>(())
    /// ```
    Uri, "a URI reference",
    scheme: opt,
    authority: opt,
    [Origin, BaseUrl, QueryUrl, FragmentUrl, OpaqueUri, Urn, SchemeRelativeUrl, PathAndQuery, RelativeRef]
}

sum_type! {
    /// A URL: a URI reference that is not an [`OpaqueUri`] nor a [`Urn`].
    Url, "a URL",
    scheme: opt,
    authority: opt,
    [Origin, BaseUrl, QueryUrl, FragmentUrl, SchemeRelativeUrl, PathAndQuery, RelativeRef]
}

sum_type! {
    /// A URI reference with a scheme.
    AbsoluteUri, "an absolute URI",
    scheme: req,
    authority: opt,
    [Origin, BaseUrl, QueryUrl, FragmentUrl, OpaqueUri, Urn]
}

sum_type! {
    /// A URI reference with a scheme and an authority.
    AbsoluteUrl, "an absolute URL",
    scheme: req,
    authority: req,
    [Origin, BaseUrl, QueryUrl, FragmentUrl]
}

sum_type! {
    /// An absolute URL without fragment, as sent to a server.
    ServersideAbsoluteUrl, "a serverside absolute URL",
    scheme: req,
    authority: req,
    [Origin, BaseUrl, QueryUrl]
}

sum_type! {
    /// A URI reference without scheme.
    RelativeUrl, "a relative URL",
    scheme: opt,
    authority: opt,
    [SchemeRelativeUrl, PathAndQuery, RelativeRef]
}

widen!(ServersideAbsoluteUrl [Origin, BaseUrl, QueryUrl] => AbsoluteUrl, AbsoluteUri, Url, Uri);
widen!(AbsoluteUrl [Origin, BaseUrl, QueryUrl, FragmentUrl] => AbsoluteUri, Url, Uri);
widen!(AbsoluteUri [Origin, BaseUrl, QueryUrl, FragmentUrl, OpaqueUri, Urn] => Uri);
widen!(RelativeUrl [SchemeRelativeUrl, PathAndQuery, RelativeRef] => Url, Uri);
widen!(Url [Origin, BaseUrl, QueryUrl, FragmentUrl, SchemeRelativeUrl, PathAndQuery, RelativeRef] => Uri);

macro_rules! narrow_from_uri {
    ($($Ty:ident),+) => {
        $(
            impl TryFrom<Uri> for $Ty {
                type Error = Uri;

                fn try_from(uri: Uri) -> Result<Self, Uri> {
                    Self::from_uri(uri)
                }
            }
        )+
    };
}

narrow_from_uri!(Url, AbsoluteUri, AbsoluteUrl, ServersideAbsoluteUrl, RelativeUrl);

impl Uri {
    /// Classifies the components into the matching kind of reference.
    ///
    /// The components must satisfy [`Parts::validate`].
    pub(crate) fn from_parts(parts: Parts) -> Self {
        let Parts {
            scheme,
            authority,
            path,
            query,
            fragment,
        } = parts;
        match scheme {
            Some(scheme) => AbsoluteUri::from_parts(scheme, authority, path, query, fragment).into(),
            None => RelativeUrl::from_parts(authority, path, query, fragment).into(),
        }
    }
}

impl AbsoluteUri {
    pub(crate) fn from_parts(
        scheme: Scheme,
        authority: Option<Authority>,
        path: Path,
        query: Option<Query>,
        fragment: Option<Fragment>,
    ) -> Self {
        if let Some(authority) = authority {
            return AbsoluteUrl::from_parts(scheme, authority, path, query, fragment).into();
        }
        match urn_nid_end(&scheme, &path) {
            Some(nid_end) => Urn {
                scheme,
                path,
                nid_end,
                query,
                fragment,
                cache: Cache::new(),
            }
            .into(),
            None => OpaqueUri {
                scheme,
                path,
                query,
                fragment,
                cache: Cache::new(),
            }
            .into(),
        }
    }
}

impl AbsoluteUrl {
    pub(crate) fn from_parts(
        scheme: Scheme,
        authority: Authority,
        path: Path,
        query: Option<Query>,
        fragment: Option<Fragment>,
    ) -> Self {
        match (query, fragment) {
            (query, Some(fragment)) => FragmentUrl {
                scheme,
                authority,
                path,
                query,
                fragment,
                cache: Cache::new(),
            }
            .into(),
            (Some(query), None) => QueryUrl {
                scheme,
                authority,
                path,
                query,
                cache: Cache::new(),
            }
            .into(),
            (None, None) => ServersideAbsoluteUrl::from_parts(scheme, authority, path).into(),
        }
    }
}

impl ServersideAbsoluteUrl {
    pub(crate) fn from_parts(scheme: Scheme, authority: Authority, path: Path) -> Self {
        if path.is_empty() && authority.is_host_and_port() {
            Origin {
                scheme,
                authority,
                cache: Cache::new(),
            }
            .into()
        } else {
            BaseUrl {
                scheme,
                authority,
                path,
                cache: Cache::new(),
            }
            .into()
        }
    }
}

impl RelativeUrl {
    pub(crate) fn from_parts(
        authority: Option<Authority>,
        path: Path,
        query: Option<Query>,
        fragment: Option<Fragment>,
    ) -> Self {
        if let Some(authority) = authority {
            return SchemeRelativeUrl {
                authority,
                path,
                query,
                fragment,
                cache: Cache::new(),
            }
            .into();
        }
        if fragment.is_some() || path.is_rootless() {
            RelativeRef {
                path,
                query,
                fragment,
                cache: Cache::new(),
            }
            .into()
        } else {
            PathAndQuery {
                path,
                query,
                cache: Cache::new(),
            }
            .into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Reason, ReferenceKind};

    #[test]
    fn classify() {
        let cases = [
            ("http://example.com", ReferenceKind::Origin),
            ("http://example.com:8080", ReferenceKind::Origin),
            ("http://example.com:", ReferenceKind::BaseUrl),
            ("http://user@example.com", ReferenceKind::BaseUrl),
            ("http://example.com/", ReferenceKind::BaseUrl),
            ("http://example.com?", ReferenceKind::QueryUrl),
            ("http://example.com/a?b", ReferenceKind::QueryUrl),
            ("http://example.com#", ReferenceKind::FragmentUrl),
            ("http://example.com/?a#b", ReferenceKind::FragmentUrl),
            ("mailto:user@example.com", ReferenceKind::OpaqueUri),
            ("http:/a", ReferenceKind::OpaqueUri),
            ("urn:isbn:0451450523", ReferenceKind::Urn),
            ("urn:isbn", ReferenceKind::OpaqueUri),
            ("//example.com", ReferenceKind::SchemeRelativeUrl),
            ("//example.com/a?b#c", ReferenceKind::SchemeRelativeUrl),
            ("", ReferenceKind::PathAndQuery),
            ("/a?b", ReferenceKind::PathAndQuery),
            ("?b", ReferenceKind::PathAndQuery),
            ("a/b", ReferenceKind::RelativeRef),
            ("#f", ReferenceKind::RelativeRef),
            ("/a#f", ReferenceKind::RelativeRef),
        ];
        for (input, kind) in cases {
            let uri = Uri::parse(input).unwrap();
            assert_eq!(uri.kind(), kind, "{input}");
            assert_eq!(uri.as_str(), input);
        }
    }

    #[test]
    fn conversions() {
        let url = AbsoluteUrl::parse("http://example.com").unwrap();
        let uri = Uri::from(url.clone());
        assert_eq!(uri.kind(), ReferenceKind::Origin);
        assert_eq!(AbsoluteUrl::try_from(uri.clone()).unwrap(), url);
        assert!(RelativeUrl::try_from(uri.clone()).is_err());
        let origin = Origin::try_from(uri).unwrap();
        assert_eq!(origin.as_str(), "http://example.com");

        let sau: ServersideAbsoluteUrl = origin.clone().into();
        assert_eq!(Url::from(sau.clone()).kind(), ReferenceKind::Origin);
        assert_eq!(AbsoluteUri::from(sau).as_str(), "http://example.com");

        let r = RelativeUrl::parse("a?b").unwrap();
        assert!(matches!(Url::from(r), Url::RelativeRef(_)));
    }

    #[test]
    fn wrong_kind() {
        let e = AbsoluteUrl::parse("mailto:a@b").unwrap_err();
        assert_eq!(e.kind(), ReferenceKind::AbsoluteUrl);
        assert_eq!(
            e.reason(),
            Reason::WrongKind {
                found: ReferenceKind::OpaqueUri
            }
        );
        assert!(e.cause().is_none());

        let e = Url::parse("a:b:c d").unwrap_err();
        assert_eq!(e.kind(), ReferenceKind::Url);
        assert_eq!(e.reason(), Reason::Syntax);
    }

    #[test]
    fn variant_exclusivity() {
        let a = Uri::parse("/a?b").unwrap();
        let b = Uri::parse("/a?b#").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, Uri::parse("/a?b").unwrap());

        let origin = Uri::parse("http://example.com").unwrap();
        let base = Uri::parse("http://example.com/").unwrap();
        assert_ne!(origin, base);
        assert_eq!(origin.normalise(), origin);
    }

    #[test]
    fn accessors() {
        let url = AbsoluteUrl::parse("https://example.com/a?b").unwrap();
        assert_eq!(url.scheme().as_str(), "https");
        assert_eq!(url.authority().host(), "example.com");
        assert_eq!(url.path(), "/a");
        assert_eq!(url.query().unwrap(), "b");
        assert!(url.fragment().is_none());

        let origin = Origin::parse("https://example.com").unwrap();
        assert_eq!(origin.path(), "");
        assert!(origin.query().is_none());

        let r = RelativeUrl::parse("//h/p").unwrap();
        assert!(r.scheme().is_none());
        assert_eq!(r.authority().unwrap().host(), "h");
    }
}
