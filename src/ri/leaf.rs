use super::{leaf_type, AbsoluteUri, ServersideAbsoluteUrl};
use crate::{
    component::{Authority, Fragment, HostAndPort, Path, Query},
    error::{IllegalUriPart, PartErrorKind, UriPart},
    internal::Context,
    memo::Cache,
    normalize,
    pct_enc::{encoder, EStr},
    scheme::Scheme,
};

/// An [origin]: a scheme, a host and an optional port, with nothing else.
///
/// An origin is what the web security model compares to decide whether two
/// resources may access each other.
///
/// [origin]: https://datatracker.ietf.org/doc/html/rfc6454
///
/// # Examples
///
/// ```
/// use typed_uri::Origin;
///
/// let origin = Origin::parse("https://Example.COM:443")?;
/// assert_eq!(origin.host_and_port().host(), "Example.COM");
/// assert_eq!(origin.normalise().as_str(), "https://example.com");
/// assert!(Origin::parse("https://example.com/").is_err());
/// # Ok::<_, typed_uri::error::IllegalUriReference>(())
/// ```
#[derive(Clone)]
pub struct Origin {
    pub(super) scheme: Scheme,
    // Never has userinfo nor an empty port.
    pub(super) authority: Authority,
    pub(super) cache: Cache<Origin>,
}

leaf_type! {
    Origin, "an origin", Normal = Origin,
    scheme: req,
    authority: req,
    path: empty,
    query: none,
    fragment: none,
}

impl Origin {
    /// Creates an origin from a scheme and a host with an optional port.
    #[must_use]
    pub fn new(scheme: Scheme, host_and_port: HostAndPort) -> Self {
        Self {
            scheme,
            authority: host_and_port.into(),
            cache: Cache::new(),
        }
    }

    /// Returns the host and the port of the origin.
    #[must_use]
    pub fn host_and_port(&self) -> HostAndPort {
        HostAndPort::new(self.authority.host().clone(), self.authority.port())
    }

    fn normalise_with(&self, cx: &mut Context<'_>) -> Origin {
        let scheme = normalize::scheme(cx, &self.scheme);
        let authority = normalize::authority(&self.authority, Some(&scheme));
        Origin {
            scheme,
            authority,
            cache: Cache::new(),
        }
    }
}

/// An absolute URL with no query and no fragment, typically used as the
/// base against which relative URLs are resolved.
///
/// # Examples
///
/// ```
/// use typed_uri::{BaseUrl, ServersideAbsoluteUrl};
///
/// let url = BaseUrl::parse("http://user@example.com")?;
/// assert_eq!(url.normalise().as_str(), "http://user@example.com/");
///
/// let url = BaseUrl::parse("http://example.com:80/")?;
/// assert!(matches!(url.normalise(), ServersideAbsoluteUrl::BaseUrl(_)));
/// assert_eq!(url.normalise().as_str(), "http://example.com/");
/// # Ok::<_, typed_uri::error::IllegalUriReference>(())
/// ```
#[derive(Clone)]
pub struct BaseUrl {
    pub(super) scheme: Scheme,
    pub(super) authority: Authority,
    // Empty or absolute, and not empty if `authority` is a host and port.
    pub(super) path: Path,
    pub(super) cache: Cache<ServersideAbsoluteUrl>,
}

leaf_type! {
    BaseUrl, "a base URL", Normal = ServersideAbsoluteUrl,
    scheme: req,
    authority: req,
    path: req,
    query: none,
    fragment: none,
}

impl BaseUrl {
    fn normalise_with(&self, cx: &mut Context<'_>) -> ServersideAbsoluteUrl {
        let scheme = normalize::scheme(cx, &self.scheme);
        let authority = normalize::authority(&self.authority, Some(&scheme));
        let path = normalize::path_after(cx, &self.path, &authority, true);
        ServersideAbsoluteUrl::from_parts(scheme, authority, path)
    }
}

/// An absolute URL with a query but no fragment.
#[derive(Clone)]
pub struct QueryUrl {
    pub(super) scheme: Scheme,
    pub(super) authority: Authority,
    pub(super) path: Path,
    pub(super) query: Query,
    pub(super) cache: Cache<QueryUrl>,
}

leaf_type! {
    QueryUrl, "an absolute URL with query", Normal = QueryUrl,
    scheme: req,
    authority: req,
    path: req,
    query: req,
    fragment: none,
}

impl QueryUrl {
    fn normalise_with(&self, cx: &mut Context<'_>) -> QueryUrl {
        let scheme = normalize::scheme(cx, &self.scheme);
        let authority = normalize::authority(&self.authority, Some(&scheme));
        let path = normalize::path_after(cx, &self.path, &authority, false);
        QueryUrl {
            scheme,
            authority,
            path,
            query: self.query.normalise(),
            cache: Cache::new(),
        }
    }
}

/// An absolute URL with a fragment.
///
/// # Examples
///
/// ```
/// use typed_uri::FragmentUrl;
///
/// let url = FragmentUrl::parse("https://example.com/doc#Intro")?;
/// assert_eq!(url.fragment().as_str(), "Intro");
/// assert!(url.query().is_none());
/// # Ok::<_, typed_uri::error::IllegalUriReference>(())
/// ```
#[derive(Clone)]
pub struct FragmentUrl {
    pub(super) scheme: Scheme,
    pub(super) authority: Authority,
    pub(super) path: Path,
    pub(super) query: Option<Query>,
    pub(super) fragment: Fragment,
    pub(super) cache: Cache<FragmentUrl>,
}

leaf_type! {
    FragmentUrl, "an absolute URL with fragment", Normal = FragmentUrl,
    scheme: req,
    authority: req,
    path: req,
    query: opt,
    fragment: req,
}

impl FragmentUrl {
    fn normalise_with(&self, cx: &mut Context<'_>) -> FragmentUrl {
        let scheme = normalize::scheme(cx, &self.scheme);
        let authority = normalize::authority(&self.authority, Some(&scheme));
        let path = normalize::path_after(cx, &self.path, &authority, false);
        FragmentUrl {
            scheme,
            authority,
            path,
            query: self.query.as_ref().map(Query::normalise),
            fragment: self.fragment.normalise(),
            cache: Cache::new(),
        }
    }
}

/// An absolute URI without authority that is not a [`Urn`],
/// such as `mailto:user@example.com`.
#[derive(Clone)]
pub struct OpaqueUri {
    pub(super) scheme: Scheme,
    // Does not start with "//".
    pub(super) path: Path,
    pub(super) query: Option<Query>,
    pub(super) fragment: Option<Fragment>,
    pub(super) cache: Cache<AbsoluteUri>,
}

leaf_type! {
    OpaqueUri, "an opaque URI", Normal = AbsoluteUri,
    scheme: req,
    authority: none,
    path: req,
    query: opt,
    fragment: opt,
}

impl OpaqueUri {
    fn normalise_with(&self, cx: &mut Context<'_>) -> AbsoluteUri {
        let scheme = normalize::scheme(cx, &self.scheme);
        let encoded = self.path.normalise_encoding();
        let path = if urn_nid_end(&scheme, &encoded).is_some() {
            encoded
        } else {
            normalize::path(cx, &self.path)
        };
        let normal = AbsoluteUri::from_parts(
            scheme,
            None,
            path,
            self.query.as_ref().map(Query::normalise),
            self.fragment.as_ref().map(Fragment::normalise),
        );
        // Decoding may reveal a URN, whose NID then needs lowercasing.
        match normal {
            AbsoluteUri::Urn(urn) => urn.normalise_with(cx).into(),
            other => other,
        }
    }
}

/// A [uniform resource name][rfc], of the form `urn:NID:NSS`.
///
/// [rfc]: https://datatracker.ietf.org/doc/html/rfc8141
///
/// # Examples
///
/// ```
/// use typed_uri::Urn;
///
/// let urn = Urn::parse("URN:ISBN:0-395-36341-1")?;
/// assert_eq!(urn.nid(), "ISBN");
/// assert_eq!(urn.nss().as_str(), "0-395-36341-1");
/// assert_eq!(urn.normalise().as_str(), "urn:isbn:0-395-36341-1");
///
/// assert!(Urn::parse("urn:x:y").is_err());
/// # Ok::<_, typed_uri::error::IllegalUriReference>(())
/// ```
#[derive(Clone)]
pub struct Urn {
    pub(super) scheme: Scheme,
    pub(super) path: Path,
    // Index of the colon after the NID in `path`.
    pub(super) nid_end: usize,
    pub(super) query: Option<Query>,
    pub(super) fragment: Option<Fragment>,
    pub(super) cache: Cache<Urn>,
}

leaf_type! {
    Urn, "a URN", Normal = Urn,
    scheme: req,
    authority: none,
    path: req,
    query: opt,
    fragment: opt,
}

impl Urn {
    /// Creates a URN from a namespace identifier and a percent-encoded
    /// namespace-specific string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the NSS is not a valid path, or if the NID
    /// or the NSS is not of the form a URN requires.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_uri::{error::PartErrorKind, Urn};
    ///
    /// let urn = Urn::new("isbn", "0451450523")?;
    /// assert_eq!(urn.as_str(), "urn:isbn:0451450523");
    ///
    /// let e = Urn::new("x", "y").unwrap_err();
    /// assert_eq!(e.kind(), PartErrorKind::NotAUrn);
    /// # Ok::<_, typed_uri::error::IllegalUriPart>(())
    /// ```
    pub fn new(nid: &str, nss: &str) -> Result<Self, IllegalUriPart> {
        let scheme = Scheme::parse("urn")?;
        let path = Path::parse(&format!("{nid}:{nss}"))?;
        match urn_nid_end(&scheme, &path) {
            Some(nid_end) => Ok(Self {
                scheme,
                path,
                nid_end,
                query: None,
                fragment: None,
                cache: Cache::new(),
            }),
            None => Err(IllegalUriPart::new(
                UriPart::Path,
                path.as_str(),
                PartErrorKind::NotAUrn,
            )),
        }
    }

    /// Returns the namespace identifier.
    #[must_use]
    pub fn nid(&self) -> &str {
        &self.path.as_str()[..self.nid_end]
    }

    /// Returns the namespace-specific string.
    #[must_use]
    pub fn nss(&self) -> &EStr<encoder::Path> {
        EStr::new_validated(&self.path.as_str()[self.nid_end + 1..])
    }

    fn normalise_with(&self, cx: &mut Context<'_>) -> Urn {
        let scheme = normalize::scheme(cx, &self.scheme);
        // The NSS is opaque, so its dot segments stay.
        let path = self.path.normalise_encoding();
        let nid = self.nid().to_ascii_lowercase();
        let path = if nid == self.nid() {
            path
        } else {
            let nss = path.as_str().get(nid.len()..).unwrap_or_default();
            Path::from_string_unchecked(format!("{nid}{nss}"))
        };
        Urn {
            scheme,
            path,
            nid_end: self.nid_end,
            query: self.query.as_ref().map(Query::normalise),
            fragment: self.fragment.as_ref().map(Fragment::normalise),
            cache: Cache::new(),
        }
    }
}

/// Returns the index of the colon after the NID if the scheme and the path form a URN.
///
/// The NID must match `[A-Za-z0-9][A-Za-z0-9-]{0,30}[A-Za-z0-9]`
/// and the NSS must not be empty.
pub(super) fn urn_nid_end(scheme: &Scheme, path: &Path) -> Option<usize> {
    if !scheme.eq_ignore_case("urn") {
        return None;
    }
    let (nid, nss) = path.as_str().split_once(':')?;
    let valid = match nid.as_bytes() {
        [first, middle @ .., last] => {
            middle.len() <= 30
                && first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && middle.iter().all(|&x| x.is_ascii_alphanumeric() || x == b'-')
        }
        _ => false,
    };
    (valid && !nss.is_empty()).then_some(nid.len())
}

/// A relative URL with an authority, such as `//example.com/path`.
#[derive(Clone)]
pub struct SchemeRelativeUrl {
    pub(super) authority: Authority,
    pub(super) path: Path,
    pub(super) query: Option<Query>,
    pub(super) fragment: Option<Fragment>,
    pub(super) cache: Cache<SchemeRelativeUrl>,
}

leaf_type! {
    SchemeRelativeUrl, "a scheme-relative URL", Normal = SchemeRelativeUrl,
    scheme: none,
    authority: req,
    path: req,
    query: opt,
    fragment: opt,
}

impl SchemeRelativeUrl {
    fn normalise_with(&self, cx: &mut Context<'_>) -> SchemeRelativeUrl {
        let authority = normalize::authority(&self.authority, None);
        let path = normalize::path_after(cx, &self.path, &authority, false);
        SchemeRelativeUrl {
            authority,
            path,
            query: self.query.as_ref().map(Query::normalise),
            fragment: self.fragment.as_ref().map(Fragment::normalise),
            cache: Cache::new(),
        }
    }
}

/// An empty or absolute path with an optional query, as found in the
/// request line of an HTTP request.
///
/// # Examples
///
/// ```
/// use typed_uri::PathAndQuery;
///
/// let r = PathAndQuery::parse("/search?q=rust")?;
/// assert_eq!(r.path(), "/search");
/// assert_eq!(r.query().unwrap().get_first("q").unwrap(), "rust");
/// assert!(PathAndQuery::parse("search").is_err());
/// # Ok::<_, typed_uri::error::IllegalUriReference>(())
/// ```
#[derive(Clone)]
pub struct PathAndQuery {
    // Empty or absolute, and never starting with "//".
    pub(super) path: Path,
    pub(super) query: Option<Query>,
    pub(super) cache: Cache<PathAndQuery>,
}

leaf_type! {
    PathAndQuery, "a path and query", Normal = PathAndQuery,
    scheme: none,
    authority: none,
    path: req,
    query: opt,
    fragment: none,
}

impl PathAndQuery {
    fn normalise_with(&self, cx: &mut Context<'_>) -> PathAndQuery {
        PathAndQuery {
            path: normalize::path(cx, &self.path),
            query: self.query.as_ref().map(Query::normalise),
            cache: Cache::new(),
        }
    }
}

/// A relative reference without authority that has a fragment or a
/// rootless path, such as `../a/b`.
#[derive(Clone)]
pub struct RelativeRef {
    pub(super) path: Path,
    pub(super) query: Option<Query>,
    // Present if the path is empty or absolute.
    pub(super) fragment: Option<Fragment>,
    pub(super) cache: Cache<RelativeRef>,
}

leaf_type! {
    RelativeRef, "a relative reference", Normal = RelativeRef,
    scheme: none,
    authority: none,
    path: req,
    query: opt,
    fragment: opt,
}

impl RelativeRef {
    fn normalise_with(&self, cx: &mut Context<'_>) -> RelativeRef {
        RelativeRef {
            path: normalize::relative_path(cx, &self.path),
            query: self.query.as_ref().map(Query::normalise),
            fragment: self.fragment.as_ref().map(Fragment::normalise),
            cache: Cache::new(),
        }
    }
}
