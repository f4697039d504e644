//! Reference resolution as described in
//! [Section 5.2 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2).

use crate::{
    component::{remove_dot_segments, Authority, Path, Query},
    internal::{Parts, Sealed},
    AbsoluteUri, AbsoluteUrl, Uri, Url,
};

impl AbsoluteUri {
    /// Resolves a URI reference against this absolute URI.
    ///
    /// A reference with a scheme is returned [normalised](Uri::normalise).
    /// Otherwise the algorithm of
    /// [Section 5.2.2 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.2)
    /// is applied: the fragment of the base is ignored, and dot segments are
    /// removed from the resulting path. Resolution never fails; a `".."`
    /// segment that would go above the root is dropped.
    ///
    /// When the result has no authority, leading slashes of its path are
    /// collapsed into one so that the path cannot be read as an authority.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_uri::{AbsoluteUri, Uri};
    ///
    /// let base = AbsoluteUri::parse("http://example.com/a/b/")?;
    /// assert_eq!(base.resolve(&Uri::parse("../c")?).as_str(), "http://example.com/a/c");
    /// assert_eq!(base.resolve(&Uri::parse("//other")?).as_str(), "http://other");
    /// assert_eq!(base.resolve(&Uri::parse("?q")?).as_str(), "http://example.com/a/b/?q");
    ///
    /// let base = AbsoluteUri::parse("mailto:a@example.com")?;
    /// assert_eq!(base.resolve(&Uri::parse("#top")?).as_str(), "mailto:a@example.com#top");
    /// # Ok::<_, typed_uri::error::IllegalUriReference>(())
    /// ```
    #[must_use]
    pub fn resolve(&self, reference: &Uri) -> AbsoluteUri {
        let t = resolve(
            self.authority(),
            self.path(),
            self.query(),
            reference.normalise_if_absolute(),
        );
        AbsoluteUri::from_parts(
            t.scheme.unwrap_or_else(|| self.scheme().clone()),
            t.authority,
            t.path,
            t.query,
            t.fragment,
        )
    }
}

impl AbsoluteUrl {
    /// Resolves a URL against this absolute URL.
    ///
    /// See [`AbsoluteUri::resolve`] for the exact behavior of this method.
    /// The result always has an authority, as the base has one.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_uri::{AbsoluteUrl, Url};
    ///
    /// let base = AbsoluteUrl::parse("https://example.com/docs/index.html?v=1#intro")?;
    /// let url = base.resolve(&Url::parse("guide.html#setup")?);
    /// assert_eq!(url.as_str(), "https://example.com/docs/guide.html#setup");
    /// assert_eq!(url.authority().host(), "example.com");
    /// # Ok::<_, typed_uri::error::IllegalUriReference>(())
    /// ```
    #[must_use]
    pub fn resolve(&self, reference: &Url) -> AbsoluteUrl {
        let t = resolve(
            Some(self.authority()),
            self.path(),
            self.query(),
            Uri::from(reference.clone()).normalise_if_absolute(),
        );
        AbsoluteUrl::from_parts(
            t.scheme.unwrap_or_else(|| self.scheme().clone()),
            t.authority.unwrap_or_else(|| self.authority().clone()),
            t.path,
            t.query,
            t.fragment,
        )
    }
}

impl Uri {
    /// Returns the components of the reference, normalised if it has a scheme.
    fn normalise_if_absolute(&self) -> Parts {
        if self.scheme().is_some() {
            self.normalise().to_parts()
        } else {
            self.to_parts()
        }
    }
}

/// Computes the target components from the base components and those of
/// the reference. The scheme is left unset unless the reference has one.
fn resolve(
    base_authority: Option<&Authority>,
    base_path: &Path,
    base_query: Option<&Query>,
    r: Parts,
) -> Parts {
    if r.scheme.is_some() {
        return r;
    }

    let (authority, path, query) = if r.authority.is_some() {
        (r.authority, dot_free(r.path.as_str()), r.query)
    } else if r.path.is_empty() {
        (
            base_authority.cloned(),
            base_path.clone(),
            r.query.or_else(|| base_query.cloned()),
        )
    } else if r.path.is_absolute() {
        (base_authority.cloned(), dot_free(r.path.as_str()), r.query)
    } else {
        let merged = merge(base_authority.is_some(), base_path, &r.path);
        (base_authority.cloned(), dot_free(&merged), r.query)
    };

    let path = if authority.is_none() {
        path.collapse_leading_slashes()
    } else {
        path
    };

    Parts {
        scheme: None,
        authority,
        path,
        query,
        fragment: r.fragment,
    }
}

/// Merges a relative path with the path of the base, as described in
/// [Section 5.2.3 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.3).
fn merge(base_has_authority: bool, base_path: &Path, r_path: &Path) -> String {
    let base = base_path.as_str();
    if base_has_authority && base.is_empty() {
        return format!("/{r_path}");
    }
    match base.rfind('/') {
        Some(i) => format!("{}{r_path}", &base[..=i]),
        None => r_path.as_str().to_owned(),
    }
}

fn dot_free(path: &str) -> Path {
    let (path, _underflow) = remove_dot_segments(path);
    Path::from_string_unchecked(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_paths() {
        let p = |s: &str| Path::parse(s).unwrap();
        assert_eq!(merge(true, &p(""), &p("g")), "/g");
        assert_eq!(merge(false, &p(""), &p("g")), "g");
        assert_eq!(merge(true, &p("/b/c/d;p"), &p("g")), "/b/c/g");
        assert_eq!(merge(false, &p("a/b"), &p("g")), "a/g");
        assert_eq!(merge(false, &p("ab"), &p("g")), "g");
    }

    #[test]
    fn base_fragment_ignored() {
        let base = AbsoluteUri::parse("http://a/b/c?q#frag").unwrap();
        assert_eq!(base.resolve(&Uri::parse("").unwrap()).as_str(), "http://a/b/c?q");
        assert_eq!(base.resolve(&Uri::parse("#x").unwrap()).as_str(), "http://a/b/c?q#x");
    }

    #[test]
    fn opaque_base() {
        let base = AbsoluteUri::parse("foo:a/b").unwrap();
        assert_eq!(base.resolve(&Uri::parse("c").unwrap()).as_str(), "foo:a/c");
        assert_eq!(base.resolve(&Uri::parse("../../c").unwrap()).as_str(), "foo:c");
        assert_eq!(base.resolve(&Uri::parse("/.//c").unwrap()).as_str(), "foo:/c");
        assert_eq!(
            base.resolve(&Uri::parse("//h").unwrap()).as_str(),
            "foo://h"
        );
    }

    #[test]
    fn absolute_reference_is_normalised() {
        let base = AbsoluteUri::parse("http://a/b").unwrap();
        let r = Uri::parse("HTTP://Example.com:80/x/../y").unwrap();
        assert_eq!(base.resolve(&r).as_str(), "http://example.com/y");
    }
}
