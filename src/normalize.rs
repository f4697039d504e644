//! Module for normalisation.
//!
//! Every reference type has a `normalise` method that memoises its result.
//! A [`Normalizer`] does the same work under a custom configuration.

use crate::{
    component::{Authority, Path},
    error::NormaliseError,
    internal::{first_segment_colon, Context},
    scheme::{Scheme, SchemeRegistry},
    Reference,
};

/// A configurable URI reference normaliser.
///
/// # Examples
///
/// ```
/// use typed_uri::{component::Port, normalize::Normalizer, scheme::SchemeRegistry, Uri};
///
/// let registry = SchemeRegistry::new();
/// registry.register("foo", Some(Port::of(4673)?))?;
///
/// let uri = Uri::parse("FOO://localhost:4673/a/./b")?;
/// let normal = Normalizer::new().registry(&registry).normalise(&uri)?;
/// assert_eq!(normal.as_str(), "foo://localhost/a/b");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct Normalizer<'a> {
    allow_path_underflow: bool,
    registry: Option<&'a SchemeRegistry>,
}

impl Default for Normalizer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Normalizer<'a> {
    /// Creates a new `Normalizer` with default configuration.
    pub fn new() -> Self {
        Self {
            allow_path_underflow: true,
            registry: None,
        }
    }

    /// Sets whether to allow underflow in path normalisation.
    ///
    /// This defaults to `true`. A value of `false` is a deviation from the
    /// normalisation methods described in
    /// [Section 6 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-6).
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_uri::{error::NormaliseError, normalize::Normalizer, Uri};
    ///
    /// let normalizer = Normalizer::new().allow_path_underflow(false);
    /// let uri = Uri::parse("http://example.com/..")?;
    ///
    /// assert_eq!(normalizer.normalise(&uri).unwrap_err(), NormaliseError::PathUnderflow);
    /// # Ok::<_, typed_uri::error::IllegalUriReference>(())
    /// ```
    pub fn allow_path_underflow(mut self, value: bool) -> Self {
        self.allow_path_underflow = value;
        self
    }

    /// Sets the registry in which to look up schemes and their default ports.
    ///
    /// This defaults to [`SchemeRegistry::global`].
    pub fn registry(mut self, registry: &'a SchemeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Normalises the given URI reference.
    ///
    /// See the `normalise` method of each reference type for the exact
    /// behavior of this method. Unlike that method, the result is not
    /// memoised.
    ///
    /// # Errors
    ///
    /// Returns `Err` if an underflow occurred in path normalisation
    /// when [`allow_path_underflow`] is set to `false`.
    ///
    /// [`allow_path_underflow`]: Self::allow_path_underflow
    pub fn normalise<T: Reference>(&self, r: &T) -> Result<T::Normal, NormaliseError> {
        let mut cx = Context {
            registry: self.registry.unwrap_or_else(|| SchemeRegistry::global()),
            underflow: false,
        };
        let normal = r.normalise_in(&mut cx);
        if cx.underflow && !self.allow_path_underflow {
            tracing::trace!(reference = %r, "rejected path underflow");
            return Err(NormaliseError::PathUnderflow);
        }
        Ok(normal)
    }
}

pub(crate) fn scheme(cx: &Context<'_>, scheme: &Scheme) -> Scheme {
    scheme.normalise_in(cx.registry)
}

/// Normalises an authority, removing the default port of the (normalised) scheme.
pub(crate) fn authority(authority: &Authority, scheme: Option<&Scheme>) -> Authority {
    authority.normalise_with_default(scheme.and_then(Scheme::default_port))
}

/// Normalises a path that is not preceded by an authority.
///
/// Leading slashes are collapsed into one so that the result cannot be
/// read as an authority.
pub(crate) fn path(cx: &mut Context<'_>, path: &Path) -> Path {
    let (path, underflow) = path.normalise_with_underflow();
    cx.underflow |= underflow;
    path.collapse_leading_slashes()
}

/// Normalises the path of a relative reference.
///
/// A first segment left with a colon is prefixed with `"./"` so that
/// it cannot be read as a scheme.
pub(crate) fn relative_path(cx: &mut Context<'_>, path: &Path) -> Path {
    let path = self::path(cx, path);
    if first_segment_colon(path.as_str()).is_some() {
        Path::from_string_unchecked(format!("./{path}"))
    } else {
        path
    }
}

/// Normalises a path that follows the given (normalised) authority.
///
/// An empty path becomes `"/"`, unless `allow_origin` is set and the
/// authority is a host and port, in which case the reference is an origin.
pub(crate) fn path_after(
    cx: &mut Context<'_>,
    path: &Path,
    authority: &Authority,
    allow_origin: bool,
) -> Path {
    let (path, underflow) = path.normalise_with_underflow();
    cx.underflow |= underflow;
    if path.is_empty() && !(allow_origin && authority.is_host_and_port()) {
        Path::root()
    } else {
        path
    }
}
