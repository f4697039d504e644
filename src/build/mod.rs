//! Module for URI reference building.

use crate::{
    component::{Authority, Fragment, Host, Path, Port, Query, UserInfo},
    error::BuildError,
    internal::Parts,
    scheme::Scheme,
    Reference, Uri,
};
use core::{fmt, marker::PhantomData};

/// A builder for URI references.
///
/// This struct is created by the `builder` and `thaw` methods of every
/// reference type, and builds a reference of that type.
/// Components can be set in any order and as many times as needed;
/// whether they form a valid reference is only checked by [`build`].
///
/// [`build`]: Self::build
///
/// # Examples
///
/// ```
/// use typed_uri::{
///     component::{Host, Path, Port, Query, UserInfo},
///     scheme::SchemeRegistry,
///     AbsoluteUrl, Uri,
/// };
///
/// let url = AbsoluteUrl::builder()
///     .set_scheme(SchemeRegistry::global().scheme("foo")?)
///     .set_user_info(UserInfo::parse("user")?)
///     .set_host(Host::parse("example.com")?)
///     .set_port(Port::of(8042)?)
///     .set_path(Path::parse("/over/there")?)
///     .set_query(Query::parse("name=ferret")?)
///     .build()?;
/// assert_eq!(url.as_str(), "foo://user@example.com:8042/over/there?name=ferret");
///
/// let uri = Uri::parse("http://example.com/a?b#c")?;
/// let stripped = uri.thaw().set_query(None).set_fragment(None).build()?;
/// assert_eq!(stripped.as_str(), "http://example.com/a");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub struct Builder<T = Uri> {
    scheme: Option<Scheme>,
    user_info: Option<UserInfo>,
    host: Option<Host>,
    port: Option<Option<Port>>,
    path: Path,
    query: Option<Query>,
    fragment: Option<Fragment>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Builder<T> {
    /// Creates a builder with no component set and an empty path.
    pub fn new() -> Self {
        Self {
            scheme: None,
            user_info: None,
            host: None,
            port: None,
            path: Path::empty(),
            query: None,
            fragment: None,
            _marker: PhantomData,
        }
    }

    pub(crate) fn from_parts(parts: Parts) -> Self {
        let mut b = Self::new();
        b.scheme = parts.scheme;
        b.set_authority(parts.authority);
        b.path = parts.path;
        b.query = parts.query;
        b.fragment = parts.fragment;
        b
    }

    /// Sets or removes the [scheme] component.
    ///
    /// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
    pub fn set_scheme(&mut self, scheme: impl Into<Option<Scheme>>) -> &mut Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets or removes the whole [authority] component,
    /// replacing its userinfo, host and port.
    ///
    /// [authority]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2
    pub fn set_authority(&mut self, authority: impl Into<Option<Authority>>) -> &mut Self {
        match authority.into() {
            Some(authority) => {
                self.user_info = authority.user_info().cloned();
                self.host = Some(authority.host().clone());
                self.port = authority.maybe_port();
            }
            None => {
                self.user_info = None;
                self.host = None;
                self.port = None;
            }
        }
        self
    }

    /// Sets or removes the userinfo subcomponent of authority.
    pub fn set_user_info(&mut self, user_info: impl Into<Option<UserInfo>>) -> &mut Self {
        self.user_info = user_info.into();
        self
    }

    /// Sets or removes the host subcomponent of authority.
    ///
    /// Authority is present exactly when a host is set.
    pub fn set_host(&mut self, host: impl Into<Option<Host>>) -> &mut Self {
        self.host = host.into();
        self
    }

    /// Sets or removes the port subcomponent of authority.
    pub fn set_port(&mut self, port: impl Into<Option<Port>>) -> &mut Self {
        self.port = port.into().map(Some);
        self
    }

    /// Sets an empty port subcomponent, as in `example.com:`.
    pub fn set_empty_port(&mut self) -> &mut Self {
        self.port = Some(None);
        self
    }

    /// Sets the [path] component.
    ///
    /// [path]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.3
    pub fn set_path(&mut self, path: Path) -> &mut Self {
        self.path = path;
        self
    }

    /// Sets or removes the [query] component.
    ///
    /// [query]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.4
    pub fn set_query(&mut self, query: impl Into<Option<Query>>) -> &mut Self {
        self.query = query.into();
        self
    }

    /// Sets or removes the [fragment] component.
    ///
    /// [fragment]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.5
    pub fn set_fragment(&mut self, fragment: impl Into<Option<Fragment>>) -> &mut Self {
        self.fragment = fragment.into();
        self
    }

    fn authority(&self) -> Result<Option<Authority>, BuildError> {
        match &self.host {
            Some(host) => Ok(Some(Authority::from_parts(
                self.user_info.clone(),
                host.clone(),
                self.port,
            ))),
            None if self.user_info.is_some() => Err(BuildError::UserInfoWithoutHost),
            None if self.port.is_some() => Err(BuildError::PortWithoutHost),
            None => Ok(None),
        }
    }
}

impl<T: Reference> Builder<T> {
    /// Builds the URI reference.
    ///
    /// The components are classified into the matching kind of reference
    /// the same way parsing does.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any of the following conditions is not met.
    ///
    /// - Userinfo and port can only be set along with a host.
    /// - When authority is present, the path must either be empty or start with `'/'`.
    /// - When authority is not present, the path cannot start with `"//"`.
    /// - When neither scheme nor authority is present, the first path segment cannot contain `':'`.
    /// - The components must form a reference of type `T`.
    pub fn build(&self) -> Result<T, BuildError> {
        let parts = Parts {
            scheme: self.scheme.clone(),
            authority: self.authority()?,
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        };
        parts.validate()?;
        T::from_uri(Uri::from_parts(parts)).map_err(|found| BuildError::WrongKind {
            expected: T::KIND,
            found: found.kind(),
        })
    }
}

impl<T> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Builder<T> {
    fn clone(&self) -> Self {
        Self {
            scheme: self.scheme.clone(),
            user_info: self.user_info.clone(),
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("scheme", &self.scheme)
            .field("user_info", &self.user_info)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("fragment", &self.fragment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ReferenceKind, AbsoluteUri, Origin, RelativeUrl};

    #[test]
    fn authority_needs_host() {
        let mut b = Uri::builder();
        b.set_user_info(UserInfo::parse("u").unwrap());
        assert_eq!(b.build(), Err(BuildError::UserInfoWithoutHost));

        let mut b = Uri::builder();
        b.set_port(Port::of(80).unwrap());
        assert_eq!(b.build(), Err(BuildError::PortWithoutHost));
        b.set_host(Host::parse("h").unwrap());
        assert_eq!(b.build().unwrap().as_str(), "//h:80");
    }

    #[test]
    fn wrong_kind() {
        let mut b = Origin::builder();
        b.set_scheme(Scheme::parse("http").unwrap())
            .set_host(Host::parse("example.com").unwrap())
            .set_path(Path::root());
        assert_eq!(
            b.build(),
            Err(BuildError::WrongKind {
                expected: ReferenceKind::Origin,
                found: ReferenceKind::BaseUrl,
            })
        );
        b.set_path(Path::empty());
        assert_eq!(b.build().unwrap().as_str(), "http://example.com");
    }

    #[test]
    fn thaw() {
        let uri = AbsoluteUri::parse("http://user@example.com:/a?q#f").unwrap();
        let b = uri.thaw();
        assert_eq!(b.build().unwrap(), uri);

        let r = RelativeUrl::parse("//h/p?q").unwrap();
        let mut b = r.thaw();
        b.set_authority(None);
        assert_eq!(b.build().unwrap().kind(), ReferenceKind::PathAndQuery);
        b.set_path(Path::parse("//p").unwrap());
        assert_eq!(b.build(), Err(BuildError::PathStartsWithDoubleSlash));
    }
}
