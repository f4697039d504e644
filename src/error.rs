//! Error types.
//!
//! Component parsers fail with [`IllegalUriPart`]. Reference parsers wrap
//! those failures in [`IllegalUriReference`], keeping the component error as
//! the [source](std::error::Error::source) so that the whole chain can be
//! reported.

use core::fmt;
use thiserror::Error;

/// A component (or subcomponent) of a URI reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UriPart {
    /// The scheme component.
    Scheme,
    /// The userinfo subcomponent of authority.
    UserInfo,
    /// The user name part of userinfo.
    Username,
    /// The password part of userinfo.
    Password,
    /// The host subcomponent of authority.
    Host,
    /// The port subcomponent of authority.
    Port,
    /// The authority component.
    Authority,
    /// The path component.
    Path,
    /// A single segment of a path.
    Segment,
    /// The query component.
    Query,
    /// The key of a query parameter.
    QueryParamKey,
    /// The value of a query parameter.
    QueryParamValue,
    /// The fragment component.
    Fragment,
}

impl fmt::Display for UriPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scheme => "scheme",
            Self::UserInfo => "user info",
            Self::Username => "username",
            Self::Password => "password",
            Self::Host => "host",
            Self::Port => "port",
            Self::Authority => "authority",
            Self::Path => "path",
            Self::Segment => "path segment",
            Self::Query => "query",
            Self::QueryParamKey => "query parameter key",
            Self::QueryParamValue => "query parameter value",
            Self::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

/// Detailed cause of an [`IllegalUriPart`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartErrorKind {
    /// A character not allowed in the component, at the given byte index.
    UnexpectedChar {
        /// Byte index of the character within the component text.
        index: usize,
    },
    /// A `'%'` not followed by two hexadecimal digits, at the given byte index.
    InvalidPctEncoded {
        /// Byte index of the `'%'` within the component text.
        index: usize,
    },
    /// A bracketed host that is neither an IPv6 nor an IPvFuture address.
    InvalidIpLiteral,
    /// A port that is zero or larger than 65535.
    PortOutOfRange,
    /// A component that must not be empty.
    Empty,
    /// A subcomponent is illegal; see the error source.
    InvalidSubcomponent,
    /// A path that is not of the form `NID:NSS` under the `urn` scheme.
    NotAUrn,
}

impl fmt::Display for PartErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar { index } => write!(f, "unexpected character at index {index}"),
            Self::InvalidPctEncoded { index } => {
                write!(f, "invalid percent-encoded octet at index {index}")
            }
            Self::InvalidIpLiteral => f.write_str("invalid IP literal"),
            Self::PortOutOfRange => f.write_str("port must be between 1 and 65535"),
            Self::Empty => f.write_str("must not be empty"),
            Self::InvalidSubcomponent => f.write_str("illegal subcomponent"),
            Self::NotAUrn => f.write_str("not a URN namespace and namespace-specific string"),
        }
    }
}

/// An error occurred when parsing or constructing a URI component.
///
/// # Examples
///
/// ```
/// use typed_uri::{component::Port, error::{PartErrorKind, UriPart}};
///
/// let err = Port::parse("65536").unwrap_err();
/// assert_eq!(err.part(), UriPart::Port);
/// assert_eq!(err.kind(), PartErrorKind::PortOutOfRange);
/// assert_eq!(err.to_string(), "illegal port `65536`: port must be between 1 and 65535");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("illegal {part} `{input}`: {kind}")]
pub struct IllegalUriPart {
    part: UriPart,
    input: String,
    kind: PartErrorKind,
    #[source]
    cause: Option<Box<IllegalUriPart>>,
}

impl IllegalUriPart {
    pub(crate) fn new(part: UriPart, input: &str, kind: PartErrorKind) -> Self {
        Self {
            part,
            input: input.to_owned(),
            kind,
            cause: None,
        }
    }

    /// Wraps an error of a subcomponent into an error of the enclosing component.
    pub(crate) fn wrap(part: UriPart, input: &str, cause: IllegalUriPart) -> Self {
        Self {
            part,
            input: input.to_owned(),
            kind: PartErrorKind::InvalidSubcomponent,
            cause: Some(Box::new(cause)),
        }
    }

    /// Returns the component that failed.
    #[must_use]
    pub fn part(&self) -> UriPart {
        self.part
    }

    /// Returns the offending input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> PartErrorKind {
        self.kind
    }

    /// Returns the error of the subcomponent that caused this error, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&IllegalUriPart> {
        self.cause.as_deref()
    }

    /// Returns the innermost error in the cause chain.
    #[must_use]
    pub fn root_cause(&self) -> &IllegalUriPart {
        let mut e = self;
        while let Some(cause) = e.cause() {
            e = cause;
        }
        e
    }
}

/// A kind of URI reference, one per reference type of this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// [`Uri`](crate::Uri)
    Uri,
    /// [`Url`](crate::Url)
    Url,
    /// [`AbsoluteUri`](crate::AbsoluteUri)
    AbsoluteUri,
    /// [`AbsoluteUrl`](crate::AbsoluteUrl)
    AbsoluteUrl,
    /// [`ServersideAbsoluteUrl`](crate::ServersideAbsoluteUrl)
    ServersideAbsoluteUrl,
    /// [`RelativeUrl`](crate::RelativeUrl)
    RelativeUrl,
    /// [`Origin`](crate::Origin)
    Origin,
    /// [`BaseUrl`](crate::BaseUrl)
    BaseUrl,
    /// [`QueryUrl`](crate::QueryUrl)
    QueryUrl,
    /// [`FragmentUrl`](crate::FragmentUrl)
    FragmentUrl,
    /// [`OpaqueUri`](crate::OpaqueUri)
    OpaqueUri,
    /// [`Urn`](crate::Urn)
    Urn,
    /// [`SchemeRelativeUrl`](crate::SchemeRelativeUrl)
    SchemeRelativeUrl,
    /// [`PathAndQuery`](crate::PathAndQuery)
    PathAndQuery,
    /// [`RelativeRef`](crate::RelativeRef)
    RelativeRef,
}

impl ReferenceKind {
    /// Returns the name of the reference type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Uri => "URI",
            Self::Url => "URL",
            Self::AbsoluteUri => "absolute URI",
            Self::AbsoluteUrl => "absolute URL",
            Self::ServersideAbsoluteUrl => "serverside absolute URL",
            Self::RelativeUrl => "relative URL",
            Self::Origin => "origin",
            Self::BaseUrl => "base URL",
            Self::QueryUrl => "absolute URL with query",
            Self::FragmentUrl => "absolute URL with fragment",
            Self::OpaqueUri => "opaque URI",
            Self::Urn => "URN",
            Self::SchemeRelativeUrl => "scheme-relative URL",
            Self::PathAndQuery => "path and query",
            Self::RelativeRef => "relative reference",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The reason an [`IllegalUriReference`] was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    /// A component is illegal; see the error source.
    Syntax,
    /// Neither scheme nor authority is present, but the first path segment
    /// contains `':'` at the given byte index.
    ///
    /// Such a reference would be mistaken for one with a scheme.
    AmbiguousColon {
        /// Byte index of the colon within the input.
        index: usize,
    },
    /// The input is a well-formed reference of another kind.
    WrongKind {
        /// The kind of reference the input actually is.
        found: ReferenceKind,
    },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => f.write_str("illegal component"),
            Self::AmbiguousColon { index } => write!(
                f,
                "colon at index {index} in first path segment is ambiguous with a scheme"
            ),
            Self::WrongKind { found } => write!(f, "found {found}"),
        }
    }
}

/// An error occurred when parsing a URI reference.
///
/// # Examples
///
/// ```
/// use typed_uri::{error::{ReferenceKind, Reason, UriPart}, Origin};
///
/// let err = Origin::parse("http://example.com/path").unwrap_err();
/// assert_eq!(err.kind(), ReferenceKind::Origin);
/// assert_eq!(err.reason(), Reason::WrongKind { found: ReferenceKind::BaseUrl });
///
/// let err = Origin::parse("http://exa mple.com").unwrap_err();
/// assert_eq!(err.reason(), Reason::Syntax);
/// assert_eq!(err.cause().unwrap().part(), UriPart::Authority);
/// assert_eq!(err.cause().unwrap().root_cause().part(), UriPart::Host);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("illegal {kind} `{input}`: {reason}")]
pub struct IllegalUriReference {
    kind: ReferenceKind,
    input: String,
    reason: Reason,
    #[source]
    cause: Option<IllegalUriPart>,
}

impl IllegalUriReference {
    pub(crate) fn new(
        kind: ReferenceKind,
        input: &str,
        reason: Reason,
        cause: Option<IllegalUriPart>,
    ) -> Self {
        Self {
            kind,
            input: input.to_owned(),
            reason,
            cause,
        }
    }

    /// Re-labels the error with the kind of reference that was requested.
    pub(crate) fn expecting(mut self, kind: ReferenceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the kind of reference that was requested.
    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Returns the offending input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the reason of the rejection.
    #[must_use]
    pub fn reason(&self) -> Reason {
        self.reason
    }

    /// Returns the component error that caused this error, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&IllegalUriPart> {
        self.cause.as_ref()
    }
}

/// An error occurred when building a URI reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    /// User info is set, but host is not.
    #[error("user info cannot be set without a host")]
    UserInfoWithoutHost,
    /// Port is set, but host is not.
    #[error("port cannot be set without a host")]
    PortWithoutHost,
    /// Authority is present, but the path is not empty and does not start with `'/'`.
    #[error("when authority is present, path should either be empty or start with '/'")]
    NonemptyRootlessPath,
    /// Authority is not present, but the path starts with `"//"`.
    #[error("when authority is not present, path should not start with \"//\"")]
    PathStartsWithDoubleSlash,
    /// Neither scheme nor authority is present, but the first path segment contains `':'`.
    #[error(
        "when neither scheme nor authority is present, first path segment should not contain ':'"
    )]
    FirstPathSegmentContainsColon,
    /// The components form a valid reference of another kind than the one requested.
    #[error("expected {expected}, found {found}")]
    WrongKind {
        /// The kind of reference requested.
        expected: ReferenceKind,
        /// The kind of reference the components form.
        found: ReferenceKind,
    },
}

/// An error occurred when normalising a URI reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NormaliseError {
    /// An underflow occurred in path normalisation.
    ///
    /// Used only when [`Normalizer::allow_path_underflow`] is set to `false`.
    ///
    /// [`Normalizer::allow_path_underflow`]: crate::normalize::Normalizer::allow_path_underflow
    #[error("underflow occurred in path normalisation")]
    PathUnderflow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn source_chain() {
        let host = IllegalUriPart::new(
            UriPart::Host,
            "a b",
            PartErrorKind::UnexpectedChar { index: 1 },
        );
        let auth = IllegalUriPart::wrap(UriPart::Authority, "u@a b", host.clone());
        let err = IllegalUriReference::new(
            ReferenceKind::Uri,
            "http://u@a b/",
            Reason::Syntax,
            Some(auth.clone()),
        );

        assert_eq!(
            err.to_string(),
            "illegal URI `http://u@a b/`: illegal component"
        );
        assert_eq!(
            err.source().unwrap().to_string(),
            "illegal authority `u@a b`: illegal subcomponent"
        );
        assert_eq!(
            err.source().unwrap().source().unwrap().to_string(),
            "illegal host `a b`: unexpected character at index 1"
        );
        assert_eq!(auth.root_cause(), &host);
        assert_eq!(err.expecting(ReferenceKind::Url).kind(), ReferenceKind::Url);
    }
}
