use crate::{
    component::{Authority, Fragment, Path, Query},
    error::BuildError,
    scheme::{Scheme, SchemeRegistry},
    Uri,
};
use core::fmt;

/// The five components of a URI reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parts {
    pub scheme: Option<Scheme>,
    pub authority: Option<Authority>,
    pub path: Path,
    pub query: Option<Query>,
    pub fragment: Option<Fragment>,
}

impl Parts {
    /// Checks the rules of RFC 3986 that tie the path to the other components.
    pub fn validate(&self) -> Result<(), BuildError> {
        let path = self.path.as_str();
        if self.authority.is_some() {
            if !path.is_empty() && !path.starts_with('/') {
                return Err(BuildError::NonemptyRootlessPath);
            }
        } else {
            if path.starts_with("//") {
                return Err(BuildError::PathStartsWithDoubleSlash);
            }
            if self.scheme.is_none() && first_segment_colon(path).is_some() {
                return Err(BuildError::FirstPathSegmentContainsColon);
            }
        }
        Ok(())
    }
}

/// Returns the index of the first colon in the first segment of a path.
pub(crate) fn first_segment_colon(path: &str) -> Option<usize> {
    let first = path.split('/').next().unwrap_or_default();
    first.find(':')
}

impl fmt::Display for Parts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{authority}")?;
        }
        f.write_str(self.path.as_str())?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// State carried through the normalisation of a reference.
#[derive(Debug)]
pub struct Context<'a> {
    pub registry: &'a SchemeRegistry,
    pub underflow: bool,
}

impl Default for Context<'_> {
    fn default() -> Self {
        Self {
            registry: SchemeRegistry::global(),
            underflow: false,
        }
    }
}

pub trait Sealed: Sized {
    /// The type a reference of this type normalises to.
    type Normal;

    fn from_uri(uri: Uri) -> Result<Self, Uri>;

    fn to_parts(&self) -> Parts;

    fn normalise_in(&self, cx: &mut Context<'_>) -> Self::Normal;
}
