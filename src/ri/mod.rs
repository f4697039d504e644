//! URI reference types.
//!
//! Each leaf type holds exactly the components its kind of reference can
//! have, and each enum groups leaf types the way RFC 3986 and the
//! [URL Standard](https://url.spec.whatwg.org/) group references.

mod leaf;
mod sum;

pub use leaf::{
    BaseUrl, FragmentUrl, OpaqueUri, Origin, PathAndQuery, QueryUrl, RelativeRef,
    SchemeRelativeUrl, Urn,
};
pub use sum::{AbsoluteUri, AbsoluteUrl, RelativeUrl, ServersideAbsoluteUrl, Uri, Url};

use crate::{
    component::{Authority, Fragment, Path, Query},
    error::{IllegalUriReference, Reason, ReferenceKind},
    internal::Sealed,
    parse,
    scheme::Scheme,
};
use core::{fmt, hash};

/// A URI reference type of this crate.
///
/// This trait is sealed and cannot be implemented outside of this crate.
/// It allows code such as [`Normalizer::normalise`] and [`Builder`] to
/// work with any reference type.
///
/// [`Normalizer::normalise`]: crate::normalize::Normalizer::normalise
/// [`Builder`]: crate::build::Builder
pub trait Reference:
    Sealed + Clone + fmt::Debug + fmt::Display + Eq + hash::Hash + Into<Uri>
{
    /// The kind of reference this type holds.
    const KIND: ReferenceKind;
}

/// The components of a reference as compared and hashed.
pub(crate) type Key<'a> = (
    Option<&'a Scheme>,
    Option<&'a Authority>,
    &'a Path,
    Option<&'a Query>,
    Option<&'a Fragment>,
);

pub(crate) fn parse_as<T: Reference>(s: &str) -> Result<T, IllegalUriReference> {
    let uri = parse::parse(s).map_err(|e| e.expecting(T::KIND))?;
    T::from_uri(uri).map_err(|found| {
        IllegalUriReference::new(
            T::KIND,
            s,
            Reason::WrongKind {
                found: found.kind(),
            },
            None,
        )
    })
}

/// Generates an accessor of a leaf type for a component that is
/// required (`req`), optional (`opt`) or impossible (`none`, or `empty` for the path).
macro_rules! accessor {
    (req $name:ident: $T:ty) => {
        #[doc = concat!("Returns the ", stringify!($name), " component.")]
        #[must_use]
        pub fn $name(&self) -> &$T {
            &self.$name
        }
    };
    (opt $name:ident: $T:ty) => {
        #[doc = concat!("Returns the optional ", stringify!($name), " component.")]
        #[must_use]
        pub fn $name(&self) -> Option<&$T> {
            self.$name.as_ref()
        }
    };
    (none $name:ident: $T:ty) => {
        #[doc = concat!("Returns `None`: this kind of reference has no ", stringify!($name), " component.")]
        #[must_use]
        pub fn $name(&self) -> Option<&$T> {
            None
        }
    };
    (empty $name:ident: $T:ty) => {
        #[doc = concat!("Returns the empty ", stringify!($name), ": this kind of reference has none.")]
        #[must_use]
        pub fn $name(&self) -> &$T {
            &$crate::component::EMPTY_PATH
        }
    };
}

/// Generates an accessor of an enum that dispatches to the leaf types.
macro_rules! dispatch {
    (req $name:ident: $T:ty; $($V:ident)+) => {
        #[doc = concat!("Returns the ", stringify!($name), " component.")]
        #[must_use]
        pub fn $name(&self) -> &$T {
            match self {
                $(Self::$V(r) => r.$name(),)+
            }
        }
    };
    (opt $name:ident: $T:ty; $($V:ident)+) => {
        #[doc = concat!("Returns the optional ", stringify!($name), " component.")]
        #[must_use]
        pub fn $name(&self) -> Option<&$T> {
            match self {
                $(Self::$V(r) => r.$name().into(),)+
            }
        }
    };
}

/// Implements what leaf types and enums have in common.
macro_rules! common {
    ($Ty:ident, $name:literal) => {
        impl $Ty {
            #[doc = concat!("Parses ", $name, " from a string.")]
            ///
            /// # Errors
            ///
            /// Returns `Err` if the string is not a valid URI reference,
            #[doc = concat!("or if it is one but not ", $name, ".")]
            pub fn parse(s: &str) -> Result<Self, $crate::error::IllegalUriReference> {
                $crate::ri::parse_as(s)
            }

            #[doc = concat!("Creates an empty builder for ", $name, ".")]
            pub fn builder() -> $crate::build::Builder<Self> {
                $crate::build::Builder::new()
            }

            /// Creates a builder holding the components of this reference.
            pub fn thaw(&self) -> $crate::build::Builder<Self> {
                $crate::build::Builder::from_parts($crate::internal::Sealed::to_parts(self))
            }
        }

        impl ::core::fmt::Display for $Ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $Ty {
            type Err = $crate::error::IllegalUriReference;

            /// Equivalent to [`parse`](Self::parse).
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl $crate::Reference for $Ty {
            const KIND: $crate::error::ReferenceKind = $crate::error::ReferenceKind::$Ty;
        }

        #[cfg(feature = "serde")]
        impl ::serde::Serialize for $Ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> ::serde::Deserialize<'de> for $Ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let s = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&s).map_err(::serde::de::Error::custom)
            }
        }
    };
}

/// Implements a leaf type, given how it holds each component.
///
/// The type must have a `cache` field and a `normalise_with` method.
macro_rules! leaf_type {
    (
        $Ty:ident, $name:literal, Normal = $Normal:ty,
        scheme: $s:ident,
        authority: $a:ident,
        path: $p:ident,
        query: $q:ident,
        fragment: $f:ident $(,)?
    ) => {
        impl $Ty {
            #[doc = concat!("Returns the ", $name, " as a string slice.")]
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.cache
                    .string
                    .get_or_init(|| $crate::internal::Sealed::to_parts(self).to_string())
            }

            $crate::ri::accessor!($s scheme: $crate::scheme::Scheme);
            $crate::ri::accessor!($a authority: $crate::component::Authority);
            $crate::ri::accessor!($p path: $crate::component::Path);
            $crate::ri::accessor!($q query: $crate::component::Query);
            $crate::ri::accessor!($f fragment: $crate::component::Fragment);

            #[doc = concat!("Normalises the ", $name, " as described in")]
            /// [Section 6 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986#section-6).
            ///
            /// The scheme and the registered name of the host are lowercased,
            /// a port equal to the default port of the scheme is removed,
            /// percent-encoding is normalised in every component, and dot
            /// segments are removed from the path, except from the NSS of a URN.
            /// A rootless path stays rootless, keeping its leading `".."`
            /// segments. An empty path after an authority becomes `"/"`,
            /// unless the reference is an origin.
            ///
            /// The result is computed once and memoised.
            #[must_use]
            pub fn normalise(&self) -> $Normal {
                self.cache
                    .normal
                    .get_or_init(|| self.normalise_with(&mut $crate::internal::Context::default()))
                    .clone()
            }

            #[doc = concat!("Checks whether the ", $name, " is in normal form.")]
            #[must_use]
            pub fn is_normal_form(&self) -> bool {
                self.cache
                    .is_normal
                    .get_or_init(|| self.normalise().as_str() == self.as_str())
            }

            fn key(&self) -> $crate::ri::Key<'_> {
                (
                    self.scheme().into(),
                    self.authority().into(),
                    self.path(),
                    self.query().into(),
                    self.fragment().into(),
                )
            }
        }

        impl $crate::internal::Sealed for $Ty {
            type Normal = $Normal;

            fn from_uri(uri: $crate::Uri) -> Result<Self, $crate::Uri> {
                match uri {
                    $crate::Uri::$Ty(r) => Ok(r),
                    other => Err(other),
                }
            }

            fn to_parts(&self) -> $crate::internal::Parts {
                $crate::internal::Parts {
                    scheme: Option::<&$crate::scheme::Scheme>::from(self.scheme()).cloned(),
                    authority: Option::<&$crate::component::Authority>::from(self.authority())
                        .cloned(),
                    path: self.path().clone(),
                    query: Option::<&$crate::component::Query>::from(self.query()).cloned(),
                    fragment: Option::<&$crate::component::Fragment>::from(self.fragment())
                        .cloned(),
                }
            }

            fn normalise_in(&self, cx: &mut $crate::internal::Context<'_>) -> $Normal {
                self.normalise_with(cx)
            }
        }

        impl PartialEq for $Ty {
            fn eq(&self, other: &Self) -> bool {
                self.key() == other.key()
            }
        }

        impl Eq for $Ty {}

        impl ::core::hash::Hash for $Ty {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                self.key().hash(state);
            }
        }

        impl ::core::fmt::Debug for $Ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_tuple(stringify!($Ty)).field(&self.as_str()).finish()
            }
        }

        $crate::ri::common!($Ty, $name);
    };
}

/// Defines an enum over leaf types.
macro_rules! sum_type {
    (
        $(#[$attr:meta])*
        $Ty:ident, $name:literal,
        scheme: $s:ident,
        authority: $a:ident,
        [$($V:ident),+ $(,)?]
    ) => {
        $(#[$attr])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $Ty {
            $(
                #[doc = concat!("A [`", stringify!($V), "`].")]
                $V($V),
            )+
        }

        impl $Ty {
            /// Returns the kind of the reference held.
            #[must_use]
            pub fn kind(&self) -> $crate::error::ReferenceKind {
                match self {
                    $(Self::$V(_) => $crate::error::ReferenceKind::$V,)+
                }
            }

            #[doc = concat!("Returns the ", $name, " as a string slice.")]
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$V(r) => r.as_str(),)+
                }
            }

            $crate::ri::dispatch!($s scheme: $crate::scheme::Scheme; $($V)+);
            $crate::ri::dispatch!($a authority: $crate::component::Authority; $($V)+);
            $crate::ri::dispatch!(req path: $crate::component::Path; $($V)+);
            $crate::ri::dispatch!(opt query: $crate::component::Query; $($V)+);
            $crate::ri::dispatch!(opt fragment: $crate::component::Fragment; $($V)+);

            #[doc = concat!("Normalises the ", $name, ".")]
            ///
            /// See the `normalise` method of the leaf types for the exact
            /// behavior. The result may hold another leaf type than `self`.
            #[must_use]
            pub fn normalise(&self) -> Self {
                match self {
                    $(Self::$V(r) => r.normalise().into(),)+
                }
            }

            #[doc = concat!("Checks whether the ", $name, " is in normal form.")]
            #[must_use]
            pub fn is_normal_form(&self) -> bool {
                match self {
                    $(Self::$V(r) => r.is_normal_form(),)+
                }
            }
        }

        $(
            impl From<$V> for $Ty {
                fn from(r: $V) -> Self {
                    Self::$V(r)
                }
            }

            impl TryFrom<$Ty> for $V {
                type Error = $Ty;

                fn try_from(r: $Ty) -> Result<Self, $Ty> {
                    match r {
                        $Ty::$V(r) => Ok(r),
                        other => Err(other),
                    }
                }
            }
        )+

        impl $crate::internal::Sealed for $Ty {
            type Normal = Self;

            #[allow(unreachable_patterns)]
            fn from_uri(uri: $crate::Uri) -> Result<Self, $crate::Uri> {
                match uri {
                    $($crate::Uri::$V(r) => Ok(Self::$V(r)),)+
                    other => Err(other),
                }
            }

            fn to_parts(&self) -> $crate::internal::Parts {
                match self {
                    $(Self::$V(r) => $crate::internal::Sealed::to_parts(r),)+
                }
            }

            fn normalise_in(&self, cx: &mut $crate::internal::Context<'_>) -> Self {
                match self {
                    $(Self::$V(r) => $crate::internal::Sealed::normalise_in(r, cx).into(),)+
                }
            }
        }

        $crate::ri::common!($Ty, $name);
    };
}

/// Implements `From` between enums, from the enum with the given variants
/// to each of the listed enums.
macro_rules! widen {
    ($From:ident [$($V:ident),+] => $To:ident $(, $Rest:ident)*) => {
        impl From<$From> for $To {
            fn from(r: $From) -> Self {
                match r {
                    $($From::$V(r) => Self::$V(r),)+
                }
            }
        }

        $crate::ri::widen!($From [$($V),+] => $($Rest),*);
    };
    ($From:ident [$($V:ident),+] =>) => {};
}

pub(crate) use accessor;
pub(crate) use common;
pub(crate) use dispatch;
pub(crate) use leaf_type;
pub(crate) use sum_type;
pub(crate) use widen;
