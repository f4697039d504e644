//! URI components.
//!
//! Every component keeps its text exactly as parsed or encoded, so that a
//! URI reference can be written back unchanged. Normal forms are produced
//! by the `normalise` methods.

mod authority;
mod host;
mod path;
mod query;

pub use authority::{Authority, HostAndPort, Port, UserInfo};
pub use host::{Host, HostKind};
pub use path::{Path, Segments};
pub use query::{QueryParam, QueryParams};

pub(crate) use path::{remove_dot_segments, EMPTY as EMPTY_PATH};

use crate::{
    error::{IllegalUriPart, PartErrorKind, UriPart},
    pct_enc::table::{Rejection, Table},
};

/// Validates a component with the given table.
pub(crate) fn check(s: &str, table: Table, part: UriPart) -> Result<(), IllegalUriPart> {
    table.check(s.as_bytes()).map_err(|rejection| {
        let kind = match rejection {
            Rejection::Char(index) => PartErrorKind::UnexpectedChar { index },
            Rejection::PctEncoded(index) => PartErrorKind::InvalidPctEncoded { index },
        };
        IllegalUriPart::new(part, s, kind)
    })
}

macro_rules! string_traits {
    ($ty:ident) => {
        impl ::core::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $ty {
            type Err = $crate::error::IllegalUriPart;

            /// Equivalent to [`parse`](Self::parse).
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl PartialEq<str> for $ty {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl PartialEq<&str> for $ty {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        #[cfg(feature = "serde")]
        impl ::serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> ::serde::Deserialize<'de> for $ty {
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

pub(crate) use string_traits;

macro_rules! encoded_component {
    ($(#[$attr:meta])* $ty:ident: $enc:ident, $part:ident) => {
        $crate::component::encoded_component!(@base $(#[$attr])* $ty: $enc, $part);

        impl $ty {
            /// Checks whether the component is in normal form.
            ///
            /// See [`normalise`](Self::normalise) for the definition of normal form.
            #[must_use]
            pub fn is_normal_form(&self) -> bool {
                self.0.is_normal_form()
            }

            /// Normalises the percent-encoding of the component.
            ///
            /// Percent-encoded unreserved characters are decoded and the
            /// hexadecimal digits of the remaining octets are uppercased.
            #[must_use]
            pub fn normalise(&self) -> Self {
                self.0.normalise().map_or_else(|| self.clone(), Self)
            }
        }
    };
    (@base $(#[$attr:meta])* $ty:ident: $enc:ident, $part:ident) => {
        $(#[$attr])*
        #[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $ty($crate::pct_enc::EString<$crate::pct_enc::encoder::$enc>);

        impl $ty {
            /// Parses the component from its percent-encoded text.
            ///
            /// # Errors
            ///
            /// Returns `Err` if the text contains a character not allowed
            /// in the component or an invalid percent-encoded octet.
            pub fn parse(s: &str) -> Result<Self, $crate::error::IllegalUriPart> {
                $crate::component::check(
                    s,
                    <$crate::pct_enc::encoder::$enc as $crate::pct_enc::Encoder>::TABLE,
                    $crate::error::UriPart::$part,
                )?;
                Ok(Self::from_string_unchecked(s.to_owned()))
            }

            /// Creates the component from unencoded text, percent-encoding
            /// every character not allowed in it.
            #[must_use]
            pub fn encode(raw: &str) -> Self {
                Self($crate::pct_enc::EString::encode(raw))
            }

            /// Returns the component as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Returns the component as an `EStr` slice.
            #[must_use]
            pub fn as_estr(&self) -> &$crate::pct_enc::EStr<$crate::pct_enc::encoder::$enc> {
                &self.0
            }

            /// Returns an iterator used to decode the component.
            pub fn decode(&self) -> $crate::pct_enc::Decode<'_> {
                self.0.decode()
            }

            /// Checks whether the component is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub(crate) fn from_string_unchecked(s: String) -> Self {
                Self($crate::pct_enc::EString::new_validated(s))
            }
        }

        impl From<$crate::pct_enc::EString<$crate::pct_enc::encoder::$enc>> for $ty {
            fn from(s: $crate::pct_enc::EString<$crate::pct_enc::encoder::$enc>) -> Self {
                Self(s)
            }
        }

        impl From<&$crate::pct_enc::EStr<$crate::pct_enc::encoder::$enc>> for $ty {
            fn from(s: &$crate::pct_enc::EStr<$crate::pct_enc::encoder::$enc>) -> Self {
                Self(s.to_owned())
            }
        }

        impl ::core::borrow::Borrow<$crate::pct_enc::EStr<$crate::pct_enc::encoder::$enc>> for $ty {
            fn borrow(&self) -> &$crate::pct_enc::EStr<$crate::pct_enc::encoder::$enc> {
                &self.0
            }
        }

        impl AsRef<$crate::pct_enc::EStr<$crate::pct_enc::encoder::$enc>> for $ty {
            fn as_ref(&self) -> &$crate::pct_enc::EStr<$crate::pct_enc::encoder::$enc> {
                &self.0
            }
        }

        impl ::core::fmt::Debug for $ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(self.as_str(), f)
            }
        }

        $crate::component::string_traits!($ty);
    };
}

pub(crate) use encoded_component;

encoded_component! {
    /// The user name part of a userinfo subcomponent, which cannot contain `':'`.
    Username: Username, Username
}

encoded_component! {
    /// The password part of a userinfo subcomponent, everything after the first `':'`.
    Password: Password, Password
}

encoded_component! {
    /// A single [segment] of a path, which cannot contain `'/'`.
    ///
    /// [segment]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.3
    Segment: Segment, Segment
}

encoded_component! {
    /// A [query] component.
    ///
    /// Besides its raw text, a query is viewed as an ordered multimap of
    /// `&`-separated parameters; see [`params`](Self::params).
    ///
    /// [query]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.4
    Query: Query, Query
}

encoded_component! {
    /// The key of a query parameter, in which `'&'` and `'='` are percent-encoded.
    QueryParamKey: QueryParamKey, QueryParamKey
}

encoded_component! {
    /// The value of a query parameter, in which `'&'` is percent-encoded.
    QueryParamValue: QueryParamValue, QueryParamValue
}

encoded_component! {
    /// A [fragment] component.
    ///
    /// [fragment]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.5
    Fragment: Fragment, Fragment
}
