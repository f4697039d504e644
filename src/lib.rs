#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! A typed URI reference library that strictly adheres to IETF [RFC 3986].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//!
//! Every URI reference belongs to exactly one kind, decided by which
//! components it has. Each kind is a type holding only the components it
//! can have, and enums such as [`Uri`], [`Url`] and [`AbsoluteUri`] group
//! the kinds:
//!
//! | kind | example |
//! |---|---|
//! | [`Origin`] | `https://example.com:8443` |
//! | [`BaseUrl`] | `https://user@example.com/a/b` |
//! | [`QueryUrl`] | `https://example.com/search?q=uri` |
//! | [`FragmentUrl`] | `https://example.com/doc#intro` |
//! | [`OpaqueUri`] | `mailto:user@example.com` |
//! | [`Urn`] | `urn:isbn:0451450523` |
//! | [`SchemeRelativeUrl`] | `//example.com/a` |
//! | [`PathAndQuery`] | `/a/b?c` |
//! | [`RelativeRef`] | `../a`, `#intro` |
//!
//! # Examples
//!
//! ```
//! use typed_uri::{AbsoluteUrl, Uri};
//!
//! let base = AbsoluteUrl::parse("HTTP://Example.com:80/a/b/")?;
//! assert_eq!(base.normalise().as_str(), "http://example.com/a/b/");
//!
//! let uri = Uri::parse("../c?d")?;
//! let target = base.resolve(&uri.try_into().unwrap());
//! assert_eq!(target.as_str(), "HTTP://Example.com:80/a/c?d");
//! # Ok::<_, typed_uri::error::IllegalUriReference>(())
//! ```
//!
//! # Feature flags
//!
//! - `serde`: Enables [`serde`] support for every reference type and component.
//!
//! [`serde`]: https://docs.rs/serde

pub mod build;
pub mod component;
pub mod error;
pub mod normalize;
pub mod pct_enc;
pub mod scheme;

mod internal;
mod memo;
mod parse;
mod resolve;
mod ri;

pub use ri::{
    AbsoluteUri, AbsoluteUrl, BaseUrl, FragmentUrl, OpaqueUri, Origin, PathAndQuery, QueryUrl,
    Reference, RelativeRef, RelativeUrl, SchemeRelativeUrl, ServersideAbsoluteUrl, Uri, Url, Urn,
};
