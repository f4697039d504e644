//! Percent-encoders for URI components.
//!
//! Each encoder pairs a component with the [`Table`] of byte patterns
//! allowed in it, and with the characters that normalisation must leave
//! percent-encoded even though the table would allow them unencoded.

use super::{table::*, Table};

/// A trait used by [`EStr`] and [`EString`] to specify the table used for encoding.
///
/// [`EStr`]: super::EStr
/// [`EString`]: super::EString
///
/// # Sub-encoders
///
/// A sub-encoder `SubE` of `E` is an encoder such that `SubE::TABLE` is a [subset] of `E::TABLE`.
///
/// [subset]: Table::is_subset
pub trait Encoder: 'static {
    /// The table used for encoding.
    const TABLE: Table;

    /// Characters that stay percent-encoded during normalisation.
    ///
    /// Decoding a reserved character may change the meaning of a component,
    /// so only unreserved characters are decoded by default.
    const LEAVE_AS_IS: Table = RESERVED;
}

macro_rules! encoders {
    ($($(#[$attr:meta])* $name:ident => $table:expr,)*) => {
        $(
            $(#[$attr])*
            #[derive(Debug)]
            pub struct $name(());

            impl Encoder for $name {
                const TABLE: Table = $table;
            }
        )*
    };
}

encoders! {
    /// An encoder for the user name part of userinfo.
    Username => USERNAME,
    /// An encoder for the password part of userinfo.
    Password => PASSWORD,
    /// An encoder for userinfo.
    Userinfo => USERINFO,
    /// An encoder for registered name.
    RegName => REG_NAME,
    /// An encoder for a path segment.
    Segment => SEGMENT,
    /// An encoder for path.
    Path => PATH,
    /// An encoder for query.
    Query => QUERY,
    /// An encoder for the key of a query parameter.
    QueryParamKey => QUERY_PARAM_KEY,
    /// An encoder for the value of a query parameter.
    QueryParamValue => QUERY_PARAM_VALUE,
    /// An encoder for fragment.
    Fragment => FRAGMENT,
    /// An encoder for data that must never be mistaken for a delimiter.
    ///
    /// Only unreserved characters are left unencoded.
    Data => UNRESERVED.or_pct_encoded(),
}
