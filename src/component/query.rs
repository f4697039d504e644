use super::{Query, QueryParamValue};
use crate::pct_enc::{encoder, EStr, EString};
use core::iter::FusedIterator;

/// A key-value pair in a [`Query`].
///
/// A parameter without `'='` has no value, while one ending with `'='`
/// has an empty value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryParam<'a> {
    /// The percent-encoded key.
    pub key: &'a EStr<encoder::QueryParamKey>,
    /// The percent-encoded value, if any.
    pub value: Option<&'a EStr<encoder::QueryParamValue>>,
}

impl<'a> QueryParam<'a> {
    fn from_piece(piece: &'a str) -> Self {
        match piece.split_once('=') {
            Some((key, value)) => Self {
                key: EStr::new_validated(key),
                value: Some(EStr::new_validated(value)),
            },
            None => Self {
                key: EStr::new_validated(piece),
                value: None,
            },
        }
    }

    /// Returns the value, reading a missing one as empty.
    #[must_use]
    pub fn value_or_empty(&self) -> &'a EStr<encoder::QueryParamValue> {
        self.value.unwrap_or(EStr::EMPTY)
    }

    fn key_matches(&self, key: &str) -> bool {
        self.key.decode().to_string_lossy() == key
    }
}

/// An iterator over the parameters of a [`Query`].
///
/// This struct is created by [`Query::params`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct QueryParams<'a> {
    inner: core::str::Split<'a, char>,
}

impl<'a> Iterator for QueryParams<'a> {
    type Item = QueryParam<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .by_ref()
            .find(|piece| !piece.is_empty())
            .map(QueryParam::from_piece)
    }
}

impl FusedIterator for QueryParams<'_> {}

/// Query parameters, viewed as an ordered multimap.
///
/// Parameters are separated by `'&'`, and a key is separated from its value
/// by the first `'='`. Keys are compared after percent-decoding. Methods
/// that change parameters take unencoded keys and values, and return a new
/// query with the other parameters left as they were.
///
/// Empty pieces, as between the two `'&'` of `"a&&b"`, are not parameters:
/// iteration skips them and [`put`](Self::put) and the removal methods
/// drop them from the result. [`append`](Self::append) keeps the query
/// as it is and only adds a separator when one is missing.
///
/// # Examples
///
/// ```
/// use typed_uri::component::Query;
///
/// let query = Query::parse("a=1&a=2&b=3")?;
/// assert_eq!(query.get("a"), ["1", "2"]);
/// assert_eq!(query.put("a", "9"), "a=9&b=3");
/// assert_eq!(query.append("c d", "&"), "a=1&a=2&b=3&c%20d=%26");
/// # Ok::<_, typed_uri::error::IllegalUriPart>(())
/// ```
impl Query {
    /// Builds a query from unencoded key-value pairs.
    pub fn of<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut buf = EString::new();
        for (key, value) in pairs {
            push_pair(&mut buf, key.as_ref(), value.as_ref());
        }
        Self(buf)
    }

    /// Returns an iterator over the non-empty parameters, in order.
    pub fn params(&self) -> QueryParams<'_> {
        QueryParams {
            inner: self.as_str().split('&'),
        }
    }

    /// Returns an iterator over the keys of the parameters, in order.
    pub fn keys(&self) -> impl Iterator<Item = &EStr<encoder::QueryParamKey>> + '_ {
        self.params().map(|param| param.key)
    }

    /// Returns the values of every parameter with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Vec<QueryParamValue> {
        self.params()
            .filter(|param| param.key_matches(key))
            .map(|param| QueryParamValue::from(param.value_or_empty()))
            .collect()
    }

    /// Returns the value of the first parameter with the given key.
    #[must_use]
    pub fn get_first(&self, key: &str) -> Option<QueryParamValue> {
        self.params()
            .find(|param| param.key_matches(key))
            .map(|param| QueryParamValue::from(param.value_or_empty()))
    }

    /// Checks whether a parameter with the given key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.params().any(|param| param.key_matches(key))
    }

    /// Appends a parameter.
    ///
    /// The rest of the query is kept byte for byte; a `'&'` is added
    /// before the parameter unless the query is empty or already ends
    /// with one.
    #[must_use]
    pub fn append(&self, key: &str, value: &str) -> Self {
        let mut buf = self.0.clone();
        push_pair(&mut buf, key, value);
        Self(buf)
    }

    /// Sets the value of the first parameter with the given key and removes
    /// the others, or appends a parameter if there is none.
    ///
    /// Empty pieces are dropped.
    #[must_use]
    pub fn put(&self, key: &str, value: &str) -> Self {
        let mut buf = EString::new();
        let mut found = false;
        for param in self.params() {
            if !param.key_matches(key) {
                push_param(&mut buf, param);
            } else if !found {
                found = true;
                separate(&mut buf);
                buf.push_estr(param.key);
                buf.push('=');
                buf.encode_str::<encoder::QueryParamValue>(value);
            }
        }
        if !found {
            push_pair(&mut buf, key, value);
        }
        Self(buf)
    }

    /// Removes every parameter with the given key.
    ///
    /// Empty pieces are dropped.
    #[must_use]
    pub fn remove(&self, key: &str) -> Self {
        self.retain(|param| !param.key_matches(key))
    }

    /// Removes every parameter with the given key and value.
    ///
    /// A parameter without a value matches the empty value.
    /// Empty pieces are dropped.
    #[must_use]
    pub fn remove_value(&self, key: &str, value: &str) -> Self {
        self.retain(|param| {
            !(param.key_matches(key) && param.value_or_empty().decode().to_string_lossy() == value)
        })
    }

    fn retain(&self, mut f: impl FnMut(&QueryParam<'_>) -> bool) -> Self {
        let mut buf = EString::new();
        for param in self.params().filter(|param| f(param)) {
            push_param(&mut buf, param);
        }
        Self(buf)
    }
}

type Buf = EString<encoder::Query>;

fn separate(buf: &mut Buf) {
    if !buf.is_empty() && !buf.as_str().ends_with('&') {
        buf.push('&');
    }
}

fn push_param(buf: &mut Buf, param: QueryParam<'_>) {
    separate(buf);
    buf.push_estr(param.key);
    if let Some(value) = param.value {
        buf.push('=');
        buf.push_estr(value);
    }
}

fn push_pair(buf: &mut Buf, key: &str, value: &str) {
    separate(buf);
    buf.encode_str::<encoder::QueryParamKey>(key);
    buf.push('=');
    buf.encode_str::<encoder::QueryParamValue>(value);
}
