use super::{encode_to, EStr, Encoder};
use core::{borrow::Borrow, cmp::Ordering, fmt, hash, marker::PhantomData, ops::Deref};

/// An owned percent-encoded string, valid for the encoder `E`.
///
/// This is the owned form of [`EStr`], and what every encoded component
/// holds. Strings are built up piece by piece: raw text is encoded with
/// [`encode_str`](Self::encode_str), delimiters are added with
/// [`push`](Self::push), and already-encoded text with
/// [`push_estr`](Self::push_estr).
///
/// Two `EString`s are equal when their bytes are; no normalisation
/// happens before comparing.
///
/// # Examples
///
/// ```
/// use typed_uri::pct_enc::{
///     encoder::{Query, QueryParamKey, QueryParamValue},
///     EStr, EString,
/// };
///
/// let mut query = EString::<Query>::new();
/// query.encode_str::<QueryParamKey>("名前");
/// query.push('=');
/// query.encode_str::<QueryParamValue>("a&b");
/// query.push('&');
/// query.push_estr(EStr::<QueryParamValue>::new_or_panic("lang=en"));
///
/// assert_eq!(query, "%E5%90%8D%E5%89%8D=a%26b&lang=en");
/// ```
pub struct EString<E: Encoder> {
    pub(crate) buf: String,
    encoder: PhantomData<E>,
}

impl<E: Encoder> Deref for EString<E> {
    type Target = EStr<E>;

    fn deref(&self) -> &EStr<E> {
        EStr::new_validated(&self.buf)
    }
}

impl<E: Encoder> EString<E> {
    pub(crate) const fn new_validated(buf: String) -> Self {
        Self {
            buf,
            encoder: PhantomData,
        }
    }

    /// Creates an empty `EString`.
    #[must_use]
    pub fn new() -> Self {
        Self::new_validated(String::new())
    }

    /// Encodes raw text, leaving only what `E::TABLE` allows unencoded.
    ///
    /// A `'%'` in the text is always encoded.
    #[must_use]
    pub fn encode(raw: &str) -> Self {
        let mut s = Self::new();
        encode_to(&mut s.buf, raw, E::TABLE);
        s
    }

    /// Returns the string as an `EStr` slice.
    #[must_use]
    pub fn as_estr(&self) -> &EStr<E> {
        self
    }

    /// Encodes raw text with the narrower table of `SubE` and appends it.
    ///
    /// # Panics
    ///
    /// Panics if `SubE` is not a [sub-encoder](Encoder#sub-encoders) of `E`.
    pub fn encode_str<SubE: Encoder>(&mut self, raw: &str) {
        assert!(SubE::TABLE.is_subset(E::TABLE), "not a sub-encoder");
        encode_to(&mut self.buf, raw, SubE::TABLE);
    }

    /// Appends a character left unencoded, typically a delimiter.
    ///
    /// # Panics
    ///
    /// Panics if `E::TABLE` does not allow the character.
    pub fn push(&mut self, ch: char) {
        assert!(E::TABLE.allows(ch), "table does not allow the char");
        self.buf.push(ch);
    }

    /// Appends text already encoded for `E` or one of its sub-encoders.
    ///
    /// # Panics
    ///
    /// Panics if `SubE` is not a [sub-encoder](Encoder#sub-encoders) of `E`.
    pub fn push_estr<SubE: Encoder>(&mut self, s: &EStr<SubE>) {
        assert!(SubE::TABLE.is_subset(E::TABLE), "not a sub-encoder");
        self.buf.push_str(s.as_str());
    }

    /// Returns the underlying `String`.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl<E: Encoder> Clone for EString<E> {
    fn clone(&self) -> Self {
        Self::new_validated(self.buf.clone())
    }
}

impl<E: Encoder> Default for EString<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Encoder> AsRef<EStr<E>> for EString<E> {
    fn as_ref(&self) -> &EStr<E> {
        self
    }
}

impl<E: Encoder> AsRef<str> for EString<E> {
    fn as_ref(&self) -> &str {
        &self.buf
    }
}

impl<E: Encoder> Borrow<EStr<E>> for EString<E> {
    fn borrow(&self) -> &EStr<E> {
        self
    }
}

impl<E: Encoder> From<&EStr<E>> for EString<E> {
    fn from(s: &EStr<E>) -> Self {
        s.to_owned()
    }
}

impl<E: Encoder> PartialEq for EString<E> {
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
    }
}

impl<E: Encoder> PartialEq<EStr<E>> for EString<E> {
    fn eq(&self, other: &EStr<E>) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<E: Encoder> PartialEq<str> for EString<E> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<E: Encoder> PartialEq<&str> for EString<E> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<E: Encoder> Eq for EString<E> {}

impl<E: Encoder> hash::Hash for EString<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.buf.hash(state);
    }
}

impl<E: Encoder> PartialOrd for EString<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Encoder> Ord for EString<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.buf.cmp(&other.buf)
    }
}

impl<E: Encoder> fmt::Debug for EString<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.buf, f)
    }
}

impl<E: Encoder> fmt::Display for EString<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.buf, f)
    }
}
