//! Percent-encoding utilities.
//!
//! Besides the [`EStr`] and [`EString`] types, this module provides the
//! character-set engine shared by every component: [`encode`], [`normalise`]
//! and [`is_normal_form`], each parameterized by a [`Table`].

pub mod encoder;
mod estring;
pub mod table;

pub use encoder::Encoder;
pub use estring::EString;
pub use table::Table;

use core::{cmp::Ordering, hash, iter::FusedIterator, marker::PhantomData, str};
use ref_cast::{ref_cast_custom, RefCastCustom};
use std::borrow::{Cow, ToOwned};

/// Percent-encoded string slices.
///
/// The owned counterpart of `EStr` is [`EString`].
///
/// # Type parameter
///
/// The `EStr<E>` type is parameterized over a type `E` that implements [`Encoder`].
/// The associated constant `E::TABLE` of type [`Table`] specifies the byte patterns
/// allowed in a string. In short, the underlying byte sequence of an `EStr<E>` slice
/// can be formed by joining any number of the following byte sequences:
///
/// - `[x]` where `E::TABLE.allows(x as char)`.
/// - `[b'%', hi, lo]` where `E::TABLE.allows_pct_encoded() && hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()`.
///
/// # Comparison
///
/// `EStr` slices are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Normalisation is **not** performed prior to comparison.
///
/// # Examples
///
/// ```
/// use typed_uri::pct_enc::{encoder::Query, EStr};
///
/// let query = EStr::<Query>::new_or_panic("name=%E5%BC%A0%E4%B8%89&lang=rust");
/// let (k, v) = query.split('&').next().unwrap().split_once('=').unwrap();
/// assert_eq!(k, "name");
/// assert_eq!(v.decode().to_string().unwrap(), "张三");
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr<E: Encoder> {
    encoder: PhantomData<E>,
    inner: str,
}

impl<E: Encoder> EStr<E> {
    /// Converts a string slice to an `EStr` slice assuming validity.
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty `EStr` slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Converts a string slice to an `EStr` slice.
    ///
    /// # Panics
    ///
    /// Panics if the string is not properly encoded with `E`.
    /// For a non-panicking variant, use [`new`](Self::new).
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Self {
        match Self::new(s) {
            Some(s) => s,
            None => panic!("improperly encoded string"),
        }
    }

    /// Converts a string slice to an `EStr` slice, returning `None` if the conversion fails.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Self> {
        if E::TABLE.validate(s.as_bytes()) {
            Some(Self::new_validated(s))
        } else {
            None
        }
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the `EStr` slice in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the `EStr` slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator used to decode the `EStr` slice.
    ///
    /// Always **split before decoding**, as otherwise the data may be
    /// mistaken for component delimiters.
    ///
    /// Note that the iterator will **not** decode `U+002B` (+) as `0x20` (space).
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_uri::pct_enc::{encoder::Path, EStr};
    ///
    /// let dec = EStr::<Path>::new_or_panic("%C2%A1Hola%21").decode();
    /// assert_eq!(*dec.clone().to_bytes(), [0xc2, 0xa1, 0x48, 0x6f, 0x6c, 0x61, 0x21]);
    /// assert_eq!(dec.to_string().unwrap(), "¡Hola!");
    /// ```
    pub fn decode(&self) -> Decode<'_> {
        Decode::new(&self.inner)
    }

    /// Returns an iterator over subslices of the `EStr` slice separated by the given delimiter.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    pub fn split(&self, delim: char) -> Split<'_, E> {
        assert!(
            table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        Split {
            inner: self.inner.split(delim),
            encoder: PhantomData,
        }
    }

    /// Splits the `EStr` slice on the first occurrence of the given delimiter and
    /// returns prefix before delimiter and suffix after delimiter.
    ///
    /// Returns `None` if the delimiter is not found.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    #[must_use]
    pub fn split_once(&self, delim: char) -> Option<(&Self, &Self)> {
        assert!(
            table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        self.inner
            .split_once(delim)
            .map(|(a, b)| (Self::new_validated(a), Self::new_validated(b)))
    }

    /// Checks whether the slice is in normal form for `E`.
    ///
    /// See [`is_normal_form`] for the exact definition.
    #[must_use]
    pub fn is_normal_form(&self) -> bool {
        is_normal_form(self.as_str(), E::TABLE, E::LEAVE_AS_IS)
    }

    /// Normalises the slice, returning `None` if it is already in normal form.
    #[must_use]
    pub fn normalise(&self) -> Option<EString<E>> {
        normalise(self.as_str(), E::TABLE, E::LEAVE_AS_IS).map(EString::new_validated)
    }
}

impl<E: Encoder> AsRef<str> for EStr<E> {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl<E: Encoder> AsRef<EStr<E>> for EStr<E> {
    fn as_ref(&self) -> &EStr<E> {
        self
    }
}

impl<E: Encoder> PartialEq for EStr<E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<E: Encoder> PartialEq<str> for EStr<E> {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl<E: Encoder> PartialEq<&str> for EStr<E> {
    fn eq(&self, other: &&str) -> bool {
        &self.inner == *other
    }
}

impl<E: Encoder> PartialEq<EStr<E>> for str {
    fn eq(&self, other: &EStr<E>) -> bool {
        self == &other.inner
    }
}

impl<E: Encoder> Eq for EStr<E> {}

impl<E: Encoder> hash::Hash for EStr<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<E: Encoder> PartialOrd for EStr<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Encoder> Ord for EStr<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl<E: Encoder> core::fmt::Debug for EStr<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.inner, f)
    }
}

impl<E: Encoder> core::fmt::Display for EStr<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)
    }
}

impl<E: Encoder> Default for &EStr<E> {
    /// Creates an empty `EStr` slice.
    fn default() -> Self {
        EStr::EMPTY
    }
}

impl<E: Encoder> ToOwned for EStr<E> {
    type Owned = EString<E>;

    fn to_owned(&self) -> EString<E> {
        EString::new_validated(self.inner.to_owned())
    }
}

pub(crate) const fn is_hexdig(x: u8) -> bool {
    x.is_ascii_hexdigit()
}

pub(crate) const fn is_hexdig_pair(x: u8, y: u8) -> bool {
    is_hexdig(x) && is_hexdig(y)
}

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit());
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

/// An iterator used to decode an [`EStr`] slice.
///
/// This struct is created by [`EStr::decode`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a str,
}

/// An item returned by the [`Decode`] iterator.
#[derive(Clone, Copy, Debug)]
pub enum DecodedChunk<'a> {
    /// An unencoded subslice.
    Unencoded(&'a str),
    /// A percent-encoded octet, decoded (for example, `"%20"` decoded as `0x20`).
    PctDecoded(u8),
}

impl<'a> Decode<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn next_if_unencoded(&mut self) -> Option<&'a str> {
        let i = self
            .source
            .bytes()
            .position(|x| x == b'%')
            .unwrap_or(self.source.len());

        if i == 0 {
            None
        } else {
            let s;
            (s, self.source) = self.source.split_at(i);
            Some(s)
        }
    }

    /// Decodes the slice to bytes.
    ///
    /// This method allocates only when the slice contains any percent-encoded octet.
    #[must_use]
    pub fn to_bytes(mut self) -> Cow<'a, [u8]> {
        if !self.source.contains('%') {
            return Cow::Borrowed(self.source.as_bytes());
        }
        let mut buf = Vec::with_capacity(self.source.len());
        for chunk in &mut self {
            match chunk {
                DecodedChunk::Unencoded(s) => buf.extend_from_slice(s.as_bytes()),
                DecodedChunk::PctDecoded(x) => buf.push(x),
            }
        }
        Cow::Owned(buf)
    }

    /// Attempts to decode the slice to a string.
    ///
    /// This method allocates only when the slice contains any percent-encoded octet.
    ///
    /// # Errors
    ///
    /// Returns `Err` containing the decoded bytes if they are not valid UTF-8.
    pub fn to_string(self) -> Result<Cow<'a, str>, Vec<u8>> {
        match self.to_bytes() {
            // Borrowed bytes come straight from a `str`.
            Cow::Borrowed(bytes) => match str::from_utf8(bytes) {
                Ok(s) => Ok(Cow::Borrowed(s)),
                Err(_) => Err(bytes.to_vec()),
            },
            Cow::Owned(bytes) => String::from_utf8(bytes)
                .map(Cow::Owned)
                .map_err(|e| e.into_bytes()),
        }
    }

    /// Decodes the slice to a string, replacing any invalid UTF-8 sequences with
    /// [`U+FFFD REPLACEMENT CHARACTER`][U+FFFD].
    ///
    /// [U+FFFD]: char::REPLACEMENT_CHARACTER
    #[must_use]
    pub fn to_string_lossy(self) -> Cow<'a, str> {
        match self.to_bytes() {
            Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
            Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

impl<'a> Iterator for Decode<'a> {
    type Item = DecodedChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.source.is_empty() {
            None
        } else if let Some(s) = self.next_if_unencoded() {
            Some(DecodedChunk::Unencoded(s))
        } else {
            let s;
            (s, self.source) = self.source.split_at(3);
            let x = decode_octet(s.as_bytes()[1], s.as_bytes()[2]);
            Some(DecodedChunk::PctDecoded(x))
        }
    }
}

impl FusedIterator for Decode<'_> {}

pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// Percent-encodes a string with the given table, appending the result to a buffer.
///
/// A character is preserved if the table allows it; every octet of its
/// UTF-8 encoding is percent-encoded otherwise. A `'%'` is always encoded.
pub(crate) fn encode_to(buf: &mut String, raw: &str, table: Table) {
    for x in raw.bytes() {
        if table.allows_ascii(x) {
            buf.push(x as char);
        } else {
            buf.push_str(encode_byte(x));
        }
    }
}

/// Percent-encodes a string with the given table.
///
/// Note that this function will **not** encode `U+0020` (space) as `U+002B` (+).
///
/// # Examples
///
/// ```
/// use typed_uri::pct_enc::{encode, table};
///
/// assert_eq!(encode("a b/c?", table::SEGMENT), "a%20b%2Fc%3F");
/// assert_eq!(encode("100%", table::QUERY), "100%25");
/// ```
#[must_use]
pub fn encode(raw: &str, table: Table) -> String {
    let mut buf = String::with_capacity(raw.len());
    encode_to(&mut buf, raw, table);
    buf
}

/// Letter case handling during normalisation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Case {
    Sensitive,
    /// Unencoded ASCII letters are folded to lowercase.
    Insensitive,
}

/// Checks whether a percent-encoded octet should be decoded during normalisation.
fn decodes(x: u8, table: Table, leave_as_is: Table) -> bool {
    table.allows_ascii(x) && !leave_as_is.allows_ascii(x)
}

/// Normalises a percent-encoded string.
///
/// An octet is decoded when the decoded character is allowed by `table`
/// and not allowed by `leave_as_is`; it is kept encoded otherwise, with its
/// hexadecimal digits uppercased. Characters not allowed by `table`, as well
/// as stray `'%'` characters, are percent-encoded.
///
/// Returns `None` if the string is already in normal form, in which case
/// [`is_normal_form`] returns `true` for the same arguments.
///
/// # Examples
///
/// ```
/// use typed_uri::pct_enc::{normalise, table};
///
/// assert_eq!(normalise("%7e%2f%2a", table::PATH, table::RESERVED).unwrap(), "~%2F%2A");
/// assert_eq!(normalise("a%2F", table::PATH, table::RESERVED), None);
/// ```
#[must_use]
pub fn normalise(s: &str, table: Table, leave_as_is: Table) -> Option<String> {
    normalise_with(s, table, leave_as_is, Case::Sensitive)
}

/// Checks whether a percent-encoded string is in normal form.
///
/// See [`normalise`] for the definition of normal form.
#[must_use]
pub fn is_normal_form(s: &str, table: Table, leave_as_is: Table) -> bool {
    is_normal_form_with(s, table, leave_as_is, Case::Sensitive)
}

pub(crate) fn normalise_with(
    s: &str,
    table: Table,
    leave_as_is: Table,
    case: Case,
) -> Option<String> {
    if is_normal_form_with(s, table, leave_as_is, case) {
        return None;
    }

    let fold = |x: u8| {
        if case == Case::Insensitive {
            x.to_ascii_lowercase()
        } else {
            x
        }
    };

    let bytes = s.as_bytes();
    let mut buf = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        let x = bytes[i];
        if x == b'%' && i + 2 < bytes.len() && is_hexdig_pair(bytes[i + 1], bytes[i + 2]) {
            let octet = decode_octet(bytes[i + 1], bytes[i + 2]);
            if decodes(octet, table, leave_as_is) {
                buf.push(fold(octet) as char);
            } else {
                buf.push_str(encode_byte(octet));
            }
            i += 3;
        } else {
            if table.allows_ascii(x) {
                buf.push(fold(x) as char);
            } else {
                buf.push_str(encode_byte(x));
            }
            i += 1;
        }
    }
    Some(buf)
}

pub(crate) fn is_normal_form_with(s: &str, table: Table, leave_as_is: Table, case: Case) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let x = bytes[i];
        if x == b'%' {
            if i + 2 >= bytes.len() || !is_hexdig_pair(bytes[i + 1], bytes[i + 2]) {
                return false;
            }
            let (hi, lo) = (bytes[i + 1], bytes[i + 2]);
            if hi.is_ascii_lowercase() || lo.is_ascii_lowercase() {
                return false;
            }
            if decodes(decode_octet(hi, lo), table, leave_as_is) {
                return false;
            }
            i += 3;
        } else {
            if !table.allows_ascii(x) {
                return false;
            }
            if case == Case::Insensitive && x.is_ascii_uppercase() {
                return false;
            }
            i += 1;
        }
    }
    true
}

/// An iterator over subslices of an [`EStr`] slice separated by a delimiter.
///
/// This struct is created by [`EStr::split`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Split<'a, E: Encoder> {
    inner: str::Split<'a, char>,
    encoder: PhantomData<E>,
}

impl<'a, E: Encoder> Iterator for Split<'a, E> {
    type Item = &'a EStr<E>;

    fn next(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next().map(EStr::new_validated)
    }
}

impl<'a, E: Encoder> DoubleEndedIterator for Split<'a, E> {
    fn next_back(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next_back().map(EStr::new_validated)
    }
}

impl<E: Encoder> FusedIterator for Split<'_, E> {}

#[cfg(test)]
mod tests {
    use super::{table::*, *};

    const CASES: &[&str] = &[
        "",
        "abc",
        "ABC",
        "%41%42%43",
        "%7e%7E",
        "%2f%2F",
        "a%2",
        "%",
        "%zz",
        "a b",
        "caf\u{e9}",
        "%C3%A9",
        "%c3%a9",
        "/a/./b/../c",
        "%2E%2e",
    ];

    #[test]
    fn encode_raw() {
        assert_eq!(encode("te st", PATH), "te%20st");
        assert_eq!(encode("a/b", SEGMENT), "a%2Fb");
        assert_eq!(encode("caf\u{e9}", QUERY), "caf%C3%A9");
        assert_eq!(encode("a=b&c", QUERY_PARAM_KEY), "a%3Db%26c");
        assert_eq!(encode("a=b&c", QUERY_PARAM_VALUE), "a=b%26c");
    }

    #[test]
    fn normalise_octets() {
        assert_eq!(normalise("%7e", PATH, RESERVED).unwrap(), "~");
        assert_eq!(normalise("%2f", PATH, RESERVED).unwrap(), "%2F");
        assert_eq!(normalise("%c3%a9", PATH, RESERVED).unwrap(), "%C3%A9");
        assert_eq!(normalise("a b", PATH, RESERVED).unwrap(), "a%20b");
        assert_eq!(normalise("50%", QUERY, RESERVED).unwrap(), "50%25");
        assert_eq!(normalise("%2F", PATH, RESERVED), None);
        assert_eq!(
            normalise_with("%45xAMPLE.com", REG_NAME, RESERVED, Case::Insensitive).unwrap(),
            "example.com"
        );
    }

    #[test]
    fn normalise_agrees_with_is_normal_form() {
        for table in [PATH, QUERY, REG_NAME, USERNAME] {
            for case in [Case::Sensitive, Case::Insensitive] {
                for s in CASES {
                    let normalised = normalise_with(s, table, RESERVED, case);
                    assert_eq!(
                        normalised.is_none(),
                        is_normal_form_with(s, table, RESERVED, case),
                        "{s:?}"
                    );
                    if let Some(n) = normalised {
                        assert!(is_normal_form_with(&n, table, RESERVED, case), "{n:?}");
                        assert_eq!(normalise_with(&n, table, RESERVED, case), None);
                    }
                }
            }
        }
    }

    #[test]
    fn decode() {
        let s = EStr::<encoder::Query>::new_or_panic("a%20b%E6%B5%8B");
        assert_eq!(s.decode().to_string().unwrap(), "a b测");
        let s = EStr::<encoder::Query>::new_or_panic("%FF");
        assert_eq!(s.decode().to_string().unwrap_err(), [0xff]);
        assert_eq!(s.decode().to_string_lossy(), "\u{fffd}");
        let s = EStr::<encoder::Query>::new_or_panic("plain");
        assert!(matches!(s.decode().to_bytes(), Cow::Borrowed(b"plain")));
    }

    #[test]
    fn split() {
        let s = EStr::<encoder::Query>::new_or_panic("id=3&name=%E5%BC%A0");
        let mut split = s.split('&');
        let (k, v) = split.next().unwrap().split_once('=').unwrap();
        assert_eq!(k, "id");
        assert_eq!(v, "3");
        assert_eq!(split.next().unwrap(), "name=%E5%BC%A0");
        assert!(split.next().is_none());
        assert!(EStr::<encoder::Query>::EMPTY.split('&').eq([""]));
    }
}
