use super::{encoded_component, Segment};
use crate::pct_enc::{encoder, EStr, EString};
use core::iter::FusedIterator;

encoded_component! {
    @base
    /// A [path] component.
    ///
    /// A path is a sequence of segments separated by `'/'`, and is absolute
    /// when it starts with `'/'`. Whether a path is legal in a URI reference
    /// depends on the other components; see [`BuildError`].
    ///
    /// [path]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.3
    /// [`BuildError`]: crate::error::BuildError
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_uri::component::Path;
    ///
    /// let path = Path::parse("/a/b/../%7Ec/./")?;
    /// assert!(path.is_absolute());
    /// assert!(path.segments().eq(["a", "b", "..", "%7Ec", ".", ""]));
    /// assert_eq!(path.normalise(), "/a/~c/");
    /// # Ok::<_, typed_uri::error::IllegalUriPart>(())
    /// ```
    Path: Path, Path
}

pub(crate) static EMPTY: Path = Path(EString::new_validated(String::new()));

impl Path {
    /// Returns the empty path.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the path `"/"`.
    #[must_use]
    pub fn root() -> Self {
        Self::from_string_unchecked(String::from("/"))
    }

    /// Joins segments into a path, starting with `'/'` if `absolute` is `true`.
    ///
    /// Note that a relative path whose first segment is empty still starts
    /// with `'/'` once joined.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_uri::component::{Path, Segment};
    ///
    /// let segments = [Segment::encode("a b"), Segment::encode("c/d")];
    /// assert_eq!(Path::of(true, &segments), "/a%20b/c%2Fd");
    /// assert_eq!(Path::of(false, &segments), "a%20b/c%2Fd");
    /// assert_eq!(Path::of(true, &[] as &[Segment]), "/");
    /// ```
    pub fn of<I, S>(absolute: bool, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<EStr<encoder::Segment>>,
    {
        let mut buf = String::new();
        if absolute {
            buf.push('/');
        }
        for (i, seg) in segments.into_iter().enumerate() {
            if i > 0 {
                buf.push('/');
            }
            buf.push_str(seg.as_ref().as_str());
        }
        Self::from_string_unchecked(buf)
    }

    /// Checks whether the path starts with `'/'`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.as_str().starts_with('/')
    }

    /// Checks whether the path is neither empty nor absolute.
    #[must_use]
    pub fn is_rootless(&self) -> bool {
        !self.is_empty() && !self.is_absolute()
    }

    /// Returns an iterator over the segments of the path.
    ///
    /// The leading `'/'` of an absolute path does not delimit a segment,
    /// and an empty path has no segments.
    pub fn segments(&self) -> Segments<'_> {
        let s = self.as_str();
        let s = s.strip_prefix('/').unwrap_or(s);
        Segments {
            inner: if self.is_empty() {
                None
            } else {
                Some(s.split('/'))
            },
        }
    }

    /// Checks whether the path is in normal form.
    ///
    /// See [`normalise`](Self::normalise) for the definition of normal form.
    #[must_use]
    pub fn is_normal_form(&self) -> bool {
        self.0.is_normal_form() && self.normalise().as_str() == self.as_str()
    }

    /// Normalises the path.
    ///
    /// Percent-encoded unreserved characters are decoded and the hexadecimal
    /// digits of the remaining octets are uppercased. Dot segments are then
    /// removed.
    ///
    /// A rootless path stays rootless: leading `".."` segments are kept, and
    /// `"./"` is prepended when the result would otherwise be empty or
    /// start with `'/'`.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_uri::component::Path;
    ///
    /// assert_eq!(Path::parse("a/./b/../c")?.normalise(), "a/c");
    /// assert_eq!(Path::parse("../a/..")?.normalise(), "../");
    /// assert_eq!(Path::parse("a/..")?.normalise(), "./");
    /// assert_eq!(Path::parse("a/..//b")?.normalise(), ".//b");
    /// # Ok::<_, typed_uri::error::IllegalUriPart>(())
    /// ```
    #[must_use]
    pub fn normalise(&self) -> Self {
        self.normalise_with_underflow().0
    }

    /// Normalises the path, also telling whether a `".."` segment
    /// went above the root or was kept at the start of a rootless path.
    pub(crate) fn normalise_with_underflow(&self) -> (Self, bool) {
        if self.is_empty() {
            return (Self::empty(), false);
        }
        let encoded = self.normalise_encoding();
        let path = encoded.as_str();
        if path.starts_with('/') {
            let (path, underflow) = remove_dot_segments(path);
            return (Self::from_string_unchecked(path), underflow);
        }

        let (mut path, underflow) = dot_segments(path, true);
        if path.is_empty() || path.starts_with('/') {
            path.insert_str(0, "./");
        }
        (Self::from_string_unchecked(path), underflow)
    }

    /// Normalises the percent-encoding of the path, leaving its segments alone.
    pub(crate) fn normalise_encoding(&self) -> Self {
        match self.0.normalise() {
            Some(s) => Self(s),
            None => self.clone(),
        }
    }

    /// Replaces the leading slashes of a path starting with `"//"` by a single one,
    /// so that the path cannot be mistaken for an authority.
    pub(crate) fn collapse_leading_slashes(self) -> Self {
        if self.as_str().starts_with("//") {
            let rest = self.as_str().trim_start_matches('/');
            Self::from_string_unchecked(format!("/{rest}"))
        } else {
            self
        }
    }
}

/// An iterator over the segments of a [`Path`].
///
/// This struct is created by [`Path::segments`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Segments<'a> {
    inner: Option<core::str::Split<'a, char>>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a EStr<encoder::Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next().map(EStr::new_validated)
    }
}

impl<'a> DoubleEndedIterator for Segments<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next_back().map(EStr::new_validated)
    }
}

impl FusedIterator for Segments<'_> {}

impl From<Segment> for Path {
    fn from(seg: Segment) -> Self {
        Self::from_string_unchecked(seg.as_str().to_owned())
    }
}

enum SegKind {
    Dot,
    DoubleDot,
    Normal,
}

fn classify_segment(mut seg: &str) -> SegKind {
    if seg.is_empty() {
        return SegKind::Normal;
    }
    if let Some(rem) = seg.strip_prefix('.') {
        seg = rem;
    } else if let Some(rem) = seg.strip_prefix("%2E") {
        seg = rem;
    } else if let Some(rem) = seg.strip_prefix("%2e") {
        seg = rem;
    }
    if seg.is_empty() {
        SegKind::Dot
    } else if seg == "." || seg == "%2E" || seg == "%2e" {
        SegKind::DoubleDot
    } else {
        SegKind::Normal
    }
}

/// Removes dot segments from a path, as described in
/// [Section 5.2.4 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.4).
///
/// Segments are kept on a stack: `"."` is dropped, `".."` pops the last
/// segment, and any other segment is pushed. A trailing dot segment leaves
/// a trailing slash behind. Percent-encoded dots count as dots.
///
/// Returns the resulting path and whether a `".."` found the stack empty.
pub(crate) fn remove_dot_segments(path: &str) -> (String, bool) {
    dot_segments(path, false)
}

/// Removes dot segments, keeping a `".."` that has nothing to pop
/// if `keep_parents` is set.
fn dot_segments(path: &str, keep_parents: bool) -> (String, bool) {
    let (absolute, rest) = match path.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, path),
    };

    let mut underflow = false;
    let mut stack: Vec<&str> = Vec::new();
    let mut segments = rest.split('/').peekable();
    while let Some(seg) = segments.next() {
        let last = segments.peek().is_none();
        match classify_segment(seg) {
            SegKind::Dot => {}
            SegKind::DoubleDot => match stack.last() {
                Some(&top) if !(keep_parents && top == "..") => {
                    stack.pop();
                }
                _ => {
                    underflow = true;
                    if keep_parents {
                        stack.push("..");
                        continue;
                    }
                }
            },
            SegKind::Normal => {
                stack.push(seg);
                continue;
            }
        }
        if last {
            stack.push("");
        }
    }

    let mut buf = String::with_capacity(path.len());
    if absolute {
        buf.push('/');
    }
    for (i, seg) in stack.iter().enumerate() {
        if i > 0 {
            buf.push('/');
        }
        buf.push_str(seg);
    }
    (buf, underflow)
}
