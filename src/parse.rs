//! Splitting of a URI reference into its components.

use crate::{
    component::{Authority, Fragment, Path, Query},
    error::{IllegalUriPart, IllegalUriReference, Reason, ReferenceKind},
    internal::{first_segment_colon, Parts},
    pct_enc::table,
    scheme::Scheme,
    Uri,
};

pub(crate) fn parse(s: &str) -> Result<Uri, IllegalUriReference> {
    let parts = Reader::new(s).read_parts()?;
    Ok(Uri::from_parts(parts))
}

/// A reader over the input, splitting off one component at a time.
///
/// # Invariants
///
/// `pos <= s.len()`, `pos` is non-decreasing and always on an ASCII
/// delimiter or the end of input.
struct Reader<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    /// Reads up to (not including) the first of the given delimiters.
    fn read_until(&mut self, delims: &[char]) -> &'a str {
        let rest = self.rest();
        let len = rest.find(delims).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn read_str(&mut self, prefix: &str) -> bool {
        let found = self.rest().starts_with(prefix);
        if found {
            self.pos += prefix.len();
        }
        found
    }

    fn syntax_error(&self, cause: IllegalUriPart) -> IllegalUriReference {
        IllegalUriReference::new(ReferenceKind::Uri, self.s, Reason::Syntax, Some(cause))
    }

    fn read_scheme(&mut self) -> Result<Option<Scheme>, IllegalUriReference> {
        let s = self.s;
        let Some(i) = s.find([':', '/', '?', '#']) else {
            return Ok(None);
        };
        let candidate = &s[..i];
        let looks_like_scheme = s.as_bytes()[i] == b':'
            && candidate.starts_with(|c: char| c.is_ascii_alphabetic())
            && candidate.bytes().all(|x| table::SCHEME.allows_ascii(x));
        if !looks_like_scheme {
            return Ok(None);
        }
        let scheme = Scheme::parse(candidate).map_err(|e| self.syntax_error(e))?;
        self.pos = i + 1;
        Ok(Some(scheme))
    }

    fn read_parts(mut self) -> Result<Parts, IllegalUriReference> {
        let scheme = self.read_scheme()?;

        let authority = if self.read_str("//") {
            let authority = self.read_until(&['/', '?', '#']);
            Some(Authority::parse(authority).map_err(|e| self.syntax_error(e))?)
        } else {
            None
        };

        let path_start = self.pos;
        let path = self.read_until(&['?', '#']);
        let path = Path::parse(path).map_err(|e| self.syntax_error(e))?;

        if scheme.is_none() && authority.is_none() {
            if let Some(i) = first_segment_colon(path.as_str()) {
                return Err(IllegalUriReference::new(
                    ReferenceKind::Uri,
                    self.s,
                    Reason::AmbiguousColon {
                        index: path_start + i,
                    },
                    None,
                ));
            }
        }

        let query = if self.read_str("?") {
            let query = self.read_until(&['#']);
            Some(Query::parse(query).map_err(|e| self.syntax_error(e))?)
        } else {
            None
        };

        let fragment = if self.read_str("#") {
            let fragment = self.rest();
            self.pos = self.s.len();
            Some(Fragment::parse(fragment).map_err(|e| self.syntax_error(e))?)
        } else {
            None
        };

        debug_assert_eq!(self.pos, self.s.len());
        Ok(Parts {
            scheme,
            authority,
            path,
            query,
            fragment,
        })
    }
}
