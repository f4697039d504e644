//! URI schemes and the registry of their default ports.

use crate::{
    component::Port,
    error::{IllegalUriPart, PartErrorKind, UriPart},
    pct_enc::table,
};
use core::{fmt, hash, str::FromStr};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

/// Maximum length of a scheme in bytes.
const MAX_LEN: usize = 256;

/// A [scheme] component, possibly carrying the default port of the scheme.
///
/// The text of a scheme is kept as parsed. Schemes are compared by their
/// text; use [`normalise`](Self::normalise) to compare them case-insensitively.
///
/// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
///
/// # Examples
///
/// ```
/// use typed_uri::scheme::Scheme;
///
/// let scheme = Scheme::parse("HTTP")?;
/// assert_eq!(scheme.as_str(), "HTTP");
/// assert_eq!(scheme.default_port().unwrap().value(), 80);
/// assert_eq!(scheme.normalise().as_str(), "http");
/// # Ok::<_, typed_uri::error::IllegalUriPart>(())
/// ```
#[derive(Clone)]
pub struct Scheme {
    text: Arc<str>,
    default_port: Option<Port>,
}

impl Scheme {
    /// Parses a scheme, looking up its default port in the [global registry].
    ///
    /// [global registry]: SchemeRegistry::global
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text does not match
    /// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )` or is longer than 256 bytes.
    pub fn parse(s: &str) -> Result<Self, IllegalUriPart> {
        SchemeRegistry::global().scheme(s)
    }

    fn validate(s: &str) -> Result<(), IllegalUriPart> {
        let err = |kind| Err(IllegalUriPart::new(UriPart::Scheme, s, kind));
        match s.as_bytes() {
            [] => err(PartErrorKind::Empty),
            [first, ..] if !first.is_ascii_alphabetic() => {
                err(PartErrorKind::UnexpectedChar { index: 0 })
            }
            bytes => match bytes.iter().position(|&x| !table::SCHEME.allows_ascii(x)) {
                Some(index) => err(PartErrorKind::UnexpectedChar { index }),
                None if bytes.len() > MAX_LEN => {
                    err(PartErrorKind::UnexpectedChar { index: MAX_LEN })
                }
                None => Ok(()),
            },
        }
    }

    /// Returns the scheme as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the default port of the scheme, if known.
    #[must_use]
    pub fn default_port(&self) -> Option<Port> {
        self.default_port
    }

    /// Checks whether the scheme is in lowercase.
    #[must_use]
    pub fn is_normal_form(&self) -> bool {
        !self.text.bytes().any(|x| x.is_ascii_uppercase())
    }

    /// Lowercases the scheme, returning the registered instance if there is one
    /// in the [global registry](SchemeRegistry::global).
    ///
    /// The default port of the result is the one registered there, if any.
    #[must_use]
    pub fn normalise(&self) -> Scheme {
        self.normalise_in(SchemeRegistry::global())
    }

    /// Lowercases the scheme against `registry`, which alone decides the
    /// default port of the result.
    pub(crate) fn normalise_in(&self, registry: &SchemeRegistry) -> Scheme {
        if let Some(scheme) = registry.get(&self.text) {
            return scheme;
        }
        let text = if self.is_normal_form() {
            self.text.clone()
        } else {
            self.text.to_ascii_lowercase().into()
        };
        Scheme {
            text,
            default_port: None,
        }
    }

    /// Checks whether the scheme equals the given text, ignoring ASCII case.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.text.eq_ignore_ascii_case(other)
    }
}

impl PartialEq for Scheme {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Scheme {}

impl hash::Hash for Scheme {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialEq<str> for Scheme {
    fn eq(&self, other: &str) -> bool {
        &*self.text == other
    }
}

impl PartialEq<&str> for Scheme {
    fn eq(&self, other: &&str) -> bool {
        &*self.text == *other
    }
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheme")
            .field("text", &&*self.text)
            .field("default_port", &self.default_port)
            .finish()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Scheme {
    type Err = IllegalUriPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Scheme {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Scheme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Scheme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// An append-only registry of known schemes and their default ports.
///
/// Registration is idempotent: the first registration of a scheme wins,
/// and a later registration with a conflicting default port is ignored.
///
/// A process-wide registry is available through [`global`](Self::global),
/// and is what [`Scheme::parse`] and the parsers of URI references consult.
/// Other registries may be passed explicitly, for instance to a
/// [`Normalizer`](crate::normalize::Normalizer).
///
/// # Examples
///
/// ```
/// use typed_uri::{component::Port, scheme::SchemeRegistry};
///
/// let registry = SchemeRegistry::new();
/// let foo = registry.register("foo", Some(Port::of(4673)?))?;
/// assert_eq!(foo.default_port().unwrap().value(), 4673);
///
/// let again = registry.register("FOO", Some(Port::of(1)?))?;
/// assert_eq!(again.default_port().unwrap().value(), 4673);
///
/// let scheme = registry.scheme("Foo")?;
/// assert_eq!(scheme.as_str(), "Foo");
/// assert_eq!(scheme.default_port(), foo.default_port());
/// # Ok::<_, typed_uri::error::IllegalUriPart>(())
/// ```
pub struct SchemeRegistry {
    schemes: RwLock<HashMap<Box<str>, Scheme>>,
}

static GLOBAL: LazyLock<SchemeRegistry> = LazyLock::new(SchemeRegistry::new);

const KNOWN: &[(&str, Option<u16>)] = &[
    ("http", Some(80)),
    ("https", Some(443)),
    ("ws", Some(80)),
    ("wss", Some(443)),
    ("ftp", Some(21)),
    ("sftp", Some(22)),
    ("ssh", Some(22)),
    ("file", None),
    ("mailto", None),
];

impl SchemeRegistry {
    /// Creates a registry of the well-known schemes:
    /// `http`, `https`, `ws`, `wss`, `ftp`, `sftp`, `ssh`, `file` and `mailto`.
    #[must_use]
    pub fn new() -> Self {
        let schemes = KNOWN
            .iter()
            .map(|&(name, port)| {
                let scheme = Scheme {
                    text: name.into(),
                    default_port: port.and_then(Port::from_value),
                };
                (Box::from(name), scheme)
            })
            .collect();
        Self {
            schemes: RwLock::new(schemes),
        }
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            schemes: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static SchemeRegistry {
        &GLOBAL
    }

    /// Registers a scheme, returning the registered instance.
    ///
    /// If the scheme is already registered, the existing instance is returned
    /// and `default_port` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `name` is not a valid scheme.
    pub fn register(
        &self,
        name: &str,
        default_port: Option<Port>,
    ) -> Result<Scheme, IllegalUriPart> {
        Scheme::validate(name)?;
        let key = name.to_ascii_lowercase();

        let mut schemes = self.schemes.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = schemes.get(key.as_str()) {
            if existing.default_port.map(Port::value) != default_port.map(Port::value) {
                tracing::debug!(
                    scheme = %key,
                    registered = ?existing.default_port.map(Port::value),
                    requested = ?default_port.map(Port::value),
                    "ignoring conflicting default port for registered scheme"
                );
            }
            return Ok(existing.clone());
        }

        let scheme = Scheme {
            text: key.as_str().into(),
            default_port: default_port.map(|p| p.normalise()),
        };
        tracing::debug!(scheme = %key, default_port = ?default_port.map(Port::value), "registered scheme");
        schemes.insert(key.into_boxed_str(), scheme.clone());
        Ok(scheme)
    }

    /// Looks up a registered scheme, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Scheme> {
        let schemes = self.schemes.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(scheme) = schemes.get(name) {
            return Some(scheme.clone());
        }
        if name.bytes().any(|x| x.is_ascii_uppercase()) {
            schemes.get(name.to_ascii_lowercase().as_str()).cloned()
        } else {
            None
        }
    }

    /// Parses a scheme, attaching the default port registered for it.
    ///
    /// The text of the scheme is preserved as given. When it is already the
    /// canonical text, the registered instance itself is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `text` is not a valid scheme.
    pub fn scheme(&self, text: &str) -> Result<Scheme, IllegalUriPart> {
        Scheme::validate(text)?;
        Ok(match self.get(text) {
            Some(registered) if registered.text.as_ref() == text => registered,
            Some(registered) => Scheme {
                text: text.into(),
                default_port: registered.default_port,
            },
            None => Scheme {
                text: text.into(),
                default_port: None,
            },
        })
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schemes = self.schemes.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<_> = schemes.keys().map(|k| &**k).collect();
        names.sort_unstable();
        f.debug_struct("SchemeRegistry")
            .field("schemes", &names)
            .finish()
    }
}
