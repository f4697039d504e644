use super::string_traits;
use crate::{
    error::{IllegalUriPart, PartErrorKind, UriPart},
    pct_enc::{self, table, Case},
};
use core::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// The syntactic form of a [`Host`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// An IPv4 address in dotted-decimal form.
    Ipv4(Ipv4Addr),
    /// An IPv6 address, written in brackets.
    Ipv6(Ipv6Addr),
    /// An IP address of a future version, written in brackets.
    IpvFuture,
    /// A registered name, possibly empty.
    #[default]
    RegName,
}

/// A [host] subcomponent of authority.
///
/// [host]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
///
/// # Examples
///
/// ```
/// use std::net::Ipv6Addr;
/// use typed_uri::component::{Host, HostKind};
///
/// let host = Host::parse("[2001:DB8::0:1]")?;
/// assert_eq!(host.kind(), HostKind::Ipv6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)));
/// assert_eq!(host.normalise(), "[2001:db8::1]");
///
/// let host = Host::parse("WWW.%65xample.COM")?;
/// assert_eq!(host.kind(), HostKind::RegName);
/// assert_eq!(host.normalise(), "www.example.com");
/// # Ok::<_, typed_uri::error::IllegalUriPart>(())
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Host {
    text: String,
    kind: HostKind,
}

impl Host {
    /// Parses a host.
    ///
    /// A bracketed host must hold an IPv6 address (without a zone identifier)
    /// or an IPvFuture address. Any other host is a registered name, which is
    /// recognised as an IPv4 address when it is one in dotted-decimal form.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host is not valid.
    pub fn parse(s: &str) -> Result<Self, IllegalUriPart> {
        let kind = if let Some(literal) = s.strip_prefix('[') {
            let Some(literal) = literal.strip_suffix(']') else {
                return Err(IllegalUriPart::new(
                    UriPart::Host,
                    s,
                    PartErrorKind::InvalidIpLiteral,
                ));
            };
            parse_ip_literal(literal)
                .ok_or_else(|| IllegalUriPart::new(UriPart::Host, s, PartErrorKind::InvalidIpLiteral))?
        } else {
            super::check(s, table::REG_NAME, UriPart::Host)?;
            classify_reg_name(s)
        };
        Ok(Self {
            text: s.to_owned(),
            kind,
        })
    }

    /// Creates a registered name from unencoded text, percent-encoding
    /// every character not allowed in it.
    ///
    /// The result is an IPv4 host if the text is an IPv4 address.
    #[must_use]
    pub fn encode(raw: &str) -> Self {
        let text = pct_enc::encode(raw, table::REG_NAME);
        let kind = classify_reg_name(&text);
        Self { text, kind }
    }

    /// Returns the host as a string slice, with brackets if it is an IP literal.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the syntactic form of the host.
    #[must_use]
    pub fn kind(&self) -> HostKind {
        self.kind
    }

    /// Checks whether the host is an empty registered name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the IPv4 address, if the host is one.
    #[must_use]
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self.kind {
            HostKind::Ipv4(addr) => Some(addr),
            _ => None,
        }
    }

    /// Returns the IPv6 address, if the host is one.
    #[must_use]
    pub fn ipv6(&self) -> Option<Ipv6Addr> {
        match self.kind {
            HostKind::Ipv6(addr) => Some(addr),
            _ => None,
        }
    }

    /// Checks whether the host is in normal form.
    ///
    /// See [`normalise`](Self::normalise) for the definition of normal form.
    #[must_use]
    pub fn is_normal_form(&self) -> bool {
        match self.kind {
            HostKind::Ipv4(_) => true,
            HostKind::Ipv6(addr) => self.text == format!("[{addr}]"),
            HostKind::IpvFuture => !self.text.bytes().any(|x| x.is_ascii_uppercase()),
            HostKind::RegName => pct_enc::is_normal_form_with(
                &self.text,
                table::REG_NAME,
                table::RESERVED,
                Case::Insensitive,
            ),
        }
    }

    /// Normalises the host.
    ///
    /// A registered name is lowercased and has its percent-encoded unreserved
    /// characters decoded; the remaining octets get uppercase hexadecimal
    /// digits. An IPv6 address is written in its [RFC 5952] form.
    /// An IPvFuture address is lowercased.
    ///
    /// [RFC 5952]: https://datatracker.ietf.org/doc/html/rfc5952
    #[must_use]
    pub fn normalise(&self) -> Host {
        match self.kind {
            HostKind::Ipv4(_) => self.clone(),
            HostKind::Ipv6(addr) => Host {
                text: format!("[{addr}]"),
                kind: self.kind,
            },
            HostKind::IpvFuture => Host {
                text: self.text.to_ascii_lowercase(),
                kind: self.kind,
            },
            HostKind::RegName => match pct_enc::normalise_with(
                &self.text,
                table::REG_NAME,
                table::RESERVED,
                Case::Insensitive,
            ) {
                Some(text) => {
                    let kind = classify_reg_name(&text);
                    Host { text, kind }
                }
                None => self.clone(),
            },
        }
    }
}

fn classify_reg_name(s: &str) -> HostKind {
    match s.parse::<Ipv4Addr>() {
        Ok(addr) => HostKind::Ipv4(addr),
        Err(_) => HostKind::RegName,
    }
}

/// Parses the text between the brackets of an IP literal.
fn parse_ip_literal(s: &str) -> Option<HostKind> {
    match s.as_bytes() {
        [b'v' | b'V', rest @ ..] => {
            let dot = rest.iter().position(|&x| x == b'.')?;
            let (version, addr) = (&rest[..dot], &rest[dot + 1..]);
            let valid = !version.is_empty()
                && version.iter().all(u8::is_ascii_hexdigit)
                && !addr.is_empty()
                && addr.iter().all(|&x| table::IPV_FUTURE.allows_ascii(x));
            valid.then_some(HostKind::IpvFuture)
        }
        _ => s.parse().ok().map(HostKind::Ipv6),
    }
}

impl From<Ipv4Addr> for Host {
    fn from(addr: Ipv4Addr) -> Self {
        Self {
            text: addr.to_string(),
            kind: HostKind::Ipv4(addr),
        }
    }
}

impl From<Ipv6Addr> for Host {
    fn from(addr: Ipv6Addr) -> Self {
        Self {
            text: format!("[{addr}]"),
            kind: HostKind::Ipv6(addr),
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("text", &self.text)
            .field("kind", &self.kind)
            .finish()
    }
}

string_traits!(Host);
