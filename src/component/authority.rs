use super::{check, Host, Password, Username};
use crate::{
    error::{IllegalUriPart, PartErrorKind, UriPart},
    pct_enc::table,
};
use core::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A [port] subcomponent of authority, between 1 and 65535.
///
/// Leading zeros are accepted and kept until normalisation, so
/// `"080"` and `"80"` are different ports with the same [value](Self::value).
///
/// [port]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.3
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Port {
    value: u16,
    leading_zeros: usize,
}

impl Port {
    /// Parses a port.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text is empty, contains anything but digits
    /// (including a `'+'` sign), or is not between 1 and 65535.
    pub fn parse(s: &str) -> Result<Self, IllegalUriPart> {
        let err = |kind| IllegalUriPart::new(UriPart::Port, s, kind);
        if s.is_empty() {
            return Err(err(PartErrorKind::Empty));
        }
        if let Some(index) = s.bytes().position(|x| !table::PORT.allows_ascii(x)) {
            return Err(err(PartErrorKind::UnexpectedChar { index }));
        }

        let digits = s.trim_start_matches('0');
        let value = if digits.len() > 5 {
            None
        } else {
            digits.parse::<u16>().ok()
        };
        match value {
            Some(value) if value != 0 => Ok(Self {
                value,
                leading_zeros: s.len() - digits.len(),
            }),
            _ => Err(err(PartErrorKind::PortOutOfRange)),
        }
    }

    /// Creates a port from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value is zero.
    pub fn of(value: u16) -> Result<Self, IllegalUriPart> {
        Self::from_value(value).ok_or_else(|| {
            IllegalUriPart::new(UriPart::Port, "0", PartErrorKind::PortOutOfRange)
        })
    }

    pub(crate) const fn from_value(value: u16) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self {
                value,
                leading_zeros: 0,
            })
        }
    }

    /// Returns the numeric value of the port.
    #[must_use]
    pub fn value(self) -> u16 {
        self.value
    }

    /// Checks whether the port has no leading zeros.
    #[must_use]
    pub fn is_normal_form(self) -> bool {
        self.leading_zeros == 0
    }

    /// Strips the leading zeros of the port.
    #[must_use]
    pub fn normalise(self) -> Self {
        Self {
            value: self.value,
            leading_zeros: 0,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.leading_zeros {
            f.write_str("0")?;
        }
        write!(f, "{}", self.value)
    }
}

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Port({self})")
    }
}

impl FromStr for Port {
    type Err = IllegalUriPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A [userinfo] subcomponent of authority.
///
/// The user name ends at the first `':'`; everything after it is the password.
///
/// [userinfo]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.1
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct UserInfo {
    username: Username,
    password: Option<Password>,
}

impl UserInfo {
    /// Parses a userinfo subcomponent.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text is not valid userinfo.
    pub fn parse(s: &str) -> Result<Self, IllegalUriPart> {
        check(s, table::USERINFO, UriPart::UserInfo)?;
        Ok(match s.split_once(':') {
            Some((username, password)) => Self {
                username: Username::from_string_unchecked(username.to_owned()),
                password: Some(Password::from_string_unchecked(password.to_owned())),
            },
            None => Self {
                username: Username::from_string_unchecked(s.to_owned()),
                password: None,
            },
        })
    }

    /// Creates a userinfo subcomponent from its parts.
    #[must_use]
    pub fn new(username: Username, password: Option<Password>) -> Self {
        Self { username, password }
    }

    /// Returns the user name.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&Password> {
        self.password.as_ref()
    }

    /// Checks whether both parts are in normal form.
    #[must_use]
    pub fn is_normal_form(&self) -> bool {
        self.username.is_normal_form()
            && self.password.as_ref().map_or(true, Password::is_normal_form)
    }

    /// Normalises the percent-encoding of both parts.
    #[must_use]
    pub fn normalise(&self) -> Self {
        Self {
            username: self.username.normalise(),
            password: self.password.as_ref().map(Password::normalise),
        }
    }
}

impl fmt::Display for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.username.as_str())?;
        if let Some(password) = &self.password {
            write!(f, ":{password}")?;
        }
        Ok(())
    }
}

impl FromStr for UserInfo {
    type Err = IllegalUriPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An [authority] component.
///
/// The port of an authority is in one of three states, all of which survive
/// parsing and formatting: absent (`example.com`), empty (`example.com:`),
/// or present with a value (`example.com:80`).
///
/// [authority]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2
///
/// # Examples
///
/// ```
/// use typed_uri::component::Authority;
///
/// let auth = Authority::parse("example.com")?;
/// assert_eq!(auth.port(), None);
/// assert_eq!(auth.maybe_port(), None);
///
/// let auth = Authority::parse("example.com:")?;
/// assert_eq!(auth.port(), None);
/// assert_eq!(auth.maybe_port(), Some(None));
/// assert_eq!(auth.to_string(), "example.com:");
///
/// let auth = Authority::parse("user@example.com:80")?;
/// assert_eq!(auth.port().unwrap().value(), 80);
/// assert_eq!(auth.user_info().unwrap().username(), "user");
/// assert!(auth.host_and_port().is_none());
/// # Ok::<_, typed_uri::error::IllegalUriPart>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Authority {
    user_info: Option<UserInfo>,
    host: Host,
    port: Option<Option<Port>>,
}

impl Authority {
    /// Parses an authority component.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any subcomponent is not valid; the error of the
    /// subcomponent is available as the [cause](IllegalUriPart::cause).
    pub fn parse(s: &str) -> Result<Self, IllegalUriPart> {
        let wrap = |e| IllegalUriPart::wrap(UriPart::Authority, s, e);

        let (user_info, host_port, offset) = match s.split_once('@') {
            Some((user_info, rest)) => (
                Some(UserInfo::parse(user_info).map_err(wrap)?),
                rest,
                user_info.len() + 1,
            ),
            None => (None, s, 0),
        };

        let (host, port) = if host_port.starts_with('[') {
            match host_port.find(']') {
                Some(i) => {
                    let (host, rest) = host_port.split_at(i + 1);
                    match rest.strip_prefix(':') {
                        Some(port) => (host, Some(port)),
                        None if rest.is_empty() => (host, None),
                        None => {
                            return Err(IllegalUriPart::new(
                                UriPart::Authority,
                                s,
                                PartErrorKind::UnexpectedChar {
                                    index: offset + i + 1,
                                },
                            ))
                        }
                    }
                }
                None => (host_port, None),
            }
        } else {
            match host_port.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (host_port, None),
            }
        };

        let host = Host::parse(host).map_err(wrap)?;
        let port = match port {
            None => None,
            Some("") => Some(None),
            Some(port) => Some(Some(Port::parse(port).map_err(wrap)?)),
        };
        Ok(Self {
            user_info,
            host,
            port,
        })
    }

    /// Creates an authority with the given host, no userinfo and no port.
    #[must_use]
    pub fn new(host: Host) -> Self {
        Self {
            user_info: None,
            host,
            port: None,
        }
    }

    /// Sets the userinfo subcomponent.
    #[must_use]
    pub fn with_user_info(mut self, user_info: impl Into<Option<UserInfo>>) -> Self {
        self.user_info = user_info.into();
        self
    }

    /// Sets the port subcomponent, or removes it when given `None`.
    #[must_use]
    pub fn with_port(mut self, port: impl Into<Option<Port>>) -> Self {
        self.port = port.into().map(Some);
        self
    }

    /// Sets an empty port subcomponent, as in `example.com:`.
    #[must_use]
    pub fn with_empty_port(mut self) -> Self {
        self.port = Some(None);
        self
    }

    pub(crate) fn from_parts(
        user_info: Option<UserInfo>,
        host: Host,
        port: Option<Option<Port>>,
    ) -> Self {
        Self {
            user_info,
            host,
            port,
        }
    }

    /// Returns the userinfo subcomponent.
    #[must_use]
    pub fn user_info(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }

    /// Returns the host subcomponent.
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the port, if present and not empty.
    #[must_use]
    pub fn port(&self) -> Option<Port> {
        self.port.flatten()
    }

    /// Returns the port in its three states: `None` when absent,
    /// `Some(None)` when empty and `Some(Some(_))` when present with a value.
    #[must_use]
    pub fn maybe_port(&self) -> Option<Option<Port>> {
        self.port
    }

    /// Checks whether the authority has neither userinfo nor an empty port.
    #[must_use]
    pub fn is_host_and_port(&self) -> bool {
        self.user_info.is_none() && self.port != Some(None)
    }

    /// Returns the authority as a [`HostAndPort`] if it
    /// [is one](Self::is_host_and_port).
    #[must_use]
    pub fn host_and_port(&self) -> Option<HostAndPort> {
        self.is_host_and_port().then(|| HostAndPort {
            host: self.host.clone(),
            port: self.port(),
        })
    }

    /// Checks whether the authority is in normal form, ignoring default ports.
    #[must_use]
    pub fn is_normal_form(&self) -> bool {
        self.user_info.as_ref().map_or(true, UserInfo::is_normal_form)
            && self.host.is_normal_form()
            && match self.port {
                None => true,
                Some(None) => false,
                Some(Some(port)) => port.is_normal_form(),
            }
    }

    /// Normalises the authority.
    ///
    /// Every subcomponent is normalised and an empty port is removed.
    /// Default ports are only removed when normalising a whole URI reference.
    #[must_use]
    pub fn normalise(&self) -> Self {
        self.normalise_with_default(None)
    }

    pub(crate) fn normalise_with_default(&self, default_port: Option<Port>) -> Self {
        let port = match self.port {
            Some(Some(port)) if Some(port.value()) != default_port.map(Port::value) => {
                Some(Some(port.normalise()))
            }
            _ => None,
        };
        Self {
            user_info: self.user_info.as_ref().map(UserInfo::normalise),
            host: self.host.normalise(),
            port,
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(user_info) = &self.user_info {
            write!(f, "{user_info}@")?;
        }
        f.write_str(self.host.as_str())?;
        match self.port {
            None => Ok(()),
            Some(None) => f.write_str(":"),
            Some(Some(port)) => write!(f, ":{port}"),
        }
    }
}

impl FromStr for Authority {
    type Err = IllegalUriPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Host> for Authority {
    fn from(host: Host) -> Self {
        Self::new(host)
    }
}

/// An authority with neither userinfo nor an empty port, as found in an
/// [`Origin`](crate::Origin).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostAndPort {
    host: Host,
    port: Option<Port>,
}

impl HostAndPort {
    /// Parses a host with an optional port.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text is not a valid authority, or if it has
    /// userinfo or an empty port.
    pub fn parse(s: &str) -> Result<Self, IllegalUriPart> {
        let auth = Authority::parse(s)?;
        match auth.host_and_port() {
            Some(hp) => Ok(hp),
            None => {
                let index = match auth.user_info {
                    Some(_) => s.find('@').unwrap_or(0),
                    None => s.len() - 1,
                };
                Err(IllegalUriPart::new(
                    UriPart::Authority,
                    s,
                    PartErrorKind::UnexpectedChar { index },
                ))
            }
        }
    }

    /// Creates a host with an optional port.
    #[must_use]
    pub fn new(host: Host, port: Option<Port>) -> Self {
        Self { host, port }
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> Option<Port> {
        self.port
    }

    /// Checks whether the host and the port are in normal form.
    #[must_use]
    pub fn is_normal_form(&self) -> bool {
        self.host.is_normal_form() && self.port.map_or(true, Port::is_normal_form)
    }

    /// Normalises the host and the port.
    #[must_use]
    pub fn normalise(&self) -> Self {
        Self {
            host: self.host.normalise(),
            port: self.port.map(Port::normalise),
        }
    }
}

impl From<HostAndPort> for Authority {
    fn from(hp: HostAndPort) -> Self {
        Self {
            user_info: None,
            host: hp.host,
            port: hp.port.map(Some),
        }
    }
}

impl fmt::Display for HostAndPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host.as_str())?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

impl FromStr for HostAndPort {
    type Err = IllegalUriPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

macro_rules! serde_via_display {
    ($($ty:ty),+) => {
        $(
            #[cfg(feature = "serde")]
            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.collect_str(self)
                }
            }

            #[cfg(feature = "serde")]
            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let s = String::deserialize(deserializer)?;
                    Self::parse(&s).map_err(de::Error::custom)
                }
            }
        )+
    };
}

serde_via_display!(Port, UserInfo, Authority, HostAndPort);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port() {
        assert_eq!(Port::parse("80").unwrap().value(), 80);
        assert_eq!(Port::parse("65535").unwrap().value(), 65535);

        let p = Port::parse("0080").unwrap();
        assert_eq!(p.value(), 80);
        assert_eq!(p.to_string(), "0080");
        assert!(!p.is_normal_form());
        assert_eq!(p.normalise().to_string(), "80");
        assert_ne!(p, p.normalise());

        for (s, kind) in [
            ("", PartErrorKind::Empty),
            ("+80", PartErrorKind::UnexpectedChar { index: 0 }),
            ("8a", PartErrorKind::UnexpectedChar { index: 1 }),
            ("0", PartErrorKind::PortOutOfRange),
            ("000", PartErrorKind::PortOutOfRange),
            ("65536", PartErrorKind::PortOutOfRange),
            ("1000000", PartErrorKind::PortOutOfRange),
        ] {
            let e = Port::parse(s).unwrap_err();
            assert_eq!(e.part(), UriPart::Port);
            assert_eq!(e.kind(), kind, "{s:?}");
        }

        assert!(Port::of(0).is_err());
        assert_eq!(Port::of(443).unwrap(), Port::parse("443").unwrap());
    }

    #[test]
    fn user_info() {
        let ui = UserInfo::parse("user:pa:ss").unwrap();
        assert_eq!(ui.username(), "user");
        assert_eq!(ui.password().unwrap(), "pa:ss");
        assert_eq!(ui.to_string(), "user:pa:ss");

        let ui = UserInfo::parse("user:").unwrap();
        assert_eq!(ui.password().unwrap(), "");
        assert_eq!(ui.to_string(), "user:");

        let ui = UserInfo::parse("%75ser").unwrap();
        assert_eq!(ui.password(), None);
        assert_eq!(ui.normalise().to_string(), "user");

        let e = UserInfo::parse("us er").unwrap_err();
        assert_eq!(e.part(), UriPart::UserInfo);
        assert_eq!(e.kind(), PartErrorKind::UnexpectedChar { index: 2 });
    }

    #[test]
    fn authority() {
        for s in [
            "example.com",
            "example.com:",
            "example.com:8080",
            "user@example.com",
            "user:pass@example.com:",
            "@",
            "",
            "[::1]:80",
            "[::1]:",
            "127.0.0.1:443",
        ] {
            assert_eq!(Authority::parse(s).unwrap().to_string(), s);
        }

        let e = Authority::parse("user@exa mple.com").unwrap_err();
        assert_eq!(e.part(), UriPart::Authority);
        assert_eq!(e.kind(), PartErrorKind::InvalidSubcomponent);
        let cause = e.cause().unwrap();
        assert_eq!(cause.part(), UriPart::Host);
        assert_eq!(cause.input(), "exa mple.com");

        let e = Authority::parse("example.com:http").unwrap_err();
        assert_eq!(e.cause().unwrap().part(), UriPart::Port);

        let e = Authority::parse("a@[::1]x").unwrap_err();
        assert_eq!(e.kind(), PartErrorKind::UnexpectedChar { index: 7 });

        let e = Authority::parse("[::1").unwrap_err();
        assert_eq!(e.cause().unwrap().kind(), PartErrorKind::InvalidIpLiteral);

        let e = Authority::parse("a:1:2").unwrap_err();
        assert_eq!(e.cause().unwrap().input(), "1:2");
        assert_eq!(e.cause().unwrap().kind(), PartErrorKind::UnexpectedChar { index: 1 });
    }

    #[test]
    fn normalise() {
        let auth = Authority::parse("%55ser@EXAMPLE.com:").unwrap();
        assert!(!auth.is_normal_form());
        let n = auth.normalise();
        assert_eq!(n.to_string(), "User@example.com");
        assert!(n.is_normal_form());

        let auth = Authority::parse("example.com:0443").unwrap();
        assert_eq!(auth.normalise().to_string(), "example.com:443");
        let default = Port::from_value(443);
        assert_eq!(auth.normalise_with_default(default).to_string(), "example.com");
    }

    #[test]
    fn host_and_port() {
        let hp = HostAndPort::parse("example.com:80").unwrap();
        assert_eq!(hp.port().unwrap().value(), 80);
        assert_eq!(Authority::from(hp.clone()), Authority::parse("example.com:80").unwrap());
        assert_eq!(Authority::parse("example.com:80").unwrap().host_and_port(), Some(hp));

        let e = HostAndPort::parse("u@example.com").unwrap_err();
        assert_eq!(e.kind(), PartErrorKind::UnexpectedChar { index: 1 });
        let e = HostAndPort::parse("example.com:").unwrap_err();
        assert_eq!(e.kind(), PartErrorKind::UnexpectedChar { index: 11 });
    }
}
