//! Recognized configuration keys

use std::{fmt, str::FromStr};

/// A configuration key understood by the adapter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    /// Relay host
    Server,
    /// Name announced in EHLO
    Hostname,
    /// Relay port
    Port,
    /// Authentication user
    Username,
    /// Authentication password
    Password,
    /// STARTTLS policy
    Tls,
    /// TLS protocol versions the transport may negotiate
    AllowedTlsVersions,
    /// Implicit TLS from the first byte
    Ssl,
    /// Extra attempts on transient failures
    Retries,
    /// Skip MX resolution of the relay
    NoMxLookups,
    /// Authentication policy
    Auth,
    /// Name of the transport that performs the delivery
    Transport,
}

impl ConfigKey {
    /// Every key, in enumeration order
    pub const ALL: [ConfigKey; 12] = [
        ConfigKey::Server,
        ConfigKey::Hostname,
        ConfigKey::Port,
        ConfigKey::Username,
        ConfigKey::Password,
        ConfigKey::Tls,
        ConfigKey::AllowedTlsVersions,
        ConfigKey::Ssl,
        ConfigKey::Retries,
        ConfigKey::NoMxLookups,
        ConfigKey::Auth,
        ConfigKey::Transport,
    ];

    /// Keys without a default; a delivery cannot happen without them
    pub const REQUIRED: [ConfigKey; 2] = [ConfigKey::Server, ConfigKey::Port];

    /// The key as it is spelled in a raw configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Hostname => "hostname",
            Self::Port => "port",
            Self::Username => "username",
            Self::Password => "password",
            Self::Tls => "tls",
            Self::AllowedTlsVersions => "allowed_tls_versions",
            Self::Ssl => "ssl",
            Self::Retries => "retries",
            Self::NoMxLookups => "no_mx_lookups",
            Self::Auth => "auth",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The text does not name a recognized key
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownKey;

impl FromStr for ConfigKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or(UnknownKey)
    }
}
