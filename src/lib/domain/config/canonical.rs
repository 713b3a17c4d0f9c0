//! Canonical, fully resolved configuration

use std::fmt;

/// When to upgrade the connection with STARTTLS
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Upgrade when the server offers it
    #[default]
    IfAvailable,

    /// Refuse to send over a plain connection
    Always,

    /// Never upgrade
    Never,
}

impl TlsMode {
    /// Parses the configuration spelling of a TLS mode
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "if_available" => Some(Self::IfAvailable),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

/// When to authenticate against the relay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Authenticate when credentials are configured
    #[default]
    IfAvailable,

    /// Fail unless credentials are configured
    Always,
}

impl AuthMode {
    /// Parses the configuration spelling of an authentication mode
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "if_available" => Some(Self::IfAvailable),
            "always" => Some(Self::Always),
            _ => None,
        }
    }
}

/// A TLS protocol version the transport may negotiate
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    /// TLS 1.0
    Tlsv1,

    /// TLS 1.1
    Tlsv1_1,

    /// TLS 1.2
    Tlsv1_2,
}

impl TlsVersion {
    /// Parses `tlsv1`, `tlsv1.1` or `tlsv1.2`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tlsv1" => Some(Self::Tlsv1),
            "tlsv1.1" => Some(Self::Tlsv1_1),
            "tlsv1.2" => Some(Self::Tlsv1_2),
            _ => None,
        }
    }

    /// The configuration spelling of the version
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tlsv1 => "tlsv1",
            Self::Tlsv1_1 => "tlsv1.1",
            Self::Tlsv1_2 => "tlsv1.2",
        }
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transport name used when none is configured
pub const DEFAULT_TRANSPORT: &str = "smtp";

/// Retries used when none are configured
pub const DEFAULT_RETRIES: u32 = 1;

/// Configuration handed to a [`Transport`](crate::domain::delivery::Transport).
///
/// `server` and `port` are always present. Keys with a default always carry
/// a value; the others are `None` when they were never supplied.
#[derive(Clone, PartialEq, Eq)]
pub struct CanonicalConfig {
    /// Relay host
    pub server: String,

    /// Relay port
    pub port: u16,

    /// Name announced in EHLO
    pub hostname: Option<String>,

    /// Authentication user
    pub username: Option<String>,

    /// Authentication password
    pub password: Option<String>,

    /// STARTTLS policy
    pub tls: TlsMode,

    /// TLS versions the transport may negotiate
    pub allowed_tls_versions: Option<Vec<TlsVersion>>,

    /// Implicit TLS
    pub ssl: bool,

    /// Extra attempts on transient failures
    pub retries: u32,

    /// Skip MX resolution of the relay
    pub no_mx_lookups: Option<bool>,

    /// Authentication policy
    pub auth: AuthMode,

    /// Name of the transport performing the delivery
    pub transport: String,
}

impl CanonicalConfig {
    /// Creates a configuration for `server:port` with every default applied
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
            hostname: None,
            username: None,
            password: None,
            tls: TlsMode::default(),
            allowed_tls_versions: None,
            ssl: false,
            retries: DEFAULT_RETRIES,
            no_mx_lookups: None,
            auth: AuthMode::default(),
            transport: DEFAULT_TRANSPORT.to_string(),
        }
    }

    /// Both a username and a password are configured
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

impl fmt::Debug for CanonicalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanonicalConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("tls", &self.tls)
            .field("allowed_tls_versions", &self.allowed_tls_versions)
            .field("ssl", &self.ssl)
            .field("retries", &self.retries)
            .field("no_mx_lookups", &self.no_mx_lookups)
            .field("auth", &self.auth)
            .field("transport", &self.transport)
            .finish()
    }
}
