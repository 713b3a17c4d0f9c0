//! SMTP transport implementation

use lettre::{
    address::Envelope,
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters, TlsVersion as ProtocolVersion},
        extension::ClientId,
        response::Response,
        Error as SmtpError,
    },
    Address, SmtpTransport, Transport as _,
};
use tracing::{debug, warn};

use crate::domain::{
    config::{AuthMode, CanonicalConfig, TlsMode, TlsVersion},
    delivery::{Receipt, Transport, TransportError},
};

/// Sends messages to an SMTP relay with lettre's blocking client
#[derive(Debug, Default, Clone)]
pub struct SMTPTransport;

impl SMTPTransport {
    /// Create a new SMTP transport
    pub fn new() -> Self {
        Self
    }

    /// Builds a lettre transport for `config`
    pub fn mailer(&self, config: &CanonicalConfig) -> Result<SmtpTransport, TransportError> {
        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                Some(Credentials::new(username.clone(), password.clone()))
            }
            _ if config.auth == AuthMode::Always => return Err(TransportError::NoCredentials),
            _ => None,
        };

        let tls = if config.ssl {
            Tls::Wrapper(tls_parameters(config)?)
        } else {
            match config.tls {
                TlsMode::Always => Tls::Required(tls_parameters(config)?),
                TlsMode::IfAvailable => Tls::Opportunistic(tls_parameters(config)?),
                TlsMode::Never => Tls::None,
            }
        };

        let mut builder = SmtpTransport::builder_dangerous(&config.server)
            .port(config.port)
            .tls(tls);

        if let Some(hostname) = &config.hostname {
            builder = builder.hello_name(ClientId::Domain(hostname.clone()));
        }

        if let Some(credentials) = credentials {
            builder = builder.credentials(credentials);
        }

        Ok(builder.build())
    }
}

impl Transport for SMTPTransport {
    fn send(
        &self,
        from: &str,
        to: &[String],
        body: &[u8],
        config: &CanonicalConfig,
    ) -> Result<Receipt, TransportError> {
        if config.transport != self.name() {
            return Err(TransportError::rejected(
                "unsupported_transport",
                format!("transport {:?} is not handled by the SMTP transport", config.transport),
            ));
        }

        let envelope = envelope(from, to)?;
        let mailer = self.mailer(config)?;

        let mut attempt = 0;

        loop {
            match mailer.send_raw(&envelope, body) {
                Ok(response) => return Ok(receipt(&response)),
                Err(err) if attempt < config.retries && is_retryable(&err) => {
                    attempt += 1;

                    warn!(
                        "delivery to {} failed, retrying ({}/{}): {}",
                        config.server, attempt, config.retries, err
                    );
                }
                Err(err) => return Err(rejection(&err)),
            }
        }
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

fn tls_parameters(config: &CanonicalConfig) -> Result<TlsParameters, TransportError> {
    let mut builder = TlsParameters::builder(config.server.clone());

    if let Some(version) = min_tls_version(config) {
        debug!("negotiating TLS {:?} or newer with {}", version, config.server);

        builder = builder.set_min_tls_version(version);
    }

    builder
        .build()
        .map_err(|err| TransportError::rejected("tls_failure", err.to_string()))
}

/// The oldest allowed version becomes the handshake's minimum; without a list
/// the backend keeps its own minimum
fn min_tls_version(config: &CanonicalConfig) -> Option<ProtocolVersion> {
    let lowest = config.allowed_tls_versions.as_ref()?.iter().min()?;

    Some(match lowest {
        TlsVersion::Tlsv1 => ProtocolVersion::Tlsv10,
        TlsVersion::Tlsv1_1 => ProtocolVersion::Tlsv11,
        TlsVersion::Tlsv1_2 => ProtocolVersion::Tlsv12,
    })
}

fn envelope(from: &str, to: &[String]) -> Result<Envelope, TransportError> {
    let from = parse_address(from)?;
    let to = to
        .iter()
        .map(|address| parse_address(address))
        .collect::<Result<Vec<_>, _>>()?;

    Envelope::new(Some(from), to)
        .map_err(|err| TransportError::rejected("invalid_address", err.to_string()))
}

fn parse_address(address: &str) -> Result<Address, TransportError> {
    address.parse().map_err(|err| {
        TransportError::rejected("invalid_address", format!("{}: {}", address, err))
    })
}

fn is_retryable(err: &SmtpError) -> bool {
    err.is_transient() || err.is_timeout()
}

fn rejection(err: &SmtpError) -> TransportError {
    let reason = if err.is_permanent() {
        "permanent_failure"
    } else if err.is_transient() {
        "temporary_failure"
    } else if err.is_tls() {
        "tls_failure"
    } else if err.is_timeout() {
        "timeout"
    } else {
        "network_failure"
    };

    TransportError::rejected(reason, err.to_string())
}

fn receipt(response: &Response) -> Receipt {
    Receipt::new(format!(
        "{} {}",
        response.code(),
        response.message().collect::<Vec<_>>().join(" ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CanonicalConfig {
        CanonicalConfig::new("127.0.0.1", 2525)
    }

    #[test]
    fn test_auth_always_without_credentials() {
        let mut config = config();
        config.auth = AuthMode::Always;
        config.username = Some("user".to_string());

        let result = SMTPTransport::new().mailer(&config);

        assert!(matches!(result, Err(TransportError::NoCredentials)));
    }

    #[test]
    fn test_auth_always_with_credentials() {
        let mut config = config();
        config.auth = AuthMode::Always;
        config.tls = TlsMode::Never;
        config.username = Some("user".to_string());
        config.password = Some("secret".to_string());

        assert!(SMTPTransport::new().mailer(&config).is_ok());
    }

    #[test]
    fn test_min_tls_version_is_the_oldest_allowed() {
        let mut config = config();

        assert!(min_tls_version(&config).is_none());

        config.allowed_tls_versions = Some(vec![TlsVersion::Tlsv1_2, TlsVersion::Tlsv1_1]);
        assert!(matches!(
            min_tls_version(&config),
            Some(ProtocolVersion::Tlsv11)
        ));

        config.allowed_tls_versions = Some(vec![TlsVersion::Tlsv1, TlsVersion::Tlsv1_1]);
        assert!(matches!(
            min_tls_version(&config),
            Some(ProtocolVersion::Tlsv10)
        ));

        config.allowed_tls_versions = Some(Vec::new());
        assert!(min_tls_version(&config).is_none());
    }

    #[test]
    fn test_mailer_with_allowed_tls_versions() {
        let mut config = config();
        config.tls = TlsMode::Always;
        config.allowed_tls_versions = Some(vec![TlsVersion::Tlsv1, TlsVersion::Tlsv1_1]);

        assert!(SMTPTransport::new().mailer(&config).is_ok());

        config.ssl = true;
        assert!(SMTPTransport::new().mailer(&config).is_ok());
    }

    #[test]
    fn test_send_refuses_foreign_transport() {
        let mut config = config();
        config.transport = "log".to_string();

        let result = SMTPTransport::new().send("a@x.com", &["b@x.com".to_string()], b"", &config);

        assert!(matches!(
            result,
            Err(TransportError::Rejected { reason, .. }) if reason == "unsupported_transport"
        ));
    }

    #[test]
    fn test_send_rejects_invalid_envelope() {
        let result = SMTPTransport::new().send("not an address", &[], b"", &config());

        assert!(matches!(
            result,
            Err(TransportError::Rejected { reason, .. }) if reason == "invalid_address"
        ));
    }

    #[test]
    fn test_send_without_credentials_fails_before_connecting() {
        let mut config = config();
        config.auth = AuthMode::Always;

        let result =
            SMTPTransport::new().send("a@x.com", &["b@x.com".to_string()], b"body", &config);

        assert_eq!(result, Err(TransportError::NoCredentials));
    }
}
