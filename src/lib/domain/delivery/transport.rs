//! Transport module

#[cfg(test)]
use mockall::mock;
use thiserror::Error;

use crate::domain::config::CanonicalConfig;

/// What a transport reports back after a successful delivery
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// The final server reply, or whatever the transport has to say
    pub response: String,
}

impl Receipt {
    /// Creates a receipt
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// Transport failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The relay requires authentication and no credentials are configured
    #[error("no credentials configured")]
    NoCredentials,

    /// The delivery failed
    #[error("{reason}: {detail}")]
    Rejected {
        /// Failure class, such as `permanent_failure`
        reason: String,

        /// Transport specific detail
        detail: String,
    },
}

impl TransportError {
    /// Creates a [`TransportError::Rejected`]
    pub fn rejected(reason: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
            detail: detail.into(),
        }
    }
}

/// Sends encoded messages over the network.
///
/// Implementations own connection handling, TLS, authentication and
/// retries; the call blocks until the delivery succeeded or failed for good.
pub trait Transport: Send + Sync + 'static {
    /// Sends `body` from `from` to every address in `to`
    ///
    /// # Arguments
    /// * `from` - The envelope sender.
    /// * `to` - The envelope recipients.
    /// * `body` - The encoded message.
    /// * `config` - The resolved adapter configuration.
    fn send(
        &self,
        from: &str,
        to: &[String],
        body: &[u8],
        config: &CanonicalConfig,
    ) -> Result<Receipt, TransportError>;

    /// Name of the transport, as used by the `transport` configuration key
    fn name(&self) -> &'static str;
}

impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    fn send(
        &self,
        from: &str,
        to: &[String],
        body: &[u8],
        config: &CanonicalConfig,
    ) -> Result<Receipt, TransportError> {
        (**self).send(from, to, body, config)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mock! {
    pub Transport {}

    impl Transport for Transport {
        fn send(
            &self,
            from: &str,
            to: &[String],
            body: &[u8],
            config: &CanonicalConfig,
        ) -> Result<Receipt, TransportError>;
        fn name(&self) -> &'static str;
    }
}
