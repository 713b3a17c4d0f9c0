//! Delivery coordinator

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    config::{resolve, ConfigurationError, RawConfig},
    message::{build, EmailMessage},
};

use super::{AdapterError, DeliveryError, Receipt, Transport};

/// Delivers `email` through `transport` using `raw` configuration.
///
/// The configuration is resolved, the message encoded and handed to the
/// transport in a single blocking call. Nothing is retried here.
///
/// # Returns
/// - [`Ok`] with the transport's [`Receipt`].
/// - [`Err`] with [`AdapterError::Configuration`] when required keys are
///   missing, or [`AdapterError::Delivery`] when the transport failed.
pub fn deliver<T>(
    transport: &T,
    email: &EmailMessage,
    raw: &RawConfig,
) -> Result<Receipt, AdapterError>
where
    T: Transport + ?Sized,
{
    let config = resolve(raw)?;
    let message = build(email);

    debug!(
        "sending message from {} to {} recipient(s) through {}",
        message.envelope_from,
        message.envelope_to.len(),
        transport.name()
    );

    match transport.send(
        &message.envelope_from,
        &message.envelope_to,
        &message.body,
        &config,
    ) {
        Ok(receipt) => {
            info!("message from {} delivered", message.envelope_from);

            Ok(receipt)
        }
        Err(err) => {
            warn!("delivery through {} failed: {}", transport.name(), err);

            Err(DeliveryError::from(err).into())
        }
    }
}

/// SMTP adapter: a configuration bound to a transport
#[derive(Debug)]
pub struct SmtpAdapter<T> {
    config: Arc<RawConfig>,
    transport: Arc<T>,
}

impl<T> Clone for SmtpAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: self.transport.clone(),
        }
    }
}

impl<T> SmtpAdapter<T>
where
    T: Transport,
{
    /// Creates an adapter, checking that the required keys are present.
    ///
    /// Environment references are not read here; they are resolved on every
    /// delivery.
    pub fn new(config: RawConfig, transport: T) -> Result<Self, ConfigurationError> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }

    /// Delivers `email`, blocking until the transport is done
    pub fn deliver(&self, email: &EmailMessage) -> Result<Receipt, AdapterError> {
        deliver(self.transport.as_ref(), email, &self.config)
    }

    /// Attachments are encoded as `application/octet-stream` parts
    pub fn supports_attachments(&self) -> bool {
        true
    }

    /// The raw configuration
    pub fn config(&self) -> &RawConfig {
        &self.config
    }

    /// The transport
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
