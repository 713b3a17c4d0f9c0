//! Delivery errors

use thiserror::Error;
use tracing::debug;

use crate::domain::config::ConfigurationError;

use super::TransportError;

/// The transport could not deliver the message
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// Authentication is required but no username and password are configured
    #[error("authentication required but no credentials are configured")]
    MissingCredentials,

    /// The transport gave up on the message
    #[error("transport rejected the message ({reason}): {detail}")]
    TransportRejected {
        /// Failure class reported by the transport
        reason: String,

        /// Detail reported by the transport
        detail: String,
    },
}

impl From<TransportError> for DeliveryError {
    fn from(err: TransportError) -> Self {
        debug!("TransportError -> DeliveryError");

        match err {
            TransportError::NoCredentials => DeliveryError::MissingCredentials,
            TransportError::Rejected { reason, detail } => {
                DeliveryError::TransportRejected { reason, detail }
            }
        }
    }
}

/// Everything a delivery can fail with
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The configuration is missing required keys
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The transport failed
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_credentials_maps_to_missing_credentials() {
        assert_eq!(
            DeliveryError::from(TransportError::NoCredentials),
            DeliveryError::MissingCredentials
        );
    }

    #[test]
    fn test_rejection_keeps_reason_and_detail() {
        let err = DeliveryError::from(TransportError::rejected(
            "permanent_failure",
            "550 mailbox unavailable",
        ));

        assert_eq!(
            err,
            DeliveryError::TransportRejected {
                reason: "permanent_failure".to_string(),
                detail: "550 mailbox unavailable".to_string(),
            }
        );
    }
}
