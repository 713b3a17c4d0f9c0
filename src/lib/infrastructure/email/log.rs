//! Logging transport
//!
//! Nothing leaves the process: every message is logged and kept in memory,
//! which is handy for development setups and tests.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::domain::{
    config::CanonicalConfig,
    delivery::{Receipt, Transport, TransportError},
};

/// A message accepted by the [`LogTransport`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    /// Envelope sender
    pub from: String,

    /// Envelope recipients
    pub to: Vec<String>,

    /// Encoded message
    pub body: Vec<u8>,
}

/// Transport that logs messages instead of sending them
#[derive(Debug, Default, Clone)]
pub struct LogTransport {
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl LogTransport {
    /// Create a new logging transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages accepted so far, oldest first
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Transport for LogTransport {
    fn send(
        &self,
        from: &str,
        to: &[String],
        body: &[u8],
        config: &CanonicalConfig,
    ) -> Result<Receipt, TransportError> {
        info!(
            "would send {} bytes from {} to {} via {}:{}",
            body.len(),
            from,
            to.join(", "),
            config.server,
            config.port
        );

        let mut sent = self
            .sent
            .lock()
            .map_err(|err| TransportError::rejected("internal_error", err.to_string()))?;

        sent.push(SentMessage {
            from: from.to_string(),
            to: to.to_vec(),
            body: body.to_vec(),
        });

        Ok(Receipt::new(format!("logged message {}", sent.len())))
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
