//! Transports delivering encoded messages

pub mod log;
pub mod smtp;

use crate::domain::delivery::Transport;

/// Returns the transport registered under `name`, if any
pub fn transport_for(name: &str) -> Option<Box<dyn Transport>> {
    match name {
        "smtp" => Some(Box::new(smtp::SMTPTransport::new())),
        "log" => Some(Box::new(log::LogTransport::new())),
        _ => None,
    }
}
