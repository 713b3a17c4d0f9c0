//! Delivery: the transport seam and the coordinator driving it.

mod coordinator;
mod mailer;
mod transport;

pub mod errors;

pub use coordinator::{deliver, SmtpAdapter};
pub use errors::{AdapterError, DeliveryError};
pub use mailer::Mailer;
pub use transport::{Receipt, Transport, TransportError};
