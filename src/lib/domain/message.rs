//! Email model and MIME encoding.

mod address;
mod builder;
mod email;

pub use address::{Address, AddressParseError};
pub use builder::{build, EncodedMessage};
pub use email::{Attachment, EmailMessage};
