//! Configuration module.
//!
//! A [`RawConfig`] is what the caller supplies: loosely typed values, some of
//! them deferring to environment variables. [`resolve`] turns it into a
//! strongly typed [`CanonicalConfig`] on every delivery.

mod canonical;
mod keys;
mod raw;
mod resolver;

pub mod errors;

pub use canonical::{AuthMode, CanonicalConfig, TlsMode, TlsVersion};
pub use errors::ConfigurationError;
pub use keys::{ConfigKey, UnknownKey};
pub use raw::{ConfigValue, RawConfig, Value};
pub use resolver::resolve;
