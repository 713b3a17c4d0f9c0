#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! SMTP adapter library
//!
//! Turns an [`EmailMessage`](domain::message::EmailMessage) and a
//! [`RawConfig`](domain::config::RawConfig) into a canonical transport
//! configuration and a MIME encoded message, then hands both to a
//! [`Transport`](domain::delivery::Transport).

pub mod domain;
pub mod infrastructure;
