//! Domain layer: configuration resolution, message building and delivery

pub mod config;
pub mod delivery;
pub mod message;
