//! Host-provided models: configuration and session context.

pub mod config;
pub mod session;
