//! Credential primitives used by core services.

pub mod password;
