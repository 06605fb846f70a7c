//! # Gateway Sample Library
//!
//! An in-process host for the gateway framework: actor-backed stores, TOML
//! configuration and lifecycle management. Exposed as a library for integration
//! testing.

pub mod config;
pub mod lifecycle;
pub mod store;
