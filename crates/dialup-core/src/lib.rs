//! dialup-core: Core traits, types, and error definitions for dialup.
//!
//! This crate defines the two narrow capabilities the modem engine
//! consumes -- a byte [`Transport`] and a [`Dialer`] -- together with the
//! shared [`Error`]/[`Result`] types. The engine in `dialup-modem` depends
//! only on these abstractions, so it can run against a real serial port,
//! a pseudo-terminal, or the scripted mock in `dialup-test-harness`
//! without change.

pub mod dialer;
pub mod error;
pub mod transport;

// Re-export key types at crate root for ergonomic `use dialup_core::*`.
pub use dialer::Dialer;
pub use error::{Error, Result};
pub use transport::Transport;
