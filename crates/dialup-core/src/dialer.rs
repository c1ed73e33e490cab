//! Dialer trait -- the capability that turns a `D` command into a call.
//!
//! The modem engine extracts the raw dial string from an `ATD` command
//! line and hands it to a [`Dialer`]. What happens next is entirely the
//! backend's business: log it, POST it to a telephony provider, route it
//! through a PBX. The engine only cares whether the dial succeeded.
//!
//! Backends live in `dialup-dialer`; tests use the recording
//! `MockDialer` from `dialup-test-harness`.

use async_trait::async_trait;

use crate::error::Result;

/// A dialing backend.
///
/// `number` is the raw digit/`*`/`#` string extracted from the `D`
/// command (whitespace stripped, optional leading `+` preserved). It has
/// *not* been normalized; wrap a backend in
/// `dialup_dialer::E164Dialer` when the backend requires E.164 input.
///
/// A dial is modeled as a single synchronous exchange: the engine awaits
/// the call here and stalls for its duration. Retry policy, timeouts,
/// and rate limiting all belong to the backend, not the engine.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Place a call to `number`.
    ///
    /// Any error surfaces as the `ERROR` result code for the command
    /// line that contained the dial; it is never fatal to the engine.
    async fn dial(&self, number: &str) -> Result<()>;
}

#[async_trait]
impl Dialer for Box<dyn Dialer> {
    async fn dial(&self, number: &str) -> Result<()> {
        (**self).dial(number).await
    }
}
