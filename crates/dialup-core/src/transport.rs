//! Transport trait for the serial side of the emulator.
//!
//! The [`Transport`] trait abstracts over the byte-oriented link to the
//! legacy software that believes it is talking to a modem. An
//! implementation exists for physical/virtual serial ports
//! (`dialup-transport`) and for deterministic testing
//! (`MockTransport` in `dialup-test-harness`).
//!
//! Unlike a request/response device link, a modem line has no framing at
//! this layer: bytes may arrive at any time relative to output, so reads
//! are governed by a *mode* rather than a per-call deadline. The engine
//! switches the mode when it changes state -- blocking while it waits for
//! command lines, polling while it watches an online data stream for the
//! escape sequence.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to the terminal side.
///
/// Reads honor the current timeout mode set via
/// [`set_timeout`](Transport::set_timeout):
///
/// | mode                   | `read` behavior                          |
/// |------------------------|------------------------------------------|
/// | `None`                 | wait until at least one byte arrives     |
/// | `Some(Duration::ZERO)` | return only already-buffered bytes       |
/// | `Some(d)`              | wait at most `d` for the first byte      |
///
/// In the non-blocking modes `read` returns an empty vector when no data
/// is available; an empty result is not an error.
#[async_trait]
pub trait Transport: Send {
    /// Read up to `max_len` bytes, honoring the current timeout mode.
    async fn read(&mut self, max_len: usize) -> Result<Vec<u8>>;

    /// Number of bytes already buffered and readable without waiting.
    fn bytes_available(&self) -> Result<usize>;

    /// Write all of `data` to the line.
    ///
    /// Implementations should not return until the bytes have been handed
    /// to the underlying transport (serial TX buffer, test log, etc.).
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Set the read timeout mode. `None` blocks; `Some(Duration::ZERO)`
    /// polls. The mode persists until changed again.
    fn set_timeout(&mut self, timeout: Option<Duration>);
}
