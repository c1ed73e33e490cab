//! Scripted mock transport for deterministic engine tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

use dialup_core::error::{Error, Result};
use dialup_core::transport::Transport;

/// A mock [`Transport`] backed by an input queue and an output log.
///
/// Reads never block, regardless of the timeout mode the engine sets:
/// when the queue is empty, `read` returns an empty vector so that tests
/// can drive the engine tick by tick. The last timeout mode set by the
/// engine is recorded and can be asserted on.
#[derive(Debug, Default)]
pub struct MockTransport {
    input: VecDeque<u8>,
    output: Vec<u8>,
    timeout: Option<Duration>,
    fail_next_read: bool,
}

impl MockTransport {
    /// Create an empty mock transport (blocking mode, like a freshly
    /// opened port).
    pub fn new() -> Self {
        MockTransport::default()
    }

    /// Queue bytes for the modem to read.
    pub fn queue(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    /// Queue a command line: the text followed by CR.
    pub fn queue_line(&mut self, text: &str) {
        self.queue(text.as_bytes());
        self.queue(b"\r");
    }

    /// Everything the modem has written so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Take and clear the output log.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// The timeout mode most recently set by the engine.
    pub fn current_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Make the next `read` fail with a transport error.
    pub fn fail_next_read(&mut self) {
        self.fail_next_read = true;
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn read(&mut self, max_len: usize) -> Result<Vec<u8>> {
        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(Error::Transport("mock read failure".into()));
        }
        let n = max_len.min(self.input.len());
        Ok(self.input.drain(..n).collect())
    }

    fn bytes_available(&self) -> Result<usize> {
        Ok(self.input.len())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.output.extend_from_slice(data);
        Ok(())
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }
}
