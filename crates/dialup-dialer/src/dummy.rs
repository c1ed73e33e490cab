//! Dialer that dials nothing.

use async_trait::async_trait;
use tracing::info;

use dialup_core::{Dialer, Result};

/// A [`Dialer`] that logs the number and reports success. Useful for
/// bench-testing a terminal against the emulator without a switchboard
/// account.
#[derive(Debug, Default)]
pub struct DummyDialer;

impl DummyDialer {
    pub fn new() -> Self {
        DummyDialer
    }
}

#[async_trait]
impl Dialer for DummyDialer {
    async fn dial(&self, number: &str) -> Result<()> {
        info!(number = %number, "dummy dialer: pretending to dial");
        Ok(())
    }
}
