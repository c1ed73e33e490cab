//! Recording mock dialer.

use async_trait::async_trait;
use std::sync::Mutex;

use dialup_core::error::{Error, Result};
use dialup_core::Dialer;

/// A [`Dialer`] that records every number and can be scripted to fail.
#[derive(Debug, Default)]
pub struct MockDialer {
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
}

impl MockDialer {
    pub fn new() -> Self {
        MockDialer::default()
    }

    /// Make every subsequent dial fail with the given message.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Numbers dialed so far, in order (attempted dials included).
    pub fn dialed(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dialer for MockDialer {
    async fn dial(&self, number: &str) -> Result<()> {
        self.calls.lock().unwrap().push(number.to_string());
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(Error::Dial(message.clone())),
            None => Ok(()),
        }
    }
}
