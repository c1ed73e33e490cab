//! E.164 normalization wrapper around another dialer.

use async_trait::async_trait;
use tracing::debug;

use dialup_core::{Dialer, Error, Result};

use crate::e164::to_e164;

/// A [`Dialer`] that normalizes every number to E.164 before delegating.
///
/// Numbers that do not survive normalization (no digits at all) are
/// rejected without touching the inner dialer.
pub struct E164Dialer<D> {
    inner: D,
    country_code: String,
    local_code: String,
}

impl<D: Dialer> E164Dialer<D> {
    pub fn new(inner: D, country_code: &str, local_code: &str) -> Self {
        E164Dialer {
            inner,
            country_code: country_code.to_string(),
            local_code: local_code.to_string(),
        }
    }
}

#[async_trait]
impl<D: Dialer> Dialer for E164Dialer<D> {
    async fn dial(&self, number: &str) -> Result<()> {
        let normalized = to_e164(number, &self.country_code, &self.local_code);
        if normalized.len() < 2 || !normalized[1..].bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidNumber(format!(
                "'{number}' does not normalize to an E.164 number"
            )));
        }
        debug!(number = %number, normalized = %normalized, "normalized");
        self.inner.dial(&normalized).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialup_test_harness::MockDialer;

    #[tokio::test]
    async fn normalizes_before_delegating() {
        let dialer = E164Dialer::new(MockDialer::new(), "47", "");
        dialer.dial("91532600").await.unwrap();
        dialer.dial("0091532600").await.unwrap();
        dialer.dial("+4791532600").await.unwrap();
        assert_eq!(
            dialer.inner.dialed(),
            vec!["+4791532600", "+91532600", "+4791532600"]
        );
    }

    #[tokio::test]
    async fn digitless_numbers_are_rejected() {
        let dialer = E164Dialer::new(MockDialer::new(), "", "");
        let err = dialer.dial("abc").await.unwrap_err();
        assert!(matches!(err, Error::InvalidNumber(_)), "{err}");
        assert!(dialer.inner.dialed().is_empty());
    }

    #[tokio::test]
    async fn inner_failures_pass_through() {
        let dialer = E164Dialer::new(MockDialer::new(), "47", "");
        dialer.inner.fail_with("trunk down");
        let err = dialer.dial("91532600").await.unwrap_err();
        assert!(matches!(err, Error::Dial(_)), "{err}");
    }
}
