//! Dialing through a Phonelog server.
//!
//! Phonelog places a call with an authenticated
//! `POST https://<hostname>/api/dial` carrying the operator's email, a
//! fallback number for the operator's own phone, and the number to
//! call, all as query parameters. A body of `success\n` means the call
//! was placed.
//!
//! Numbers are normalized to E.164 with the configured country code and
//! local prefix before they are sent.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use dialup_core::{Dialer, Error, Result};

use crate::e164::to_e164;

/// Phonelog account settings, loaded from a JSON file:
///
/// ```json
/// {
///     "hostname": "phonelog.example.com",
///     "username": "user",
///     "password": "secret",
///     "country_code": "47",
///     "local_prefix": "",
///     "operator_email": "operator@example.com",
///     "operator_fallback_number": "91532600"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PhonelogSettings {
    /// Phonelog server hostname.
    pub hostname: String,
    /// API username.
    pub username: String,
    /// API password.
    pub password: String,
    /// Country code used for E.164 normalization.
    #[serde(default)]
    pub country_code: String,
    /// Local area prefix used for E.164 normalization.
    #[serde(default)]
    pub local_prefix: String,
    /// Email address identifying the operator placing calls.
    pub operator_email: String,
    /// Number Phonelog calls back if the operator's line drops.
    pub operator_fallback_number: String,
}

impl PhonelogSettings {
    /// Load and validate settings from a JSON file.
    pub fn load(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {path}: {e}")))?;
        Self::from_json(&text)
    }

    /// Parse and validate settings from a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: PhonelogSettings = serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("phonelog settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.hostname.is_empty() {
            return Err(Error::Config("phonelog hostname is empty".into()));
        }
        if !self.operator_email.contains('@') {
            return Err(Error::Config(format!(
                "'{}' is not an email address",
                self.operator_email
            )));
        }
        Ok(())
    }

    fn api_url(&self) -> String {
        format!("https://{}/api/dial", self.hostname)
    }
}

/// A [`Dialer`] backed by the Phonelog dial API.
pub struct PhonelogDialer {
    client: reqwest::Client,
    api_url: String,
    settings: PhonelogSettings,
}

impl PhonelogDialer {
    pub fn new(settings: PhonelogSettings) -> Self {
        PhonelogDialer {
            client: reqwest::Client::new(),
            api_url: settings.api_url(),
            settings,
        }
    }
}

#[async_trait]
impl Dialer for PhonelogDialer {
    async fn dial(&self, number: &str) -> Result<()> {
        let to_number = to_e164(number, &self.settings.country_code, &self.settings.local_prefix);
        let fallback = to_e164(
            &self.settings.operator_fallback_number,
            &self.settings.country_code,
            &self.settings.local_prefix,
        );
        debug!(to = %to_number, "dialing via phonelog");

        let response = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .query(&[
                ("operator_email", self.settings.operator_email.as_str()),
                ("operator_fallback_number", fallback.as_str()),
                ("to_number", to_number.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Dial(format!("phonelog request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.api_url, %status, "phonelog API error");
            return Err(Error::Dial(format!("phonelog API returned {status}")));
        }
        let body = response
            .text()
            .await
            .map_err(|e| Error::Dial(format!("phonelog response unreadable: {e}")))?;
        if body != "success\n" {
            return Err(Error::Dial(format!(
                "phonelog failed to dial '{to_number}' (response '{}')",
                body.trim_end()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "hostname": "phonelog.example.com",
        "username": "user",
        "password": "secret",
        "country_code": "47",
        "operator_email": "operator@example.com",
        "operator_fallback_number": "91532600"
    }"#;

    #[test]
    fn valid_settings_parse_with_defaults() {
        let settings = PhonelogSettings::from_json(VALID).unwrap();
        assert_eq!(settings.hostname, "phonelog.example.com");
        assert_eq!(settings.country_code, "47");
        assert_eq!(settings.local_prefix, "");
        assert_eq!(settings.api_url(), "https://phonelog.example.com/api/dial");
    }

    #[test]
    fn operator_email_must_look_like_one() {
        let err =
            PhonelogSettings::from_json(&VALID.replace("operator@example.com", "operator"))
                .unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn empty_hostname_is_rejected() {
        let err =
            PhonelogSettings::from_json(&VALID.replace("phonelog.example.com", "")).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn missing_credentials_are_a_config_error() {
        let err = PhonelogSettings::from_json(r#"{"hostname": "x"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }
}
