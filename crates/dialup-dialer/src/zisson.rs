//! Dialing through the Zisson switchboard API.
//!
//! Zisson's "simple" API places a call with a single authenticated GET:
//! `GET /api/simple/Dial?from=<our number>&to=<number>`. The API host
//! differs by provider: `api.zisson.com` for Kvantel accounts,
//! `api.zisson.no` for TDC accounts. A body of `1` means the call was
//! placed.

use serde::Deserialize;
use tracing::{debug, warn};

use dialup_core::{Dialer, Error, Result};

use async_trait::async_trait;

/// Zisson account settings, loaded from a JSON file:
///
/// ```json
/// {
///     "provider": "kvantel",
///     "apiuser": "user",
///     "apipassword": "secret",
///     "phone": "+4791532600"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ZissonSettings {
    /// Account provider: `kvantel` or `tdc` (case-insensitive).
    pub provider: String,
    /// API username.
    pub apiuser: String,
    /// API password.
    pub apipassword: String,
    /// Our own number in E.164 format; calls are placed from it.
    pub phone: String,
}

impl ZissonSettings {
    /// Load and validate settings from a JSON file.
    pub fn load(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {path}: {e}")))?;
        Self::from_json(&text)
    }

    /// Parse and validate settings from a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: ZissonSettings = serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("zisson settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        self.base_url()?;
        let mut digits = self.phone.chars();
        let plus_and_digits = digits.next() == Some('+')
            && self.phone.len() > 1
            && digits.all(|c| c.is_ascii_digit());
        if !plus_and_digits {
            return Err(Error::Config(format!(
                "phone '{}' is not in E.164 format",
                self.phone
            )));
        }
        Ok(())
    }

    /// The API base URL for the configured provider.
    fn base_url(&self) -> Result<String> {
        let domain = match self.provider.to_lowercase().as_str() {
            "kvantel" => "com",
            "tdc" => "no",
            other => {
                return Err(Error::Config(format!(
                    "unknown zisson provider '{other}' (expected kvantel or tdc)"
                )))
            }
        };
        Ok(format!("https://api.zisson.{domain}/api/simple/"))
    }
}

/// A [`Dialer`] backed by the Zisson simple API.
pub struct ZissonDialer {
    client: reqwest::Client,
    base_url: String,
    settings: ZissonSettings,
}

impl ZissonDialer {
    pub fn new(settings: ZissonSettings) -> Result<Self> {
        let base_url = settings.base_url()?;
        Ok(ZissonDialer {
            client: reqwest::Client::new(),
            base_url,
            settings,
        })
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.settings.apiuser, Some(&self.settings.apipassword))
            .query(params)
            .send()
            .await
            .map_err(|e| Error::Dial(format!("zisson request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "zisson API error");
            return Err(Error::Dial(format!("zisson API returned {status}")));
        }
        response
            .text()
            .await
            .map_err(|e| Error::Dial(format!("zisson response unreadable: {e}")))
    }
}

#[async_trait]
impl Dialer for ZissonDialer {
    async fn dial(&self, number: &str) -> Result<()> {
        debug!(from = %self.settings.phone, to = %number, "dialing via zisson");
        let body = self
            .get("Dial", &[("from", &self.settings.phone), ("to", number)])
            .await?;
        if body != "1" {
            return Err(Error::Dial(format!(
                "zisson failed to dial '{number}' (response '{body}')"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "provider": "kvantel",
        "apiuser": "user",
        "apipassword": "secret",
        "phone": "+4791532600"
    }"#;

    #[test]
    fn valid_settings_parse() {
        let settings = ZissonSettings::from_json(VALID).unwrap();
        assert_eq!(settings.provider, "kvantel");
        assert_eq!(settings.phone, "+4791532600");
    }

    #[test]
    fn provider_selects_the_api_host() {
        let kvantel = ZissonSettings::from_json(VALID).unwrap();
        assert_eq!(
            kvantel.base_url().unwrap(),
            "https://api.zisson.com/api/simple/"
        );

        let tdc = ZissonSettings::from_json(&VALID.replace("kvantel", "TDC")).unwrap();
        assert_eq!(tdc.base_url().unwrap(), "https://api.zisson.no/api/simple/");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = ZissonSettings::from_json(&VALID.replace("kvantel", "telenor")).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn phone_must_be_e164() {
        let err = ZissonSettings::from_json(&VALID.replace("+4791532600", "91532600")).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
        let err = ZissonSettings::from_json(&VALID.replace("+4791532600", "+")).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn missing_field_is_a_config_error() {
        let err = ZissonSettings::from_json(r#"{"provider": "kvantel"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }
}
