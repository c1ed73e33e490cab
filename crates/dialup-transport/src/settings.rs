//! Serial port settings, loadable from a JSON file.
//!
//! The daemon reads its port configuration from a small JSON document:
//!
//! ```json
//! {
//!     "port": "/dev/ttyUSB0",
//!     "baudrate": 115200,
//!     "bytesize": 8,
//!     "stopbits": 1
//! }
//! ```
//!
//! Only `port` is required; the rest default to 115200 8N1. Settings are
//! validated on load so a typo in the baud rate fails at startup rather
//! than as a cryptic ioctl error when the port opens.

use serde::Deserialize;

use dialup_core::{Error, Result};

/// Baud rates accepted by `baudrate`. UARTs only do the standard ones,
/// and the legacy equipment this emulator serves may run as slow as 50.
const STANDARD_BAUD_RATES: [u32; 17] = [
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200,
];

/// Configuration for the serial line the modem answers on.
#[derive(Debug, Clone, Deserialize)]
pub struct SerialSettings {
    /// Serial port path (e.g. `/dev/ttyUSB0` on Linux, `COM3` on Windows).
    pub port: String,
    /// Baud rate; must be one of the standard UART rates.
    #[serde(default = "default_baudrate")]
    pub baudrate: u32,
    /// Data bits per character; only 8 is supported.
    #[serde(default = "default_bytesize")]
    pub bytesize: u8,
    /// Stop bits; 1 or 2.
    #[serde(default = "default_stopbits")]
    pub stopbits: u8,
}

fn default_baudrate() -> u32 {
    115200
}

fn default_bytesize() -> u8 {
    8
}

fn default_stopbits() -> u8 {
    1
}

impl SerialSettings {
    /// Load and validate settings from a JSON file.
    pub fn load(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {path}: {e}")))?;
        Self::from_json(&text)
    }

    /// Parse and validate settings from a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: SerialSettings =
            serde_json::from_str(text).map_err(|e| Error::Config(format!("serial settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.port.is_empty() {
            return Err(Error::Config("serial port path is empty".into()));
        }
        if !STANDARD_BAUD_RATES.contains(&self.baudrate) {
            return Err(Error::Config(format!(
                "non-standard baud rate {}",
                self.baudrate
            )));
        }
        if self.bytesize != 8 {
            return Err(Error::Config(format!(
                "unsupported byte size {} (only 8 data bits)",
                self.bytesize
            )));
        }
        if self.stopbits != 1 && self.stopbits != 2 {
            return Err(Error::Config(format!(
                "unsupported stop bits {} (must be 1 or 2)",
                self.stopbits
            )));
        }
        Ok(())
    }

    /// The configured stop bits as the serial crate's type.
    pub(crate) fn stop_bits(&self) -> tokio_serial::StopBits {
        // validate() has already restricted this to 1 or 2.
        if self.stopbits == 2 {
            tokio_serial::StopBits::Two
        } else {
            tokio_serial::StopBits::One
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document_gets_defaults() {
        let settings = SerialSettings::from_json(r#"{"port": "/dev/ttyUSB0"}"#).unwrap();
        assert_eq!(settings.port, "/dev/ttyUSB0");
        assert_eq!(settings.baudrate, 115200);
        assert_eq!(settings.bytesize, 8);
        assert_eq!(settings.stopbits, 1);
    }

    #[test]
    fn full_document_parses() {
        let settings = SerialSettings::from_json(
            r#"{"port": "COM3", "baudrate": 9600, "bytesize": 8, "stopbits": 2}"#,
        )
        .unwrap();
        assert_eq!(settings.port, "COM3");
        assert_eq!(settings.baudrate, 9600);
        assert_eq!(settings.stopbits, 2);
        assert_eq!(settings.stop_bits(), tokio_serial::StopBits::Two);
    }

    #[test]
    fn standard_baud_rates_are_accepted() {
        for rate in STANDARD_BAUD_RATES {
            let doc = format!(r#"{{"port": "/dev/ttyUSB0", "baudrate": {rate}}}"#);
            let settings = SerialSettings::from_json(&doc).unwrap();
            assert_eq!(settings.baudrate, rate);
        }
    }

    #[test]
    fn non_standard_baud_rate_is_rejected() {
        for rate in [12345, 14400, 128000, 230400, 256000] {
            let doc = format!(r#"{{"port": "/dev/ttyUSB0", "baudrate": {rate}}}"#);
            let err = SerialSettings::from_json(&doc).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "rate {rate}: {err}");
        }
    }

    #[test]
    fn only_eight_data_bits() {
        let err =
            SerialSettings::from_json(r#"{"port": "/dev/ttyUSB0", "bytesize": 7}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn stop_bits_must_be_one_or_two() {
        let err =
            SerialSettings::from_json(r#"{"port": "/dev/ttyUSB0", "stopbits": 3}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn empty_port_is_rejected() {
        let err = SerialSettings::from_json(r#"{"port": ""}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SerialSettings::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }
}
