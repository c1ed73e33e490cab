//! Transport implementations for dialup.
//!
//! This crate provides the concrete [`Transport`](dialup_core::Transport)
//! implementation for the serial line the modem emulator answers on:
//!
//! - [`SerialTransport`]: USB virtual COM ports and RS-232 serial lines
//! - [`SerialSettings`]: JSON-loadable port configuration
//!
//! # Example
//!
//! ```no_run
//! use dialup_transport::{SerialSettings, SerialTransport};
//!
//! # async fn example() -> dialup_core::Result<()> {
//! let settings = SerialSettings::load("serial.json")?;
//! let transport = SerialTransport::open(&settings).await?;
//! # Ok(())
//! # }
//! ```

pub mod serial;
pub mod settings;

pub use serial::SerialTransport;
pub use settings::SerialSettings;
