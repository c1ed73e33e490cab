//! # dialup -- a Hayes AT command modem emulator
//!
//! `dialup` answers on a serial port like a classic Hayes modem: it
//! echoes and parses `AT` command lines, keeps a bank of S-registers,
//! simulates online data mode complete with the guard-timed `+++`
//! escape, and -- when the terminal issues `ATD` -- places a real phone
//! call through a modern switchboard API. It exists for the legacy
//! systems (alarm consoles, building control, point-of-sale terminals)
//! that can only dial out through a modem on a COM port.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dialup::modem::Modem;
//! use dialup::dialer::DummyDialer;
//! use dialup::transport::{SerialSettings, SerialTransport};
//!
//! #[tokio::main]
//! async fn main() -> dialup::Result<()> {
//!     let settings = SerialSettings::load("serial.json")?;
//!     let transport = SerialTransport::open(&settings).await?;
//!     let mut modem = Modem::new(transport, DummyDialer::new());
//!     modem.run().await
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                 | Purpose                                      |
//! |-----------------------|----------------------------------------------|
//! | `dialup-core`         | Traits ([`Transport`], [`Dialer`]), errors   |
//! | `dialup-modem`        | The AT command engine and state machine      |
//! | `dialup-transport`    | Serial port transport and settings           |
//! | `dialup-dialer`       | Zisson/Phonelog/dummy backends, E.164        |
//! | `dialup-test-harness` | Scripted mock transport and dialer           |
//! | **`dialup`**          | This facade crate -- re-exports everything   |
//!
//! Dialer backends implement the [`Dialer`] trait, so the engine works
//! with `Box<dyn Dialer>` and stays switchboard-agnostic.

pub use dialup_core::*;

/// The AT command engine.
///
/// Provides [`Modem`](modem::Modem), the per-line state machine that
/// owns the register bank, mode flags, and escape detection.
pub mod modem {
    pub use dialup_modem::*;
}

/// Serial transport and its JSON-loadable settings.
pub mod transport {
    pub use dialup_transport::*;
}

/// Dialer backends and E.164 number handling.
pub mod dialer {
    pub use dialup_dialer::*;
}
