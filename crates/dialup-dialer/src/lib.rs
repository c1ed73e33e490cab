//! Dialer backends for the modem emulator.
//!
//! When the modem engine accepts an `ATD` command it hands the number to
//! a [`Dialer`](dialup_core::Dialer). This crate provides the concrete
//! backends:
//!
//! - [`ZissonDialer`]: places the call through the Zisson switchboard API
//! - [`PhonelogDialer`]: places the call through a Phonelog server
//! - [`DummyDialer`]: logs the number and succeeds (bench testing)
//! - [`E164Dialer`]: wraps another dialer, normalizing numbers to E.164
//!   before delegating
//!
//! Terminals dial whatever their operators type -- `ATD 915 32 600` one
//! day, `ATD004791532600` the next -- so production setups wrap their
//! backend in [`E164Dialer`] and configure the country and local codes
//! once.

pub mod dummy;
pub mod e164;
pub mod normalize;
pub mod phonelog;
pub mod zisson;

pub use dummy::DummyDialer;
pub use e164::to_e164;
pub use normalize::E164Dialer;
pub use phonelog::{PhonelogDialer, PhonelogSettings};
pub use zisson::{ZissonDialer, ZissonSettings};
