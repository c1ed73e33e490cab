//! dialup-modem: the Hayes AT command state machine.
//!
//! This crate is the core of the emulator. [`Modem`] owns a
//! [`Transport`](dialup_core::Transport) and a
//! [`Dialer`](dialup_core::Dialer) and drives a cooperative polling loop
//! that accumulates bytes into command lines, watches online traffic for
//! the timed `+++` escape sequence, dispatches AT commands against an
//! S-register store, and writes back byte-exact Hayes result codes.
//!
//! # Modules
//!
//! - [`registers`] -- the S-register store and its defaults
//! - [`line`] -- command-line accumulation, backspace editing, echo
//! - [`command`] -- the AT command grammar and tokenizer
//! - [`escape`] -- guard-time detection of the `+++` escape sequence
//! - [`result`] -- result code and register-response formatting
//! - [`modem`] -- the engine: state machine and per-tick driver

pub mod command;
pub mod escape;
pub mod line;
pub mod modem;
pub mod registers;
pub mod result;

pub use modem::{Modem, ModemConfig, ModemState};
pub use registers::RegisterStore;
pub use result::ResultCode;
