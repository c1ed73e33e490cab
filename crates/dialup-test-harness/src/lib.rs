//! dialup-test-harness: mock capabilities for testing the modem engine.
//!
//! [`MockTransport`] is a scripted serial line: tests queue the bytes
//! the "terminal" sends and inspect everything the modem writes back.
//! [`MockDialer`] records every number the engine tries to dial and can
//! be scripted to fail.
//!
//! A modem line is not request/response -- bytes may arrive at any time
//! relative to output -- so the transport mock is a queue plus a log
//! rather than expectation pairs.

pub mod mock_dialer;
pub mod mock_serial;

pub use mock_dialer::MockDialer;
pub use mock_serial::MockTransport;
