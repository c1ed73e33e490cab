//! Error types for dialup.
//!
//! All fallible operations across the workspace return [`Result<T>`],
//! which uses [`Error`] as the error type. Note that Hayes result codes
//! (`OK`, `ERROR`, `NO CARRIER`, ...) are *not* errors in this sense:
//! they are protocol output written back over the transport. `Error` is
//! reserved for failures of the emulator itself -- a transport that went
//! away, a dialing backend that rejected a call, a broken config file.

/// The error type for all dialup operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (serial port open/read/write failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// A dialing backend failed or refused to place the call.
    ///
    /// The modem engine maps this to the `ERROR` result code for the
    /// command line that triggered the dial; it is never fatal.
    #[error("dial failed: {0}")]
    Dial(String),

    /// A phone number that could not be normalized to E.164 form.
    #[error("invalid phone number: {0}")]
    InvalidNumber(String),

    /// A configuration file is missing, malformed, or fails validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("port busy".into());
        assert_eq!(e.to_string(), "transport error: port busy");
    }

    #[test]
    fn error_display_dial() {
        let e = Error::Dial("provider returned 403".into());
        assert_eq!(e.to_string(), "dial failed: provider returned 403");
    }

    #[test]
    fn error_display_invalid_number() {
        let e = Error::InvalidNumber("++47".into());
        assert_eq!(e.to_string(), "invalid phone number: ++47");
    }

    #[test]
    fn error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
