//! Hayes result code and response formatting.
//!
//! Result codes have two encodings, selected by `ATV`: verbose
//! (`<CR><LF>OK<CR><LF>`) and numeric (`0<CR>`). `ATQ1` suppresses
//! result codes entirely -- not a single byte is written. Register query
//! responses (`AT?`) use the same verbose framing but are *not*
//! suppressed by `ATQ1`, matching real Hayes behavior.
//!
//! The exact byte sequences here are load-bearing: legacy communications
//! software string-matches them.

use bytes::{BufMut, BytesMut};

/// A Hayes result code. The numeric values are fixed by the standard
/// and used verbatim in non-verbose output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok = 0,
    Connect = 1,
    Ring = 2,
    NoCarrier = 3,
    Error = 4,
    NoDialtone = 6,
    Busy = 7,
    NoAnswer = 8,
}

impl ResultCode {
    /// The standard numeric value.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// The standard verbose name (word-separated).
    pub fn name(self) -> &'static str {
        match self {
            ResultCode::Ok => "OK",
            ResultCode::Connect => "CONNECT",
            ResultCode::Ring => "RING",
            ResultCode::NoCarrier => "NO CARRIER",
            ResultCode::Error => "ERROR",
            ResultCode::NoDialtone => "NO DIALTONE",
            ResultCode::Busy => "BUSY",
            ResultCode::NoAnswer => "NO ANSWER",
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a result code, or `None` when suppression is active.
///
/// `terminator` and `line_feed` are the current S3/S4 characters.
pub fn format_result(
    code: ResultCode,
    verbose: bool,
    suppressed: bool,
    terminator: u8,
    line_feed: u8,
) -> Option<Vec<u8>> {
    if suppressed {
        return None;
    }
    let mut out = BytesMut::with_capacity(16);
    if verbose {
        out.put_u8(terminator);
        out.put_u8(line_feed);
        out.put_slice(code.name().as_bytes());
        out.put_u8(terminator);
        out.put_u8(line_feed);
    } else {
        out.put_slice(code.value().to_string().as_bytes());
        out.put_u8(terminator);
    }
    Some(out.to_vec())
}

/// Render a register-query response line (written before the `OK` for
/// the same command).
pub fn format_response(payload: &[u8], verbose: bool, terminator: u8, line_feed: u8) -> Vec<u8> {
    let mut out = BytesMut::with_capacity(payload.len() + 4);
    if verbose {
        out.put_u8(terminator);
        out.put_u8(line_feed);
        out.put_slice(payload);
        out.put_u8(terminator);
        out.put_u8(line_feed);
    } else {
        out.put_slice(payload);
        out.put_u8(terminator);
        out.put_u8(line_feed);
    }
    out.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values_match_the_standard() {
        assert_eq!(ResultCode::Ok.value(), 0);
        assert_eq!(ResultCode::Connect.value(), 1);
        assert_eq!(ResultCode::Ring.value(), 2);
        assert_eq!(ResultCode::NoCarrier.value(), 3);
        assert_eq!(ResultCode::Error.value(), 4);
        assert_eq!(ResultCode::NoDialtone.value(), 6);
        assert_eq!(ResultCode::Busy.value(), 7);
        assert_eq!(ResultCode::NoAnswer.value(), 8);
    }

    #[test]
    fn verbose_result_framing() {
        let out = format_result(ResultCode::Ok, true, false, b'\r', b'\n').unwrap();
        assert_eq!(out, b"\r\nOK\r\n");
    }

    #[test]
    fn verbose_names_are_word_separated() {
        let out = format_result(ResultCode::NoCarrier, true, false, b'\r', b'\n').unwrap();
        assert_eq!(out, b"\r\nNO CARRIER\r\n");
    }

    #[test]
    fn numeric_result_framing() {
        let out = format_result(ResultCode::Ok, false, false, b'\r', b'\n').unwrap();
        assert_eq!(out, b"0\r");
        let out = format_result(ResultCode::Error, false, false, b'\r', b'\n').unwrap();
        assert_eq!(out, b"4\r");
    }

    #[test]
    fn suppression_writes_nothing() {
        assert_eq!(format_result(ResultCode::Ok, true, true, b'\r', b'\n'), None);
        assert_eq!(
            format_result(ResultCode::Error, false, true, b'\r', b'\n'),
            None
        );
    }

    #[test]
    fn response_framing() {
        assert_eq!(format_response(b"15", true, b'\r', b'\n'), b"\r\n15\r\n");
        assert_eq!(format_response(b"15", false, b'\r', b'\n'), b"15\r\n");
    }

    #[test]
    fn framing_uses_configured_characters() {
        let out = format_result(ResultCode::Ok, true, false, b'x', b'!').unwrap();
        assert_eq!(out, b"x!OKx!");
    }
}
