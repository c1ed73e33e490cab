//! Command line accumulation, editing, and echo.
//!
//! In command mode every inbound byte lands in the accumulator; complete
//! lines are split off at the terminator (S3) and cleaned up before they
//! reach the dispatcher:
//!
//! 1. surrounding ASCII whitespace is trimmed,
//! 2. destructive backspace editing (S5) is applied, so `xy<BS><BS>at`
//!    becomes `at`,
//! 3. leading `+++` runs are stripped -- escape characters that leak
//!    into command mode must not poison the line,
//! 4. the result is trimmed again.
//!
//! A line that is empty after cleanup is a keep-alive (many terminals
//! send a bare CR) and is discarded without a result code.

use bytes::{BufMut, BytesMut};

/// Buffers command-mode input until complete lines can be extracted.
#[derive(Debug, Default)]
pub struct LineAccumulator {
    buf: Vec<u8>,
}

impl LineAccumulator {
    pub fn new() -> Self {
        LineAccumulator { buf: Vec::new() }
    }

    /// Append raw inbound bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes currently buffered (a trailing partial line, usually).
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Split off the next complete line, if the buffer contains the
    /// terminator. The returned line has editing applied and may be
    /// empty; the remainder of the buffer is kept for later input.
    pub fn next_line(&mut self, terminator: u8, backspace: u8) -> Option<Vec<u8>> {
        let eol = self.buf.iter().position(|&b| b == terminator)?;
        let raw: Vec<u8> = self.buf.drain(..=eol).take(eol).collect();

        let trimmed = raw.trim_ascii();
        let edited = apply_backspace(trimmed, backspace);
        let stripped = strip_leading_escapes(&edited);
        Some(stripped.trim_ascii().to_vec())
    }
}

/// Apply destructive backspace editing: each backspace byte removes the
/// byte before it (or nothing, at the start of the line) along with
/// itself.
fn apply_backspace(line: &[u8], backspace: u8) -> Vec<u8> {
    let mut edited = Vec::with_capacity(line.len());
    for &b in line {
        if b == backspace {
            edited.pop();
        } else {
            edited.push(b);
        }
    }
    edited
}

/// Strip leading runs of the literal `+++` escape sequence.
fn strip_leading_escapes(line: &[u8]) -> &[u8] {
    let mut rest = line;
    while rest.starts_with(b"+++") {
        rest = &rest[3..];
    }
    rest
}

/// Build the echo output for a burst of accepted command-mode bytes.
///
/// Every byte is echoed verbatim; each terminator byte additionally
/// echoes a line feed, so the remote terminal sees CRLF even though only
/// CR was sent. Echoing per byte (rather than per burst) keeps the
/// output identical no matter how the input was chunked.
pub fn echo_bytes(input: &[u8], terminator: u8, line_feed: u8) -> Vec<u8> {
    let mut out = BytesMut::with_capacity(input.len() + 2);
    for &b in input {
        out.put_u8(b);
        if b == terminator {
            out.put_u8(line_feed);
        }
    }
    out.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CR: u8 = b'\r';
    const BS: u8 = 0x08;

    fn lines(acc: &mut LineAccumulator) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(line) = acc.next_line(CR, BS) {
            out.push(line);
        }
        out
    }

    #[test]
    fn no_terminator_no_line() {
        let mut acc = LineAccumulator::new();
        acc.extend(b"at");
        assert_eq!(acc.next_line(CR, BS), None);
        assert_eq!(acc.pending(), b"at");
    }

    #[test]
    fn single_line_trimmed() {
        let mut acc = LineAccumulator::new();
        acc.extend(b"   at    \r");
        assert_eq!(lines(&mut acc), vec![b"at".to_vec()]);
        assert!(acc.pending().is_empty());
    }

    #[test]
    fn multiple_lines_one_burst() {
        let mut acc = LineAccumulator::new();
        acc.extend(b"at\rate0\rpartial");
        assert_eq!(lines(&mut acc), vec![b"at".to_vec(), b"ate0".to_vec()]);
        assert_eq!(acc.pending(), b"partial");
    }

    #[test]
    fn backspace_editing() {
        let mut acc = LineAccumulator::new();
        acc.extend(b"xy\x08\x08at\r");
        assert_eq!(lines(&mut acc), vec![b"at".to_vec()]);
    }

    #[test]
    fn leading_backspace_is_dropped() {
        let mut acc = LineAccumulator::new();
        acc.extend(b"\x08\x08at\r");
        assert_eq!(lines(&mut acc), vec![b"at".to_vec()]);
    }

    #[test]
    fn bare_backspace_line_is_empty() {
        let mut acc = LineAccumulator::new();
        acc.extend(b"\x08\r");
        assert_eq!(lines(&mut acc), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn leaked_escape_sequences_are_stripped() {
        let mut acc = LineAccumulator::new();
        acc.extend(b"+++at\r");
        assert_eq!(lines(&mut acc), vec![b"at".to_vec()]);

        acc.extend(b"++++++at\r");
        assert_eq!(lines(&mut acc), vec![b"at".to_vec()]);
    }

    #[test]
    fn partial_escape_prefix_is_kept() {
        let mut acc = LineAccumulator::new();
        acc.extend(b"++at\r");
        assert_eq!(lines(&mut acc), vec![b"++at".to_vec()]);
    }

    #[test]
    fn configurable_terminator_and_backspace() {
        let mut acc = LineAccumulator::new();
        acc.extend(b"atxZ;");
        let line = acc.next_line(b';', b'Z').unwrap();
        assert_eq!(line, b"at");
    }

    #[test]
    fn echo_appends_line_feed_after_each_terminator() {
        assert_eq!(echo_bytes(b"at\r", CR, b'\n'), b"at\r\n");
        assert_eq!(echo_bytes(b"at\rat\r", CR, b'\n'), b"at\r\nat\r\n");
        assert_eq!(echo_bytes(b"a", CR, b'\n'), b"a");
    }

    #[test]
    fn echo_respects_configured_characters() {
        assert_eq!(echo_bytes(b"ats3=120x", b'x', b'!'), b"ats3=120x!");
    }
}
