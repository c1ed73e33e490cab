//! Guard-time detection of the `+++` escape sequence.
//!
//! While the modem is online, payload bytes flow through untouched -- but
//! three escape characters (S2, default `+`) bracketed by quiet periods
//! of at least the guard time (S12) mean the operator wants command mode
//! back. The two-phase guard (quiet *before* the first escape character
//! and quiet *after* the third) is what distinguishes a deliberate
//! escape from payload that happens to contain `+++`.
//!
//! The detector is fed one read burst at a time together with the
//! observation timestamp, so its timing logic is testable without
//! sleeping. Rules:
//!
//! - a candidate run starts only when the line has been quiet for the
//!   guard time and an entire burst is exactly 1-3 escape characters;
//! - further escape characters must arrive within the guard window and
//!   must not push the run past three;
//! - anything else cancels the run, and every byte consumed so far is
//!   handed back as payload -- no bytes are silently dropped;
//! - once three have been seen, the detector fires on the first
//!   observation after a full quiet guard window.

use std::time::{Duration, Instant};

/// What the engine should do with an observed read burst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// Nothing read and nothing decided; keep polling.
    Idle,
    /// The burst was consumed as part of a candidate escape run.
    Consumed,
    /// Payload bytes (possibly including a cancelled escape run) for the
    /// data buffer.
    Data(Vec<u8>),
    /// The escape fired. Any bytes in the burst arrived after the quiet
    /// period and belong to command mode.
    Escaped(Vec<u8>),
}

/// Tracks a candidate `+++` run across read bursts.
#[derive(Debug)]
pub struct EscapeDetector {
    /// Escape characters consumed so far (0..=3).
    seen: u8,
    /// When the line last carried traffic; `None` means never, which
    /// counts as quiet.
    last_read: Option<Instant>,
}

impl EscapeDetector {
    pub fn new() -> Self {
        EscapeDetector {
            seen: 0,
            last_read: None,
        }
    }

    /// Escape characters consumed so far.
    pub fn seen(&self) -> u8 {
        self.seen
    }

    /// Feed one read burst (possibly empty) observed at `now`.
    pub fn observe(
        &mut self,
        burst: &[u8],
        escape: u8,
        guard: Duration,
        now: Instant,
    ) -> EscapeOutcome {
        let quiet = self
            .last_read
            .map_or(true, |last| now.duration_since(last) > guard);

        if self.seen == 3 {
            if quiet {
                self.seen = 0;
                return EscapeOutcome::Escaped(burst.to_vec());
            }
            if !burst.is_empty() {
                let outcome = EscapeOutcome::Data(self.cancelled(burst, escape));
                self.last_read = Some(now);
                return outcome;
            }
            return EscapeOutcome::Idle;
        }

        if burst.is_empty() {
            return EscapeOutcome::Idle;
        }

        let all_escapes = burst.iter().all(|&b| b == escape);
        let extends = all_escapes && usize::from(self.seen) + burst.len() <= 3;

        if self.seen > 0 {
            // Mid-run: the next escape characters must arrive within the
            // guard window, or the run is payload after all.
            if extends && !quiet {
                self.seen += burst.len() as u8;
                self.last_read = Some(now);
                return EscapeOutcome::Consumed;
            }
            let outcome = EscapeOutcome::Data(self.cancelled(burst, escape));
            self.last_read = Some(now);
            return outcome;
        }

        if quiet && extends {
            self.seen = burst.len() as u8;
            self.last_read = Some(now);
            return EscapeOutcome::Consumed;
        }

        self.last_read = Some(now);
        EscapeOutcome::Data(burst.to_vec())
    }

    /// Flush a cancelled run: the escape characters consumed so far plus
    /// the burst that broke the pattern.
    fn cancelled(&mut self, burst: &[u8], escape: u8) -> Vec<u8> {
        let mut data = vec![escape; usize::from(self.seen)];
        data.extend_from_slice(burst);
        self.seen = 0;
        data
    }
}

impl Default for EscapeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUARD: Duration = Duration::from_secs(1);

    fn after(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn fresh_line_counts_as_quiet() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        assert_eq!(det.observe(b"+++", b'+', GUARD, t0), EscapeOutcome::Consumed);
        assert_eq!(det.seen(), 3);
    }

    #[test]
    fn fires_after_trailing_quiet_period() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        det.observe(b"+++", b'+', GUARD, t0);
        // Still inside the guard window: nothing happens.
        assert_eq!(
            det.observe(b"", b'+', GUARD, after(t0, 500)),
            EscapeOutcome::Idle
        );
        // Quiet for longer than the guard time: fire.
        assert_eq!(
            det.observe(b"", b'+', GUARD, after(t0, 1500)),
            EscapeOutcome::Escaped(Vec::new())
        );
        assert_eq!(det.seen(), 0);
    }

    #[test]
    fn bytes_after_quiet_period_carry_into_command_mode() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        det.observe(b"+++", b'+', GUARD, t0);
        assert_eq!(
            det.observe(b"at\r", b'+', GUARD, after(t0, 1500)),
            EscapeOutcome::Escaped(b"at\r".to_vec())
        );
    }

    #[test]
    fn more_data_within_guard_window_cancels() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        det.observe(b"+++", b'+', GUARD, t0);
        assert_eq!(
            det.observe(b"more", b'+', GUARD, after(t0, 100)),
            EscapeOutcome::Data(b"+++more".to_vec())
        );
        assert_eq!(det.seen(), 0);
    }

    #[test]
    fn builds_up_one_character_at_a_time() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        assert_eq!(det.observe(b"+", b'+', GUARD, t0), EscapeOutcome::Consumed);
        assert_eq!(
            det.observe(b"+", b'+', GUARD, after(t0, 100)),
            EscapeOutcome::Consumed
        );
        assert_eq!(
            det.observe(b"+", b'+', GUARD, after(t0, 200)),
            EscapeOutcome::Consumed
        );
        assert_eq!(det.seen(), 3);
    }

    #[test]
    fn late_escape_character_cancels_the_run() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        det.observe(b"+", b'+', GUARD, t0);
        // The second escape character misses the guard window.
        assert_eq!(
            det.observe(b"+", b'+', GUARD, after(t0, 2000)),
            EscapeOutcome::Data(b"++".to_vec())
        );
    }

    #[test]
    fn run_longer_than_three_is_payload() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        assert_eq!(
            det.observe(b"++++", b'+', GUARD, t0),
            EscapeOutcome::Data(b"++++".to_vec())
        );
        assert_eq!(det.seen(), 0);
    }

    #[test]
    fn escapes_without_preceding_quiet_are_payload() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        det.observe(b"data", b'+', GUARD, t0);
        assert_eq!(
            det.observe(b"+++", b'+', GUARD, after(t0, 100)),
            EscapeOutcome::Data(b"+++".to_vec())
        );
        assert_eq!(det.seen(), 0);
    }

    #[test]
    fn mixed_burst_never_starts_a_run() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        assert_eq!(
            det.observe(b"+++x", b'+', GUARD, t0),
            EscapeOutcome::Data(b"+++x".to_vec())
        );
    }

    #[test]
    fn configurable_escape_character() {
        let mut det = EscapeDetector::new();
        let t0 = Instant::now();
        assert_eq!(det.observe(b"&&&", b'&', GUARD, t0), EscapeOutcome::Consumed);
        assert_eq!(
            det.observe(b"", b'&', GUARD, after(t0, 1500)),
            EscapeOutcome::Escaped(Vec::new())
        );
    }
}
