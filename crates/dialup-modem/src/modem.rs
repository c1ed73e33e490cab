//! The modem engine: state machine and per-tick driver.
//!
//! [`Modem`] owns all mutable emulator state (registers, flags, buffers,
//! escape tracking) and the two injected capabilities. One call to
//! [`run_once`](Modem::run_once) performs one tick:
//!
//! 1. read a burst from the transport (one byte, then drain whatever is
//!    already buffered);
//! 2. route it by state -- to the escape detector while online, to the
//!    line accumulator in the command states (echoing as configured);
//! 3. in the command states, process every complete line in the buffer.
//!
//! If the burst was empty the engine sleeps briefly instead, which
//! bounds command-mode latency without busy-spinning. The transport's
//! timeout mode follows the state: blocking while waiting for commands,
//! polling while online so escape timing is evaluated on a steady
//! cadence.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use dialup_core::{Dialer, Result, Transport};

use crate::command::{take_command, AtCommand, CommandKind};
use crate::escape::{EscapeDetector, EscapeOutcome};
use crate::line::{echo_bytes, LineAccumulator};
use crate::registers::RegisterStore;
use crate::result::{format_response, format_result, ResultCode};

/// How long to sleep when a tick reads no data.
const SHORT_WAIT: Duration = Duration::from_millis(50);

/// The modem's top-level state. Governs which sub-component receives
/// inbound bytes and whether transport reads block or poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemState {
    /// Waiting for AT command lines.
    Command,
    /// A "data connection" is up; bytes are payload unless they form an
    /// escape sequence. The connection is simulated -- payload
    /// accumulates in the data buffer and goes nowhere.
    Online,
    /// Command mode entered from online via the escape sequence.
    ///
    /// Note: the transition here emits `NO CARRIER` even though no
    /// carrier ever existed. The emulator uses it as "online mode
    /// exited" signaling, because that is what legacy software expects
    /// to see; the name is misleading but the bytes are required.
    OnlineCommand,
}

/// The mode flags toggled by `ATE`/`ATV`/`ATQ`, reset by `ATZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemConfig {
    /// Echo command-mode input back to the terminal (`ATE`, default on).
    pub command_echo: bool,
    /// Verbose (word) result codes vs numeric (`ATV`, default verbose).
    pub verbose_results: bool,
    /// Suppress result codes entirely (`ATQ`, default off).
    pub result_suppressed: bool,
}

impl Default for ModemConfig {
    fn default() -> Self {
        ModemConfig {
            command_echo: true,
            verbose_results: true,
            result_suppressed: false,
        }
    }
}

/// The emulated modem.
///
/// All state is owned by the instance and mutated only by its own
/// methods; drive multiple serial lines with one `Modem` each.
pub struct Modem<T: Transport, D: Dialer> {
    transport: T,
    dialer: D,
    state: ModemState,
    registers: RegisterStore,
    config: ModemConfig,
    accumulator: LineAccumulator,
    escape: EscapeDetector,
    data_buffer: Vec<u8>,
}

impl<T: Transport, D: Dialer> Modem<T, D> {
    /// Create a modem in command state with default registers and flags.
    pub fn new(mut transport: T, dialer: D) -> Self {
        // Command state waits for input indefinitely.
        transport.set_timeout(None);
        Modem {
            transport,
            dialer,
            state: ModemState::Command,
            registers: RegisterStore::new(),
            config: ModemConfig::default(),
            accumulator: LineAccumulator::new(),
            escape: EscapeDetector::new(),
            data_buffer: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> ModemState {
        self.state
    }

    /// The S-register store.
    pub fn registers(&self) -> &RegisterStore {
        &self.registers
    }

    /// The current mode flags.
    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Online payload accumulated so far (no downstream data channel
    /// exists in the emulator; hosts may drain this if they care).
    ///
    /// The buffer grows without bound while online: a long-lived data
    /// session with a chatty peer needs periodic [`take_data`] calls.
    ///
    /// [`take_data`]: Modem::take_data
    pub fn data_buffer(&self) -> &[u8] {
        &self.data_buffer
    }

    /// Drain the accumulated online payload.
    pub fn take_data(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data_buffer)
    }

    /// Access the transport (mainly for tests driving a mock).
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Access the dialer.
    pub fn dialer(&self) -> &D {
        &self.dialer
    }

    /// Run the modem until the transport fails.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.run_once().await?;
        }
    }

    /// Run the modem until `cancel` is triggered (checked between ticks
    /// and while blocked in a read).
    pub async fn run_until_cancelled(&mut self, cancel: CancellationToken) -> Result<()> {
        while !cancel.is_cancelled() {
            tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.run_once() => result?,
            }
        }
        debug!("modem loop cancelled");
        Ok(())
    }

    /// Run the modem for roughly the given duration.
    pub async fn run_for(&mut self, duration: Duration) -> Result<()> {
        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            self.run_once().await?;
        }
        Ok(())
    }

    /// One tick of the polling loop.
    pub async fn run_once(&mut self) -> Result<()> {
        let produced = self.poll_transport().await?;
        if !produced {
            tokio::time::sleep(SHORT_WAIT).await;
            return Ok(());
        }
        match self.state {
            ModemState::Command | ModemState::OnlineCommand => {
                self.process_command_buffer().await
            }
            ModemState::Online => Ok(()),
        }
    }

    /// Read one burst and route it by state. Returns whether any bytes
    /// were produced.
    async fn poll_transport(&mut self) -> Result<bool> {
        let burst = self.read_burst().await?;
        match self.state {
            ModemState::Online => {
                let escape = self.registers.escape_char();
                let guard = self.registers.guard_time();
                match self.escape.observe(&burst, escape, guard, Instant::now()) {
                    EscapeOutcome::Idle | EscapeOutcome::Consumed => {}
                    EscapeOutcome::Data(data) => self.data_buffer.extend_from_slice(&data),
                    EscapeOutcome::Escaped(carry) => {
                        debug!("escape sequence recognized, leaving online mode");
                        self.set_state(ModemState::OnlineCommand);
                        self.write_result(ResultCode::NoCarrier).await?;
                        // Bytes that arrived after the guard period are
                        // already command input; they were never echoed.
                        self.accumulator.extend(&carry);
                    }
                }
            }
            ModemState::Command | ModemState::OnlineCommand => {
                if !burst.is_empty() {
                    self.accumulator.extend(&burst);
                    if self.config.command_echo {
                        let echo = echo_bytes(
                            &burst,
                            self.registers.terminator(),
                            self.registers.line_feed(),
                        );
                        self.transport.write(&echo).await?;
                    }
                }
            }
        }
        Ok(!burst.is_empty())
    }

    /// Read one byte (per the current timeout mode), then drain whatever
    /// the transport has already buffered.
    async fn read_burst(&mut self) -> Result<Vec<u8>> {
        let mut burst = self.transport.read(1).await?;
        loop {
            let available = self.transport.bytes_available()?;
            if available == 0 {
                break;
            }
            let more = self.transport.read(available).await?;
            if more.is_empty() {
                break;
            }
            burst.extend_from_slice(&more);
        }
        Ok(burst)
    }

    fn set_state(&mut self, state: ModemState) {
        debug!(from = ?self.state, to = ?state, "state transition");
        self.state = state;
        // Online mode polls so escape timing runs on a steady cadence;
        // the command states may block until input arrives.
        let timeout = match state {
            ModemState::Online => Some(Duration::ZERO),
            ModemState::Command | ModemState::OnlineCommand => None,
        };
        self.transport.set_timeout(timeout);
    }

    /// Process every complete line currently in the accumulator.
    async fn process_command_buffer(&mut self) -> Result<()> {
        loop {
            let terminator = self.registers.terminator();
            let backspace = self.registers.backspace();
            let Some(line) = self.accumulator.next_line(terminator, backspace) else {
                return Ok(());
            };
            if line.is_empty() {
                // Keep-alive: a bare terminator gets no result code.
                continue;
            }
            info!(line = %printable(&line), "command");

            let at_prefix = line.len() >= 2
                && line[0].eq_ignore_ascii_case(&b'a')
                && line[1].eq_ignore_ascii_case(&b't');
            if !at_prefix {
                self.write_result(ResultCode::Error).await?;
                continue;
            }

            // Latin-1-range bytes map 1:1 to chars; anything non-ASCII
            // will simply fail to parse as a command.
            let body: String = line[2..]
                .iter()
                .map(|&b| (b as char).to_ascii_uppercase())
                .collect();
            self.execute_line(&body).await?;
        }
    }

    /// Execute the commands on one line left to right, stopping at the
    /// first that does not yield `OK`, then write the line's result.
    async fn execute_line(&mut self, body: &str) -> Result<()> {
        let mut rest = body;
        let mut result = ResultCode::Ok;
        while !rest.is_empty() && result == ResultCode::Ok {
            match take_command(rest) {
                Some((command, remaining)) => {
                    rest = remaining;
                    result = self.execute(command).await?;
                }
                None => {
                    result = ResultCode::Error;
                }
            }
        }
        self.write_result(result).await
    }

    async fn execute(&mut self, command: AtCommand) -> Result<ResultCode> {
        match command {
            AtCommand::Dial { number } => match self.dialer.dial(&number).await {
                Ok(()) => {
                    info!(number = %number, "dialed");
                    Ok(ResultCode::Ok)
                }
                Err(error) => {
                    warn!(number = %number, error = %error, "dial failed");
                    Ok(ResultCode::Error)
                }
            },
            AtCommand::Basic { kind, param } => {
                if !kind.accepts(param) {
                    debug!(?kind, param, "parameter out of domain");
                    return Ok(ResultCode::Error);
                }
                self.apply(kind, param).await
            }
        }
    }

    async fn apply(&mut self, kind: CommandKind, param: u32) -> Result<ResultCode> {
        match kind {
            CommandKind::Answer
            | CommandKind::Modulation
            | CommandKind::SpeakerVolume
            | CommandKind::SpeakerMode
            | CommandKind::ResultSet => Ok(ResultCode::Ok),
            CommandKind::Echo => {
                self.config.command_echo = param == 1;
                Ok(ResultCode::Ok)
            }
            CommandKind::Hangup => {
                let was_online = self.state == ModemState::Online;
                if self.state != ModemState::Command {
                    self.set_state(ModemState::Command);
                }
                if was_online {
                    Ok(ResultCode::NoCarrier)
                } else {
                    Ok(ResultCode::Ok)
                }
            }
            CommandKind::Online => {
                if param == 999 {
                    self.set_state(ModemState::Online);
                    Ok(ResultCode::Connect)
                } else {
                    // ATO0 would resume a data session we never had.
                    debug!("ATO0 not implemented");
                    Ok(ResultCode::Error)
                }
            }
            CommandKind::Quiet => {
                self.config.result_suppressed = param == 1;
                Ok(ResultCode::Ok)
            }
            CommandKind::SelectRegister => match self.registers.select(param) {
                Ok(()) => Ok(ResultCode::Ok),
                Err(_) => Ok(ResultCode::Error),
            },
            CommandKind::Verbose => {
                self.config.verbose_results = param == 1;
                Ok(ResultCode::Ok)
            }
            CommandKind::Reset => {
                self.registers.reset();
                self.config = ModemConfig::default();
                Ok(ResultCode::Ok)
            }
            CommandKind::WriteRegister => {
                // `accepts` bounds the parameter to 0..=255.
                match self.registers.write_selected(param as u8) {
                    Ok(()) => Ok(ResultCode::Ok),
                    Err(_) => Ok(ResultCode::Error),
                }
            }
            CommandKind::QueryRegister => match self.registers.read_selected() {
                Ok(value) => {
                    self.write_response(value.to_string().as_bytes()).await?;
                    Ok(ResultCode::Ok)
                }
                Err(_) => Ok(ResultCode::Error),
            },
        }
    }

    async fn write_result(&mut self, code: ResultCode) -> Result<()> {
        info!(result = %code, "response");
        let rendered = format_result(
            code,
            self.config.verbose_results,
            self.config.result_suppressed,
            self.registers.terminator(),
            self.registers.line_feed(),
        );
        match rendered {
            Some(bytes) => self.transport.write(&bytes).await,
            None => Ok(()),
        }
    }

    async fn write_response(&mut self, payload: &[u8]) -> Result<()> {
        info!(response = %printable(payload), "response");
        let bytes = format_response(
            payload,
            self.config.verbose_results,
            self.registers.terminator(),
            self.registers.line_feed(),
        );
        self.transport.write(&bytes).await
    }
}

/// Render a byte line for the log, escaping anything non-printable.
fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect()
}
