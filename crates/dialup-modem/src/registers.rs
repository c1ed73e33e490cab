//! The S-register store.
//!
//! Hayes modems expose a bank of numbered byte-sized configuration slots
//! ("S-registers"). This emulator defines the registers that commonly
//! appear in init strings; four of them change protocol behavior
//! directly (escape character, line terminator, response line feed,
//! backspace) and one sets the escape guard time. The rest are accepted
//! and ignored so that init strings like `ATS0=0S7=60` succeed.
//!
//! Only registers present in the default set are addressable; selecting
//! or writing any other index is an invalid register access.

use std::collections::BTreeMap;
use std::time::Duration;

/// S2: the escape character for leaving online mode (default `+`).
pub const REG_ESCAPE_CHAR: u8 = 2;
/// S3: the command line terminator (default CR).
pub const REG_TERMINATOR: u8 = 3;
/// S4: the response formatting character (default LF).
pub const REG_LINE_FEED: u8 = 4;
/// S5: the command line editing character (default backspace).
pub const REG_BACKSPACE: u8 = 5;
/// S12: escape sequence guard time, in 1/50-second units (default 50 = 1s).
pub const REG_GUARD_TIME: u8 = 12;

/// Registers that are defined but have no effect in an emulator
/// (auto-answer, ring count, dial timeouts, carrier timers). They exist
/// so that real-world init strings do not fail.
const IGNORED_REGISTERS: [u8; 7] = [0, 1, 6, 7, 9, 10, 11];

/// Failure modes for S-register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// The register index is not in the defined set.
    Undefined(u32),
    /// `AT=`/`AT?` was used before any `ATSn` selected a register.
    NoneSelected,
}

/// The S-register bank plus the currently-selected register index.
///
/// The selected index is set by `ATSn` and consumed by `AT=` and `AT?`.
/// It survives `ATZ` (only register *values* are reset).
#[derive(Debug, Clone)]
pub struct RegisterStore {
    registers: BTreeMap<u8, u8>,
    selected: Option<u8>,
}

impl RegisterStore {
    /// Create a store with the documented power-on defaults.
    pub fn new() -> Self {
        RegisterStore {
            registers: Self::defaults(),
            selected: None,
        }
    }

    fn defaults() -> BTreeMap<u8, u8> {
        let mut registers = BTreeMap::new();
        registers.insert(REG_ESCAPE_CHAR, b'+');
        registers.insert(REG_TERMINATOR, b'\r');
        registers.insert(REG_LINE_FEED, b'\n');
        registers.insert(REG_BACKSPACE, 0x08);
        registers.insert(REG_GUARD_TIME, 50);
        for index in IGNORED_REGISTERS {
            registers.insert(index, 0);
        }
        registers
    }

    /// Restore all register values to their defaults (`ATZ`).
    ///
    /// The selected register index is left as-is.
    pub fn reset(&mut self) {
        self.registers = Self::defaults();
    }

    /// Read a register value, if the index is defined.
    pub fn get(&self, index: u8) -> Option<u8> {
        self.registers.get(&index).copied()
    }

    /// Select a register for a subsequent `AT=`/`AT?` (`ATSn`).
    pub fn select(&mut self, index: u32) -> Result<(), RegisterError> {
        let index = u8::try_from(index).map_err(|_| RegisterError::Undefined(index))?;
        if !self.registers.contains_key(&index) {
            return Err(RegisterError::Undefined(u32::from(index)));
        }
        self.selected = Some(index);
        Ok(())
    }

    /// The currently selected register index, if any.
    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    /// Write `value` into the selected register (`AT=`).
    pub fn write_selected(&mut self, value: u8) -> Result<(), RegisterError> {
        let index = self.selected.ok_or(RegisterError::NoneSelected)?;
        self.registers.insert(index, value);
        Ok(())
    }

    /// Read the selected register's value (`AT?`).
    pub fn read_selected(&self) -> Result<u8, RegisterError> {
        let index = self.selected.ok_or(RegisterError::NoneSelected)?;
        self.registers
            .get(&index)
            .copied()
            .ok_or(RegisterError::Undefined(u32::from(index)))
    }

    fn value(&self, index: u8, fallback: u8) -> u8 {
        self.registers.get(&index).copied().unwrap_or(fallback)
    }

    /// The current escape character (S2).
    pub fn escape_char(&self) -> u8 {
        self.value(REG_ESCAPE_CHAR, b'+')
    }

    /// The current command line terminator (S3).
    pub fn terminator(&self) -> u8 {
        self.value(REG_TERMINATOR, b'\r')
    }

    /// The current response line feed character (S4).
    pub fn line_feed(&self) -> u8 {
        self.value(REG_LINE_FEED, b'\n')
    }

    /// The current line editing (backspace) character (S5).
    pub fn backspace(&self) -> u8 {
        self.value(REG_BACKSPACE, 0x08)
    }

    /// The escape guard time (S12, in 1/50-second units) as a duration.
    pub fn guard_time(&self) -> Duration {
        Duration::from_millis(u64::from(self.value(REG_GUARD_TIME, 50)) * 20)
    }
}

impl Default for RegisterStore {
    fn default() -> Self {
        Self::new()
    }
}
