//! The AT command grammar.
//!
//! A command line is `AT` (any case) followed by zero or more commands.
//! Most commands are a single letter with an optional run of digits (the
//! parameter, defaulting to 0); `=` and `?` operate on the register
//! selected by the last `S` command. The dial command `D` swallows the
//! rest of the line.
//!
//! Parsing is incremental: [`take_command`] peels one command off the
//! front of the (already upper-cased) line body and returns the rest.
//! The engine executes commands as they are parsed and stops at the
//! first one that does not yield `OK` -- a prefix of a bad line still
//! takes effect, exactly as on real Hayes modems.

/// One recognized command letter, tagged with its parameter domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `A` -- answer. Auto-answer is not modeled; accepted as a no-op.
    Answer,
    /// `B` -- modulation standard selection. No-op.
    Modulation,
    /// `E` -- command echo on/off.
    Echo,
    /// `H` -- hang up.
    Hangup,
    /// `L` -- speaker volume. No-op.
    SpeakerVolume,
    /// `M` -- speaker mode. No-op.
    SpeakerMode,
    /// `O` -- return online. Only the emulator-private `999` parameter
    /// actually connects; `O0` (resume after escape) is not implemented.
    Online,
    /// `Q` -- result code suppression on/off.
    Quiet,
    /// `S` -- select an S-register.
    SelectRegister,
    /// `V` -- verbose/numeric result codes.
    Verbose,
    /// `X` -- result code set selection. No-op.
    ResultSet,
    /// `Z` -- reset registers and flags to defaults.
    Reset,
    /// `=` -- write a value into the selected register.
    WriteRegister,
    /// `?` -- report the selected register's value.
    QueryRegister,
}

impl CommandKind {
    /// Look up a command letter (upper-cased input expected).
    pub fn from_letter(letter: u8) -> Option<CommandKind> {
        match letter {
            b'A' => Some(CommandKind::Answer),
            b'B' => Some(CommandKind::Modulation),
            b'E' => Some(CommandKind::Echo),
            b'H' => Some(CommandKind::Hangup),
            b'L' => Some(CommandKind::SpeakerVolume),
            b'M' => Some(CommandKind::SpeakerMode),
            b'O' => Some(CommandKind::Online),
            b'Q' => Some(CommandKind::Quiet),
            b'S' => Some(CommandKind::SelectRegister),
            b'V' => Some(CommandKind::Verbose),
            b'X' => Some(CommandKind::ResultSet),
            b'Z' => Some(CommandKind::Reset),
            b'=' => Some(CommandKind::WriteRegister),
            b'?' => Some(CommandKind::QueryRegister),
            _ => None,
        }
    }

    /// Whether `param` is in this command's legal domain.
    ///
    /// `S` is checked against the register store at execution time, so
    /// any numeric parameter passes here.
    pub fn accepts(&self, param: u32) -> bool {
        match self {
            CommandKind::Answer
            | CommandKind::Hangup
            | CommandKind::Reset
            | CommandKind::QueryRegister => param == 0,
            CommandKind::Modulation
            | CommandKind::Echo
            | CommandKind::Quiet
            | CommandKind::Verbose => param <= 1,
            CommandKind::SpeakerVolume | CommandKind::SpeakerMode => param <= 3,
            CommandKind::ResultSet => param <= 4,
            CommandKind::Online => param == 0 || param == 999,
            CommandKind::SelectRegister => true,
            CommandKind::WriteRegister => param <= 255,
        }
    }
}

/// One parsed command from an AT line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtCommand {
    /// A table command with its numeric parameter (0 if absent).
    Basic { kind: CommandKind, param: u32 },
    /// A dial command with the extracted number string.
    Dial { number: String },
}

/// Peel one command off the front of an upper-cased line body.
///
/// Returns the command and the unconsumed remainder, or `None` if the
/// front of the line matches neither the command table nor the dial
/// pattern.
pub fn take_command(body: &str) -> Option<(AtCommand, &str)> {
    let first = *body.as_bytes().first()?;

    if let Some(kind) = CommandKind::from_letter(first) {
        let rest = &body[1..];
        let digits_end = rest
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(rest.len());
        let param = if digits_end == 0 {
            0
        } else {
            // A run too long for u32 is out of every domain anyway.
            rest[..digits_end].parse().unwrap_or(u32::MAX)
        };
        return Some((AtCommand::Basic { kind, param }, &rest[digits_end..]));
    }

    if first == b'D' {
        let number = parse_dial(&body[1..])?;
        return Some((AtCommand::Dial { number }, ""));
    }

    None
}

/// Parse the tail of a dial command (`D` already consumed):
/// `[PT]? \s* \+? [digit/space/*/#]+ ;?` anchored to the end of the
/// line. Returns the number with whitespace removed and any leading `+`
/// preserved.
fn parse_dial(tail: &str) -> Option<String> {
    let rest = tail.strip_prefix(['P', 'T']).unwrap_or(tail);
    let rest = rest.strip_suffix(';').unwrap_or(rest);
    let rest = rest.trim_start();
    let (plus, digits) = match rest.strip_prefix('+') {
        Some(stripped) => (true, stripped),
        None => (false, rest),
    };

    if digits.is_empty()
        || !digits
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_whitespace() || c == '*' || c == '#')
    {
        return None;
    }

    let mut number = String::with_capacity(digits.len() + 1);
    if plus {
        number.push('+');
    }
    number.extend(digits.chars().filter(|c| !c.is_ascii_whitespace()));
    Some(number)
}
