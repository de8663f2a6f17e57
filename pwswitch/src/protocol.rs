//! Line protocol spoken by the power switch firmware.
//!
//! Every request is a single line made of a fixed tag, a one character code
//! and a CRLF terminator:
//!
//! ```text
//! +--------+------+------+
//! | "PW="  | code | \r\n |
//! +--------+------+------+
//! ```
//!
//! The device answers with zero or more lines, each one of `PW=0`, `PW=1`,
//! `OK` or `ERROR`. Some firmware revisions pad replies with trailing NUL
//! bytes or stray `O` characters, which are ignored when matching.

use crate::error::ResponseError;
use std::fmt;

/// Tag that starts every request and every power state reply.
pub const PREFIX: &str = "PW=";

/// Line terminator appended to requests.
pub const SUFFIX: &str = "\r\n";

/// Characters stripped from the end of a reply before it is matched.
const REPLY_PADDING: &[char] = &['\0', 'O'];

/// Request sent to the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Command {
    /// Cut power.
    TurnOff,
    /// Restore power.
    TurnOn,
    /// Ask for the current power state.
    Inquire,
}

impl Command {
    /// Wire code for this command.
    ///
    /// Only `TurnOff` and `TurnOn` have documented codes. Every other command,
    /// `Inquire` included, falls back to `"?"`. The firmware has not been seen
    /// to document `"?"` as a status query, so this mapping is kept as is
    /// rather than guessed at.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TurnOff => "0",
            Self::TurnOn => "1",
            Self::Inquire => "?",
        }
    }

    /// Look a command up by its wire code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::TurnOff),
            "1" => Some(Self::TurnOn),
            "?" => Some(Self::Inquire),
            _ => None,
        }
    }

    /// Full request line, terminator included.
    #[must_use]
    pub fn encode(self) -> String {
        format!("{PREFIX}{}{SUFFIX}", self.code())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Reply received from the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Response {
    /// Power is off.
    Off,
    /// Power is on.
    On,
    /// Command accepted.
    Ok,
}

impl Response {
    /// Lowercase name used for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Ok => "ok",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse one reply line (without its terminator).
pub fn parse_response(line: &str) -> Result<Response, ResponseError> {
    let trimmed = line.trim_end_matches(REPLY_PADDING);

    match trimmed.strip_prefix(PREFIX) {
        Some("0") => return Ok(Response::Off),
        Some("1") => return Ok(Response::On),
        _ => {},
    }

    match trimmed {
        "OK" => Ok(Response::Ok),
        "ERROR" => Err(ResponseError::Device),
        _ => Err(ResponseError::Invalid(line.to_string())),
    }
}

impl std::str::FromStr for Response {
    type Err = ResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_response(s)
    }
}
