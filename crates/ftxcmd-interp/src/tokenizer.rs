//! Line and token splitting, plus the numeric token parsers shared by the
//! command grammars.
//!
//! A line is split on `;` into sub-commands (trimmed, empties kept so they
//! can be reported). A sub-command is split on single spaces with no quoting,
//! so joining its tokens with `" "` gives back the sub-command exactly.

use ftxcmd_core::{Price, Size};
use rust_decimal::Decimal;

use crate::error::{CommandError, CommandResult};

/// Price sigil accepted in front of price tokens (`@8600`).
pub const PRICE_SIGIL: char = '@';

/// Split a raw line into trimmed sub-commands, keeping empty ones.
pub fn split_commands(raw: &str) -> Vec<&str> {
    raw.split(';').map(str::trim).collect()
}

/// Split a sub-command into tokens on single spaces.
pub fn tokens(command: &str) -> Vec<&str> {
    command.split(' ').collect()
}

/// Session-ending input handled by the REPL driver.
pub fn is_quit(line: &str) -> bool {
    matches!(line.trim(), "q" | "quit" | "exit")
}

/// Drop one leading `@`.
pub fn strip_sigil(token: &str) -> &str {
    token.strip_prefix(PRICE_SIGIL).unwrap_or(token)
}

/// Parse a strictly positive size, or report "missing size".
pub(crate) fn parse_size(token: Option<&str>) -> CommandResult<Size> {
    token
        .and_then(|t| t.parse::<Size>().ok())
        .filter(Size::is_positive)
        .ok_or_else(|| CommandError::malformed("missing size"))
}

/// Parse a decimal after stripping the sigil. `None` for a bare sigil.
pub(crate) fn parse_decimal(token: &str, what: &str) -> CommandResult<Option<Decimal>> {
    let stripped = strip_sigil(token);
    if stripped.is_empty() {
        return Ok(None);
    }
    stripped
        .parse::<Decimal>()
        .map(Some)
        .map_err(|_| CommandError::malformed(format!("{what} is not a number: {token}")))
}

/// Parse a strictly positive price after stripping the sigil.
pub(crate) fn parse_price(token: &str, what: &str) -> CommandResult<Option<Price>> {
    match parse_decimal(token, what)? {
        None => Ok(None),
        Some(value) if value > Decimal::ZERO => Ok(Some(Price::new(value))),
        Some(_) => Err(CommandError::malformed(format!(
            "{what} must be positive: {token}"
        ))),
    }
}
