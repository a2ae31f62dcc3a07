//! Command error types.

use ftxcmd_client::ClientError;
use ftxcmd_core::CoreError;
use ftxcmd_risk::FatFingerRejection;
use thiserror::Error;

/// Why a sub-command did not complete. Never fatal: the interpreter reports
/// it and moves on to the next sub-command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("malformed command: {0}")]
    MalformedCommand(String),

    #[error("no instrument selected, use: instrument MARKET")]
    MissingMarket,

    #[error(transparent)]
    MissingFatFinger(#[from] FatFingerRejection),

    #[error("side unknown: place a buy/sell first or give the side explicitly")]
    MissingSide,

    #[error("unknown command: {0}, type help for the command list")]
    UnknownCommand(String),

    #[error("no position on {0}")]
    NoPosition(String),

    #[error("exchange error: {0}")]
    Exchange(#[from] ClientError),
}

impl CommandError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCommand(message.into())
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedCommand(_) => "malformed",
            Self::MissingMarket => "missing_market",
            Self::MissingFatFinger(_) => "fatfinger",
            Self::MissingSide => "missing_side",
            Self::UnknownCommand(_) => "unknown_command",
            Self::NoPosition(_) => "no_position",
            Self::Exchange(_) => "exchange",
        }
    }
}

impl From<CoreError> for CommandError {
    fn from(e: CoreError) -> Self {
        Self::MalformedCommand(e.to_string())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
