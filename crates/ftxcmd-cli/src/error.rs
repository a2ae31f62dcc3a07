//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(#[from] ftxcmd_client::ClientError),

    #[error("Risk error: {0}")]
    Risk(#[from] ftxcmd_risk::RiskError),

    #[error("Invalid value: {0}")]
    Core(#[from] ftxcmd_core::CoreError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] ftxcmd_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
