//! ftxcmd application: configuration, credentials, console and the REPL.

pub mod app;
pub mod config;
pub mod console;
pub mod error;

pub use app::{Application, SessionOverrides};
pub use config::AppConfig;
pub use console::ConsoleReporter;
pub use error::{AppError, AppResult};
