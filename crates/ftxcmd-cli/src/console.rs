//! Terminal output for the REPL.

use std::io::{self, Write};

use crossterm::style::Stylize;
use ftxcmd_interp::{Reporter, Session};

/// Prints command outcomes to stdout: successes green, errors red.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn line(&self, text: String) {
        let mut out = io::stdout().lock();
        // A closed stdout leaves nothing to report to.
        let _ = writeln!(out, "{text}");
    }

    /// Startup banner with the seeded session state.
    pub fn banner(&self, session: &Session) {
        let market = session
            .market
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        let ceiling = session
            .ceiling
            .map_or_else(|| "not set".to_string(), |c| c.to_string());
        let text = format!(
            "ftxcmd {} | instrument: {market} | fatfinger: {ceiling} | help for commands, q to quit",
            env!("CARGO_PKG_VERSION")
        );
        if self.color {
            self.line(text.blue().bold().to_string());
        } else {
            self.line(text);
        }
    }

    /// Input prompt, without a newline.
    pub fn prompt(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if self.color {
            write!(out, "{}", "> ".blue())?;
        } else {
            write!(out, "> ")?;
        }
        out.flush()
    }
}

impl Reporter for ConsoleReporter {
    fn error(&self, message: &str) {
        if self.color {
            self.line(message.red().to_string());
        } else {
            self.line(format!("error: {message}"));
        }
    }

    fn success(&self, message: &str) {
        if self.color {
            self.line(message.green().to_string());
        } else {
            self.line(message.to_string());
        }
    }
}
