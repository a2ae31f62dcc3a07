//! Application wiring and the read-eval loop.

use std::sync::Arc;

use ftxcmd_client::{ClientError, Credentials, DynExchange, RestClient, RestClientConfig};
use ftxcmd_core::{MarketName, Size};
use ftxcmd_interp::{is_quit, Interpreter, Session};
use ftxcmd_risk::FatFingerCeiling;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::{AppConfig, CredentialsConfig};
use crate::console::ConsoleReporter;
use crate::error::{AppError, AppResult};

/// Session values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct SessionOverrides {
    pub market: Option<String>,
    pub fatfinger: Option<Decimal>,
}

/// Build the startup session from config and overrides.
pub fn initial_session(config: &AppConfig, overrides: &SessionOverrides) -> AppResult<Session> {
    let mut session = Session::new();

    if let Some(name) = overrides.market.as_ref().or(config.session.market.as_ref()) {
        session.market = Some(MarketName::new(name)?);
    }
    if let Some(value) = overrides.fatfinger.or(config.session.fatfinger) {
        session.ceiling = Some(FatFingerCeiling::new(Size::new(value))?);
    }

    Ok(session)
}

/// Load the keys file into the environment, then read the credentials.
pub fn load_credentials(
    config: &CredentialsConfig,
    subaccount: Option<String>,
) -> AppResult<Credentials> {
    match dotenvy::from_filename(&config.keys_file) {
        Ok(path) => info!(path = %path.display(), "Loaded keys file"),
        Err(e) if e.not_found() => {
            warn!(path = %config.keys_file, "Keys file not found, using environment only");
        }
        Err(e) => {
            return Err(AppError::Config(format!(
                "Failed to read keys file {}: {e}",
                config.keys_file
            )))
        }
    }

    Ok(Credentials::from_env(
        &config.key_var,
        &config.secret_var,
        subaccount,
    )?)
}

/// Main application.
pub struct Application {
    interpreter: Interpreter<DynExchange, ConsoleReporter>,
    session: Session,
}

impl Application {
    /// Create the application with the REST exchange.
    ///
    /// Missing keys are not fatal: the session starts and every exchange
    /// command reports the credentials error.
    pub fn new(config: AppConfig, overrides: SessionOverrides) -> AppResult<Self> {
        let session = initial_session(&config, &overrides)?;
        let transport = RestClientConfig {
            endpoint: config.exchange.endpoint.clone(),
            timeout: config.exchange.timeout(),
        };
        let client =
            match load_credentials(&config.credentials, config.exchange.subaccount.clone()) {
                Ok(credentials) => RestClient::new(transport, credentials)?,
                Err(AppError::Client(ClientError::Credentials(reason))) => {
                    warn!(%reason, "No API credentials, exchange commands will fail");
                    RestClient::unauthenticated(transport)?
                }
                Err(e) => return Err(e),
            };

        Ok(Self::with_exchange(
            Arc::new(client),
            ConsoleReporter::new(config.console.color),
            session,
        ))
    }

    /// Create the application around any exchange implementation.
    pub fn with_exchange(exchange: DynExchange, reporter: ConsoleReporter, session: Session) -> Self {
        Self {
            interpreter: Interpreter::new(exchange, reporter),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run a single command line.
    pub async fn run_line(&mut self, line: &str) {
        self.interpreter.handle_line(&mut self.session, line).await;
    }

    /// Interactive loop on stdin.
    pub async fn run(&mut self) -> AppResult<()> {
        self.interpreter.reporter().banner(&self.session);
        self.run_from(BufReader::new(tokio::io::stdin())).await
    }

    /// Read lines until EOF or a quit word. Blank lines are skipped.
    pub async fn run_from<R: AsyncBufRead + Unpin>(&mut self, reader: R) -> AppResult<()> {
        let mut lines = reader.lines();
        loop {
            self.interpreter.reporter().prompt()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if is_quit(line) {
                break;
            }
            self.interpreter.handle_line(&mut self.session, line).await;
        }
        info!("Session ended");
        Ok(())
    }
}
