//! Startup: configuration, telemetry, socket directory, board.

use std::sync::Arc;

use armory_board::Board;
use armory_config::{Config, SocketEndpoint, SocketPreparationError};
use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use crate::board::{BoardError, BoardProvider};
use crate::dispatch::{ConsoleConnectionHandler, Dispatcher, SessionRegistry};
use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

/// Source of the console configuration.
pub trait ConfigLoader: Send + Sync {
    /// Resolves every configuration layer into a [`Config`].
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Reads defaults, `armory.toml`, `ARMORY_*` variables and the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Hands out a configuration built in code.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Always loads `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// The step of bootstrap that failed.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A configuration layer was unreadable or invalid.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// The tracing subscriber could not be installed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The socket directory could not be created.
    #[error("failed to prepare console socket: {source}")]
    Socket {
        /// Directory error.
        #[source]
        source: SocketPreparationError,
    },
    /// The board provider refused the configured profile.
    #[error("failed to build board: {source}")]
    Board {
        /// Underlying provider error.
        #[source]
        source: BoardError,
    },
}

/// A bootstrapped console, ready to listen.
pub struct Console {
    config: Config,
    board: Board,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Console {
    /// Configuration the console was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the board commands will operate on.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Telemetry installed during bootstrap.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Binds the configured endpoint and starts serving sessions.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the endpoint cannot be bound or the
    /// accept thread cannot start.
    pub fn start(self) -> Result<RunningConsole, ListenerError> {
        let listener = SocketListener::bind(self.config.console_socket())?;
        let sessions = Arc::new(SessionRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(self.board, Arc::clone(&sessions)));
        let handler = Arc::new(ConsoleConnectionHandler::new(
            Arc::clone(&dispatcher),
            Arc::clone(&self.reporter),
        ));
        let listener = listener.start(handler)?;
        self.reporter.listener_ready(listener.endpoint());
        Ok(RunningConsole {
            listener,
            dispatcher,
        })
    }
}

/// A console whose listener is accepting sessions.
pub struct RunningConsole {
    listener: ListenerHandle,
    dispatcher: Arc<Dispatcher>,
}

impl RunningConsole {
    /// Endpoint being served; TCP endpoints carry the bound port.
    #[must_use]
    pub fn endpoint(&self) -> &SocketEndpoint {
        self.listener.endpoint()
    }

    /// The shared dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Registry of live sessions.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        self.dispatcher.sessions()
    }

    /// Stops accepting sessions and waits for the accept loop to exit.
    /// Sessions already in progress run to completion on their own threads.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadPanic`] if the accept loop panicked.
    pub fn stop(self) -> Result<(), ListenerError> {
        self.listener.shutdown();
        self.listener.join()
    }
}

/// Bootstraps the console using the supplied collaborators.
///
/// # Errors
///
/// Returns the first failing stage as a [`BootstrapError`]; the reporter is
/// told about it before this returns.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    provider: &dyn BoardProvider,
) -> Result<Console, BootstrapError> {
    reporter.bootstrap_starting();

    let result = bootstrap_stages(loader, provider);
    match result {
        Ok((config, board, telemetry)) => {
            reporter.bootstrap_succeeded(&config, &board.soc.describe());
            Ok(Console {
                config,
                board,
                telemetry,
                reporter,
            })
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn bootstrap_stages(
    loader: &dyn ConfigLoader,
    provider: &dyn BoardProvider,
) -> Result<(Config, Board, TelemetryHandle), BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    config
        .console_socket()
        .prepare_filesystem()
        .map_err(|source| BootstrapError::Socket { source })?;
    let board = provider
        .build(&config)
        .map_err(|source| BootstrapError::Board { source })?;
    Ok((config, board, telemetry))
}
