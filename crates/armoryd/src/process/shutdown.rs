//! Waiting for the operator of the host to stop the console.

use std::ffi::c_int;
use std::io;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

/// Signals that end the console process.
const STOP_SIGNALS: [c_int; 4] = [SIGTERM, SIGINT, SIGQUIT, SIGHUP];

/// Blocks the launching thread until the console should stop.
pub trait ShutdownSignal: Send + Sync {
    /// Returns once shutdown has been requested.
    fn wait(&self) -> Result<(), ShutdownError>;
}

/// The stop request could not be awaited.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Signal handlers could not be registered.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// OS error from registration.
        #[source]
        source: io::Error,
    },
}

/// Waits for SIGTERM, SIGINT, SIGQUIT or SIGHUP.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdownSignal;

impl SystemShutdownSignal {
    /// Creates the waiter. Handlers are registered when [`wait`] runs.
    ///
    /// [`wait`]: ShutdownSignal::wait
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut signals =
            Signals::new(STOP_SIGNALS).map_err(|source| ShutdownError::Install { source })?;
        let received = signals.forever().next();
        info!(target: PROCESS_TARGET, signal = ?received, "stopping console");
        Ok(())
    }
}
