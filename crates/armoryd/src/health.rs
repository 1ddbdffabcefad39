//! Lifecycle events of the console, from bootstrap to shutdown.

use std::sync::Arc;

use tracing::{error, info};

use armory_board::BoardInfo;
use armory_config::{Config, SocketEndpoint};

use crate::bootstrap::BootstrapError;
use crate::dispatch::SessionRecord;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Receives console lifecycle events.
///
/// Session events arrive from session threads, so implementations must be
/// shareable.
pub trait HealthReporter: Send + Sync {
    /// Configuration is about to be loaded.
    fn bootstrap_starting(&self);

    /// Configuration, telemetry, socket directory and board are ready.
    fn bootstrap_succeeded(&self, config: &Config, board: &BoardInfo);

    /// Bootstrap stopped at `error`.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// The socket is bound; `endpoint` carries the real port.
    fn listener_ready(&self, endpoint: &SocketEndpoint);

    /// An operator connected.
    fn session_opened(&self, session: &SessionRecord);

    /// An operator left; `session.commands` counts dispatched lines.
    fn session_closed(&self, session: &SessionRecord);

    /// The host asked the console to stop.
    fn shutdown_requested(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config, board: &BoardInfo) {
        (**self).bootstrap_succeeded(config, board);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        (**self).listener_ready(endpoint);
    }

    fn session_opened(&self, session: &SessionRecord) {
        (**self).session_opened(session);
    }

    fn session_closed(&self, session: &SessionRecord) {
        (**self).session_closed(session);
    }

    fn shutdown_requested(&self) {
        (**self).shutdown_requested();
    }
}

/// Reports every event as a `tracing` event under the `armoryd::health`
/// target, tagged with an `event` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Creates the reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        info!(target: HEALTH_TARGET, event = "bootstrap_starting", "bootstrapping console");
    }

    fn bootstrap_succeeded(&self, config: &Config, board: &BoardInfo) {
        info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            socket = %config.console_socket(),
            filter = %config.log_filter(),
            format = %config.log_format(),
            board = %board.board,
            soc = %board.soc,
            "console ready to bind"
        );
    }

    fn bootstrap_failed(&self, failure: &BootstrapError) {
        error!(target: HEALTH_TARGET, event = "bootstrap_failed", %failure, "console did not start");
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        info!(target: HEALTH_TARGET, event = "listener_ready", %endpoint, "console accepting operators");
    }

    fn session_opened(&self, session: &SessionRecord) {
        info!(
            target: HEALTH_TARGET,
            event = "session_opened",
            session = session.id,
            peer = %session.peer,
            "operator connected"
        );
    }

    fn session_closed(&self, session: &SessionRecord) {
        info!(
            target: HEALTH_TARGET,
            event = "session_closed",
            session = session.id,
            peer = %session.peer,
            commands = session.commands,
            "operator disconnected"
        );
    }

    fn shutdown_requested(&self) {
        info!(target: HEALTH_TARGET, event = "shutdown_requested", "console stopping");
    }
}
