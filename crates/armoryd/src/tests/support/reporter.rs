//! Test double for [`HealthReporter`] that records lifecycle events.

use std::sync::Mutex;

use armory_board::BoardInfo;
use armory_config::{Config, SocketEndpoint};

use crate::bootstrap::BootstrapError;
use crate::dispatch::SessionRecord;
use crate::health::HealthReporter;

/// Lifecycle events observed during a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded { board: String },
    BootstrapFailed(String),
    ListenerReady(String),
    SessionOpened(u64),
    SessionClosed { id: u64, commands: u64 },
    ShutdownRequested,
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    pub fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config, board: &BoardInfo) {
        self.record(HealthEvent::BootstrapSucceeded {
            board: board.board.clone(),
        });
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        self.record(HealthEvent::ListenerReady(endpoint.to_string()));
    }

    fn session_opened(&self, session: &SessionRecord) {
        self.record(HealthEvent::SessionOpened(session.id));
    }

    fn session_closed(&self, session: &SessionRecord) {
        self.record(HealthEvent::SessionClosed {
            id: session.id,
            commands: session.commands,
        });
    }

    fn shutdown_requested(&self) {
        self.record(HealthEvent::ShutdownRequested);
    }
}
