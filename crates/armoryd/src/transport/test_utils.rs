//! Connection handler that records which session thread served each
//! connection.

use std::sync::{Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use super::{ConnectionHandler, ConnectionStream};

#[derive(Default)]
pub(crate) struct RecordingHandler {
    served_by: Mutex<Vec<String>>,
    served: Condvar,
}

impl RecordingHandler {
    /// Blocks until `sessions` connections have been handled or `patience`
    /// runs out, then returns the recorded thread names.
    pub(crate) fn wait_for(&self, sessions: usize, patience: Duration) -> Vec<String> {
        let names = self
            .served_by
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (names, _) = self
            .served
            .wait_timeout_while(names, patience, |names| names.len() < sessions)
            .unwrap_or_else(PoisonError::into_inner);
        names.clone()
    }
}

impl ConnectionHandler for RecordingHandler {
    fn handle(&self, _stream: ConnectionStream) {
        let name = thread::current().name().unwrap_or("unnamed").to_owned();
        self.served_by
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name);
        self.served.notify_all();
    }
}
