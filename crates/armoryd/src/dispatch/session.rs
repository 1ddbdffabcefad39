//! Bookkeeping for connected console sessions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Reading and answering commands.
    Open,
    /// A termination was requested; the final reply is being sent.
    Closing,
    /// The transport has been released.
    Closed,
}

impl SessionState {
    /// Returns the lowercase label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-in-time view of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Identifier, unique for the life of the process.
    pub id: u64,
    /// Remote peer label.
    pub peer: String,
    /// Name of the thread serving the session.
    pub thread: String,
    /// Lifecycle state.
    pub state: SessionState,
    /// Number of lines dispatched.
    pub commands: u64,
    /// Most recent line dispatched.
    pub last_command: Option<String>,
}

/// Registry of live sessions shared by the listener and the dispatcher.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    sessions: Mutex<BTreeMap<u64, SessionRecord>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session served by the calling thread.
    ///
    /// The session stays listed until the returned guard is finished or
    /// dropped.
    pub fn open(self: &Arc<Self>, peer: impl Into<String>) -> SessionGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let thread = thread::current().name().unwrap_or("<unnamed>").to_owned();
        let record = SessionRecord {
            id,
            peer: peer.into(),
            thread,
            state: SessionState::Open,
            commands: 0,
            last_command: None,
        };
        self.lock().insert(id, record);
        SessionGuard {
            registry: Arc::clone(self),
            id,
        }
    }

    /// Returns every live session ordered by identifier.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SessionRecord> {
        self.lock().values().cloned().collect()
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<u64, SessionRecord>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, id: u64, change: impl FnOnce(&mut SessionRecord)) {
        if let Some(record) = self.lock().get_mut(&id) {
            change(record);
        }
    }

    fn remove(&self, id: u64) -> Option<SessionRecord> {
        self.lock().remove(&id).map(|mut record| {
            record.state = SessionState::Closed;
            record
        })
    }
}

/// Keeps a session registered while it is being served.
#[derive(Debug)]
pub struct SessionGuard {
    registry: Arc<SessionRegistry>,
    id: u64,
}

impl SessionGuard {
    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the current record for this session.
    #[must_use]
    pub fn record(&self) -> Option<SessionRecord> {
        self.registry.lock().get(&self.id).cloned()
    }

    /// Counts a dispatched line.
    pub fn record_command(&self, line: &str) {
        self.registry.update(self.id, |record| {
            record.commands += 1;
            record.last_command = Some(line.to_owned());
        });
    }

    /// Marks the session as closing.
    pub fn begin_closing(&self) {
        self.registry.update(self.id, |record| {
            record.state = SessionState::Closing;
        });
    }

    /// Unregisters the session and returns its final record.
    #[must_use]
    pub fn finish(self) -> Option<SessionRecord> {
        self.registry.remove(self.id)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}
