//! `stack` and `stackall`: debugging aids.

use std::backtrace::Backtrace;
use std::fmt::Write as _;
use std::thread;

use crate::dispatch::session::SessionRegistry;

/// Backtrace of the calling thread, headed by the thread's name.
pub(crate) fn stack() -> String {
    let current = thread::current();
    let name = current.name().unwrap_or("<unnamed>");
    format!("thread {name:?}:\n{}", Backtrace::force_capture())
}

/// Every live session followed by the calling thread's backtrace.
pub(crate) fn stack_all(sessions: &SessionRegistry) -> String {
    let snapshot = sessions.snapshot();
    let mut out = format!("{} session(s)\n", snapshot.len());
    for record in &snapshot {
        let _ = writeln!(
            out,
            "session {} [{}] peer={} thread={} commands={} last={:?}",
            record.id,
            record.state,
            record.peer,
            record.thread,
            record.commands,
            record.last_command.as_deref().unwrap_or("")
        );
    }
    out.push('\n');
    out.push_str(&stack());
    out
}
