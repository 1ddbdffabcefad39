//! Connection handler that runs an interactive console session.
//!
//! This module provides the `ConsoleConnectionHandler`, which implements the
//! transport layer's `ConnectionHandler`. Each accepted connection becomes a
//! session: lines are read one at a time, dispatched, and answered before the
//! next line is read, until the operator logs out or the peer closes the
//! stream.

use std::io::{self, Read, Write};
use std::mem;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::health::HealthReporter;
use crate::transport::{ConnectionHandler, ConnectionStream};

use super::dispatcher::Dispatcher;
use super::errors::DispatchError;
use super::response::ResponseWriter;
use super::router::DISPATCH_TARGET;
use super::session::SessionGuard;

/// Longest accepted line in bytes, excluding the newline.
pub const MAX_LINE_BYTES: usize = 4096;

/// Serves console sessions over accepted connections.
pub struct ConsoleConnectionHandler {
    dispatcher: Arc<Dispatcher>,
    reporter: Arc<dyn HealthReporter>,
}

impl ConsoleConnectionHandler {
    /// Creates a handler dispatching into `dispatcher`.
    pub fn new(dispatcher: Arc<Dispatcher>, reporter: Arc<dyn HealthReporter>) -> Self {
        Self {
            dispatcher,
            reporter,
        }
    }

    fn serve(&self, mut stream: ConnectionStream) {
        let session = self.dispatcher.sessions().open(stream.peer_label());
        if let Some(record) = session.record() {
            self.reporter.session_opened(&record);
        }

        if let Err(error) = self.run_session(&mut stream, &session) {
            warn!(
                target: DISPATCH_TARGET,
                session = session.id(),
                category = error.category().as_str(),
                %error,
                "session ended abnormally"
            );
        }

        if let Some(record) = session.finish() {
            self.reporter.session_closed(&record);
        }
    }

    fn run_session<S: Read + Write>(
        &self,
        stream: &mut S,
        session: &SessionGuard,
    ) -> Result<(), DispatchError> {
        let mut lines = LineReader::new(MAX_LINE_BYTES);
        loop {
            let line = match lines.next_line(stream)? {
                Some(Line::Complete(line)) => line,
                Some(Line::Oversized) => {
                    let error = DispatchError::line_too_long(MAX_LINE_BYTES);
                    debug!(
                        target: DISPATCH_TARGET,
                        session = session.id(),
                        category = error.category().as_str(),
                        "discarded oversized line"
                    );
                    ResponseWriter::new(&mut *stream).write_reply(&error.to_string())?;
                    continue;
                }
                None => {
                    debug!(target: DISPATCH_TARGET, session = session.id(), "peer closed session");
                    return Ok(());
                }
            };

            session.record_command(line.trim());
            let outcome = self.dispatcher.dispatch(&line);
            if outcome.is_terminal() {
                session.begin_closing();
            }
            ResponseWriter::new(&mut *stream).write_reply(outcome.text())?;
            if outcome.is_terminal() {
                return Ok(());
            }
        }
    }
}

impl ConnectionHandler for ConsoleConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.serve(stream);
    }
}

/// One unit of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// A line within the limit, newline removed. Invalid UTF-8 is replaced.
    Complete(String),
    /// A line over the limit; its bytes were discarded.
    Oversized,
}

/// Splits a byte stream into bounded lines.
///
/// Bytes past the current line stay buffered for the next call. An
/// oversized line is dropped as it arrives, so memory stays bounded by the
/// limit no matter how long the line runs.
#[derive(Debug)]
struct LineReader {
    pending: Vec<u8>,
    limit: usize,
    discarding: bool,
    eof: bool,
}

impl LineReader {
    fn new(limit: usize) -> Self {
        Self {
            pending: Vec::new(),
            limit,
            discarding: false,
            eof: false,
        }
    }

    /// Returns the next line, or `None` once the stream is exhausted. A
    /// final line without a newline is still returned.
    fn next_line<R: Read>(&mut self, reader: &mut R) -> io::Result<Option<Line>> {
        let mut chunk = [0_u8; 1024];
        loop {
            if let Some(position) = self.pending.iter().position(|byte| *byte == b'\n') {
                let rest = self.pending.split_off(position + 1);
                let mut line = mem::replace(&mut self.pending, rest);
                line.pop();
                return Ok(Some(self.finish_line(&line)));
            }

            if self.pending.len() > self.limit {
                self.pending.clear();
                self.discarding = true;
            }

            if self.eof {
                if !self.discarding && self.pending.is_empty() {
                    return Ok(None);
                }
                let line = mem::take(&mut self.pending);
                return Ok(Some(self.finish_line(&line)));
            }

            let read = read_with_retry(reader, &mut chunk)?;
            if read == 0 {
                self.eof = true;
                continue;
            }
            self.pending
                .extend_from_slice(chunk.get(..read).unwrap_or_default());
        }
    }

    fn finish_line(&mut self, line: &[u8]) -> Line {
        if mem::take(&mut self.discarding) || line.len() > self.limit {
            return Line::Oversized;
        }
        Line::Complete(String::from_utf8_lossy(line).into_owned())
    }
}

fn read_with_retry<R: Read>(reader: &mut R, chunk: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(chunk) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}
