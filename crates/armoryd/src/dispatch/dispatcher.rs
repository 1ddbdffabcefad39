//! The console command dispatcher.
//!
//! A [`Dispatcher`] turns one line into one [`Outcome`]. It is shared by
//! every session thread through an `Arc`, takes `&self`, and holds no lock
//! while a command runs: capability handles serialise their own hardware
//! access.

use std::sync::Arc;
use std::time::Instant;

use armory_board::Board;
use tracing::{debug, warn};

use super::errors::{DispatchError, FailureCategory};
use super::handlers::{
    bus, clock, crypto, diagnostics, fuse, led, memory, network, storage, system,
};
use super::router::{DISPATCH_TARGET, Invocation, Router};
use super::session::SessionRegistry;
use super::signature::Command;

/// Reply sent when a session ends.
pub const LOGOUT: &str = "logout";

/// Result of dispatching one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send the text and keep reading.
    Reply(String),
    /// Send the text and end the session.
    Terminate(String),
}

impl Outcome {
    /// Returns the text to send.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Reply(text) | Self::Terminate(text) => text,
        }
    }

    /// Returns `true` when the session should end after the reply.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminate(_))
    }
}

/// Routes, validates and executes console commands against a board.
#[derive(Debug)]
pub struct Dispatcher {
    board: Board,
    sessions: Arc<SessionRegistry>,
    router: Router,
    started: Instant,
}

impl Dispatcher {
    /// Creates a dispatcher over `board`, reporting `sessions` in `stackall`.
    #[must_use]
    pub fn new(board: Board, sessions: Arc<SessionRegistry>) -> Self {
        Self {
            board,
            sessions,
            router: Router::new(),
            started: Instant::now(),
        }
    }

    /// Returns the board commands operate on.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the session registry.
    #[must_use]
    pub const fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Dispatches one line. Failures become reply text; only `exit` and
    /// `quit` terminate.
    pub fn dispatch(&self, line: &str) -> Outcome {
        let Some(invocation) = self.router.route(line) else {
            let error = DispatchError::UnknownCommand;
            debug!(
                target: DISPATCH_TARGET,
                category = error.category().as_str(),
                "no command matched"
            );
            return Outcome::Reply(error.to_string());
        };

        let keyword = invocation.keyword();
        match self.execute(&invocation) {
            Ok(outcome) => {
                debug!(target: DISPATCH_TARGET, keyword, "command completed");
                outcome
            }
            Err(error) => {
                let category = error.category();
                if category == FailureCategory::Accessor {
                    warn!(
                        target: DISPATCH_TARGET,
                        keyword,
                        category = category.as_str(),
                        %error,
                        "command failed"
                    );
                } else {
                    debug!(
                        target: DISPATCH_TARGET,
                        keyword,
                        category = category.as_str(),
                        %error,
                        "command rejected"
                    );
                }
                Outcome::Reply(error.to_string())
            }
        }
    }

    fn execute(&self, invocation: &Invocation<'_>) -> Result<Outcome, DispatchError> {
        let board = &self.board;
        let tokens = invocation.arguments();
        let reply = match invocation.command() {
            Command::Exit => return Ok(Outcome::Terminate(LOGOUT.to_owned())),
            Command::Help => system::HELP.to_owned(),
            Command::Info => system::info(board, self.started.elapsed()),
            Command::Rand => system::random(board)?,
            Command::Reboot => system::reboot(board)?,
            Command::SelfTest => system::self_test(board),
            Command::Stack => diagnostics::stack(),
            Command::StackAll => diagnostics::stack_all(&self.sessions),
            Command::ShowDate => clock::show(board)?,
            Command::SetDate => clock::set(board, tokens)?,
            Command::Resolve => network::resolve(board, tokens)?,
            Command::Fetch => network::fetch(board, tokens)?,
            Command::I2cRead => bus::read(board, tokens)?,
            Command::CardRead => storage::read(board, tokens)?,
            Command::MemoryDisplay => memory::display(board, tokens)?,
            Command::MemoryWrite => memory::write(board, tokens)?,
            Command::Led => led::set(board, tokens)?,
            Command::CipherBenchmark => crypto::benchmark(board, tokens)?,
            Command::FuseRead => fuse::read(board, tokens)?,
        };
        Ok(Outcome::Reply(reply))
    }
}
