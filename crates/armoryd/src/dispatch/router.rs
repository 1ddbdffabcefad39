//! Line routing for console commands.
//!
//! A line is trimmed and split on whitespace. Argument-free commands are
//! matched as exact literals first; otherwise the leading token selects
//! signatures by keyword and the remaining tokens must fill that signature's
//! slots exactly. Anything else is a non-match.

use tracing::trace;

use super::signature::{Command, LITERALS, SIGNATURES, Signature};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// A routed line: the command it names and its raw argument tokens.
///
/// Tokens borrow from the line, so an invocation cannot outlive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Invocation<'line> {
    command: Command,
    keyword: &'static str,
    arguments: Vec<&'line str>,
}

impl<'line> Invocation<'line> {
    pub(crate) fn command(&self) -> Command {
        self.command
    }

    pub(crate) fn keyword(&self) -> &'static str {
        self.keyword
    }

    pub(crate) fn arguments(&self) -> &[&'line str] {
        &self.arguments
    }
}

/// Matches lines against a fixed literal list and signature table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Router {
    literals: &'static [(&'static str, Command)],
    signatures: &'static [Signature],
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a router over the built-in command table.
    pub(crate) const fn new() -> Self {
        Self {
            literals: LITERALS,
            signatures: SIGNATURES,
        }
    }

    /// Resolves `line` to an invocation, or `None` when nothing matches.
    pub(crate) fn route<'line>(&self, line: &'line str) -> Option<Invocation<'line>> {
        let line = line.trim();

        if let Some((keyword, command)) = self.literals.iter().find(|(word, _)| *word == line) {
            return Some(Invocation {
                command: *command,
                keyword,
                arguments: Vec::new(),
            });
        }

        let mut tokens = line.split_whitespace();
        let keyword = tokens.next()?;
        let arguments: Vec<&str> = tokens.collect();

        let mut candidates = self
            .signatures
            .iter()
            .filter(|signature| signature.keyword == keyword);
        let Some(signature) = candidates
            .clone()
            .find(|signature| signature.accepts(&arguments))
        else {
            if let Some(slot) = candidates
                .find(|signature| signature.slots.len() == arguments.len())
                .and_then(|signature| signature.rejected_slot(&arguments))
            {
                trace!(target: DISPATCH_TARGET, keyword, slot, "token rejected by slot class");
            }
            return None;
        };

        trace!(
            target: DISPATCH_TARGET,
            keyword = signature.keyword,
            arguments = arguments.len(),
            "matched signature"
        );

        Some(Invocation {
            command: signature.command,
            keyword: signature.keyword,
            arguments,
        })
    }
}
