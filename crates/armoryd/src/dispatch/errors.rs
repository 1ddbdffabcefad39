//! Error types for console command failures.
//!
//! Every variant renders as the text an operator sees in place of a command
//! result. None of them closes the session; the category only steers logging.

use std::io;

use armory_board::{AccessError, NetworkError};
use thiserror::Error;

/// How a failed command went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// The line matched no command signature.
    NoMatch,
    /// An argument or a documented constraint was rejected before any I/O.
    Validation,
    /// The capability performing the I/O reported an error.
    Accessor,
    /// Reading from or writing to the session failed.
    Transport,
}

impl FailureCategory {
    /// Returns the label used in structured logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMatch => "no_match",
            Self::Validation => "validation",
            Self::Accessor => "accessor",
            Self::Transport => "transport",
        }
    }
}

/// Errors surfaced while dispatching a console line.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No signature accepts the line.
    #[error("unknown command, type `help`")]
    UnknownCommand,

    /// An argument failed conversion or a bound.
    #[error("invalid {argument}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// A memory display was not word aligned.
    #[error("please only perform 32-bit aligned accesses")]
    Unaligned,

    /// A read asked for more than the dump limit.
    #[error("please only use a size argument <= {limit}")]
    SizeLimit { limit: usize },

    /// The I2C bus number is zero or past the last bus.
    #[error("invalid bus index")]
    BusIndex,

    /// The card number is past the last slot.
    #[error("invalid card index")]
    CardIndex,

    /// A session line was longer than the line bound.
    #[error("line exceeds {limit} byte limit")]
    LineTooLong { limit: usize },

    /// A hardware capability failed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Name resolution failed.
    #[error("query error: {0}")]
    Query(#[source] NetworkError),

    /// An HTTP fetch failed.
    #[error("get error: {0}")]
    Fetch(#[source] NetworkError),

    /// The clock could not be rendered.
    #[error("clock error: {0}")]
    Clock(#[from] time::error::Format),

    /// Session I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DispatchError {
    /// Classifies the failure.
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::UnknownCommand => FailureCategory::NoMatch,
            Self::InvalidArgument { .. }
            | Self::Unaligned
            | Self::SizeLimit { .. }
            | Self::BusIndex
            | Self::CardIndex
            | Self::LineTooLong { .. } => FailureCategory::Validation,
            Self::Access(_) | Self::Query(_) | Self::Fetch(_) | Self::Clock(_) => {
                FailureCategory::Accessor
            }
            Self::Io(_) => FailureCategory::Transport,
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Creates a size limit error.
    pub fn size_limit(limit: usize) -> Self {
        Self::SizeLimit { limit }
    }

    /// Creates an oversized line error.
    pub fn line_too_long(limit: usize) -> Self {
        Self::LineTooLong { limit }
    }
}
