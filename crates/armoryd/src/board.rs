//! Construction of the board the console operates on.
//!
//! The daemon never builds capabilities itself; it asks a [`BoardProvider`]
//! so tests can substitute doubles and a hardware build can substitute real
//! drivers.

use std::sync::Arc;
use std::time::Duration;

use armory_board::sim::{self, SimProfile};
use armory_board::{Board, HostNetwork};
use armory_config::Config;
use thiserror::Error;

/// Smallest card that can hold a boot sector.
const MIN_CARD_BYTES: u32 = 512;

/// Errors surfaced while building a board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A configured dimension cannot describe a usable board.
    #[error("invalid board setting {field}: {reason}")]
    InvalidProfile {
        /// Configuration field at fault.
        field: &'static str,
        /// Why the value was refused.
        reason: String,
    },
}

impl BoardError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            field,
            reason: reason.into(),
        }
    }
}

/// Factory for the capability set handed to the dispatcher.
pub trait BoardProvider: Send + Sync {
    /// Builds a board for the resolved configuration.
    fn build(&self, config: &Config) -> Result<Board, BoardError>;
}

/// Builds the in-memory board with the host network stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedBoardProvider;

impl BoardProvider for SimulatedBoardProvider {
    fn build(&self, config: &Config) -> Result<Board, BoardError> {
        let profile = sim_profile(config)?;
        let network = HostNetwork::new(Duration::from_secs(config.http_timeout_secs));
        Ok(sim::board(&profile, Arc::new(network)))
    }
}

/// Derives a simulated board shape from configuration.
///
/// # Errors
///
/// Returns [`BoardError::InvalidProfile`] for an empty memory window, a card
/// too small for a boot sector, an empty fuse array, or a zero HTTP timeout.
pub fn sim_profile(config: &Config) -> Result<SimProfile, BoardError> {
    if config.memory_bytes == 0 {
        return Err(BoardError::invalid("memory_bytes", "must be greater than zero"));
    }
    if config.mmc_cards > 0 && config.card_bytes < MIN_CARD_BYTES {
        return Err(BoardError::invalid(
            "card_bytes",
            format!("must be at least {MIN_CARD_BYTES}"),
        ));
    }
    if config.otp_banks == 0 || config.otp_words == 0 {
        let field = if config.otp_banks == 0 {
            "otp_banks"
        } else {
            "otp_words"
        };
        return Err(BoardError::invalid(field, "must be greater than zero"));
    }
    if config.http_timeout_secs == 0 {
        return Err(BoardError::invalid(
            "http_timeout_secs",
            "must be greater than zero",
        ));
    }
    Ok(SimProfile {
        board_name: config.board_name.clone(),
        memory_bytes: config.memory_bytes,
        i2c_buses: config.i2c_buses,
        mmc_cards: config.mmc_cards,
        card_bytes: config.card_bytes,
        otp_banks: config.otp_banks,
        otp_words: config.otp_words,
    })
}
