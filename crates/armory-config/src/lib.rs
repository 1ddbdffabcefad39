//! Shared configuration for the armory console daemon.
//!
//! [`Config`] is assembled by `ortho_config` from, in increasing precedence,
//! built-in defaults, a TOML file (`.armory.toml` or `--config-path`),
//! `ARMORY_*` environment variables and command-line flags. Besides the
//! listener endpoint and logging settings it carries the sizing of the
//! simulated board, so a test rig can be shaped without recompiling.

mod defaults;
mod logging;
mod socket;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_BOARD_NAME, DEFAULT_CARD_BYTES, DEFAULT_CONSOLE_HOST, DEFAULT_CONSOLE_PORT,
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_I2C_BUSES, DEFAULT_LOG_FILTER, DEFAULT_MEMORY_BYTES,
    DEFAULT_MMC_CARDS, DEFAULT_OTP_BANKS, DEFAULT_OTP_WORDS, default_board_name,
    default_console_socket, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "ARMORY")]
pub struct Config {
    /// Endpoint the console listener binds.
    #[ortho_config(default = default_console_socket())]
    pub console_socket: SocketEndpoint,
    /// `tracing_subscriber::EnvFilter` expression.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of the tracing subscriber.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Board name reported by `info`.
    #[ortho_config(default = default_board_name())]
    pub board_name: String,
    /// Size of the simulated memory window in bytes.
    #[ortho_config(default = DEFAULT_MEMORY_BYTES)]
    pub memory_bytes: u32,
    /// Number of I2C buses exposed to `i2c`.
    #[ortho_config(default = DEFAULT_I2C_BUSES)]
    pub i2c_buses: u8,
    /// Number of SD/MMC cards exposed to `mmc`.
    #[ortho_config(default = DEFAULT_MMC_CARDS)]
    pub mmc_cards: u8,
    /// Capacity of each simulated card in bytes.
    #[ortho_config(default = DEFAULT_CARD_BYTES)]
    pub card_bytes: u32,
    /// Number of OTP fuse banks.
    #[ortho_config(default = DEFAULT_OTP_BANKS)]
    pub otp_banks: u32,
    /// Number of words in each OTP fuse bank.
    #[ortho_config(default = DEFAULT_OTP_WORDS)]
    pub otp_words: u32,
    /// Timeout applied to `curl` requests, in seconds.
    #[ortho_config(default = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,
}

impl Config {
    /// Endpoint the console listener binds.
    #[must_use]
    pub fn console_socket(&self) -> &SocketEndpoint {
        &self.console_socket
    }

    /// Log filter expression handed to the tracing subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format of the tracing subscriber.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            console_socket: default_console_socket(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            board_name: default_board_name(),
            memory_bytes: DEFAULT_MEMORY_BYTES,
            i2c_buses: DEFAULT_I2C_BUSES,
            mmc_cards: DEFAULT_MMC_CARDS,
            card_bytes: DEFAULT_CARD_BYTES,
            otp_banks: DEFAULT_OTP_BANKS,
            otp_words: DEFAULT_OTP_WORDS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}
