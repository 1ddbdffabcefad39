use crate::logging::LogFormat;
use crate::socket::SocketEndpoint;

/// Loopback address the console listens on unless configured otherwise.
pub const DEFAULT_CONSOLE_HOST: &str = "127.0.0.1";

/// TCP port the console listens on unless configured otherwise.
pub const DEFAULT_CONSOLE_PORT: u16 = 2323;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Board name reported by `info` on the simulated board.
pub const DEFAULT_BOARD_NAME: &str = "usbarmory-sim";

/// Size of the simulated memory window in bytes.
pub const DEFAULT_MEMORY_BYTES: u32 = 1024 * 1024;

/// Number of simulated I2C buses.
pub const DEFAULT_I2C_BUSES: u8 = 2;

/// Number of simulated SD/MMC cards.
pub const DEFAULT_MMC_CARDS: u8 = 2;

/// Capacity of each simulated card in bytes.
pub const DEFAULT_CARD_BYTES: u32 = 1024 * 1024;

/// Number of OTP fuse banks.
pub const DEFAULT_OTP_BANKS: u32 = 16;

/// Number of words in each OTP fuse bank.
pub const DEFAULT_OTP_WORDS: u32 = 8;

/// Timeout applied to `curl` requests.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default log filter expression used by the daemon.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned board name used by the configuration defaults layer.
#[must_use]
pub fn default_board_name() -> String {
    DEFAULT_BOARD_NAME.to_owned()
}

/// Endpoint the console listener binds when nothing else is configured.
#[must_use]
pub fn default_console_socket() -> SocketEndpoint {
    SocketEndpoint::tcp(DEFAULT_CONSOLE_HOST, DEFAULT_CONSOLE_PORT)
}
