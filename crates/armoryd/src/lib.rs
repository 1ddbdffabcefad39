//! The armory console daemon.
//!
//! `armoryd` serves an interactive, line-oriented console over a TCP or Unix
//! socket. Every line names one operation on the board: reading and writing
//! raw memory, reading I2C registers and SD/MMC blocks, reading OTP fuses,
//! switching LEDs, setting the clock, benchmarking the AES engine, resolving
//! names and fetching URLs. Replies are plain text.
//!
//! The bootstrap sequence loads configuration through [`armory_config`],
//! initialises structured telemetry, prepares the socket filesystem and asks
//! a [`BoardProvider`] for the capability set. [`Console::start`] then binds
//! the listener and serves each connection on its own thread, all of them
//! sharing one [`Dispatcher`].
//!
//! ## Safety policy
//!
//! Commands are validated in full before any capability is called: a
//! malformed address, an unaligned memory access, an oversized read or an
//! out-of-range bus or card index is rejected without touching hardware.
//! Reads are capped at 102,400 bytes and input lines at
//! [`MAX_LINE_BYTES`]. No failure closes a session; only `exit` and `quit`
//! do.

mod board;
mod bootstrap;
mod dispatch;
mod health;
mod process;
mod telemetry;
mod transport;

pub use board::{BoardError, BoardProvider, SimulatedBoardProvider, sim_profile};
pub use bootstrap::{
    BootstrapError, ConfigLoader, Console, RunningConsole, StaticConfigLoader, SystemConfigLoader,
    bootstrap_with,
};
pub use dispatch::{
    DispatchError, Dispatcher, FailureCategory, LOGOUT, MAX_LINE_BYTES, Outcome, SessionGuard,
    SessionRecord, SessionRegistry, SessionState,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
