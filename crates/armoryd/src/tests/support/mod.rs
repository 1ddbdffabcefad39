//! Shared harness for the console test suites.

mod board;
mod config_loader;
mod doubles;
mod reporter;

pub use board::{FailingBoardProvider, StubBoardProvider, dispatcher_for, sim_board};
pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use doubles::{MockBus, MockCardSlot, MockLedController, MockMemoryDevice};
pub use reporter::{HealthEvent, RecordingHealthReporter};
