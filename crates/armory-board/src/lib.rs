//! Hardware capabilities consumed by the armory console.
//!
//! Each trait in this crate is a narrow contract for one class of device I/O:
//! memory, I2C buses, SD/MMC cards, OTP fuses, LEDs, the AES engine, the
//! entropy source, the SoC itself, the clock and the network. The console
//! holds them as `Arc<dyn Trait>` handles shared by every session and never
//! adds locking of its own, so every implementation must be `Send + Sync`
//! and serialise internally where the hardware requires it.
//!
//! [`sim`] implements the whole set in memory so the console can run on a
//! development host; [`HostNetwork`] reaches the real network through the
//! operating system.

mod board;
mod capability;
mod error;
mod net;
pub mod sim;

pub use board::{Board, BoardInfo};
pub use capability::{
    AES_BLOCK_SIZE, Card, CardInfo, CipherEngine, Clock, EntropySource, Fuses, I2cBus, Led,
    LedParseError, Leds, Memory, Soc,
};
pub use error::AccessError;
pub use net::{HostNetwork, HttpResponse, Network, NetworkError, Resolution};
