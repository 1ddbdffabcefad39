//! The aggregate of capabilities handed to the console.

use std::fmt;
use std::sync::Arc;

use crate::capability::{Card, CipherEngine, Clock, EntropySource, Fuses, I2cBus, Leds, Memory, Soc};
use crate::net::Network;

/// Static description of the running board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardInfo {
    /// Board model name.
    pub board: String,
    /// Processor name.
    pub soc: String,
    /// Size of the memory window in bytes.
    pub memory_bytes: u64,
}

/// Every hardware capability available to console commands.
///
/// Bus and card lists are indexed from zero here; the console exposes them
/// to operators numbered from one.
#[derive(Clone)]
pub struct Board {
    /// Physical memory.
    pub memory: Arc<dyn Memory>,
    /// I2C controllers.
    pub i2c: Vec<Arc<dyn I2cBus>>,
    /// SD/MMC slots.
    pub cards: Vec<Arc<dyn Card>>,
    /// OTP fuse array.
    pub fuses: Arc<dyn Fuses>,
    /// LED controller, absent on boards without user LEDs.
    pub leds: Option<Arc<dyn Leds>>,
    /// AES engine.
    pub cipher: Arc<dyn CipherEngine>,
    /// Random number source.
    pub entropy: Arc<dyn EntropySource>,
    /// Processor control.
    pub soc: Arc<dyn Soc>,
    /// Wall clock.
    pub clock: Arc<dyn Clock>,
    /// Network stack.
    pub network: Arc<dyn Network>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("info", &self.soc.describe())
            .field("i2c_buses", &self.i2c.len())
            .field("cards", &self.cards.len())
            .field("leds", &self.leds.is_some())
            .finish_non_exhaustive()
    }
}
