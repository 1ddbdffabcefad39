//! Device capability contracts.
//!
//! Every method takes `&self`: handles are shared across concurrent console
//! sessions, and implementations serialise access to hardware internally.

use strum::{Display, EnumString};
use time::OffsetDateTime;

use crate::board::BoardInfo;
use crate::error::AccessError;

/// Size of an AES block in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Byte-addressable view of physical memory.
pub trait Memory: Send + Sync {
    /// Reads `len` bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error when the range is not mapped.
    fn read(&self, address: u32, len: usize) -> Result<Vec<u8>, AccessError>;

    /// Writes `data` starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error when the range is not mapped.
    fn write(&self, address: u32, data: &[u8]) -> Result<(), AccessError>;
}

/// A single I2C controller.
pub trait I2cBus: Send + Sync {
    /// Reads `size` bytes from the register at `address` on device `slave`,
    /// sending the register address as `address_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error when the device does not acknowledge or the register
    /// address does not fit in `address_len` bytes.
    fn read(
        &self,
        slave: u8,
        address: u32,
        address_len: usize,
        size: usize,
    ) -> Result<Vec<u8>, AccessError>;
}

/// Geometry reported by a detected card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardInfo {
    /// Capacity in bytes.
    pub capacity: u64,
    /// Transfer block size in bytes.
    pub block_size: u32,
}

/// An SD/MMC card slot.
pub trait Card: Send + Sync {
    /// Probes the slot and initialises the card.
    ///
    /// # Errors
    ///
    /// Returns an error when no card is present or initialisation fails.
    fn detect(&self) -> Result<CardInfo, AccessError>;

    /// Reads `size` bytes from byte `offset` of a detected card.
    ///
    /// # Errors
    ///
    /// Returns an error when the card was not detected or the range exceeds
    /// its capacity.
    fn read(&self, offset: u64, size: usize) -> Result<Vec<u8>, AccessError>;
}

/// One-time-programmable fuse array.
pub trait Fuses: Send + Sync {
    /// Reads one 32-bit fuse word.
    ///
    /// # Errors
    ///
    /// Returns an error when `bank` or `word` is outside the array.
    fn read(&self, bank: u32, word: u32) -> Result<u32, AccessError>;
}

/// User-controllable LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Led {
    /// The white LED.
    White,
    /// The blue LED.
    Blue,
}

/// Error returned when an LED name is not recognised.
pub type LedParseError = strum::ParseError;

/// LED controller.
pub trait Leds: Send + Sync {
    /// Switches `led` on or off.
    ///
    /// # Errors
    ///
    /// Returns an error when the controller rejects the change.
    fn set(&self, led: Led, on: bool) -> Result<(), AccessError>;
}

/// AES-128 engine.
pub trait CipherEngine: Send + Sync {
    /// Encrypts `data` in place in CBC mode.
    ///
    /// `data` must be a whole number of [`AES_BLOCK_SIZE`] blocks.
    ///
    /// # Errors
    ///
    /// Returns an error when `data` is not block aligned or the engine fails.
    fn encrypt_cbc(
        &self,
        key: &[u8; AES_BLOCK_SIZE],
        iv: &[u8; AES_BLOCK_SIZE],
        data: &mut [u8],
    ) -> Result<(), AccessError>;
}

/// Source of random bytes.
pub trait EntropySource: Send + Sync {
    /// Fills `buf` with random bytes.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot produce entropy.
    fn fill(&self, buf: &mut [u8]) -> Result<(), AccessError>;
}

/// System-on-chip control.
pub trait Soc: Send + Sync {
    /// Describes the board and processor.
    fn describe(&self) -> BoardInfo;

    /// Issues a warm reset.
    ///
    /// # Errors
    ///
    /// Returns an error when the reset could not be requested.
    fn reset(&self) -> Result<(), AccessError>;
}

/// Wall clock.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> OffsetDateTime;

    /// Sets the current time.
    fn set(&self, instant: OffsetDateTime);
}
