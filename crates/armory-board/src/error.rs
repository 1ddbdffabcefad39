//! Failures reported by hardware capabilities.

use thiserror::Error;

/// Error raised by a hardware capability.
///
/// The console renders these verbatim as the result of the failing command,
/// so each message is written for an operator at the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// A memory access fell outside the mapped window.
    #[error("memory access {address:#010x}+{len} outside the {size} byte window")]
    MemoryRange {
        /// First byte of the access.
        address: u32,
        /// Length of the access in bytes.
        len: usize,
        /// Size of the mapped window in bytes.
        size: u64,
    },
    /// No device answered at the slave address.
    #[error("i2c: no acknowledgement from slave {slave:#04x}")]
    NoAck {
        /// 7-bit slave address.
        slave: u8,
    },
    /// The register address is wider than the address length allows.
    #[error("i2c: register address {address:#x} does not fit in {width} byte(s)")]
    RegisterWidth {
        /// Requested register address.
        address: u32,
        /// Register address length in bytes.
        width: usize,
    },
    /// The card slot is empty.
    #[error("no card detected")]
    NoCard,
    /// The card was read without being detected since it was inserted.
    #[error("card not detected since last insertion")]
    NotDetected,
    /// A card read went past the end of the medium.
    #[error("card read {offset:#x}+{size} beyond the {capacity} byte capacity")]
    CardRange {
        /// Byte offset of the read.
        offset: u64,
        /// Length of the read in bytes.
        size: usize,
        /// Card capacity in bytes.
        capacity: u64,
    },
    /// The fuse bank does not exist.
    #[error("invalid OTP bank {bank} (device has {banks} banks)")]
    FuseBank {
        /// Requested bank.
        bank: u32,
        /// Number of banks on the device.
        banks: u32,
    },
    /// The fuse word does not exist within its bank.
    #[error("invalid OTP word {word} (banks have {words} words)")]
    FuseWord {
        /// Requested word.
        word: u32,
        /// Number of words per bank.
        words: u32,
    },
    /// The cipher engine rejected the request.
    #[error("cipher: {reason}")]
    Cipher {
        /// Engine-specific description.
        reason: String,
    },
    /// The entropy source failed to produce bytes.
    #[error("entropy source failure: {reason}")]
    Entropy {
        /// Source-specific description.
        reason: String,
    },
    /// The board does not implement the operation.
    #[error("{operation} is not supported on this board")]
    Unsupported {
        /// Name of the missing operation.
        operation: &'static str,
    },
}

impl AccessError {
    /// Creates a cipher error.
    pub fn cipher(reason: impl Into<String>) -> Self {
        Self::Cipher {
            reason: reason.into(),
        }
    }

    /// Creates an entropy error.
    pub fn entropy(reason: impl Into<String>) -> Self {
        Self::Entropy {
            reason: reason.into(),
        }
    }
}
