//! In-memory board for running the console away from hardware.
//!
//! The simulated devices keep their state behind their own locks or atomics,
//! so a single [`Board`] built here can be shared across sessions exactly
//! like a real one.

mod card;
mod crypto;
mod devices;
mod fuse;
mod i2c;
mod memory;

use std::sync::Arc;

pub use card::SimCard;
pub use crypto::{OsEntropy, SoftwareAes};
pub use devices::{OffsetClock, OfflineNetwork, SimLeds, SimSoc};
pub use fuse::SimFuses;
pub use i2c::SimI2cBus;
pub use memory::SimMemory;

use crate::board::{Board, BoardInfo};
use crate::capability::{Card, I2cBus};
use crate::net::Network;

/// Slave address of the power management IC on the first bus.
pub const PMIC_ADDRESS: u8 = 0x08;
/// Value of the PMIC device identifier register.
pub const PMIC_DEVICE_ID: u8 = 0x10;
/// Value of the PMIC silicon revision register.
pub const PMIC_REVISION: u8 = 0x11;
/// Slave address of the configuration EEPROM on the second bus.
pub const EEPROM_ADDRESS: u8 = 0x50;

/// Shape of a simulated board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimProfile {
    /// Board model name.
    pub board_name: String,
    /// Size of the memory window in bytes.
    pub memory_bytes: u32,
    /// Number of I2C buses.
    pub i2c_buses: u8,
    /// Number of SD/MMC slots, each holding a card.
    pub mmc_cards: u8,
    /// Capacity of each card in bytes.
    pub card_bytes: u32,
    /// Number of OTP banks.
    pub otp_banks: u32,
    /// Number of words in each OTP bank.
    pub otp_words: u32,
}

impl Default for SimProfile {
    fn default() -> Self {
        Self {
            board_name: "usbarmory-sim".to_owned(),
            memory_bytes: 1024 * 1024,
            i2c_buses: 2,
            mmc_cards: 2,
            card_bytes: 1024 * 1024,
            otp_banks: 16,
            otp_words: 8,
        }
    }
}

/// Builds a simulated board described by `profile`.
///
/// The first bus carries a PMIC at [`PMIC_ADDRESS`] and the second an
/// EEPROM at [`EEPROM_ADDRESS`]. OTP bank 4 holds a MAC address in words 2
/// and 3 when the array is large enough.
#[must_use]
pub fn board(profile: &SimProfile, network: Arc<dyn Network>) -> Board {
    let i2c: Vec<Arc<dyn I2cBus>> = (0..profile.i2c_buses)
        .map(|index| {
            let bus = SimI2cBus::new();
            match index {
                0 => bus.attach(PMIC_ADDRESS, pmic_registers()),
                1 => bus.attach(EEPROM_ADDRESS, b"armory".to_vec()),
                _ => {}
            }
            Arc::new(bus) as Arc<dyn I2cBus>
        })
        .collect();

    let cards: Vec<Arc<dyn Card>> = (0..profile.mmc_cards)
        .map(|_| Arc::new(SimCard::new(u64::from(profile.card_bytes))) as Arc<dyn Card>)
        .collect();

    let fuses = SimFuses::new(profile.otp_banks, profile.otp_words);
    fuses.program(4, 2, 0x89a2_6941);
    fuses.program(4, 3, 0x0000_1a55);

    let info = BoardInfo {
        board: profile.board_name.clone(),
        soc: "i.MX6UL (simulated)".to_owned(),
        memory_bytes: u64::from(profile.memory_bytes),
    };

    Board {
        memory: Arc::new(SimMemory::new(profile.memory_bytes)),
        i2c,
        cards,
        fuses: Arc::new(fuses),
        leds: Some(Arc::new(SimLeds::default())),
        cipher: Arc::new(SoftwareAes),
        entropy: Arc::new(OsEntropy),
        soc: Arc::new(SimSoc::new(info)),
        clock: Arc::new(OffsetClock::default()),
        network,
    }
}

fn pmic_registers() -> Vec<u8> {
    (0..=u8::MAX)
        .map(|register| match register {
            0x00 => PMIC_DEVICE_ID,
            0x03 => PMIC_REVISION,
            _ => 0,
        })
        .collect()
}
