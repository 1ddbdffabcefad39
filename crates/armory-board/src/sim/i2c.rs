use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::capability::I2cBus;
use crate::error::AccessError;

/// I2C bus with register-file devices attached.
///
/// Reads auto-increment through a device's registers and wrap at the end,
/// as small EEPROMs and PMICs do.
#[derive(Debug, Default)]
pub struct SimI2cBus {
    devices: Mutex<HashMap<u8, Vec<u8>>>,
}

impl SimI2cBus {
    /// Creates a bus with no devices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a device at `slave` with the given register contents,
    /// replacing any device already there.
    pub fn attach(&self, slave: u8, registers: Vec<u8>) {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slave, registers);
    }
}

impl I2cBus for SimI2cBus {
    fn read(
        &self,
        slave: u8,
        address: u32,
        address_len: usize,
        size: usize,
    ) -> Result<Vec<u8>, AccessError> {
        let fits = address_len >= 4 || u64::from(address) < 1_u64 << (8 * address_len);
        if !fits {
            return Err(AccessError::RegisterWidth {
                address,
                width: address_len,
            });
        }

        let devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        let registers = devices.get(&slave).ok_or(AccessError::NoAck { slave })?;
        if registers.is_empty() {
            return Ok(vec![0; size]);
        }

        Ok(registers
            .iter()
            .cycle()
            .skip(address as usize % registers.len())
            .take(size)
            .copied()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn bus() -> SimI2cBus {
        let bus = SimI2cBus::new();
        bus.attach(0x50, vec![1, 2, 3, 4]);
        bus
    }

    #[test]
    fn reads_wrap_around_registers() {
        assert_eq!(bus().read(0x50, 2, 1, 4), Ok(vec![3, 4, 1, 2]));
    }

    #[test]
    fn absent_slave_does_not_acknowledge() {
        assert_eq!(bus().read(0x51, 0, 1, 1), Err(AccessError::NoAck { slave: 0x51 }));
    }

    #[rstest]
    #[case(0x100, 1)]
    #[case(0x1_0000, 2)]
    #[case(1, 0)]
    fn rejects_register_addresses_wider_than_length(#[case] address: u32, #[case] width: usize) {
        assert_eq!(
            bus().read(0x50, address, width, 1),
            Err(AccessError::RegisterWidth { address, width })
        );
    }

    #[test]
    fn zero_length_address_allows_register_zero() {
        assert_eq!(bus().read(0x50, 0, 0, 2), Ok(vec![1, 2]));
    }
}
