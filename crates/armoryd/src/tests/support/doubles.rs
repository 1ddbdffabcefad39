//! `mockall` doubles for the capabilities whose call patterns matter.

use armory_board::{AccessError, Card, CardInfo, I2cBus, Led, Leds, Memory};
use mockall::mock;

mock! {
    pub MemoryDevice {}
    impl Memory for MemoryDevice {
        fn read(&self, address: u32, len: usize) -> Result<Vec<u8>, AccessError>;
        fn write(&self, address: u32, data: &[u8]) -> Result<(), AccessError>;
    }
}

mock! {
    pub Bus {}
    impl I2cBus for Bus {
        fn read(
            &self,
            slave: u8,
            address: u32,
            address_len: usize,
            size: usize,
        ) -> Result<Vec<u8>, AccessError>;
    }
}

mock! {
    pub CardSlot {}
    impl Card for CardSlot {
        fn detect(&self) -> Result<CardInfo, AccessError>;
        fn read(&self, offset: u64, size: usize) -> Result<Vec<u8>, AccessError>;
    }
}

mock! {
    pub LedController {}
    impl Leds for LedController {
        fn set(&self, led: Led, on: bool) -> Result<(), AccessError>;
    }
}
