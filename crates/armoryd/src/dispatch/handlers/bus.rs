//! `i2c`: register reads from devices on an I2C bus.

use armory_board::Board;

use crate::dispatch::arguments;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::hexdump;

/// Register addresses are sent as a single byte.
const ADDRESS_LEN: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BusRead {
    /// Zero-based controller index.
    pub(crate) bus: usize,
    pub(crate) slave: u8,
    pub(crate) address: u32,
    pub(crate) size: usize,
}

impl BusRead {
    /// Validates `i2c <bus> <slave> <address> <size>` against `buses`
    /// configured controllers. Operators number buses from one.
    pub(crate) fn parse(tokens: &[&str], buses: usize) -> Result<Self, DispatchError> {
        let [bus, slave, address, size] = tokens else {
            return Err(DispatchError::UnknownCommand);
        };
        let bus = arguments::dec_u8(bus, "bus index")?;
        let slave = arguments::slave_address(slave)?;
        let address = arguments::hex_u32(address, 32, "address")?;
        let size = arguments::bounded_size(arguments::dec_u32(size, "size")?)?;
        let bus = usize::from(bus)
            .checked_sub(1)
            .filter(|index| *index < buses)
            .ok_or(DispatchError::BusIndex)?;
        Ok(Self {
            bus,
            slave,
            address,
            size,
        })
    }
}

pub(crate) fn read(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let request = BusRead::parse(tokens, board.i2c.len())?;
    let bus = board.i2c.get(request.bus).ok_or(DispatchError::BusIndex)?;
    let bytes = bus.read(request.slave, request.address, ADDRESS_LEN, request.size)?;
    Ok(hexdump::dump(&bytes))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn converts_bus_to_zero_based_index() {
        let request = BusRead::parse(&["2", "50", "0", "6"], 2).expect("valid request");
        assert_eq!(
            request,
            BusRead {
                bus: 1,
                slave: 0x50,
                address: 0,
                size: 6,
            }
        );
    }

    #[rstest]
    #[case(&["0", "08", "0", "1"], "invalid bus index")]
    #[case(&["3", "08", "0", "1"], "invalid bus index")]
    #[case(&["256", "08", "0", "1"], "invalid bus index: parsing \"256\": value out of range")]
    #[case(&["1", "80", "0", "1"], "invalid slave: parsing \"80\": value out of range")]
    #[case(&["1", "08", "0", "102401"], "please only use a size argument <= 102400")]
    fn rejects_bad_reads(#[case] tokens: &[&str], #[case] expected: &str) {
        let error = BusRead::parse(tokens, 2).expect_err("request must be rejected");
        assert_eq!(error.to_string(), expected);
    }
}
