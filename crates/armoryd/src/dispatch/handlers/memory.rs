//! `md` and `mw`: raw memory display and write.

use armory_board::Board;

use crate::dispatch::arguments;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::hexdump;

const WORD: u32 = 4;

/// A validated memory display request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DisplayRequest {
    pub(crate) address: u32,
    pub(crate) size: usize,
}

impl DisplayRequest {
    /// Validates `md <address> <size>`.
    ///
    /// Both values must be word aligned and the size may not exceed
    /// [`arguments::SIZE_LIMIT`].
    pub(crate) fn parse(tokens: &[&str]) -> Result<Self, DispatchError> {
        let [address, size] = tokens else {
            return Err(DispatchError::UnknownCommand);
        };
        let address = arguments::hex_u32(address, 32, "address")?;
        let size = arguments::dec_u32(size, "size")?;
        if address % WORD != 0 || size % WORD != 0 {
            return Err(DispatchError::Unaligned);
        }
        let size = arguments::bounded_size(size)?;
        Ok(Self { address, size })
    }
}

/// A validated memory write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WriteRequest {
    pub(crate) address: u32,
    pub(crate) value: u32,
}

impl WriteRequest {
    /// Validates `mw <address> <value>`.
    pub(crate) fn parse(tokens: &[&str]) -> Result<Self, DispatchError> {
        let [address, value] = tokens else {
            return Err(DispatchError::UnknownCommand);
        };
        Ok(Self {
            address: arguments::hex_u32(address, 32, "address")?,
            value: arguments::hex_u32(value, 32, "data")?,
        })
    }
}

pub(crate) fn display(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let request = DisplayRequest::parse(tokens)?;
    let bytes = board.memory.read(request.address, request.size)?;
    Ok(hexdump::dump(&bytes))
}

/// Writes one big-endian word. There is no undo.
pub(crate) fn write(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let request = WriteRequest::parse(tokens)?;
    board
        .memory
        .write(request.address, &request.value.to_be_bytes())?;
    Ok(String::new())
}
