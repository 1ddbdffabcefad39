//! `otp`: OTP fuse word reads.

use armory_board::Board;

use crate::dispatch::arguments;
use crate::dispatch::errors::DispatchError;

/// Reads one fuse word. Bank and word bounds belong to the fuse array, so
/// its error text reaches the operator unchanged.
pub(crate) fn read(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let [bank, word] = tokens else {
        return Err(DispatchError::UnknownCommand);
    };
    let bank = arguments::dec_u32(bank, "bank")?;
    let word = arguments::dec_u32(word, "word")?;
    let value = board.fuses.read(bank, word)?;
    Ok(format!("OTP bank:{bank} word:{word} val:{value:#010x}"))
}
