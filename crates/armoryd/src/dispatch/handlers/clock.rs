//! `date`: wall clock display and adjustment.

use armory_board::Board;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::dispatch::arguments;
use crate::dispatch::errors::DispatchError;

/// Renders an instant as RFC 3339 in whole seconds.
pub(crate) fn render(instant: OffsetDateTime) -> Result<String, DispatchError> {
    let whole = instant.replace_nanosecond(0).unwrap_or(instant);
    Ok(whole.format(&Rfc3339)?)
}

pub(crate) fn show(board: &Board) -> Result<String, DispatchError> {
    render(board.clock.now())
}

/// Sets the clock, then reports the time it now keeps. A malformed
/// timestamp leaves the clock untouched.
pub(crate) fn set(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let [date] = tokens else {
        return Err(DispatchError::UnknownCommand);
    };
    let instant = arguments::timestamp(date)?;
    board.clock.set(instant);
    show(board)
}
