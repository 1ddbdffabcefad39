//! `mmc`: byte reads from SD/MMC cards.

use armory_board::Board;
use tracing::debug;

use crate::dispatch::arguments;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::hexdump;
use crate::dispatch::router::DISPATCH_TARGET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CardRead {
    pub(crate) card: usize,
    pub(crate) offset: u64,
    pub(crate) size: usize,
}

impl CardRead {
    /// Validates `mmc <card> <address> <size>` against `cards` slots.
    pub(crate) fn parse(tokens: &[&str], cards: usize) -> Result<Self, DispatchError> {
        let [card, offset, size] = tokens else {
            return Err(DispatchError::UnknownCommand);
        };
        let card = usize::from(arguments::dec_u8(card, "card index")?);
        let offset = u64::from(arguments::hex_u32(offset, 32, "address")?);
        let size = arguments::bounded_size(arguments::dec_u32(size, "size")?)?;
        if card >= cards {
            return Err(DispatchError::CardIndex);
        }
        Ok(Self { card, offset, size })
    }
}

/// Reads from a card, detecting it first so a swapped card is never read
/// with stale geometry.
pub(crate) fn read(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let request = CardRead::parse(tokens, board.cards.len())?;
    let card = board
        .cards
        .get(request.card)
        .ok_or(DispatchError::CardIndex)?;
    let info = card.detect()?;
    debug!(
        target: DISPATCH_TARGET,
        card = request.card,
        capacity = info.capacity,
        block_size = info.block_size,
        "card detected"
    );
    let bytes = card.read(request.offset, request.size)?;
    Ok(hexdump::dump(&bytes))
}
