//! `led`: user LED control.

use armory_board::{Board, Led};

use crate::dispatch::errors::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LedChange {
    pub(crate) led: Led,
    pub(crate) on: bool,
}

impl LedChange {
    pub(crate) fn parse(tokens: &[&str]) -> Result<Self, DispatchError> {
        let [led, state] = tokens else {
            return Err(DispatchError::UnknownCommand);
        };
        let led = led
            .parse::<Led>()
            .map_err(|error| DispatchError::invalid_argument("led", error.to_string()))?;
        let on = match *state {
            "on" => true,
            "off" => false,
            other => {
                return Err(DispatchError::invalid_argument(
                    "state",
                    format!("expected on or off, got {other:?}"),
                ));
            }
        };
        Ok(Self { led, on })
    }
}

/// Switches an LED. Boards without LEDs accept the command and do nothing.
pub(crate) fn set(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let change = LedChange::parse(tokens)?;
    if let Some(leds) = &board.leds {
        leds.set(change.led, change.on)?;
    }
    Ok(String::new())
}
