//! Conversion of raw argument tokens into typed, range-checked values.
//!
//! Every helper fails closed with a [`DispatchError::InvalidArgument`] naming
//! the argument, and reasons follow the `parsing "<token>": <why>` shape.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::errors::DispatchError;

/// Largest number of bytes a single read may dump.
pub(crate) const SIZE_LIMIT: usize = 102_400;

fn parse_unsigned(token: &str, radix: u32, bits: u32) -> Result<u64, String> {
    if token.is_empty() || !token.chars().all(|ch| ch.is_digit(radix)) {
        return Err(format!("parsing {token:?}: invalid syntax"));
    }
    let out_of_range = || format!("parsing {token:?}: value out of range");
    // Only digits remain, so overflow is the sole failure mode.
    let value = u64::from_str_radix(token, radix).map_err(|_| out_of_range())?;
    if bits < u64::BITS && value >> bits != 0 {
        return Err(out_of_range());
    }
    Ok(value)
}

fn narrow<T: TryFrom<u64>>(
    token: &str,
    radix: u32,
    bits: u32,
    argument: &'static str,
) -> Result<T, DispatchError> {
    parse_unsigned(token, radix, bits)
        .and_then(|value| {
            T::try_from(value).map_err(|_| format!("parsing {token:?}: value out of range"))
        })
        .map_err(|reason| DispatchError::invalid_argument(argument, reason))
}

/// Parses hexadecimal digits into a value of at most `bits` bits.
pub(crate) fn hex_u32(token: &str, bits: u32, argument: &'static str) -> Result<u32, DispatchError> {
    narrow(token, 16, bits.min(32), argument)
}

/// Parses a hexadecimal I2C slave address (7 bits).
pub(crate) fn slave_address(token: &str) -> Result<u8, DispatchError> {
    narrow(token, 16, 7, "slave")
}

/// Parses decimal digits into a 32-bit value.
pub(crate) fn dec_u32(token: &str, argument: &'static str) -> Result<u32, DispatchError> {
    narrow(token, 10, 32, argument)
}

/// Parses decimal digits into an 8-bit index.
pub(crate) fn dec_u8(token: &str, argument: &'static str) -> Result<u8, DispatchError> {
    narrow(token, 10, 8, argument)
}

/// Parses an RFC 3339 timestamp.
pub(crate) fn timestamp(token: &str) -> Result<OffsetDateTime, DispatchError> {
    OffsetDateTime::parse(token, &Rfc3339)
        .map_err(|error| DispatchError::invalid_argument("date", error.to_string()))
}

/// Rejects sizes above [`SIZE_LIMIT`] and widens the rest.
pub(crate) fn bounded_size(size: u32) -> Result<usize, DispatchError> {
    usize::try_from(size)
        .ok()
        .filter(|size| *size <= SIZE_LIMIT)
        .ok_or_else(|| DispatchError::size_limit(SIZE_LIMIT))
}
