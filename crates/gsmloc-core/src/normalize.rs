//! Conversion of raw modem output into a [`CellIdentity`].
//!
//! Everything here is pure: no I/O, no clocks, no logging. The same input
//! always produces the same output.

use crate::error::NormalizeError;
use crate::types::{CellIdentity, RawNetworkInfo};

/// Converts a hexadecimal digit string (most significant digit first, no
/// prefix) into its decimal value.
///
/// # Errors
///
/// Returns [`NormalizeError::HexDecode`] if `value` is empty, contains a
/// character that is not a hex digit, or does not fit in a `u32`.
pub fn hex_to_decimal(value: &str) -> Result<u32, NormalizeError> {
    let invalid = || NormalizeError::HexDecode(value.to_owned());

    if value.is_empty() {
        return Err(invalid());
    }

    value.chars().try_fold(0u32, |acc, ch| {
        let digit = ch.to_digit(16).ok_or_else(invalid)?;
        acc.checked_mul(16)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(invalid)
    })
}

/// Splits a `"MCC MNC"` network code on its first space.
///
/// The split yields at most two parts, so anything after the first space
/// belongs to the MNC.
///
/// # Errors
///
/// Returns [`NormalizeError::MalformedNetworkCode`] if there is no space or
/// either side of it is empty.
pub fn split_network_code(network_code: &str) -> Result<(String, String), NormalizeError> {
    match network_code.split_once(' ') {
        Some((mcc, mnc)) if !mcc.is_empty() && !mnc.is_empty() => {
            Ok((mcc.to_owned(), mnc.to_owned()))
        }
        _ => Err(NormalizeError::MalformedNetworkCode(
            network_code.to_owned(),
        )),
    }
}

/// Normalizes a modem reading into a [`CellIdentity`].
///
/// # Errors
///
/// Returns [`NormalizeError::MalformedNetworkCode`] when the network code
/// cannot be split and [`NormalizeError::HexDecode`] when the LAC or CID is
/// not valid hexadecimal.
pub fn normalize(raw: &RawNetworkInfo) -> Result<CellIdentity, NormalizeError> {
    let lac = hex_to_decimal(&raw.lac)?;
    let cid = hex_to_decimal(&raw.cid)?;
    let (mcc, mnc) = split_network_code(&raw.network_code)?;

    Ok(CellIdentity { mcc, mnc, lac, cid })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
