//! Hexadecimal identifier conversion
//!
//! The wire format carries trace and span identifiers as signed 64-bit
//! integers, while tracing SDKs hand them over as hex strings. Identifiers
//! whose unsigned value exceeds `i64::MAX` must wrap into the negative range
//! exactly as a two's-complement reinterpretation of their low 64 bits would,
//! or the backend will stitch spans into the wrong traces.

use crate::error::{Error, Result};

/// Converts hexadecimal string identifiers into signed 64-bit integers
pub trait IdentifierCodec: Send + Sync {
    /// Convert a hex digit string into a signed 64-bit integer
    ///
    /// The string is read as an unsigned big-endian integer of arbitrary
    /// length; the result is its value modulo 2^64, reinterpreted as a
    /// two's-complement `i64`. The empty string converts to 0 and leading
    /// zeros are insignificant.
    fn convert(&self, hex: &str) -> Result<i64>;
}

/// The canonical [`IdentifierCodec`]
///
/// Accumulates digits in a `u128`, so the low 64 bits stay exact for inputs
/// of any length; the final truncation is the mod-2^64 wrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexCodec;

impl IdentifierCodec for HexCodec {
    fn convert(&self, hex: &str) -> Result<i64> {
        let mut acc: u128 = 0;
        for c in hex.chars() {
            let digit = c
                .to_digit(16)
                .ok_or_else(|| Error::invalid_identifier(hex))?;
            acc = acc.wrapping_shl(4) | u128::from(digit);
        }
        Ok(acc as u64 as i64)
    }
}
