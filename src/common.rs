use crate::error::{BloomError, Result};
use bitvec::{bitvec, order::Lsb0, slice::BitSlice, vec::BitVec};
use std::fmt;
use std::str::FromStr;

/// Bit order tag carried in the wire format.
///
/// `Little` stores bit `i` as bit `i % 8` (least significant first) of
/// byte `i / 8`; `Big` stores it most significant first. Same meaning as the
/// `endian` argument of Python's `bitarray`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitOrder {
    #[default]
    Little,
    Big,
}

impl BitOrder {
    fn mask(self, bit: usize) -> u8 {
        match self {
            BitOrder::Little => 1 << bit,
            BitOrder::Big => 0x80 >> bit,
        }
    }
}

impl fmt::Display for BitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitOrder::Little => f.write_str("little"),
            BitOrder::Big => f.write_str("big"),
        }
    }
}

impl FromStr for BitOrder {
    type Err = BloomError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "little" => Ok(BitOrder::Little),
            "big" => Ok(BitOrder::Big),
            other => Err(BloomError::malformed(format!(
                "unknown endianness tag '{other}'"
            ))),
        }
    }
}

/// Packs `bits` into `ceil(len / 8)` bytes.
pub fn pack_bits(bits: &BitSlice<u8, Lsb0>, order: BitOrder) -> Vec<u8> {
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for idx in bits.iter_ones() {
        bytes[idx / 8] |= order.mask(idx % 8);
    }
    bytes
}

/// Inverse of [`pack_bits`]. The payload must be exactly `ceil(num_bits / 8)`
/// bytes; padding bits past `num_bits` in the last byte are dropped.
pub fn unpack_bits(
    bytes: &[u8],
    num_bits: usize,
    order: BitOrder,
) -> Result<BitVec<u8, Lsb0>> {
    let expected = num_bits.div_ceil(8);
    if bytes.len() != expected {
        return Err(BloomError::malformed(format!(
            "bit payload has {} bytes, expected {expected}",
            bytes.len()
        )));
    }

    let mut bits = bitvec![u8, Lsb0; 0; num_bits];
    for (byte_idx, byte) in bytes.iter().enumerate() {
        for bit in 0..8 {
            let idx = byte_idx * 8 + bit;
            if idx < num_bits && byte & order.mask(bit) != 0 {
                bits.set(idx, true);
            }
        }
    }
    Ok(bits)
}

/// Shortest round-trip form of `value` in the style of Python's `repr`:
/// plain decimal for exponents in `-4..16`, otherwise `d.ddde-XX` with a
/// signed exponent of at least two digits. Error rates in the wire format
/// are written this way.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>()),
        None => return value.to_string(),
    };
    match exponent {
        Ok(exp) if !(-4..16).contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        _ => {
            let plain = value.to_string();
            if plain.contains('.') {
                plain
            } else {
                format!("{plain}.0")
            }
        }
    }
}

// Helper method to format bytes in human-readable form
pub fn bytes2hr(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
