//! Reflected Gray code transform and bit-string helpers.
//!
//! Bits are stored most-significant first.

/// Binary to Gray: `g[0] = b[0]`, `g[i] = b[i] ^ b[i - 1]`.
pub fn encode(bits: &[bool]) -> Vec<bool> {
    let mut previous = false;
    bits.iter()
        .map(|&bit| {
            let gray = bit ^ previous;
            previous = bit;
            gray
        })
        .collect()
}

/// Gray to binary: `b[0] = g[0]`, `b[i] = b[i - 1] ^ g[i]`.
pub fn decode(gray: &[bool]) -> Vec<bool> {
    let mut running = false;
    gray.iter()
        .map(|&bit| {
            running ^= bit;
            running
        })
        .collect()
}

/// Interpret bits as an unsigned integer. Only the low 64 bits are kept.
pub fn to_integer(bits: &[bool]) -> u64 {
    bits.iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
}

/// Gray-decode and interpret as an unsigned integer.
pub fn decode_to_integer(gray: &[bool]) -> u64 {
    to_integer(&decode(gray))
}

/// Render bits as a `0`/`1` string.
pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

/// Parse a `0`/`1` string.
///
/// On failure returns the position and character of the first non-bit.
pub fn parse_bits(text: &str) -> Result<Vec<bool>, (usize, char)> {
    text.chars()
        .enumerate()
        .map(|(position, c)| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err((position, other)),
        })
        .collect()
}
