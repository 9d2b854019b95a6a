//! Rule chromosomes and the SIR thresholds they encode.
//!
//! A chromosome is 12 bits split into four 3-bit genes:
//!
//! ```text
//! 000 000 000 000
//!  |   |   |   +-- RECOVERED -> EMPTY birth threshold
//!  |   |   +------ INFECTED -> RECOVERED recovery threshold
//!  |   +---------- SUSCEPTIBLE -> INFECTED infection threshold
//!  +-------------- EMPTY -> SUSCEPTIBLE birth threshold
//! ```
//!
//! Each gene is Gray-decoded to `0..=7` and offset by one.

use std::fmt;
use std::str::FromStr;

use super::gray;

/// Bits per chromosome.
pub const CHROMOSOME_LENGTH: usize = 12;
/// Bits per gene.
pub const GENE_WIDTH: usize = 3;
/// Added to every decoded gene.
pub const THRESHOLD_OFFSET: usize = 1;

/// Neighbor-count thresholds for the four SIR transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Thresholds {
    /// EMPTY becomes SUSCEPTIBLE with at least this many EMPTY neighbors.
    pub birth: usize,
    /// SUSCEPTIBLE becomes INFECTED with at least this many infectious neighbors.
    pub infection: usize,
    /// INFECTED becomes RECOVERED with at most this many infectious neighbors.
    pub recovery: usize,
    /// RECOVERED becomes EMPTY with at least this many RECOVERED neighbors.
    pub rebirth: usize,
}

impl Thresholds {
    /// Thresholds of the fixed SIR rule set.
    pub const FIXED: Self = Self {
        birth: 2,
        infection: 2,
        recovery: 4,
        rebirth: 3,
    };
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::FIXED
    }
}

/// A 12-bit rule chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RuleChromosome([bool; CHROMOSOME_LENGTH]);

impl RuleChromosome {
    pub const fn new(bits: [bool; CHROMOSOME_LENGTH]) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> &[bool; CHROMOSOME_LENGTH] {
        &self.0
    }

    /// Decode the four thresholds.
    pub fn thresholds(&self) -> Thresholds {
        let [a0, a1, a2, b0, b1, b2, c0, c1, c2, d0, d1, d2] = self.0;
        Thresholds {
            birth: gene_threshold(&[a0, a1, a2]),
            infection: gene_threshold(&[b0, b1, b2]),
            recovery: gene_threshold(&[c0, c1, c2]),
            rebirth: gene_threshold(&[d0, d1, d2]),
        }
    }
}

fn gene_threshold(gene: &[bool; GENE_WIDTH]) -> usize {
    // A 3-bit gene decodes to at most 7.
    gray::decode_to_integer(gene) as usize + THRESHOLD_OFFSET
}

impl TryFrom<&[bool]> for RuleChromosome {
    type Error = RuleError;

    fn try_from(bits: &[bool]) -> Result<Self, Self::Error> {
        let bits: [bool; CHROMOSOME_LENGTH] =
            bits.try_into().map_err(|_| RuleError::Length {
                expected: CHROMOSOME_LENGTH,
                actual: bits.len(),
            })?;
        Ok(Self(bits))
    }
}

impl FromStr for RuleChromosome {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = gray::parse_bits(s)
            .map_err(|(position, found)| RuleError::InvalidBit { position, found })?;
        Self::try_from(bits.as_slice())
    }
}

impl fmt::Display for RuleChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&gray::format_bits(&self.0))
    }
}

/// Chromosome construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Chromosome has {actual} bits, expected {expected}")]
    Length { expected: usize, actual: usize },
    #[error("Invalid bit {found:?} at position {position}")]
    InvalidBit { position: usize, found: char },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_chromosome() {
        let chromosome: RuleChromosome = "000000000000".parse().unwrap();
        let t = chromosome.thresholds();
        assert_eq!((t.birth, t.infection, t.recovery, t.rebirth), (1, 1, 1, 1));
    }

    #[test]
    fn test_max_gene() {
        // Gray 100 decodes to 7, the largest 3-bit value.
        let chromosome: RuleChromosome = "100100100100".parse().unwrap();
        let t = chromosome.thresholds();
        assert_eq!((t.birth, t.infection, t.recovery, t.rebirth), (8, 8, 8, 8));
    }

    #[test]
    fn test_fixed_rules_encoding() {
        // Gray 001 -> 1, 010 -> 3, 011 -> 2.
        let chromosome: RuleChromosome = "001001010011".parse().unwrap();
        assert_eq!(chromosome.thresholds(), Thresholds::FIXED);
        assert_eq!(chromosome.to_string(), "001001010011");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "0101".parse::<RuleChromosome>(),
            Err(RuleError::Length {
                expected: 12,
                actual: 4
            })
        );
        assert_eq!(
            "0101010101x1".parse::<RuleChromosome>(),
            Err(RuleError::InvalidBit {
                position: 10,
                found: 'x'
            })
        );
    }

    #[test]
    fn test_from_slice() {
        let bits = [true; CHROMOSOME_LENGTH];
        let chromosome = RuleChromosome::try_from(&bits[..]).unwrap();
        assert_eq!(chromosome.bits(), &bits);
        assert!(RuleChromosome::try_from(&bits[..11]).is_err());
    }
}
