//! Population matrix: one chromosome per row.

use std::fmt;

use rand::Rng;

use crate::compute::gray;

/// Fixed-size bit matrix holding the GA population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationMatrix {
    rows: usize,
    columns: usize,
    /// Row-major bits.
    bits: Vec<bool>,
}

impl PopulationMatrix {
    /// All-zero matrix of `rows` chromosomes with `columns` bits each.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            bits: vec![false; rows * columns],
        }
    }

    /// Matrix with every bit drawn uniformly.
    pub fn random<R: Rng + ?Sized>(rows: usize, columns: usize, rng: &mut R) -> Self {
        Self {
            rows,
            columns,
            bits: (0..rows * columns).map(|_| rng.r#gen::<bool>()).collect(),
        }
    }

    /// Build from bit strings, one per row. All rows must share a length.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, PopulationError> {
        let columns = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut matrix = Self::new(rows.len(), columns);
        for (i, row) in rows.iter().enumerate() {
            matrix.set_row_str(i, row.as_ref())?;
        }
        Ok(matrix)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn same_dimensions(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
    }

    fn check_row(&self, row: usize) -> Result<(), PopulationError> {
        if row < self.rows {
            Ok(())
        } else {
            Err(PopulationError::RowOutOfBounds {
                row,
                rows: self.rows,
            })
        }
    }

    fn check_column(&self, column: usize) -> Result<(), PopulationError> {
        if column < self.columns {
            Ok(())
        } else {
            Err(PopulationError::ColumnOutOfBounds {
                column,
                columns: self.columns,
            })
        }
    }

    fn check_length(expected: usize, actual: usize) -> Result<(), PopulationError> {
        if expected == actual {
            Ok(())
        } else {
            Err(PopulationError::LengthMismatch { expected, actual })
        }
    }

    /// Bit at `(row, column)`.
    pub fn get(&self, row: usize, column: usize) -> Result<bool, PopulationError> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(self.bits[row * self.columns + column])
    }

    /// Set the bit at `(row, column)`.
    pub fn set(&mut self, row: usize, column: usize, bit: bool) -> Result<(), PopulationError> {
        self.check_row(row)?;
        self.check_column(column)?;
        self.bits[row * self.columns + column] = bit;
        Ok(())
    }

    /// Borrow one chromosome.
    pub fn row(&self, row: usize) -> Result<&[bool], PopulationError> {
        self.check_row(row)?;
        let start = row * self.columns;
        Ok(&self.bits[start..start + self.columns])
    }

    /// Copy out one bit position across all chromosomes.
    pub fn column(&self, column: usize) -> Result<Vec<bool>, PopulationError> {
        self.check_column(column)?;
        Ok((0..self.rows)
            .map(|row| self.bits[row * self.columns + column])
            .collect())
    }

    pub fn row_string(&self, row: usize) -> Result<String, PopulationError> {
        self.row(row).map(gray::format_bits)
    }

    pub fn column_string(&self, column: usize) -> Result<String, PopulationError> {
        self.column(column).map(|bits| gray::format_bits(&bits))
    }

    /// Overwrite one chromosome. `bits` must be exactly one row long.
    pub fn set_row(&mut self, row: usize, bits: &[bool]) -> Result<(), PopulationError> {
        self.check_row(row)?;
        Self::check_length(self.columns, bits.len())?;
        let start = row * self.columns;
        self.bits[start..start + self.columns].copy_from_slice(bits);
        Ok(())
    }

    /// Overwrite one chromosome from a `0`/`1` string.
    pub fn set_row_str(&mut self, row: usize, text: &str) -> Result<(), PopulationError> {
        let bits = gray::parse_bits(text)
            .map_err(|(position, found)| PopulationError::InvalidBit { position, found })?;
        self.set_row(row, &bits)
    }

    /// Overwrite one bit position across all chromosomes.
    pub fn set_column(&mut self, column: usize, bits: &[bool]) -> Result<(), PopulationError> {
        self.check_column(column)?;
        Self::check_length(self.rows, bits.len())?;
        for (row, &bit) in bits.iter().enumerate() {
            self.bits[row * self.columns + column] = bit;
        }
        Ok(())
    }

    /// Replace every bit with `other`'s. Dimensions must match.
    pub fn assign(&mut self, other: &Self) -> Result<(), PopulationError> {
        if !self.same_dimensions(other) {
            return Err(PopulationError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        self.bits.copy_from_slice(&other.bits);
        Ok(())
    }

    /// Set every bit to `bit`.
    pub fn fill(&mut self, bit: bool) {
        self.bits.fill(bit);
    }

    /// Iterate over chromosomes in row order.
    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &[bool]> + '_ {
        (0..self.rows).map(move |row| {
            let start = row * self.columns;
            &self.bits[start..start + self.columns]
        })
    }

    /// Rewrite every bit in place.
    pub fn map_bits<F>(&mut self, mut f: F)
    where
        F: FnMut(bool) -> bool,
    {
        for bit in &mut self.bits {
            *bit = f(*bit);
        }
    }
}

impl fmt::Display for PopulationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            write!(f, "|{i}|:")?;
            for &bit in row {
                write!(f, " {}", u8::from(bit))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Population matrix access errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PopulationError {
    #[error("Row {row} is out of range for {rows} chromosomes")]
    RowOutOfBounds { row: usize, rows: usize },
    #[error("Column {column} is out of range for {columns}-bit chromosomes")]
    ColumnOutOfBounds { column: usize, columns: usize },
    #[error("Expected {expected} bits, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Expected a {expected:?} population, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("Invalid bit {found:?} at position {position}")]
    InvalidBit { position: usize, found: char },
    #[error("Tournament size must be positive")]
    EmptyTournament,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_rows_and_columns() {
        let mut pop = PopulationMatrix::from_rows(&["0110", "1000", "0011"]).unwrap();
        assert_eq!(pop.dimensions(), (3, 4));
        assert_eq!(pop.row_string(1).unwrap(), "1000");
        assert_eq!(pop.column_string(2).unwrap(), "101");
        assert!(pop.get(2, 3).unwrap());

        pop.set_column(0, &[true, false, true]).unwrap();
        assert_eq!(pop.row_string(0).unwrap(), "1110");
        assert_eq!(pop.row_string(1).unwrap(), "0000");

        pop.set(1, 3, true).unwrap();
        assert_eq!(pop.row(1).unwrap(), &[false, false, false, true]);
    }

    #[test]
    fn test_bounds_errors() {
        let mut pop = PopulationMatrix::new(2, 3);
        assert_eq!(
            pop.row(2),
            Err(PopulationError::RowOutOfBounds { row: 2, rows: 2 })
        );
        assert_eq!(
            pop.column(3),
            Err(PopulationError::ColumnOutOfBounds {
                column: 3,
                columns: 3
            })
        );
        assert!(pop.set(0, 5, true).is_err());
    }

    #[test]
    fn test_mismatched_writes_rejected() {
        let mut pop = PopulationMatrix::new(2, 3);
        assert_eq!(
            pop.set_row(0, &[true; 4]),
            Err(PopulationError::LengthMismatch {
                expected: 3,
                actual: 4
            })
        );
        assert!(pop.set_column(0, &[true]).is_err());
        assert!(matches!(
            pop.set_row_str(1, "1x1"),
            Err(PopulationError::InvalidBit {
                position: 1,
                found: 'x'
            })
        ));
        assert!(PopulationMatrix::from_rows(&["010", "01"]).is_err());

        // Failed writes leave the matrix untouched.
        assert_eq!(pop, PopulationMatrix::new(2, 3));
    }

    #[test]
    fn test_assign() {
        let mut rng = StdRng::seed_from_u64(4);
        let source = PopulationMatrix::random(4, 12, &mut rng);
        let mut target = PopulationMatrix::new(4, 12);
        target.assign(&source).unwrap();
        assert_eq!(target, source);

        let mut small = PopulationMatrix::new(3, 12);
        assert_eq!(
            small.assign(&source),
            Err(PopulationError::DimensionMismatch {
                expected: (3, 12),
                actual: (4, 12)
            })
        );
        assert_eq!(small, PopulationMatrix::new(3, 12));
    }

    #[test]
    fn test_map_and_fill() {
        let mut pop = PopulationMatrix::from_rows(&["01", "10"]).unwrap();
        pop.map_bits(|bit| !bit);
        assert_eq!(pop.row_string(0).unwrap(), "10");
        pop.fill(true);
        assert!(pop.iter_rows().all(|row| row.iter().all(|&b| b)));
    }

    #[test]
    fn test_display() {
        let pop = PopulationMatrix::from_rows(&["101", "010"]).unwrap();
        assert_eq!(pop.to_string(), "|0|: 1 0 1\n|1|: 0 1 0\n");
    }
}
