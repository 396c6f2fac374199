//! Residue exception tables
//!
//! A table marks residues modulo 3^k where the greedy builder should
//! INCREASE even though DECREASE is allowed. The tables are empirical:
//! they were tuned by hand against the accelerated map and carry no
//! optimality guarantee, so they are passed in as plain configuration.

use bitvec::prelude::*;
use num_traits::ToPrimitive;
use thiserror::Error;

use crate::oracle::Value;

/// Residues mod 27 that favour INCREASE.
pub const RESIDUES_MOD_27: [u32; 1] = [11];
/// Residues mod 81 that favour INCREASE.
pub const RESIDUES_MOD_81: [u32; 3] = [11, 38, 47];
/// Residues mod 243 that favour INCREASE.
pub const RESIDUES_MOD_243: [u32; 8] = [209, 101, 47, 38, 119, 173, 200, 92];
/// Residues mod 729 that favour INCREASE.
pub const RESIDUES_MOD_729: [u32; 25] = [
    209, 587, 452, 695, 533, 47, 344, 281, 38, 524, 245, 362, 416, 470, 335, 173, 425, 686, 443,
    389, 119, 605, 659, 200, 92,
];

/// Largest modulus accepted for a custom table (3^13).
pub const MAX_MODULUS: u32 = 1_594_323;

/// Errors building a custom table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Modulus is not a power of 3 (or exceeds [`MAX_MODULUS`]).
    #[error("modulus {0} is not a power of 3 no larger than {MAX_MODULUS}")]
    NotPowerOfThree(u32),

    /// Residue does not lie in `0..modulus`.
    #[error("residue {residue} out of range for modulus {modulus}")]
    ResidueOutOfRange {
        /// Offending residue
        residue: u32,
        /// Table modulus
        modulus: u32,
    },
}

/// Immutable set of residues modulo a power of 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueExceptionTable {
    modulus: u32,
    /// One bit per residue class
    vetoed: BitVec,
}

impl ResidueExceptionTable {
    /// Build a table from residues modulo `modulus`.
    pub fn from_residues(
        modulus: u32,
        residues: impl IntoIterator<Item = u32>,
    ) -> Result<Self, TableError> {
        if !is_power_of_three(modulus) {
            return Err(TableError::NotPowerOfThree(modulus));
        }

        let mut vetoed = bitvec![0; modulus as usize];
        for residue in residues {
            if residue >= modulus {
                return Err(TableError::ResidueOutOfRange { residue, modulus });
            }
            vetoed.set(residue as usize, true);
        }

        Ok(Self { modulus, vetoed })
    }

    /// Table that never vetoes (modulus 1).
    pub fn empty() -> Self {
        Self {
            modulus: 1,
            vetoed: bitvec![0; 1],
        }
    }

    /// Single exception mod 27.
    pub fn mod_27() -> Self {
        Self::preset(27, &RESIDUES_MOD_27)
    }

    /// Three exceptions mod 81.
    pub fn mod_81() -> Self {
        Self::preset(81, &RESIDUES_MOD_81)
    }

    /// Eight exceptions mod 243.
    pub fn mod_243() -> Self {
        Self::preset(243, &RESIDUES_MOD_243)
    }

    /// Twenty-five exceptions mod 729; the default table.
    pub fn mod_729() -> Self {
        Self::preset(729, &RESIDUES_MOD_729)
    }

    fn preset(modulus: u32, residues: &[u32]) -> Self {
        let mut vetoed = bitvec![0; modulus as usize];
        for &residue in residues {
            vetoed.set(residue as usize, true);
        }
        Self { modulus, vetoed }
    }

    /// Table modulus.
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Number of vetoed residues.
    pub fn len(&self) -> usize {
        self.vetoed.count_ones()
    }

    /// True if nothing is vetoed.
    pub fn is_empty(&self) -> bool {
        self.vetoed.not_any()
    }

    /// Whether DECREASE from `value` should be skipped.
    pub fn vetoes(&self, value: &Value) -> bool {
        if self.modulus == 1 {
            return false;
        }
        (value % self.modulus)
            .to_usize()
            .map_or(false, |residue| self.vetoed[residue])
    }

    /// Vetoed residues in ascending order.
    pub fn residues(&self) -> impl Iterator<Item = u32> + '_ {
        self.vetoed.iter_ones().map(|r| r as u32)
    }
}

impl Default for ResidueExceptionTable {
    fn default() -> Self {
        Self::mod_729()
    }
}

fn is_power_of_three(mut n: u32) -> bool {
    if n == 0 || n > MAX_MODULUS {
        return false;
    }
    while n % 3 == 0 {
        n /= 3;
    }
    n == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(ResidueExceptionTable::mod_27().len(), 1);
        assert_eq!(ResidueExceptionTable::mod_81().len(), 3);
        assert_eq!(ResidueExceptionTable::mod_243().len(), 8);
        assert_eq!(ResidueExceptionTable::mod_729().len(), 25);
        assert!(ResidueExceptionTable::empty().is_empty());
        assert_eq!(ResidueExceptionTable::default().modulus(), 729);
    }

    #[test]
    fn test_vetoes_by_residue() {
        let table = ResidueExceptionTable::mod_27();
        assert!(table.vetoes(&Value::from(11u32)));
        assert!(table.vetoes(&Value::from(11u32 + 27 * 1000)));
        assert!(!table.vetoes(&Value::from(12u32)));

        let huge = (Value::from(1u32) << 300u32) * 729u32 + 209u32;
        assert!(ResidueExceptionTable::mod_729().vetoes(&huge));
        assert!(!ResidueExceptionTable::empty().vetoes(&huge));
    }

    #[test]
    fn test_custom_table_validation() {
        assert_eq!(
            ResidueExceptionTable::from_residues(100, [1]),
            Err(TableError::NotPowerOfThree(100))
        );
        assert_eq!(
            ResidueExceptionTable::from_residues(0, []),
            Err(TableError::NotPowerOfThree(0))
        );
        assert_eq!(
            ResidueExceptionTable::from_residues(9, [9]),
            Err(TableError::ResidueOutOfRange {
                residue: 9,
                modulus: 9
            })
        );

        let table = ResidueExceptionTable::from_residues(81, RESIDUES_MOD_81).unwrap();
        assert_eq!(table, ResidueExceptionTable::mod_81());
        assert_eq!(table.residues().collect::<Vec<_>>(), vec![11, 38, 47]);
    }
}
