//! Input checks shared by the dense and sparse adapters.
//!
//! The adapters call these before reading any value, so a malformed input is
//! rejected as a whole. They are public so callers can check their data up
//! front, e.g. when the same matrix is scored against many rankings.

use std::collections::HashSet;
use std::hash::Hash;

use crate::{EtaError, Result};

/// Which dense matrix a shape error refers to.
pub const PREFERENCE_MATRIX: &str = "preference";
/// See [`PREFERENCE_MATRIX`].
pub const VARIANCE_MATRIX: &str = "variance";

/// Check that no item appears twice in the ranking.
///
/// Reports the position of the first repeat.
///
/// ```rust
/// use eta_measure::validate::validate_unique;
///
/// assert!(validate_unique(&["a", "b", "c"]).is_ok());
/// assert!(validate_unique(&["a", "b", "a"]).is_err());
/// ```
pub fn validate_unique<I: Eq + Hash>(ranking: &[I]) -> Result<()> {
    let mut seen = HashSet::with_capacity(ranking.len());
    for (position, item) in ranking.iter().enumerate() {
        if !seen.insert(item) {
            return Err(EtaError::DuplicateItem { position });
        }
    }
    Ok(())
}

/// Check that `matrix` is `expected × expected` with no ragged rows.
pub fn validate_square<R: AsRef<[f64]>>(
    matrix: &[R],
    expected: usize,
    name: &'static str,
) -> Result<()> {
    if matrix.len() != expected {
        return Err(EtaError::ShapeMismatch {
            matrix: name,
            rows: matrix.len(),
            cols: matrix.first().map_or(0, |row| row.as_ref().len()),
            expected,
        });
    }
    for row in matrix {
        let cols = row.as_ref().len();
        if cols != expected {
            return Err(EtaError::ShapeMismatch {
                matrix: name,
                rows: matrix.len(),
                cols,
                expected,
            });
        }
    }
    Ok(())
}

/// Check that every index in a dense ranking addresses a matrix row.
pub fn validate_indices(ranking: &[usize], len: usize) -> Result<()> {
    match ranking.iter().enumerate().find(|&(_, &index)| index >= len) {
        Some((position, &index)) => Err(EtaError::IndexOutOfRange {
            position,
            index,
            len,
        }),
        None => Ok(()),
    }
}

/// Validate a dense ranking against its preference matrix.
///
/// The matrix must be square with one row per ranked item, and the ranking
/// must be a permutation of `0..n`.
pub fn validate_dense<R: AsRef<[f64]>>(ranking: &[usize], prefs: &[R]) -> Result<()> {
    validate_square(prefs, ranking.len(), PREFERENCE_MATRIX)?;
    validate_indices(ranking, prefs.len())?;
    validate_unique(ranking)
}

pub(crate) fn check_preference(value: f64, first: usize, second: usize) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EtaError::InvalidPreference {
            first,
            second,
            value,
        })
    }
}

pub(crate) fn check_variance(value: f64, first: usize, second: usize) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EtaError::InvalidVariance {
            first,
            second,
            value,
        })
    }
}
