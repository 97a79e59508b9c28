//! Eta: Kendall's tau for noisy and incomplete preference judgements.
//!
//! Score how well a ranking agrees with pairwise preference judgements that
//! may be probabilistic, partial, or come with a variance.
//!
//! ```rust
//! use eta_measure::eta;
//!
//! // prefs[x][y]: degree to which item x is preferred over item y
//! let prefs = [[1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]];
//!
//! assert_eq!(eta(&[0, 1, 2], &prefs).unwrap(), 1.0);
//! assert_eq!(eta(&[2, 1, 0], &prefs).unwrap(), -1.0);
//! ```
//!
//! # Operations
//!
//! | Function | Judgements | Variances |
//! |----------|------------|-----------|
//! | [`eta`] | dense `n × n` matrix | no |
//! | [`eta_p`] | dense `n × n` matrix | dense `n × n` matrix |
//! | [`eta_dict`] | sparse `(x, y) -> p` map | no |
//! | [`eta_p_dict`] | sparse `(x, y) -> p` map | sparse `(x, y) -> v` map |
//!
//! Each has a `*_with_config` variant taking [`EtaConfig`]. All four are thin
//! wrappers over [`eta_with`], which accepts any [`PairSource`].
//!
//! # Interpretation
//!
//! The result lies in `[-1, 1]`:
//!
//! | Value | Meaning |
//! |-------|---------|
//! | `1.0` | every judged pair agrees with the ranking |
//! | `0.0` | agreement and disagreement cancel out, or no signal |
//! | `-1.0` | every judged pair disagrees with the ranking |
//!
//! Unlike Kendall's tau, eta normalizes by the best score any ranking could
//! reach under the same judgements, counting only pairs that were judged.
//! A missing judgement is therefore neutral, not a disagreement.
//!
//! # Degenerate input
//!
//! A ranking with no judged pairs (fewer than two items, or a sparse map
//! that covers none of its pairs) returns [`EtaError::InsufficientData`].
//! Judged pairs that are all exactly neutral (`p = 0.5`) return `0.0`.

use std::hash::Hash;

mod aggregate;
pub mod pairs;
pub mod validate;

#[cfg(test)]
mod proptests;

pub use pairs::{
    DenseLabels, DenseProbabilities, JudgedPairs, PairJudgement, PairMap, PairSource, Positions,
    SparseLabels, SparseProbabilities,
};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while computing eta.
///
/// Pair positions (`first`, `second`) are indices into the ranking, not item
/// ids, so they can be reported for any item type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EtaError {
    /// A dense matrix is not `n × n` for a ranking of `n` items.
    #[error("{matrix} matrix is {rows}x{cols}, expected {expected}x{expected}")]
    ShapeMismatch {
        /// `"preference"` or `"variance"`.
        matrix: &'static str,
        rows: usize,
        cols: usize,
        expected: usize,
    },
    /// A dense ranking refers to a row the matrix does not have.
    #[error("ranking position {position} holds index {index}, but the matrix has {len} rows")]
    IndexOutOfRange {
        position: usize,
        index: usize,
        len: usize,
    },
    /// The same item is ranked twice.
    #[error("item at ranking position {position} is ranked twice")]
    DuplicateItem { position: usize },
    /// A preference is not a finite value in `[0, 1]`.
    #[error("preference {value} for ranking positions ({first}, {second}) is outside [0, 1]")]
    InvalidPreference {
        first: usize,
        second: usize,
        value: f64,
    },
    /// A variance is negative or not finite.
    #[error("variance {value} for ranking positions ({first}, {second}) is negative or not finite")]
    InvalidVariance {
        first: usize,
        second: usize,
        value: f64,
    },
    /// Strict mode: a pair of ranked items has no judgement.
    #[error("no judgement for ranking positions ({first}, {second})")]
    MissingPair { first: usize, second: usize },
    /// A judged sparse pair has no variance in either orientation.
    #[error("no variance for judged ranking positions ({first}, {second})")]
    MissingVariance { first: usize, second: usize },
    /// No pair of ranked items was judged.
    #[error("no judged pairs among the ranked items")]
    InsufficientData,
}

/// Result type for eta operations.
pub type Result<T> = std::result::Result<T, EtaError>;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Eta configuration.
///
/// # Example
///
/// ```rust
/// use eta_measure::EtaConfig;
///
/// let config = EtaConfig::default().with_strict(true);
/// assert_eq!(config, EtaConfig::strict());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EtaConfig {
    /// Fail with [`EtaError::MissingPair`] when a pair of ranked items has no
    /// judgement, instead of leaving it out (default: false).
    ///
    /// Only sparse input can be incomplete.
    pub strict: bool,
}

impl EtaConfig {
    /// Config that requires every ranked pair to be judged.
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }

    /// Set strict mode.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Full account of an eta computation, from [`eta_explain`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EtaBreakdown {
    /// The eta value, as returned by [`eta_with`].
    pub value: f64,
    /// Sum of weighted margins along the ranking (the numerator).
    pub concordance: f64,
    /// Sum of absolute weighted margins (the ideal ranking's score).
    pub ideal: f64,
    /// Sum of pair weights `1 / (1 + variance)`.
    ///
    /// Informational only: eta divides by [`ideal`](Self::ideal), not by this.
    pub total_weight: f64,
    /// Pairs that had a judgement.
    pub consulted: usize,
    /// Pairs of ranked items without a judgement.
    pub skipped: usize,
}

impl EtaBreakdown {
    /// Fraction of the ranking's pairs that were judged.
    #[must_use]
    pub fn coverage(&self) -> f64 {
        let total = self.consulted + self.skipped;
        if total == 0 {
            0.0
        } else {
            self.consulted as f64 / total as f64
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Eta and its derivation for `ranking` under any [`PairSource`].
///
/// ```rust
/// use eta_measure::{eta_explain, EtaConfig, PairMap, SparseLabels};
///
/// let prefs: PairMap<&str> = [(("a", "b"), 1.0), (("b", "c"), 0.75)].into_iter().collect();
/// let report = eta_explain(&["a", "b", "c"], &SparseLabels::new(&prefs), EtaConfig::default())
///     .unwrap();
///
/// assert_eq!(report.consulted, 2);
/// assert_eq!(report.skipped, 1);
/// assert_eq!(report.value, 1.0);
/// ```
pub fn eta_explain<I, S>(ranking: &[I], source: &S, config: EtaConfig) -> Result<EtaBreakdown>
where
    S: PairSource<I> + ?Sized,
{
    let judged = source.judgements(ranking, config)?;
    let tally = aggregate::aggregate(&judged.pairs)?;

    let value = match tally.value() {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(
                items = ranking.len(),
                skipped = judged.skipped,
                error = %e,
                "eta undefined"
            );
            return Err(e);
        }
    };

    tracing::debug!(
        items = ranking.len(),
        consulted = tally.consulted,
        skipped = judged.skipped,
        value,
        "eta computed"
    );

    Ok(EtaBreakdown {
        value,
        concordance: tally.concordance,
        ideal: tally.ideal,
        total_weight: tally.total_weight,
        consulted: tally.consulted,
        skipped: judged.skipped,
    })
}

/// Eta for `ranking` under any [`PairSource`].
pub fn eta_with<I, S>(ranking: &[I], source: &S, config: EtaConfig) -> Result<f64>
where
    S: PairSource<I> + ?Sized,
{
    eta_explain(ranking, source, config).map(|report| report.value)
}

/// Eta from a dense preference matrix.
///
/// `ranking` holds matrix indices; `prefs[x][y]` is the degree to which item
/// `x` is preferred over item `y`, ideally with `prefs[x][y] == 1 - prefs[y][x]`.
///
/// ```rust
/// use eta_measure::eta;
///
/// let prefs = [
///     [0.5, 0.2, 0.4, 0.3],
///     [0.8, 0.5, 0.1, 0.4],
///     [0.6, 0.9, 0.5, 0.4],
///     [0.7, 0.6, 0.6, 0.5],
/// ];
/// let value = eta(&[2, 1, 3, 0], &prefs).unwrap();
/// assert!((value - 2.0 / 3.0).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// [`EtaError::ShapeMismatch`] unless `prefs` is `n × n` for `n` ranked
/// items, [`EtaError::IndexOutOfRange`] / [`EtaError::DuplicateItem`] unless
/// the ranking is a permutation of `0..n`, [`EtaError::InvalidPreference`]
/// for values outside `[0, 1]`, and [`EtaError::InsufficientData`] for
/// rankings shorter than two.
pub fn eta<R: AsRef<[f64]>>(ranking: &[usize], prefs: &[R]) -> Result<f64> {
    eta_with_config(ranking, prefs, EtaConfig::default())
}

/// [`eta`] with explicit configuration.
pub fn eta_with_config<R: AsRef<[f64]>>(
    ranking: &[usize],
    prefs: &[R],
    config: EtaConfig,
) -> Result<f64> {
    eta_with(ranking, &DenseLabels::new(prefs), config)
}

/// Eta_p from a dense preference matrix and its variance matrix.
///
/// Each pair is weighted by `1 / (1 + variances[x][y])`, so confident
/// judgements count more than noisy ones. With all variances zero this is
/// exactly [`eta`].
///
/// ```rust
/// use eta_measure::eta_p;
///
/// let prefs = [[0.5, 1.0, 1.0], [0.0, 0.5, 0.0], [0.0, 1.0, 0.5]];
/// let variances = [[0.0, 0.0, 0.0], [0.0, 0.0, 9.0], [0.0, 9.0, 0.0]];
///
/// // The only disagreement (1 before 2) is very noisy.
/// let value = eta_p(&[0, 1, 2], &prefs, &variances).unwrap();
/// assert!((value - 1.9 / 2.1).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// As [`eta`], plus [`EtaError::ShapeMismatch`] for a variance matrix of the
/// wrong shape and [`EtaError::InvalidVariance`] for negative variances.
pub fn eta_p<R, V>(ranking: &[usize], prefs: &[R], variances: &[V]) -> Result<f64>
where
    R: AsRef<[f64]>,
    V: AsRef<[f64]>,
{
    eta_p_with_config(ranking, prefs, variances, EtaConfig::default())
}

/// [`eta_p`] with explicit configuration.
pub fn eta_p_with_config<R, V>(
    ranking: &[usize],
    prefs: &[R],
    variances: &[V],
    config: EtaConfig,
) -> Result<f64>
where
    R: AsRef<[f64]>,
    V: AsRef<[f64]>,
{
    eta_with(ranking, &DenseProbabilities::new(prefs, variances), config)
}

/// Eta from a sparse preference map.
///
/// `prefs[(x, y)]` is the degree to which `x` is preferred over `y`. Either
/// orientation of a pair may be stored; `(y, x) -> q` is read as
/// `(x, y) -> 1 - q`. Pairs of ranked items with no entry are left out, and
/// entries for items outside the ranking are ignored.
///
/// ```rust
/// use eta_measure::{eta_dict, PairMap};
///
/// let prefs: PairMap<&str> = [(("a", "b"), 1.0), (("a", "c"), 1.0), (("b", "c"), 1.0)]
///     .into_iter()
///     .collect();
///
/// assert_eq!(eta_dict(&["a", "b", "c"], &prefs).unwrap(), 1.0);
/// assert_eq!(eta_dict(&["c", "b", "a"], &prefs).unwrap(), -1.0);
/// ```
///
/// # Errors
///
/// [`EtaError::DuplicateItem`], [`EtaError::InvalidPreference`], and
/// [`EtaError::InsufficientData`] when no ranked pair is judged.
pub fn eta_dict<I: Clone + Eq + Hash>(ranking: &[I], prefs: &PairMap<I>) -> Result<f64> {
    eta_dict_with_config(ranking, prefs, EtaConfig::default())
}

/// [`eta_dict`] with explicit configuration.
pub fn eta_dict_with_config<I: Clone + Eq + Hash>(
    ranking: &[I],
    prefs: &PairMap<I>,
    config: EtaConfig,
) -> Result<f64> {
    eta_with(ranking, &SparseLabels::new(prefs), config)
}

/// Eta_p from a sparse preference map and a sparse variance map.
///
/// Every judged pair needs a variance, stored under either orientation.
///
/// # Errors
///
/// As [`eta_dict`], plus [`EtaError::MissingVariance`] and
/// [`EtaError::InvalidVariance`].
pub fn eta_p_dict<I: Clone + Eq + Hash>(
    ranking: &[I],
    prefs: &PairMap<I>,
    variances: &PairMap<I>,
) -> Result<f64> {
    eta_p_dict_with_config(ranking, prefs, variances, EtaConfig::default())
}

/// [`eta_p_dict`] with explicit configuration.
pub fn eta_p_dict_with_config<I: Clone + Eq + Hash>(
    ranking: &[I],
    prefs: &PairMap<I>,
    variances: &PairMap<I>,
    config: EtaConfig,
) -> Result<f64> {
    eta_with(ranking, &SparseProbabilities::new(prefs, variances), config)
}

// ─────────────────────────────────────────────────────────────────────────────
// Prelude
// ─────────────────────────────────────────────────────────────────────────────

/// Prelude for common imports.
///
/// ```rust
/// use eta_measure::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        eta, eta_dict, eta_dict_with_config, eta_explain, eta_p, eta_p_dict,
        eta_p_dict_with_config, eta_p_with_config, eta_with, eta_with_config,
    };
    pub use crate::{
        DenseLabels, DenseProbabilities, EtaBreakdown, EtaConfig, EtaError, PairMap,
        PairSource, Result, SparseLabels, SparseProbabilities,
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
