//! Input normalization: every input shape becomes a list of [`PairJudgement`]s.
//!
//! A ranking of `n` items proposes an order for each of its `n(n-1)/2` pairs.
//! For every pair `(ranking[i], ranking[j])` with `i < j`, an adapter looks up
//! the judged preference and orients it so that it answers one question:
//! *how strongly do the judgements agree that the earlier item comes first?*
//!
//! | Adapter | Input | Variance |
//! |---------|-------|----------|
//! | [`DenseLabels`] | `n × n` matrix indexed by ranking ids | none |
//! | [`DenseProbabilities`] | `n × n` matrix | `n × n` matrix |
//! | [`SparseLabels`] | `(x, y) -> p` map | none |
//! | [`SparseProbabilities`] | `(x, y) -> p` map | `(x, y) -> v` map |

use std::collections::HashMap;
use std::hash::Hash;

use crate::validate::{
    check_preference, check_variance, validate_dense, validate_square, validate_unique,
    VARIANCE_MATRIX,
};
use crate::{EtaConfig, EtaError, Result};

/// Sparse pairwise data keyed by ordered item pairs.
///
/// For preferences, `(x, y) -> p` means `x` is preferred over `y` with degree
/// `p`; the reverse key may be omitted and is then read as `1 - p`. For
/// variances, either orientation may be stored.
pub type PairMap<I> = HashMap<(I, I), f64>;

/// One judged pair, oriented along the ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairJudgement {
    /// `2p - 1`, where `p` is the degree to which the earlier-ranked item is
    /// preferred. `1.0` agrees fully with the ranking, `-1.0` disagrees.
    pub margin: f64,
    /// Variance of the preference estimate (`0.0` for plain labels).
    pub variance: f64,
}

impl PairJudgement {
    /// Judgement with preference `p` for the earlier-ranked item.
    #[must_use]
    pub fn new(preference: f64, variance: f64) -> Self {
        Self {
            margin: 2.0 * preference - 1.0,
            variance,
        }
    }

    /// The same judgement seen from the other item.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            margin: -self.margin,
            variance: self.variance,
        }
    }

    /// Degree to which the earlier-ranked item is preferred, `(margin + 1) / 2`.
    #[must_use]
    pub fn preference(&self) -> f64 {
        (self.margin + 1.0) / 2.0
    }

    /// Trust placed in this pair: `1 / (1 + variance)`.
    #[must_use]
    pub fn weight(&self) -> f64 {
        1.0 / (1.0 + self.variance)
    }

    /// Weighted margin, the pair's contribution to eta.
    #[must_use]
    pub fn label(&self) -> f64 {
        self.margin * self.weight()
    }
}

/// Ranking positions `(first, second)` of a pair, `first < second`.
pub type Positions = (usize, usize);

/// Judged pairs for one ranking, ready for aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JudgedPairs {
    /// Consulted pairs with their ranking positions, in ranking order.
    pub pairs: Vec<(Positions, PairJudgement)>,
    /// Ranking pairs with no judgement (always `0` for dense input).
    pub skipped: usize,
}

/// Source of pairwise judgements for rankings over items of type `I`.
///
/// The four adapters in this module implement it; callers with their own
/// storage (a database row cache, a judgement log) can implement it too and
/// reuse [`crate::eta_with`]. Their judgements are range-checked during
/// aggregation like those of the built-in adapters.
pub trait PairSource<I> {
    /// Collect the judged pairs of `ranking`, oriented along it.
    fn judgements(&self, ranking: &[I], config: EtaConfig) -> Result<JudgedPairs>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Dense
// ─────────────────────────────────────────────────────────────────────────────

/// Dense preference matrix without variances.
///
/// `prefs[x][y]` is the degree to which item `x` is preferred over item `y`.
#[derive(Debug, Clone, Copy)]
pub struct DenseLabels<'a, R> {
    prefs: &'a [R],
}

impl<'a, R: AsRef<[f64]>> DenseLabels<'a, R> {
    /// Wrap an `n × n` preference matrix.
    #[must_use]
    pub fn new(prefs: &'a [R]) -> Self {
        Self { prefs }
    }
}

impl<R: AsRef<[f64]>> PairSource<usize> for DenseLabels<'_, R> {
    fn judgements(&self, ranking: &[usize], _config: EtaConfig) -> Result<JudgedPairs> {
        dense_judgements::<R, R>(ranking, self.prefs, None)
    }
}

/// Dense preference matrix with a matching variance matrix.
#[derive(Debug, Clone, Copy)]
pub struct DenseProbabilities<'a, R, V = R> {
    prefs: &'a [R],
    variances: &'a [V],
}

impl<'a, R: AsRef<[f64]>, V: AsRef<[f64]>> DenseProbabilities<'a, R, V> {
    /// Wrap an `n × n` preference matrix and its `n × n` variance matrix.
    #[must_use]
    pub fn new(prefs: &'a [R], variances: &'a [V]) -> Self {
        Self { prefs, variances }
    }
}

impl<R: AsRef<[f64]>, V: AsRef<[f64]>> PairSource<usize> for DenseProbabilities<'_, R, V> {
    fn judgements(&self, ranking: &[usize], _config: EtaConfig) -> Result<JudgedPairs> {
        dense_judgements(ranking, self.prefs, Some(self.variances))
    }
}

/// Dense matrices are complete, so `strict` has nothing to enforce here.
fn dense_judgements<R, V>(
    ranking: &[usize],
    prefs: &[R],
    variances: Option<&[V]>,
) -> Result<JudgedPairs>
where
    R: AsRef<[f64]>,
    V: AsRef<[f64]>,
{
    validate_dense(ranking, prefs)?;
    if let Some(variances) = variances {
        validate_square(variances, ranking.len(), VARIANCE_MATRIX)?;
    }

    let n = ranking.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for (i, &x) in ranking.iter().enumerate() {
        let row = prefs[x].as_ref();
        for (j, &y) in ranking.iter().enumerate().skip(i + 1) {
            let preference = check_preference(row[y], i, j)?;
            let variance = match variances {
                Some(v) => check_variance(v[x].as_ref()[y], i, j)?,
                None => 0.0,
            };
            pairs.push(((i, j), PairJudgement::new(preference, variance)));
        }
    }

    Ok(JudgedPairs { pairs, skipped: 0 })
}

// ─────────────────────────────────────────────────────────────────────────────
// Sparse
// ─────────────────────────────────────────────────────────────────────────────

/// Sparse preference map without variances.
#[derive(Debug, Clone, Copy)]
pub struct SparseLabels<'a, I> {
    prefs: &'a PairMap<I>,
}

impl<'a, I: Clone + Eq + Hash> SparseLabels<'a, I> {
    /// Wrap a sparse preference map.
    #[must_use]
    pub fn new(prefs: &'a PairMap<I>) -> Self {
        Self { prefs }
    }
}

impl<I: Clone + Eq + Hash> PairSource<I> for SparseLabels<'_, I> {
    fn judgements(&self, ranking: &[I], config: EtaConfig) -> Result<JudgedPairs> {
        sparse_judgements(ranking, self.prefs, None, config)
    }
}

/// Sparse preference map with a variance map over the same pairs.
#[derive(Debug, Clone, Copy)]
pub struct SparseProbabilities<'a, I> {
    prefs: &'a PairMap<I>,
    variances: &'a PairMap<I>,
}

impl<'a, I: Clone + Eq + Hash> SparseProbabilities<'a, I> {
    /// Wrap a sparse preference map and its variance map.
    #[must_use]
    pub fn new(prefs: &'a PairMap<I>, variances: &'a PairMap<I>) -> Self {
        Self { prefs, variances }
    }
}

impl<I: Clone + Eq + Hash> PairSource<I> for SparseProbabilities<'_, I> {
    fn judgements(&self, ranking: &[I], config: EtaConfig) -> Result<JudgedPairs> {
        sparse_judgements(ranking, self.prefs, Some(self.variances), config)
    }
}

/// Keys outside the ranking are never looked up, so extraneous entries
/// cannot influence the result.
fn sparse_judgements<I: Clone + Eq + Hash>(
    ranking: &[I],
    prefs: &PairMap<I>,
    variances: Option<&PairMap<I>>,
    config: EtaConfig,
) -> Result<JudgedPairs> {
    validate_unique(ranking)?;

    let mut judged = JudgedPairs::default();
    for (i, x) in ranking.iter().enumerate() {
        for (j, y) in ranking.iter().enumerate().skip(i + 1) {
            let forward = (x.clone(), y.clone());
            let backward = (y.clone(), x.clone());

            let (judgement, key, other) = if let Some(&p) = prefs.get(&forward) {
                let p = check_preference(p, i, j)?;
                (PairJudgement::new(p, 0.0), &forward, &backward)
            } else if let Some(&p) = prefs.get(&backward) {
                let p = check_preference(p, i, j)?;
                (PairJudgement::new(p, 0.0).reversed(), &backward, &forward)
            } else if config.strict {
                return Err(EtaError::MissingPair {
                    first: i,
                    second: j,
                });
            } else {
                tracing::trace!(first = i, second = j, "no judgement for pair, skipped");
                judged.skipped += 1;
                continue;
            };

            let variance = match variances {
                Some(v) => {
                    let raw = v
                        .get(key)
                        .or_else(|| v.get(other))
                        .copied()
                        .ok_or(EtaError::MissingVariance {
                            first: i,
                            second: j,
                        })?;
                    check_variance(raw, i, j)?
                }
                None => 0.0,
            };

            judged.pairs.push((
                (i, j),
                PairJudgement {
                    variance,
                    ..judgement
                },
            ));
        }
    }

    Ok(judged)
}
