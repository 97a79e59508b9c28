//! The eta aggregation itself.
//!
//! # Formula
//!
//! For each consulted pair with margin `m = 2p - 1` and variance `v`:
//!
//! ```text
//! label_ij = m / (1 + v)
//! eta      = Σ label_ij / Σ |label_ij|
//! ```
//!
//! The numerator scores the proposed ranking. The denominator is the score of
//! the ideal ranking for the same judgements, which puts every pair in the
//! order its own judgement prefers. Only consulted pairs enter either sum, so
//! unjudged pairs shrink the denominator instead of counting as disagreement.
//!
//! Reference: Togashi & Sakai, "Generalising Kendall's Tau for Noisy and
//! Incomplete Preference Judgements", ICTIR 2019.

use crate::pairs::{PairJudgement, Positions};
use crate::validate::{check_preference, check_variance};
use crate::{EtaError, Result};

/// Running sums over consulted pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Tally {
    pub concordance: f64,
    pub ideal: f64,
    pub total_weight: f64,
    pub consulted: usize,
}

impl Tally {
    pub(crate) fn add(&mut self, pair: &PairJudgement) {
        let label = pair.label();
        self.concordance += label;
        self.ideal += label.abs();
        self.total_weight += pair.weight();
        self.consulted += 1;
    }

    /// Normalized eta.
    ///
    /// No consulted pairs is an error. Consulted pairs that are all neutral
    /// give an ideal of zero and carry no signal, which is `0.0`.
    pub(crate) fn value(&self) -> Result<f64> {
        if self.consulted == 0 {
            return Err(EtaError::InsufficientData);
        }
        if self.ideal <= 0.0 {
            return Ok(0.0);
        }
        Ok((self.concordance / self.ideal).clamp(-1.0, 1.0))
    }
}

/// Sum the pairs, rejecting any whose margin lies outside `[-1, 1]` or whose
/// variance is negative, which would break the `[-1, 1]` bound on eta.
pub(crate) fn aggregate(pairs: &[(Positions, PairJudgement)]) -> Result<Tally> {
    let mut tally = Tally::default();
    for &((first, second), pair) in pairs {
        check_preference(pair.preference(), first, second)?;
        check_variance(pair.variance, first, second)?;
        tally.add(&pair);
    }
    Ok(tally)
}
