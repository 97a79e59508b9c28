use proptest::prelude::*;

use crate::aggregate::aggregate;
use crate::{eta, eta_p, eta_with_config, DenseLabels, EtaConfig, PairSource};

/// Complementary matrix: `m[y][x] = 1 - m[x][y]`, neutral diagonal.
fn complementary(n: usize, upper: &[f64]) -> Vec<Vec<f64>> {
    let mut m = vec![vec![0.5; n]; n];
    let mut k = 0;
    for x in 0..n {
        for y in (x + 1)..n {
            m[x][y] = upper[k];
            m[y][x] = 1.0 - upper[k];
            k += 1;
        }
    }
    m
}

/// (matrix, permutation ranking) for 2..8 items.
fn dense_case() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<usize>)> {
    (2usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(0.0f64..=1.0, n * (n - 1) / 2),
            Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
        )
            .prop_map(move |(upper, ranking)| (complementary(n, &upper), ranking))
    })
}

proptest! {
    #[test]
    fn eta_is_bounded((prefs, ranking) in dense_case()) {
        let value = eta(&ranking, &prefs).unwrap();
        prop_assert!((-1.0..=1.0).contains(&value), "eta {} out of bounds", value);
    }

    #[test]
    fn eta_p_is_bounded(
        (prefs, ranking) in dense_case(),
        noise in prop::collection::vec(0.0f64..100.0, 64)
    ) {
        let n = ranking.len();
        let variances: Vec<Vec<f64>> = (0..n)
            .map(|x| (0..n).map(|y| noise[x * 8 + y]).collect())
            .collect();
        let value = eta_p(&ranking, &prefs, &variances).unwrap();
        prop_assert!((-1.0..=1.0).contains(&value), "eta_p {} out of bounds", value);
    }

    #[test]
    fn reversing_ranking_negates_eta((prefs, ranking) in dense_case()) {
        let reversed: Vec<usize> = ranking.iter().rev().copied().collect();
        let forward = eta(&ranking, &prefs).unwrap();
        let backward = eta(&reversed, &prefs).unwrap();
        prop_assert!((forward + backward).abs() < 1e-9, "{} vs {}", forward, backward);
    }

    #[test]
    fn concordance_never_exceeds_ideal((prefs, ranking) in dense_case()) {
        let tally = aggregate(
            &DenseLabels::new(&prefs)
                .judgements(&ranking, EtaConfig::default())
                .unwrap()
                .pairs,
        )
        .unwrap();
        prop_assert!(tally.concordance.abs() <= tally.ideal + 1e-12);
    }

    #[test]
    fn zero_variance_collapses_to_eta((prefs, ranking) in dense_case()) {
        let n = ranking.len();
        let zeros = vec![vec![0.0; n]; n];
        prop_assert_eq!(
            eta_p(&ranking, &prefs, &zeros).unwrap(),
            eta(&ranking, &prefs).unwrap()
        );
    }

    #[test]
    fn strict_dense_matches_lenient((prefs, ranking) in dense_case()) {
        prop_assert_eq!(
            eta_with_config(&ranking, &prefs, EtaConfig::strict()),
            eta(&ranking, &prefs)
        );
    }
}
