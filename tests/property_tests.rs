use eta_measure::{
    eta, eta_dict, eta_dict_with_config, eta_p, eta_p_dict, EtaConfig, EtaError, PairMap,
};
use proptest::prelude::*;

/// Random complementary judgements over `n` items plus a random ranking.
fn case() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<usize>)> {
    (2usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(0.0f64..=1.0, n * (n - 1) / 2),
            Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
        )
            .prop_map(move |(upper, ranking)| {
                let mut m = vec![vec![0.5; n]; n];
                let mut k = 0;
                for x in 0..n {
                    for y in (x + 1)..n {
                        m[x][y] = upper[k];
                        m[y][x] = 1.0 - upper[k];
                        k += 1;
                    }
                }
                (m, ranking)
            })
    })
}

/// Every off-diagonal entry as a sparse map.
fn to_map(prefs: &[Vec<f64>]) -> PairMap<usize> {
    let mut map = PairMap::new();
    for (x, row) in prefs.iter().enumerate() {
        for (y, &p) in row.iter().enumerate() {
            if x != y {
                map.insert((x, y), p);
            }
        }
    }
    map
}

/// Only the `x < y` half; the other orientation is implied.
fn to_half_map(prefs: &[Vec<f64>]) -> PairMap<usize> {
    to_map(prefs).into_iter().filter(|((x, y), _)| x < y).collect()
}

proptest! {
    #[test]
    fn prop_sparse_matches_dense((prefs, ranking) in case()) {
        let dense = eta(&ranking, &prefs).unwrap();
        let sparse = eta_dict(&ranking, &to_map(&prefs)).unwrap();
        prop_assert_eq!(dense, sparse);
    }

    #[test]
    fn prop_implied_orientation_matches_dense((prefs, ranking) in case()) {
        let dense = eta(&ranking, &prefs).unwrap();
        let sparse = eta_dict(&ranking, &to_half_map(&prefs)).unwrap();
        prop_assert!((dense - sparse).abs() < 1e-9, "{} vs {}", dense, sparse);
    }

    #[test]
    fn prop_sparse_zero_variance_collapses((prefs, ranking) in case()) {
        let map = to_half_map(&prefs);
        let variances: PairMap<usize> = map.keys().map(|&k| (k, 0.0)).collect();
        prop_assert_eq!(
            eta_p_dict(&ranking, &map, &variances).unwrap(),
            eta_dict(&ranking, &map).unwrap()
        );
    }

    #[test]
    fn prop_sparse_variance_matches_dense(
        (prefs, ranking) in case(),
        noise in prop::collection::vec(0.0f64..10.0, 64)
    ) {
        let n = ranking.len();
        let mut variances = vec![vec![0.0; n]; n];
        let mut sparse_variances = PairMap::new();
        for x in 0..n {
            for y in 0..n {
                // variances are symmetric
                let v = noise[x.min(y) * 8 + x.max(y)];
                variances[x][y] = v;
                if x != y {
                    sparse_variances.insert((x, y), v);
                }
            }
        }
        let dense = eta_p(&ranking, &prefs, &variances).unwrap();
        let sparse = eta_p_dict(&ranking, &to_map(&prefs), &sparse_variances).unwrap();
        prop_assert_eq!(dense, sparse);
    }

    #[test]
    fn prop_incomplete_stays_bounded(
        (prefs, ranking) in case(),
        keep in prop::collection::vec(any::<bool>(), 28)
    ) {
        let full = to_half_map(&prefs);
        let mut keys: Vec<(usize, usize)> = full.keys().copied().collect();
        keys.sort_unstable();
        let partial: PairMap<usize> = keys
            .iter()
            .zip(keep.iter())
            .filter(|&(_, &kept)| kept)
            .map(|(k, _)| (*k, full[k]))
            .collect();

        match eta_dict(&ranking, &partial) {
            Ok(value) => prop_assert!((-1.0..=1.0).contains(&value)),
            Err(e) => {
                prop_assert!(partial.is_empty());
                prop_assert_eq!(e, EtaError::InsufficientData);
            }
        }

        let strict = eta_dict_with_config(&ranking, &partial, EtaConfig::strict());
        if partial.len() == full.len() {
            prop_assert!(strict.is_ok());
        } else {
            let is_missing_pair = matches!(strict, Err(EtaError::MissingPair { .. }));
            prop_assert!(is_missing_pair);
        }
    }

    #[test]
    fn prop_extra_keys_ignored(
        (prefs, ranking) in case(),
        extra in prop::collection::vec((100usize..200, 0usize..200, 0.0f64..=1.0), 0..20)
    ) {
        let map = to_half_map(&prefs);
        let mut noisy = map.clone();
        for (x, y, p) in extra {
            noisy.entry((x, y)).or_insert(p);
        }
        prop_assert_eq!(
            eta_dict(&ranking, &map).unwrap(),
            eta_dict(&ranking, &noisy).unwrap()
        );
    }

    #[test]
    fn prop_perfect_agreement(n in 2usize..30) {
        // Item x beats every later item: identity ranking is ideal.
        let prefs: Vec<Vec<f64>> = (0..n)
            .map(|x| (0..n).map(|y| if x < y { 1.0 } else { 0.0 }).collect())
            .collect();
        let identity: Vec<usize> = (0..n).collect();
        let reversed: Vec<usize> = (0..n).rev().collect();
        prop_assert_eq!(eta(&identity, &prefs).unwrap(), 1.0);
        prop_assert_eq!(eta(&reversed, &prefs).unwrap(), -1.0);
    }
}
