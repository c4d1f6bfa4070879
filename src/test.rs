// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

#[cfg(test)]
mod e2e_tests {
    use std::collections::BTreeSet;

    use proptest::{
        collection::vec,
        prelude::*,
        proptest,
    };
    use rand::{
        rngs::SmallRng,
        Rng,
        SeedableRng,
    };

    use crate::{
        Config,
        DeterministicSkipList,
        OrderedIndex,
        SkipList,
    };

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Insert(i64),
        Remove(i64),
        Search(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        // a narrow key space makes duplicates and misses common
        prop_oneof![
            3 => (-64i64..64).prop_map(Op::Insert),
            2 => (-64i64..64).prop_map(Op::Remove),
            1 => (-64i64..64).prop_map(Op::Search),
        ]
    }

    /// Every level strictly increasing, nested in the level below, and no
    /// deeper than the height cap.
    fn assert_levels_nest<I: OrderedIndex>(index: &I, max_height: usize) {
        let levels = index.levels();
        assert!(levels.len() <= max_height);
        assert_eq!(levels.len(), index.height());
        for level in &levels {
            assert!(level.windows(2).all(|w| w[0] < w[1]), "{:?}", level);
        }
        for pair in levels.windows(2) {
            assert!(pair[0].iter().all(|k| pair[1].binary_search(k).is_ok()));
        }
    }

    /// Applies `ops` to `index` and to a `BTreeSet`, checking every outcome
    /// against the model. `check` runs after each mutation.
    fn run_against_model<I, F>(index: &mut I, ops: &[Op], max_height: usize, check: F)
    where
        I: OrderedIndex,
        F: Fn(&I), {
        let mut model = BTreeSet::new();
        for op in ops {
            match *op {
                | Op::Insert(k) => {
                    assert_eq!(index.insert(k).unwrap(), model.insert(k));
                    check(index);
                },
                | Op::Remove(k) => {
                    assert_eq!(index.remove(k), model.remove(&k));
                    check(index);
                },
                | Op::Search(k) => {
                    let found = index.search(k);
                    assert_eq!(found.is_some(), model.contains(&k));
                    if let Some(tower) = found {
                        assert_eq!(tower.key, k);
                        assert!(tower.height >= 1 && tower.height <= max_height);
                    }
                },
            }
            assert_eq!(index.len(), model.len());
        }
        assert_eq!(index.keys(), model.iter().copied().collect::<Vec<_>>());
        assert_levels_nest(index, max_height);
    }

    proptest! {
        #[test]
        fn test_probabilistic_matches_model(
            ops in vec(op(), 1..400),
            seed in any::<u64>(),
            p in 0.05f64..0.95,
        ) {
            let config = Config::default().with_max_height(8).with_level_probability(p);
            let mut list = SkipList::seeded(config, seed).unwrap();
            run_against_model(&mut list, &ops, 8, |_| {});
        }

        #[test]
        fn test_deterministic_matches_model(
            ops in vec(op(), 1..400),
            gap_bound in 2usize..6,
        ) {
            let config = Config::default().with_gap_bound(gap_bound);
            let mut list = DeterministicSkipList::new(config).unwrap();
            run_against_model(&mut list, &ops, config.max_height(), |list| {
                list.check_invariants().unwrap();
            });
        }

        #[test]
        fn test_insert_then_remove_restores_keys(
            keys in vec(-1_000i64..1_000, 0..200),
            extra in -1_000i64..1_000,
        ) {
            let mut det = DeterministicSkipList::new(Config::default()).unwrap();
            let mut prob = SkipList::seeded(Config::default(), 99).unwrap();
            for k in &keys {
                det.insert(*k).unwrap();
                prob.insert(*k).unwrap();
            }
            prop_assume!(!det.contains(extra));

            let det_before = det.keys();
            let prob_before = prob.keys();
            prop_assert!(det.insert(extra).unwrap());
            prop_assert!(prob.insert(extra).unwrap());
            prop_assert!(det.remove(extra));
            prop_assert!(prob.remove(extra));
            prop_assert_eq!(det.keys(), det_before);
            prop_assert_eq!(prob.keys(), prob_before);
            det.check_invariants().unwrap();
        }
    }

    #[test]
    fn test_engines_agree_on_random_workload() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut det = DeterministicSkipList::new(Config::default()).unwrap();
        let mut prob = SkipList::seeded(Config::default(), 0x5eed).unwrap();

        for _ in 0..20_000 {
            let key = rng.gen_range(0..2_000);
            if rng.gen_bool(0.6) {
                assert_eq!(det.insert(key).unwrap(), prob.insert(key).unwrap());
            } else {
                assert_eq!(det.remove(key), prob.remove(key));
            }
        }
        assert_eq!(det.keys(), prob.keys());
        det.check_invariants().unwrap();
        assert_levels_nest(&prob, prob.max_height());
    }

    #[test]
    fn test_documented_scenarios() {
        let config = Config::default().with_max_height(4);
        let mut prob = SkipList::new(config).unwrap();
        for k in [50, 20, 70, 10, 30] {
            prob.insert(k).unwrap();
        }
        assert!(prob.search(30).is_some());
        assert!(prob.search(40).is_none());
        assert_eq!(prob.keys(), vec![10, 20, 30, 50, 70]);

        let mut det = DeterministicSkipList::new(Config::default().with_gap_bound(3)).unwrap();
        for k in 1..=20 {
            det.insert(k).unwrap();
            det.check_invariants().unwrap();
        }
        assert_eq!(det.keys(), (1..=20).collect::<Vec<_>>());
    }
}
