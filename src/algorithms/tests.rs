//! Test suite for the matching engine.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::stats::OutcomeKind;

fn opts(agent: AgentId, pairs: &[(ResourceId, f64)]) -> OptionSet {
    OptionSet::new(agent, pairs.iter().copied().collect::<BTreeMap<_, _>>())
}

fn stats() -> AdaptiveStatistics {
    AdaptiveStatistics::new(20, 5.0)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Best total over every complete assignment, by exhaustive enumeration.
fn brute_force_best(options: &[OptionSet], weight: &dyn Fn(f64) -> f64) -> Option<f64> {
    fn go(
        row: usize,
        options: &[OptionSet],
        used: &mut BTreeSet<ResourceId>,
        weight: &dyn Fn(f64) -> f64,
    ) -> Option<f64> {
        if row == options.len() {
            return Some(0.0);
        }
        let mut best: Option<f64> = None;
        for (&r, &p) in options[row].options() {
            if used.insert(r) {
                if let Some(rest) = go(row + 1, options, used, weight) {
                    let total = weight(p) + rest;
                    best = Some(best.map_or(total, |b: f64| b.max(total)));
                }
                used.remove(&r);
            }
        }
        best
    }
    go(0, options, &mut BTreeSet::new(), weight)
}

fn assert_valid(result: &[Assignment], options: &[OptionSet]) {
    assert_eq!(result.len(), options.len());
    let agents: BTreeSet<_> = result.iter().map(|a| a.agent).collect();
    let resources: BTreeSet<_> = result.iter().map(|a| a.resource).collect();
    assert_eq!(agents.len(), result.len(), "agent assigned twice");
    assert_eq!(resources.len(), result.len(), "resource double-booked");
    for a in result {
        let set = options.iter().find(|s| s.agent() == a.agent).unwrap();
        assert_eq!(set.payoff(a.resource), Some(a.payoff), "infeasible pair");
    }
}

fn scenario() -> Vec<OptionSet> {
    vec![
        opts(0, &[(0, 10.0), (1, 2.0)]),
        opts(1, &[(0, 8.0), (1, 9.0)]),
        opts(2, &[(2, 5.0)]),
    ]
}

mod policy_labels {
    use super::*;

    #[test]
    fn parse_known_labels() {
        assert_eq!("fair".parse::<Policy>().unwrap(), Policy::Fair);
        assert_eq!("self".parse::<Policy>().unwrap(), Policy::Selfish);
        assert_eq!(" rand ".parse::<Policy>().unwrap(), Policy::Random);
    }

    #[test]
    fn unknown_label_is_error() {
        assert_eq!(
            "auction".parse::<Policy>(),
            Err(MatchingError::UnknownPolicy("auction".to_string()))
        );
    }

    #[test]
    fn display_roundtrips() {
        for p in Policy::all() {
            assert_eq!(p.to_string().parse::<Policy>().unwrap(), p);
            assert_eq!(p.algorithm().name(), p.label());
        }
    }

    #[test]
    fn sample_only_draws_treatment_arms() {
        let mut rng = rng();
        let drawn: BTreeSet<_> = (0..200)
            .map(|_| Policy::sample(&mut rng).label())
            .collect();
        assert_eq!(drawn, BTreeSet::from(["fair", "self"]));
    }
}

mod fair {
    use super::*;

    #[test]
    fn scenario_maximizes_sum() {
        let options = scenario();
        let result = assign(Policy::Fair, &options, 5, &stats(), &mut rng()).unwrap();
        assert_valid(&result, &options);
        assert_eq!(
            result,
            vec![
                Assignment {
                    agent: 0,
                    resource: 0,
                    payoff: 10.0
                },
                Assignment {
                    agent: 1,
                    resource: 1,
                    payoff: 9.0
                },
                Assignment {
                    agent: 2,
                    resource: 2,
                    payoff: 5.0
                },
            ]
        );
        assert_eq!(total_payoff(&result), 24.0);
        assert_eq!(brute_force_best(&options, &|p| p), Some(24.0));
    }

    #[test]
    fn prefers_welfare_over_greedy() {
        // Greedy on agent 0 would take resource 0 (10) and leave agent 1 with 1.
        let options = vec![opts(0, &[(0, 10.0), (1, 9.0)]), opts(1, &[(0, 10.0), (1, 1.0)])];
        let result = assign(Policy::Fair, &options, 2, &stats(), &mut rng()).unwrap();
        assert_eq!(total_payoff(&result), 19.0);
    }

    #[test]
    fn zero_payoff_pairs_are_usable() {
        let options = vec![opts(0, &[(0, 0.0)]), opts(1, &[(0, 3.0), (1, 0.0)])];
        let result = assign(Policy::Fair, &options, 2, &stats(), &mut rng()).unwrap();
        assert_valid(&result, &options);
        assert_eq!(result[0].resource, 0);
        assert_eq!(result[1].resource, 1);
    }
}

mod selfish {
    use super::*;

    #[test]
    fn maximizes_probability_mass() {
        // Priors: level 10 -> 1.0 (weight 0.5), level 20 -> 0.0 (weight 0.0).
        let options = vec![opts(0, &[(0, 20.0), (1, 10.0)])];
        let fair = assign(Policy::Fair, &options, 2, &stats(), &mut rng()).unwrap();
        let selfish = assign(Policy::Selfish, &options, 2, &stats(), &mut rng()).unwrap();
        assert_eq!(fair[0].resource, 0);
        assert_eq!(selfish[0].resource, 1);
        assert_eq!(selfish[0].payoff, 10.0);
    }

    #[test]
    fn follows_adaptive_statistics() {
        let mut stats = stats();
        // Level 10 looks worse once agents keep leaving it.
        for _ in 0..50 {
            stats.record(10, OutcomeKind::Accepted);
        }
        for _ in 0..50 {
            stats.record(5, OutcomeKind::Accepted);
            stats.record(5, OutcomeKind::SwitchedAway);
            stats.record(5, OutcomeKind::SwitchedAway);
        }
        let options = vec![opts(0, &[(0, 10.0), (1, 5.0)])];
        let result = assign(Policy::Selfish, &options, 2, &stats, &mut rng()).unwrap();
        assert_eq!(result[0].resource, 1);
    }

    #[test]
    fn optimal_over_probability_weights() {
        let stats = stats();
        let options = vec![
            opts(0, &[(0, 10.0), (1, 3.0), (2, 17.0)]),
            opts(1, &[(0, 9.0), (2, 12.0)]),
            opts(2, &[(1, 6.0), (3, 14.0)]),
        ];
        let weight = |p: f64| {
            let e = stats.estimate(crate::payoff::payoff_level(p));
            e / (1.0 + e)
        };
        let result = assign(Policy::Selfish, &options, 4, &stats, &mut rng()).unwrap();
        assert_valid(&result, &options);
        let mass: f64 = result.iter().map(|a| weight(a.payoff)).sum();
        let best = brute_force_best(&options, &weight).unwrap();
        assert!((mass - best).abs() < 1e-9);
    }
}

mod random {
    use super::*;

    #[test]
    fn respects_feasibility() {
        let options = scenario();
        let mut rng = rng();
        for _ in 0..100 {
            let result = assign(Policy::Random, &options, 5, &stats(), &mut rng).unwrap();
            assert_valid(&result, &options);
        }
    }

    #[test]
    fn never_strands_an_agent() {
        // Agent 1 can only use resource 0; a naive draw for agent 0 would often take it.
        let options = vec![opts(0, &[(0, 1.0), (1, 1.0), (2, 1.0)]), opts(1, &[(0, 4.0)])];
        let mut rng = rng();
        for _ in 0..100 {
            let result = assign(Policy::Random, &options, 3, &stats(), &mut rng).unwrap();
            assert_eq!(result[1].resource, 0);
            assert_ne!(result[0].resource, 0);
        }
    }

    #[test]
    fn covers_every_compatible_pairing() {
        let options = vec![opts(0, &[(0, 1.0), (1, 1.0), (2, 1.0)])];
        let mut rng = rng();
        let seen: BTreeSet<_> = (0..300)
            .map(|_| assign(Policy::Random, &options, 3, &stats(), &mut rng).unwrap()[0].resource)
            .collect();
        assert_eq!(seen, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn complete_matchings_are_equally_likely() {
        // Three complete matchings: (0, 1), (0, 2) and (1, 2).
        let options = vec![opts(0, &[(0, 1.0), (1, 1.0)]), opts(1, &[(1, 1.0), (2, 1.0)])];
        let mut rng = rng();
        let draws = 6000;
        let mut counts: BTreeMap<(ResourceId, ResourceId), usize> = BTreeMap::new();
        for _ in 0..draws {
            let result = assign(Policy::Random, &options, 3, &stats(), &mut rng).unwrap();
            *counts.entry((result[0].resource, result[1].resource)).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        for (pair, n) in &counts {
            let share = *n as f64 / draws as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.04, "{:?} drawn with share {}", pair, share);
        }
    }
}

mod failures {
    use super::*;

    #[test]
    fn empty_option_set_is_unmatchable() {
        let options = vec![opts(0, &[(0, 1.0)]), opts(3, &[])];
        for policy in Policy::all() {
            assert_eq!(
                assign(policy, &options, 2, &stats(), &mut rng()),
                Err(MatchingError::Unmatchable { agent: 3 })
            );
        }
    }

    #[test]
    fn contested_single_resource_is_infeasible() {
        let options = vec![opts(0, &[(0, 1.0)]), opts(1, &[(0, 2.0)])];
        for policy in Policy::all() {
            assert_eq!(
                assign(policy, &options, 3, &stats(), &mut rng()),
                Err(MatchingError::AssignmentInfeasible {
                    agents: 2,
                    matched: 1
                })
            );
        }
    }

    #[test]
    fn more_agents_than_resources_is_infeasible() {
        let options = vec![opts(0, &[(0, 1.0)]), opts(1, &[(0, 2.0)]), opts(2, &[(0, 3.0)])];
        let err = assign(Policy::Fair, &options, 1, &stats(), &mut rng()).unwrap_err();
        assert!(matches!(err, MatchingError::AssignmentInfeasible { agents: 3, .. }));
    }

    #[test]
    fn no_switching_agents_is_empty_result() {
        for policy in Policy::all() {
            assert_eq!(assign(policy, &[], 5, &stats(), &mut rng()), Ok(Vec::new()));
        }
    }
}

/// Random small instances: each agent sees a random subset of a small pool.
fn random_instance(seed: u64) -> (Vec<OptionSet>, usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let agents = rng.gen_range(1..=3);
    let resources = 5;
    let options = (0..agents)
        .map(|a| {
            let pairs: Vec<(ResourceId, f64)> = (0..resources)
                .filter_map(|r| rng.gen_bool(0.6).then(|| (r, rng.gen_range(0..=20) as f64)))
                .collect();
            opts(a, &pairs)
        })
        .collect();
    (options, resources)
}

proptest! {
    #[test]
    fn fair_matches_brute_force(seed in any::<u64>()) {
        let (options, resources) = random_instance(seed);
        let best = brute_force_best(&options, &|p| p);
        let result = assign(Policy::Fair, &options, resources, &stats(), &mut rng());
        match (best, result) {
            (Some(best), Ok(result)) => {
                assert_valid(&result, &options);
                prop_assert_eq!(total_payoff(&result), best);
            }
            (None, Err(e)) => {
                let expected = matches!(
                    e,
                    MatchingError::Unmatchable { .. } | MatchingError::AssignmentInfeasible { .. }
                );
                prop_assert!(expected, "unexpected error {:?}", e);
            }
            (best, result) => prop_assert!(false, "brute force {:?} vs solver {:?}", best, result),
        }
    }

    #[test]
    fn every_policy_stays_feasible(seed in any::<u64>()) {
        let (options, resources) = random_instance(seed);
        let feasible = brute_force_best(&options, &|p| p).is_some();
        for policy in Policy::all() {
            let mut rng = StdRng::seed_from_u64(seed);
            match assign(policy, &options, resources, &stats(), &mut rng) {
                Ok(result) => assert_valid(&result, &options),
                Err(_) => prop_assert!(!feasible, "{} failed on a feasible instance", policy),
            }
        }
    }
}
