use crimenet_engine::rewiring::rewire_on_incarceration;
use crimenet_engine::{Agent, AgentId, CrimeSimulation, RewiringConfig, SimConfig, SocialGraph, Status};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn config(n_agents: usize, coercive_capacity: f64, forensic_capacity: f64) -> SimConfig {
    SimConfig {
        n_agents,
        sf_m: 2,
        coercive_capacity,
        forensic_capacity,
        initial_criminal_share: 0.15,
        ..SimConfig::default()
    }
}

fn status_strategy() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Lawful),
        Just(Status::AtRisk),
        Just(Status::Criminal),
        (1u32..30).prop_map(|days_left| Status::Detained { days_left }),
        (1u32..30).prop_map(|days_left| Status::Prison { days_left }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn property_same_seed_same_reports(seed in any::<u64>(), days in 1u32..25) {
        let mut a = CrimeSimulation::new(config(80, 0.1, 0.7), seed).unwrap();
        let mut b = CrimeSimulation::new(config(80, 0.1, 0.7), seed).unwrap();
        prop_assert_eq!(a.run(days), b.run(days));
        prop_assert_eq!(a.graph().edges(), b.graph().edges());
    }

    #[test]
    fn property_counters_bounded_by_attempts(
        seed in any::<u64>(),
        coercive in 0.0f64..0.4,
        forensic in 0.0f64..=1.0,
        days in 1u32..30,
    ) {
        let cfg = config(100, coercive, forensic);
        let attempts = cfg.policing_attempts();
        let mut sim = CrimeSimulation::new(cfg, seed).unwrap();
        for report in sim.run(days) {
            prop_assert!(report.wrongful_detentions <= report.detentions);
            prop_assert!(report.detentions <= attempts);
            prop_assert!(report.crime_events <= 100);
        }
        for agent in sim.agents() {
            prop_assert_eq!(agent.crime_history().len(), 30);
            if let Some(days_left) = agent.status().days_left() {
                prop_assert!(days_left >= 1);
            }
        }
    }

    #[test]
    fn property_rewiring_edge_delta_bounded(
        statuses in prop::collection::vec(status_strategy(), 2..40),
        extra_edges in prop::collection::vec((0u32..40, 0u32..40), 0..80),
        drop in 0.0f64..=1.0,
        max_new in 0u32..6,
        seed in any::<u64>(),
    ) {
        let n = statuses.len();
        let agents: Vec<Agent> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| Agent::new(i as AgentId, *s, 0.1, 10))
            .collect();
        let mut graph = SocialGraph::with_nodes(n);
        for (a, b) in extra_edges {
            graph.add_edge(a % n as u32, b % n as u32);
        }
        let before = graph.edge_count() as i64;
        let cfg = RewiringConfig { enabled: true, drop_lawful_edge_prob: drop, max_new_edges_per_event: max_new };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let outcome = rewire_on_incarceration(&mut graph, &agents, 0, &cfg, &mut rng);

        prop_assert_eq!(graph.node_count(), n);
        prop_assert!(outcome.added <= max_new);
        prop_assert_eq!(graph.edge_count() as i64, before - outcome.dropped as i64 + outcome.added as i64);
        prop_assert!((graph.edge_count() as i64 - before).abs() <= (outcome.dropped + max_new) as i64);
        for nb in graph.neighbors(0) {
            prop_assert_ne!(nb, 0);
        }
    }
}
