// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Criminal Network Contagion Engine - Risk & Offending

//! Pure functions of agent and neighbourhood state.

use crate::agent::{clamp01, Agent};

const STIGMA_WEIGHT: f64 = 0.25;
const CAPITAL_WEIGHT: f64 = 0.35;
const OFFENSE_CAPITAL_WEIGHT: f64 = 0.25;
const OFFENSE_PEER_WEIGHT: f64 = 0.10;

/// Fraction of neighbours that are criminal. Zero for isolated agents.
pub fn share_criminal(criminal_neighbors: usize, degree: usize) -> f64 {
    if degree == 0 {
        return 0.0;
    }
    criminal_neighbors as f64 / degree as f64
}

/// Daily propensity score in [0, 1].
pub fn propensity(agent: &Agent, peer_influence_weight: f64, share_criminal_neighbors: f64) -> f64 {
    clamp01(
        agent.base_propensity
            + peer_influence_weight * share_criminal_neighbors
            + STIGMA_WEIGHT * agent.stigma
            + CAPITAL_WEIGHT * agent.criminal_capital,
    )
}

/// Chance that a criminal agent offends today.
pub fn offense_probability(agent: &Agent, crime_base_rate: f64, share_criminal_neighbors: f64) -> f64 {
    clamp01(
        crime_base_rate
            + OFFENSE_CAPITAL_WEIGHT * agent.criminal_capital
            + OFFENSE_PEER_WEIGHT * share_criminal_neighbors,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    fn agent(base: f64, stigma: f64, capital: f64) -> Agent {
        let mut a = Agent::new(0, Status::Lawful, base, 10);
        a.stigma = stigma;
        a.criminal_capital = capital;
        a
    }

    #[test]
    fn test_isolated_share_is_zero() {
        assert_eq!(share_criminal(0, 0), 0.0);
        assert_eq!(share_criminal(1, 4), 0.25);
    }

    #[test]
    fn test_propensity_weights() {
        let a = agent(0.1, 0.4, 0.2);
        // 0.1 + 0.5*0.5 + 0.25*0.4 + 0.35*0.2 = 0.52
        let p = propensity(&a, 0.5, 0.5);
        assert!((p - 0.52).abs() < 1e-12, "got {}", p);
    }

    #[test]
    fn test_propensity_clamped() {
        let a = agent(0.9, 1.0, 1.0);
        assert_eq!(propensity(&a, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_offense_probability() {
        let a = agent(0.1, 0.0, 0.4);
        // 0.05 + 0.25*0.4 + 0.10*0.5 = 0.2
        let p = offense_probability(&a, 0.05, 0.5);
        assert!((p - 0.2).abs() < 1e-12, "got {}", p);
        let heavy = agent(0.1, 0.0, 1.0);
        assert_eq!(offense_probability(&heavy, 0.9, 1.0), 1.0);
    }
}
