// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Criminal Network Contagion Engine - Policing & Judiciary

use rand::Rng;
use rand_distr::Distribution;

use crate::agent::{clamp01, PRISON_RELEASE_CAPITAL_INCREMENT};
use crate::rewiring::{self, RewireOutcome};
use crate::simulation::CrimeSimulation;
use crate::types::{AgentId, Status};

/// Evidence floor: even a clean record carries some weight at trial.
const EVIDENCE_FLOOR: f64 = 0.35;
const EVIDENCE_SPAN: f64 = 0.65;
/// Share of the window with offences that saturates the evidence score.
const EVIDENCE_SATURATION: f64 = 0.15;

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Trial evidence in `[0.35, 1.0]` from the offence days in the window.
pub fn evidence_strength(crimes_in_window: u32, evidence_window_days: usize) -> f64 {
    let saturation = (evidence_window_days as f64 * EVIDENCE_SATURATION).max(1.0);
    EVIDENCE_FLOOR + EVIDENCE_SPAN * clamp01(crimes_in_window as f64 / saturation)
}

pub fn conviction_probability(conviction_base_prob: f64, forensic_capacity: f64, evidence: f64) -> f64 {
    clamp01(conviction_base_prob * forensic_capacity * evidence)
}

/// Whole days from a continuous length sample, never below 1.
pub fn hold_days(sample: f64) -> u32 {
    (sample.floor() as u32).max(1)
}

/// Sentence shortened by prison crowding.
pub fn congested_sentence(days: u32, congestion_strength: f64, prison_share: f64) -> u32 {
    let factor = 1.0 - congestion_strength * prison_share;
    hold_days(days as f64 * factor)
}

// ---------------------------------------------------------------------------
// Institutional steps on the engine
// ---------------------------------------------------------------------------

impl CrimeSimulation {
    /// One policing pass over pools snapshotted at its start.
    pub(crate) fn police_step(&mut self) {
        let attempts = self.config.policing_attempts();
        if attempts == 0 {
            return;
        }

        let criminals: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|a| a.status == Status::Criminal)
            .map(|a| a.id)
            .collect();
        let non_criminals: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|a| a.status.is_non_criminal())
            .map(|a| a.id)
            .collect();

        for _ in 0..attempts {
            let forensic_hit = self.rng.gen::<f64>() < self.config.forensic_capacity;
            let (target, wrongful) = if forensic_hit && !criminals.is_empty() {
                (criminals[self.rng.gen_range(0..criminals.len())], false)
            } else if !non_criminals.is_empty() {
                (non_criminals[self.rng.gen_range(0..non_criminals.len())], true)
            } else {
                continue;
            };

            // Already detained earlier in this pass.
            if self.agents[target as usize].status.is_held() {
                continue;
            }

            self.counters.detentions += 1;
            if wrongful {
                self.counters.wrongful_detentions += 1;
            }

            let days = hold_days(self.detention_length.sample(&mut self.rng));
            let stigma = self.config.detention_stigma_increment;
            let agent = &mut self.agents[target as usize];
            agent.detain(days);
            agent.raise_stigma(stigma);

            let rewired = self.rewire_if_enabled(target);
            tracing::trace!(
                agent = target,
                days,
                wrongful,
                dropped = rewired.dropped,
                added = rewired.added,
                "detained"
            );
        }
    }

    /// Trial at the end of detention: prison or release to at-risk.
    pub(crate) fn resolve_judicial_outcome(&mut self, id: AgentId) {
        let idx = id as usize;
        let crimes = self.agents[idx].crime_history.crimes_in_window();
        let evidence = evidence_strength(crimes, self.config.evidence_window_days);
        let p = conviction_probability(self.config.conviction_base_prob, self.config.forensic_capacity, evidence);

        if self.rng.gen::<f64>() < p {
            self.counters.convictions += 1;
            let mut days = hold_days(self.sentence_length.sample(&mut self.rng));
            if self.config.congestion_strength > 0.0 {
                days = congested_sentence(days, self.config.congestion_strength, self.prison_share());
            }
            let capital = self.config.prison_criminal_capital_increment;
            let agent = &mut self.agents[idx];
            agent.imprison(days);
            agent.raise_criminal_capital(capital);

            let rewired = self.rewire_if_enabled(id);
            tracing::trace!(
                agent = id,
                days,
                evidence,
                dropped = rewired.dropped,
                added = rewired.added,
                "convicted"
            );
        } else {
            self.agents[idx].release(self.config.detention_criminal_capital_increment);
            tracing::trace!(agent = id, evidence, "acquitted");
        }
    }

    pub(crate) fn release_from_prison(&mut self, id: AgentId) {
        self.agents[id as usize].release(PRISON_RELEASE_CAPITAL_INCREMENT);
        tracing::trace!(agent = id, "released from prison");
    }

    /// Nothing changes (and no draws are taken) when rewiring is off.
    fn rewire_if_enabled(&mut self, id: AgentId) -> RewireOutcome {
        if !self.config.rewiring.enabled {
            return RewireOutcome::default();
        }
        rewiring::rewire_on_incarceration(&mut self.graph, &self.agents, id, &self.config.rewiring, &mut self.rng)
    }

    fn prison_share(&self) -> f64 {
        if self.agents.is_empty() {
            return 0.0;
        }
        let held = self.agents.iter().filter(|a| matches!(a.status, Status::Prison { .. })).count();
        held as f64 / self.agents.len() as f64
    }
}
