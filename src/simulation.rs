// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Criminal Network Contagion Engine - Simulation Core

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Normal};
use wasm_bindgen::prelude::*;

use crate::agent::{clamp01, Agent, HoldExpiry};
use crate::config::{ActivationOrder, ConfigError, SimConfig};
use crate::network::{NetworkError, NetworkGenerator, PreferentialAttachment, SocialGraph};
use crate::risk;
use crate::types::*;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Construction failures. Stepping never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),

    #[error(transparent)]
    InvalidParameter(#[from] NetworkError),
}

// ─── CrimeSimulation struct ──────────────────────────────────────────────────

#[wasm_bindgen]
pub struct CrimeSimulation {
    pub(crate) config: SimConfig,
    pub(crate) seed: u64,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) graph: SocialGraph,
    pub(crate) agents: Vec<Agent>,
    pub(crate) day: u64,
    pub(crate) counters: DailyCounters,

    // Built once from the validated config
    pub(crate) detention_length: Exp<f64>,
    pub(crate) sentence_length: Exp<f64>,
}

// ─── Construction ────────────────────────────────────────────────────────────

impl CrimeSimulation {
    /// Build a run on a preferential-attachment network with `config.sf_m`.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        let generator = PreferentialAttachment::new(config.sf_m);
        Self::with_generator(config, seed, &generator)
    }

    /// Build a run on a custom topology. The configuration is validated in
    /// full (including `sf_m`) before the generator is called.
    pub fn with_generator<G: NetworkGenerator + ?Sized>(
        config: SimConfig,
        seed: u64,
        generator: &G,
    ) -> Result<Self, SimError> {
        config.validate()?;

        let detention_length = Exp::new(1.0 / config.detention_days_mean as f64)
            .map_err(|_| ConfigError::ZeroLength("detention_days_mean"))?;
        let sentence_length = Exp::new(1.0 / config.prison_sentence_days_mean as f64)
            .map_err(|_| ConfigError::ZeroLength("prison_sentence_days_mean"))?;
        let base_propensity = Normal::new(config.base_propensity_mean, config.base_propensity_sd)
            .map_err(|_| ConfigError::NegativeOrNonFinite {
                field: "base_propensity_sd",
                value: config.base_propensity_sd,
            })?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let graph = generator.generate(config.n_agents, &mut rng)?;
        if graph.node_count() != config.n_agents {
            return Err(NetworkError::NodeCountMismatch {
                expected: config.n_agents,
                actual: graph.node_count(),
            }
            .into());
        }

        let criminal_cut = config.initial_criminal_share;
        let at_risk_cut = config.initial_criminal_share + config.initial_at_risk_share;
        let agents: Vec<Agent> = (0..config.n_agents)
            .map(|i| {
                let u: f64 = rng.gen();
                let status = if u < criminal_cut {
                    Status::Criminal
                } else if u < at_risk_cut {
                    Status::AtRisk
                } else {
                    Status::Lawful
                };
                let base = clamp01(base_propensity.sample(&mut rng));
                Agent::new(i as AgentId, status, base, config.evidence_window_days)
            })
            .collect();

        tracing::info!(
            n_agents = config.n_agents,
            edges = graph.edge_count(),
            seed,
            "simulation constructed"
        );

        Ok(Self {
            config,
            seed,
            rng,
            graph,
            agents,
            day: 0,
            counters: DailyCounters::default(),
            detention_length,
            sentence_length,
        })
    }
}

// ─── Day cycle ───────────────────────────────────────────────────────────────

impl CrimeSimulation {
    /// Advance one day: every agent steps, then one policing pass.
    pub fn step(&mut self) -> DayReport {
        self.counters = DailyCounters::default();
        self.day += 1;

        for id in self.activation_order() {
            self.step_agent(id);
        }

        self.police_step();

        let report = DayReport::new(self.day, self.counters, self.population_shares());
        tracing::debug!(
            day = report.day,
            crime_events = report.crime_events,
            detentions = report.detentions,
            wrongful = report.wrongful_detentions,
            convictions = report.convictions,
            share_criminal = report.share_criminal,
            "day finished"
        );
        report
    }

    /// Advance `days` days, returning one report per day.
    pub fn run(&mut self, days: u32) -> Vec<DayReport> {
        (0..days).map(|_| self.step()).collect()
    }

    fn activation_order(&mut self) -> Vec<AgentId> {
        let mut order: Vec<AgentId> = (0..self.agents.len() as AgentId).collect();
        if self.config.activation == ActivationOrder::Shuffled {
            order.shuffle(&mut self.rng);
        }
        order
    }

    /// One agent's day. Held agents only count down; free agents update risk
    /// and may offend. Every path ends by recording the day's flag.
    fn step_agent(&mut self, id: AgentId) {
        let idx = id as usize;
        self.agents[idx].begin_day();

        if self.agents[idx].status.is_held() {
            match self.agents[idx].count_down_hold() {
                Some(HoldExpiry::Detention) => self.resolve_judicial_outcome(id),
                Some(HoldExpiry::Prison) => self.release_from_prison(id),
                None => {}
            }
        } else {
            self.update_risk_and_offend(id);
        }

        self.agents[idx].end_day();
    }

    fn update_risk_and_offend(&mut self, id: AgentId) {
        let share = self.share_criminal_neighbors(id);
        let cfg = &self.config;
        let rng = &mut self.rng;
        let agent = &mut self.agents[id as usize];

        let propensity = risk::propensity(agent, cfg.peer_influence_weight, share);
        agent.apply_risk_transition(propensity, cfg.risk_threshold, || rng.gen::<f64>());

        if agent.status == Status::Criminal {
            let p = risk::offense_probability(agent, cfg.crime_base_rate, share);
            if rng.gen::<f64>() < p {
                agent.record_offense();
                self.counters.crime_events += 1;
            }
        }
    }
}

// ─── Inspection ──────────────────────────────────────────────────────────────

impl CrimeSimulation {
    pub fn config(&self) -> &SimConfig { &self.config }
    pub fn seed(&self) -> u64 { self.seed }
    pub fn day(&self) -> u64 { self.day }
    pub fn counters(&self) -> DailyCounters { self.counters }
    pub fn graph(&self) -> &SocialGraph { &self.graph }
    pub fn agents(&self) -> &[Agent] { &self.agents }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id as usize)
    }

    pub fn population_shares(&self) -> PopulationShares {
        PopulationShares::from_statuses(self.agents.iter().map(|a| &a.status))
    }

    /// Fraction of `id`'s neighbours currently criminal; 0 when isolated.
    pub fn share_criminal_neighbors(&self, id: AgentId) -> f64 {
        let mut degree = 0;
        let mut criminal = 0;
        for nb in self.graph.neighbors(id) {
            degree += 1;
            if self.agents[nb as usize].status == Status::Criminal {
                criminal += 1;
            }
        }
        risk::share_criminal(criminal, degree)
    }

    /// Place an agent in `status` (scenario setup). Hold timers are raised to
    /// at least 1. Unknown ids are ignored.
    pub fn set_agent_status(&mut self, id: AgentId, status: Status) {
        if let Some(agent) = self.agents.get_mut(id as usize) {
            agent.set_status(status);
        }
    }
}
