// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Criminal Network Contagion Engine - Run Configuration

//! Configuration record for one simulation run.
//!
//! `SimConfig` is plain data: any serde format can produce it, and the
//! engine hands it back unchanged through [`CrimeSimulation::config`] so a
//! collector can persist the exact parameters alongside the day rows.
//!
//! [`CrimeSimulation::config`]: crate::simulation::CrimeSimulation::config

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejected construction parameters. Raised before any state is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: population size must be positive")]
    EmptyPopulation,

    #[error("invalid configuration: sf_m = {m} must satisfy 1 <= m < n_agents = {n}")]
    AttachmentOutOfRange { m: usize, n: usize },

    #[error("invalid configuration: {field} = {value} is outside [0, 1]")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("invalid configuration: {field} = {value} must be finite and non-negative")]
    NegativeOrNonFinite { field: &'static str, value: f64 },

    #[error("invalid configuration: initial shares sum to {0}, above 1")]
    InitialSharesExceedOne(f64),

    #[error("invalid configuration: {0} must be at least 1")]
    ZeroLength(&'static str),
}

// ---------------------------------------------------------------------------
// Activation order
// ---------------------------------------------------------------------------

/// Order in which agents take their day step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationOrder {
    /// Fresh seeded shuffle every day.
    #[default]
    Shuffled,
    /// Ascending agent id.
    Sequential,
}

// ---------------------------------------------------------------------------
// RewiringConfig
// ---------------------------------------------------------------------------

/// Network rewiring applied on detention entry and on conviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewiringConfig {
    pub enabled: bool,
    /// Chance of dropping each tie to a lawful neighbour.
    pub drop_lawful_edge_prob: f64,
    /// Upper bound on new criminal ties per event.
    pub max_new_edges_per_event: u32,
}

impl Default for RewiringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            drop_lawful_edge_prob: 0.20,
            max_new_edges_per_event: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // Population and network
    pub n_agents: usize,
    pub sf_m: usize,

    // Initial states
    pub initial_criminal_share: f64,
    pub initial_at_risk_share: f64,
    pub base_propensity_mean: f64,
    pub base_propensity_sd: f64,

    // Behaviour
    pub peer_influence_weight: f64,
    pub risk_threshold: f64,
    pub crime_base_rate: f64,

    // Institutions
    pub coercive_capacity: f64,
    pub forensic_capacity: f64,
    pub detention_days_mean: u32,
    pub conviction_base_prob: f64,
    pub prison_sentence_days_mean: u32,

    // Criminogenic effects
    pub detention_stigma_increment: f64,
    pub detention_criminal_capital_increment: f64,
    pub prison_criminal_capital_increment: f64,

    pub congestion_strength: f64,
    pub evidence_window_days: usize,

    pub rewiring: RewiringConfig,
    pub activation: ActivationOrder,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_agents: 500,
            sf_m: 3,
            initial_criminal_share: 0.05,
            initial_at_risk_share: 0.20,
            base_propensity_mean: 0.15,
            base_propensity_sd: 0.05,
            peer_influence_weight: 0.35,
            risk_threshold: 0.30,
            crime_base_rate: 0.05,
            coercive_capacity: 0.03,
            forensic_capacity: 0.70,
            detention_days_mean: 30,
            conviction_base_prob: 0.60,
            prison_sentence_days_mean: 180,
            detention_stigma_increment: 0.10,
            detention_criminal_capital_increment: 0.15,
            prison_criminal_capital_increment: 0.20,
            congestion_strength: 0.0,
            evidence_window_days: 30,
            rewiring: RewiringConfig::default(),
            activation: ActivationOrder::default(),
        }
    }
}

impl SimConfig {
    /// Check every field. The first violation found is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_agents == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.sf_m < 1 || self.sf_m >= self.n_agents {
            return Err(ConfigError::AttachmentOutOfRange { m: self.sf_m, n: self.n_agents });
        }

        for (field, value) in self.probability_fields() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { field, value });
            }
        }

        for (field, value) in [
            ("peer_influence_weight", self.peer_influence_weight),
            ("base_propensity_sd", self.base_propensity_sd),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeOrNonFinite { field, value });
            }
        }

        let initial = self.initial_criminal_share + self.initial_at_risk_share;
        if initial > 1.0 {
            return Err(ConfigError::InitialSharesExceedOne(initial));
        }

        if self.evidence_window_days == 0 {
            return Err(ConfigError::ZeroLength("evidence_window_days"));
        }
        if self.detention_days_mean == 0 {
            return Err(ConfigError::ZeroLength("detention_days_mean"));
        }
        if self.prison_sentence_days_mean == 0 {
            return Err(ConfigError::ZeroLength("prison_sentence_days_mean"));
        }
        Ok(())
    }

    /// Number of policing attempts per day: `floor(coercive_capacity * n_agents)`.
    pub fn policing_attempts(&self) -> u32 {
        (self.coercive_capacity * self.n_agents as f64).floor().max(0.0) as u32
    }

    fn probability_fields(&self) -> [(&'static str, f64); 13] {
        [
            ("initial_criminal_share", self.initial_criminal_share),
            ("initial_at_risk_share", self.initial_at_risk_share),
            ("base_propensity_mean", self.base_propensity_mean),
            ("risk_threshold", self.risk_threshold),
            ("crime_base_rate", self.crime_base_rate),
            ("coercive_capacity", self.coercive_capacity),
            ("forensic_capacity", self.forensic_capacity),
            ("conviction_base_prob", self.conviction_base_prob),
            ("detention_stigma_increment", self.detention_stigma_increment),
            ("detention_criminal_capital_increment", self.detention_criminal_capital_increment),
            ("prison_criminal_capital_increment", self.prison_criminal_capital_increment),
            ("congestion_strength", self.congestion_strength),
            ("rewiring.drop_lawful_edge_prob", self.rewiring.drop_lawful_edge_prob),
        ]
    }
}
