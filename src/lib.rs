// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Criminal Network Contagion Engine

pub mod types;
pub mod config;
pub mod agent;
pub mod risk;
pub mod network;
pub mod rewiring;
pub mod institution;
pub mod simulation;

pub use types::*;
pub use agent::{Agent, CrimeHistory};
pub use config::{ActivationOrder, ConfigError, RewiringConfig, SimConfig};
pub use network::{NetworkError, NetworkGenerator, PreferentialAttachment, SocialGraph};
pub use rewiring::RewireOutcome;
pub use simulation::{CrimeSimulation, SimError};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
impl CrimeSimulation {
    /// `config` may be `undefined`/`null` for defaults or a partial object;
    /// missing fields take their default values.
    #[wasm_bindgen(constructor)]
    pub fn create(config: JsValue, seed: u64) -> Result<CrimeSimulation, JsError> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config: SimConfig = if config.is_undefined() || config.is_null() {
            SimConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_error)?
        };
        CrimeSimulation::new(config, seed).map_err(js_error)
    }

    /// Advance one day and return its `DayReport`.
    pub fn tick(&mut self) -> JsValue {
        let report = self.step();
        serde_wasm_bindgen::to_value(&report).unwrap_or(JsValue::NULL)
    }

    /// Run N days without returning reports
    pub fn run_batch(&mut self, days: u32) {
        for _ in 0..days {
            self.step();
        }
    }

    pub fn get_agents(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.agents).unwrap_or(JsValue::NULL)
    }

    /// Edges as `[low, high]` pairs.
    pub fn get_edges(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.graph.edges()).unwrap_or(JsValue::NULL)
    }

    pub fn get_config(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.config).unwrap_or(JsValue::NULL)
    }

    pub fn get_shares(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.population_shares()).unwrap_or(JsValue::NULL)
    }

    pub fn get_day(&self) -> u64 {
        self.day
    }

    /// Accepts a tagged status object, e.g. `{ status: "detained", days_left: 3 }`.
    pub fn set_status(&mut self, agent_id: u32, status: JsValue) -> Result<(), JsError> {
        let status: Status = serde_wasm_bindgen::from_value(status).map_err(js_error)?;
        self.set_agent_status(agent_id, status);
        Ok(())
    }

    /// Rebuild from the same configuration and seed.
    pub fn reset(&mut self) -> Result<(), JsError> {
        *self = CrimeSimulation::new(self.config.clone(), self.seed).map_err(js_error)?;
        Ok(())
    }
}
