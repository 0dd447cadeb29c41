// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Criminal Network Contagion Engine - Network Rewiring

//! Structural side effect of incarceration: ties to lawful neighbours decay
//! and new ties to active criminals form.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::config::RewiringConfig;
use crate::network::SocialGraph;
use crate::types::{AgentId, Status};

/// Cap on candidate draws, as a multiple of the edges wanted.
const ATTEMPTS_PER_EDGE: u32 = 5;

/// Edges changed by one rewiring event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewireOutcome {
    pub dropped: u32,
    pub added: u32,
}

/// Rewire `target` after a detention entry or conviction.
///
/// 1. Each lawful neighbour loses its tie with probability `drop_lawful_edge_prob`.
/// 2. Up to `max_new_edges_per_event` ties to criminal agents are added by
///    rejection sampling, with at most `5 * max_new_edges_per_event` draws.
///
/// An empty criminal pool adds nothing.
pub fn rewire_on_incarceration<R: Rng + ?Sized>(
    graph: &mut SocialGraph,
    agents: &[Agent],
    target: AgentId,
    config: &RewiringConfig,
    rng: &mut R,
) -> RewireOutcome {
    let mut outcome = RewireOutcome::default();

    let neighbors: Vec<AgentId> = graph.neighbors(target).collect();
    for nb in neighbors {
        let lawful = agents
            .get(nb as usize)
            .map_or(false, |a| a.status == Status::Lawful);
        if lawful && rng.gen::<f64>() < config.drop_lawful_edge_prob && graph.remove_edge(target, nb) {
            outcome.dropped += 1;
        }
    }

    let candidates: Vec<AgentId> = agents
        .iter()
        .filter(|a| a.status == Status::Criminal && a.id != target)
        .map(|a| a.id)
        .collect();
    if candidates.is_empty() {
        return outcome;
    }

    let wanted = config.max_new_edges_per_event;
    let max_attempts = wanted.saturating_mul(ATTEMPTS_PER_EDGE);
    let mut attempts = 0;
    while outcome.added < wanted && attempts < max_attempts {
        attempts += 1;
        let candidate = candidates[rng.gen_range(0..candidates.len())];
        if graph.add_edge(target, candidate) {
            outcome.added += 1;
        }
    }

    tracing::trace!(
        agent = target,
        dropped = outcome.dropped,
        added = outcome.added,
        "rewired after incarceration event"
    );
    outcome
}
