// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Criminal Network Contagion Engine - Social Network

//! Undirected social graph and the generators that build it.
//!
//! The node set is fixed at construction (`0..n`, one node per agent id);
//! only edges change during a run. Generators implement
//! [`NetworkGenerator`] so alternative topologies can be plugged into the
//! engine; the default is Barabási–Albert preferential attachment.

use std::collections::BTreeSet;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::{Rng, RngCore};

use crate::types::AgentId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("invalid parameter: preferential attachment requires 1 <= m < n (m = {m}, n = {n})")]
    InvalidParameter { m: usize, n: usize },

    #[error("generator produced {actual} nodes, expected {expected}")]
    NodeCountMismatch { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// SocialGraph
// ---------------------------------------------------------------------------

/// Simple undirected graph over agent ids: no self-loops, no multi-edges.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    inner: UnGraph<AgentId, ()>,
}

impl SocialGraph {
    /// Graph with nodes `0..n` and no edges.
    pub fn with_nodes(n: usize) -> Self {
        let mut inner = UnGraph::with_capacity(n, n * 2);
        for id in 0..n {
            inner.add_node(id as AgentId);
        }
        Self { inner }
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    fn contains(&self, id: AgentId) -> bool {
        (id as usize) < self.inner.node_count()
    }

    pub fn has_edge(&self, a: AgentId, b: AgentId) -> bool {
        self.contains(a)
            && self.contains(b)
            && self.inner.find_edge(node(a), node(b)).is_some()
    }

    /// Add `a -- b`. Returns false (and changes nothing) for self-loops,
    /// unknown ids and edges that already exist.
    pub fn add_edge(&mut self, a: AgentId, b: AgentId) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) || self.has_edge(a, b) {
            return false;
        }
        self.inner.add_edge(node(a), node(b), ());
        true
    }

    /// Remove `a -- b`. Returns whether an edge was removed.
    pub fn remove_edge(&mut self, a: AgentId, b: AgentId) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        match self.inner.find_edge(node(a), node(b)) {
            Some(e) => self.inner.remove_edge(e).is_some(),
            None => false,
        }
    }

    /// Neighbour ids of `id`; empty for unknown ids.
    pub fn neighbors(&self, id: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        let start = self.contains(id).then(|| node(id));
        start
            .into_iter()
            .flat_map(move |n| self.inner.neighbors(n))
            .map(|n| n.index() as AgentId)
    }

    pub fn degree(&self, id: AgentId) -> usize {
        self.neighbors(id).count()
    }

    /// All edges as `(low, high)` pairs, sorted.
    pub fn edges(&self) -> Vec<(AgentId, AgentId)> {
        let mut edges: Vec<(AgentId, AgentId)> = self
            .inner
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index() as AgentId, e.target().index() as AgentId);
                (a.min(b), a.max(b))
            })
            .collect();
        edges.sort_unstable();
        edges
    }
}

fn node(id: AgentId) -> NodeIndex {
    NodeIndex::new(id as usize)
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Builds the initial graph for `n` agents from the engine's random stream.
pub trait NetworkGenerator {
    fn generate(&self, n: usize, rng: &mut dyn RngCore) -> Result<SocialGraph, NetworkError>;
}

/// Barabási–Albert scale-free graph: a star over nodes `0..=m` seeds the
/// process, then every further node attaches `m` edges to distinct existing
/// nodes chosen with probability proportional to degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferentialAttachment {
    pub m: usize,
}

impl PreferentialAttachment {
    pub fn new(m: usize) -> Self {
        Self { m }
    }
}

impl NetworkGenerator for PreferentialAttachment {
    fn generate(&self, n: usize, rng: &mut dyn RngCore) -> Result<SocialGraph, NetworkError> {
        let m = self.m;
        if m < 1 || m >= n {
            return Err(NetworkError::InvalidParameter { m, n });
        }

        let mut graph = SocialGraph::with_nodes(n);

        // Each node appears once per incident edge.
        let mut repeated: Vec<AgentId> = Vec::with_capacity(2 * m * n);
        for leaf in 1..=m as AgentId {
            graph.add_edge(0, leaf);
        }
        repeated.extend(std::iter::repeat(0).take(m));
        repeated.extend(1..=m as AgentId);

        for source in (m + 1)..n {
            let source = source as AgentId;
            let mut targets = BTreeSet::new();
            while targets.len() < m {
                targets.insert(repeated[rng.gen_range(0..repeated.len())]);
            }
            for &t in &targets {
                graph.add_edge(source, t);
            }
            repeated.extend(targets);
            repeated.extend(std::iter::repeat(source).take(m));
        }

        Ok(graph)
    }
}
