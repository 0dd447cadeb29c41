// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Criminal Network Contagion Engine - Agent State

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::{AgentId, Status};

/// Capital added on release from prison.
pub const PRISON_RELEASE_CAPITAL_INCREMENT: f64 = 0.05;

pub(crate) fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// CrimeHistory - fixed-capacity rolling window of daily offence flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeHistory {
    window: VecDeque<bool>,
    capacity: usize,
}

impl CrimeHistory {
    /// Window of `capacity` days, all initially crime-free. Capacity is at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: std::iter::repeat(false).take(capacity).collect(),
            capacity,
        }
    }

    /// Append today's flag, evicting the oldest day.
    pub fn push(&mut self, offended: bool) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(offended);
    }

    /// Days in the window with at least one offence.
    pub fn crimes_in_window(&self) -> u32 {
        self.window.iter().filter(|&&f| f).count() as u32
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.window.iter().copied()
    }
}

// ---------------------------------------------------------------------------
// HoldExpiry
// ---------------------------------------------------------------------------

/// Which institutional hold ran out during a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldExpiry {
    Detention,
    Prison,
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// One individual. Agents never reference each other; neighbourhood
/// queries go through the engine's graph by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub(crate) status: Status,
    pub(crate) base_propensity: f64,
    pub(crate) criminal_capital: f64,
    pub(crate) stigma: f64,
    pub(crate) crime_history: CrimeHistory,
    pub(crate) crime_today: u32,
}

impl Agent {
    pub fn new(id: AgentId, status: Status, base_propensity: f64, evidence_window_days: usize) -> Self {
        Self {
            id,
            status,
            base_propensity: clamp01(base_propensity),
            criminal_capital: 0.0,
            stigma: 0.0,
            crime_history: CrimeHistory::new(evidence_window_days),
            crime_today: 0,
        }
    }

    pub fn id(&self) -> AgentId { self.id }
    pub fn status(&self) -> Status { self.status }
    pub fn base_propensity(&self) -> f64 { self.base_propensity }
    pub fn criminal_capital(&self) -> f64 { self.criminal_capital }
    pub fn stigma(&self) -> f64 { self.stigma }
    pub fn crime_history(&self) -> &CrimeHistory { &self.crime_history }
    pub fn crime_today(&self) -> u32 { self.crime_today }

    pub fn detained_days_left(&self) -> u32 {
        match self.status {
            Status::Detained { days_left } => days_left,
            _ => 0,
        }
    }

    pub fn prison_days_left(&self) -> u32 {
        match self.status {
            Status::Prison { days_left } => days_left,
            _ => 0,
        }
    }

    // ─── Day bookkeeping ─────────────────────────────────────────────────

    pub(crate) fn begin_day(&mut self) {
        self.crime_today = 0;
    }

    pub(crate) fn record_offense(&mut self) {
        self.crime_today += 1;
    }

    /// Push today's flag into the window. Every branch of the day ends here.
    pub(crate) fn end_day(&mut self) {
        self.crime_history.push(self.crime_today > 0);
    }

    /// Decrement an active hold timer. Returns the hold that expired, if any;
    /// the caller must move the agent out of it before the day ends.
    pub(crate) fn count_down_hold(&mut self) -> Option<HoldExpiry> {
        match &mut self.status {
            Status::Detained { days_left } => {
                *days_left = days_left.saturating_sub(1);
                (*days_left == 0).then_some(HoldExpiry::Detention)
            }
            Status::Prison { days_left } => {
                *days_left = days_left.saturating_sub(1);
                (*days_left == 0).then_some(HoldExpiry::Prison)
            }
            _ => None,
        }
    }

    // ─── Transitions ─────────────────────────────────────────────────────

    pub(crate) fn detain(&mut self, days: u32) {
        self.status = Status::Detained { days_left: days.max(1) };
    }

    pub(crate) fn imprison(&mut self, days: u32) {
        self.status = Status::Prison { days_left: days.max(1) };
    }

    /// Back to the community as at-risk, carrying a criminogenic increment.
    pub(crate) fn release(&mut self, capital_increment: f64) {
        self.status = Status::AtRisk;
        self.raise_criminal_capital(capital_increment);
    }

    pub(crate) fn raise_stigma(&mut self, amount: f64) {
        self.stigma = clamp01(self.stigma + amount);
    }

    pub(crate) fn raise_criminal_capital(&mut self, amount: f64) {
        self.criminal_capital = clamp01(self.criminal_capital + amount);
    }

    /// Placement used by scenario setup; hold timers are kept at least 1.
    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = match status {
            Status::Detained { days_left } => Status::Detained { days_left: days_left.max(1) },
            Status::Prison { days_left } => Status::Prison { days_left: days_left.max(1) },
            other => other,
        };
    }

    /// Lawful/at-risk/criminal transitions for one day given today's propensity
    /// and one uniform draw. Lawful agents crossing the threshold become at-risk
    /// first and may then turn criminal on the same draw.
    pub(crate) fn apply_risk_transition(&mut self, propensity: f64, risk_threshold: f64, draw: impl FnOnce() -> f64) {
        if self.status == Status::Lawful && propensity >= risk_threshold {
            self.status = Status::AtRisk;
        }
        if self.status == Status::AtRisk && draw() < propensity {
            self.status = Status::Criminal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_starts_full_of_zeros() {
        let h = CrimeHistory::new(30);
        assert_eq!(h.len(), 30);
        assert_eq!(h.crimes_in_window(), 0);
    }

    #[test]
    fn test_history_zero_capacity_is_one() {
        let h = CrimeHistory::new(0);
        assert_eq!(h.capacity(), 1);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut h = CrimeHistory::new(3);
        h.push(true);
        h.push(true);
        h.push(false);
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![true, true, false]);
        h.push(false);
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![true, false, false]);
        assert_eq!(h.len(), 3);
        assert_eq!(h.crimes_in_window(), 1);
    }

    #[test]
    fn test_countdown_detention_expires_at_zero() {
        let mut a = Agent::new(0, Status::Criminal, 0.1, 5);
        a.detain(2);
        assert_eq!(a.count_down_hold(), None);
        assert_eq!(a.detained_days_left(), 1);
        assert_eq!(a.count_down_hold(), Some(HoldExpiry::Detention));
    }

    #[test]
    fn test_countdown_ignores_free_agents() {
        let mut a = Agent::new(0, Status::Lawful, 0.1, 5);
        assert_eq!(a.count_down_hold(), None);
        assert_eq!(a.status(), Status::Lawful);
    }

    #[test]
    fn test_detain_floors_timer_to_one() {
        let mut a = Agent::new(0, Status::Lawful, 0.1, 5);
        a.detain(0);
        assert_eq!(a.status(), Status::Detained { days_left: 1 });
        a.imprison(0);
        assert_eq!(a.status(), Status::Prison { days_left: 1 });
    }

    #[test]
    fn test_release_raises_capital_and_clamps() {
        let mut a = Agent::new(0, Status::Prison { days_left: 1 }, 0.1, 5);
        a.criminal_capital = 0.98;
        a.release(PRISON_RELEASE_CAPITAL_INCREMENT);
        assert_eq!(a.status(), Status::AtRisk);
        assert_eq!(a.criminal_capital(), 1.0);
    }

    #[test]
    fn test_stigma_monotonic() {
        let mut a = Agent::new(0, Status::Lawful, 0.1, 5);
        a.raise_stigma(0.1);
        a.raise_stigma(0.1);
        assert!((a.stigma() - 0.2).abs() < 1e-12);
        a.raise_stigma(5.0);
        assert_eq!(a.stigma(), 1.0);
    }

    #[test]
    fn test_lawful_can_reach_criminal_same_day() {
        let mut a = Agent::new(0, Status::Lawful, 0.1, 5);
        a.apply_risk_transition(0.5, 0.3, || 0.0);
        assert_eq!(a.status(), Status::Criminal);
    }

    #[test]
    fn test_lawful_below_threshold_never_draws() {
        let mut a = Agent::new(0, Status::Lawful, 0.1, 5);
        a.apply_risk_transition(0.2, 0.3, || panic!("no draw expected"));
        assert_eq!(a.status(), Status::Lawful);
    }

    #[test]
    fn test_end_day_pushes_flag() {
        let mut a = Agent::new(0, Status::Criminal, 0.1, 4);
        a.begin_day();
        a.record_offense();
        a.end_day();
        a.begin_day();
        a.end_day();
        assert_eq!(a.crime_history().crimes_in_window(), 1);
        assert_eq!(a.crime_history().len(), 4);
    }
}
