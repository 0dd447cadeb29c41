// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Criminal Network Contagion Engine - Type Definitions

use serde::{Deserialize, Serialize};

/// Agent identifier. Doubles as the node index in the social graph.
pub type AgentId = u32;

// ─── Status Kind ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Lawful = 0,
    AtRisk = 1,
    Criminal = 2,
    Detained = 3,
    Prison = 4,
}

impl StatusKind {
    pub const ALL: [StatusKind; 5] = [
        Self::Lawful,
        Self::AtRisk,
        Self::Criminal,
        Self::Detained,
        Self::Prison,
    ];
}

// ─── Status (tagged: timers live only on the hold variants) ──────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    Lawful,
    AtRisk,
    Criminal,
    /// Pre-trial hold.
    Detained { days_left: u32 },
    /// Post-conviction hold.
    Prison { days_left: u32 },
}

impl Status {
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Lawful => StatusKind::Lawful,
            Self::AtRisk => StatusKind::AtRisk,
            Self::Criminal => StatusKind::Criminal,
            Self::Detained { .. } => StatusKind::Detained,
            Self::Prison { .. } => StatusKind::Prison,
        }
    }

    /// True for `Detained` and `Prison`.
    pub fn is_held(&self) -> bool {
        matches!(self, Self::Detained { .. } | Self::Prison { .. })
    }

    /// Lawful or at-risk: the pool wrongful detentions are drawn from.
    pub fn is_non_criminal(&self) -> bool {
        matches!(self, Self::Lawful | Self::AtRisk)
    }

    pub fn days_left(&self) -> Option<u32> {
        match self {
            Self::Detained { days_left } | Self::Prison { days_left } => Some(*days_left),
            _ => None,
        }
    }
}

// ─── DailyCounters ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCounters {
    pub crime_events: u32,
    pub detentions: u32,
    pub wrongful_detentions: u32,
    pub convictions: u32,
}

// ─── PopulationShares ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PopulationShares {
    pub lawful: f64,
    pub at_risk: f64,
    pub criminal: f64,
    pub detained: f64,
    pub prison: f64,
}

impl PopulationShares {
    /// Fraction of the population in each status. Empty input yields all zeros.
    pub fn from_statuses<'a>(statuses: impl Iterator<Item = &'a Status>) -> Self {
        let mut counts = [0u32; 5];
        let mut total = 0u32;
        for s in statuses {
            counts[s.kind() as usize] += 1;
            total += 1;
        }
        if total == 0 {
            return Self::default();
        }
        let n = total as f64;
        Self {
            lawful: counts[StatusKind::Lawful as usize] as f64 / n,
            at_risk: counts[StatusKind::AtRisk as usize] as f64 / n,
            criminal: counts[StatusKind::Criminal as usize] as f64 / n,
            detained: counts[StatusKind::Detained as usize] as f64 / n,
            prison: counts[StatusKind::Prison as usize] as f64 / n,
        }
    }

    pub fn get(&self, kind: StatusKind) -> f64 {
        match kind {
            StatusKind::Lawful => self.lawful,
            StatusKind::AtRisk => self.at_risk,
            StatusKind::Criminal => self.criminal,
            StatusKind::Detained => self.detained,
            StatusKind::Prison => self.prison,
        }
    }
}

// ─── DayReport ───────────────────────────────────────────────────────────────

/// One row per simulated day, flat so a collector can write it as-is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DayReport {
    pub day: u64,
    pub crime_events: u32,
    pub detentions: u32,
    pub wrongful_detentions: u32,
    pub convictions: u32,
    pub share_lawful: f64,
    pub share_at_risk: f64,
    pub share_criminal: f64,
    pub share_detained: f64,
    pub share_prison: f64,
}

impl DayReport {
    pub fn new(day: u64, counters: DailyCounters, shares: PopulationShares) -> Self {
        Self {
            day,
            crime_events: counters.crime_events,
            detentions: counters.detentions,
            wrongful_detentions: counters.wrongful_detentions,
            convictions: counters.convictions,
            share_lawful: shares.lawful,
            share_at_risk: shares.at_risk,
            share_criminal: shares.criminal,
            share_detained: shares.detained,
            share_prison: shares.prison,
        }
    }

    pub fn counters(&self) -> DailyCounters {
        DailyCounters {
            crime_events: self.crime_events,
            detentions: self.detentions,
            wrongful_detentions: self.wrongful_detentions,
            convictions: self.convictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_only_on_hold_variants() {
        assert_eq!(Status::Lawful.days_left(), None);
        assert_eq!(Status::Criminal.days_left(), None);
        assert_eq!(Status::Detained { days_left: 4 }.days_left(), Some(4));
        assert_eq!(Status::Prison { days_left: 9 }.days_left(), Some(9));
        assert!(Status::Prison { days_left: 1 }.is_held());
        assert!(!Status::AtRisk.is_held());
    }

    #[test]
    fn test_shares_sum_to_one() {
        let statuses = [
            Status::Lawful,
            Status::Lawful,
            Status::Criminal,
            Status::Detained { days_left: 3 },
        ];
        let shares = PopulationShares::from_statuses(statuses.iter());
        assert_eq!(shares.lawful, 0.5);
        assert_eq!(shares.criminal, 0.25);
        assert_eq!(shares.detained, 0.25);
        assert_eq!(shares.prison, 0.0);
        let total: f64 = StatusKind::ALL.iter().map(|k| shares.get(*k)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shares_empty_population() {
        let shares = PopulationShares::from_statuses(std::iter::empty());
        assert_eq!(shares, PopulationShares::default());
    }

    #[test]
    fn test_status_serde_tagging() {
        let json = serde_json::to_string(&Status::Detained { days_left: 2 }).unwrap();
        assert_eq!(json, r#"{"status":"detained","days_left":2}"#);
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::Detained { days_left: 2 });
    }

    #[test]
    fn test_day_report_columns() {
        let report = DayReport::new(
            3,
            DailyCounters { crime_events: 5, detentions: 2, wrongful_detentions: 1, convictions: 0 },
            PopulationShares { lawful: 0.5, at_risk: 0.2, criminal: 0.2, detained: 0.1, prison: 0.0 },
        );
        let value = serde_json::to_value(report).unwrap();
        let obj = value.as_object().unwrap();
        for col in [
            "day", "crime_events", "detentions", "wrongful_detentions", "convictions",
            "share_lawful", "share_at_risk", "share_criminal", "share_detained", "share_prison",
        ] {
            assert!(obj.contains_key(col), "missing column {}", col);
        }
        assert_eq!(obj.len(), 10);
        assert_eq!(report.counters().wrongful_detentions, 1);
    }
}
