use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Local, TimeZone};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::calendar::{same_month, week_start};

pub const WEEKLY_LIMIT: u8 = 3;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuotaState {
    pub remaining: u8,
    pub last_reset: DateTime<Local>,
}

impl QuotaState {
    pub fn fresh(now: DateTime<Local>) -> Self {
        Self {
            remaining: WEEKLY_LIMIT,
            last_reset: now,
        }
    }

    fn reset_due(&self, now: &DateTime<Local>) -> bool {
        self.last_reset < week_start(now)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HypeLogEntry {
    pub movie_id: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HypeOutcome {
    Granted { remaining: u8 },
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
}

impl BadgeTier {
    pub fn for_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Self::Bronze),
            2 => Some(Self::Silver),
            _ => Some(Self::Gold),
        }
    }
}

impl fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Bronze => write!(f, "bronze"),
            Self::Silver => write!(f, "silver"),
            Self::Gold => write!(f, "gold"),
        }
    }
}

/// Weekly hype allowance of one user together with the log of granted hypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypeTracker {
    state: QuotaState,
    log: Vec<HypeLogEntry>,
}

impl HypeTracker {
    #[cfg(test)]
    pub fn new(now: DateTime<Local>) -> Self {
        Self::from_parts(QuotaState::fresh(now), vec![])
    }

    pub fn from_parts(state: QuotaState, log: Vec<HypeLogEntry>) -> Self {
        Self { state, log }
    }

    pub fn state(&self) -> QuotaState {
        self.state
    }

    pub fn log(&self) -> &[HypeLogEntry] {
        &self.log
    }

    /// Spend one hype on `movie_id`. A week boundary refills the allowance first.
    pub fn request_hype(&mut self, movie_id: &str, now: DateTime<Local>) -> HypeOutcome {
        if self.state.reset_due(&now) {
            debug!("New week, hype allowance reset to {}", WEEKLY_LIMIT);
            self.state = QuotaState::fresh(now);
        }

        if self.state.remaining == 0 {
            info!("No hype left this week for {}", movie_id);
            return HypeOutcome::Exhausted;
        }

        self.state.remaining -= 1;
        self.log.push(HypeLogEntry {
            movie_id: movie_id.to_string(),
            timestamp: now,
        });
        HypeOutcome::Granted {
            remaining: self.state.remaining,
        }
    }

    /// Allowance left at `now`, counting a reset that has not been applied yet.
    pub fn remaining_at(&self, now: &DateTime<Local>) -> u8 {
        if self.state.reset_due(now) {
            WEEKLY_LIMIT
        } else {
            self.state.remaining
        }
    }

    pub fn hypes_this_month(&self, movie_id: &str, now: &DateTime<Local>) -> usize {
        hypes_this_month(&self.log, movie_id, now)
    }

    pub fn badge(&self, movie_id: &str, now: &DateTime<Local>) -> Option<BadgeTier> {
        BadgeTier::for_count(self.hypes_this_month(movie_id, now))
    }

    /// Badge per movie hyped during `now`'s month.
    pub fn monthly_badges(&self, now: &DateTime<Local>) -> BTreeMap<String, BadgeTier> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for entry in self.log.iter().filter(|e| same_month(&e.timestamp, now)) {
            *counts.entry(entry.movie_id.clone()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter_map(|(movie, count)| BadgeTier::for_count(count).map(|tier| (movie, tier)))
            .collect()
    }
}

pub fn hypes_this_month<Tz: TimeZone>(
    log: &[HypeLogEntry],
    movie_id: &str,
    now: &DateTime<Tz>,
) -> usize {
    log.iter()
        .filter(|e| e.movie_id == movie_id && same_month(&e.timestamp, now))
        .count()
}
