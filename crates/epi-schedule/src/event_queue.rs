//! `EventQueue` — sparse day → agents multi-map.
//!
//! # Why this exists
//!
//! Infection trajectories are known in advance: at exposure we already know
//! the day an agent will turn infectious, become symptomatic, and recover.
//! Rather than scanning every infected agent every day, the driver files each
//! agent under the day of its next transition and drains only today's bucket.
//!
//! # Ordering
//!
//! Buckets preserve insertion order, so agents are processed in the order
//! they were scheduled.  Each bucket carries a hash set alongside the order
//! vector so duplicate adds are rejected in O(1).

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use epi_core::{AgentId, Day, EpiError, EpiResult};

#[derive(Default, Debug, Clone)]
struct Bucket {
    order:   Vec<AgentId>,
    members: FxHashSet<AgentId>,
}

/// Agents with a pending transition, keyed by the day it fires.
#[derive(Default, Debug, Clone)]
pub struct EventQueue {
    inner:           BTreeMap<Day, Bucket>,
    /// Cached total agent count for O(1) `len()`.
    total:           usize,
    drained_through: Option<Day>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `agent` on `day`.
    ///
    /// Returns `Ok(false)` if the agent was already in that day's bucket.
    /// Fails with [`EpiError::EventInPast`] if `day` has already been drained.
    pub fn add(&mut self, day: Day, agent: AgentId) -> EpiResult<bool> {
        if let Some(drained) = self.drained_through {
            if day <= drained {
                return Err(EpiError::EventInPast { agent, day, drained });
            }
        }
        let bucket = self.inner.entry(day).or_default();
        if !bucket.members.insert(agent) {
            return Ok(false);
        }
        bucket.order.push(agent);
        self.total += 1;
        Ok(true)
    }

    /// Remove `agent` from `day`'s bucket.
    ///
    /// Cancelling an event that already fired or was never scheduled is legal
    /// and returns `false`.
    pub fn cancel(&mut self, day: Day, agent: AgentId) -> bool {
        let Some(bucket) = self.inner.get_mut(&day) else {
            return false;
        };
        if !bucket.members.remove(&agent) {
            return false;
        }
        if let Some(pos) = bucket.order.iter().position(|&a| a == agent) {
            bucket.order.remove(pos);
        }
        self.total -= 1;
        if bucket.order.is_empty() {
            self.inner.remove(&day);
        }
        true
    }

    /// Remove and return every agent scheduled for exactly `day`.
    ///
    /// Fails with [`EpiError::DayAlreadyDrained`] if `day` is not later than
    /// the last drained day.
    pub fn drain(&mut self, day: Day) -> EpiResult<Vec<AgentId>> {
        if let Some(drained) = self.drained_through {
            if day <= drained {
                return Err(EpiError::DayAlreadyDrained { day });
            }
        }
        self.drained_through = Some(day);
        let agents = self.inner.remove(&day).map(|b| b.order).unwrap_or_default();
        self.total -= agents.len();
        Ok(agents)
    }

    /// Is `agent` scheduled on `day`?
    pub fn contains(&self, day: Day, agent: AgentId) -> bool {
        self.inner.get(&day).is_some_and(|b| b.members.contains(&agent))
    }

    /// Agents currently scheduled on `day`, in insertion order.
    pub fn pending(&self, day: Day) -> &[AgentId] {
        self.inner.get(&day).map_or(&[], |b| b.order.as_slice())
    }

    /// The earliest day with at least one queued agent.
    pub fn next_day(&self) -> Option<Day> {
        self.inner.keys().next().copied()
    }

    /// The last day drained, if any.
    pub fn drained_through(&self) -> Option<Day> {
        self.drained_through
    }

    /// Total number of (day, agent) entries.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct days with at least one queued agent.
    pub fn day_count(&self) -> usize {
        self.inner.len()
    }
}
