//! The six per-disease transition queues.

use epi_core::{AgentId, Day, EpiResult};

use crate::EventQueue;

/// Transition kinds, in the order the daily pipeline processes them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    InfectiousStart,
    InfectiousEnd,
    SymptomsStart,
    SymptomsEnd,
    ImmunityStart,
    ImmunityEnd,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::InfectiousStart,
        EventKind::InfectiousEnd,
        EventKind::SymptomsStart,
        EventKind::SymptomsEnd,
        EventKind::ImmunityStart,
        EventKind::ImmunityEnd,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::InfectiousStart => "infectious_start",
            EventKind::InfectiousEnd   => "infectious_end",
            EventKind::SymptomsStart   => "symptoms_start",
            EventKind::SymptomsEnd     => "symptoms_end",
            EventKind::ImmunityStart   => "immunity_start",
            EventKind::ImmunityEnd     => "immunity_end",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independent [`EventQueue`] per [`EventKind`].
#[derive(Default, Debug, Clone)]
pub struct EventQueues {
    queues: [EventQueue; 6],
}

impl EventQueues {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, kind: EventKind, day: Day, agent: AgentId) -> EpiResult<bool> {
        self.queues[kind.index()].add(day, agent)
    }

    #[inline]
    pub fn cancel(&mut self, kind: EventKind, day: Day, agent: AgentId) -> bool {
        self.queues[kind.index()].cancel(day, agent)
    }

    #[inline]
    pub fn drain(&mut self, kind: EventKind, day: Day) -> EpiResult<Vec<AgentId>> {
        self.queues[kind.index()].drain(day)
    }

    pub fn pending(&self, kind: EventKind, day: Day) -> &[AgentId] {
        self.queues[kind.index()].pending(day)
    }

    pub fn contains(&self, kind: EventKind, day: Day, agent: AgentId) -> bool {
        self.queues[kind.index()].contains(day, agent)
    }

    pub fn queue(&self, kind: EventKind) -> &EventQueue {
        &self.queues[kind.index()]
    }

    /// Total pending events across all kinds.
    pub fn len(&self) -> usize {
        self.queues.iter().map(EventQueue::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(EventQueue::is_empty)
    }
}
