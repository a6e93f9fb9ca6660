//! `epi-schedule` — transition event queues and import windows.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`event_queue`] | `EventQueue` (`BTreeMap<Day, bucket>` with drain guard)  |
//! | [`queues`]      | `EventKind`, `EventQueues` (the six per-disease queues)  |
//! | [`import`]      | `ImportWindow`, `ImportSchedule`                         |
//! | [`loader`]      | `load_import_windows_csv`, `load_import_windows_reader`  |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                     |
//!
//! # Queue model (summary)
//!
//! ```text
//! add(day, agent)     → bucket[day] gains agent (no-op if already there)
//! cancel(day, agent)  → bucket[day] loses agent (no-op if absent)
//! drain(day)          → bucket[day] returned in insertion order, removed
//! ```
//!
//! A queue remembers the last day it drained and refuses both scheduling
//! into that day (or earlier) and draining it again.

pub mod error;
pub mod event_queue;
pub mod import;
pub mod loader;
pub mod queues;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use event_queue::EventQueue;
pub use import::{ImportSchedule, ImportWindow};
pub use loader::{load_import_windows_csv, load_import_windows_reader};
pub use queues::{EventKind, EventQueues};
