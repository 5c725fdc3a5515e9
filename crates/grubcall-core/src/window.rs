//! Collection window state machine.
//!
//! The window is a wall-clock-based state machine with exactly two states:
//!
//! ```text
//! Idle <-> Collecting
//! ```
//!
//! It holds no I/O and spawns no tasks -- the session controller invokes
//! transitions and decides when the automatic close fires. Entries survive
//! a close so the final report can still be generated; they are cleared on
//! the next open.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowStatus {
    Idle,
    Collecting,
}

/// One participant's current submission. Owned by the window, keyed by
/// participant id; a resubmission replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub display_name: String,
    pub raw_text: String,
}

/// Outcome of a submit: whether the participant already had an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Placed,
    Replaced,
}

/// The one collection window the process owns for its lifetime.
///
/// Invariant: `end_time` is `Some` exactly while `status` is `Collecting`,
/// and at the moment of the open transition it is strictly in the future.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionWindow {
    status: WindowStatus,
    end_time: Option<DateTime<Utc>>,
    entries: BTreeMap<String, Entry>,
}

impl Default for CollectionWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionWindow {
    /// Fresh idle window with no entries.
    pub fn new() -> Self {
        Self {
            status: WindowStatus::Idle,
            end_time: None,
            entries: BTreeMap::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> WindowStatus {
        self.status
    }

    pub fn is_collecting(&self) -> bool {
        self.status == WindowStatus::Collecting
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn entries(&self) -> &BTreeMap<String, Entry> {
        &self.entries
    }

    /// Whether the deadline has passed. Always false while idle, which is
    /// what makes repeated expiry checks after a close harmless.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == WindowStatus::Collecting
            && self.end_time.is_some_and(|end| now >= end)
    }

    /// Time left until the deadline, while collecting.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.status != WindowStatus::Collecting {
            return None;
        }
        self.end_time.map(|end| end - now)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Open (or re-open) the window. Allowed from any state; previous
    /// entries are discarded. Returns the new deadline.
    pub fn open(
        &mut self,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> Result<DateTime<Utc>, TransitionError> {
        if duration <= Duration::zero() {
            return Err(TransitionError::NonPositiveDuration {
                minutes: duration.num_minutes(),
            });
        }
        let end = now + duration;
        self.status = WindowStatus::Collecting;
        self.entries.clear();
        self.end_time = Some(end);
        Ok(end)
    }

    /// Upsert a participant's order. Last write wins.
    pub fn submit(
        &mut self,
        participant_id: &str,
        display_name: &str,
        raw_text: &str,
    ) -> Result<SubmitOutcome, TransitionError> {
        if self.status != WindowStatus::Collecting {
            return Err(TransitionError::NotCollecting);
        }
        let previous = self.entries.insert(
            participant_id.to_string(),
            Entry {
                display_name: display_name.to_string(),
                raw_text: raw_text.to_string(),
            },
        );
        Ok(if previous.is_some() {
            SubmitOutcome::Replaced
        } else {
            SubmitOutcome::Placed
        })
    }

    /// Remove a participant's order, returning it.
    pub fn cancel(&mut self, participant_id: &str) -> Result<Entry, TransitionError> {
        if self.status != WindowStatus::Collecting {
            return Err(TransitionError::NotCollecting);
        }
        self.entries
            .remove(participant_id)
            .ok_or_else(|| TransitionError::NoSuchOrder {
                participant_id: participant_id.to_string(),
            })
    }

    /// Close the window. Entries are retained for reporting until the
    /// next open.
    pub fn close(&mut self) -> Result<(), TransitionError> {
        if self.status != WindowStatus::Collecting {
            return Err(TransitionError::AlreadyClosed);
        }
        self.status = WindowStatus::Idle;
        self.end_time = None;
        Ok(())
    }
}
