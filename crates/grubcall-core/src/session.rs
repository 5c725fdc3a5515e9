//! Session controller.
//!
//! Thin orchestration over the collection window: maps external triggers
//! (manual commands, scheduler ticks) onto state-machine transitions,
//! persists after every mutation, and renders the outbound texts the
//! transport delivers to the group.
//!
//! All access goes through one `SharedSession` mutex so manual commands
//! and the two scheduler tasks never race on a transition.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::error::TransitionError;
use crate::report::Report;
use crate::store::OrderStore;
use crate::window::{CollectionWindow, SubmitOutcome};

/// The single exclusion domain: every transition acquires this lock.
pub type SharedSession = Arc<Mutex<Session>>;

/// Outbound message for the transport collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    WindowOpened {
        duration_minutes: i64,
        end_time: DateTime<Utc>,
    },
    WindowClosed {
        /// (display name, raw order text), in participant-id order.
        orders: Vec<(String, String)>,
        report: Report,
    },
    WindowClosedEmpty,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::WindowOpened {
                duration_minutes, ..
            } => {
                writeln!(
                    f,
                    "🍔 Time to order food! Place your orders within {duration_minutes} minutes."
                )?;
                writeln!(f)?;
                writeln!(f, "Examples:")?;
                writeln!(f, "• 2x burger and fries")?;
                writeln!(f, "• chicken sandwich")?;
                write!(f, "• 3 tacos")
            }
            Notification::WindowClosed { orders, report } => {
                writeln!(f, "⏰ Order collection is now closed.")?;
                writeln!(f)?;
                writeln!(f, "📋 Final Order Summary:")?;
                for (name, text) in orders {
                    writeln!(f, "• {name}: {text}")?;
                }
                writeln!(f)?;
                write!(f, "{report}")
            }
            Notification::WindowClosedEmpty => {
                write!(f, "Order collection is now closed. No orders were placed.")
            }
        }
    }
}

/// Transport boundary. Implementations deliver rendered notifications to
/// wherever the group lives (a chat platform, stdout, a test buffer).
pub trait Notifier: Send + Sync {
    fn deliver(&self, note: &Notification) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Owns the one collection window and its store.
pub struct Session {
    window: CollectionWindow,
    store: Box<dyn OrderStore>,
}

impl Session {
    /// Restore from the snapshot, or start fresh.
    ///
    /// A missing snapshot is a normal first run. An unreadable one is
    /// logged as a warning and replaced by a fresh idle window -- startup
    /// never fails on persistence problems.
    pub fn restore(store: Box<dyn OrderStore>) -> Self {
        let window = match store.load() {
            Ok(Some(window)) => {
                tracing::info!(
                    collecting = window.is_collecting(),
                    entries = window.entries().len(),
                    "restored order state from snapshot"
                );
                window
            }
            Ok(None) => CollectionWindow::new(),
            Err(err) => {
                tracing::warn!(error = %err, "snapshot unreadable; starting with a fresh window");
                CollectionWindow::new()
            }
        };
        Self { window, store }
    }

    pub fn window(&self) -> &CollectionWindow {
        &self.window
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Open a collection window for `duration` from `now`.
    pub fn open_window(
        &mut self,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> Result<Notification, TransitionError> {
        let end_time = self.window.open(now, duration)?;
        self.persist();
        tracing::info!(end_time = %end_time, "collection window opened");
        Ok(Notification::WindowOpened {
            duration_minutes: duration.num_minutes(),
            end_time,
        })
    }

    /// Manual close. Signaled no-op when already idle.
    pub fn close_window(&mut self) -> Result<Notification, TransitionError> {
        self.window.close()?;
        self.persist();
        tracing::info!("collection window closed manually");
        Ok(self.close_notification())
    }

    /// Automatic close path. Returns a notification only on the tick that
    /// actually closes the window; checks after that are no-ops.
    pub fn check_expiry(&mut self, now: DateTime<Utc>) -> Option<Notification> {
        if !self.window.is_expired(now) {
            return None;
        }
        // is_expired guarantees Collecting, so close cannot be rejected.
        self.window.close().ok()?;
        self.persist();
        tracing::info!("collection window closed on deadline");
        Some(self.close_notification())
    }

    /// Place or replace a participant's order. Returns the acknowledgement
    /// text for the participant.
    pub fn submit_order(
        &mut self,
        participant_id: &str,
        display_name: &str,
        raw_text: &str,
    ) -> Result<String, TransitionError> {
        let outcome = self.window.submit(participant_id, display_name, raw_text)?;
        self.persist();
        Ok(match outcome {
            SubmitOutcome::Placed => format!("Your order has been placed: {raw_text}"),
            SubmitOutcome::Replaced => format!("Your order has been updated: {raw_text}"),
        })
    }

    /// Cancel a participant's order.
    pub fn cancel_order(&mut self, participant_id: &str) -> Result<String, TransitionError> {
        self.window.cancel(participant_id)?;
        self.persist();
        Ok("Your order has been canceled.".to_string())
    }

    // ── Read-only views ──────────────────────────────────────────────

    /// Per-participant listing, with time remaining while collecting.
    pub fn summary(&self, now: DateTime<Utc>) -> String {
        if self.window.entries().is_empty() {
            return "No orders have been placed yet.".to_string();
        }
        let mut summary = String::from("📋 Current Orders:\n\n");
        for entry in self.window.entries().values() {
            summary.push_str(&format!("• {}: {}\n", entry.display_name, entry.raw_text));
        }
        if let Some(remaining) = self.window.remaining(now) {
            summary.push_str(&format!(
                "\nOrder collection ends in {} minutes.",
                remaining.num_minutes().max(0)
            ));
        }
        summary
    }

    /// Consolidated receipt over the current entries, or `None` if there
    /// are no orders.
    pub fn receipt(&self) -> Option<Report> {
        if self.window.entries().is_empty() {
            return None;
        }
        Some(Report::from_entries(self.window.entries()))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn close_notification(&self) -> Notification {
        if self.window.entries().is_empty() {
            return Notification::WindowClosedEmpty;
        }
        let orders = self
            .window
            .entries()
            .values()
            .map(|e| (e.display_name.clone(), e.raw_text.clone()))
            .collect();
        Notification::WindowClosed {
            orders,
            report: Report::from_entries(self.window.entries()),
        }
    }

    /// Best-effort durability: a failed save is logged and the in-memory
    /// transition stands.
    fn persist(&self) {
        if let Err(err) = self.store.save(&self.window) {
            tracing::warn!(error = %err, "failed to persist order state; continuing in memory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::window::WindowStatus;
    use std::path::PathBuf;
    use std::sync::Mutex as StdMutex;

    /// In-memory store double; also serves as the "persistence keeps
    /// working" witness.
    #[derive(Default)]
    struct MemoryStore {
        saved: StdMutex<Option<CollectionWindow>>,
    }

    impl OrderStore for MemoryStore {
        fn save(&self, window: &CollectionWindow) -> Result<(), StoreError> {
            *self.saved.lock().unwrap() = Some(window.clone());
            Ok(())
        }

        fn load(&self) -> Result<Option<CollectionWindow>, StoreError> {
            Ok(self.saved.lock().unwrap().clone())
        }
    }

    /// Store whose saves always fail.
    struct BrokenStore;

    impl OrderStore for BrokenStore {
        fn save(&self, _window: &CollectionWindow) -> Result<(), StoreError> {
            Err(StoreError::WriteFailed {
                path: PathBuf::from("/nowhere/order_state.json"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn load(&self) -> Result<Option<CollectionWindow>, StoreError> {
            Err(StoreError::Malformed {
                path: PathBuf::from("/nowhere/order_state.json"),
                message: "truncated".to_string(),
            })
        }
    }

    fn t0() -> DateTime<Utc> {
        "2026-08-27T09:50:00Z".parse().unwrap()
    }

    fn fresh_session() -> Session {
        Session::restore(Box::<MemoryStore>::default())
    }

    #[test]
    fn submit_then_cancel_leaves_no_trace_in_summary() {
        let mut session = fresh_session();
        session.open_window(t0(), Duration::minutes(30)).unwrap();
        session.submit_order("u1", "Alice", "2x burger").unwrap();
        session.submit_order("u2", "Bob", "soda").unwrap();
        session.cancel_order("u1").unwrap();

        let summary = session.summary(t0());
        assert!(!summary.contains("Alice"));
        assert!(summary.contains("Bob: soda"));
        assert!(summary.contains("ends in 30 minutes"));
    }

    #[test]
    fn close_is_idempotent_for_the_expiry_poll() {
        let mut session = fresh_session();
        session.open_window(t0(), Duration::minutes(30)).unwrap();
        session.submit_order("u1", "Alice", "soda").unwrap();

        let deadline = t0() + Duration::minutes(30);
        assert!(session.check_expiry(t0() + Duration::minutes(10)).is_none());
        let first = session.check_expiry(deadline);
        assert!(first.is_some());
        // Later polls see an idle window and stay silent.
        assert!(session.check_expiry(deadline + Duration::minutes(1)).is_none());
        assert_eq!(session.window().entries().len(), 1);
    }

    #[test]
    fn manual_close_twice_is_rejected_the_second_time() {
        let mut session = fresh_session();
        session.open_window(t0(), Duration::minutes(30)).unwrap();
        session.close_window().unwrap();
        assert_eq!(session.close_window(), Err(TransitionError::AlreadyClosed));
    }

    #[test]
    fn close_with_orders_carries_the_report() {
        let mut session = fresh_session();
        session.open_window(t0(), Duration::minutes(30)).unwrap();
        session.submit_order("a", "Alice", "2x soda").unwrap();
        session.submit_order("b", "Bob", "soda").unwrap();

        match session.close_window().unwrap() {
            Notification::WindowClosed { orders, report } => {
                assert_eq!(orders.len(), 2);
                assert_eq!(report.total_counts, vec![("soda".to_string(), 3)]);
            }
            other => panic!("expected WindowClosed, got {other:?}"),
        }
    }

    #[test]
    fn close_without_orders_says_so() {
        let mut session = fresh_session();
        session.open_window(t0(), Duration::minutes(30)).unwrap();
        assert_eq!(
            session.close_window().unwrap(),
            Notification::WindowClosedEmpty
        );
    }

    #[test]
    fn submit_while_idle_is_rejected() {
        let mut session = fresh_session();
        assert_eq!(
            session.submit_order("u1", "Alice", "burger"),
            Err(TransitionError::NotCollecting)
        );
    }

    #[test]
    fn restore_resumes_the_original_deadline() {
        let store = Box::<MemoryStore>::default();
        let mut window = CollectionWindow::new();
        window.open(t0(), Duration::minutes(30)).unwrap();
        window.submit("u1", "Alice", "soda").unwrap();
        store.save(&window).unwrap();

        let mut session = Session::restore(store);
        assert!(session.window().is_collecting());
        // Still counting toward the persisted deadline, not a fresh one.
        assert!(session.check_expiry(t0() + Duration::minutes(29)).is_none());
        assert!(session.check_expiry(t0() + Duration::minutes(30)).is_some());
    }

    #[test]
    fn unreadable_snapshot_falls_back_to_fresh_idle() {
        let session = Session::restore(Box::new(BrokenStore));
        assert_eq!(session.window().status(), WindowStatus::Idle);
        assert!(session.window().entries().is_empty());
    }

    #[test]
    fn failed_saves_do_not_roll_back_transitions() {
        let mut session = Session::restore(Box::new(BrokenStore));
        session.open_window(t0(), Duration::minutes(30)).unwrap();
        session.submit_order("u1", "Alice", "soda").unwrap();
        assert_eq!(session.window().entries().len(), 1);
        assert!(session.receipt().is_some());
    }

    #[test]
    fn receipt_is_none_without_orders() {
        let session = fresh_session();
        assert!(session.receipt().is_none());
        assert_eq!(session.summary(t0()), "No orders have been placed yet.");
    }

    #[test]
    fn opened_notification_renders_duration_and_examples() {
        let mut session = fresh_session();
        let note = session.open_window(t0(), Duration::minutes(30)).unwrap();
        let text = note.to_string();
        assert!(text.contains("within 30 minutes"));
        assert!(text.contains("2x burger and fries"));
    }
}
