//! # Grubcall Core Library
//!
//! Core logic for Grubcall, a recurring group food-order coordinator.
//! A daily collection window opens at a configured local time, gathers
//! free-text orders from participants, closes on a deadline, and produces
//! a consolidated receipt.
//!
//! ## Architecture
//!
//! - **Window**: the `Idle`/`Collecting` state machine holding entries and
//!   the deadline; pure, no I/O
//! - **Parser**: free-text order text to quantity-expanded labels
//! - **Report**: aggregation into total counts and a who-ordered-what
//!   breakdown
//! - **Store**: JSON snapshot persistence so an in-flight window survives
//!   restarts with its deadline intact
//! - **Session**: thin controller serializing every transition behind one
//!   lock and rendering transport notifications
//! - **Sched**: the daily open trigger and the expiry poll
//!
//! The chat transport itself is a collaborator behind the [`Notifier`]
//! trait; this crate never talks to a network.

pub mod config;
pub mod error;
pub mod parser;
pub mod report;
pub mod sched;
pub mod session;
pub mod store;
pub mod window;

pub use config::Config;
pub use error::{ConfigError, CoreError, Result, StoreError, TransitionError};
pub use parser::parse_order;
pub use report::Report;
pub use sched::{is_excluded_day, next_open_instant, run_daily_open, run_expiry_poll, SchedulerParams};
pub use session::{Notification, Notifier, Session, SharedSession};
pub use store::{data_dir, JsonFileStore, OrderStore};
pub use window::{CollectionWindow, Entry, SubmitOutcome, WindowStatus};
