//! Scheduling core for the maintainOS calendar.
//!
//! This crate turns the work orders handed over by the maintainOS backend into
//! calendar views:
//! - `work_item` for the work order model and JSON loading
//! - `recurrence` for recurrence rules and the per-day evaluator
//! - `grid` for month and week grids
//! - `interaction` for the future-lock policy, hover cards and day detail

pub mod clock;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod filter;
pub mod grid;
pub mod interaction;
pub mod recurrence;
pub mod work_item;

pub use clock::{Clock, FixedClock, SystemClock};
pub use date_range::{DateRange, WeekStart};
pub use error::{CoreError, CoreResult};
pub use grid::{CalendarDay, Occurrence, build_grid};
pub use recurrence::{RecurrenceRule, RuleParseError, Schedule, occurs_on};
pub use work_item::{Assignee, Priority, WorkItem, WorkItemStatus};
