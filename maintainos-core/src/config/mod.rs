//! Configuration for the maintainOS calendar.

mod global;

pub use global::MaintainConfig;
