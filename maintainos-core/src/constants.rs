/// Default location of the work order export read by the calendar.
pub const DEFAULT_ITEMS_PATH: &str = "~/.maintainos/work_orders.json";

/// Prefix for environment variables that override config file values.
pub const ENV_PREFIX: &str = "MAINTAINOS";

/// Days shown by an agenda when no end date is given (today plus six).
pub const DEFAULT_AGENDA_DAYS: u64 = 6;

/// Toast shown when someone tries to open an occurrence dated after today.
pub const FUTURE_LOCK_NOTICE: &str = "Work orders scheduled for a future date can't be opened yet";
