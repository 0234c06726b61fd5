pub mod agenda;
pub mod check;
pub mod config;
pub mod day;
pub mod month;
pub mod open;
pub mod week;
