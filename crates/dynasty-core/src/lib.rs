// Library root: re-exports all modules so integration tests and the CLI can
// access the crate's public API.

pub mod analysis;
pub mod config;
pub mod roster;
pub mod season;
pub mod valuation;
