//! Timetable planning for LearnVeda.
//!
//! A generate action runs in two steps:
//!
//! 1. **Allocate** study hours and chapter ranges across the available days
//! 2. **Advise** by sending one prompt to the configured provider
//!
//! Allocation is pure and deterministic. Advice may fail, in which case the
//! plan carries a fallback text instead.

pub mod advisory;
pub mod allocation;
pub mod planner;
pub mod report;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use advisory::AdvisoryClient;
pub use allocation::{AllocationOptions, allocate};
pub use planner::Planner;
pub use report::render_text;
