//! Test suites for the armory console daemon.

mod concurrency;
mod process_lifecycle;
pub(crate) mod support;
