//! CLI command implementations.

pub mod agent;
pub mod collector;
pub mod dump;
pub mod log;
pub mod tail;
pub mod verify;

mod signal;
