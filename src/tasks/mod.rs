//! Background Tasks Module
//!
//! Periodic maintenance that can run alongside a shared cache.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at a fixed or configured interval

mod sweeper;

pub use sweeper::{spawn_configured_sweeper, spawn_sweeper};
