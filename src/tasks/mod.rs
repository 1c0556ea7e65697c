//! Background Tasks Module
//!
//! Contains background tasks that run alongside a cache.
//!
//! # Tasks
//! - Sweeper: Removes expired auto entries at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperState};
