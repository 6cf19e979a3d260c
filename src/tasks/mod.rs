//! Background Tasks Module
//!
//! Periodic maintenance a host may run alongside a [`SharedCache`](crate::SharedCache).
//!
//! # Tasks
//! - Expiry sweep: removes expired cache entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
