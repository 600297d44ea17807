//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Sweeper: removes cache entries whose time-to-live has elapsed

mod sweeper;

pub(crate) use sweeper::spawn_sweeper;
