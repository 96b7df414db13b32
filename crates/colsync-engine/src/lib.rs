//! colsync engine - Core business logic
//!
//! This crate implements the synchronization itself:
//! - Joining catalog columns with warehouse comments
//! - Publishing descriptions column by column
//! - The per-table pipeline and the multi-table run

pub mod join;
pub mod pipeline;
pub mod synchronizer;

pub use join::join;
pub use pipeline::{SyncPipeline, SyncTargets};
pub use synchronizer::{publish_description, synchronize, SyncOptions};
