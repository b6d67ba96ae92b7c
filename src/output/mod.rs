//! Output module for reporting crawl progress
//!
//! This module handles:
//! - Counting what each sweep did
//! - Logging a one-line summary at the end of every sweep

pub mod stats;

pub use stats::SweepStats;
