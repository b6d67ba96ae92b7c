//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `ImageState`: What happened to one candidate image (skipped, fetched, failed)

mod image_state;

// Re-export main types
pub use image_state::ImageState;
