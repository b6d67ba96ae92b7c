//! Configuration module for Chan-Sweeper
//!
//! There is no configuration file: the only input is the optional section
//! argument. Everything else is a fixed default, gathered here so library
//! callers can build a [`Config`] pointing somewhere else.
//!
//! # Example
//!
//! ```no_run
//! use chan_sweeper::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("Sweeping section {}", config.board.section);
//! ```

mod defaults;
mod types;
mod validation;

// Re-export types
pub use types::{BoardConfig, Config, HttpConfig, ScheduleConfig, StorageConfig};

// Re-export construction functions
pub use defaults::{
    config_for_section, load_config, BOARD_NAME, DEFAULT_BASE_URL, DEFAULT_SECTION, MAX_ATTEMPTS,
    MAX_PAGES, RETRY_BACKOFF, SWEEP_INTERVAL,
};
pub use validation::validate;
