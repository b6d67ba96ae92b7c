use crate::config::types::{BoardConfig, Config, HttpConfig, ScheduleConfig, StorageConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Section swept when no argument is given
pub const DEFAULT_SECTION: &str = "s";

/// Board name, also the directory under `$HOME/images`
pub const BOARD_NAME: &str = "4chan";

/// Host serving the board pages
pub const DEFAULT_BASE_URL: &str = "http://cgi.4chan.org/";

/// Index pages visited per sweep
pub const MAX_PAGES: u32 = 10;

/// Pause between sweeps
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(23);

/// Attempts per fetch before a transient failure is final
pub const MAX_ATTEMPTS: u32 = 5;

/// Base delay between fetch attempts
pub const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Builds the configuration from the command-line section and `$HOME`
///
/// # Arguments
///
/// * `section` - The optional section argument; absent or empty means [`DEFAULT_SECTION`]
///
/// # Returns
///
/// * `Ok(Config)` - Validated configuration
/// * `Err(ConfigError)` - `$HOME` is missing or the section is not a valid token
///
/// # Example
///
/// ```no_run
/// use chan_sweeper::config::load_config;
///
/// let config = load_config(Some("wg")).unwrap();
/// println!("Images go to {}", config.section_dir().display());
/// ```
pub fn load_config(section: Option<&str>) -> Result<Config, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::MissingHome)?;
    config_for_section(section, Path::new(&home))
}

/// Builds the configuration for a section under an explicit home directory
pub fn config_for_section(section: Option<&str>, home: &Path) -> Result<Config, ConfigError> {
    let section = match section.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => DEFAULT_SECTION,
    };

    let config = Config {
        board: BoardConfig {
            name: BOARD_NAME.to_string(),
            section: section.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            max_pages: MAX_PAGES,
        },
        storage: StorageConfig {
            root: Config::image_root(home, BOARD_NAME),
        },
        http: HttpConfig {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_attempts: MAX_ATTEMPTS,
            retry_backoff: RETRY_BACKOFF,
        },
        schedule: ScheduleConfig {
            sweep_interval: SWEEP_INTERVAL,
        },
    };

    validate(&config)?;

    Ok(config)
}
