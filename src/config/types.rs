use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main configuration structure for Chan-Sweeper
#[derive(Debug, Clone)]
pub struct Config {
    pub board: BoardConfig,
    pub storage: StorageConfig,
    pub http: HttpConfig,
    pub schedule: ScheduleConfig,
}

/// Which board section to sweep and where it lives
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Name of the image board, used as a directory under the image root
    pub name: String,

    /// Section token (e.g. "s"), used in URLs and file names
    pub section: String,

    /// Root URL of the board host
    pub base_url: Url,

    /// Number of index pages visited per sweep
    pub max_pages: u32,
}

/// On-disk layout configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding one sub-directory and one ledger file per section
    pub root: PathBuf,
}

/// HTTP client and retry configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Total time allowed for one request, body included
    pub request_timeout: Duration,

    /// Time allowed to establish a connection
    pub connect_timeout: Duration,

    /// Attempts per fetch before giving up on transient failures
    pub max_attempts: u32,

    /// Base delay between attempts, multiplied by the attempt number
    pub retry_backoff: Duration,
}

/// Sweep scheduling configuration
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Pause between the end of one sweep and the start of the next
    pub sweep_interval: Duration,
}

impl Config {
    /// Directory the section's images are written to
    pub fn section_dir(&self) -> PathBuf {
        self.storage.root.join(&self.board.section)
    }

    /// Path of the section's ledger log (`<root>/<section>_fetched.txt`)
    pub fn ledger_path(&self) -> PathBuf {
        self.storage
            .root
            .join(format!("{}_fetched.txt", self.board.section))
    }

    /// Storage root for a board under a home directory
    pub fn image_root(home: &Path, board_name: &str) -> PathBuf {
        home.join("images").join(board_name)
    }
}
