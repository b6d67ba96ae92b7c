/// Image state definitions for tracking what happened to one candidate image
///
/// An image task starts `Pending` and ends in exactly one terminal state.
use std::fmt;

/// Represents the outcome of one image task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageState {
    // ===== Active States =====
    /// Image has been discovered but not yet looked at
    Pending,

    // ===== Terminal Skip States =====
    /// The ledger already lists this URL
    AlreadyFetched,

    /// The target file is already on disk
    FileExists,

    // ===== Terminal Success States =====
    /// Bytes were written and the URL recorded in the ledger
    Fetched,

    // ===== Terminal Error States =====
    /// The server answered with a non-success status, or the bytes could
    /// not be written
    Failed,

    /// The fetch was given up after retries or a permanent error
    Abandoned,
}

impl ImageState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the image was skipped as a duplicate
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::AlreadyFetched | Self::FileExists)
    }

    /// Returns true if this run downloaded the image
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fetched)
    }

    /// Returns true if the download was attempted and did not succeed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed | Self::Abandoned)
    }

    /// Returns a human-readable description of this state
    pub fn description(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AlreadyFetched => "already fetched",
            Self::FileExists => "file exists",
            Self::Fetched => "fetched",
            Self::Failed => "epic fail",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for ImageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
