use std::path::PathBuf;

use orbit_layout::LayoutBoundsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Exit code for bad invocations and malformed inputs.
pub const EXIT_INVALID_INPUT: i32 = 2;
/// Exit code for filesystem and output failures.
pub const EXIT_IO: i32 = 10;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid replay script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid layout bounds: {0}")]
    Bounds(#[from] LayoutBoundsError),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Script { .. } | Self::Bounds(_) => EXIT_INVALID_INPUT,
            Self::Read { .. } | Self::Encode(_) | Self::Output(_) => EXIT_IO,
        }
    }
}
