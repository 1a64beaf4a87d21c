use std::path::PathBuf;

/// Reasons an asset load failed.
///
/// Every variant means the same thing to the scene: the asset never arrives
/// and whatever depended on it stays inert.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse typeface {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("typeface {} is unusable: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error("loader for {} stopped before delivering a result", .0.display())]
    Disconnected(PathBuf),
}

impl AssetError {
    /// Path of the asset that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::Invalid { path, .. } => path,
            Self::Disconnected(path) => path,
        }
    }
}
