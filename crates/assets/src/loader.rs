use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::{AssetError, FontAsset};

/// Progress of an [`AssetRequest`].
#[derive(Debug)]
pub enum LoadState<T> {
    /// Still loading; poll again next frame.
    Pending,
    /// Finished, successfully or not.
    Ready(Result<T, AssetError>),
}

/// Handle to an asset loading in the background.
///
/// Polling never blocks. Once a request reports [`LoadState::Ready`] the
/// caller should drop it; polling again reports a disconnected loader.
#[derive(Debug)]
pub struct AssetRequest<T> {
    path: PathBuf,
    rx: mpsc::Receiver<Result<T, AssetError>>,
}

impl<T> AssetRequest<T> {
    /// A request plus the sender that completes it.
    pub fn channel(path: impl Into<PathBuf>) -> (mpsc::Sender<Result<T, AssetError>>, Self) {
        let (tx, rx) = mpsc::channel();
        (
            tx,
            Self {
                path: path.into(),
                rx,
            },
        )
    }

    /// A request that is already resolved.
    pub fn ready(path: impl Into<PathBuf>, result: Result<T, AssetError>) -> Self {
        let (tx, request) = Self::channel(path);
        // The receiver lives in `request`, so this send cannot fail.
        let _ = tx.send(result);
        request
    }

    /// Path being loaded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for completion.
    pub fn poll(&mut self) -> LoadState<T> {
        match self.rx.try_recv() {
            Ok(result) => LoadState::Ready(result),
            Err(mpsc::TryRecvError::Empty) => LoadState::Pending,
            Err(mpsc::TryRecvError::Disconnected) => {
                LoadState::Ready(Err(AssetError::Disconnected(self.path.clone())))
            }
        }
    }
}

/// Loads typeface fonts on a background thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontLoader;

impl FontLoader {
    pub fn new() -> Self {
        Self
    }

    /// Start loading `path`. The returned request resolves once.
    pub fn load(&self, path: impl AsRef<Path>) -> AssetRequest<FontAsset> {
        let path = path.as_ref().to_path_buf();
        let (tx, request) = AssetRequest::channel(path.clone());
        let thread_path = path.clone();

        let spawned = std::thread::Builder::new()
            .name("font-loader".into())
            .spawn(move || {
                let result = FontAsset::load(&thread_path);
                match &result {
                    Ok(font) => tracing::debug!(
                        "loaded typeface {} ({} glyphs) from {}",
                        font.family_name,
                        font.glyphs.len(),
                        thread_path.display()
                    ),
                    Err(e) => tracing::warn!("{e}"),
                }
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => request,
            Err(source) => {
                tracing::error!("failed to spawn font loader thread: {source}");
                AssetRequest::ready(path.clone(), Err(AssetError::Io { path, source }))
            }
        }
    }
}
