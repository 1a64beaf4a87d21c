//! Assets: typeface fonts, background loading, and text measurement.
//!
//! Font files are typeface JSON documents (per-glyph advances, outlines, and
//! font-wide metrics). Loading runs on a background thread; the frame loop
//! polls the returned [`AssetRequest`] without blocking.
//!
//! # Invariants
//! - A request resolves exactly once, to a font or to an [`AssetError`].
//! - Measurement never fails; unknown characters fall back to `?` or are skipped.

mod error;
mod font;
mod loader;

pub use error::AssetError;
pub use font::{BoundingBox, FontAsset, Glyph, TextExtent};
pub use loader::{AssetRequest, FontLoader, LoadState};

pub fn crate_info() -> &'static str {
    "donutspace-assets v0.1.0"
}
