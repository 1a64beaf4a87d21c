use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::AssetError;

/// Font-wide bounding box in font units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

/// One glyph: horizontal advance plus its outline command string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// Horizontal advance in font units.
    pub ha: f32,
    #[serde(default)]
    pub x_min: f32,
    #[serde(default)]
    pub x_max: f32,
    /// Outline commands (`m`, `l`, `q`, `b`). Empty for whitespace.
    #[serde(default)]
    pub o: String,
}

/// A typeface font as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontAsset {
    pub family_name: String,
    /// Font units per em.
    pub resolution: f32,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub underline_thickness: f32,
    #[serde(default)]
    pub ascender: f32,
    #[serde(default)]
    pub descender: f32,
    /// Glyphs keyed by the character they draw.
    pub glyphs: BTreeMap<String, Glyph>,
}

/// Axis-aligned size of a laid-out block of text, in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl FontAsset {
    /// Read and validate a typeface file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &data)
    }

    /// Parse and validate typeface JSON. `origin` is only used in errors.
    pub fn from_json(origin: impl AsRef<Path>, json: &str) -> Result<Self, AssetError> {
        let origin = origin.as_ref();
        let font: Self = serde_json::from_str(json).map_err(|source| AssetError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        font.validate().map_err(|reason| AssetError::Invalid {
            path: origin.to_path_buf(),
            reason,
        })?;
        Ok(font)
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(format!("resolution must be positive, got {}", self.resolution));
        }
        if self.glyphs.is_empty() {
            return Err("no glyphs".into());
        }
        let bb = &self.bounding_box;
        if bb.y_max < bb.y_min || bb.x_max < bb.x_min {
            return Err("inverted bounding box".into());
        }
        Ok(())
    }

    /// Look up the glyph for `c`, falling back to `?`.
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        let mut buf = [0u8; 4];
        self.glyphs
            .get(c.encode_utf8(&mut buf) as &str)
            .or_else(|| self.glyphs.get("?"))
    }

    /// Distance between baselines at `size`.
    pub fn line_height(&self, size: f32) -> f32 {
        let bb = &self.bounding_box;
        (bb.y_max - bb.y_min + self.underline_thickness) * size / self.resolution
    }

    /// Lay out `text` at `size` and return the block's extent.
    ///
    /// Lines break on `\n`. Width is the widest line's summed advances;
    /// height is one line height per line. Characters with no glyph and no
    /// `?` fallback contribute nothing.
    pub fn measure(&self, text: &str, size: f32, depth: f32) -> TextExtent {
        let scale = size / self.resolution;
        let mut widest = 0.0f32;
        let mut lines = 0usize;
        for line in text.split('\n') {
            lines += 1;
            let width: f32 = line
                .chars()
                .filter_map(|c| {
                    let glyph = self.glyph(c);
                    if glyph.is_none() {
                        tracing::debug!("no glyph for {c:?} in {}", self.family_name);
                    }
                    glyph
                })
                .map(|g| g.ha * scale)
                .sum();
            widest = widest.max(width);
        }
        TextExtent {
            width: widest,
            height: self.line_height(size) * lines as f32,
            depth,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal typeface with a handful of glyphs, resolution 1000.
    pub(crate) const SAMPLE_TYPEFACE: &str = r#"{
        "familyName": "Sample",
        "resolution": 1000,
        "ascender": 1000,
        "descender": -200,
        "underlineThickness": 50,
        "boundingBox": { "xMin": 0, "xMax": 900, "yMin": -200, "yMax": 950 },
        "glyphs": {
            "H": { "ha": 800, "x_min": 80, "x_max": 720, "o": "m 80 0 l 80 700 l 720 700 l 720 0" },
            "i": { "ha": 300, "x_min": 60, "x_max": 240, "o": "m 60 0 l 60 500 l 240 500 l 240 0" },
            " ": { "ha": 250 },
            "?": { "ha": 500, "x_min": 50, "x_max": 450, "o": "" }
        }
    }"#;

    fn sample() -> FontAsset {
        FontAsset::from_json("sample.json", SAMPLE_TYPEFACE).unwrap()
    }

    #[test]
    fn parses_metrics_and_glyphs() {
        let font = sample();
        assert_eq!(font.family_name, "Sample");
        assert_eq!(font.resolution, 1000.0);
        assert_eq!(font.glyphs.len(), 4);
        assert_eq!(font.glyph('H').unwrap().ha, 800.0);
        assert!(font.glyph(' ').unwrap().o.is_empty());
    }

    #[test]
    fn unknown_char_falls_back_to_question_mark() {
        let font = sample();
        assert_eq!(font.glyph('Z').unwrap().ha, 500.0);
    }

    #[test]
    fn measure_single_line() {
        let font = sample();
        // (800 + 300) * 0.5 / 1000
        let extent = font.measure("Hi", 0.5, 0.2);
        assert!((extent.width - 0.55).abs() < 1e-6);
        // (950 + 200 + 50) * 0.5 / 1000
        assert!((extent.height - 0.6).abs() < 1e-6);
        assert_eq!(extent.depth, 0.2);
    }

    #[test]
    fn measure_takes_widest_line() {
        let font = sample();
        let extent = font.measure("H\nHi i", 1.0, 0.0);
        // second line: 800 + 300 + 250 + 300
        assert!((extent.width - 1.65).abs() < 1e-6);
        assert!((extent.height - 2.4).abs() < 1e-6);
    }

    #[test]
    fn rejects_zero_resolution() {
        let json = SAMPLE_TYPEFACE.replace("\"resolution\": 1000", "\"resolution\": 0");
        let err = FontAsset::from_json("bad.json", &json).unwrap_err();
        assert!(matches!(err, AssetError::Invalid { .. }));
    }

    #[test]
    fn rejects_missing_glyphs() {
        let json = r#"{
            "familyName": "Empty",
            "resolution": 1000,
            "boundingBox": { "xMin": 0, "xMax": 1, "yMin": 0, "yMax": 1 },
            "glyphs": {}
        }"#;
        let err = FontAsset::from_json("empty.json", json).unwrap_err();
        assert!(err.to_string().contains("no glyphs"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = FontAsset::from_json("broken.json", "{ not json").unwrap_err();
        assert!(matches!(err, AssetError::Parse { .. }));
        assert_eq!(err.path(), Path::new("broken.json"));
    }

    #[test]
    fn load_from_disk() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), SAMPLE_TYPEFACE).unwrap();
        let font = FontAsset::load(tmp.path()).unwrap();
        assert_eq!(font.family_name, "Sample");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = FontAsset::load("/definitely/not/here.typeface.json").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
