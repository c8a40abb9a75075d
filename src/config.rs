//! # Configuration
//!
//! Load options for a single font and the JSON font manifest used to
//! register several fonts at once.
//!
//! ```json
//! {
//!   "fonts": [
//!     { "family": "Inter", "src": "./fonts/Inter-Regular.ttf" },
//!     { "family": "Inter", "weight": 700, "src": "data:font/ttf;base64,AAEAAA...",
//!       "options": { "stemV": 120 } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FontError, Result};

/// Descriptor values the font tables themselves do not provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontOptions {
    /// Overrides the name derived from the file name.
    pub font_name: Option<String>,
    /// Width written for used characters that the font does not map.
    pub default_width: u32,
    pub cap_height: i32,
    pub stem_v: i32,
    pub italic_angle: i32,
    /// FontDescriptor `/Flags`. 32 is "nonsymbolic".
    pub flags: u32,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            font_name: None,
            default_width: 1000,
            cap_height: 729,
            stem_v: 80,
            italic_angle: 0,
            flags: 32,
        }
    }
}

impl FontOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// A list of fonts to register.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontManifest {
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
}

/// A custom font to register with the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontEntry {
    /// Font family name (e.g. "Inter", "Roboto").
    pub family: String,
    /// File path, base64-encoded font data, or a data URI
    /// (e.g. "data:font/ttf;base64,...").
    pub src: String,
    /// Font weight (100-900). Defaults to 400.
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub options: FontOptions,
}

fn default_weight() -> u32 {
    400
}

impl FontManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

impl FontEntry {
    /// Resolve `src` to raw font bytes. Relative paths are taken from `base_dir`.
    pub fn read_bytes(&self, base_dir: &Path) -> Result<Vec<u8>> {
        let src = self.src.trim();

        if src.starts_with("data:") {
            let comma_pos = src
                .find(',')
                .ok_or_else(|| FontError::Config("invalid data URI: missing comma".to_string()))?;
            return base64_decode(&src[comma_pos + 1..]);
        }

        // Only explicit path prefixes and font extensions count as paths;
        // base64 data can contain '/' too.
        let lower = src.to_ascii_lowercase();
        if src.starts_with('/')
            || src.starts_with("./")
            || src.starts_with("../")
            || lower.ends_with(".ttf")
            || lower.ends_with(".otf")
        {
            let path = Path::new(src);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            };
            return Ok(std::fs::read(path)?);
        }

        base64_decode(src)
    }

    /// Display name used when the entry carries data rather than a path.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.options.font_name {
            return name.clone();
        }
        let path = Path::new(self.src.trim());
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !self.src.starts_with("data:") && path.extension().is_some() => {
                stem.to_string()
            }
            _ => self.family.clone(),
        }
    }
}

fn base64_decode(input: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    Ok(base64::engine::general_purpose::STANDARD.decode(input.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = FontOptions::from_json("{}").unwrap();
        assert_eq!(options, FontOptions::default());
        assert_eq!(options.default_width, 1000);
        assert_eq!(options.flags, 32);
    }

    #[test]
    fn test_options_camel_case() {
        let options =
            FontOptions::from_json(r#"{ "stemV": 120, "capHeight": 700, "fontName": "Inter-Bold" }"#)
                .unwrap();
        assert_eq!(options.stem_v, 120);
        assert_eq!(options.cap_height, 700);
        assert_eq!(options.font_name.as_deref(), Some("Inter-Bold"));
        assert_eq!(options.italic_angle, 0);
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest =
            FontManifest::from_json(r#"{ "fonts": [{ "family": "Inter", "src": "AAEAAA==" }] }"#)
                .unwrap();
        let entry = &manifest.fonts[0];
        assert_eq!(entry.weight, 400);
        assert!(!entry.italic);
        assert_eq!(entry.read_bytes(Path::new(".")).unwrap(), vec![0, 1, 0, 0]);
    }

    #[test]
    fn test_data_uri() {
        let entry = FontEntry {
            family: "Inter".to_string(),
            src: "data:font/ttf;base64,AAEAAA==".to_string(),
            weight: 400,
            italic: false,
            options: FontOptions::default(),
        };
        assert_eq!(entry.read_bytes(Path::new(".")).unwrap(), vec![0, 1, 0, 0]);
        assert_eq!(entry.display_name(), "Inter");
    }

    #[test]
    fn test_display_name_from_path() {
        let entry = FontEntry {
            family: "Inter".to_string(),
            src: "./fonts/Inter-Regular.ttf".to_string(),
            weight: 400,
            italic: false,
            options: FontOptions::default(),
        };
        assert_eq!(entry.display_name(), "Inter-Regular");
    }

    #[test]
    fn test_bad_base64_is_config_error() {
        let entry = FontEntry {
            family: "Inter".to_string(),
            src: "not base64!".to_string(),
            weight: 400,
            italic: false,
            options: FontOptions::default(),
        };
        assert!(matches!(
            entry.read_bytes(Path::new(".")),
            Err(FontError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            FontManifest::from_json("{ fonts: }"),
            Err(FontError::Config(_))
        ));
    }
}
