//! # embedfont
//!
//! TrueType/OpenType font loading for PDF embedding.
//!
//! A font binary is parsed once, eagerly, into a model that answers the
//! questions a PDF producer asks while composing text: how wide is this
//! string, how tall is the line, which glyph does this character use.
//! Characters shown in the font are tracked as they are used, so the font
//! dictionary written at the end carries widths for exactly that range.
//!
//! ## Architecture
//!
//! ```text
//! Font bytes (file / manifest)
//!       ↓
//!   [font::directory]  - sfnt header and table records
//!       ↓
//!   [font::metrics]    - head, hhea, hmtx
//!   [font::cmap]       - character code → glyph
//!   [font::loca]       - glyph positions in glyf
//!   [font::kern]       - optional pair kerning
//!       ↓
//!   [font::truetype]   - the font model: measure, mark used
//!       ↓
//!   [pdf]              - Font, FontDescriptor and FontFile2 objects
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod pdf;

use std::path::Path;

pub use config::{FontManifest, FontOptions};
pub use error::{FontError, Result};
pub use font::{FontRegistry, FontSource, StandardFont, TrueTypeFont};

/// Load a font file with default options.
pub fn load_font(path: impl AsRef<Path>) -> Result<TrueTypeFont> {
    TrueTypeFont::from_file(path)
}

/// Build a registry from a manifest file. Relative font paths are resolved
/// against the manifest's directory.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<FontRegistry> {
    let path = path.as_ref();
    let manifest = FontManifest::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    FontRegistry::from_manifest(&manifest, base_dir)
}
