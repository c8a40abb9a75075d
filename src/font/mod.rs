//! # Font Management
//!
//! Loading and measuring fonts for PDF embedding.
//!
//! TrueType/OpenType files are parsed from scratch into a [`TrueTypeFont`]:
//! table directory, metrics, character map and glyph locations, all eagerly
//! at load time. The standard PDF text fonts need no file and are served
//! from built-in width tables. Both sit behind [`FontSource`], which is all
//! layout and PDF serialization need to know about a font.

pub mod cmap;
pub mod cursor;
pub mod directory;
pub mod glyph;
pub mod kern;
pub mod loca;
pub mod metrics;
pub mod standard;
pub mod truetype;
pub mod writer;

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

pub use standard::StandardFont;
pub use truetype::TrueTypeFont;

use crate::config::FontManifest;
use crate::error::Result;

/// What document composition needs from a font, embedded or not.
pub trait FontSource {
    /// Name written as `/BaseFont`.
    fn base_font_name(&self) -> &str;

    fn glyph_id(&self, ch: char) -> Option<u16>;

    /// Advance width on the 1000-unit em; `None` if the font has no glyph.
    fn char_width(&self, ch: char) -> Option<u32>;

    /// Pair adjustment on the 1000-unit em.
    fn kerning(&self, _left: char, _right: char) -> i32 {
        0
    }

    fn ascent(&self, size: f64) -> f64;

    fn descent(&self, size: f64) -> f64;

    /// Width of `text` in points. Unmapped characters count as zero.
    fn measure(&self, text: &str, size: f64) -> f64 {
        let mut total: i64 = 0;
        let mut previous: Option<char> = None;
        for ch in text.chars() {
            total += self.char_width(ch).unwrap_or(0) as i64;
            if let Some(prev) = previous {
                total += self.kerning(prev, ch) as i64;
            }
            previous = Some(ch);
        }
        total as f64 * size / 1000.0
    }

    /// Record that `text` will be shown in this font.
    fn mark_used(&mut self, text: &str);

    fn used(&self) -> &UsedCharacters;

    fn is_embedded(&self) -> bool;

    /// The `/Type /Font` dictionary. `descriptor_id` is ignored by fonts
    /// that have no descriptor.
    fn font_dictionary(&self, descriptor_id: usize) -> String;
}

/// Character codes requested for output, with running first/last bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedCharacters {
    codes: BTreeSet<u32>,
}

impl UsedCharacters {
    pub fn mark(&mut self, code: u32) {
        self.codes.insert(code);
    }

    pub fn mark_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.mark(ch as u32);
        }
    }

    pub fn contains(&self, code: u32) -> bool {
        self.codes.contains(&code)
    }

    pub fn first(&self) -> Option<u32> {
        self.codes.first().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.codes.last().copied()
    }

    /// `(first, last)`, or `None` before anything was marked.
    pub fn range(&self) -> Option<(u32, u32)> {
        Some((self.first()?, self.last()?))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Used codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.codes.iter().copied()
    }
}

/// A standard font with its own used-character tracking.
#[derive(Debug, Clone)]
pub struct Base14Font {
    pub font: StandardFont,
    used: UsedCharacters,
}

impl Base14Font {
    pub fn new(font: StandardFont) -> Self {
        Self {
            font,
            used: UsedCharacters::default(),
        }
    }
}

impl FontSource for Base14Font {
    fn base_font_name(&self) -> &str {
        self.font.pdf_name()
    }

    fn glyph_id(&self, ch: char) -> Option<u16> {
        // WinAnsi code doubles as the glyph selector
        self.char_width(ch).map(|_| ch as u16)
    }

    fn char_width(&self, ch: char) -> Option<u32> {
        self.font.metrics().char_width(ch)
    }

    fn ascent(&self, size: f64) -> f64 {
        self.font.metrics().ascent as f64 * size / 1000.0
    }

    fn descent(&self, size: f64) -> f64 {
        self.font.metrics().descent as f64 * size / 1000.0
    }

    fn mark_used(&mut self, text: &str) {
        self.used.mark_str(text);
    }

    fn used(&self) -> &UsedCharacters {
        &self.used
    }

    fn is_embedded(&self) -> bool {
        false
    }

    fn font_dictionary(&self, _descriptor_id: usize) -> String {
        crate::pdf::standard_font_dictionary(self.font)
    }
}

// ─── Registry ───────────────────────────────────────────────────

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

impl FontKey {
    pub fn new(family: &str, weight: u32, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            weight,
            italic,
        }
    }
}

#[derive(Debug)]
pub enum FontData {
    /// One of the standard PDF fonts. No embedding needed.
    Standard(Base14Font),
    /// A TrueType/OpenType font that needs to be embedded.
    Embedded(Box<TrueTypeFont>),
}

impl FontData {
    pub fn source(&self) -> &dyn FontSource {
        match self {
            FontData::Standard(f) => f,
            FontData::Embedded(f) => f.as_ref(),
        }
    }

    pub fn source_mut(&mut self) -> &mut dyn FontSource {
        match self {
            FontData::Standard(f) => f,
            FontData::Embedded(f) => f.as_mut(),
        }
    }
}

/// Maps font family + weight + style to font data.
#[derive(Debug)]
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    /// A registry holding the standard fonts.
    pub fn new() -> Self {
        let mut fonts = HashMap::new();
        for font in StandardFont::ALL {
            let (family, weight, italic) = font.key();
            fonts.insert(
                FontKey::new(family, weight, italic),
                FontData::Standard(Base14Font::new(font)),
            );
        }
        Self { fonts }
    }

    /// Standard fonts plus every entry of `manifest`. Relative paths are
    /// resolved against `base_dir`.
    pub fn from_manifest(manifest: &FontManifest, base_dir: &Path) -> Result<Self> {
        let mut registry = Self::new();
        for entry in &manifest.fonts {
            let data = entry.read_bytes(base_dir)?;
            let font = TrueTypeFont::from_bytes_with_options(
                data,
                &entry.display_name(),
                entry.options.clone(),
            )?;
            log::debug!(
                "registered '{}' ({}, {}, italic={})",
                font.name(),
                entry.family,
                entry.weight,
                entry.italic
            );
            registry.register(&entry.family, entry.weight, entry.italic, font);
        }
        Ok(registry)
    }

    /// Register a parsed font, replacing whatever held the same key.
    pub fn register(&mut self, family: &str, weight: u32, italic: bool, font: TrueTypeFont) {
        self.fonts.insert(
            FontKey::new(family, weight, italic),
            FontData::Embedded(Box::new(font)),
        );
    }

    /// Look up a font, falling back to Helvetica if not found.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        let key = self.resolve_key(family, weight, italic);
        &self.fonts[&key]
    }

    pub fn resolve_mut(&mut self, family: &str, weight: u32, italic: bool) -> &mut FontData {
        let key = self.resolve_key(family, weight, italic);
        self.fonts
            .get_mut(&key)
            .unwrap_or_else(|| unreachable!("resolve_key only returns registered keys"))
    }

    fn resolve_key(&self, family: &str, weight: u32, italic: bool) -> FontKey {
        let key = FontKey::new(family, weight, italic);
        if self.fonts.contains_key(&key) {
            return key;
        }

        // Try with normalized weight (snap to 400 or 700)
        let snapped_weight = if weight >= 600 { 700 } else { 400 };
        let key = FontKey::new(family, snapped_weight, italic);
        if self.fonts.contains_key(&key) {
            return key;
        }

        let key = FontKey::new("Helvetica", snapped_weight, italic);
        if self.fonts.contains_key(&key) {
            return key;
        }
        FontKey::new("Helvetica", 400, false)
    }

    /// Iterate over all registered fonts.
    pub fn iter(&self) -> impl Iterator<Item = (&FontKey, &FontData)> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_characters_bounds() {
        let mut used = UsedCharacters::default();
        assert_eq!(used.range(), None);
        used.mark_str("CAB");
        assert_eq!(used.range(), Some((65, 67)));
        used.mark_str("B");
        assert_eq!(used.range(), Some((65, 67)));
        assert_eq!(used.len(), 3);
        assert_eq!(used.iter().collect::<Vec<_>>(), vec![65, 66, 67]);
    }

    #[test]
    fn test_registry_helvetica() {
        let registry = FontRegistry::new();
        let w = registry.resolve("Helvetica", 400, false).source().measure(" ", 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_registry_bold_wider() {
        let registry = FontRegistry::new();
        let regular = registry.resolve("Helvetica", 400, false).source().measure("A", 12.0);
        let bold = registry.resolve("Helvetica", 700, false).source().measure("Ab", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_registry_fallback() {
        let registry = FontRegistry::new();
        let a = registry.resolve("Helvetica", 400, false).source().measure("A", 12.0);
        let b = registry.resolve("UnknownFont", 400, false).source().measure("A", 12.0);
        assert!((a - b).abs() < 0.001);
    }

    #[test]
    fn test_registry_weight_resolution() {
        let registry = FontRegistry::new();
        let key = registry.resolve_key("Times", 800, false);
        assert_eq!(key, FontKey::new("Times", 700, false));
        assert_eq!(
            registry.resolve("Times", 800, true).source().base_font_name(),
            "Times-BoldItalic"
        );
    }

    #[test]
    fn test_standard_font_marks_used() {
        let mut registry = FontRegistry::new();
        registry.resolve_mut("Courier", 400, false).source_mut().mark_used("zz");
        let font = registry.resolve("Courier", 400, false).source();
        assert_eq!(font.used().range(), Some((122, 122)));
        assert!(!font.is_embedded());
        assert_eq!(font.measure("abc", 10.0), 18.0);
    }
}
