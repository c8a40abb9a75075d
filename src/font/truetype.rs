//! # TrueType Font Model
//!
//! A parsed font together with the bookkeeping PDF embedding needs.
//!
//! All tables are read once, eagerly, in dependency order:
//!
//! ```text
//! directory → head → hhea → hmtx → cmap → loca/glyf → kern (optional)
//! ```
//!
//! After construction the model is read-only apart from the set of used
//! character codes, which drives the `/Widths` array written for the font.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use super::cmap::{parse_cmap, CmapSource};
use super::directory::TableDirectory;
use super::glyph::{Glyph, GlyphTable};
use super::kern::{kerning_key, parse_kern};
use super::loca::locate_glyphs;
use super::metrics::{parse_head, parse_hhea, parse_hmtx, LocaFormat};
use super::{FontSource, UsedCharacters};
use crate::config::FontOptions;
use crate::error::Result;

/// Tables every font must carry, checked before anything is parsed.
const REQUIRED_TABLES: [&[u8; 4]; 6] = [b"head", b"hhea", b"hmtx", b"cmap", b"glyf", b"loca"];

#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    name: String,
    file_name: Option<String>,
    data: Vec<u8>,
    sfnt_version: u32,
    bbox: [i16; 4],
    ascent: i16,
    descent: i16,
    units_per_em: u16,
    loca_format: LocaFormat,
    glyphs: GlyphTable,
    char_to_glyph: HashMap<u32, u16>,
    cmap_source: Option<CmapSource>,
    kerning: HashMap<u32, i32>,
    used: UsedCharacters,
    options: FontOptions,
}

/// Serializable overview of a loaded font.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSummary {
    pub name: String,
    pub file_name: Option<String>,
    pub units_per_em: u16,
    pub bbox: [i16; 4],
    pub ascent: i16,
    pub descent: i16,
    pub glyph_count: usize,
    pub mapped_codes: usize,
    pub kerning_pairs: usize,
    pub cmap: Option<String>,
    pub first_char: Option<u32>,
    pub last_char: Option<u32>,
}

impl TrueTypeFont {
    /// Load a font file. The display name is the file stem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_options(path, FontOptions::default())
    }

    pub fn from_file_with_options(path: impl AsRef<Path>, options: FontOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("CustomFont");
        let mut font = Self::from_bytes_with_options(data, stem, options)?;
        font.file_name = Some(path.display().to_string());
        Ok(font)
    }

    pub fn from_bytes(data: Vec<u8>, name: &str) -> Result<Self> {
        Self::from_bytes_with_options(data, name, FontOptions::default())
    }

    /// Parse `data`, taking ownership of it. `options.font_name` wins over `name`.
    pub fn from_bytes_with_options(data: Vec<u8>, name: &str, options: FontOptions) -> Result<Self> {
        let directory = TableDirectory::parse(&data)?;
        for tag in REQUIRED_TABLES {
            directory.require(tag)?;
        }

        let head = parse_head(&data, directory.require(b"head")?)?;
        let hhea = parse_hhea(&data, directory.require(b"hhea")?)?;
        let mut glyphs = parse_hmtx(&data, directory.require(b"hmtx")?, &hhea, &head)?;
        let cmap = parse_cmap(&data, directory.require(b"cmap")?, &mut glyphs)?;
        locate_glyphs(
            &data,
            directory.require(b"glyf")?,
            directory.require(b"loca")?,
            head.loca_format,
            &mut glyphs,
        )?;
        let kerning = match directory.get(b"kern") {
            Some(table) => parse_kern(&data, table, &glyphs, head.units_per_em)?,
            None => HashMap::new(),
        };

        let name = options.font_name.clone().unwrap_or_else(|| name.to_string());
        log::info!(
            "loaded font '{}': {} glyphs, {} mapped codes, {} kerning pairs",
            name,
            glyphs.len(),
            cmap.mapping.len(),
            kerning.len()
        );

        Ok(Self {
            name,
            file_name: None,
            sfnt_version: directory.sfnt_version,
            bbox: head.bbox,
            ascent: hhea.ascender,
            descent: hhea.descender,
            units_per_em: head.units_per_em,
            loca_format: head.loca_format,
            glyphs,
            char_to_glyph: cmap.mapping,
            cmap_source: cmap.source,
            kerning,
            used: UsedCharacters::default(),
            options,
            data,
        })
    }

    // ── Identity ────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// The raw font bytes, exactly as loaded.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn options(&self) -> &FontOptions {
        &self.options
    }

    // ── Metrics ─────────────────────────────────────────────────

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// `[xMin, yMin, xMax, yMax]` in font units.
    pub fn bbox(&self) -> [i16; 4] {
        self.bbox
    }

    /// hhea ascender in font units.
    pub fn ascender(&self) -> i16 {
        self.ascent
    }

    /// hhea descender in font units, usually negative.
    pub fn descender(&self) -> i16 {
        self.descent
    }

    pub fn loca_format(&self) -> LocaFormat {
        self.loca_format
    }

    pub fn default_width(&self) -> u32 {
        self.options.default_width
    }

    // ── Glyphs ──────────────────────────────────────────────────

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph(&self, gid: u16) -> Option<&Glyph> {
        self.glyphs.get(gid as usize)
    }

    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    /// Outline bytes of `gid` inside the font buffer. Empty for glyphs
    /// without contours.
    pub fn glyph_data(&self, gid: u16) -> Option<&[u8]> {
        let pos = self.glyph(gid)?.file_position?;
        self.data.get(pos.offset..pos.offset + pos.length)
    }

    pub fn char_to_glyph(&self) -> &HashMap<u32, u16> {
        &self.char_to_glyph
    }

    /// Platform, encoding and format of the cmap subtable that was used.
    pub fn cmap_source(&self) -> Option<CmapSource> {
        self.cmap_source
    }

    pub fn glyph_for_code(&self, code: u32) -> Option<u16> {
        self.char_to_glyph.get(&code).copied()
    }

    /// Normalized advance width of the glyph `code` maps to.
    pub fn code_width(&self, code: u32) -> Option<u32> {
        let gid = self.glyph_for_code(code)?;
        self.glyph(gid).map(|g| g.width)
    }

    // ── Kerning ─────────────────────────────────────────────────

    /// Adjustment between two character codes on the 1000-unit em.
    pub fn kerning_for_codes(&self, left: u32, right: u32) -> i32 {
        kerning_key(left, right)
            .and_then(|key| self.kerning.get(&key).copied())
            .unwrap_or(0)
    }

    pub fn kerning_pairs(&self) -> usize {
        self.kerning.len()
    }

    // ── Used characters ─────────────────────────────────────────

    pub fn mark_code_used(&mut self, code: u32) {
        self.used.mark(code);
    }

    pub fn is_used(&self, code: u32) -> bool {
        self.used.contains(code)
    }

    pub fn first_used(&self) -> Option<u32> {
        self.used.first()
    }

    pub fn last_used(&self) -> Option<u32> {
        self.used.last()
    }

    /// Widths for every code from the first to the last used one.
    ///
    /// Unused codes get 0, used codes the font does not map get the
    /// default width. Empty when nothing has been used.
    pub fn used_widths(&self) -> Vec<u32> {
        let Some((first, last)) = self.used.range() else {
            return Vec::new();
        };
        (first..=last)
            .map(|code| {
                if !self.used.contains(code) {
                    0
                } else {
                    self.code_width(code).unwrap_or(self.options.default_width)
                }
            })
            .collect()
    }

    pub fn summary(&self) -> FontSummary {
        FontSummary {
            name: self.name.clone(),
            file_name: self.file_name.clone(),
            units_per_em: self.units_per_em,
            bbox: self.bbox,
            ascent: self.ascent,
            descent: self.descent,
            glyph_count: self.glyphs.len(),
            mapped_codes: self.char_to_glyph.len(),
            kerning_pairs: self.kerning.len(),
            cmap: self.cmap_source.map(|s| {
                format!("({},{}) format {}", s.platform_id, s.encoding_id, s.format)
            }),
            first_char: self.used.first(),
            last_char: self.used.last(),
        }
    }
}

impl FontSource for TrueTypeFont {
    fn base_font_name(&self) -> &str {
        &self.name
    }

    fn glyph_id(&self, ch: char) -> Option<u16> {
        self.glyph_for_code(ch as u32)
    }

    fn char_width(&self, ch: char) -> Option<u32> {
        self.code_width(ch as u32)
    }

    fn kerning(&self, left: char, right: char) -> i32 {
        self.kerning_for_codes(left as u32, right as u32)
    }

    fn ascent(&self, size: f64) -> f64 {
        self.ascent as f64 * size / self.units_per_em as f64
    }

    fn descent(&self, size: f64) -> f64 {
        self.descent as f64 * size / self.units_per_em as f64
    }

    fn mark_used(&mut self, text: &str) {
        self.used.mark_str(text);
    }

    fn used(&self) -> &UsedCharacters {
        &self.used
    }

    fn is_embedded(&self) -> bool {
        true
    }

    fn font_dictionary(&self, descriptor_id: usize) -> String {
        crate::pdf::truetype_font_dictionary(self, descriptor_id)
    }
}
