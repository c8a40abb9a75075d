//! Glyph records and the growable glyph arena.

/// Byte range of one glyph's outline data in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePosition {
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glyph {
    /// Advance width on a 1000-unit em.
    pub width: u32,
    /// Left side bearing in font units, as stored in `hmtx`.
    pub left_side_bearing: i16,
    /// Last character code that cmap mapped to this glyph.
    pub unicode: Option<u32>,
    /// Set by the glyf/loca pass; `None` before it runs.
    pub file_position: Option<FilePosition>,
}

/// Glyphs indexed by glyph ID. Only ever grows.
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    glyphs: Vec<Glyph>,
    /// Width given to glyphs created by growth.
    fill_width: u32,
}

impl GlyphTable {
    pub fn from_glyphs(glyphs: Vec<Glyph>) -> Self {
        // Glyphs past the last hmtx record reuse its advance width
        let fill_width = glyphs.last().map(|g| g.width).unwrap_or(0);
        Self { glyphs, fill_width }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, gid: usize) -> Option<&Glyph> {
        self.glyphs.get(gid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter()
    }

    /// Grow so that `len` glyphs exist. Existing glyphs are never touched.
    pub fn ensure_len(&mut self, len: usize) {
        if len > self.glyphs.len() {
            log::debug!("growing glyph table from {} to {} glyphs", self.glyphs.len(), len);
            let fill = Glyph {
                width: self.fill_width,
                ..Glyph::default()
            };
            self.glyphs.resize(len, fill);
        }
    }

    /// Mutable access to `gid`, growing the table first if needed.
    pub fn get_or_grow(&mut self, gid: usize) -> &mut Glyph {
        self.ensure_len(gid + 1);
        &mut self.glyphs[gid]
    }
}
