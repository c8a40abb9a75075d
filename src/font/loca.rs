//! # Glyph Locations
//!
//! Resolves each glyph's byte range inside `glyf` from the `loca` offsets.
//! `loca` carries one entry more than there are glyphs so that the last
//! glyph's length can be computed by subtraction.

use super::cursor::Cursor;
use super::directory::TableRecord;
use super::glyph::{FilePosition, GlyphTable};
use super::metrics::LocaFormat;
use crate::error::{FontError, Result};

/// Size of the per-glyph header: numberOfContours plus the bbox quad.
const GLYPH_HEADER_LEN: usize = 10;

pub fn parse_loca(data: &[u8], loca: TableRecord, format: LocaFormat) -> Result<Vec<usize>> {
    let mut c = Cursor::at(data, loca.offset)?;
    let offsets = match format {
        LocaFormat::Short => {
            let count = loca.length / 2;
            c.read_u16_array(count)?
                .into_iter()
                .map(|v| v as usize * 2)
                .collect()
        }
        LocaFormat::Long => {
            let count = loca.length / 4;
            let mut offsets = Vec::with_capacity(count);
            for _ in 0..count {
                offsets.push(c.read_u32()? as usize);
            }
            offsets
        }
    };
    Ok(offsets)
}

/// Record the file position of every glyph `loca` describes.
pub fn locate_glyphs(
    data: &[u8],
    glyf: TableRecord,
    loca: TableRecord,
    format: LocaFormat,
    glyphs: &mut GlyphTable,
) -> Result<()> {
    let offsets = parse_loca(data, loca, format)?;
    if offsets.len() < 2 {
        return Ok(());
    }

    let glyph_count = offsets.len() - 1;
    glyphs.ensure_len(glyph_count);

    for (gid, pair) in offsets.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        if end < start {
            return Err(FontError::MalformedFont(format!(
                "loca offsets decrease at glyph {} ({} > {})",
                gid, start, end
            )));
        }
        let offset = glyf.offset + start;
        let length = end - start;

        if length > 0 {
            if end > glyf.length {
                return Err(FontError::TruncatedData {
                    offset,
                    needed: length,
                    len: glyf.length,
                });
            }
            // numberOfContours and the bbox quad are not needed here
            let mut c = Cursor::at(data, offset)?;
            c.skip(GLYPH_HEADER_LEN.min(length))?;
        }

        glyphs.get_or_grow(gid).file_position = Some(FilePosition { offset, length });
    }

    log::debug!("located {} glyphs in glyf", glyph_count);
    Ok(())
}
