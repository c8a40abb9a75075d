//! Optional `kern` table (Microsoft version 0, format 0 subtables).
//!
//! Pairs are stored by glyph in the font but looked up by character code
//! during measurement, so each glyph pair is translated through the cmap
//! annotations on the glyphs. Only BMP codes fit the packed key.

use std::collections::HashMap;

use super::cursor::Cursor;
use super::directory::TableRecord;
use super::glyph::GlyphTable;
use super::metrics::scale_to_thousand;
use crate::error::Result;

const COVERAGE_HORIZONTAL: u16 = 0x0001;
const COVERAGE_MINIMUM: u16 = 0x0002;
const COVERAGE_CROSS_STREAM: u16 = 0x0004;

/// Composite key for an ordered pair of BMP character codes.
pub fn kerning_key(left: u32, right: u32) -> Option<u32> {
    if left > 0xFFFF || right > 0xFFFF {
        return None;
    }
    Some((left << 16) | right)
}

pub fn parse_kern(
    data: &[u8],
    table: TableRecord,
    glyphs: &GlyphTable,
    units_per_em: u16,
) -> Result<HashMap<u32, i32>> {
    let mut kerning = HashMap::new();
    let mut c = Cursor::at(data, table.offset)?;

    let version = c.read_u16()?;
    if version != 0 {
        // Apple's 32-bit header variant
        log::debug!("skipping kern table version {}", version);
        return Ok(kerning);
    }
    let n_tables = c.read_u16()?;

    for _ in 0..n_tables {
        let sub_start = c.position();
        c.skip(2)?; // subtable version
        let length = c.read_u16()? as usize;
        let coverage = c.read_u16()?;
        let format = coverage >> 8;

        let usable = coverage & COVERAGE_HORIZONTAL != 0
            && coverage & (COVERAGE_MINIMUM | COVERAGE_CROSS_STREAM) == 0;
        if format != 0 || !usable {
            log::debug!("skipping kern subtable format {} coverage 0x{:04X}", format, coverage);
            c.seek(sub_start + length)?;
            continue;
        }

        let n_pairs = c.read_u16()?;
        c.skip(6)?; // searchRange, entrySelector, rangeShift
        for _ in 0..n_pairs {
            let left = c.read_u16()?;
            let right = c.read_u16()?;
            let value = c.read_i16()?;

            let code_of = |gid: u16| glyphs.get(gid as usize).and_then(|g| g.unicode);
            let (Some(l), Some(r)) = (code_of(left), code_of(right)) else {
                continue;
            };
            if let Some(key) = kerning_key(l, r) {
                kerning.insert(key, scale_to_thousand(value, units_per_em));
            }
        }
        c.seek(sub_start + length)?;
    }

    log::debug!("kern: {} character pairs", kerning.len());
    Ok(kerning)
}
