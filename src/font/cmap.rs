//! # Character Map
//!
//! Picks the richest encoding record the font offers and decodes its
//! subtable into a code → glyph ID map. Four subtable formats are
//! understood:
//!
//! | Format | Layout                                            |
//! |--------|---------------------------------------------------|
//! | 0      | 256 byte glyph IDs, codes 0-255                   |
//! | 4      | segments with idDelta / idRangeOffset (BMP)       |
//! | 6      | trimmed dense array starting at `firstCode`       |
//! | 12     | sequential groups over the full Unicode range     |
//!
//! A candidate subtable in any other format is skipped; a font with no
//! usable subtable simply has an empty map.

use std::collections::HashMap;

use super::cursor::Cursor;
use super::directory::TableRecord;
use super::glyph::GlyphTable;
use crate::error::{FontError, Result};

/// Encoding records we accept, most preferred first.
const PREFERRED_ENCODINGS: [(u16, u16); 3] = [
    (3, 10), // Windows, Unicode full repertoire
    (3, 1),  // Windows, Unicode BMP
    (1, 0),  // Macintosh, Roman
];

/// Which subtable the mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmapSource {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub format: u16,
}

/// Decoded character map.
#[derive(Debug, Clone, Default)]
pub struct CharacterMap {
    pub mapping: HashMap<u32, u16>,
    pub source: Option<CmapSource>,
}

pub fn parse_cmap(data: &[u8], table: TableRecord, glyphs: &mut GlyphTable) -> Result<CharacterMap> {
    let mut c = Cursor::at(data, table.offset)?;
    c.skip(2)?; // version
    let num_tables = c.read_u16()?;

    let mut records: Vec<(u16, u16, usize)> = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let platform_id = c.read_u16()?;
        let encoding_id = c.read_u16()?;
        let offset = c.read_u32()? as usize;
        records.push((platform_id, encoding_id, offset));
    }

    for (platform_id, encoding_id) in PREFERRED_ENCODINGS {
        let Some(&(_, _, offset)) = records
            .iter()
            .find(|(p, e, _)| *p == platform_id && *e == encoding_id)
        else {
            continue;
        };

        let mut sub = Cursor::at(data, table.offset + offset)?;
        let format = sub.read_u16()?;
        let mut map = CharMapBuilder {
            mapping: HashMap::new(),
            glyphs: &mut *glyphs,
        };

        match format {
            0 => decode_format0(&mut sub, &mut map)?,
            4 => decode_format4(&mut sub, &mut map)?,
            6 => decode_format6(&mut sub, &mut map)?,
            12 => decode_format12(&mut sub, &mut map)?,
            _ => {
                log::debug!(
                    "skipping cmap subtable ({}, {}) in unsupported format {}",
                    platform_id,
                    encoding_id,
                    format
                );
                continue;
            }
        }

        log::debug!(
            "cmap ({}, {}) format {}: {} codes mapped",
            platform_id,
            encoding_id,
            format,
            map.mapping.len()
        );

        return Ok(CharacterMap {
            mapping: map.mapping,
            source: Some(CmapSource {
                platform_id,
                encoding_id,
                format,
            }),
        });
    }

    log::debug!("no usable cmap subtable, glyphs addressable by index only");
    Ok(CharacterMap::default())
}

/// Inserts mappings and keeps the glyph annotations in step.
struct CharMapBuilder<'g> {
    mapping: HashMap<u32, u16>,
    glyphs: &'g mut GlyphTable,
}

impl CharMapBuilder<'_> {
    /// Every code the subtable covers is recorded, .notdef included.
    fn insert(&mut self, code: u32, gid: u16) {
        self.glyphs.get_or_grow(gid as usize).unicode = Some(code);
        self.mapping.insert(code, gid);
    }
}

// ─── Subtable Decoders ──────────────────────────────────────────

fn decode_format0(c: &mut Cursor, map: &mut CharMapBuilder) -> Result<()> {
    c.skip(4)?; // length, language
    for code in 0..256u32 {
        let gid = c.read_u8()?;
        map.insert(code, gid as u16);
    }
    Ok(())
}

fn decode_format4(c: &mut Cursor, map: &mut CharMapBuilder) -> Result<()> {
    let length = c.read_u16()? as usize;
    c.skip(2)?; // language
    let seg_count = (c.read_u16()? >> 1) as usize;
    let search_range = c.read_u16()?;
    c.skip(2)?; // entrySelector
    let range_shift = c.read_u16()?;

    if range_shift as i32 != 2 * seg_count as i32 - search_range as i32 {
        return Err(FontError::MalformedFont(format!(
            "cmap format 4 rangeShift {} does not match segCount {} and searchRange {}",
            range_shift, seg_count, search_range
        )));
    }

    let end_codes = c.read_u16_array(seg_count)?;
    c.skip(2)?; // reservedPad
    let start_codes = c.read_u16_array(seg_count)?;
    let id_deltas = c.read_u16_array(seg_count)?;
    let id_range_offsets = c.read_u16_array(seg_count)?;

    // Whatever the subtable length leaves after the fixed part
    let glyph_id_count = (length / 2).saturating_sub(8 + 4 * seg_count);
    let glyph_id_array = c.read_u16_array(glyph_id_count)?;

    for seg in 0..seg_count {
        let start = start_codes[seg] as u32;
        let end = end_codes[seg] as u32;
        let delta = id_deltas[seg];
        let range_offset = id_range_offsets[seg] as usize;

        for code in start..=end {
            let gid = if range_offset == 0 {
                (code as u16).wrapping_add(delta)
            } else {
                let index = (code - start) as usize + seg + range_offset / 2;
                match index.checked_sub(seg_count).and_then(|i| glyph_id_array.get(i)) {
                    Some(&0) | None => 0,
                    Some(&g) => g.wrapping_add(delta),
                }
            };
            map.insert(code, gid);
        }
    }
    Ok(())
}

fn decode_format6(c: &mut Cursor, map: &mut CharMapBuilder) -> Result<()> {
    c.skip(4)?; // length, language
    let first_code = c.read_u16()? as u32;
    let entry_count = c.read_u16()? as usize;
    let glyph_ids = c.read_u16_array(entry_count)?;

    for (i, gid) in glyph_ids.into_iter().enumerate() {
        map.insert(first_code + i as u32, gid);
    }
    Ok(())
}

fn decode_format12(c: &mut Cursor, map: &mut CharMapBuilder) -> Result<()> {
    c.skip(10)?; // reserved, length, language
    let num_groups = c.read_u32()?;

    for _ in 0..num_groups {
        let start_code = c.read_u32()?;
        let end_code = c.read_u32()?;
        let start_gid = c.read_u32()?;

        if end_code < start_code {
            continue;
        }
        if start_gid as u64 + (end_code - start_code) as u64 > u16::MAX as u64 {
            return Err(FontError::MalformedFont(format!(
                "cmap format 12 group {}..={} maps past glyph ID 65535",
                start_code, end_code
            )));
        }

        for code in start_code..=end_code {
            map.insert(code, (start_gid + (code - start_code)) as u16);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::glyph::Glyph;
    use crate::font::writer::{
        build_cmap, build_cmap_format0, build_cmap_format12, build_cmap_format4,
        build_cmap_format6, CmapSubtable,
    };

    fn parse(cmap: &[u8], glyph_count: usize) -> Result<(CharacterMap, GlyphTable)> {
        let mut glyphs = GlyphTable::from_glyphs(vec![Glyph::default(); glyph_count]);
        let table = TableRecord {
            checksum: 0,
            offset: 0,
            length: cmap.len(),
        };
        let map = parse_cmap(cmap, table, &mut glyphs)?;
        Ok((map, glyphs))
    }

    fn single(platform_id: u16, encoding_id: u16, data: Vec<u8>) -> Vec<u8> {
        build_cmap(&[CmapSubtable {
            platform_id,
            encoding_id,
            data,
        }])
    }

    /// Raw format 4 subtable from `(start, end, idDelta, idRangeOffset)` segments.
    fn format4_raw(segments: &[(u16, u16, i16, u16)], glyph_ids: &[u16]) -> Vec<u8> {
        let seg_count = segments.len() as u16;
        let (search_range, entry_selector, range_shift) =
            crate::font::writer::search_params(seg_count, 2);
        let length = 16 + segments.len() * 8 + glyph_ids.len() * 2;
        let mut d = Vec::new();
        for v in [4, length as u16, 0, seg_count * 2, search_range, entry_selector, range_shift] {
            d.extend_from_slice(&v.to_be_bytes());
        }
        for s in segments {
            d.extend_from_slice(&s.1.to_be_bytes());
        }
        d.extend_from_slice(&0u16.to_be_bytes());
        for s in segments {
            d.extend_from_slice(&s.0.to_be_bytes());
        }
        for s in segments {
            d.extend_from_slice(&s.2.to_be_bytes());
        }
        for s in segments {
            d.extend_from_slice(&s.3.to_be_bytes());
        }
        for g in glyph_ids {
            d.extend_from_slice(&g.to_be_bytes());
        }
        d
    }

    #[test]
    fn test_format0() {
        let mut ids = vec![0u8; 256];
        ids[65] = 1;
        ids[66] = 2;
        let (map, glyphs) = parse(&single(1, 0, build_cmap_format0(&ids)), 3).unwrap();
        assert_eq!(map.mapping.len(), 256);
        assert_eq!(map.mapping[&32], 0);
        assert_eq!(map.mapping[&65], 1);
        assert_eq!(map.mapping[&66], 2);
        assert_eq!(glyphs.get(2).unwrap().unicode, Some(66));
        assert_eq!(
            map.source,
            Some(CmapSource { platform_id: 1, encoding_id: 0, format: 0 })
        );
    }

    #[test]
    fn test_format4_delta_and_range_offset_agree() {
        // Hand-decoded reference: A→3, B→4, C→5
        let reference: Vec<(u32, u16)> = vec![(65, 3), (66, 4), (67, 5)];

        // Pure delta: 65 + (-62) = 3
        let by_delta = format4_raw(&[(65, 67, -62, 0), (0xFFFF, 0xFFFF, 1, 0)], &[]);
        // Range offset: slot 0 points 2 segments ahead, i.e. glyphIdArray[0]
        let by_offset = format4_raw(&[(65, 67, 0, 4), (0xFFFF, 0xFFFF, 1, 0)], &[3, 4, 5]);

        let (a, _) = parse(&single(3, 1, by_delta), 6).unwrap();
        let (b, _) = parse(&single(3, 1, by_offset), 6).unwrap();
        for (code, gid) in reference {
            assert_eq!(a.mapping[&code], gid);
            assert_eq!(b.mapping[&code], gid);
        }
        // The 0xFFFF sentinel maps to .notdef
        assert_eq!(a.mapping.len(), 4);
        assert_eq!(b.mapping.len(), 4);
        assert_eq!(a.mapping[&0xFFFF], 0);
        assert_eq!(b.mapping[&0xFFFF], 0);
    }

    #[test]
    fn test_format4_range_offset_applies_delta() {
        // Second segment: glyphIdArray entry 7, delta 2 → 9
        let sub = format4_raw(
            &[(32, 32, -31, 0), (48, 49, 2, 4), (0xFFFF, 0xFFFF, 1, 0)],
            &[7, 0],
        );
        let (map, _) = parse(&single(3, 1, sub), 12).unwrap();
        assert_eq!(map.mapping[&32], 1);
        assert_eq!(map.mapping[&48], 9);
        // A zero glyphIdArray entry stays .notdef even with a delta
        assert_eq!(map.mapping[&49], 0);
    }

    #[test]
    fn test_format4_delta_wraps_modulo_65536() {
        let code = 0xF000u16;
        let delta = 10u16.wrapping_sub(code) as i16;
        let sub = format4_raw(&[(code, code, delta, 0), (0xFFFF, 0xFFFF, 1, 0)], &[]);
        let (map, _) = parse(&single(3, 1, sub), 11).unwrap();
        assert_eq!(map.mapping[&0xF000], 10);
    }

    #[test]
    fn test_format4_bad_range_shift() {
        let mut sub = format4_raw(&[(65, 67, -62, 0), (0xFFFF, 0xFFFF, 1, 0)], &[]);
        sub[13] ^= 0x02;
        assert!(matches!(
            parse(&single(3, 1, sub), 6),
            Err(FontError::MalformedFont(_))
        ));
    }

    #[test]
    fn test_format4_from_writer() {
        let pairs: Vec<(u16, u16)> = vec![(32, 1), (65, 2), (66, 3), (67, 4), (0x20AC, 5)];
        let (map, glyphs) = parse(&single(3, 1, build_cmap_format4(&pairs)), 6).unwrap();
        for (code, gid) in pairs {
            assert_eq!(map.mapping[&(code as u32)], gid);
        }
        assert_eq!(glyphs.get(5).unwrap().unicode, Some(0x20AC));
    }

    #[test]
    fn test_format6() {
        let (map, _) = parse(&single(1, 0, build_cmap_format6(48, &[10, 0, 12])), 13).unwrap();
        assert_eq!(map.mapping[&48], 10);
        assert_eq!(map.mapping[&49], 0);
        assert_eq!(map.mapping[&50], 12);
    }

    #[test]
    fn test_format12_grows_glyph_table() {
        let sub = build_cmap_format12(&[(0x1F600, 0x1F602, 40), (65, 65, 1)]);
        let (map, glyphs) = parse(&single(3, 10, sub), 2).unwrap();
        assert_eq!(map.mapping[&0x1F601], 41);
        assert_eq!(map.mapping[&65], 1);
        assert_eq!(glyphs.len(), 43);
        assert_eq!(glyphs.get(42).unwrap().unicode, Some(0x1F602));
    }

    #[test]
    fn test_prefers_windows_full_unicode() {
        let mut mac = vec![0u8; 256];
        mac[65] = 7;
        let cmap = build_cmap(&[
            CmapSubtable { platform_id: 1, encoding_id: 0, data: build_cmap_format0(&mac) },
            CmapSubtable { platform_id: 3, encoding_id: 10, data: build_cmap_format12(&[(65, 65, 2)]) },
        ]);
        let (map, _) = parse(&cmap, 8).unwrap();
        assert_eq!(map.mapping[&65], 2);
        assert_eq!(map.source.unwrap().format, 12);
    }

    #[test]
    fn test_unsupported_format_falls_back() {
        // Format 2 (high-byte mapping) under (3, 10) is skipped
        let mut format2 = vec![0u8; 8];
        format2[1] = 2;
        let mut mac = vec![0u8; 256];
        mac[97] = 3;
        let cmap = build_cmap(&[
            CmapSubtable { platform_id: 3, encoding_id: 10, data: format2 },
            CmapSubtable { platform_id: 1, encoding_id: 0, data: build_cmap_format0(&mac) },
        ]);
        let (map, _) = parse(&cmap, 4).unwrap();
        assert_eq!(map.mapping[&97], 3);
        assert_eq!(map.source.unwrap().platform_id, 1);
    }

    #[test]
    fn test_no_usable_subtable_is_empty() {
        let cmap = single(0, 3, build_cmap_format4(&[(65, 1)]));
        let (map, glyphs) = parse(&cmap, 2).unwrap();
        assert!(map.mapping.is_empty());
        assert!(map.source.is_none());
        assert_eq!(glyphs.get(1).unwrap().unicode, None);
    }
}
