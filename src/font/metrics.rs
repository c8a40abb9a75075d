//! # Global and Horizontal Metrics
//!
//! `head`, `hhea` and `hmtx`, parsed in that order. `hmtx` needs the metric
//! count from `hhea` and the em size from `head`.

use super::cursor::Cursor;
use super::directory::TableRecord;
use super::glyph::{Glyph, GlyphTable};
use crate::error::{FontError, Result};

const HEAD_MAGIC: u32 = 0x5F0F_3CF5;

/// Width of one `loca` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaFormat {
    /// Offset16, stored halved.
    Short,
    /// Offset32.
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadTable {
    pub units_per_em: u16,
    /// xMin, yMin, xMax, yMax in font units.
    pub bbox: [i16; 4],
    pub loca_format: LocaFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HheaTable {
    pub ascender: i16,
    pub descender: i16,
    pub number_of_h_metrics: u16,
}

pub fn parse_head(data: &[u8], table: TableRecord) -> Result<HeadTable> {
    let mut c = Cursor::at(data, table.offset)?;

    let major = c.read_u16()?;
    let minor = c.read_u16()?;
    if major != 1 || minor != 0 {
        return Err(FontError::UnsupportedFormat {
            what: "head version",
            value: (major as u32) << 16 | minor as u32,
        });
    }

    c.skip(8)?; // fontRevision, checkSumAdjustment

    let magic = c.read_u32()?;
    if magic != HEAD_MAGIC {
        return Err(FontError::UnsupportedFormat {
            what: "head magic number",
            value: magic,
        });
    }

    c.skip(2)?; // flags
    let units_per_em = c.read_u16()?;
    if !(16..=16384).contains(&units_per_em) {
        return Err(FontError::MalformedFont(format!(
            "unitsPerEm {} outside 16..=16384",
            units_per_em
        )));
    }

    c.skip(16)?; // created, modified
    let bbox = [c.read_i16()?, c.read_i16()?, c.read_i16()?, c.read_i16()?];
    c.skip(6)?; // macStyle, lowestRecPPEM, fontDirectionHint

    let loca_format = match c.read_i16()? {
        0 => LocaFormat::Short,
        1 => LocaFormat::Long,
        other => {
            return Err(FontError::MalformedFont(format!(
                "indexToLocFormat must be 0 or 1, found {}",
                other
            )))
        }
    };

    Ok(HeadTable {
        units_per_em,
        bbox,
        loca_format,
    })
}

pub fn parse_hhea(data: &[u8], table: TableRecord) -> Result<HheaTable> {
    let mut c = Cursor::at(data, table.offset)?;

    let major = c.read_u16()?;
    let minor = c.read_u16()?;
    if major != 1 || minor != 0 {
        return Err(FontError::UnsupportedFormat {
            what: "hhea version",
            value: (major as u32) << 16 | minor as u32,
        });
    }

    let ascender = c.read_i16()?;
    let descender = c.read_i16()?;
    // lineGap, advanceWidthMax, min/max bearings, caret fields,
    // four reserved words, metricDataFormat
    c.skip(26)?;
    let number_of_h_metrics = c.read_u16()?;

    Ok(HheaTable {
        ascender,
        descender,
        number_of_h_metrics,
    })
}

/// Read the long horizontal metrics into a fresh glyph table.
pub fn parse_hmtx(
    data: &[u8],
    table: TableRecord,
    hhea: &HheaTable,
    head: &HeadTable,
) -> Result<GlyphTable> {
    let mut c = Cursor::at(data, table.offset)?;
    let count = hhea.number_of_h_metrics as usize;

    let mut glyphs = Vec::with_capacity(count);
    for _ in 0..count {
        let advance = c.read_u16()?;
        let lsb = c.read_i16()?;
        glyphs.push(Glyph {
            width: scale_advance(advance, head.units_per_em),
            left_side_bearing: lsb,
            ..Glyph::default()
        });
    }

    Ok(GlyphTable::from_glyphs(glyphs))
}

/// `advance * 1000 / unitsPerEm`, truncated.
pub fn scale_advance(advance: u16, units_per_em: u16) -> u32 {
    advance as u32 * 1000 / units_per_em as u32
}

/// A signed font-unit value on the 1000-unit em, truncated toward zero.
pub fn scale_to_thousand(value: i16, units_per_em: u16) -> i32 {
    value as i32 * 1000 / units_per_em as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::directory::TableDirectory;
    use crate::font::writer::{build_head, build_hhea, build_hmtx, FontWriter};

    fn font(head: Vec<u8>, hhea: Vec<u8>, hmtx: Vec<u8>) -> Vec<u8> {
        let mut w = FontWriter::new();
        w.add_table(b"head", head);
        w.add_table(b"hhea", hhea);
        w.add_table(b"hmtx", hmtx);
        w.finish()
    }

    #[test]
    fn test_head_fields() {
        let data = font(
            build_head(2048, [-100, -300, 1900, 1800], 1),
            build_hhea(1600, -400, 0),
            vec![],
        );
        let dir = TableDirectory::parse(&data).unwrap();
        let head = parse_head(&data, dir.require(b"head").unwrap()).unwrap();
        assert_eq!(head.units_per_em, 2048);
        assert_eq!(head.bbox, [-100, -300, 1900, 1800]);
        assert_eq!(head.loca_format, LocaFormat::Long);

        let hhea = parse_hhea(&data, dir.require(b"hhea").unwrap()).unwrap();
        assert_eq!((hhea.ascender, hhea.descender), (1600, -400));
    }

    #[test]
    fn test_head_bad_magic() {
        let mut head = build_head(1000, [0; 4], 0);
        head[12] = 0;
        let data = font(head, build_hhea(0, 0, 0), vec![]);
        let dir = TableDirectory::parse(&data).unwrap();
        assert!(matches!(
            parse_head(&data, dir.require(b"head").unwrap()),
            Err(FontError::UnsupportedFormat { what: "head magic number", .. })
        ));
    }

    #[test]
    fn test_head_bad_version() {
        let mut head = build_head(1000, [0; 4], 0);
        head[1] = 2;
        let data = font(head, build_hhea(0, 0, 0), vec![]);
        let dir = TableDirectory::parse(&data).unwrap();
        match parse_head(&data, dir.require(b"head").unwrap()) {
            Err(FontError::UnsupportedFormat { value, .. }) => assert_eq!(value, 0x0002_0000),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_units_per_em_rejected() {
        let data = font(build_head(0, [0; 4], 0), build_hhea(0, 0, 0), vec![]);
        let dir = TableDirectory::parse(&data).unwrap();
        assert!(matches!(
            parse_head(&data, dir.require(b"head").unwrap()),
            Err(FontError::MalformedFont(_))
        ));
    }

    #[test]
    fn test_hmtx_widths_are_normalized() {
        let data = font(
            build_head(2048, [0; 4], 0),
            build_hhea(1600, -400, 3),
            build_hmtx(&[(1024, 10), (1229, -5), (0, 0)]),
        );
        let dir = TableDirectory::parse(&data).unwrap();
        let head = parse_head(&data, dir.require(b"head").unwrap()).unwrap();
        let hhea = parse_hhea(&data, dir.require(b"hhea").unwrap()).unwrap();
        let glyphs = parse_hmtx(&data, dir.require(b"hmtx").unwrap(), &hhea, &head).unwrap();

        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs.get(0).unwrap().width, 500);
        // 1229 * 1000 / 2048 = 600.09 → 600
        assert_eq!(glyphs.get(1).unwrap().width, 600);
        assert_eq!(glyphs.get(1).unwrap().left_side_bearing, -5);
        assert!(glyphs.get(1).unwrap().file_position.is_none());
    }

    #[test]
    fn test_hmtx_shorter_than_metric_count_is_truncated() {
        let data = font(
            build_head(1000, [0; 4], 0),
            build_hhea(800, -200, 500),
            build_hmtx(&[(500, 0)]),
        );
        let dir = TableDirectory::parse(&data).unwrap();
        let head = parse_head(&data, dir.require(b"head").unwrap()).unwrap();
        let hhea = parse_hhea(&data, dir.require(b"hhea").unwrap()).unwrap();
        assert!(matches!(
            parse_hmtx(&data, dir.require(b"hmtx").unwrap(), &hhea, &head),
            Err(FontError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_scaling_helpers() {
        assert_eq!(scale_advance(600, 1000), 600);
        assert_eq!(scale_advance(1000, 2048), 488);
        assert_eq!(scale_to_thousand(-410, 2048), -200);
    }
}
