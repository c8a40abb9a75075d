//! # Table Directory
//!
//! The sfnt header and its table records. Each record maps a four-byte tag
//! to a byte range of the font buffer. Checksums are kept for diagnostics
//! but never verified.

use std::collections::HashMap;

use super::cursor::Cursor;
use crate::error::{FontError, Result};

/// sfnt version of fonts with TrueType outlines.
pub const SFNT_TRUETYPE: u32 = 0x0001_0000;
/// `OTTO`: OpenType with CFF outlines.
pub const SFNT_OPENTYPE_CFF: u32 = 0x4F54_544F;

/// One table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub checksum: u32,
    pub offset: usize,
    pub length: usize,
}

impl TableRecord {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Tag → record map for one font buffer.
#[derive(Debug, Clone)]
pub struct TableDirectory {
    pub sfnt_version: u32,
    tables: HashMap<[u8; 4], TableRecord>,
}

impl TableDirectory {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        let sfnt_version = cursor.read_u32()?;
        if sfnt_version != SFNT_TRUETYPE && sfnt_version != SFNT_OPENTYPE_CFF {
            return Err(FontError::UnsupportedFormat {
                what: "sfnt version",
                value: sfnt_version,
            });
        }

        let num_tables = cursor.read_u16()?;
        let search_range = cursor.read_u16()?;
        cursor.skip(2)?; // entrySelector
        let range_shift = cursor.read_u16()?;

        if range_shift as u32 != (num_tables as u32 * 16).wrapping_sub(search_range as u32) {
            return Err(FontError::MalformedFont(format!(
                "table directory rangeShift {} does not match numTables {} and searchRange {}",
                range_shift, num_tables, search_range
            )));
        }

        let mut tables = HashMap::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag = cursor.read_tag()?;
            let record = TableRecord {
                checksum: cursor.read_u32()?,
                offset: cursor.read_u32()? as usize,
                length: cursor.read_u32()? as usize,
            };
            if record.offset.checked_add(record.length).map_or(true, |end| end > data.len()) {
                return Err(FontError::TruncatedData {
                    offset: record.offset,
                    needed: record.length,
                    len: data.len(),
                });
            }
            tables.insert(tag, record);
        }

        log::debug!(
            "table directory: version 0x{:08X}, {} tables",
            sfnt_version,
            tables.len()
        );

        Ok(Self { sfnt_version, tables })
    }

    /// Look up a table that must be present.
    pub fn require(&self, tag: &[u8; 4]) -> Result<TableRecord> {
        self.get(tag)
            .ok_or_else(|| FontError::MissingTable(String::from_utf8_lossy(tag).into_owned()))
    }

    pub fn get(&self, tag: &[u8; 4]) -> Option<TableRecord> {
        self.tables.get(tag).copied()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table tags in file order of their data.
    pub fn tags(&self) -> Vec<String> {
        let mut entries: Vec<(&[u8; 4], &TableRecord)> = self.tables.iter().collect();
        entries.sort_by_key(|(_, r)| r.offset);
        entries
            .into_iter()
            .map(|(tag, _)| String::from_utf8_lossy(tag).into_owned())
            .collect()
    }
}
