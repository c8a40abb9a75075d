//! # TrueType File Writer
//!
//! Assembles tables into a valid sfnt binary: sorted table directory, 4-byte
//! table alignment, per-table checksums, and the `head.checkSumAdjustment`
//! fix-up. The table builders below emit the subset of tables the loader
//! reads, which makes in-process fixtures possible without shipping binary
//! font files.

use super::directory::SFNT_TRUETYPE;

/// Collects tables and serializes them into a single font file.
#[derive(Debug, Clone)]
pub struct FontWriter {
    sfnt_version: u32,
    tables: Vec<(u32, Vec<u8>)>,
}

/// One cmap encoding record plus its subtable bytes.
#[derive(Debug, Clone)]
pub struct CmapSubtable {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub data: Vec<u8>,
}

impl Default for FontWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FontWriter {
    pub fn new() -> Self {
        Self {
            sfnt_version: SFNT_TRUETYPE,
            tables: Vec::new(),
        }
    }

    /// Use a different sfnt version tag (e.g. `OTTO`).
    pub fn with_version(mut self, sfnt_version: u32) -> Self {
        self.sfnt_version = sfnt_version;
        self
    }

    /// Add or replace a table.
    pub fn add_table(&mut self, tag: &[u8; 4], data: Vec<u8>) -> &mut Self {
        let tag = tag_u32(tag);
        self.tables.retain(|(t, _)| *t != tag);
        self.tables.push((tag, data));
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        // Sort tables by tag; readers binary-search the directory
        self.tables.sort_by_key(|(tag, _)| *tag);
        write_ttf_file(self.sfnt_version, &mut self.tables)
    }
}

// ─── File Assembly ──────────────────────────────────────────────

fn write_ttf_file(sfnt_version: u32, tables: &mut [(u32, Vec<u8>)]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let (search_range, entry_selector, range_shift) = search_params(num_tables, 16);

    // Offset table (12 bytes)
    let mut output: Vec<u8> = Vec::new();
    output.extend_from_slice(&sfnt_version.to_be_bytes());
    output.extend_from_slice(&num_tables.to_be_bytes());
    output.extend_from_slice(&search_range.to_be_bytes());
    output.extend_from_slice(&entry_selector.to_be_bytes());
    output.extend_from_slice(&range_shift.to_be_bytes());

    let dir_size = 12 + num_tables as usize * 16;
    let mut table_offset = dir_size;

    for (_, data) in tables.iter_mut() {
        while data.len() % 4 != 0 {
            data.push(0);
        }
    }

    for (tag, data) in tables.iter() {
        output.extend_from_slice(&tag.to_be_bytes());
        output.extend_from_slice(&calc_table_checksum(data).to_be_bytes());
        output.extend_from_slice(&(table_offset as u32).to_be_bytes());
        output.extend_from_slice(&(data.len() as u32).to_be_bytes());
        table_offset += data.len();
    }

    for (_, data) in tables.iter() {
        output.extend_from_slice(data);
    }

    fix_head_checksum(&mut output);

    output
}

/// `(searchRange, entrySelector, rangeShift)` for `count` records of
/// `unit` bytes each, as used by both the table directory and cmap format 4.
pub fn search_params(count: u16, unit: u16) -> (u16, u16, u16) {
    let entry_selector = if count > 0 { 15 - count.leading_zeros() as u16 } else { 0 };
    let search_range = (1u16 << entry_selector).wrapping_mul(unit);
    let range_shift = count.wrapping_mul(unit).saturating_sub(search_range);
    (search_range, entry_selector, range_shift)
}

pub fn calc_table_checksum(data: &[u8]) -> u32 {
    let mut sum: u32 = 0;
    for chunk in data.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}

fn fix_head_checksum(output: &mut [u8]) {
    let num_tables = read_u16(output, 4) as usize;
    let head_tag = tag_u32(b"head");

    for i in 0..num_tables {
        let dir_offset = 12 + i * 16;
        if read_u32(output, dir_offset) != head_tag {
            continue;
        }
        let table_offset = read_u32(output, dir_offset + 8) as usize;
        let table_len = read_u32(output, dir_offset + 12) as usize;
        if table_len < 12 || table_offset + table_len > output.len() {
            break;
        }

        let adjustment = 0xB1B0_AFBAu32.wrapping_sub(calc_table_checksum(output));
        write_u32(output, table_offset + 8, adjustment);
        break;
    }
}

// ─── Table Builders ─────────────────────────────────────────────

/// A 54-byte `head` table (version 1.0).
pub fn build_head(units_per_em: u16, bbox: [i16; 4], loca_format: i16) -> Vec<u8> {
    let mut data = vec![0u8; 54];
    write_u16(&mut data, 0, 1); // majorVersion
    write_u16(&mut data, 2, 0); // minorVersion
    write_u32(&mut data, 4, 0x0001_0000); // fontRevision
    // checkSumAdjustment at 8 is filled in by the file writer
    write_u32(&mut data, 12, 0x5F0F_3CF5); // magicNumber
    write_u16(&mut data, 16, 0x000B); // flags
    write_u16(&mut data, 18, units_per_em);
    // created / modified timestamps at 20..36 stay zero
    for (i, v) in bbox.iter().enumerate() {
        write_u16(&mut data, 36 + i * 2, *v as u16);
    }
    write_u16(&mut data, 46, 8); // lowestRecPPEM
    write_u16(&mut data, 48, 2); // fontDirectionHint
    write_u16(&mut data, 50, loca_format as u16);
    data
}

/// A 36-byte `hhea` table (version 1.0).
pub fn build_hhea(ascender: i16, descender: i16, number_of_h_metrics: u16) -> Vec<u8> {
    let mut data = vec![0u8; 36];
    write_u16(&mut data, 0, 1);
    write_u16(&mut data, 2, 0);
    write_u16(&mut data, 4, ascender as u16);
    write_u16(&mut data, 6, descender as u16);
    write_u16(&mut data, 18, 1); // caretSlopeRise
    write_u16(&mut data, 34, number_of_h_metrics);
    data
}

/// `hmtx` from `(advanceWidth, lsb)` pairs.
pub fn build_hmtx(metrics: &[(u16, i16)]) -> Vec<u8> {
    let mut data = Vec::with_capacity(metrics.len() * 4);
    for &(advance, lsb) in metrics {
        data.extend_from_slice(&advance.to_be_bytes());
        data.extend_from_slice(&lsb.to_be_bytes());
    }
    data
}

/// `glyf` from raw per-glyph records, each padded to 4 bytes.
/// Returns the table and the loca offsets (one more than the glyph count).
pub fn build_glyf(glyphs: &[Vec<u8>]) -> (Vec<u8>, Vec<u32>) {
    let mut glyf: Vec<u8> = Vec::new();
    let mut offsets: Vec<u32> = Vec::with_capacity(glyphs.len() + 1);

    for glyph in glyphs {
        offsets.push(glyf.len() as u32);
        glyf.extend_from_slice(glyph);
        while glyf.len() % 4 != 0 {
            glyf.push(0);
        }
    }
    offsets.push(glyf.len() as u32);

    (glyf, offsets)
}

/// A simple-glyph header: numberOfContours plus the bounding box.
pub fn build_glyph_header(number_of_contours: i16, bbox: [i16; 4]) -> Vec<u8> {
    let mut data = Vec::with_capacity(10);
    data.extend_from_slice(&number_of_contours.to_be_bytes());
    for v in bbox {
        data.extend_from_slice(&v.to_be_bytes());
    }
    data
}

pub fn build_loca(offsets: &[u32], format: i16) -> Vec<u8> {
    let mut data = Vec::new();
    if format == 0 {
        for &offset in offsets {
            let short = (offset / 2) as u16;
            data.extend_from_slice(&short.to_be_bytes());
        }
    } else {
        for &offset in offsets {
            data.extend_from_slice(&offset.to_be_bytes());
        }
    }
    data
}

/// A `cmap` table wrapping the given subtables in record order.
pub fn build_cmap(subtables: &[CmapSubtable]) -> Vec<u8> {
    let mut cmap: Vec<u8> = Vec::new();
    cmap.extend_from_slice(&0u16.to_be_bytes()); // version
    cmap.extend_from_slice(&(subtables.len() as u16).to_be_bytes());

    let mut offset = 4 + subtables.len() * 8;
    for sub in subtables {
        cmap.extend_from_slice(&sub.platform_id.to_be_bytes());
        cmap.extend_from_slice(&sub.encoding_id.to_be_bytes());
        cmap.extend_from_slice(&(offset as u32).to_be_bytes());
        offset += sub.data.len();
    }
    for sub in subtables {
        cmap.extend_from_slice(&sub.data);
    }
    cmap
}

/// Format 0: byte glyph IDs for codes 0-255. Missing trailing codes map to 0.
pub fn build_cmap_format0(glyph_ids: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(262);
    data.extend_from_slice(&0u16.to_be_bytes()); // format
    data.extend_from_slice(&262u16.to_be_bytes()); // length
    data.extend_from_slice(&0u16.to_be_bytes()); // language
    for code in 0..256 {
        data.push(glyph_ids.get(code).copied().unwrap_or(0));
    }
    data
}

/// Format 4 from `(code, gid)` pairs. Single-code segments use idDelta,
/// longer runs go through idRangeOffset into glyphIdArray.
pub fn build_cmap_format4(char_to_gid: &[(u16, u16)]) -> Vec<u8> {
    let mut sorted = char_to_gid.to_vec();
    sorted.sort_by_key(|(ch, _)| *ch);
    sorted.dedup_by_key(|(ch, _)| *ch);

    // (start, end, gids) per contiguous run of codepoints
    let mut segments: Vec<(u16, u16, Vec<u16>)> = Vec::new();
    for &(ch, gid) in &sorted {
        if ch == 0xFFFF {
            continue;
        }
        if let Some(last) = segments.last_mut() {
            if ch == last.1 + 1 {
                last.1 = ch;
                last.2.push(gid);
                continue;
            }
        }
        segments.push((ch, ch, vec![gid]));
    }
    segments.push((0xFFFF, 0xFFFF, vec![0]));

    let seg_count = segments.len() as u16;
    let seg_count_x2 = seg_count * 2;
    let (search_range, entry_selector, range_shift) = search_params(seg_count, 2);

    let mut glyph_id_array: Vec<u16> = Vec::new();
    let mut end_codes: Vec<u16> = Vec::new();
    let mut start_codes: Vec<u16> = Vec::new();
    let mut id_deltas: Vec<i16> = Vec::new();
    let mut id_range_offsets: Vec<u16> = Vec::new();

    for (i, (start, end, gids)) in segments.iter().enumerate() {
        start_codes.push(*start);
        end_codes.push(*end);

        if *start == 0xFFFF {
            id_deltas.push(1);
            id_range_offsets.push(0);
        } else if gids.len() == 1 {
            let delta = (gids[0] as i32 - *start as i32) as i16;
            id_deltas.push(delta);
            id_range_offsets.push(0);
        } else {
            id_deltas.push(0);
            // Byte distance from this idRangeOffset slot to its first glyphIdArray entry
            let remaining_offsets = (segments.len() - i) as u16;
            let offset = (remaining_offsets + glyph_id_array.len() as u16) * 2;
            id_range_offsets.push(offset);
            glyph_id_array.extend_from_slice(gids);
        }
    }

    // 7 header words + reservedPad + 4 per-segment arrays + glyphIdArray
    let subtable_len = 16 + seg_count as usize * 8 + glyph_id_array.len() * 2;
    let mut subtable: Vec<u8> = Vec::with_capacity(subtable_len);
    subtable.extend_from_slice(&4u16.to_be_bytes());
    subtable.extend_from_slice(&(subtable_len as u16).to_be_bytes());
    subtable.extend_from_slice(&0u16.to_be_bytes()); // language
    subtable.extend_from_slice(&seg_count_x2.to_be_bytes());
    subtable.extend_from_slice(&search_range.to_be_bytes());
    subtable.extend_from_slice(&entry_selector.to_be_bytes());
    subtable.extend_from_slice(&range_shift.to_be_bytes());

    for &ec in &end_codes {
        subtable.extend_from_slice(&ec.to_be_bytes());
    }
    subtable.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
    for &sc in &start_codes {
        subtable.extend_from_slice(&sc.to_be_bytes());
    }
    for &d in &id_deltas {
        subtable.extend_from_slice(&d.to_be_bytes());
    }
    for &r in &id_range_offsets {
        subtable.extend_from_slice(&r.to_be_bytes());
    }
    for &g in &glyph_id_array {
        subtable.extend_from_slice(&g.to_be_bytes());
    }

    subtable
}

/// Format 6: a trimmed table starting at `first_code`.
pub fn build_cmap_format6(first_code: u16, glyph_ids: &[u16]) -> Vec<u8> {
    let length = 10 + glyph_ids.len() * 2;
    let mut data = Vec::with_capacity(length);
    data.extend_from_slice(&6u16.to_be_bytes());
    data.extend_from_slice(&(length as u16).to_be_bytes());
    data.extend_from_slice(&0u16.to_be_bytes()); // language
    data.extend_from_slice(&first_code.to_be_bytes());
    data.extend_from_slice(&(glyph_ids.len() as u16).to_be_bytes());
    for &g in glyph_ids {
        data.extend_from_slice(&g.to_be_bytes());
    }
    data
}

/// Format 12 from `(startCharCode, endCharCode, startGlyphID)` groups.
pub fn build_cmap_format12(groups: &[(u32, u32, u32)]) -> Vec<u8> {
    let length = 16 + groups.len() * 12;
    let mut data = Vec::with_capacity(length);
    data.extend_from_slice(&12u16.to_be_bytes());
    data.extend_from_slice(&0u16.to_be_bytes()); // reserved
    data.extend_from_slice(&(length as u32).to_be_bytes());
    data.extend_from_slice(&0u32.to_be_bytes()); // language
    data.extend_from_slice(&(groups.len() as u32).to_be_bytes());
    for &(start, end, gid) in groups {
        data.extend_from_slice(&start.to_be_bytes());
        data.extend_from_slice(&end.to_be_bytes());
        data.extend_from_slice(&gid.to_be_bytes());
    }
    data
}

/// A version-0 `kern` table with one horizontal format-0 subtable.
pub fn build_kern(pairs: &[(u16, u16, i16)]) -> Vec<u8> {
    let mut sorted = pairs.to_vec();
    sorted.sort_by_key(|&(l, r, _)| ((l as u32) << 16) | r as u32);

    let n_pairs = sorted.len() as u16;
    let (search_range, entry_selector, range_shift) = search_params(n_pairs, 6);
    let sub_len = 14 + sorted.len() * 6;

    let mut data = Vec::with_capacity(4 + sub_len);
    data.extend_from_slice(&0u16.to_be_bytes()); // version
    data.extend_from_slice(&1u16.to_be_bytes()); // nTables
    data.extend_from_slice(&0u16.to_be_bytes()); // subtable version
    data.extend_from_slice(&(sub_len as u16).to_be_bytes());
    data.extend_from_slice(&0x0001u16.to_be_bytes()); // coverage: horizontal, format 0
    data.extend_from_slice(&n_pairs.to_be_bytes());
    data.extend_from_slice(&search_range.to_be_bytes());
    data.extend_from_slice(&entry_selector.to_be_bytes());
    data.extend_from_slice(&range_shift.to_be_bytes());
    for (l, r, v) in sorted {
        data.extend_from_slice(&l.to_be_bytes());
        data.extend_from_slice(&r.to_be_bytes());
        data.extend_from_slice(&v.to_be_bytes());
    }
    data
}

// ─── Byte Helpers ───────────────────────────────────────────────

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn write_u16(data: &mut [u8], offset: usize, val: u16) {
    data[offset..offset + 2].copy_from_slice(&val.to_be_bytes());
}

fn write_u32(data: &mut [u8], offset: usize, val: u32) {
    data[offset..offset + 4].copy_from_slice(&val.to_be_bytes());
}

pub fn tag_u32(tag: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*tag)
}
