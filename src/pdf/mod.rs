//! # PDF Font Objects
//!
//! Serializes a loaded font into the PDF objects that embed it.
//!
//! An embedded TrueType font takes three objects, written in this order so
//! that each references one that already has an ID:
//!
//! ```text
//! n     FontFile2 stream   <- zlib-compressed font bytes
//! n+1   FontDescriptor     <- metrics, /FontFile2 n 0 R
//! n+2   Font dictionary    <- /Widths for the used codes, /FontDescriptor n+1 0 R
//! ```
//!
//! Standard fonts need only the font dictionary.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::font::metrics::scale_to_thousand;
use crate::font::{FontSource, StandardFont, TrueTypeFont};

/// An object body and the ID it will be written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfObject {
    pub id: usize,
    pub data: Vec<u8>,
}

impl PdfObject {
    /// `id 0 obj ... endobj` framing.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.data.len() + 32);
        let _ = write!(output, "{} 0 obj\n", self.id);
        output.extend_from_slice(&self.data);
        output.extend_from_slice(b"\nendobj\n\n");
        output
    }
}

/// Concatenate framed objects. No header, xref or trailer.
pub fn serialize_objects(objects: &[PdfObject]) -> Vec<u8> {
    objects.iter().flat_map(|obj| obj.to_bytes()).collect()
}

/// `[w1 w2 ...]`, space separated.
pub fn build_widths_array(widths: &[u32]) -> String {
    let mut out = String::from("[");
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", w);
    }
    out.push(']');
    out
}

/// The `/Subtype /TrueType` font dictionary.
pub fn truetype_font_dictionary(font: &TrueTypeFont, descriptor_id: usize) -> String {
    let mut dict = format!(
        "<< /Type /Font /Subtype /TrueType /BaseFont /{} /Encoding /WinAnsiEncoding",
        sanitize_font_name(font.name())
    );
    if let (Some(first), Some(last)) = (font.first_used(), font.last_used()) {
        let _ = write!(dict, " /FirstChar {} /LastChar {}", first, last);
    }
    let _ = write!(
        dict,
        " /Widths {} /FontDescriptor {} 0 R >>",
        build_widths_array(&font.used_widths()),
        descriptor_id
    );
    dict
}

/// The `/FontDescriptor` dictionary, metrics scaled to the 1000-unit em.
pub fn font_descriptor(font: &TrueTypeFont, font_file_id: usize) -> String {
    let upem = font.units_per_em();
    let bbox = font.bbox();
    let options = font.options();
    format!(
        "<< /Type /FontDescriptor /FontName /{} /Flags {} \
         /FontBBox [{} {} {} {}] /ItalicAngle {} \
         /Ascent {} /Descent {} /CapHeight {} /StemV {} \
         /FontFile2 {} 0 R >>",
        sanitize_font_name(font.name()),
        options.flags,
        scale_to_thousand(bbox[0], upem),
        scale_to_thousand(bbox[1], upem),
        scale_to_thousand(bbox[2], upem),
        scale_to_thousand(bbox[3], upem),
        options.italic_angle,
        scale_to_thousand(font.ascender(), upem),
        scale_to_thousand(font.descender(), upem),
        options.cap_height,
        options.stem_v,
        font_file_id
    )
}

/// The FontFile2 stream object body: compressed font bytes with
/// `/Length1` holding the uncompressed size.
pub fn font_file_stream(font: &TrueTypeFont) -> Vec<u8> {
    let raw = font.data();
    let compressed = compress_to_vec_zlib(raw, 6);
    let mut data: Vec<u8> = Vec::with_capacity(compressed.len() + 64);
    let _ = write!(
        data,
        "<< /Length {} /Length1 {} /Filter /FlateDecode >>\nstream\n",
        compressed.len(),
        raw.len()
    );
    data.extend_from_slice(&compressed);
    data.extend_from_slice(b"\nendstream");
    data
}

/// FontFile2, FontDescriptor and Font objects, numbered from `first_id`.
pub fn write_truetype_font_objects(font: &TrueTypeFont, first_id: usize) -> Vec<PdfObject> {
    let font_file_id = first_id;
    let descriptor_id = first_id + 1;
    let font_id = first_id + 2;

    log::debug!(
        "writing font '{}' as objects {}..={} ({} used codes)",
        font.name(),
        font_file_id,
        font_id,
        font.used().len()
    );

    vec![
        PdfObject {
            id: font_file_id,
            data: font_file_stream(font),
        },
        PdfObject {
            id: descriptor_id,
            data: font_descriptor(font, font_file_id).into_bytes(),
        },
        PdfObject {
            id: font_id,
            data: truetype_font_dictionary(font, descriptor_id).into_bytes(),
        },
    ]
}

pub fn standard_font_dictionary(font: StandardFont) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        font.pdf_name()
    )
}

/// Reduce a font name to characters that are safe in a PDF name object.
pub fn sanitize_font_name(name: &str) -> String {
    let name: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if name.is_empty() {
        "CustomFont".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::writer::*;

    /// 'A' -> 600, 'B' -> 620, 'C' -> 650.
    fn font() -> TrueTypeFont {
        let (glyf, offsets) = build_glyf(&vec![build_glyph_header(0, [0; 4]); 4]);
        let mut writer = FontWriter::new();
        writer
            .add_table(b"head", build_head(1000, [-100, -250, 1100, 950], 1))
            .add_table(b"hhea", build_hhea(900, -250, 4))
            .add_table(
                b"hmtx",
                build_hmtx(&[(500, 0), (600, 0), (620, 0), (650, 0)]),
            )
            .add_table(
                b"cmap",
                build_cmap(&[CmapSubtable {
                    platform_id: 3,
                    encoding_id: 1,
                    data: build_cmap_format4(&[(65, 1), (66, 2), (67, 3)]),
                }]),
            )
            .add_table(b"glyf", glyf)
            .add_table(b"loca", build_loca(&offsets, 1));
        TrueTypeFont::from_bytes(writer.finish(), "Test Sans").unwrap()
    }

    #[test]
    fn test_widths_array_skips_unused() {
        let mut font = font();
        font.mark_used("AC");
        assert_eq!(build_widths_array(&font.used_widths()), "[600 0 650]");
        assert_eq!(
            font.font_dictionary(7),
            "<< /Type /Font /Subtype /TrueType /BaseFont /TestSans \
             /Encoding /WinAnsiEncoding /FirstChar 65 /LastChar 67 \
             /Widths [600 0 650] /FontDescriptor 7 0 R >>"
        );
    }

    #[test]
    fn test_unmapped_used_code_gets_default_width() {
        let mut font = font();
        font.mark_used("AD");
        assert_eq!(build_widths_array(&font.used_widths()), "[600 0 0 1000]");
    }

    #[test]
    fn test_empty_usage_omits_char_range() {
        let dict = truetype_font_dictionary(&font(), 3);
        assert!(!dict.contains("/FirstChar"));
        assert!(!dict.contains("/LastChar"));
        assert!(dict.contains("/Widths [] /FontDescriptor 3 0 R"));
    }

    #[test]
    fn test_font_descriptor() {
        let desc = font_descriptor(&font(), 4);
        assert_eq!(
            desc,
            "<< /Type /FontDescriptor /FontName /TestSans /Flags 32 \
             /FontBBox [-100 -250 1100 950] /ItalicAngle 0 \
             /Ascent 900 /Descent -250 /CapHeight 729 /StemV 80 \
             /FontFile2 4 0 R >>"
        );
    }

    #[test]
    fn test_font_file_stream_round_trips() {
        let font = font();
        let stream = font_file_stream(&font);
        let text = String::from_utf8_lossy(&stream);
        assert!(text.starts_with("<< /Length "));
        assert!(text.contains(&format!("/Length1 {}", font.data().len())));
        assert!(stream.ends_with(b"\nendstream"));

        let start = stream.windows(7).position(|w| w == b"stream\n").unwrap() + 7;
        let body = &stream[start..stream.len() - b"\nendstream".len()];
        let inflated = miniz_oxide::inflate::decompress_to_vec_zlib(body).unwrap();
        assert_eq!(inflated, font.data());
    }

    #[test]
    fn test_object_order_and_references() {
        let mut font = font();
        font.mark_used("B");
        let objects = write_truetype_font_objects(&font, 10);
        let ids: Vec<usize> = objects.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);

        let descriptor = String::from_utf8_lossy(&objects[1].data);
        assert!(descriptor.contains("/FontFile2 10 0 R"));
        let dict = String::from_utf8_lossy(&objects[2].data);
        assert!(dict.contains("/FontDescriptor 11 0 R"));
        assert!(dict.contains("/FirstChar 66 /LastChar 66 /Widths [620]"));

        let bytes = serialize_objects(&objects[1..]);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("11 0 obj\n<< /Type /FontDescriptor"));
        assert!(text.contains("endobj\n\n12 0 obj\n"));
    }

    #[test]
    fn test_standard_font_dictionary() {
        assert_eq!(
            standard_font_dictionary(StandardFont::TimesBold),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Times-Bold /Encoding /WinAnsiEncoding >>"
        );
    }

    #[test]
    fn test_sanitize_font_name() {
        assert_eq!(sanitize_font_name("Open Sans"), "OpenSans");
        assert_eq!(sanitize_font_name("Inter-Bold_2"), "Inter-Bold_2");
        assert_eq!(sanitize_font_name("(/)"), "CustomFont");
    }
}
