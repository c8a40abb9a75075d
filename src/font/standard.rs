//! Metrics for the standard PDF text fonts, which are never embedded.
//!
//! Widths are the AFM advance widths for printable ASCII (32-126) on a
//! 1000-unit em. The oblique Helvetica and Courier faces share the upright
//! widths, as they do in the AFM files.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

pub struct StandardFontMetrics {
    /// Widths for codes 32..=126, or `None` for a monospaced face.
    widths: Option<&'static [u16; 95]>,
    monospace_width: u16,
    pub ascent: i16,
    pub descent: i16,
}

impl StandardFontMetrics {
    /// Width of `ch` on the 1000-unit em, if the face encodes it.
    pub fn char_width(&self, ch: char) -> Option<u32> {
        let code = ch as u32;
        if !(32..=126).contains(&code) {
            return None;
        }
        Some(match self.widths {
            Some(table) => table[(code - 32) as usize] as u32,
            None => self.monospace_width as u32,
        })
    }
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &HELVETICA_BOLD,
            Self::TimesRoman => &TIMES_ROMAN,
            Self::TimesBold => &TIMES_BOLD,
            Self::TimesItalic => &TIMES_ITALIC,
            Self::TimesBoldItalic => &TIMES_BOLD_ITALIC,
            Self::Courier | Self::CourierBold | Self::CourierOblique | Self::CourierBoldOblique => {
                &COURIER
            }
        }
    }

    /// Family, weight and italic flag this face answers to.
    pub fn key(&self) -> (&'static str, u32, bool) {
        match self {
            Self::Helvetica => ("Helvetica", 400, false),
            Self::HelveticaBold => ("Helvetica", 700, false),
            Self::HelveticaOblique => ("Helvetica", 400, true),
            Self::HelveticaBoldOblique => ("Helvetica", 700, true),
            Self::TimesRoman => ("Times", 400, false),
            Self::TimesBold => ("Times", 700, false),
            Self::TimesItalic => ("Times", 400, true),
            Self::TimesBoldItalic => ("Times", 700, true),
            Self::Courier => ("Courier", 400, false),
            Self::CourierBold => ("Courier", 700, false),
            Self::CourierOblique => ("Courier", 400, true),
            Self::CourierBoldOblique => ("Courier", 700, true),
        }
    }

    pub const ALL: [StandardFont; 12] = [
        Self::Helvetica,
        Self::HelveticaBold,
        Self::HelveticaOblique,
        Self::HelveticaBoldOblique,
        Self::TimesRoman,
        Self::TimesBold,
        Self::TimesItalic,
        Self::TimesBoldItalic,
        Self::Courier,
        Self::CourierBold,
        Self::CourierOblique,
        Self::CourierBoldOblique,
    ];
}

// ─── Width Tables ───────────────────────────────────────────────

static HELVETICA: StandardFontMetrics = StandardFontMetrics {
    widths: Some(&HELVETICA_WIDTHS),
    monospace_width: 0,
    ascent: 718,
    descent: -207,
};

static HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    widths: Some(&HELVETICA_BOLD_WIDTHS),
    monospace_width: 0,
    ascent: 718,
    descent: -207,
};

static TIMES_ROMAN: StandardFontMetrics = StandardFontMetrics {
    widths: Some(&TIMES_ROMAN_WIDTHS),
    monospace_width: 0,
    ascent: 683,
    descent: -217,
};

static TIMES_BOLD: StandardFontMetrics = StandardFontMetrics {
    widths: Some(&TIMES_BOLD_WIDTHS),
    monospace_width: 0,
    ascent: 683,
    descent: -217,
};

static TIMES_ITALIC: StandardFontMetrics = StandardFontMetrics {
    widths: Some(&TIMES_ITALIC_WIDTHS),
    monospace_width: 0,
    ascent: 683,
    descent: -217,
};

static TIMES_BOLD_ITALIC: StandardFontMetrics = StandardFontMetrics {
    widths: Some(&TIMES_BOLD_ITALIC_WIDTHS),
    monospace_width: 0,
    ascent: 683,
    descent: -217,
};

static COURIER: StandardFontMetrics = StandardFontMetrics {
    widths: None,
    monospace_width: 600,
    ascent: 629,
    descent: -157,
};

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[rustfmt::skip]
static TIMES_ITALIC_WIDTHS: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

#[rustfmt::skip]
static TIMES_BOLD_ITALIC_WIDTHS: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
    333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
    500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_space() {
        let w = StandardFont::Helvetica.metrics().char_width(' ').unwrap();
        assert_eq!(w, 278);
    }

    #[test]
    fn test_bold_wider() {
        let regular = StandardFont::Helvetica.metrics().char_width('b').unwrap();
        let bold = StandardFont::HelveticaBold.metrics().char_width('b').unwrap();
        assert!(bold > regular);
    }

    #[test]
    fn test_courier_monospaced() {
        let m = StandardFont::CourierBold.metrics();
        assert_eq!(m.char_width('i'), Some(600));
        assert_eq!(m.char_width('W'), Some(600));
    }

    #[test]
    fn test_outside_ascii_has_no_width() {
        assert_eq!(StandardFont::TimesRoman.metrics().char_width('é'), None);
        assert_eq!(StandardFont::TimesRoman.metrics().char_width('\n'), None);
    }

    #[test]
    fn test_spot_widths() {
        assert_eq!(StandardFont::Helvetica.metrics().char_width('@'), Some(1015));
        assert_eq!(StandardFont::Helvetica.metrics().char_width('~'), Some(584));
        assert_eq!(StandardFont::TimesRoman.metrics().char_width('W'), Some(944));
        assert_eq!(StandardFont::TimesBold.metrics().char_width('%'), Some(1000));
    }
}
