//! Standard PDF fonts that need no embedded font program
//!
//! Widths are the Adobe core font metrics in 1/1000 em for the printable ASCII
//! range. Only faces whose metrics are listed here can be measured, which is what
//! centred and right-aligned text needs.

use printpdf::BuiltinFont;

/// Helvetica and Helvetica-Oblique, characters 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Every Courier face is monospaced
const COURIER_WIDTH: u16 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFace {
    Helvetica,
    HelveticaOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl BuiltinFace {
    /// Every face with its PostScript name
    pub const ALL: [(&'static str, BuiltinFace); 6] = [
        ("Helvetica", BuiltinFace::Helvetica),
        ("Helvetica-Oblique", BuiltinFace::HelveticaOblique),
        ("Courier", BuiltinFace::Courier),
        ("Courier-Bold", BuiltinFace::CourierBold),
        ("Courier-Oblique", BuiltinFace::CourierOblique),
        ("Courier-BoldOblique", BuiltinFace::CourierBoldOblique),
    ];

    pub fn pdf_font(&self) -> BuiltinFont {
        match self {
            BuiltinFace::Helvetica => BuiltinFont::Helvetica,
            BuiltinFace::HelveticaOblique => BuiltinFont::HelveticaOblique,
            BuiltinFace::Courier => BuiltinFont::Courier,
            BuiltinFace::CourierBold => BuiltinFont::CourierBold,
            BuiltinFace::CourierOblique => BuiltinFont::CourierOblique,
            BuiltinFace::CourierBoldOblique => BuiltinFont::CourierBoldOblique,
        }
    }

    /// Advance width in 1/1000 em, `None` outside printable ASCII
    pub fn char_width(&self, ch: char) -> Option<u16> {
        if !(' '..='~').contains(&ch) {
            return None;
        }
        match self {
            BuiltinFace::Helvetica | BuiltinFace::HelveticaOblique => {
                Some(HELVETICA_WIDTHS[ch as usize - 0x20])
            }
            _ => Some(COURIER_WIDTH),
        }
    }
}
