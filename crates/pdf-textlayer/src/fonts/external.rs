//! TrueType/OpenType fonts loaded at run time

use crate::types::*;
use printpdf::ParsedFont;

/// A font program with its metrics source.
///
/// The raw bytes are kept for measuring; the parsed form is what gets embedded.
#[derive(Clone)]
pub struct ExternalFont {
    data: Vec<u8>,
    units_per_em: u16,
    parsed: ParsedFont,
}

impl ExternalFont {
    pub fn from_bytes(name: &str, data: Vec<u8>) -> Result<Self> {
        let parse_error = |reason: String| TextLayerError::FontParse {
            name: name.to_string(),
            reason,
        };

        let units_per_em = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| parse_error(e.to_string()))?
            .units_per_em();

        let mut warnings = Vec::new();
        let parsed = ParsedFont::from_bytes(&data, 0, &mut warnings)
            .ok_or_else(|| parse_error("unsupported font program".to_string()))?;

        Ok(Self {
            data,
            units_per_em,
            parsed,
        })
    }

    pub fn parsed(&self) -> &ParsedFont {
        &self.parsed
    }

    /// Width of `text` at `font_size`, failing on the first character without a glyph
    pub fn text_width(&self, name: &str, text: &str, font_size: f32) -> Result<f32> {
        let face = ttf_parser::Face::parse(&self.data, 0).map_err(|e| {
            TextLayerError::FontParse {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut units = 0u32;
        for ch in text.chars() {
            let glyph = face
                .glyph_index(ch)
                .ok_or_else(|| TextLayerError::UnsupportedText {
                    font: name.to_string(),
                    ch,
                })?;
            units += face.glyph_hor_advance(glyph).unwrap_or(0) as u32;
        }

        Ok(units as f32 / self.units_per_em as f32 * font_size)
    }
}
