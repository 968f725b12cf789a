use pdf_assembly::AssemblyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextLayerError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Font '{0}' is not registered")]
    UnknownFont(String),
    #[error("Font '{font}' has no glyph for {ch:?}")]
    UnsupportedText { font: String, ch: char },
    #[error("Failed to parse font '{name}': {reason}")]
    FontParse { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, TextLayerError>;

/// Which point of the drawn text the anchor marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Anchor is the left end of the baseline
    #[default]
    Left,
    /// Anchor is the middle of the baseline
    Center,
    /// Anchor is the right end of the baseline
    Right,
}

impl TextAlign {
    /// Left edge of a run of `width` points anchored at `x`
    pub fn left_edge(&self, x: f32, width: f32) -> f32 {
        match self {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        }
    }
}

/// One string to draw on a page
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    pub text: String,
    /// Name of a font in the [`crate::FontRegistry`]
    pub font: String,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
    pub align: TextAlign,
}

impl OverlayText {
    pub fn new(text: impl Into<String>, font: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            font_size,
            x: 0.0,
            y: 0.0,
            align: TextAlign::Left,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}
