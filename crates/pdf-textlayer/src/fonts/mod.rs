//! Font registry
//!
//! Fonts are registered explicitly on a [`FontRegistry`] value that the text
//! generator borrows. Nothing is registered as a side effect of loading a module.

mod builtin;
mod external;

pub use builtin::BuiltinFace;
pub use external::ExternalFont;

use crate::types::*;
use std::collections::HashMap;
use std::path::Path;

/// A registered font
#[derive(Clone)]
pub enum FontSource {
    Builtin(BuiltinFace),
    External(ExternalFont),
}

/// Fonts available to the text generator, by name
#[derive(Clone, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, FontSource>,
}

impl FontRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard fonts: Helvetica, Helvetica-Oblique and the
    /// Courier family
    pub fn with_builtin_fonts() -> Self {
        let mut registry = Self::new();
        for (name, face) in BuiltinFace::ALL {
            registry
                .fonts
                .insert(name.to_string(), FontSource::Builtin(face));
        }
        registry
    }

    /// Register a TrueType/OpenType font file under `name`
    pub fn register_file(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        self.register_bytes(name, data)?;
        log::debug!("Registered font from {}", path.display());
        Ok(())
    }

    /// Register a TrueType/OpenType font program under `name`, replacing any font
    /// of the same name
    pub fn register_bytes(&mut self, name: impl Into<String>, data: Vec<u8>) -> Result<()> {
        let name = name.into();
        let font = ExternalFont::from_bytes(&name, data)?;
        self.fonts.insert(name, FontSource::External(font));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Registered font names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fonts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn get(&self, name: &str) -> Result<&FontSource> {
        self.fonts
            .get(name)
            .ok_or_else(|| TextLayerError::UnknownFont(name.to_string()))
    }

    /// Width in points of `text` set in `font` at `font_size`
    pub fn text_width(&self, font: &str, text: &str, font_size: f32) -> Result<f32> {
        match self.get(font)? {
            FontSource::Builtin(face) => {
                let mut units = 0u32;
                for ch in text.chars() {
                    let width = face.char_width(ch).ok_or_else(|| {
                        TextLayerError::UnsupportedText {
                            font: font.to_string(),
                            ch,
                        }
                    })?;
                    units += width as u32;
                }
                Ok(units as f32 / 1000.0 * font_size)
            }
            FontSource::External(external) => external.text_width(font, text, font_size),
        }
    }
}
