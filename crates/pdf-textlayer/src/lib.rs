pub mod fonts;
mod generator;
mod lang;
mod types;

pub use fonts::{BuiltinFace, ExternalFont, FontRegistry, FontSource};
pub use generator::{TextLayerCommand, generate_text_layer};
pub use lang::{FontChooser, LanguageClassifier, ScriptClassifier};
pub use types::*;
