use crate::range::PageRange;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load '{}': {source}", .path.display())]
    Load {
        path: PathBuf,
        source: lopdf::Error,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Page range {range} is invalid for '{}' ({pages} pages)", .path.display())]
    InvalidPageRange {
        path: PathBuf,
        range: PageRange,
        pages: usize,
    },
    #[error("'{}' has {found} pages, expected {expected}", .path.display())]
    PageCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error("Layer {layer} has {found} pages, expected {expected}")]
    LayerPageCountMismatch {
        layer: usize,
        expected: usize,
        found: usize,
    },
    #[error("{stage} failed for '{}': {message}", .target.display())]
    External {
        stage: &'static str,
        target: PathBuf,
        message: String,
    },
    #[error("No pages to impose")]
    NoPages,
}

impl AssemblyError {
    pub(crate) fn external(
        stage: &'static str,
        target: impl Into<PathBuf>,
        message: impl ToString,
    ) -> Self {
        AssemblyError::External {
            stage,
            target: target.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblyError>;

/// Cover placement markers carried alongside a source.
///
/// The merge engine does not interpret these; they tell the printing step which
/// sides of the first and last leaf of a source are meant to be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CoverPrint {
    /// Print both sides
    #[default]
    PrintBoth,
    /// Print the front side only
    PrintFront,
    /// Print the back side only
    PrintBack,
    /// Leave both sides blank
    BlankBoth,
}

/// Page size in points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }

    /// Build a page size from inches
    pub fn from_inches(width_in: f32, height_in: f32) -> Self {
        Self::new(
            crate::constants::inches_to_pt(width_in),
            crate::constants::inches_to_pt(height_in),
        )
    }
}

/// Statistics about a saddle-stitch imposition
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionStatistics {
    /// Total number of source pages
    pub source_pages: usize,
    /// Number of physical sheets
    pub output_sheets: usize,
    /// Output page count (front and back of every sheet)
    pub output_pages: usize,
    /// Number of blank pages added for padding
    pub blank_pages_added: usize,
}
