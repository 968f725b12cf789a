//! Shared constants for PDF assembly
//!
//! This module centralizes magic numbers used throughout the pipeline.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert inches to points
#[inline]
pub fn inches_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Documents
// =============================================================================

/// PDF version written by every stage
pub const PDF_VERSION: &str = "1.7";

/// Upper bound when walking `Parent` links, guards against cyclic page trees
pub const MAX_PAGE_TREE_DEPTH: usize = 64;

// =============================================================================
// Temporary Files
// =============================================================================

/// Prefix of allocated output files
pub const TEMP_FILE_PREFIX: &str = "pdfbk-";

/// Suffix of allocated output files
pub const TEMP_FILE_SUFFIX: &str = ".pdf";

// =============================================================================
// Imposition
// =============================================================================

/// Logical pages carried by one folded sheet (two leaves, both sides)
pub const PAGES_PER_SHEET: usize = 4;
