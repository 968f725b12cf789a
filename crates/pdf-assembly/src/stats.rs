use crate::constants::PAGES_PER_SHEET;
use crate::impose::{FoldScheme, padded_page_count};
use crate::types::*;
use lopdf::Document;

/// Calculate statistics for imposing `documents` as one page sequence
pub fn calculate_statistics(
    documents: &[Document],
    fold: FoldScheme,
) -> Result<ImpositionStatistics> {
    let source_pages = documents.iter().map(|doc| doc.get_pages().len()).sum();
    impose_statistics(source_pages, fold)
}

/// Statistics for imposing `source_pages` pages
pub fn impose_statistics(source_pages: usize, fold: FoldScheme) -> Result<ImpositionStatistics> {
    if source_pages == 0 {
        return Err(AssemblyError::NoPages);
    }

    let (cols, rows) = fold.grid();
    let cells_per_side = cols * rows;

    let padded_count = padded_page_count(source_pages);
    let blank_pages_added = padded_count - source_pages;
    let output_sheets = padded_count / PAGES_PER_SHEET;

    // Front and back of each sheet
    let output_pages = output_sheets * 2;
    debug_assert_eq!(output_pages * cells_per_side, padded_count);

    Ok(ImpositionStatistics {
        source_pages,
        output_sheets,
        output_pages,
        blank_pages_added,
    })
}
