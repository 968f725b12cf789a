//! Saddle-stitch page order

use crate::constants::PAGES_PER_SHEET;

/// Source page indices printed on one physical sheet, left cell first.
/// `None` is a blank padding page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetPages {
    pub front: [Option<usize>; 2],
    pub back: [Option<usize>; 2],
}

/// Page count rounded up to whole sheets
pub fn padded_page_count(total_pages: usize) -> usize {
    total_pages.div_ceil(PAGES_PER_SHEET) * PAGES_PER_SHEET
}

/// Nest `total_pages` pages into one saddle-stitched signature.
///
/// Sheet 0 is the outermost. Its front carries the last and first pages and its
/// back the second and second-to-last, so folding the stack in half and stapling
/// at the fold reads in order.
pub fn saddle_stitch_order(total_pages: usize) -> Vec<SheetPages> {
    let padded = padded_page_count(total_pages);
    let page = |idx: usize| (idx < total_pages).then_some(idx);

    (0..padded / PAGES_PER_SHEET)
        .map(|sheet| SheetPages {
            front: [page(padded - 1 - 2 * sheet), page(2 * sheet)],
            back: [page(2 * sheet + 1), page(padded - 2 - 2 * sheet)],
        })
        .collect()
}
