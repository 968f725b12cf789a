//! Saddle-stitch imposition
//!
//! This module orchestrates the imposition process:
//! 1. Concatenate the source documents into one logical page sequence
//! 2. Pad the sequence to whole sheets
//! 3. Nest the pages into a single saddle-stitched signature
//! 4. Render both sides of every sheet to the output PDF

mod sheet;
mod signature;

pub use signature::{SheetPages, padded_page_count, saddle_stitch_order};

use crate::command::{Command, Outputs};
use crate::io::{finalize_document, load_multiple_pdfs, new_output_document, page_ids, save_pdf};
use crate::render::{ObjectCache, get_page_dimensions};
use crate::stats::impose_statistics;
use crate::types::*;
use lopdf::{Document, Object};
use sheet::{CellSize, SourcePage, render_sheet_side};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Folding scheme of the printed sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FoldScheme {
    /// One fold across the middle of the sheet, giving two cells side by side
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "h"))]
    Horizontal,
}

impl FoldScheme {
    /// Cells on one sheet side as (columns, rows)
    pub fn grid(&self) -> (usize, usize) {
        match self {
            FoldScheme::Horizontal => (2, 1),
        }
    }
}

impl FromStr for FoldScheme {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "h" => Ok(FoldScheme::Horizontal),
            other => Err(AssemblyError::Config(format!(
                "unsupported fold scheme '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for FoldScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldScheme::Horizontal => write!(f, "h"),
        }
    }
}

/// Impose the concatenated pages of `documents` for saddle-stitch printing
pub fn impose_documents(documents: &[Document], fold: FoldScheme) -> Result<Document> {
    let pages: Vec<SourcePage> = documents
        .iter()
        .enumerate()
        .flat_map(|(doc_idx, doc)| page_ids(doc).into_iter().map(move |id| (doc_idx, id)))
        .collect();

    let stats = impose_statistics(pages.len(), fold)?;
    if stats.blank_pages_added > 0 {
        log::warn!(
            "{} pages is not a multiple of 4, adding {} blank pages at the end",
            stats.source_pages,
            stats.blank_pages_added
        );
    }

    let (cols, rows) = fold.grid();
    let cell = pages.iter().fold(
        CellSize {
            width: 0.0,
            height: 0.0,
        },
        |cell, &(doc_idx, page_id)| {
            let (width, height) = get_page_dimensions(&documents[doc_idx], page_id);
            CellSize {
                width: cell.width.max(width),
                height: cell.height.max(height),
            }
        },
    );
    log::debug!(
        "Sheet side {}x{} cells of {:.1}x{:.1}pt",
        cols,
        rows,
        cell.width,
        cell.height
    );

    let (mut output, pages_tree_id) = new_output_document();
    let mut caches = vec![ObjectCache::new(); documents.len()];
    let mut page_refs = Vec::new();
    let lookup = |idx: Option<usize>| idx.map(|idx| pages[idx]);

    for sheet in saddle_stitch_order(pages.len()) {
        for side in [sheet.front, sheet.back] {
            let cells = side.map(lookup);
            let page_id = render_sheet_side(
                &mut output,
                documents,
                &mut caches,
                &cells,
                cell,
                pages_tree_id,
            )?;
            page_refs.push(Object::Reference(page_id));
        }
    }

    finalize_document(&mut output, pages_tree_id, page_refs);
    Ok(output)
}

/// Load and impose files as one concatenated page sequence
pub fn impose_files(inputs: &[impl AsRef<Path>], fold: FoldScheme) -> Result<Document> {
    let documents = load_multiple_pdfs(inputs)?;
    impose_documents(&documents, fold)
}

/// Imposition stage: writes the print-ready sheets of its inputs
pub struct ImposeCommand {
    inputs: Vec<PathBuf>,
    fold: FoldScheme,
    output: Outputs,
    statistics: Option<ImpositionStatistics>,
}

impl ImposeCommand {
    /// `None` writes to a temporary file owned by the command
    pub fn new(output: Option<PathBuf>, inputs: Vec<PathBuf>, fold: FoldScheme) -> Self {
        Self {
            inputs,
            fold,
            output: Outputs::single(output),
            statistics: None,
        }
    }

    /// Statistics of the last execution
    pub fn statistics(&self) -> Option<&ImpositionStatistics> {
        self.statistics.as_ref()
    }
}

impl Command for ImposeCommand {
    type Error = AssemblyError;

    fn stage(&self) -> &'static str {
        "impose"
    }

    fn outputs(&self) -> &Outputs {
        &self.output
    }

    fn outputs_mut(&mut self) -> &mut Outputs {
        &mut self.output
    }

    fn run(&mut self, outputs: &[PathBuf]) -> Result<()> {
        let target = outputs
            .first()
            .ok_or_else(|| AssemblyError::Config("impose needs an output file".into()))?;
        log::info!("Imposing PDF into {}", target.display());

        let documents = load_multiple_pdfs(&self.inputs)?;
        let source_pages = documents.iter().map(|doc| doc.get_pages().len()).sum();
        let statistics = impose_statistics(source_pages, self.fold)?;

        let mut doc = impose_documents(&documents, self.fold)?;
        save_pdf(&mut doc, target)?;

        self.statistics = Some(statistics);
        Ok(())
    }
}
