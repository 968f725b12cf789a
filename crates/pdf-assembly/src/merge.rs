//! Page-range merge engine
//!
//! Builds one document from the selected pages of many. Pages are copied
//! structurally (see [`PageCopier`]), never re-rendered.

use crate::command::{Command, Outputs};
use crate::io::{finalize_document, load_pdf, new_output_document, page_ids, save_pdf};
use crate::plan::AssemblyPlan;
use crate::render::PageCopier;
use crate::types::*;
use lopdf::{Document, Object};
use std::path::PathBuf;

/// Merge the pages selected by `plan` into a new document.
///
/// Each source is opened, its selection resolved against its page count, and the
/// selected pages inserted at a running cursor that advances by the number of
/// pages inserted. Sources are released as soon as their pages are copied.
pub fn merge_plan(plan: &AssemblyPlan) -> Result<Document> {
    let (mut output, pages_id) = new_output_document();
    let mut kids: Vec<Object> = Vec::new();
    let mut cursor = 0;

    for spec in &plan.sources {
        for file in &spec.files {
            let source = load_pdf(file)?;
            let source_pages = page_ids(&source);
            let selected = spec.select_pages(file, source_pages.len())?;
            let selected_ids: Vec<_> = selected.iter().map(|&idx| source_pages[idx]).collect();

            let mut copier = PageCopier::new(&source);
            copier.reserve_pages(&mut output, &selected_ids);

            for page_id in selected_ids {
                let new_id = copier.copy_page(&mut output, page_id, pages_id)?;
                kids.insert(cursor, Object::Reference(new_id));
                cursor += 1;
            }

            log::debug!(
                "Selected {} of {} pages from {}",
                selected.len(),
                source_pages.len(),
                file.display()
            );
        }
    }

    finalize_document(&mut output, pages_id, kids);
    Ok(output)
}

/// Merge stage: writes the pages selected by an [`AssemblyPlan`] to one file
pub struct MergeCommand {
    plan: AssemblyPlan,
    output: Outputs,
    pages_written: usize,
}

impl MergeCommand {
    /// `None` writes to a temporary file owned by the command
    pub fn new(output: Option<PathBuf>, plan: AssemblyPlan) -> Self {
        Self {
            plan,
            output: Outputs::single(output),
            pages_written: 0,
        }
    }

    pub fn plan(&self) -> &AssemblyPlan {
        &self.plan
    }

    /// Pages in the written file; zero when nothing was selected
    pub fn pages_written(&self) -> usize {
        self.pages_written
    }
}

impl Command for MergeCommand {
    type Error = AssemblyError;

    fn stage(&self) -> &'static str {
        "merge"
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
            .ok_or_else(|| AssemblyError::Config("merge needs an output file".into()))?;
        log::info!("Merging PDF into {}", target.display());

        let mut doc = merge_plan(&self.plan)?;
        self.pages_written = doc.get_pages().len();

        if self.pages_written == 0 {
            log::info!("No pages selected, nothing written");
            return Ok(());
        }

        save_pdf(&mut doc, target)?;
        Ok(())
    }
}
