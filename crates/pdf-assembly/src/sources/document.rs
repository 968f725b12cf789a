//! Master document export through a word processor

use crate::command::{Command, Outputs};
use crate::types::*;
use std::path::{Path, PathBuf};
use std::process::Command as Process;

/// Something that renders a document template to PDF
pub trait DocumentExporter {
    fn export_pdf(&self, document: &Path, output: &Path) -> std::result::Result<(), String>;
}

/// Export stage: one document into one PDF
pub struct ExportCommand<E: DocumentExporter> {
    exporter: E,
    document: PathBuf,
    output: Outputs,
}

impl<E: DocumentExporter> ExportCommand<E> {
    /// `None` writes to a temporary file owned by the command
    pub fn new(exporter: E, document: impl Into<PathBuf>, output: Option<PathBuf>) -> Self {
        Self {
            exporter,
            document: document.into(),
            output: Outputs::single(output),
        }
    }
}

impl<E: DocumentExporter> Command for ExportCommand<E> {
    type Error = AssemblyError;

    fn stage(&self) -> &'static str {
        "export"
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
            .ok_or_else(|| AssemblyError::Config("export needs an output file".into()))?;

        if !self.document.is_file() {
            return Err(AssemblyError::external(
                self.stage(),
                &self.document,
                "document not found",
            ));
        }

        log::info!(
            "Exporting {} to {}",
            self.document.display(),
            target.display()
        );
        self.exporter
            .export_pdf(&self.document, target)
            .map_err(|e| AssemblyError::external(self.stage(), &self.document, e))
    }
}

/// Exports through a headless LibreOffice process
#[derive(Debug, Clone)]
pub struct SofficeExporter {
    program: PathBuf,
}

impl SofficeExporter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SofficeExporter {
    fn default() -> Self {
        Self::new("soffice")
    }
}

impl DocumentExporter for SofficeExporter {
    fn export_pdf(&self, document: &Path, output: &Path) -> std::result::Result<(), String> {
        // soffice names its output after the input, so convert into a scratch
        // directory and move the result into place.
        let scratch = tempfile::tempdir().map_err(|e| e.to_string())?;

        log::debug!("Running {} on {}", self.program.display(), document.display());
        let result = Process::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(scratch.path())
            .arg(document)
            .output()
            .map_err(|e| format!("cannot start {}: {}", self.program.display(), e))?;

        if !result.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                self.program.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ));
        }

        let stem = document
            .file_stem()
            .ok_or_else(|| "document has no file name".to_string())?;
        let mut file_name = stem.to_os_string();
        file_name.push(".pdf");
        let produced = scratch.path().join(file_name);
        if !produced.is_file() {
            return Err(format!("no PDF produced at {}", produced.display()));
        }

        std::fs::copy(&produced, output).map_err(|e| e.to_string())?;
        Ok(())
    }
}
