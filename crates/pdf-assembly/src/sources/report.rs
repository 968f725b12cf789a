//! Report generation through a database application
//!
//! The database is driven through the [`ReportDatabase`] trait, which exposes only
//! the operations the pipeline needs. [`ReportCommand`] points each report at a
//! query and sort order, exports it, and puts every report back the way it found it.

use crate::command::{Command, Outputs};
use crate::types::*;
use std::path::{Path, PathBuf};

/// A database application able to export reports to PDF.
///
/// Implementations wrap a live application session. Errors are plain messages;
/// [`ReportCommand`] attaches the stage and file.
pub trait ReportDatabase {
    fn open(&mut self, path: &Path) -> std::result::Result<(), String>;

    /// Query feeding `report`
    fn record_source(&mut self, report: &str) -> std::result::Result<String, String>;

    fn set_record_source(&mut self, report: &str, query: &str)
    -> std::result::Result<(), String>;

    /// Sort expression of `report`
    fn order_by(&mut self, report: &str) -> std::result::Result<String, String>;

    fn set_order_by(&mut self, report: &str, order_by: &str) -> std::result::Result<(), String>;

    /// Render `report` with its current settings to a PDF at `output`
    fn export_pdf(&mut self, report: &str, output: &Path) -> std::result::Result<(), String>;

    fn close(&mut self) -> std::result::Result<(), String>;
}

/// One report export
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Printout {
    pub report: String,
    pub query: String,
    pub order_by: String,
    /// `None` exports to a temporary file owned by the command
    #[cfg_attr(feature = "serde", serde(default))]
    pub output: Option<PathBuf>,
}

/// Saved settings of a report
#[derive(Debug, Clone)]
struct ReportState {
    record_source: String,
    order_by: String,
}

/// Report stage: one output file per printout, in order
pub struct ReportCommand<D: ReportDatabase> {
    database: D,
    database_path: PathBuf,
    printouts: Vec<Printout>,
    output: Outputs,
}

impl<D: ReportDatabase> ReportCommand<D> {
    pub fn new(database: D, database_path: impl Into<PathBuf>, printouts: Vec<Printout>) -> Self {
        let output = Outputs::multiple(printouts.iter().map(|p| p.output.clone()));
        Self {
            database,
            database_path: database_path.into(),
            printouts,
            output,
        }
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    fn fail(&self, message: impl ToString) -> AssemblyError {
        AssemblyError::external(self.stage(), &self.database_path, message)
    }

    fn export_all(
        &mut self,
        outputs: &[PathBuf],
        saved: &mut Vec<(String, ReportState)>,
    ) -> Result<()> {
        for (printout, output) in self.printouts.iter().zip(outputs) {
            let report = printout.report.as_str();

            if !saved.iter().any(|(name, _)| name == report) {
                let state = ReportState {
                    record_source: self
                        .database
                        .record_source(report)
                        .map_err(|e| self.fail(e))?,
                    order_by: self.database.order_by(report).map_err(|e| self.fail(e))?,
                };
                saved.push((report.to_string(), state));
            }

            self.database
                .set_record_source(report, &printout.query)
                .map_err(|e| self.fail(e))?;
            self.database
                .set_order_by(report, &printout.order_by)
                .map_err(|e| self.fail(e))?;

            crate::command::remove_safely(output)?;
            log::debug!("Exporting report '{}' to {}", report, output.display());
            self.database
                .export_pdf(report, output)
                .map_err(|e| AssemblyError::external("report", output, e))?;
        }
        Ok(())
    }

    /// Put every touched report back, then close. Returns the first failure.
    fn restore(&mut self, saved: &[(String, ReportState)]) -> Result<()> {
        let mut first_error = None;

        for (report, state) in saved {
            let restored = self
                .database
                .set_record_source(report, &state.record_source)
                .and_then(|_| self.database.set_order_by(report, &state.order_by));
            if let Err(e) = restored {
                log::warn!("Failed to restore report '{}': {}", report, e);
                first_error.get_or_insert_with(|| self.fail(e));
            }
        }

        if let Err(e) = self.database.close() {
            first_error.get_or_insert_with(|| self.fail(e));
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<D: ReportDatabase> Command for ReportCommand<D> {
    type Error = AssemblyError;

    fn stage(&self) -> &'static str {
        "report"
    }

    fn outputs(&self) -> &Outputs {
        &self.output
    }

    fn outputs_mut(&mut self) -> &mut Outputs {
        &mut self.output
    }

    fn run(&mut self, outputs: &[PathBuf]) -> Result<()> {
        log::info!(
            "Generating report files from {}",
            self.database_path.display()
        );

        let path = self.database_path.clone();
        self.database.open(&path).map_err(|e| self.fail(e))?;

        let mut saved = Vec::new();
        let exported = self.export_all(outputs, &mut saved);
        let restored = self.restore(&saved);

        exported.and(restored)
    }
}
