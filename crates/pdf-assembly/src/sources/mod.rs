//! External collaborators that produce the raw PDFs a booklet is assembled from

mod document;
mod report;

pub use document::{DocumentExporter, ExportCommand, SofficeExporter};
pub use report::{Printout, ReportCommand, ReportDatabase};
