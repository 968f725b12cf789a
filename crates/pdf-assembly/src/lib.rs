pub mod command;
pub mod constants;
pub mod impose;
mod io;
mod merge;
mod overlay;
mod plan;
mod range;
pub mod render;
pub mod sources;
mod stats;
mod types;

pub use command::{Command, Outputs, remove_safely};
pub use impose::{FoldScheme, ImposeCommand, impose_documents, impose_files};
pub use io::{load_multiple_pdfs, load_pdf, page_count, page_ids, save_pdf};
pub use merge::{MergeCommand, merge_plan};
pub use overlay::{OverlayCommand, overlay_documents, overlay_files};
pub use plan::{AssemblyPlan, PlacedSource, SourceSpec};
pub use range::{PageRange, ParsePageRangeError, parse_ranges};
pub use stats::{calculate_statistics, impose_statistics};
pub use types::*;
