mod args;
mod booklet;
mod config;
mod logger;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::BookletConfig;
use log::LevelFilter;
use pdf_assembly::sources::{ExportCommand, SofficeExporter};
use pdf_assembly::{
    AssemblyPlan, Command, FoldScheme, MergeCommand, OverlayCommand, calculate_statistics,
    impose_documents, load_multiple_pdfs, page_count, save_pdf,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfbk", about = "PDF booklet assembly", version)]
struct Cli {
    /// Log debug detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge page ranges of several PDFs into one
    Merge {
        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// FILE[:RANGE[,RANGE...]] where RANGE is START or START-END (END <= 0 counts from the end)
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<String>,
    },

    /// Superimpose the pages of LAYER files onto BASE
    Overlay {
        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Base PDF; sets the page geometry
        base: PathBuf,

        /// PDFs drawn on top, in order
        #[arg(required = true, num_args = 1..)]
        layers: Vec<PathBuf>,
    },

    /// Impose PDF pages for saddle-stitch printing
    Impose {
        /// Output PDF file
        #[arg(short, long, required_unless_present = "stats_only")]
        output: Option<PathBuf>,

        /// Fold scheme
        #[arg(long, default_value = "h", value_enum)]
        folds: FoldArg,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,

        /// Input PDF file(s), concatenated in order
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,
    },

    /// Print page counts
    Pages {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Export a word-processor document to PDF with LibreOffice
    Export {
        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// LibreOffice executable
        #[arg(long, default_value = "soffice")]
        soffice: PathBuf,

        document: PathBuf,
    },

    /// Build a booklet from a JSON recipe
    Booklet { recipe: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum FoldArg {
    /// One horizontal fold, two pages per sheet side
    H,
}

impl From<FoldArg> for FoldScheme {
    fn from(arg: FoldArg) -> Self {
        match arg {
            FoldArg::H => Self::Horizontal,
        }
    }
}

fn merge_summary(pages: usize, output: &Path) -> String {
    if pages == 0 {
        format!("No pages selected; {} was not written", output.display())
    } else {
        format!("Merged {} pages → {}", pages, output.display())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logger::init(level)?;

    match cli.command {
        Commands::Merge { output, inputs } => {
            let plan: AssemblyPlan = inputs.iter().map(|arg| args::parse_input(arg)).collect();
            let mut cmd = MergeCommand::new(Some(output.clone()), plan);
            cmd.execute().context("merge stage")?;
            println!("{}", merge_summary(cmd.pages_written(), &output));
        }

        Commands::Overlay {
            output,
            base,
            layers,
        } => {
            let mut inputs = vec![base];
            inputs.extend(layers);
            let mut cmd = OverlayCommand::new(Some(output.clone()), inputs);
            cmd.execute().context("overlay stage")?;
            println!("Overlaid → {}", output.display());
        }

        Commands::Impose {
            output,
            folds,
            stats_only,
            inputs,
        } => {
            let fold = FoldScheme::from(folds);
            let documents = load_multiple_pdfs(&inputs).context("impose stage")?;

            let stats = calculate_statistics(&documents, fold).context("impose stage")?;
            println!("Imposition Statistics:");
            println!("  Source pages: {}", stats.source_pages);
            println!("  Output sheets: {}", stats.output_sheets);
            println!("  Output pages: {}", stats.output_pages);
            println!("  Blank pages added: {}", stats.blank_pages_added);

            if stats_only {
                return Ok(());
            }
            let Some(output) = output else {
                anyhow::bail!("impose needs --output");
            };

            let mut imposed = impose_documents(&documents, fold).context("impose stage")?;
            save_pdf(&mut imposed, &output).context("impose stage")?;
            println!("Imposed → {}", output.display());
        }

        Commands::Pages { files } => {
            for file in files {
                let count = page_count(&file)
                    .with_context(|| format!("reading {}", file.display()))?;
                println!("{}: {}", file.display(), count);
            }
        }

        Commands::Export {
            output,
            soffice,
            document,
        } => {
            let mut cmd =
                ExportCommand::new(SofficeExporter::new(soffice), document, Some(output.clone()));
            cmd.execute().context("export stage")?;
            println!("Exported → {}", output.display());
        }

        Commands::Booklet { recipe } => {
            let config = BookletConfig::load(&recipe)
                .with_context(|| format!("loading recipe {}", recipe.display()))?;
            booklet::run(&config)?;
            println!("Booklet → {}", config.output.display());
        }
    }

    Ok(())
}
