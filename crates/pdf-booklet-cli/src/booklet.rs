//! The full booklet pipeline: export, merge, text layer, overlay, impose

use crate::config::{BookletConfig, SectionAnchor};
use anyhow::{Context, Result, anyhow, bail};
use pdf_assembly::sources::{ExportCommand, SofficeExporter};
use pdf_assembly::{
    Command, ImposeCommand, MergeCommand, OverlayCommand, PageSize, PlacedSource,
};
use pdf_textlayer::{FontChooser, FontRegistry, OverlayText, TextAlign, TextLayerCommand};
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Decides the numbering and section titles drawn on each page
pub struct PageDecorator<'a> {
    config: &'a BookletConfig,
    page_size: PageSize,
    skipped: Vec<Range<usize>>,
    titles: BTreeMap<usize, String>,
    chooser: FontChooser,
}

impl<'a> PageDecorator<'a> {
    /// Fails when a `numbering.skip` range does not fit a `num_pages` document
    pub fn new(
        config: &'a BookletConfig,
        num_pages: usize,
        titles: BTreeMap<usize, String>,
    ) -> Result<Self> {
        let skipped = config
            .numbering
            .skip
            .iter()
            .map(|range| {
                range.resolve(num_pages).ok_or_else(|| {
                    anyhow!(
                        "numbering skip range {} is invalid for a {}-page document",
                        range,
                        num_pages
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            page_size: config.page_size.into(),
            skipped,
            titles,
            chooser: FontChooser::new(&config.titles.font, &config.titles.korean_font),
        })
    }

    fn is_numbered(&self, page_index: usize) -> bool {
        page_index >= self.config.numbering.first_page
            && !self.skipped.iter().any(|range| range.contains(&page_index))
    }

    pub fn content(&self, page_index: usize) -> Vec<OverlayText> {
        let mut items = Vec::new();

        if self.is_numbered(page_index) {
            let numbering = &self.config.numbering;
            items.push(
                OverlayText::new(
                    (page_index + 1).to_string(),
                    &numbering.font,
                    numbering.font_size,
                )
                .at(self.page_size.width_pt / 2.0, numbering.y)
                .aligned(TextAlign::Center),
            );
        }

        if let Some(title) = self.titles.get(&page_index) {
            let titles = &self.config.titles;
            // Titles sit on the outer edge: odd indices are left-hand pages
            let (x, align) = if page_index % 2 == 1 {
                (titles.margin_x, TextAlign::Left)
            } else {
                (self.page_size.width_pt - titles.margin_x, TextAlign::Right)
            };
            items.push(
                OverlayText::new(title.as_str(), self.chooser.font_for(title), titles.font_size)
                    .at(x, self.page_size.height_pt - titles.offset_top)
                    .aligned(align),
            );
        }

        items
    }
}

/// Map every section to the page index its title goes on
pub fn section_pages(
    config: &BookletConfig,
    layout: &[PlacedSource],
    num_pages: usize,
) -> Result<BTreeMap<usize, String>> {
    let mut titles = BTreeMap::new();

    for section in &config.sections {
        let page = match &section.anchor {
            SectionAnchor::Page(page) => *page,
            SectionAnchor::Source(file) => layout
                .iter()
                .find(|placed| placed.file == *file && !placed.pages.is_empty())
                .map(|placed| placed.pages.start)
                .ok_or_else(|| {
                    anyhow!(
                        "section '{}' refers to {}, which adds no pages to the plan",
                        section.title,
                        file.display()
                    )
                })?,
        };

        if page >= num_pages {
            bail!(
                "section '{}' is anchored on page {} of a {}-page document",
                section.title,
                page,
                num_pages
            );
        }
        titles.insert(page, section.title.clone());
    }

    Ok(titles)
}

fn use_temp_dir<C: Command>(cmd: &mut C, dir: Option<&Path>) {
    if let Some(dir) = dir {
        cmd.outputs_mut().set_temp_dir(dir);
    }
}

fn first_output<C: Command>(cmd: &C) -> Result<PathBuf> {
    cmd.output_path()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("{} stage produced no output", cmd.stage()))
}

/// Build the booklet described by `config`.
///
/// Intermediate files live in temporaries owned by their stage's command and are
/// removed when this function returns, whether it succeeds or not.
pub fn run(config: &BookletConfig) -> Result<()> {
    let temp_dir = config.temp_dir.as_deref();

    for export in &config.documents {
        let mut cmd = ExportCommand::new(
            SofficeExporter::new(&config.soffice),
            &export.document,
            Some(export.output.clone()),
        );
        cmd.execute().context("export stage")?;
    }

    // Read the layout before merging; `assembled` may overwrite one of the plan's inputs
    let layout = config.plan.layout().context("merge stage")?;

    let mut merge = MergeCommand::new(config.assembled.clone(), config.plan.clone());
    use_temp_dir(&mut merge, temp_dir);
    merge.execute().context("merge stage")?;
    let num_pages = merge.pages_written();
    if num_pages == 0 {
        bail!("merge stage selected no pages");
    }
    let assembled = first_output(&merge)?;

    let titles = section_pages(config, &layout, num_pages)?;

    let mut fonts = FontRegistry::with_builtin_fonts();
    for font in &config.fonts {
        fonts
            .register_file(&font.name, &font.path)
            .with_context(|| format!("loading font '{}'", font.name))?;
    }

    let decorator = PageDecorator::new(config, num_pages, titles)?;
    let mut layer = TextLayerCommand::new(
        None,
        num_pages,
        config.page_size.into(),
        &fonts,
        |page_index| decorator.content(page_index),
    );
    use_temp_dir(&mut layer, temp_dir);
    layer.execute().context("text layer stage")?;

    let mut overlay = OverlayCommand::new(None, vec![assembled, first_output(&layer)?]);
    use_temp_dir(&mut overlay, temp_dir);
    overlay.execute().context("overlay stage")?;

    let mut impose = ImposeCommand::new(
        Some(config.output.clone()),
        vec![first_output(&overlay)?],
        config.folds,
    );
    impose.execute().context("impose stage")?;

    if let Some(stats) = impose.statistics() {
        log::info!(
            "Booklet: {} pages on {} sheets, {} blank pages added",
            stats.source_pages,
            stats.output_sheets,
            stats.blank_pages_added
        );
    }

    Ok(())
}
