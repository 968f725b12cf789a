//! Per-page text layer generation

use crate::fonts::{FontRegistry, FontSource};
use crate::types::*;
use pdf_assembly::{Command, Outputs, PageSize};
use printpdf::*;
use std::collections::HashMap;
use std::path::PathBuf;

/// Produce a PDF with `num_pages` pages of `page_size` holding only the text that
/// `content` returns for each page index.
///
/// Pages without text are still emitted so the layer lines up page for page with
/// the document it will be overlaid on.
pub fn generate_text_layer<F>(
    num_pages: usize,
    page_size: PageSize,
    fonts: &FontRegistry,
    content: F,
) -> Result<Vec<u8>>
where
    F: Fn(usize) -> Vec<OverlayText>,
{
    let mut doc = PdfDocument::new("Text layer");
    let mut embedded: HashMap<String, FontId> = HashMap::new();
    let mut pages = Vec::with_capacity(num_pages);

    for page_index in 0..num_pages {
        let mut ops = Vec::new();
        for item in content(page_index) {
            write_text(&mut doc, &mut embedded, fonts, &item, &mut ops)?;
        }

        pages.push(PdfPage::new(
            Mm::from(Pt(page_size.width_pt)),
            Mm::from(Pt(page_size.height_pt)),
            ops,
        ));
    }

    doc.pages = pages;

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    let errors = log_save_warnings(&warnings);
    log::debug!("Text layer: {} pages, {} save errors", num_pages, errors);

    Ok(bytes)
}

/// Forward printpdf's save diagnostics; errors mean something was dropped from the
/// output, such as a glyph missing from a font subset
fn log_save_warnings(warnings: &[PdfWarnMsg]) -> usize {
    let mut errors = 0;
    for warning in warnings {
        match warning.severity {
            PdfParseErrorSeverity::Error => {
                errors += 1;
                log::warn!("Text layer page {}: {}", warning.page + 1, warning.msg);
            }
            _ => log::debug!("Text layer page {}: {}", warning.page + 1, warning.msg),
        }
    }
    errors
}

fn write_text(
    doc: &mut PdfDocument,
    embedded: &mut HashMap<String, FontId>,
    fonts: &FontRegistry,
    item: &OverlayText,
    ops: &mut Vec<Op>,
) -> Result<()> {
    let source = fonts.get(&item.font)?;
    let width = fonts.text_width(&item.font, &item.text, item.font_size)?;
    let x = item.align.left_edge(item.x, width);

    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x),
            y: Pt(item.y),
        },
    });

    match source {
        FontSource::Builtin(face) => {
            ops.push(Op::SetFontSizeBuiltinFont {
                font: face.pdf_font(),
                size: Pt(item.font_size),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(item.text.clone())],
                font: face.pdf_font(),
            });
        }
        FontSource::External(external) => {
            // Each font program is embedded once per document
            let font_id = embedded
                .entry(item.font.clone())
                .or_insert_with(|| doc.add_font(external.parsed()))
                .clone();
            ops.push(Op::SetFontSize {
                size: Pt(item.font_size),
                font: font_id.clone(),
            });
            ops.push(Op::WriteText {
                items: vec![TextItem::Text(item.text.clone())],
                font: font_id,
            });
        }
    }

    ops.push(Op::EndTextSection);
    Ok(())
}

/// Writes a generated text layer to its output
pub struct TextLayerCommand<'a, F>
where
    F: Fn(usize) -> Vec<OverlayText>,
{
    output: Outputs,
    num_pages: usize,
    page_size: PageSize,
    fonts: &'a FontRegistry,
    content: F,
}

impl<'a, F> TextLayerCommand<'a, F>
where
    F: Fn(usize) -> Vec<OverlayText>,
{
    pub fn new(
        output: Option<PathBuf>,
        num_pages: usize,
        page_size: PageSize,
        fonts: &'a FontRegistry,
        content: F,
    ) -> Self {
        Self {
            output: Outputs::single(output),
            num_pages,
            page_size,
            fonts,
            content,
        }
    }

    pub fn num_pages(&self) -> usize {
        self.num_pages
    }
}

impl<F> Command for TextLayerCommand<'_, F>
where
    F: Fn(usize) -> Vec<OverlayText>,
{
    type Error = TextLayerError;

    fn stage(&self) -> &'static str {
        "text layer"
    }

    fn outputs(&self) -> &Outputs {
        &self.output
    }

    fn outputs_mut(&mut self) -> &mut Outputs {
        &mut self.output
    }

    fn run(&mut self, outputs: &[PathBuf]) -> Result<()> {
        let target = outputs.first().ok_or_else(|| {
            pdf_assembly::AssemblyError::Config("text layer needs an output file".into())
        })?;
        log::info!("Generating text layer into {}", target.display());

        let bytes =
            generate_text_layer(self.num_pages, self.page_size, self.fonts, &self.content)?;
        std::fs::write(target, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_font_fails_before_writing() {
        let fonts = FontRegistry::new();
        let result = generate_text_layer(2, PageSize::new(300.0, 400.0), &fonts, |_| {
            vec![OverlayText::new("1", "Helvetica", 10.0)]
        });
        assert!(matches!(result, Err(TextLayerError::UnknownFont(_))));
    }

    #[test]
    fn test_zero_pages_is_not_an_error() {
        let fonts = FontRegistry::with_builtin_fonts();
        let bytes = generate_text_layer(0, PageSize::new(300.0, 400.0), &fonts, |_| Vec::new())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_save_errors_are_counted() {
        let warnings = vec![
            PdfWarnMsg {
                page: 0,
                op_id: 3,
                severity: PdfParseErrorSeverity::Error,
                msg: "glyph not in subset".to_string(),
            },
            PdfWarnMsg {
                page: 1,
                op_id: 0,
                severity: PdfParseErrorSeverity::Info,
                msg: "font subset built".to_string(),
            },
        ];
        assert_eq!(log_save_warnings(&warnings), 1);
        assert_eq!(log_save_warnings(&[]), 0);
    }

    #[test]
    fn test_text_needs_coverage_in_its_font() {
        let fonts = FontRegistry::with_builtin_fonts();
        let result = generate_text_layer(1, PageSize::new(300.0, 400.0), &fonts, |_| {
            vec![OverlayText::new("한국어", "Helvetica", 10.0)]
        });
        assert!(matches!(
            result,
            Err(TextLayerError::UnsupportedText { ch: '한', .. })
        ));
    }
}
