//! JSON booklet recipes

use pdf_assembly::{AssemblyError, AssemblyPlan, FoldScheme, PageRange, PageSize, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything needed to build one booklet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookletConfig {
    /// Word-processor documents exported to PDF before merging
    #[serde(default)]
    pub documents: Vec<DocumentExport>,
    pub plan: AssemblyPlan,
    /// Where to keep the merged document; a temporary file when absent
    #[serde(default)]
    pub assembled: Option<PathBuf>,
    /// The imposed print file
    pub output: PathBuf,
    #[serde(default)]
    pub page_size: PageSizeInches,
    #[serde(default)]
    pub numbering: Numbering,
    #[serde(default)]
    pub titles: Titles,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub fonts: Vec<FontFile>,
    #[serde(default)]
    pub folds: FoldScheme,
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    /// LibreOffice executable
    #[serde(default = "default_soffice")]
    pub soffice: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentExport {
    pub document: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageSizeInches {
    pub width_in: f32,
    pub height_in: f32,
}

impl Default for PageSizeInches {
    fn default() -> Self {
        Self {
            width_in: 5.5,
            height_in: 8.5,
        }
    }
}

impl From<PageSizeInches> for PageSize {
    fn from(size: PageSizeInches) -> Self {
        PageSize::from_inches(size.width_in, size.height_in)
    }
}

/// Page numbers centred in the footer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Numbering {
    /// First 0-based page index that gets a number
    pub first_page: usize,
    /// Pages left unnumbered, e.g. inserts and blank pages
    pub skip: Vec<PageRange>,
    pub font: String,
    pub font_size: f32,
    /// Baseline height above the bottom edge
    pub y: f32,
}

impl Default for Numbering {
    fn default() -> Self {
        Self {
            first_page: 2,
            skip: Vec::new(),
            font: "Helvetica".to_string(),
            font_size: 10.0,
            y: 16.0,
        }
    }
}

/// Section titles in the header, on the outer edge of each page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Titles {
    pub font: String,
    pub korean_font: String,
    pub font_size: f32,
    pub margin_x: f32,
    /// Baseline depth below the top edge
    pub offset_top: f32,
}

impl Default for Titles {
    fn default() -> Self {
        Self {
            font: "Helvetica".to_string(),
            korean_font: "Korean".to_string(),
            font_size: 14.0,
            margin_x: 32.0,
            offset_top: 24.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(flatten)]
    pub anchor: SectionAnchor,
}

/// Page a section title is printed on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionAnchor {
    /// A 0-based page index of the assembled document
    Page(usize),
    /// The first assembled page taken from this plan file
    Source(PathBuf),
}

/// A font program registered under `name`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontFile {
    pub name: String,
    pub path: PathBuf,
}

fn default_soffice() -> PathBuf {
    PathBuf::from("soffice")
}

impl BookletConfig {
    /// Load a recipe, resolving relative paths against its directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let mut config: BookletConfig = serde_json::from_slice(&bytes).map_err(|e| {
            AssemblyError::Config(format!("Failed to parse recipe {}: {}", path.display(), e))
        })?;

        let base = path.parent().unwrap_or(Path::new(""));
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        for export in &mut self.documents {
            resolve(&mut export.document);
            resolve(&mut export.output);
        }
        for spec in &mut self.plan.sources {
            spec.files.iter_mut().for_each(resolve);
        }
        if let Some(assembled) = &mut self.assembled {
            resolve(assembled);
        }
        resolve(&mut self.output);
        for section in &mut self.sections {
            if let SectionAnchor::Source(file) = &mut section.anchor {
                resolve(file);
            }
        }
        for font in &mut self.fonts {
            resolve(&mut font.path);
        }
        if let Some(dir) = &mut self.temp_dir {
            resolve(dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.plan.sources.is_empty() {
            return Err(AssemblyError::Config("Recipe has an empty plan".to_string()));
        }
        if self.page_size.width_in <= 0.0 || self.page_size.height_in <= 0.0 {
            return Err(AssemblyError::Config(format!(
                "Invalid page size {}x{} in",
                self.page_size.width_in, self.page_size.height_in
            )));
        }
        if self.assembled.as_ref() == Some(&self.output) {
            return Err(AssemblyError::Config(
                "The assembled document and the output must differ".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RECIPE: &str = r#"{
        "documents": [{ "document": "master.docx", "output": "master.pdf" }],
        "plan": [
            { "files": "master.pdf", "ranges": [[0, 29]] },
            { "files": ["blank.pdf", "pastor.pdf", "km.pdf"] },
            { "files": "master.pdf", "ranges": [[31, 0]] }
        ],
        "output": "out/booklet-imp.pdf",
        "numbering": { "skip": [[29, 32]] },
        "sections": [
            { "title": "사역자", "source": "pastor.pdf" },
            { "title": "Youth Group", "page": 40 }
        ],
        "fonts": [{ "name": "Korean", "path": "/usr/share/fonts/NanumGothic.ttf" }]
    }"#;

    fn write_recipe(dir: &TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("booklet.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_load_recipe() {
        let dir = TempDir::new().unwrap();
        let config = BookletConfig::load(write_recipe(&dir, RECIPE)).unwrap();

        assert_eq!(config.plan.sources.len(), 3);
        assert_eq!(config.plan.sources[0].files, vec![dir.path().join("master.pdf")]);
        assert_eq!(config.plan.sources[0].ranges, Some(vec![PageRange::new(0, 29)]));
        assert_eq!(config.plan.sources[1].files.len(), 3);
        assert_eq!(config.plan.sources[2].ranges, Some(vec![PageRange::new(31, 0)]));

        assert_eq!(config.documents[0].document, dir.path().join("master.docx"));
        assert_eq!(config.output, dir.path().join("out/booklet-imp.pdf"));
        assert_eq!(
            config.sections[0].anchor,
            SectionAnchor::Source(dir.path().join("pastor.pdf"))
        );
        assert_eq!(config.sections[1].anchor, SectionAnchor::Page(40));
        // Absolute paths are left alone
        assert_eq!(
            config.fonts[0].path,
            PathBuf::from("/usr/share/fonts/NanumGothic.ttf")
        );
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let config = BookletConfig::load(write_recipe(&dir, RECIPE)).unwrap();

        assert_eq!(config.assembled, None);
        assert_eq!(config.folds, FoldScheme::Horizontal);
        assert_eq!(config.soffice, PathBuf::from("soffice"));
        assert_eq!(config.numbering.first_page, 2);
        assert_eq!(config.numbering.skip, vec![PageRange::new(29, 32)]);
        assert_eq!(config.numbering.font, "Helvetica");
        assert_eq!(config.titles.korean_font, "Korean");
        assert_eq!(config.titles.margin_x, 32.0);

        let size = PageSize::from(config.page_size);
        assert_eq!(size, PageSize::new(396.0, 612.0));
    }

    #[test]
    fn test_malformed_recipe_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write_recipe(&dir, r#"{ "plan": [], "output": 3 }"#);
        assert!(matches!(BookletConfig::load(path), Err(AssemblyError::Config(_))));
    }

    #[test]
    fn test_empty_plan_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_recipe(&dir, r#"{ "plan": [], "output": "out.pdf" }"#);
        assert!(matches!(BookletConfig::load(path), Err(AssemblyError::Config(_))));
    }

    #[test]
    fn test_output_must_not_overwrite_assembled() {
        let dir = TempDir::new().unwrap();
        let path = write_recipe(
            &dir,
            r#"{ "plan": [{ "files": "a.pdf" }], "assembled": "x.pdf", "output": "x.pdf" }"#,
        );
        assert!(matches!(BookletConfig::load(path), Err(AssemblyError::Config(_))));
    }

    #[test]
    fn test_missing_recipe() {
        assert!(matches!(
            BookletConfig::load("/no/such/booklet.json"),
            Err(AssemblyError::Io(_))
        ));
    }
}
