//! Assembly plans: which pages of which files, in which order

use crate::io::page_count;
use crate::range::PageRange;
use crate::types::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// One or more source files sharing a page selection.
///
/// `ranges` apply, in order, to every file of `files`. `None` selects every page.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourceSpec {
    #[cfg_attr(feature = "serde", serde(with = "one_or_many"))]
    pub files: Vec<PathBuf>,
    pub ranges: Option<Vec<PageRange>>,
    pub front_cover: CoverPrint,
    pub back_cover: CoverPrint,
}

impl SourceSpec {
    /// All pages of a single file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::files([path])
    }

    /// All pages of several files, in order
    pub fn files<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            files: paths.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_ranges(mut self, ranges: impl IntoIterator<Item = PageRange>) -> Self {
        self.ranges = Some(ranges.into_iter().collect());
        self
    }

    pub fn with_covers(mut self, front: CoverPrint, back: CoverPrint) -> Self {
        self.front_cover = front;
        self.back_cover = back;
        self
    }

    /// Resolve this spec's page selection against a document of `num_pages` pages.
    ///
    /// Returns the selected 0-based indices in range order, then index order.
    pub fn select_pages(&self, path: &Path, num_pages: usize) -> Result<Vec<usize>> {
        let ranges = match &self.ranges {
            None => return Ok((0..num_pages).collect()),
            Some(ranges) => ranges,
        };

        let mut selected = Vec::new();
        for range in ranges {
            let resolved =
                range
                    .resolve(num_pages)
                    .ok_or_else(|| AssemblyError::InvalidPageRange {
                        path: path.to_path_buf(),
                        range: *range,
                        pages: num_pages,
                    })?;
            selected.extend(resolved);
        }
        Ok(selected)
    }
}

/// Where one file of one source spec lands in the assembled output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedSource {
    /// Index of the source spec in the plan
    pub spec: usize,
    pub file: PathBuf,
    /// Output page indices occupied by this file's selected pages
    pub pages: Range<usize>,
}

/// An ordered sequence of source specs defining the output page sequence
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AssemblyPlan {
    pub sources: Vec<SourceSpec>,
}

impl AssemblyPlan {
    pub fn new(sources: Vec<SourceSpec>) -> Self {
        Self { sources }
    }

    pub fn push(&mut self, source: SourceSpec) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Output span of every (source spec, file) pair, probing each file's page count
    pub fn layout(&self) -> Result<Vec<PlacedSource>> {
        let mut placed = Vec::new();
        let mut cursor = 0;

        for (spec_idx, spec) in self.sources.iter().enumerate() {
            for file in &spec.files {
                let num_pages = page_count(file)?;
                let selected = spec.select_pages(file, num_pages)?.len();
                placed.push(PlacedSource {
                    spec: spec_idx,
                    file: file.clone(),
                    pages: cursor..cursor + selected,
                });
                cursor += selected;
            }
        }

        Ok(placed)
    }

    /// Number of pages a merge of this plan produces
    pub fn selected_page_count(&self) -> Result<usize> {
        Ok(self
            .layout()?
            .last()
            .map(|placed| placed.pages.end)
            .unwrap_or(0))
    }
}

impl FromIterator<SourceSpec> for AssemblyPlan {
    fn from_iter<I: IntoIterator<Item = SourceSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Accept either a single path or a list of paths
#[cfg(feature = "serde")]
mod one_or_many {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::path::PathBuf;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(PathBuf),
        Many(Vec<PathBuf>),
    }

    pub fn serialize<S: Serializer>(files: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error> {
        files.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PathBuf>, D::Error> {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(file) => vec![file],
            OneOrMany::Many(files) => files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ranges_selects_everything() {
        let spec = SourceSpec::file("a.pdf");
        assert_eq!(spec.select_pages(Path::new("a.pdf"), 4).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_ranges_keep_listed_order() {
        let spec = SourceSpec::file("a.pdf")
            .with_ranges([PageRange::new(3, 0), PageRange::new(0, 2)]);
        assert_eq!(
            spec.select_pages(Path::new("a.pdf"), 5).unwrap(),
            vec![3, 4, 0, 1]
        );
    }

    #[test]
    fn test_invalid_range_names_the_file() {
        let spec = SourceSpec::file("a.pdf").with_ranges([PageRange::new(0, 9)]);
        let err = spec.select_pages(Path::new("a.pdf"), 5).unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::InvalidPageRange { pages: 5, .. }
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_single_file_and_tuple_ranges() {
        let json = r#"[
            {"files": "cover.pdf", "front_cover": "print-front"},
            {"files": ["a.pdf", "b.pdf"], "ranges": [[0, 29], [31, 0]]}
        ]"#;
        let plan: AssemblyPlan = serde_json::from_str(json).unwrap();

        assert_eq!(plan.sources.len(), 2);
        assert_eq!(plan.sources[0].files, vec![PathBuf::from("cover.pdf")]);
        assert_eq!(plan.sources[0].ranges, None);
        assert_eq!(plan.sources[0].front_cover, CoverPrint::PrintFront);
        assert_eq!(plan.sources[1].files.len(), 2);
        assert_eq!(
            plan.sources[1].ranges,
            Some(vec![PageRange::new(0, 29), PageRange::new(31, 0)])
        );
    }
}
