//! Content overlay engine
//!
//! Page *i* of every later input is drawn on top of page *i* of the first input.
//! Layers are embedded as Form XObjects in their own coordinate system, so a layer
//! page lines up with the base page at the origin. The base page keeps its
//! geometry and its original content stream, which is wrapped in `q`/`Q` so any
//! graphics state it leaves behind cannot leak into the layers.

use crate::command::{Command, Outputs};
use crate::io::{load_multiple_pdfs, page_ids, save_pdf};
use crate::render::{ObjectCache, create_page_xobject, inherited_attribute};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::{Path, PathBuf};

/// Overlay the pages of `inputs[1..]` onto the pages of `inputs[0]`.
///
/// All inputs must have the same page count; nothing is padded or truncated.
pub fn overlay_files(inputs: &[impl AsRef<Path>]) -> Result<Document> {
    let mut documents = load_multiple_pdfs(inputs)?;
    if documents.is_empty() {
        return Err(AssemblyError::Config(
            "overlay needs at least one input".into(),
        ));
    }

    let expected = documents[0].get_pages().len();
    for (path, doc) in inputs.iter().zip(&documents).skip(1) {
        let found = doc.get_pages().len();
        if found != expected {
            return Err(AssemblyError::PageCountMismatch {
                path: path.as_ref().to_path_buf(),
                expected,
                found,
            });
        }
    }

    let layers = documents.split_off(1);
    let mut base = documents.remove(0);
    overlay_documents(&mut base, &layers)?;
    Ok(base)
}

/// Draw every layer onto `base` in place, later layers on top.
///
/// Every layer must have exactly as many pages as `base`; on a mismatch `base` is
/// left untouched.
pub fn overlay_documents(base: &mut Document, layers: &[Document]) -> Result<()> {
    let base_pages = page_ids(base);
    for (layer, doc) in layers.iter().enumerate() {
        let found = doc.get_pages().len();
        if found != base_pages.len() {
            return Err(AssemblyError::LayerPageCountMismatch {
                layer,
                expected: base_pages.len(),
                found,
            });
        }
    }

    let mut next_name = 0;

    for layer in layers {
        let layer_pages = page_ids(layer);
        let mut cache = ObjectCache::new();

        for (&base_page, &layer_page) in base_pages.iter().zip(&layer_pages) {
            let xobject_id = create_page_xobject(base, layer, layer_page, &mut cache)?;
            stamp_xobject(base, base_page, xobject_id, &mut next_name)?;
        }
    }

    Ok(())
}

/// Append a `Do` of `xobject_id` to a page's content, registering the XObject
/// under a name that is unused in the page's resources.
fn stamp_xobject(
    doc: &mut Document,
    page_id: ObjectId,
    xobject_id: ObjectId,
    next_name: &mut usize,
) -> Result<()> {
    let mut resources = resolve_dictionary(doc, inherited_attribute(doc, page_id, b"Resources"));
    let mut xobjects = resolve_dictionary(doc, resources.get(b"XObject").ok());

    let name = loop {
        let candidate = format!("Ovl{}", next_name);
        *next_name += 1;
        if !xobjects.has(candidate.as_bytes()) {
            break candidate;
        }
    };
    xobjects.set(name.as_bytes(), Object::Reference(xobject_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut contents = content_references(doc, page_id);
    let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let draw = doc.add_object(Stream::new(
        Dictionary::new(),
        format!("\nQ\nq /{} Do Q\n", name).into_bytes(),
    ));
    contents.insert(0, Object::Reference(open));
    contents.push(Object::Reference(draw));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));
    Ok(())
}

/// Clone a dictionary given directly or by reference; anything else is empty
fn resolve_dictionary(doc: &Document, obj: Option<&Object>) -> Dictionary {
    match obj {
        Some(Object::Dictionary(dict)) => dict.clone(),
        Some(Object::Reference(id)) => doc
            .get_dictionary(*id)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new()),
        _ => Dictionary::new(),
    }
}

/// The page's content streams as a list of references
fn content_references(doc: &Document, page_id: ObjectId) -> Vec<Object> {
    let contents = match doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Contents"))
    {
        Ok(contents) => contents,
        Err(_) => return Vec::new(),
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(arr)) => arr.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Object::Array(arr) => arr.clone(),
        _ => Vec::new(),
    }
}

/// Overlay stage: superimposes same-indexed pages of its inputs
pub struct OverlayCommand {
    inputs: Vec<PathBuf>,
    output: Outputs,
}

impl OverlayCommand {
    /// `inputs[0]` is the base; `None` writes to a temporary file owned by the command
    pub fn new(output: Option<PathBuf>, inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            output: Outputs::single(output),
        }
    }
}

impl Command for OverlayCommand {
    type Error = AssemblyError;

    fn stage(&self) -> &'static str {
        "overlay"
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
            .ok_or_else(|| AssemblyError::Config("overlay needs an output file".into()))?;
        log::info!("Merging PDF contents into {}", target.display());

        let mut doc = overlay_files(&self.inputs)?;
        save_pdf(&mut doc, target)
    }
}
