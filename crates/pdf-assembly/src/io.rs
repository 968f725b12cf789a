//! Document I/O operations
//!
//! Source documents are loaded whole and the file handle is released before the
//! loader returns, so no handle outlives the read it was opened for.

use crate::constants::PDF_VERSION;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;

/// Load a single PDF document
pub fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let doc = Document::load(path).map_err(|source| AssemblyError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    if doc.trailer.has(b"Encrypt") {
        return Err(AssemblyError::Config(format!(
            "'{}' is encrypted; protected PDFs are not supported",
            path.display()
        )));
    }

    log::debug!("Loaded {} ({} pages)", path.display(), doc.get_pages().len());
    Ok(doc)
}

/// Load multiple PDF documents
pub fn load_multiple_pdfs(paths: &[impl AsRef<Path>]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for path in paths {
        documents.push(load_pdf(path)?);
    }
    Ok(documents)
}

/// Save a document, replacing any existing file
pub fn save_pdf(doc: &mut Document, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    std::fs::write(path.as_ref(), writer)?;
    Ok(())
}

/// Number of pages in the PDF at `path`
pub fn page_count(path: impl AsRef<Path>) -> Result<usize> {
    Ok(load_pdf(path)?.get_pages().len())
}

/// Page object ids in page order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Create an empty output document with its page tree root allocated
pub(crate) fn new_output_document() -> (Document, ObjectId) {
    let mut output = Document::with_version(PDF_VERSION);
    let pages_id = output.new_object_id();
    (output, pages_id)
}

/// Write the page tree root and catalog for `page_refs` (already parented to
/// `pages_tree_id`) and point the trailer at them.
pub(crate) fn finalize_document(
    output: &mut Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
) {
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", Object::Reference(catalog_id));
}
