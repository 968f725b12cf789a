//! XObject creation and object copying between documents
//!
//! Pages from one document are placed into another either as whole pages (see
//! [`super::PageCopier`]) or as Form XObjects which can be drawn onto an existing
//! page with a transformation.

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MAX_PAGE_TREE_DEPTH};
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Maps source object ids to the ids of their copies in the output document
pub type ObjectCache = HashMap<ObjectId, ObjectId>;

/// Wrap a page of `source` as a Form XObject in `output`.
///
/// The form keeps the page's own coordinate system: its bounding box is the
/// page's MediaBox, so drawing it with an identity matrix reproduces the page at
/// its original position.
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut ObjectCache,
) -> Result<ObjectId> {
    let page = source.get_dictionary(page_id)?;
    let [x0, y0, x1, y1] = get_page_box(source, page_id);
    let content = get_page_content(source, page)?;

    let mut form = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Form".to_vec())),
        ("FormType", Object::Integer(1)),
    ]);
    form.set(
        "BBox",
        Object::Array(vec![
            Object::Real(x0),
            Object::Real(y0),
            Object::Real(x1),
            Object::Real(y1),
        ]),
    );

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources") {
        form.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(form, content)))
}

/// Decoded content of a page; several content streams are joined by newlines
fn get_page_content(doc: &Document, page: &Dictionary) -> Result<Vec<u8>> {
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(arr) => join_content_streams(doc, arr),
            _ => read_content_stream(doc, *id),
        },
        Object::Array(arr) => join_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

fn read_content_stream(doc: &Document, id: ObjectId) -> Result<Vec<u8>> {
    match doc.get_object(id)?.as_stream() {
        Ok(stream) => Ok(stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone())),
        Err(_) => Ok(Vec::new()),
    }
}

fn join_content_streams(doc: &Document, parts: &[Object]) -> Result<Vec<u8>> {
    let mut joined = Vec::new();
    for part in parts {
        if let Object::Reference(id) = part {
            joined.extend_from_slice(&read_content_stream(doc, *id)?);
            joined.push(b'\n');
        }
    }
    Ok(joined)
}

/// Copy `obj` into `output` together with everything it references.
///
/// Each referenced object is copied once; the id is reserved before its contents
/// are copied so reference cycles terminate. References to page tree nodes that
/// were not copied on purpose become `null` instead of dragging the whole source
/// page tree along. Dangling references also become `null`.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut ObjectCache,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let referenced = match source.get_object(*id) {
                Ok(referenced) => referenced,
                Err(_) => return Ok(Object::Null),
            };
            if is_page_tree_node(referenced) {
                return Ok(Object::Null);
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);
            let object = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, object);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary_deep(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let mut items = Vec::with_capacity(arr.len());
            for item in arr {
                items.push(copy_object_deep(output, source, item, cache)?);
            }
            Ok(Object::Array(items))
        }
        Object::Stream(stream) => {
            let mut new_stream = stream.clone();
            new_stream.dict = copy_dictionary_deep(output, source, &stream.dict, cache)?;
            Ok(Object::Stream(new_stream))
        }
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary_deep(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut ObjectCache,
) -> Result<Dictionary> {
    let mut copy = Dictionary::new();
    for (key, value) in dict.iter() {
        copy.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(copy)
}

fn is_page_tree_node(obj: &Object) -> bool {
    let dict = match obj {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}

/// Look up a page attribute, walking up the page tree for inheritable keys
/// (`Resources`, `MediaBox`, `CropBox`, `Rotate`).
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
    }

    None
}

/// The page's effective MediaBox as `[x0, y0, x1, y1]`, Letter when missing or malformed
pub fn get_page_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let default = [0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1];

    let media_box = match inherited_attribute(doc, page_id, b"MediaBox") {
        Some(Object::Reference(id)) => doc.get_object(*id).ok(),
        other => other,
    };
    let values = match media_box.and_then(|obj| obj.as_array().ok()) {
        Some(values) if values.len() == 4 => values,
        _ => return default,
    };

    let mut rect = default;
    for (slot, value) in rect.iter_mut().zip(values) {
        match as_number(value) {
            Some(n) => *slot = n,
            None => return default,
        }
    }
    rect
}

/// Page width and height in points
pub fn get_page_dimensions(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let [x0, y0, x1, y1] = get_page_box(doc, page_id);
    ((x1 - x0).abs(), (y1 - y0).abs())
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
