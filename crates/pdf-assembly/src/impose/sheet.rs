//! Drawing source pages onto sheet sides

use crate::render::{ObjectCache, create_page_xobject, get_page_box};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// (document index, page id) of a page placed on a sheet
pub(crate) type SourcePage = (usize, ObjectId);

/// Cell size shared by every sheet side
#[derive(Debug, Clone, Copy)]
pub(crate) struct CellSize {
    pub width: f32,
    pub height: f32,
}

/// Render one side of a sheet: the given pages side by side, left cell first.
///
/// Pages are drawn at their natural size, centred in their cell.
pub(crate) fn render_sheet_side(
    output: &mut Document,
    sources: &[Document],
    caches: &mut [ObjectCache],
    cells: &[Option<SourcePage>],
    cell: CellSize,
    parent: ObjectId,
) -> Result<ObjectId> {
    let sheet_width = cell.width * cells.len() as f32;
    let mut content = String::new();
    let mut xobjects = Dictionary::new();

    for (idx, slot) in cells.iter().enumerate() {
        let Some((doc_idx, page_id)) = *slot else {
            continue;
        };
        let source = &sources[doc_idx];

        let name = format!("P{}", idx);
        let form_id = create_page_xobject(output, source, page_id, &mut caches[doc_idx])?;
        xobjects.set(name.as_bytes(), Object::Reference(form_id));

        let [x0, y0, x1, y1] = get_page_box(source, page_id);
        let tx = idx as f32 * cell.width + (cell.width - (x1 - x0)) / 2.0 - x0;
        let ty = (cell.height - (y1 - y0)) / 2.0 - y0;
        content.push_str(&format!("q 1 0 0 1 {} {} cm /{} Do Q\n", tx, ty, name));
    }

    let contents_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
    let side = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(parent)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(sheet_width),
                Object::Real(cell.height),
            ]),
        ),
        ("Contents", Object::Reference(contents_id)),
        (
            "Resources",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "XObject",
                Object::Dictionary(xobjects),
            )])),
        ),
    ]);

    Ok(output.add_object(side))
}
