#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::{Path, PathBuf};

pub fn media_box(width: i64, height: i64) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width),
        Object::Integer(height),
    ])
}

/// Marker written into the content stream of page `index`
pub fn marker(label: &str, index: usize) -> String {
    format!("{}{}", label, index)
}

/// A document whose page `i` draws nothing but carries the comment `% {label}{i}`
pub fn create_test_pdf(label: &str, num_pages: usize) -> Document {
    create_sized_pdf(label, num_pages, 612, 792)
}

pub fn create_sized_pdf(label: &str, num_pages: usize, width: i64, height: i64) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!("% {}\nq Q\n", marker(label, i));
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", media_box(width, height)),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    finish(&mut doc, pages_id, kids, Dictionary::new());
    doc
}

/// Like [`create_test_pdf`], but MediaBox and a shared font resource live on the
/// page tree root and are inherited by every page.
pub fn create_inherited_pdf(label: &str, num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]));

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!(
            "% {}\nBT /F1 12 Tf 72 720 Td (page {}) Tj ET\n",
            marker(label, i),
            i
        );
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let inherited = Dictionary::from_iter(vec![
        ("MediaBox", media_box(420, 595)),
        ("Resources", Object::Reference(resources_id)),
    ]);
    finish(&mut doc, pages_id, kids, inherited);
    doc
}

/// Three pages; page 0 carries a text annotation pointing back at its page and a
/// link to page 2.
pub fn create_annotated_pdf(label: &str) -> Document {
    let mut doc = create_test_pdf(label, 3);
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

    let note_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Text".to_vec())),
        ("Rect", media_box(20, 20)),
        ("P", Object::Reference(pages[0])),
    ]));
    let link_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Link".to_vec())),
        ("Rect", media_box(40, 40)),
        (
            "Dest",
            Object::Array(vec![
                Object::Reference(pages[2]),
                Object::Name(b"Fit".to_vec()),
            ]),
        ),
    ]));

    doc.get_object_mut(pages[0])
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .set(
            "Annots",
            Object::Array(vec![Object::Reference(note_id), Object::Reference(link_id)]),
        );
    doc
}

fn finish(doc: &mut Document, pages_id: ObjectId, kids: Vec<Object>, mut pages: Dictionary) {
    let count = kids.len() as i64;
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Kids", Object::Array(kids));
    pages.set("Count", Object::Integer(count));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);
}

/// Save `doc` as `dir/name`
pub fn write_pdf(dir: &Path, name: &str, mut doc: Document) -> PathBuf {
    let path = dir.join(name);
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(&path, writer).unwrap();
    path
}

/// Content of every page, in page order
pub fn page_contents(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|id| String::from_utf8_lossy(&doc.get_page_content(id).unwrap()).into_owned())
        .collect()
}

/// Content of the Form XObject `name` drawn on `page_id`
pub fn xobject_content(doc: &Document, page_id: ObjectId, name: &str) -> String {
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = match page.get(b"Resources").unwrap() {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        obj => obj.as_dict().unwrap(),
    };
    let xobjects = match resources.get(b"XObject").unwrap() {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        obj => obj.as_dict().unwrap(),
    };
    let id = xobjects
        .get(name.as_bytes())
        .unwrap()
        .as_reference()
        .unwrap();
    let stream = doc.get_object(id).unwrap().as_stream().unwrap();
    String::from_utf8_lossy(&stream.content).into_owned()
}

/// Numeric MediaBox of a page
pub fn page_media_box(doc: &Document, page_id: ObjectId) -> Vec<f32> {
    doc.get_dictionary(page_id)
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|obj| obj.as_float().unwrap())
        .collect()
}
