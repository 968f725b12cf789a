//! Structural page copying
//!
//! Pages are copied object for object: content streams, fonts, images and
//! annotations arrive in the output exactly as they were in the source.

use super::xobject::{ObjectCache, copy_object_deep, inherited_attribute};
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copies pages of one source document into an output document.
///
/// Objects shared between pages (fonts, images) are copied once per source.
pub struct PageCopier<'a> {
    source: &'a Document,
    cache: ObjectCache,
}

impl<'a> PageCopier<'a> {
    pub fn new(source: &'a Document) -> Self {
        Self {
            source,
            cache: ObjectCache::new(),
        }
    }

    /// Reserve output ids for pages that are about to be copied.
    ///
    /// Annotations link back to their page (`/P`) and link actions point at other
    /// pages. Reserving every selected page first lets those references resolve to
    /// the copies instead of being dropped.
    pub fn reserve_pages(&mut self, output: &mut Document, page_ids: &[ObjectId]) {
        for page_id in page_ids {
            if !self.cache.contains_key(page_id) {
                let new_id = output.new_object_id();
                self.cache.insert(*page_id, new_id);
            }
        }
    }

    /// Copy one page under `parent` and return the id of the copy.
    ///
    /// Inherited attributes are made explicit on the copy since the page no longer
    /// sits under its original ancestors. A page copied twice gets two distinct
    /// page objects sharing their resources.
    pub fn copy_page(
        &mut self,
        output: &mut Document,
        page_id: ObjectId,
        parent: ObjectId,
    ) -> Result<ObjectId> {
        let new_id = match self.cache.get(&page_id) {
            Some(&id) if !output.objects.contains_key(&id) => id,
            _ => {
                let id = output.new_object_id();
                self.cache.entry(page_id).or_insert(id);
                id
            }
        };

        let page_dict = self.source.get_dictionary(page_id)?;
        let mut new_page = Dictionary::new();
        for (key, value) in page_dict.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            let copied = copy_object_deep(output, self.source, value, &mut self.cache)?;
            new_page.set(key.clone(), copied);
        }

        for key in INHERITABLE_KEYS {
            if new_page.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(self.source, page_id, key) {
                let copied = copy_object_deep(output, self.source, value, &mut self.cache)?;
                new_page.set(key, copied);
            }
        }

        new_page.set("Parent", Object::Reference(parent));
        output.objects.insert(new_id, Object::Dictionary(new_page));

        Ok(new_id)
    }
}
