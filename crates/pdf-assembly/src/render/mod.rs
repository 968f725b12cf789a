//! PDF object-level operations shared by the pipeline stages
//!
//! - Copying whole pages between documents
//! - Creating Form XObjects from source pages
//! - Deep copying PDF objects
//! - Reading page geometry

mod page;
mod xobject;

pub use page::PageCopier;
pub use xobject::{
    ObjectCache, copy_object_deep, create_page_xobject, get_page_box, get_page_dimensions,
};
pub(crate) use xobject::inherited_attribute;
