#![allow(dead_code)]

pub mod mocks;

pub use mocks::{MockReader, MockSink};

use serde::Serialize;
use xml_batch_rs::{BatchError, item::xml::XmlEmitter};

pub const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: u32,
    pub title: String,
    pub description: String,
}

impl Document {
    pub fn new(id: u32) -> Self {
        Document {
            id,
            title: "Title".to_string(),
            description: "Description".to_string(),
        }
    }
}

/// Writes a document element by element.
pub fn map_document(emitter: &mut XmlEmitter, document: &Document) -> Result<(), BatchError> {
    emitter.start("document")?;
    emitter.element("id", &document.id.to_string())?;
    emitter.element("title", &document.title)?;
    emitter.element("description", &document.description)?;
    emitter.end("document")
}

/// The markup produced by `map_document`.
pub fn document_xml(id: u32) -> String {
    format!(
        "<document><id>{}</id><title>Title</title><description>Description</description></document>",
        id
    )
}
