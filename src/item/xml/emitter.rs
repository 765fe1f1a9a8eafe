use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;

use crate::error::BatchError;

/// Markup emission handle handed to an [`XmlItemMapper`](super::XmlItemMapper).
///
/// The emitter owns the in-memory buffer of one XML document. Mappers append
/// events to it; they never see the buffer itself.
///
/// # Examples
///
/// ```
/// use xml_batch_rs::item::xml::XmlEmitter;
///
/// let mut emitter = XmlEmitter::new();
/// emitter.start("document").unwrap();
/// emitter.element("id", "1").unwrap();
/// emitter.end("document").unwrap();
///
/// assert_eq!(emitter.as_bytes(), b"<document><id>1</id></document>");
/// ```
pub struct XmlEmitter {
    writer: Writer<Vec<u8>>,
}

impl XmlEmitter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    /// Writes the opening tag of `name`.
    pub fn start(&mut self, name: &str) -> Result<(), BatchError> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    /// Writes the opening tag of `name` carrying the given attributes.
    pub fn start_with_attributes(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), BatchError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Start(start))
    }

    /// Writes escaped character data.
    pub fn text(&mut self, content: &str) -> Result<(), BatchError> {
        self.write(Event::Text(BytesText::new(content)))
    }

    /// Writes the closing tag of `name`.
    pub fn end(&mut self, name: &str) -> Result<(), BatchError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Writes `<name>content</name>`.
    pub fn element(&mut self, name: &str, content: &str) -> Result<(), BatchError> {
        self.start(name)?;
        self.text(content)?;
        self.end(name)
    }

    /// Writes `<name/>`.
    pub fn empty(&mut self, name: &str) -> Result<(), BatchError> {
        self.write(Event::Empty(BytesStart::new(name)))
    }

    /// Serializes `item` with serde, wrapped in a `tag` element.
    ///
    /// Fields renamed with a leading `@` become attributes, as with any
    /// quick-xml serialization.
    pub fn serialize<T: Serialize>(&mut self, tag: &str, item: &T) -> Result<(), BatchError> {
        self.writer
            .write_serializable(tag, item)
            .map_err(|e| BatchError::Mapping(format!("Failed to serialize XML item: {}", e)))
    }

    /// Number of bytes emitted so far.
    pub fn len(&self) -> usize {
        self.writer.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writer.get_ref().is_empty()
    }

    /// Bytes emitted so far.
    pub fn as_bytes(&self) -> &[u8] {
        self.writer.get_ref()
    }

    pub(crate) fn declaration(&mut self, encoding: &str) -> Result<(), BatchError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding), None)))
            .map_err(|e| {
                BatchError::Initialization(format!("Failed to write XML declaration: {}", e))
            })
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), BatchError> {
        self.writer
            .write_event(event)
            .map_err(|e| BatchError::Mapping(format!("Failed to write XML event: {}", e)))
    }
}

impl Default for XmlEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Book {
        #[serde(rename = "@isbn")]
        isbn: String,
        title: String,
    }

    fn content(emitter: &XmlEmitter) -> String {
        String::from_utf8(emitter.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_declaration() {
        let mut emitter = XmlEmitter::new();
        emitter.declaration("UTF-8").unwrap();

        assert_eq!(
            content(&emitter),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>"
        );
        assert_eq!(emitter.len(), 38);
    }

    #[test]
    fn test_nested_elements() {
        let mut emitter = XmlEmitter::new();
        emitter.start("document").unwrap();
        emitter.element("id", "1").unwrap();
        emitter.element("title", "Title").unwrap();
        emitter.empty("draft").unwrap();
        emitter.end("document").unwrap();

        assert_eq!(
            content(&emitter),
            "<document><id>1</id><title>Title</title><draft/></document>"
        );
    }

    #[test]
    fn test_attributes() {
        let mut emitter = XmlEmitter::new();
        emitter
            .start_with_attributes("document", &[("id", "7"), ("lang", "en")])
            .unwrap();
        emitter.end("document").unwrap();

        assert_eq!(
            content(&emitter),
            "<document id=\"7\" lang=\"en\"></document>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let mut emitter = XmlEmitter::new();
        emitter.element("name", "Fish & <Chips>").unwrap();

        let xml = content(&emitter);
        assert!(xml.contains("Fish &amp; &lt;Chips&gt;"));
    }

    #[test]
    fn test_serialize() {
        let mut emitter = XmlEmitter::new();
        let book = Book {
            isbn: "978-0".to_string(),
            title: "Dune".to_string(),
        };
        emitter.serialize("book", &book).unwrap();

        assert_eq!(
            content(&emitter),
            "<book isbn=\"978-0\"><title>Dune</title></book>"
        );
    }

    #[test]
    fn test_empty_emitter() {
        let emitter = XmlEmitter::default();
        assert!(emitter.is_empty());
        assert_eq!(emitter.len(), 0);
        assert!(emitter.into_bytes().is_empty());
    }
}
