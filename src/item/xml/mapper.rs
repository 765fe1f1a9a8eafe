use std::marker::PhantomData;

use serde::Serialize;

use crate::error::BatchError;

use super::emitter::XmlEmitter;

/// Maps one record to its XML representation.
///
/// The mapper appends the record's elements directly under the root element
/// of the current document. Any error aborts the current push.
///
/// Closures with the matching signature are mappers:
///
/// ```
/// use xml_batch_rs::item::xml::{XmlEmitter, XmlItemMapper};
/// use xml_batch_rs::BatchError;
///
/// struct Row {
///     id: u32,
/// }
///
/// let mapper = |emitter: &mut XmlEmitter, row: &Row| -> Result<(), BatchError> {
///     emitter.start("row")?;
///     emitter.element("id", &row.id.to_string())?;
///     emitter.end("row")
/// };
///
/// let mut emitter = XmlEmitter::new();
/// mapper.map(&mut emitter, &Row { id: 3 }).unwrap();
/// assert_eq!(emitter.as_bytes(), b"<row><id>3</id></row>");
/// ```
pub trait XmlItemMapper<T> {
    fn map(&self, emitter: &mut XmlEmitter, item: &T) -> Result<(), BatchError>;
}

impl<T, F> XmlItemMapper<T> for F
where
    F: Fn(&mut XmlEmitter, &T) -> Result<(), BatchError>,
{
    fn map(&self, emitter: &mut XmlEmitter, item: &T) -> Result<(), BatchError> {
        self(emitter, item)
    }
}

/// A mapper that serializes records with serde.
///
/// # Examples
///
/// ```
/// use xml_batch_rs::item::xml::{SerdeItemMapper, XmlEmitter, XmlItemMapper};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Person {
///     #[serde(rename = "@id")]
///     id: i32,
///     name: String,
/// }
///
/// let mapper = SerdeItemMapper::<Person>::new().item_tag("person");
/// let mut emitter = XmlEmitter::new();
/// mapper
///     .map(&mut emitter, &Person { id: 1, name: "Alice".to_string() })
///     .unwrap();
///
/// assert_eq!(emitter.as_bytes(), b"<person id=\"1\"><name>Alice</name></person>");
/// ```
pub struct SerdeItemMapper<T> {
    item_tag: String,
    _phantom: PhantomData<T>,
}

impl<T> SerdeItemMapper<T> {
    /// Creates a mapper whose item tag is the lowercase name of `T`.
    pub fn new() -> Self {
        let item_tag = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("item")
            .to_lowercase();

        Self {
            item_tag,
            _phantom: PhantomData,
        }
    }

    /// Sets the tag wrapping each serialized record.
    pub fn item_tag(mut self, item_tag: &str) -> Self {
        self.item_tag = item_tag.to_string();
        self
    }

    pub fn get_item_tag(&self) -> &str {
        &self.item_tag
    }
}

impl<T> Default for SerdeItemMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> XmlItemMapper<T> for SerdeItemMapper<T> {
    fn map(&self, emitter: &mut XmlEmitter, item: &T) -> Result<(), BatchError> {
        emitter.serialize(&self.item_tag, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct SimpleItem {
        id: i32,
        name: String,
    }

    #[test]
    fn test_default_item_tag() {
        let mapper = SerdeItemMapper::<SimpleItem>::new();
        assert_eq!(mapper.get_item_tag(), "simpleitem");
    }

    #[test]
    fn test_serde_mapper() {
        let mapper = SerdeItemMapper::<SimpleItem>::default().item_tag("item");
        let mut emitter = XmlEmitter::new();
        let item = SimpleItem {
            id: 1,
            name: "Item 1".to_string(),
        };

        mapper.map(&mut emitter, &item).unwrap();

        assert_eq!(
            emitter.as_bytes(),
            b"<item><id>1</id><name>Item 1</name></item>"
        );
    }

    #[test]
    fn test_closure_mapper_error_is_returned() {
        let mapper = |_: &mut XmlEmitter, item: &SimpleItem| -> Result<(), BatchError> {
            Err(BatchError::Mapping(format!("no mapping for {}", item.id)))
        };
        let mut emitter = XmlEmitter::new();
        let item = SimpleItem {
            id: 9,
            name: "Nine".to_string(),
        };

        let result = mapper.map(&mut emitter, &item);

        match result {
            Err(BatchError::Mapping(message)) => assert_eq!(message, "no mapping for 9"),
            other => panic!("Expected Mapping error, got {:?}", other),
        }
    }
}
