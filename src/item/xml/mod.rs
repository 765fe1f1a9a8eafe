//! Size limited XML output.
//!
//! A [`SizeLimitedXmlWriter`] turns a stream of records into a sequence of
//! independent XML documents, none of which is expected to exceed a byte
//! budget. Records are mapped to markup by an [`XmlItemMapper`], either a
//! closure driving an [`XmlEmitter`] or a [`SerdeItemMapper`], and finished
//! documents are handed to a [`DocumentSink`](crate::core::item::DocumentSink).
//!
//! Every document has the shape
//! `<?xml version="1.0" encoding="UTF-8"?><root>...records...</root>`.
//!
//! # Examples
//!
//! ```
//! use xml_batch_rs::item::xml::{SizeLimitedXmlWriterBuilder, XmlEmitter};
//! use xml_batch_rs::item::sink::MemorySink;
//! use xml_batch_rs::BatchError;
//!
//! struct Measure {
//!     sensor: String,
//!     value: f64,
//! }
//!
//! let mapper = |emitter: &mut XmlEmitter, measure: &Measure| -> Result<(), BatchError> {
//!     emitter.start_with_attributes("measure", &[("sensor", measure.sensor.as_str())])?;
//!     emitter.text(&measure.value.to_string())?;
//!     emitter.end("measure")
//! };
//!
//! let writer = SizeLimitedXmlWriterBuilder::new()
//!     .max_size(256)
//!     .root_tag("measures")
//!     .build(mapper, MemorySink::new())
//!     .unwrap();
//!
//! for i in 0..20 {
//!     let measure = Measure {
//!         sensor: format!("s{}", i),
//!         value: i as f64 * 0.5,
//!     };
//!     writer.push(&measure).unwrap();
//! }
//! writer.close().unwrap();
//!
//! for document in writer.sink().documents() {
//!     assert!(document.len() <= 256);
//!     assert!(document.ends_with(b"</measures>"));
//! }
//! ```

pub mod emitter;
pub mod estimator;
pub mod mapper;
pub mod session;
pub mod xml_writer;

pub use emitter::XmlEmitter;
pub use estimator::SizeEstimator;
pub use mapper::{SerdeItemMapper, XmlItemMapper};
pub use session::XmlSession;
pub use xml_writer::{SizeLimitedXmlWriter, SizeLimitedXmlWriterBuilder};
