use log::{debug, error, info, warn};
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

use crate::core::item::{DocumentSink, ItemWriter};
use crate::error::BatchError;

use super::estimator::SizeEstimator;
use super::mapper::XmlItemMapper;
use super::session::XmlSession;

const DEFAULT_ROOT_TAG: &str = "root";
const DEFAULT_ENCODING: &str = "UTF-8";
const DEFAULT_GROWTH_FACTOR: f64 = 1.1;

enum WriterState {
    Open(XmlSession),
    /// A push failed and the pending document was dropped.
    Failed(String),
    Closed,
}

/// A writer that splits a stream of records into XML documents of bounded size.
///
/// Before each record is mapped, the writer checks whether the current
/// document plus the largest record seen so far (scaled by the growth factor)
/// would reach `max_size`. If so, the current document is closed and handed
/// to the sink, and the record starts a fresh document.
///
/// The bound is best effort: a record larger than every record before it can
/// still push a document past `max_size`. When the very first record of a
/// document is already predicted to overshoot, `push` fails with
/// [`BatchError::Configuration`] instead of emitting an oversized document.
///
/// A failed `push` drops the pending document and leaves the writer failed:
/// every later `push` is rejected and the next `close` reports the failure,
/// so records accepted before the error are never silently lost.
///
/// # Examples
///
/// ```
/// use xml_batch_rs::item::xml::{SerdeItemMapper, SizeLimitedXmlWriterBuilder};
/// use xml_batch_rs::item::sink::MemorySink;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Document {
///     id: u32,
///     title: String,
///     description: String,
/// }
///
/// let writer = SizeLimitedXmlWriterBuilder::new()
///     .max_size(200)
///     .root_tag("documents")
///     .build(
///         SerdeItemMapper::<Document>::new().item_tag("document"),
///         MemorySink::new(),
///     )
///     .unwrap();
///
/// for id in 1..=2 {
///     let document = Document {
///         id,
///         title: "Title".to_string(),
///         description: "Description".to_string(),
///     };
///     writer.push(&document).unwrap();
/// }
/// writer.close().unwrap();
///
/// // The second record did not fit in the first document
/// let documents = writer.sink().documents();
/// assert_eq!(documents.len(), 2);
/// assert_eq!(
///     String::from_utf8(documents[1].clone()).unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?><documents>\
///      <document><id>2</id><title>Title</title><description>Description</description></document>\
///      </documents>"
/// );
/// ```
pub struct SizeLimitedXmlWriter<T, M, S> {
    state: RefCell<WriterState>,
    estimator: RefCell<SizeEstimator>,
    document_count: Cell<usize>,
    max_size: usize,
    root_tag: String,
    encoding: String,
    mapper: M,
    sink: S,
    _phantom: PhantomData<T>,
}

impl<T, M, S> SizeLimitedXmlWriter<T, M, S>
where
    M: XmlItemMapper<T>,
    S: DocumentSink,
{
    /// Appends one record, flushing the current document first when the
    /// record is predicted not to fit.
    pub fn push(&self, item: &T) -> Result<(), BatchError> {
        let mut state = self.state.borrow_mut();

        let session = match std::mem::replace(&mut *state, WriterState::Closed) {
            WriterState::Open(session) => session,
            WriterState::Failed(cause) => {
                let message = format!("Cannot push to a failed XML writer: {}", cause);
                *state = WriterState::Failed(cause);
                return Err(BatchError::ItemWriter(message));
            }
            WriterState::Closed => {
                return Err(BatchError::ItemWriter(
                    "Cannot push to a closed XML writer".to_string(),
                ));
            }
        };

        // The session only goes back into the state once the record is in.
        match self.append(session, item) {
            Ok(session) => {
                *state = WriterState::Open(session);
                Ok(())
            }
            Err(err) => {
                error!("XML writer <{}> failed: {}", self.root_tag, err);
                *state = WriterState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Emits the pending document, if it holds any record, and closes the
    /// writer.
    ///
    /// Closing a writer whose `push` failed returns
    /// [`BatchError::ItemWriter`], since records it had accepted were
    /// dropped. Closing a closed writer does nothing.
    pub fn close(&self) -> Result<(), BatchError> {
        let mut state = self.state.borrow_mut();

        match std::mem::replace(&mut *state, WriterState::Closed) {
            WriterState::Open(session) => {
                self.emit(session)?;
                info!(
                    "Closed XML writer <{}>: {} documents written",
                    self.root_tag,
                    self.document_count.get()
                );
                Ok(())
            }
            WriterState::Failed(cause) => Err(BatchError::ItemWriter(format!(
                "XML writer <{}> failed earlier and discarded its pending records: {}",
                self.root_tag, cause
            ))),
            WriterState::Closed => {
                debug!("XML writer <{}> is already closed", self.root_tag);
                Ok(())
            }
        }
    }

    fn append(&self, mut session: XmlSession, item: &T) -> Result<XmlSession, BatchError> {
        let mut estimator = self.estimator.borrow_mut();

        let current_size = session.len();
        estimator.bootstrap(current_size);

        if estimator.would_overflow(current_size, self.max_size) {
            if session.is_empty() {
                return Err(BatchError::Configuration(format!(
                    "A record is estimated at {} bytes but an empty document already uses {} of \
                     at most {} bytes; raise max_size or lower growth_factor (currently {})",
                    estimator.estimate(),
                    current_size,
                    self.max_size,
                    estimator.growth_factor()
                )));
            }
            self.emit(session)?;
            session = XmlSession::open(&self.root_tag, &self.encoding)?;
        }

        let base_size = session.len();
        self.mapper
            .map(session.emitter(), item)
            .map_err(|e| BatchError::Mapping(format!("Cannot map item: {}", e)))?;
        session.record_added();

        let delta = session.len().saturating_sub(base_size);
        if estimator.observe(delta) {
            debug!(
                "Estimated record size raised to {} bytes (record of {} bytes)",
                estimator.estimate(),
                delta
            );
        }

        Ok(session)
    }

    fn emit(&self, session: XmlSession) -> Result<(), BatchError> {
        let record_count = session.record_count();

        if let Some(document) = session.finish(&self.root_tag)? {
            if document.len() > self.max_size {
                warn!(
                    "XML document of {} bytes exceeds the limit of {} bytes",
                    document.len(),
                    self.max_size
                );
            }
            debug!(
                "Flushing XML document #{}: {} records, {} bytes",
                self.document_count.get() + 1,
                record_count,
                document.len()
            );
            self.sink.write_document(&document)?;
            self.document_count.set(self.document_count.get() + 1);
        }

        Ok(())
    }
}

impl<T, M, S> SizeLimitedXmlWriter<T, M, S> {
    /// Number of documents handed to the sink so far.
    pub fn document_count(&self) -> usize {
        self.document_count.get()
    }

    /// Number of records in the pending document.
    pub fn record_count(&self) -> usize {
        match &*self.state.borrow() {
            WriterState::Open(session) => session.record_count(),
            WriterState::Failed(_) | WriterState::Closed => 0,
        }
    }

    /// Current estimate, in bytes, of the size of one record.
    pub fn estimated_record_size(&self) -> usize {
        self.estimator.borrow().estimate()
    }

    pub fn is_closed(&self) -> bool {
        matches!(&*self.state.borrow(), WriterState::Closed)
    }

    /// Whether a `push` failed and the failure was not yet reported by `close`.
    pub fn is_failed(&self) -> bool {
        matches!(&*self.state.borrow(), WriterState::Failed(_))
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn root_tag(&self) -> &str {
        &self.root_tag
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<T, M, S> ItemWriter<T> for SizeLimitedXmlWriter<T, M, S>
where
    M: XmlItemMapper<T>,
    S: DocumentSink,
{
    fn write(&self, items: &[T]) -> Result<(), BatchError> {
        for item in items {
            self.push(item)?;
        }
        Ok(())
    }

    // Documents are emitted when they are full, not at chunk boundaries.
    fn flush(&self) -> Result<(), BatchError> {
        Ok(())
    }

    fn close(&self) -> Result<(), BatchError> {
        SizeLimitedXmlWriter::close(self)
    }
}

impl<T, M, S> Drop for SizeLimitedXmlWriter<T, M, S> {
    fn drop(&mut self) {
        if let WriterState::Open(session) = &*self.state.borrow() {
            if !session.is_empty() {
                warn!(
                    "XML writer <{}> dropped without close: {} records discarded",
                    self.root_tag,
                    session.record_count()
                );
            }
        }
    }
}

/// Builder for creating size limited XML writers.
///
/// Defaults: root tag `"root"`, encoding `"UTF-8"`, growth factor `1.1`.
/// `max_size` has no default and must be set.
///
/// # Examples
///
/// ```
/// use xml_batch_rs::item::xml::{SizeLimitedXmlWriterBuilder, XmlEmitter};
/// use xml_batch_rs::BatchError;
///
/// struct Row {
///     id: u64,
/// }
///
/// let writer = SizeLimitedXmlWriterBuilder::new()
///     .max_size(4096)
///     .root_tag("rows")
///     .growth_factor(1.5)
///     .build(
///         |emitter: &mut XmlEmitter, row: &Row| -> Result<(), BatchError> {
///             emitter.element("row", &row.id.to_string())
///         },
///         |document: &[u8]| -> Result<(), BatchError> {
///             assert!(document.ends_with(b"</rows>"));
///             Ok(())
///         },
///     )
///     .unwrap();
///
/// writer.push(&Row { id: 1 }).unwrap();
/// writer.close().unwrap();
/// assert_eq!(writer.document_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SizeLimitedXmlWriterBuilder {
    max_size: Option<usize>,
    root_tag: String,
    encoding: String,
    growth_factor: f64,
}

impl SizeLimitedXmlWriterBuilder {
    pub fn new() -> Self {
        Self {
            max_size: None,
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Sets the maximum size, in bytes, of each emitted document.
    ///
    /// The budget covers the declaration, the root start tag and the records,
    /// but not the closing root tag. With a growth factor of `1.0` a document
    /// can therefore exceed `max_size` by up to the length of `</root_tag>`
    /// minus one byte.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Sets the root tag enclosing the records of each document.
    pub fn root_tag(mut self, root_tag: &str) -> Self {
        self.root_tag = root_tag.to_string();
        self
    }

    /// Sets the encoding written in the XML declaration.
    ///
    /// Only UTF-8 is supported.
    pub fn encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    /// Sets the multiplier applied to measured sizes.
    ///
    /// Must be finite and at least `1.0`.
    pub fn growth_factor(mut self, growth_factor: f64) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Creates the writer and opens its first document.
    pub fn build<T, M, S>(
        self,
        mapper: M,
        sink: S,
    ) -> Result<SizeLimitedXmlWriter<T, M, S>, BatchError>
    where
        M: XmlItemMapper<T>,
        S: DocumentSink,
    {
        let max_size = match self.max_size {
            Some(max_size) if max_size > 0 => max_size,
            _ => {
                return Err(BatchError::Initialization(
                    "max_size must be set to a positive number of bytes".to_string(),
                ));
            }
        };

        if self.root_tag.trim().is_empty() {
            return Err(BatchError::Initialization(
                "root_tag must not be empty".to_string(),
            ));
        }

        if !self.growth_factor.is_finite() || self.growth_factor < 1.0 {
            return Err(BatchError::Initialization(format!(
                "growth_factor must be finite and at least 1.0, got {}",
                self.growth_factor
            )));
        }

        if !is_utf8(&self.encoding) {
            return Err(BatchError::Initialization(format!(
                "Unsupported encoding: {}",
                self.encoding
            )));
        }

        let session = XmlSession::open(&self.root_tag, &self.encoding)?;

        Ok(SizeLimitedXmlWriter {
            state: RefCell::new(WriterState::Open(session)),
            estimator: RefCell::new(SizeEstimator::new(self.growth_factor)),
            document_count: Cell::new(0),
            max_size,
            root_tag: self.root_tag,
            encoding: self.encoding,
            mapper,
            sink,
            _phantom: PhantomData,
        })
    }
}

impl Default for SizeLimitedXmlWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_utf8(encoding: &str) -> bool {
    encoding.eq_ignore_ascii_case("utf-8") || encoding.eq_ignore_ascii_case("utf8")
}
