use crate::error::BatchError;

/// Reads items one at a time; `None` ends the stream.
pub trait ItemReader<R> {
    fn read(&self) -> Option<Result<R, BatchError>>;
}

/// Writes items one chunk at a time.
pub trait ItemWriter<W> {
    fn write(&self, items: &[W]) -> Result<(), BatchError>;
    fn flush(&self) -> Result<(), BatchError> {
        Ok(())
    }
    fn open(&self) -> Result<(), BatchError> {
        Ok(())
    }
    fn close(&self) -> Result<(), BatchError> {
        Ok(())
    }
}

/// Receives every finished XML document as raw bytes.
///
/// Each call carries one complete, well-formed document. Consecutive calls
/// carry independent documents: their concatenation is not valid XML.
pub trait DocumentSink {
    fn write_document(&self, document: &[u8]) -> Result<(), BatchError>;
}

impl<F> DocumentSink for F
where
    F: Fn(&[u8]) -> Result<(), BatchError>,
{
    fn write_document(&self, document: &[u8]) -> Result<(), BatchError> {
        self(document)
    }
}

impl DocumentSink for Box<dyn DocumentSink + '_> {
    fn write_document(&self, document: &[u8]) -> Result<(), BatchError> {
        (**self).write_document(document)
    }
}
