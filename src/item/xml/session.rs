use log::debug;

use crate::error::BatchError;

use super::emitter::XmlEmitter;

/// One in-progress XML document.
///
/// A session is opened with the declaration and the root start tag already
/// written, accumulates records, and is consumed by [`XmlSession::finish`].
/// Flushing never resets a session in place: a new one is opened instead.
pub struct XmlSession {
    emitter: XmlEmitter,
    record_count: usize,
}

impl XmlSession {
    /// Opens a new document: `<?xml version="1.0" encoding="..."?><root>`.
    pub fn open(root_tag: &str, encoding: &str) -> Result<Self, BatchError> {
        let mut emitter = XmlEmitter::new();
        emitter.declaration(encoding)?;
        emitter.start(root_tag).map_err(|e| {
            BatchError::Initialization(format!("Failed to write XML root: {}", e))
        })?;

        debug!("Opened XML document <{}> ({} bytes)", root_tag, emitter.len());

        Ok(Self {
            emitter,
            record_count: 0,
        })
    }

    /// Current size of the document in bytes, without the root end tag.
    pub fn len(&self) -> usize {
        self.emitter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn emitter(&mut self) -> &mut XmlEmitter {
        &mut self.emitter
    }

    pub fn record_added(&mut self) {
        self.record_count += 1;
    }

    /// Closes the root element and returns the finished document.
    ///
    /// Returns `None` when the document holds no record.
    pub fn finish(self, root_tag: &str) -> Result<Option<Vec<u8>>, BatchError> {
        let XmlSession {
            mut emitter,
            record_count,
        } = self;

        emitter
            .end(root_tag)
            .map_err(|e| BatchError::Io(format!("Failed to write XML end: {}", e)))?;

        if record_count == 0 {
            debug!("Discarding empty XML document <{}>", root_tag);
            return Ok(None);
        }

        Ok(Some(emitter.into_bytes()))
    }
}

impl std::fmt::Debug for XmlSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlSession")
            .field("len", &self.emitter.len())
            .field("record_count", &self.record_count)
            .finish()
    }
}
