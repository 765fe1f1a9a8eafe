use std::cell::Cell;

use log::{debug, info};

use crate::{core::item::DocumentSink, BatchError};

/// A sink that logs every document instead of storing it.
#[derive(Default)]
pub struct LoggerSink {
    count: Cell<usize>,
}

impl LoggerSink {
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl DocumentSink for LoggerSink {
    fn write_document(&self, document: &[u8]) -> Result<(), BatchError> {
        self.count.set(self.count.get() + 1);
        info!("Document #{}: {} bytes", self.count.get(), document.len());
        debug!("Document:{}", String::from_utf8_lossy(document));
        Ok(())
    }
}
