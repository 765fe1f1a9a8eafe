use log::debug;
use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::item::DocumentSink;
use crate::error::BatchError;

/// A sink that keeps every document in memory.
///
/// # Examples
///
/// ```
/// use xml_batch_rs::core::item::DocumentSink;
/// use xml_batch_rs::item::sink::MemorySink;
///
/// let sink = MemorySink::new();
/// sink.write_document(b"<a/>").unwrap();
///
/// assert_eq!(sink.len(), 1);
/// assert_eq!(sink.documents(), vec![b"<a/>".to_vec()]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: RefCell<Vec<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the documents received so far, in order.
    pub fn documents(&self) -> Vec<Vec<u8>> {
        self.documents.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }

    pub fn into_documents(self) -> Vec<Vec<u8>> {
        self.documents.into_inner()
    }
}

impl DocumentSink for MemorySink {
    fn write_document(&self, document: &[u8]) -> Result<(), BatchError> {
        self.documents.borrow_mut().push(document.to_vec());
        Ok(())
    }
}

/// A sink that writes each document to its own file.
///
/// Files are named `<prefix>-<n>.xml` with `n` counted from 1 and padded to
/// six digits.
///
/// # Examples
///
/// ```no_run
/// use xml_batch_rs::item::sink::DirectorySinkBuilder;
///
/// let sink = DirectorySinkBuilder::new()
///     .prefix("export")
///     .from_path("/tmp/out")
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct DirectorySink {
    directory: PathBuf,
    prefix: String,
    count: Cell<usize>,
}

impl DirectorySink {
    /// Paths of the files written so far.
    pub fn written_files(&self) -> Vec<PathBuf> {
        (1..=self.count.get()).map(|n| self.file_path(n)).collect()
    }

    fn file_path(&self, n: usize) -> PathBuf {
        self.directory.join(format!("{}-{:06}.xml", self.prefix, n))
    }
}

impl DocumentSink for DirectorySink {
    fn write_document(&self, document: &[u8]) -> Result<(), BatchError> {
        let path = self.file_path(self.count.get() + 1);

        let file = File::create(&path).map_err(|e| {
            BatchError::Io(format!("Failed to create XML file {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(document)
            .and_then(|_| writer.flush())
            .map_err(|e| {
                BatchError::Io(format!("Failed to write XML file {}: {}", path.display(), e))
            })?;

        self.count.set(self.count.get() + 1);
        debug!("Wrote {} bytes to {}", document.len(), path.display());
        Ok(())
    }
}

/// Builder for [`DirectorySink`].
#[derive(Default)]
pub struct DirectorySinkBuilder {
    prefix: Option<String>,
}

impl DirectorySinkBuilder {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Sets the file name prefix. Defaults to `"document"`.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    /// Creates a sink writing into `directory`, which must exist.
    pub fn from_path<P: AsRef<Path>>(self, directory: P) -> Result<DirectorySink, BatchError> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(BatchError::Initialization(format!(
                "Not a directory: {}",
                directory.display()
            )));
        }

        Ok(DirectorySink {
            directory: directory.to_path_buf(),
            prefix: self.prefix.unwrap_or_else(|| "document".to_string()),
            count: Cell::new(0),
        })
    }
}
