//! Mock versions of a document sink and an item reader.
use mockall::mock;

use xml_batch_rs::{
    BatchError,
    core::item::{DocumentSink, ItemReader},
};

use super::Document;

mock! {
    pub Sink {}
    impl DocumentSink for Sink {
        fn write_document(&self, document: &[u8]) -> Result<(), BatchError>;
    }
}

mock! {
    pub Reader {}
    impl ItemReader<Document> for Reader {
        fn read(&self) -> Option<Result<Document, BatchError>>;
    }
}
