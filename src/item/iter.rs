use std::cell::RefCell;

use crate::{core::item::ItemReader, error::BatchError};

/// An item reader over any iterator, such as the rows of a database cursor.
pub struct IterItemReader<I> {
    items: RefCell<I>,
}

impl<I, R> ItemReader<R> for IterItemReader<I>
where
    I: Iterator<Item = R>,
{
    fn read(&self) -> Option<Result<R, BatchError>> {
        self.items.borrow_mut().next().map(Ok)
    }
}

#[derive(Default)]
pub struct IterItemReaderBuilder {}

impl IterItemReaderBuilder {
    pub fn new() -> IterItemReaderBuilder {
        IterItemReaderBuilder {}
    }

    pub fn from_items<I: IntoIterator>(self, items: I) -> IterItemReader<I::IntoIter> {
        IterItemReader {
            items: RefCell::new(items.into_iter()),
        }
    }
}
