use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::{debug, error, info};

use crate::BatchError;

use super::{
    build_name,
    item::{ItemReader, ItemWriter},
};

#[derive(Debug, PartialEq)]
pub enum ChunkStatus {
    ERROR,
    FINISHED,
    FULL,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum StepStatus {
    ERROR,
    SUCCESS,
    STARTED,
}

/// Outcome of one step execution.
#[derive(Debug)]
pub struct StepResult {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    pub status: StepStatus,
    pub read_count: usize,
    pub write_count: usize,
    pub read_error_count: usize,
    pub write_error_count: usize,
}

/// Drains a reader into a writer, one chunk at a time.
///
/// The writer is opened before the first chunk and closed after the last
/// one, also when the step fails. Read and write errors are tolerated until
/// their sum exceeds the skip limit. A failing `close` fails the step, even
/// when every earlier error was skipped.
///
/// # Examples
///
/// ```
/// use xml_batch_rs::core::step::{StepBuilder, StepStatus};
/// use xml_batch_rs::item::iter::IterItemReaderBuilder;
/// use xml_batch_rs::item::sink::MemorySink;
/// use xml_batch_rs::item::xml::{SerdeItemMapper, SizeLimitedXmlWriterBuilder};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Row {
///     id: u32,
/// }
///
/// let reader = IterItemReaderBuilder::new().from_items((0..100).map(|id| Row { id }));
/// let writer = SizeLimitedXmlWriterBuilder::new()
///     .max_size(512)
///     .root_tag("rows")
///     .build(SerdeItemMapper::<Row>::new().item_tag("row"), MemorySink::new())
///     .unwrap();
///
/// let step = StepBuilder::new()
///     .reader(&reader)
///     .writer(&writer)
///     .chunk(10)
///     .build();
///
/// let result = step.execute();
///
/// assert_eq!(result.status, StepStatus::SUCCESS);
/// assert_eq!(result.write_count, 100);
/// assert!(writer.sink().len() > 1);
/// ```
pub struct Step<'a, T> {
    name: String,
    reader: &'a dyn ItemReader<T>,
    writer: &'a dyn ItemWriter<T>,
    chunk_size: usize,
    skip_limit: usize,
    read_count: Cell<usize>,
    write_count: Cell<usize>,
    read_error_count: Cell<usize>,
    write_error_count: Cell<usize>,
}

impl<T> Step<'_, T> {
    pub fn execute(&self) -> StepResult {
        let start = Instant::now();

        debug!("Start of step: {}", self.name);

        let mut step_status = match self.writer.open() {
            Ok(()) => self.run_chunks(),
            Err(err) => {
                error!("ItemWriter open error: {}", err);
                StepStatus::ERROR
            }
        };

        if let Err(err) = self.writer.close() {
            error!("ItemWriter close error: {}", err);
            step_status = StepStatus::ERROR;
        }

        info!(
            "End of step: {}, status: {:?}, read: {}, written: {}",
            self.name,
            step_status,
            self.read_count.get(),
            self.write_count.get()
        );

        StepResult {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            status: step_status,
            read_count: self.read_count.get(),
            write_count: self.write_count.get(),
            read_error_count: self.read_error_count.get(),
            write_error_count: self.write_error_count.get(),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    fn run_chunks(&self) -> StepStatus {
        let mut read_items: Vec<T> = Vec::with_capacity(self.chunk_size);

        loop {
            let read_chunk_status = self.read_chunk(&mut read_items);

            if read_chunk_status == ChunkStatus::ERROR {
                return StepStatus::ERROR;
            }

            let write_chunk_status = self.write_chunk(&read_items);

            if write_chunk_status == ChunkStatus::ERROR {
                return StepStatus::ERROR;
            }

            if read_chunk_status == ChunkStatus::FINISHED {
                return StepStatus::SUCCESS;
            }
        }
    }

    fn is_skip_limit_reached(&self) -> bool {
        self.read_error_count.get() + self.write_error_count.get() > self.skip_limit
    }

    fn read_chunk(&self, read_items: &mut Vec<T>) -> ChunkStatus {
        debug!("Start reading chunk");
        read_items.clear();

        loop {
            match self.reader.read() {
                Some(Ok(item)) => {
                    read_items.push(item);
                    self.read_count.set(self.read_count.get() + 1);
                }
                Some(Err(err)) => {
                    self.read_error_count.set(self.read_error_count.get() + 1);
                    error!("Error occured during read item: {}", err);

                    if self.is_skip_limit_reached() {
                        return ChunkStatus::ERROR;
                    }
                }
                None => {
                    debug!("End reading chunk: FINISHED");
                    return ChunkStatus::FINISHED;
                }
            }

            if read_items.len() == self.chunk_size {
                debug!("End reading chunk: FULL");
                return ChunkStatus::FULL;
            }
        }
    }

    fn write_chunk(&self, items: &[T]) -> ChunkStatus {
        if items.is_empty() {
            return ChunkStatus::FULL;
        }

        debug!("Start writing chunk of {} items", items.len());

        match self.writer.write(items).and_then(|_| self.writer.flush()) {
            Ok(()) => {
                self.write_count.set(self.write_count.get() + items.len());
                debug!("End writing chunk");
                ChunkStatus::FULL
            }
            Err(err) => {
                self.write_error_count
                    .set(self.write_error_count.get() + items.len());
                error!("ItemWriter error: {}", err);

                if self.is_skip_limit_reached() {
                    ChunkStatus::ERROR
                } else {
                    ChunkStatus::FULL
                }
            }
        }
    }
}

pub struct StepBuilder<'a, T> {
    name: Option<String>,
    reader: Option<&'a dyn ItemReader<T>>,
    writer: Option<&'a dyn ItemWriter<T>>,
    chunk_size: usize,
    skip_limit: usize,
}

impl<'a, T> StepBuilder<'a, T> {
    pub fn new() -> StepBuilder<'a, T> {
        Self {
            name: None,
            reader: None,
            writer: None,
            chunk_size: 1,
            skip_limit: 0,
        }
    }

    pub fn name(mut self, name: &str) -> StepBuilder<'a, T> {
        self.name = Some(name.to_string());
        self
    }

    pub fn reader(mut self, reader: &'a impl ItemReader<T>) -> StepBuilder<'a, T> {
        self.reader = Some(reader);
        self
    }

    pub fn writer(mut self, writer: &'a impl ItemWriter<T>) -> StepBuilder<'a, T> {
        self.writer = Some(writer);
        self
    }

    pub fn chunk(mut self, chunk_size: usize) -> StepBuilder<'a, T> {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn skip_limit(mut self, skip_limit: usize) -> StepBuilder<'a, T> {
        self.skip_limit = skip_limit;
        self
    }

    /// # Panics
    ///
    /// Panics when the reader or the writer is missing.
    pub fn build(self) -> Step<'a, T> {
        Step {
            name: self.name.unwrap_or_else(build_name),
            reader: self.reader.expect("a step needs a reader"),
            writer: self.writer.expect("a step needs a writer"),
            chunk_size: self.chunk_size,
            skip_limit: self.skip_limit,
            read_count: Cell::new(0),
            write_count: Cell::new(0),
            read_error_count: Cell::new(0),
            write_error_count: Cell::new(0),
        }
    }
}

impl<T> Default for StepBuilder<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}
