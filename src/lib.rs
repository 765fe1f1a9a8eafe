#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # XML Batch for Rust

 Splits a stream of records into XML documents of bounded size.

 Producers that emit many small records, such as the rows of a database
 cursor, often have to ship them as files or messages that must not exceed a
 given number of bytes. The size of a record is only known once it has been
 serialized, so the writer keeps a conservative estimate of the largest record
 seen so far and closes the current document before a record that would
 likely overflow it.

 ## Core Concepts

- **SizeLimitedXmlWriter:** accepts records one at a time and hands finished documents to a sink.
- **XmlItemMapper:** maps one record to XML events, through an `XmlEmitter`.
- **DocumentSink:** receives the bytes of each finished document.
- **Step:** drains an `ItemReader` into an `ItemWriter`, one chunk at a time.

 ## Features

| **Feature** | **Description**                                      |
|-------------|------------------------------------------------------|
| logger      | Enables a logger `DocumentSink`, useful for debugging |
| full        | Enables all available features                       |

 ## Getting Started

```rust
# use serde::Serialize;
# use xml_batch_rs::{
#     core::step::{StepBuilder, StepStatus},
#     error::BatchError,
#     item::iter::IterItemReaderBuilder,
#     item::sink::MemorySink,
#     item::xml::{SerdeItemMapper, SizeLimitedXmlWriterBuilder},
# };
#[derive(Serialize)]
struct Document {
    id: u32,
    title: String,
    description: String,
}

fn main() -> Result<(), BatchError> {
    let rows = (1..=10).map(|id| Document {
        id,
        title: "Title".to_string(),
        description: "Description".to_string(),
    });

    let reader = IterItemReaderBuilder::new().from_items(rows);

    let writer = SizeLimitedXmlWriterBuilder::new()
        .max_size(400)
        .root_tag("documents")
        .build(
            SerdeItemMapper::<Document>::new().item_tag("document"),
            MemorySink::new(),
        )?;

    let step = StepBuilder::new()
        .reader(&reader) // set iterator reader
        .writer(&writer) // set size limited xml writer
        .chunk(4) // set commit interval
        .build();

    let result = step.execute();

    assert!(result.status == StepStatus::SUCCESS);
    for document in writer.sink().documents() {
        assert!(document.len() <= 400);
    }

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of item readers, document sinks and the size limited XML writer
pub mod item;
