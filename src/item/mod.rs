#[cfg(feature = "logger")]
/// This module provides a logger document sink, useful for debugging purposes.
pub mod logger;

/// This module provides an item reader over any iterator.
pub mod iter;

/// This module provides in-memory and file system document sinks.
pub mod sink;

/// This module provides the size limited XML writer.
pub mod xml;
