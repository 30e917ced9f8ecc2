//! Reading and writing objects over async byte streams.
//!
//! BinON has no framing, so the reader buffers input until a complete
//! object has arrived and keeps any surplus bytes for the next one.

pub mod reader;
pub mod writer;

pub use reader::ObjectReader;
pub use writer::ObjectWriter;
