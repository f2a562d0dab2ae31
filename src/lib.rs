//! Streaming reader for JSON Lines data (one JSON value per line)
//!
//! Transparently reads plain-text and gzip-compressed sources, detecting
//! compression by magic bytes or a `.gz` suffix. An optional "broken" mode
//! tolerates truncated or corrupted trailing data by salvaging the longest
//! cleanly-decodable prefix instead of failing. It supports:
//!
//! - Opening plain or gzipped files through a single entry point, [`open_file`]
//! - Decoding any `std::io::Read` stream lazily, one record per pull
//! - Typed decoding into `serde::Deserialize` records, or shape-free
//!   [`serde_json::Value`]s
//!
//! # Example
//!
//! ```no_run
//! use json_lines::{open_file, reader};
//!
//! let stream = open_file("events.jl.gz")?;
//! for value in reader(stream, false) {
//!     println!("{}", value?);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod reader;
pub mod source;

// Re-export commonly used entry points
pub use reader::{JsonLinesReader, reader};
pub use source::{ByteStream, open_file};
