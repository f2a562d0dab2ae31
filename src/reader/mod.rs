//! Lazy line-by-line JSON decoding
//!
//! # Error Handling Strategy
//!
//! The reader supports two failure policies, selected by the `broken` flag:
//!
//! - **Strict (default)**: the first read error (including gzip decompression
//!   failures) or malformed record surfaces as an `Err` item with line-number
//!   context, and the sequence ends there. Every value decoded before the
//!   defect has already been yielded; no silently-partial result is possible.
//!
//! - **Broken**: the same defects are taken as evidence that the *tail* of the
//!   stream is corrupted (a truncated download, a gzip stream cut off
//!   mid-block). The reader stops pulling records and ends the sequence as if
//!   end-of-stream had been reached, yielding the longest clean prefix. No
//!   error is surfaced; the swallowed defect is logged at debug level.
//!
//! Opening failures are never affected by the flag: a path that cannot be
//! opened fails in [`open_file`](crate::source::open_file) before any reader
//! exists.

use std::io::{BufRead, BufReader, Read};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Where the reader is in its lifecycle. Both terminal states are sticky:
/// once left, `Reading` is never re-entered.
enum ReaderState {
    /// Pulling records
    Reading,
    /// Clean end of data (end-of-stream, or a swallowed defect in broken mode)
    Done,
    /// A defect was surfaced as an `Err` item; nothing more will be produced
    Failed,
}

/// A lazy, forward-only reader that decodes one JSON value per non-empty line.
///
/// Each call to `next()` pulls at most one record from the stream; nothing is
/// buffered beyond the bytes needed to locate the next newline, and nothing is
/// decoded before the caller asks for it. Records are yielded in stream order.
///
/// The reader owns the stream it is given and drops it with itself; it never
/// closes anything early. Callers that want the stream back afterwards can
/// pass `&mut stream` instead, or recover it via [`into_inner`].
///
/// Decodes into any `T: DeserializeOwned`, defaulting to [`serde_json::Value`]
/// for shape-free reading.
///
/// [`into_inner`]: JsonLinesReader::into_inner
pub struct JsonLinesReader<R: Read, T = Value> {
    stream: BufReader<R>,
    broken: bool,
    state: ReaderState,
    record: Vec<u8>,
    line_num: usize,
    _decoded: PhantomData<T>,
}

impl<R: Read, T: DeserializeOwned> JsonLinesReader<R, T> {
    /// Create a strict-mode reader: the first defect is surfaced as an error.
    pub fn new(stream: R) -> Self {
        Self::with_broken(stream, false)
    }

    /// Create a reader with an explicit failure policy. With `broken` set,
    /// read and parse defects end the sequence instead of surfacing.
    pub fn with_broken(stream: R, broken: bool) -> Self {
        Self {
            stream: BufReader::new(stream),
            broken,
            state: ReaderState::Reading,
            record: Vec::new(),
            line_num: 0,
            _decoded: PhantomData,
        }
    }

    /// Consume the reader and return the underlying stream. Bytes already
    /// pulled into the line buffer are lost.
    pub fn into_inner(self) -> R {
        self.stream.into_inner()
    }

    /// Terminal transition for a defective stream: surface the error in
    /// strict mode, end the sequence cleanly in broken mode.
    fn defect(&mut self, err: anyhow::Error) -> Option<Result<T>> {
        if self.broken {
            debug!(line = self.line_num, "discarding corrupted tail: {err:#}");
            self.state = ReaderState::Done;
            None
        } else {
            self.state = ReaderState::Failed;
            Some(Err(err))
        }
    }
}

impl<R: Read, T: DeserializeOwned> Iterator for JsonLinesReader<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !matches!(self.state, ReaderState::Reading) {
                return None;
            }

            self.record.clear();
            self.line_num += 1;

            match self.stream.read_until(b'\n', &mut self.record) {
                Ok(0) => {
                    self.state = ReaderState::Done;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    let err = anyhow::Error::new(e)
                        .context(format!("Failed to read line {} from stream", self.line_num));
                    return self.defect(err);
                }
            }

            if self.record.last() == Some(&b'\n') {
                self.record.pop();
            }

            // Skip blank records; a lone `\r` from a CRLF ending counts too
            if self.record.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match serde_json::from_slice(&self.record) {
                Ok(value) => return Some(Ok(value)),
                Err(e) => {
                    let err = anyhow::Error::new(e)
                        .context(format!("Failed to parse JSON on line {}", self.line_num));
                    return self.defect(err);
                }
            }
        }
    }
}

impl<R: Read, T: DeserializeOwned> FusedIterator for JsonLinesReader<R, T> {}

/// Decode a byte stream of JSON Lines into [`serde_json::Value`]s.
///
/// The minimal entry point for the untyped common case; use
/// [`JsonLinesReader`] directly to decode into your own record type.
pub fn reader<R: Read>(stream: R, broken: bool) -> JsonLinesReader<R, Value> {
    JsonLinesReader::with_broken(stream, broken)
}
