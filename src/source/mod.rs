//! Byte-stream sources for JSON Lines data
//!
//! `open_file` is the only path-based entry point: it opens the file, decides
//! whether the bytes are gzip-compressed, and hands back a [`ByteStream`] that
//! decompresses transparently. Callers that already hold an open stream (piped
//! input, in-memory buffers) skip this module and pass any `Read` to the
//! reader directly.

use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tracing::debug;

/// First two bytes of every gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A readable handle over a JSON Lines source, decompressing on the fly when
/// the source is gzip-compressed.
///
/// The underlying OS file handle is owned by this value and released by `Drop`
/// when it goes out of scope, on every exit path.
#[derive(Debug)]
pub enum ByteStream {
    /// Raw bytes, read as-is
    Plain(File),
    /// Gzip-compressed bytes, decoded transparently during reads
    Gzipped(GzDecoder<File>),
}

impl ByteStream {
    /// Whether compression was detected at open time
    pub fn is_compressed(&self) -> bool {
        matches!(self, ByteStream::Gzipped(_))
    }
}

impl Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ByteStream::Plain(file) => file.read(buf),
            ByteStream::Gzipped(decoder) => decoder.read(buf),
        }
    }
}

/// Open a JSON Lines file, detecting gzip compression automatically.
///
/// The file is treated as gzip-compressed when its first two bytes match the
/// gzip magic number, or when the path carries a `.gz` extension. The two
/// signals are OR-ed: magic bytes catch compressed files behind any name,
/// while a `.gz` suffix is honored even when the content disagrees, in which
/// case the mismatch surfaces as a read error rather than here. Gzip
/// integrity is never validated at open time.
///
/// Fails if the path is missing or unreadable.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<ByteStream> {
    let path = path.as_ref();
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let compressed = sniff_gzip_magic(&mut file)
        .with_context(|| format!("Failed to sniff file header: {}", path.display()))?
        || has_gzip_suffix(path);

    debug!(path = %path.display(), compressed, "opened JSON Lines source");

    if compressed {
        Ok(ByteStream::Gzipped(GzDecoder::new(file)))
    } else {
        Ok(ByteStream::Plain(file))
    }
}

/// Read the first two bytes and rewind, so detection consumes nothing from the
/// reader's perspective. Files shorter than the magic number are never gzip.
fn sniff_gzip_magic(file: &mut File) -> io::Result<bool> {
    let mut magic = [0u8; 2];
    let is_gzip = match file.read_exact(&mut magic) {
        Ok(()) => magic == GZIP_MAGIC,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(e),
    };
    file.seek(SeekFrom::Start(0))?;
    Ok(is_gzip)
}

fn has_gzip_suffix(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}
