mod http;
mod local;

pub use http::HttpSource;
pub use local::{DEFAULT_CHUNK_SIZE, ReaderSource};

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::zip::{StreamParser, ZipError, ZipVisitor};

/// Trait for sequential, chunked reading from a data source
#[async_trait]
pub trait ChunkSource: Send {
    /// Read the next chunk, or `None` once the source is exhausted
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>>;

    /// Get the number of bytes delivered so far
    fn transferred_bytes(&self) -> u64;
}

/// Pump chunks from `source` into `parser` until the archive is complete.
///
/// Returns the number of bytes read from the source. Bytes after the end of
/// central directory record are ignored with a warning.
///
/// # Errors
///
/// Returns an error if the source fails, the archive is malformed, or the
/// source ends before the end of central directory record.
pub async fn feed_from<S, V>(source: &mut S, parser: &mut StreamParser<V>) -> Result<u64>
where
    S: ChunkSource + ?Sized,
    V: ZipVisitor,
{
    let mut total = 0u64;

    while let Some(chunk) = source.next_chunk().await? {
        total += chunk.len() as u64;

        match parser.feed(&chunk) {
            Ok(()) => {}
            Err(ZipError::Finished(trailing)) => {
                log::warn!("ignoring {trailing} bytes after the end of central directory");
            }
            Err(e) => return Err(e.into()),
        }

        if parser.is_finished() {
            break;
        }
    }

    if !parser.is_finished() {
        bail!(
            "archive stream ended after {} bytes without an end of central directory record",
            total
        );
    }

    Ok(total)
}
