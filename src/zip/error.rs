//! Error type for the streaming parser.
//!
//! "Not enough bytes yet" is never represented here. It is the
//! [`Parsed::Incomplete`](super::Parsed::Incomplete) outcome of the codecs
//! and a plain `Ok(())` from [`StreamParser::feed`](super::StreamParser::feed).
//! Every variant below is fatal for the archive being parsed.

use std::io;

use super::records::RecordKind;

/// Fatal errors raised while decoding a ZIP stream.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ZipError {
    /// A codec was handed bytes that do not start with its own signature.
    #[error("invalid {kind} signature: found {found:02x?}")]
    InvalidSignature { kind: RecordKind, found: [u8; 4] },

    /// The four bytes at a record boundary match no known record.
    #[error("unknown record signature {found:02x?} at offset {offset}")]
    UnknownSignature { offset: u64, found: [u8; 4] },

    /// A known record showed up where the stream layout forbids it.
    #[error("expected {expected} at offset {offset}, found {found}")]
    UnexpectedRecord {
        offset: u64,
        expected: &'static str,
        found: RecordKind,
    },

    /// The entry's data cannot be delimited without its declared sizes.
    #[error("unsupported entry '{file_name}': {reason}")]
    UnsupportedEntry { file_name: String, reason: String },

    /// The raw DEFLATE stream of an entry is malformed.
    #[error("failed to inflate '{file_name}': {source}")]
    Decompression {
        file_name: String,
        #[source]
        source: flate2::DecompressError,
    },

    /// A record could not be encoded or decoded from its byte layout.
    #[error("record I/O error: {0}")]
    Io(#[from] io::Error),

    /// Bytes were fed after the end of central directory record.
    #[error("archive already finished, {0} trailing bytes rejected")]
    Finished(usize),

    /// The parser already returned a fatal error.
    #[error("parser is unusable after a previous error")]
    Poisoned,

    /// The stream stopped before the end of central directory record.
    #[error("archive truncated while reading {state} ({buffered} bytes buffered)")]
    Truncated {
        state: &'static str,
        buffered: usize,
    },
}

/// Result type for the streaming parser.
pub type Result<T, E = ZipError> = std::result::Result<T, E>;
