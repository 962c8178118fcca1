//! Per-entry content decoding.
//!
//! Both decoders report how many input bytes they took. Whatever they did not
//! take is the start of the next record and must stay in the stream buffer.

use flate2::{Decompress, FlushDecompress, Status};

use super::error::{Result, ZipError};
use super::records::{CompressionMethod, FileHeader};

/// Output reserved per decompression round.
const OUTPUT_CHUNK: usize = 32 * 1024;

/// Result of one decoding pass over the buffered input.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Inflated {
    /// Decompressed bytes produced by this pass, possibly empty.
    pub data: Vec<u8>,
    /// Input bytes taken by the decoder. `input[consumed..]` is unused.
    pub consumed: usize,
    /// The entry's data ended inside this pass.
    pub finished: bool,
}

/// Raw DEFLATE decompressor fed with partial input.
pub struct Inflater {
    inner: Decompress,
    finished: bool,
}

impl Inflater {
    pub fn new() -> Self {
        Self {
            // ZIP entries carry raw deflate data without the zlib wrapper.
            inner: Decompress::new(false),
            finished: false,
        }
    }

    /// Feed `input` and collect all output it produces.
    ///
    /// The decompressor's own input counter decides `consumed`; bytes it took
    /// are held in its internal state and must not be fed again.
    pub fn decompress(&mut self, input: &[u8]) -> Result<Inflated, flate2::DecompressError> {
        let mut out = Inflated::default();
        if self.finished {
            return Ok(Inflated {
                finished: true,
                ..out
            });
        }

        loop {
            let in_before = self.inner.total_in();
            let out_before = self.inner.total_out();
            if out.data.capacity() - out.data.len() < OUTPUT_CHUNK {
                out.data.reserve(OUTPUT_CHUNK);
            }

            let status = self.inner.decompress_vec(
                &input[out.consumed..],
                &mut out.data,
                FlushDecompress::None,
            )?;
            out.consumed += (self.inner.total_in() - in_before) as usize;

            if status == Status::StreamEnd {
                self.finished = true;
                out.finished = true;
                break;
            }
            let progressed =
                self.inner.total_in() != in_before || self.inner.total_out() != out_before;
            if !progressed {
                break;
            }
        }

        log::trace!(
            "inflated {} -> {} bytes (finished: {})",
            out.consumed,
            out.data.len(),
            out.finished
        );
        Ok(out)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn total_in(&self) -> u64 {
        self.inner.total_in()
    }

    pub fn total_out(&self) -> u64 {
        self.inner.total_out()
    }
}

impl Default for Inflater {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoder for the data of a single archive entry.
pub enum EntryDecoder {
    /// Stored data: copy exactly `remaining` more bytes.
    Stored { remaining: u64 },
    /// Deflate data: the stream marks its own end.
    Deflate(Inflater),
}

impl EntryDecoder {
    /// Pick the decoder for the entry announced by `header`.
    ///
    /// Entries whose end cannot be located from the header and the data
    /// itself are rejected.
    pub fn for_entry(header: &FileHeader) -> Result<Self> {
        match header.compression() {
            CompressionMethod::Stored if header.has_data_descriptor() => {
                Err(ZipError::UnsupportedEntry {
                    file_name: header.file_name(),
                    reason: "stored data with sizes deferred to a data descriptor".to_string(),
                })
            }
            CompressionMethod::Stored => Ok(EntryDecoder::Stored {
                remaining: header.compressed_size as u64,
            }),
            CompressionMethod::Deflate
                if !header.has_data_descriptor() && header.compressed_size == 0 =>
            {
                Ok(EntryDecoder::Stored { remaining: 0 })
            }
            CompressionMethod::Deflate => Ok(EntryDecoder::Deflate(Inflater::new())),
            CompressionMethod::Unknown(method) => Err(ZipError::UnsupportedEntry {
                file_name: header.file_name(),
                reason: format!("compression method {method} is not supported"),
            }),
        }
    }

    /// Decode as much of `input` as belongs to this entry.
    pub fn decode(&mut self, header: &FileHeader, input: &[u8]) -> Result<Inflated> {
        match self {
            EntryDecoder::Stored { remaining } => {
                let take = (*remaining).min(input.len() as u64) as usize;
                *remaining -= take as u64;
                Ok(Inflated {
                    data: input[..take].to_vec(),
                    consumed: take,
                    finished: *remaining == 0,
                })
            }
            EntryDecoder::Deflate(inflater) => {
                inflater
                    .decompress(input)
                    .map_err(|source| ZipError::Decompression {
                        file_name: header.file_name(),
                        source,
                    })
            }
        }
    }
}
