//! Forward-only ZIP stream parser.
//!
//! This module decodes a ZIP archive front to back while its bytes arrive,
//! without ever seeking and without buffering more than the record or
//! compressed chunk currently being decoded.
//!
//! ## Parsing Strategy
//!
//! The parser is a push-based state machine:
//! 1. At a record boundary, peek the 4-byte signature and pick the record kind
//! 2. Decode the record once its fixed prefix and variable fields are buffered
//! 3. After a local file header, run the entry's decoder over the buffered
//!    bytes until its data ends, reporting decompressed content as it goes
//! 4. Stop at the End of Central Directory record
//!
//! Whenever a step lacks bytes, [`StreamParser::feed`] returns and the same
//! bytes are retried after the next call. Chunk boundaries therefore never
//! change what the visitor sees.

use super::buffer::StreamBuffer;
use super::error::{Result, ZipError};
use super::inflate::EntryDecoder;
use super::records::{FileHeader, Parsed, Record, RecordKind};
use super::visitor::ZipVisitor;

/// The entry whose data is being decoded.
struct Entry {
    header: FileHeader,
    decoder: EntryDecoder,
    produced: u64,
}

enum State {
    /// At a record boundary, signature not yet identified.
    Boundary,
    /// Signature identified, waiting for the whole record.
    Record(RecordKind),
    /// Decoding entry data.
    Content(Entry),
    /// The end of central directory record was decoded.
    Finished,
    /// A fatal error was returned.
    Failed,
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Boundary => "record signature",
            State::Record(RecordKind::LocalFileHeader) => "local file header",
            State::Record(RecordKind::DataDescriptor) => "data descriptor",
            State::Record(RecordKind::CentralDirectoryHeader) => "central directory header",
            State::Record(RecordKind::EndOfCentralDirectory) => "end of central directory",
            State::Content(_) => "entry data",
            State::Finished => "finished archive",
            State::Failed => "failed archive",
        }
    }
}

/// Incremental ZIP parser.
///
/// Feed it byte chunks of any size with [`feed`](Self::feed); decoded
/// records and decompressed content are reported to the visitor `V` as soon
/// as they are complete.
///
/// ## Example
///
/// ```
/// use zipstream::zip::{Callbacks, StreamParser};
///
/// let mut content = Vec::new();
/// let callbacks = Callbacks::new().on_content(|_, data| content.extend_from_slice(data));
/// let mut parser = StreamParser::new(callbacks);
///
/// // A truncated archive: nothing is decoded, nothing is lost.
/// parser.feed(b"PK\x03").unwrap();
/// assert!(!parser.is_finished());
/// assert!(parser.finish().is_err());
/// ```
pub struct StreamParser<V> {
    visitor: V,
    buffer: StreamBuffer,
    state: State,
    /// Header of a finished entry whose data descriptor is still due.
    awaiting_descriptor: Option<FileHeader>,
    /// Stream offset of the first unread buffered byte.
    position: u64,
    entries: u64,
}

impl<V: ZipVisitor> StreamParser<V> {
    pub fn new(visitor: V) -> Self {
        Self {
            visitor,
            buffer: StreamBuffer::new(),
            state: State::Boundary,
            awaiting_descriptor: None,
            position: 0,
            entries: 0,
        }
    }

    /// Push more stream bytes and decode as far as they allow.
    ///
    /// Returning `Ok(())` does not mean anything was decoded: an incomplete
    /// record stays buffered until later chunks complete it.
    ///
    /// # Errors
    ///
    /// Structural and decompression errors are fatal: the parser is unusable
    /// afterwards and every later call returns [`ZipError::Poisoned`].
    /// Bytes following the end of central directory record are rejected with
    /// [`ZipError::Finished`], which leaves the finished parser intact.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        match self.state {
            State::Failed => return Err(ZipError::Poisoned),
            State::Finished if chunk.is_empty() => return Ok(()),
            State::Finished => return Err(ZipError::Finished(chunk.len())),
            _ => {}
        }

        self.buffer.feed(chunk);
        if let Err(e) = self.drain() {
            log::debug!("archive failed at offset {}: {}", self.position, e);
            self.state = State::Failed;
            self.buffer.clear();
            return Err(e);
        }

        if matches!(self.state, State::Finished) && !self.buffer.is_empty() {
            let trailing = self.buffer.take_all().len();
            return Err(ZipError::Finished(trailing));
        }
        Ok(())
    }

    /// Consume the parser once the archive is complete and return the visitor.
    pub fn finish(self) -> Result<V> {
        match self.state {
            State::Finished => Ok(self.visitor),
            State::Failed => Err(ZipError::Poisoned),
            ref state => Err(ZipError::Truncated {
                state: state.name(),
                buffered: self.buffer.len(),
            }),
        }
    }

    /// The end of central directory record has been decoded.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished)
    }

    /// Stream offset of the first byte not yet decoded.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of bytes buffered but not yet decoded.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Number of local file headers decoded so far.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    /// Give up on the archive and keep the visitor.
    pub fn into_visitor(self) -> V {
        self.visitor
    }

    fn drain(&mut self) -> Result<()> {
        while self.step()? {}
        Ok(())
    }

    /// Run one state transition. Returns `false` when more input is needed.
    fn step(&mut self) -> Result<bool> {
        match self.state {
            State::Boundary => self.identify(),
            State::Record(kind) => self.read_record(kind),
            State::Content(_) => self.read_content(),
            State::Finished | State::Failed => Ok(false),
        }
    }

    fn advance(&mut self, n: usize) {
        self.buffer.consume(n);
        self.position += n as u64;
    }

    fn identify(&mut self) -> Result<bool> {
        let Some(magic) = self.buffer.peek(4) else {
            return Ok(false);
        };
        let Some(kind) = RecordKind::from_signature(magic) else {
            let mut found = [0u8; 4];
            found.copy_from_slice(magic);
            return Err(ZipError::UnknownSignature {
                offset: self.position,
                found,
            });
        };

        let descriptor_due = self.awaiting_descriptor.is_some();
        match kind {
            RecordKind::DataDescriptor if !descriptor_due => {
                return Err(ZipError::UnexpectedRecord {
                    offset: self.position,
                    expected: "local file header or central directory header",
                    found: kind,
                });
            }
            RecordKind::DataDescriptor => {}
            _ if descriptor_due => {
                return Err(ZipError::UnexpectedRecord {
                    offset: self.position,
                    expected: "data descriptor",
                    found: kind,
                });
            }
            _ => {}
        }

        log::trace!("{} signature at offset {}", kind, self.position);
        self.state = State::Record(kind);
        Ok(true)
    }

    fn read_record(&mut self, kind: RecordKind) -> Result<bool> {
        let (record, consumed) = match Record::decode(kind, self.buffer.as_slice())? {
            Parsed::Complete { record, consumed } => (record, consumed),
            Parsed::Incomplete => return Ok(false),
        };
        log::debug!(
            "decoded {} ({} bytes) at offset {}",
            kind,
            consumed,
            self.position
        );
        self.advance(consumed);

        match record {
            Record::LocalFileHeader(header) => {
                self.visitor.local_header(&header);
                let decoder = EntryDecoder::for_entry(&header)?;
                self.entries += 1;
                self.state = State::Content(Entry {
                    header,
                    decoder,
                    produced: 0,
                });
            }
            Record::DataDescriptor(descriptor) => {
                if let Some(header) = self.awaiting_descriptor.take() {
                    self.visitor.data_descriptor(&header, &descriptor);
                }
                self.state = State::Boundary;
            }
            Record::CentralDirectoryHeader(header) => {
                self.visitor.central_directory_header(&header);
                self.state = State::Boundary;
            }
            Record::EndOfCentralDirectory(eocd) => {
                self.visitor.end_of_central_directory(&eocd);
                self.state = State::Finished;
            }
        }
        Ok(true)
    }

    fn read_content(&mut self) -> Result<bool> {
        let State::Content(entry) = &mut self.state else {
            return Ok(false);
        };

        let decoded = entry.decoder.decode(&entry.header, self.buffer.as_slice())?;
        if !decoded.data.is_empty() {
            entry.produced += decoded.data.len() as u64;
            self.visitor.content(&entry.header, &decoded.data);
        }
        self.buffer.consume(decoded.consumed);
        self.position += decoded.consumed as u64;

        if !decoded.finished {
            return Ok(false);
        }

        if let State::Content(entry) = std::mem::replace(&mut self.state, State::Boundary) {
            log::debug!(
                "entry '{}' ended at offset {} ({} bytes of content)",
                entry.header.file_name(),
                self.position,
                entry.produced
            );
            if entry.header.has_data_descriptor() {
                self.awaiting_descriptor = Some(entry.header);
            } else if entry.produced != entry.header.uncompressed_size as u64 {
                log::warn!(
                    "entry '{}' declares {} bytes but produced {}",
                    entry.header.file_name(),
                    entry.header.uncompressed_size,
                    entry.produced
                );
            }
        }
        Ok(true)
    }
}
