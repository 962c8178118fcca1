#![allow(dead_code)]

use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use std::io::Write;

use zipstream::zip::{
    CentralDirectoryHeader, DataDescriptor, EndOfCentralDirectory, FLAG_DATA_DESCRIPTOR,
    FileHeader,
};
use zipstream::{StreamParser, ZipError, ZipVisitor};

/// 2024-06-01 12:30:00 in DOS format
const DOS_TIME: u16 = (12 << 11) | (30 << 5);
const DOS_DATE: u16 = ((2024 - 1980) << 9) | (6 << 5) | 1;

fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(data);
    crc.sum()
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Builds archives byte by byte the way a streaming writer lays them out.
#[derive(Default)]
pub struct ArchiveBuilder {
    bytes: Vec<u8>,
    central: Vec<CentralDirectoryHeader>,
    comment: Vec<u8>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.entry(name, data, 0, data.to_vec(), false)
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.entry(name, data, 8, deflate(data), false)
    }

    /// Deflated entry with zero sizes in the header and a trailing descriptor.
    pub fn deflated_with_descriptor(self, name: &str, data: &[u8]) -> Self {
        self.entry(name, data, 8, deflate(data), true)
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.as_bytes().to_vec();
        self
    }

    fn entry(
        mut self,
        name: &str,
        data: &[u8],
        method: u16,
        payload: Vec<u8>,
        descriptor: bool,
    ) -> Self {
        let crc32 = crc32(data);
        let flags = if descriptor { FLAG_DATA_DESCRIPTOR } else { 0 };
        let offset = self.bytes.len() as u32;

        let mut local = FileHeader {
            version_needed: 20,
            flags,
            compression_method: method,
            last_mod_time: DOS_TIME,
            last_mod_date: DOS_DATE,
            crc32,
            compressed_size: payload.len() as u32,
            uncompressed_size: data.len() as u32,
            file_name: name.as_bytes().to_vec(),
            extra_field: Vec::new(),
        };
        if descriptor {
            local.crc32 = 0;
            local.compressed_size = 0;
            local.uncompressed_size = 0;
        }

        local.write_to(&mut self.bytes).unwrap();
        self.bytes.extend_from_slice(&payload);
        if descriptor {
            DataDescriptor {
                crc32,
                compressed_size: payload.len() as u32,
                uncompressed_size: data.len() as u32,
            }
            .write_to(&mut self.bytes)
            .unwrap();
        }

        self.central.push(CentralDirectoryHeader {
            version_made_by: 0x031e,
            version_needed: 20,
            flags,
            compression_method: method,
            last_mod_time: DOS_TIME,
            last_mod_date: DOS_DATE,
            crc32,
            compressed_size: payload.len() as u32,
            uncompressed_size: data.len() as u32,
            external_attrs: 0o100644 << 16,
            local_header_offset: offset,
            file_name: name.as_bytes().to_vec(),
            ..Default::default()
        });
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        let cd_offset = self.bytes.len();
        for header in &self.central {
            header.write_to(&mut self.bytes).unwrap();
        }
        let cd_size = self.bytes.len() - cd_offset;

        EndOfCentralDirectory {
            disk_number: 0,
            disk_with_cd: 0,
            disk_entries: self.central.len() as u16,
            total_entries: self.central.len() as u16,
            cd_size: cd_size as u32,
            cd_offset: cd_offset as u32,
            comment: self.comment,
        }
        .write_to(&mut self.bytes)
        .unwrap();
        self.bytes
    }
}

/// One visitor callback, as observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LocalHeader(FileHeader),
    Content(String, Vec<u8>),
    Descriptor(String, DataDescriptor),
    Central(CentralDirectoryHeader),
    End(EndOfCentralDirectory),
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl ZipVisitor for Recorder {
    fn local_header(&mut self, header: &FileHeader) {
        self.events.push(Event::LocalHeader(header.clone()));
    }

    fn content(&mut self, header: &FileHeader, data: &[u8]) {
        self.events
            .push(Event::Content(header.file_name(), data.to_vec()));
    }

    fn data_descriptor(&mut self, header: &FileHeader, descriptor: &DataDescriptor) {
        self.events
            .push(Event::Descriptor(header.file_name(), *descriptor));
    }

    fn central_directory_header(&mut self, header: &CentralDirectoryHeader) {
        self.events.push(Event::Central(header.clone()));
    }

    fn end_of_central_directory(&mut self, eocd: &EndOfCentralDirectory) {
        self.events.push(Event::End(eocd.clone()));
    }
}

impl Recorder {
    /// Events with consecutive content chunks of the same entry joined.
    pub fn merged(&self) -> Vec<Event> {
        let mut merged: Vec<Event> = Vec::new();
        for event in &self.events {
            if let (Some(Event::Content(last, buf)), Event::Content(name, data)) =
                (merged.last_mut(), event)
            {
                if last == name {
                    buf.extend_from_slice(data);
                    continue;
                }
            }
            merged.push(event.clone());
        }
        merged
    }

    /// All decompressed content reported for `name`.
    pub fn content_of(&self, name: &str) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Content(entry, data) if entry == name => Some(data.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }
}

/// Feed `archive` split at the given offsets and return the finished recorder.
pub fn parse_split(archive: &[u8], splits: &[usize]) -> Result<Recorder, ZipError> {
    let mut parser = StreamParser::new(Recorder::default());
    let mut start = 0;
    for &end in splits.iter().chain(std::iter::once(&archive.len())) {
        let end = end.clamp(start, archive.len());
        parser.feed(&archive[start..end])?;
        start = end;
    }
    parser.finish()
}

/// Feed `archive` in chunks of `size` bytes.
pub fn parse_in_chunks(archive: &[u8], size: usize) -> Result<Recorder, ZipError> {
    let mut parser = StreamParser::new(Recorder::default());
    for chunk in archive.chunks(size) {
        parser.feed(chunk)?;
    }
    parser.finish()
}

/// Text long enough to span several deflate blocks and read calls.
pub fn sample_text(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491u32;
    (0..len)
        .map(|i| {
            if i % 7 == 0 {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
            }
            b"abcdefghij klmnop\n"[(state as usize).wrapping_add(i) % 18]
        })
        .collect()
}
