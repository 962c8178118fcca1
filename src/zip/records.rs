use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{self, Cursor, Read, Write};

use super::error::{Result, ZipError};

/// General purpose flag bit announcing a trailing data descriptor.
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// The four record kinds a forward stream can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    LocalFileHeader,
    DataDescriptor,
    CentralDirectoryHeader,
    EndOfCentralDirectory,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::LocalFileHeader,
        RecordKind::DataDescriptor,
        RecordKind::CentralDirectoryHeader,
        RecordKind::EndOfCentralDirectory,
    ];

    /// The magic number opening records of this kind.
    pub fn signature(self) -> &'static [u8; 4] {
        match self {
            RecordKind::LocalFileHeader => FileHeader::SIGNATURE,
            RecordKind::DataDescriptor => DataDescriptor::SIGNATURE,
            RecordKind::CentralDirectoryHeader => CentralDirectoryHeader::SIGNATURE,
            RecordKind::EndOfCentralDirectory => EndOfCentralDirectory::SIGNATURE,
        }
    }

    /// Size of the fixed prefix, signature included.
    pub fn fixed_size(self) -> usize {
        match self {
            RecordKind::LocalFileHeader => FileHeader::FIXED_SIZE,
            RecordKind::DataDescriptor => DataDescriptor::FIXED_SIZE,
            RecordKind::CentralDirectoryHeader => CentralDirectoryHeader::FIXED_SIZE,
            RecordKind::EndOfCentralDirectory => EndOfCentralDirectory::FIXED_SIZE,
        }
    }

    pub fn from_signature(magic: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| magic.starts_with(kind.signature()))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::LocalFileHeader => "local file header",
            RecordKind::DataDescriptor => "data descriptor",
            RecordKind::CentralDirectoryHeader => "central directory header",
            RecordKind::EndOfCentralDirectory => "end of central directory",
        };
        f.write_str(name)
    }
}

/// Outcome of decoding a record from the front of a byte slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<T> {
    /// The whole record was available; `consumed` bytes belong to it.
    Complete { record: T, consumed: usize },
    /// More bytes are needed. Nothing was consumed.
    Incomplete,
}

impl<T> Parsed<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Complete { record, consumed } => Parsed::Complete {
                record: f(record),
                consumed,
            },
            Parsed::Incomplete => Parsed::Incomplete,
        }
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, Parsed::Incomplete)
    }
}

/// Any decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    LocalFileHeader(FileHeader),
    DataDescriptor(DataDescriptor),
    CentralDirectoryHeader(CentralDirectoryHeader),
    EndOfCentralDirectory(EndOfCentralDirectory),
}

impl Record {
    /// Decode one record of the given kind from the front of `data`.
    pub fn decode(kind: RecordKind, data: &[u8]) -> Result<Parsed<Record>> {
        Ok(match kind {
            RecordKind::LocalFileHeader => FileHeader::decode(data)?.map(Record::LocalFileHeader),
            RecordKind::DataDescriptor => {
                DataDescriptor::decode(data)?.map(Record::DataDescriptor)
            }
            RecordKind::CentralDirectoryHeader => {
                CentralDirectoryHeader::decode(data)?.map(Record::CentralDirectoryHeader)
            }
            RecordKind::EndOfCentralDirectory => {
                EndOfCentralDirectory::decode(data)?.map(Record::EndOfCentralDirectory)
            }
        })
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Record::LocalFileHeader(_) => RecordKind::LocalFileHeader,
            Record::DataDescriptor(_) => RecordKind::DataDescriptor,
            Record::CentralDirectoryHeader(_) => RecordKind::CentralDirectoryHeader,
            Record::EndOfCentralDirectory(_) => RecordKind::EndOfCentralDirectory,
        }
    }
}

/// Check the signature and hand back a cursor over the fixed prefix fields.
fn fixed_prefix(kind: RecordKind, data: &[u8]) -> Result<Option<Cursor<&[u8]>>> {
    if data.len() < 4 {
        return Ok(None);
    }
    if &data[0..4] != kind.signature() {
        let mut found = [0u8; 4];
        found.copy_from_slice(&data[0..4]);
        return Err(ZipError::InvalidSignature { kind, found });
    }
    if data.len() < kind.fixed_size() {
        return Ok(None);
    }
    Ok(Some(Cursor::new(&data[4..kind.fixed_size()])))
}

/// Split the variable-length tail into fields of the declared lengths.
fn variable_fields<const N: usize>(tail: &[u8], lengths: [u16; N]) -> Option<[Vec<u8>; N]> {
    let total: usize = lengths.iter().map(|&len| len as usize).sum();
    if tail.len() < total {
        return None;
    }
    let mut offset = 0;
    Some(lengths.map(|len| {
        let field = tail[offset..offset + len as usize].to_vec();
        offset += len as usize;
        field
    }))
}

fn field_len(field: &[u8], name: &str) -> io::Result<u16> {
    u16::try_from(field.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} is {} bytes, above the 65535 byte limit", field.len()),
        )
    })
}

/// Parse a DOS date to (year, month, day)
pub fn dos_date(date: u16) -> (u16, u8, u8) {
    let day = (date & 0x1F) as u8;
    let month = ((date >> 5) & 0x0F) as u8;
    let year = ((date >> 9) & 0x7F) + 1980;
    (year, month, day)
}

/// Parse a DOS time to (hour, minute, second)
pub fn dos_time(time: u16) -> (u8, u8, u8) {
    let second = ((time & 0x1F) * 2) as u8;
    let minute = ((time >> 5) & 0x3F) as u8;
    let hour = ((time >> 11) & 0x1F) as u8;
    (hour, minute, second)
}

/// Local File Header (LFH) - 30 bytes plus file name and extra field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: Vec<u8>,
    pub extra_field: Vec<u8>,
}

impl FileHeader {
    pub const SIGNATURE: &'static [u8; 4] = b"PK\x03\x04";
    pub const FIXED_SIZE: usize = 30;

    pub fn decode(data: &[u8]) -> Result<Parsed<Self>> {
        let Some(mut cursor) = fixed_prefix(RecordKind::LocalFileHeader, data)? else {
            return Ok(Parsed::Incomplete);
        };

        let version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;

        let tail = &data[Self::FIXED_SIZE..];
        let Some([file_name, extra_field]) =
            variable_fields(tail, [file_name_length, extra_field_length])
        else {
            return Ok(Parsed::Incomplete);
        };

        let consumed = Self::FIXED_SIZE + file_name.len() + extra_field.len();
        Ok(Parsed::Complete {
            record: Self {
                version_needed,
                flags,
                compression_method,
                last_mod_time,
                last_mod_date,
                crc32,
                compressed_size,
                uncompressed_size,
                file_name,
                extra_field,
            },
            consumed,
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let file_name_length = field_len(&self.file_name, "file name")?;
        let extra_field_length = field_len(&self.extra_field, "extra field")?;

        w.write_all(Self::SIGNATURE)?;
        w.write_u16::<LittleEndian>(self.version_needed)?;
        w.write_u16::<LittleEndian>(self.flags)?;
        w.write_u16::<LittleEndian>(self.compression_method)?;
        w.write_u16::<LittleEndian>(self.last_mod_time)?;
        w.write_u16::<LittleEndian>(self.last_mod_date)?;
        w.write_u32::<LittleEndian>(self.crc32)?;
        w.write_u32::<LittleEndian>(self.compressed_size)?;
        w.write_u32::<LittleEndian>(self.uncompressed_size)?;
        w.write_u16::<LittleEndian>(file_name_length)?;
        w.write_u16::<LittleEndian>(extra_field_length)?;
        w.write_all(&self.file_name)?;
        w.write_all(&self.extra_field)
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    pub fn encoded_len(&self) -> usize {
        Self::FIXED_SIZE + self.file_name.len() + self.extra_field.len()
    }

    /// File name, with non-UTF8 bytes replaced
    pub fn file_name(&self) -> String {
        String::from_utf8_lossy(&self.file_name).into_owned()
    }

    pub fn compression(&self) -> CompressionMethod {
        CompressionMethod::from_u16(self.compression_method)
    }

    /// Sizes and CRC are deferred to a trailing data descriptor.
    pub fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    pub fn is_directory(&self) -> bool {
        self.file_name.ends_with(b"/")
    }

    pub fn mod_date(&self) -> (u16, u8, u8) {
        dos_date(self.last_mod_date)
    }

    pub fn mod_time(&self) -> (u8, u8, u8) {
        dos_time(self.last_mod_time)
    }
}

/// Data Descriptor - 16 bytes, signature included
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataDescriptor {
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

impl DataDescriptor {
    pub const SIGNATURE: &'static [u8; 4] = b"PK\x07\x08";
    pub const FIXED_SIZE: usize = 16;

    pub fn decode(data: &[u8]) -> Result<Parsed<Self>> {
        let Some(mut cursor) = fixed_prefix(RecordKind::DataDescriptor, data)? else {
            return Ok(Parsed::Incomplete);
        };

        Ok(Parsed::Complete {
            record: Self {
                crc32: cursor.read_u32::<LittleEndian>()?,
                compressed_size: cursor.read_u32::<LittleEndian>()?,
                uncompressed_size: cursor.read_u32::<LittleEndian>()?,
            },
            consumed: Self::FIXED_SIZE,
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(Self::SIGNATURE)?;
        w.write_u32::<LittleEndian>(self.crc32)?;
        w.write_u32::<LittleEndian>(self.compressed_size)?;
        w.write_u32::<LittleEndian>(self.uncompressed_size)
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::FIXED_SIZE);
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

/// Central Directory File Header (CDFH) - 46 bytes plus name, extra and comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CentralDirectoryHeader {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_number_start: u16,
    pub internal_attrs: u16,
    pub external_attrs: u32,
    pub local_header_offset: u32,
    pub file_name: Vec<u8>,
    pub extra_field: Vec<u8>,
    pub comment: Vec<u8>,
}

impl CentralDirectoryHeader {
    pub const SIGNATURE: &'static [u8; 4] = b"PK\x01\x02";
    pub const FIXED_SIZE: usize = 46;

    pub fn decode(data: &[u8]) -> Result<Parsed<Self>> {
        let Some(mut cursor) = fixed_prefix(RecordKind::CentralDirectoryHeader, data)? else {
            return Ok(Parsed::Incomplete);
        };

        let version_made_by = cursor.read_u16::<LittleEndian>()?;
        let version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let comment_length = cursor.read_u16::<LittleEndian>()?;
        let disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let external_attrs = cursor.read_u32::<LittleEndian>()?;
        let local_header_offset = cursor.read_u32::<LittleEndian>()?;

        let tail = &data[Self::FIXED_SIZE..];
        let Some([file_name, extra_field, comment]) = variable_fields(
            tail,
            [file_name_length, extra_field_length, comment_length],
        ) else {
            return Ok(Parsed::Incomplete);
        };

        let consumed = Self::FIXED_SIZE + file_name.len() + extra_field.len() + comment.len();
        Ok(Parsed::Complete {
            record: Self {
                version_made_by,
                version_needed,
                flags,
                compression_method,
                last_mod_time,
                last_mod_date,
                crc32,
                compressed_size,
                uncompressed_size,
                disk_number_start,
                internal_attrs,
                external_attrs,
                local_header_offset,
                file_name,
                extra_field,
                comment,
            },
            consumed,
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let file_name_length = field_len(&self.file_name, "file name")?;
        let extra_field_length = field_len(&self.extra_field, "extra field")?;
        let comment_length = field_len(&self.comment, "file comment")?;

        w.write_all(Self::SIGNATURE)?;
        w.write_u16::<LittleEndian>(self.version_made_by)?;
        w.write_u16::<LittleEndian>(self.version_needed)?;
        w.write_u16::<LittleEndian>(self.flags)?;
        w.write_u16::<LittleEndian>(self.compression_method)?;
        w.write_u16::<LittleEndian>(self.last_mod_time)?;
        w.write_u16::<LittleEndian>(self.last_mod_date)?;
        w.write_u32::<LittleEndian>(self.crc32)?;
        w.write_u32::<LittleEndian>(self.compressed_size)?;
        w.write_u32::<LittleEndian>(self.uncompressed_size)?;
        w.write_u16::<LittleEndian>(file_name_length)?;
        w.write_u16::<LittleEndian>(extra_field_length)?;
        w.write_u16::<LittleEndian>(comment_length)?;
        w.write_u16::<LittleEndian>(self.disk_number_start)?;
        w.write_u16::<LittleEndian>(self.internal_attrs)?;
        w.write_u32::<LittleEndian>(self.external_attrs)?;
        w.write_u32::<LittleEndian>(self.local_header_offset)?;
        w.write_all(&self.file_name)?;
        w.write_all(&self.extra_field)?;
        w.write_all(&self.comment)
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    pub fn encoded_len(&self) -> usize {
        Self::FIXED_SIZE + self.file_name.len() + self.extra_field.len() + self.comment.len()
    }

    pub fn file_name(&self) -> String {
        String::from_utf8_lossy(&self.file_name).into_owned()
    }

    pub fn compression(&self) -> CompressionMethod {
        CompressionMethod::from_u16(self.compression_method)
    }

    pub fn is_directory(&self) -> bool {
        self.file_name.ends_with(b"/")
    }

    pub fn mod_date(&self) -> (u16, u8, u8) {
        dos_date(self.last_mod_date)
    }

    pub fn mod_time(&self) -> (u8, u8, u8) {
        dos_time(self.last_mod_time)
    }
}

/// End of Central Directory (EOCD) - 22 bytes plus comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment: Vec<u8>,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8; 4] = b"PK\x05\x06";
    pub const FIXED_SIZE: usize = 22;

    pub fn decode(data: &[u8]) -> Result<Parsed<Self>> {
        let Some(mut cursor) = fixed_prefix(RecordKind::EndOfCentralDirectory, data)? else {
            return Ok(Parsed::Incomplete);
        };

        let disk_number = cursor.read_u16::<LittleEndian>()?;
        let disk_with_cd = cursor.read_u16::<LittleEndian>()?;
        let disk_entries = cursor.read_u16::<LittleEndian>()?;
        let total_entries = cursor.read_u16::<LittleEndian>()?;
        let cd_size = cursor.read_u32::<LittleEndian>()?;
        let cd_offset = cursor.read_u32::<LittleEndian>()?;
        let comment_length = cursor.read_u16::<LittleEndian>()?;

        let mut tail = &data[Self::FIXED_SIZE..];
        if tail.len() < comment_length as usize {
            return Ok(Parsed::Incomplete);
        }
        let mut comment = vec![0u8; comment_length as usize];
        tail.read_exact(&mut comment)?;

        Ok(Parsed::Complete {
            consumed: Self::FIXED_SIZE + comment.len(),
            record: Self {
                disk_number,
                disk_with_cd,
                disk_entries,
                total_entries,
                cd_size,
                cd_offset,
                comment,
            },
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let comment_length = field_len(&self.comment, "archive comment")?;

        w.write_all(Self::SIGNATURE)?;
        w.write_u16::<LittleEndian>(self.disk_number)?;
        w.write_u16::<LittleEndian>(self.disk_with_cd)?;
        w.write_u16::<LittleEndian>(self.disk_entries)?;
        w.write_u16::<LittleEndian>(self.total_entries)?;
        w.write_u32::<LittleEndian>(self.cd_size)?;
        w.write_u32::<LittleEndian>(self.cd_offset)?;
        w.write_u16::<LittleEndian>(comment_length)?;
        w.write_all(&self.comment)
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::FIXED_SIZE + self.comment.len());
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> FileHeader {
        FileHeader {
            version_needed: 20,
            flags: FLAG_DATA_DESCRIPTOR,
            compression_method: 8,
            last_mod_time: 0x6d8a,
            last_mod_date: 0x5a4e,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            file_name: b"docs/readme.txt".to_vec(),
            extra_field: vec![0x55, 0x54, 0x01, 0x00, 0x00],
        }
    }

    #[test]
    fn local_header_layout_is_little_endian() {
        let bytes = FileHeader {
            version_needed: 0x0014,
            flags: 0x0808,
            compression_method: 8,
            crc32: 0x1234_5678,
            file_name: b"a".to_vec(),
            ..Default::default()
        }
        .to_bytes()
        .unwrap();

        assert_eq!(&bytes[0..4], b"PK\x03\x04");
        assert_eq!(&bytes[4..6], &[0x14, 0x00]);
        assert_eq!(&bytes[6..8], &[0x08, 0x08]);
        assert_eq!(&bytes[14..18], &[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(&bytes[26..28], &[0x01, 0x00]);
        assert_eq!(bytes.len(), 31);
    }

    #[test]
    fn local_header_decodes_variable_fields() {
        let header = sample_header();
        let mut bytes = header.to_bytes().unwrap();
        bytes.extend_from_slice(b"compressed data follows");

        match FileHeader::decode(&bytes).unwrap() {
            Parsed::Complete { record, consumed } => {
                assert_eq!(consumed, header.encoded_len());
                assert_eq!(record, header);
                assert_eq!(record.file_name(), "docs/readme.txt");
                assert!(record.has_data_descriptor());
                assert_eq!(record.compression(), CompressionMethod::Deflate);
            }
            Parsed::Incomplete => panic!("header should be complete"),
        }
    }

    #[test]
    fn every_prefix_of_a_record_is_incomplete() {
        let bytes = sample_header().to_bytes().unwrap();
        for len in 0..bytes.len() {
            assert!(
                FileHeader::decode(&bytes[..len]).unwrap().is_incomplete(),
                "prefix of {len} bytes"
            );
        }

        let cd = CentralDirectoryHeader {
            file_name: b"x".to_vec(),
            comment: b"note".to_vec(),
            ..Default::default()
        }
        .to_bytes()
        .unwrap();
        for len in 0..cd.len() {
            assert!(CentralDirectoryHeader::decode(&cd[..len]).unwrap().is_incomplete());
        }
    }

    #[test]
    fn wrong_signature_is_rejected() {
        let bytes = DataDescriptor::default().to_bytes().unwrap();
        let err = FileHeader::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ZipError::InvalidSignature {
                kind: RecordKind::LocalFileHeader,
                found: [b'P', b'K', 7, 8]
            }
        ));
    }

    #[test]
    fn signature_lookup_covers_all_kinds() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::from_signature(kind.signature()), Some(kind));
        }
        assert_eq!(RecordKind::from_signature(b"PK\x06\x06"), None);
        assert_eq!(RecordKind::from_signature(b"PK"), None);
    }

    #[test]
    fn record_dispatch_matches_kind() {
        let eocd = EndOfCentralDirectory {
            disk_entries: 2,
            total_entries: 2,
            cd_size: 120,
            cd_offset: 4096,
            comment: b"archive comment".to_vec(),
            ..Default::default()
        };
        let bytes = eocd.to_bytes().unwrap();

        let parsed = Record::decode(RecordKind::EndOfCentralDirectory, &bytes).unwrap();
        match parsed {
            Parsed::Complete { record, consumed } => {
                assert_eq!(record.kind(), RecordKind::EndOfCentralDirectory);
                assert_eq!(record, Record::EndOfCentralDirectory(eocd));
                assert_eq!(consumed, bytes.len());
            }
            Parsed::Incomplete => panic!("eocd should be complete"),
        }
    }

    #[test]
    fn central_directory_header_fields() {
        let cd = CentralDirectoryHeader {
            version_made_by: 0x031e,
            version_needed: 20,
            compression_method: 0,
            crc32: 0x3610a686,
            compressed_size: 5,
            uncompressed_size: 5,
            external_attrs: 0o100644 << 16,
            local_header_offset: 0x0102_0304,
            file_name: b"dir/".to_vec(),
            ..Default::default()
        };
        let bytes = cd.to_bytes().unwrap();
        assert_eq!(&bytes[42..46], &[0x04, 0x03, 0x02, 0x01]);

        let Parsed::Complete { record, .. } = CentralDirectoryHeader::decode(&bytes).unwrap()
        else {
            panic!("cd header should be complete");
        };
        assert_eq!(record, cd);
        assert!(record.is_directory());
    }

    #[test]
    fn oversized_field_cannot_be_encoded() {
        let header = FileHeader {
            file_name: vec![b'a'; u16::MAX as usize + 1],
            ..Default::default()
        };
        let err = header.to_bytes().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn dos_timestamp_decoding() {
        // 2025-02-14 13:44:20
        let date = ((2025 - 1980) << 9) | (2 << 5) | 14;
        let time = (13 << 11) | (44 << 5) | 10;
        assert_eq!(dos_date(date), (2025, 2, 14));
        assert_eq!(dos_time(time), (13, 44, 20));
    }
}
