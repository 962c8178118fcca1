//! Streaming ZIP decoding.
//!
//! This module decodes ZIP archives front to back as their bytes arrive,
//! which suits pipes, sockets and HTTP bodies where seeking to the central
//! directory is not an option.
//!
//! ## Architecture
//!
//! The module is organized into leaf services driven by one state machine:
//!
//! - [`records`]: Binary codecs for the four record kinds (local file header,
//!   data descriptor, central directory header, end of central directory)
//! - [`buffer`]: Byte accumulator that keeps incomplete records intact
//! - [`inflate`]: Per-entry decoders for STORED and raw DEFLATE data
//! - [`parser`]: The [`StreamParser`] state machine
//! - [`visitor`]: The [`ZipVisitor`] callbacks and the closure based [`Callbacks`]
//!
//! ## ZIP Format Overview
//!
//! A ZIP stream consists of:
//! 1. Local file headers, each followed by the entry data and, when flag bit 3
//!    is set, a data descriptor
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Limitations
//!
//! - No encryption support
//! - No ZIP64 extensions
//! - No multi-disk archive support
//! - STORED and DEFLATE only; CRC-32 values are reported, not verified

pub mod buffer;
mod error;
pub mod inflate;
mod parser;
pub mod records;
mod visitor;

pub use error::{Result, ZipError};
pub use parser::StreamParser;
pub use records::*;
pub use visitor::{Callbacks, ZipVisitor};
