//! # zipstream
//!
//! An incremental ZIP parser that decodes archives while their bytes arrive.
//!
//! The core is [`StreamParser`]: push byte chunks of any size into it and it
//! reports every decoded record and every piece of decompressed content to a
//! [`ZipVisitor`]. Nothing is ever seeked, so archives can be consumed
//! straight from a pipe, a socket or an HTTP response body.
//!
//! ## Features
//!
//! - Local file headers, data descriptors, central directory headers and the
//!   end of central directory record, decoded bit-exactly
//! - STORED and DEFLATE entries, with deflate data inflated incrementally
//! - Arbitrary chunk boundaries, down to one byte at a time
//! - Async chunk sources for local files, stdin and HTTP/HTTPS URLs
//!
//! ## Example
//!
//! ```no_run
//! use zipstream::{Callbacks, HttpSource, StreamParser, feed_from};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut source = HttpSource::connect("https://example.com/archive.zip").await?;
//!
//!     let callbacks = Callbacks::new()
//!         .on_local_header(|header| println!("{}", header.file_name()))
//!         .on_content(|_, data| println!("  {} bytes", data.len()));
//!     let mut parser = StreamParser::new(callbacks);
//!
//!     feed_from(&mut source, &mut parser).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use io::{ChunkSource, HttpSource, ReaderSource, feed_from};
pub use zip::{Callbacks, StreamParser, ZipError, ZipVisitor};
