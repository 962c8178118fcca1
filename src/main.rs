//! Main entry point for the zipstream CLI application.
//!
//! This binary lists or pipes ZIP archives from local files, standard input
//! or HTTP URLs while their bytes are still arriving.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;

use zipstream::zip::{CentralDirectoryHeader, EndOfCentralDirectory, FileHeader};
use zipstream::{ChunkSource, Cli, HttpSource, ReaderSource, StreamParser, ZipVisitor, feed_from};

/// Application entry point.
///
/// Parses command-line arguments, opens the matching chunk source and streams
/// it through the parser.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut announced = None;
    let mut source: Box<dyn ChunkSource> = if cli.is_http_url() {
        let http = HttpSource::connect(&cli.file).await?;
        announced = http.content_length();
        Box::new(http)
    } else if cli.is_stdin() {
        Box::new(ReaderSource::stdin(cli.chunk_size))
    } else {
        Box::new(ReaderSource::open(Path::new(&cli.file), cli.chunk_size).await?)
    };

    let mut parser = StreamParser::new(Report::new(&cli));
    let streamed = feed_from(source.as_mut(), &mut parser).await;

    // Report what was decoded before any failure; it is still valid.
    let report = parser.into_visitor();
    report.finish()?;
    streamed?;

    if !cli.pipe {
        report.print_listing(cli.verbose);
    }

    // Display network transfer statistics for HTTP sources
    if cli.is_http_url() && !cli.is_quiet() {
        let transferred = source.transferred_bytes();
        match announced {
            Some(length) if length > transferred => eprintln!(
                "\nTotal bytes transferred: {} of {}",
                format_size(transferred),
                format_size(length)
            ),
            _ => eprintln!("\nTotal bytes transferred: {}", format_size(transferred)),
        }
    }

    Ok(())
}

/// Visitor collecting the listing and piping selected content.
struct Report<'a> {
    cli: &'a Cli,
    /// Central directory headers of selected entries, in directory order
    entries: Vec<CentralDirectoryHeader>,
    comment: Vec<u8>,
    /// The entry being streamed is piped to stdout
    piping: bool,
    stdout: io::Stdout,
    /// First write error, reported once the parser returns
    error: Option<io::Error>,
}

impl<'a> Report<'a> {
    fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            entries: Vec::new(),
            comment: Vec::new(),
            piping: false,
            stdout: io::stdout(),
            error: None,
        }
    }

    fn write(&mut self, data: &[u8]) {
        if self.error.is_none()
            && let Err(e) = self.stdout.write_all(data)
        {
            self.error = Some(e);
        }
    }

    fn finish(&self) -> Result<()> {
        if let Some(e) = &self.error {
            anyhow::bail!("cannot write to stdout: {e}");
        }
        Ok(())
    }

    /// List files in the archive.
    ///
    /// Supports two output formats:
    /// - Simple format (`-l`): Just file names, one per line
    /// - Verbose format (`-v`): Detailed table with size, compression ratio, and timestamps
    fn print_listing(&self, verbose: bool) {
        if verbose {
            println!(
                "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
                "Length", "Size", "Cmpr", "Date", "Time"
            );
            println!("{}", "-".repeat(70));
        }

        let mut total_uncompressed = 0u64;
        let mut total_compressed = 0u64;
        let mut file_count = 0usize;

        for entry in &self.entries {
            let name = entry.file_name();
            if !verbose {
                println!("{}", name);
                continue;
            }

            let (year, month, day) = entry.mod_date();
            let (hour, minute, _second) = entry.mod_time();
            let uncompressed = entry.uncompressed_size as u64;
            let compressed = entry.compressed_size as u64;

            println!(
                "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
                uncompressed,
                compressed,
                ratio(compressed, uncompressed),
                year,
                month,
                day,
                hour,
                minute,
                name
            );

            // Accumulate totals (excluding directories)
            if !entry.is_directory() {
                total_uncompressed += uncompressed;
                total_compressed += compressed;
                file_count += 1;
            }
        }

        if verbose {
            println!("{}", "-".repeat(70));
            println!(
                "{:>10}  {:>10}  {}  {:>21}  {} files",
                total_uncompressed,
                total_compressed,
                ratio(total_compressed, total_uncompressed),
                "",
                file_count
            );
            if !self.comment.is_empty() {
                println!("{}", String::from_utf8_lossy(&self.comment));
            }
        }
    }
}

impl ZipVisitor for Report<'_> {
    fn local_header(&mut self, header: &FileHeader) {
        let name = header.file_name();
        self.piping = self.cli.pipe && !header.is_directory() && self.cli.selects(&name);

        if self.piping && self.cli.marks_entries() {
            self.write(format!("--- {} ---\n", name).as_bytes());
        }
    }

    fn content(&mut self, _header: &FileHeader, data: &[u8]) {
        if self.piping {
            self.write(data);
        }
    }

    fn central_directory_header(&mut self, header: &CentralDirectoryHeader) {
        if self.cli.selects(&header.file_name()) {
            self.entries.push(header.clone());
        }
    }

    fn end_of_central_directory(&mut self, eocd: &EndOfCentralDirectory) {
        self.comment = eocd.comment.clone();
        if self.cli.pipe
            && let Err(e) = self.stdout.flush()
        {
            self.error.get_or_insert(e);
        }
    }
}

/// Compression ratio as percentage saved.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 {
        format!(
            "{:>4}%",
            100i64 - (compressed * 100 / uncompressed) as i64
        )
    } else {
        "  0%".to_string()
    }
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
