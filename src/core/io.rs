//! Compression-aware I/O helpers
//!
//! Every table and input file can be plain text, gzip or bzip2. The format is
//! picked by extension first and by magic bytes second.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Default buffer size for readers and writers (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file path and/or content
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    Ok(format_from_magic(&magic[..bytes_read]))
}

/// Classify leading bytes: gzip is `1f 8b`, bzip2 is `BZh`
fn format_from_magic(magic: &[u8]) -> CompressionFormat {
    if magic.len() >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        CompressionFormat::Gzip
    } else if magic.len() >= 3 && &magic[..3] == b"BZh" {
        CompressionFormat::Bzip2
    } else {
        CompressionFormat::Plain
    }
}

/// Open a file for line reading, decompressing transparently
pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();
    let format = detect_compression(path)?;
    let file = File::open(path)?;

    let reader: Box<dyn BufRead + Send> = match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    };
    Ok(reader)
}

/// Open an optional input path, falling back to stdin
pub fn open_input<P: AsRef<Path>>(path: Option<P>) -> io::Result<Box<dyn BufRead + Send>> {
    match path {
        Some(p) if p.as_ref() != Path::new("-") => open_reader(p),
        _ => Ok(Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            io::stdin(),
        ))),
    }
}

/// Create an optional output path, falling back to stdout
pub fn create_output<P: AsRef<Path>>(path: Option<P>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(p) if p.as_ref() != Path::new("-") => Ok(Box::new(BufWriter::with_capacity(
            DEFAULT_BUFFER_SIZE,
            File::create(p)?,
        ))),
        _ => Ok(Box::new(BufWriter::with_capacity(
            DEFAULT_BUFFER_SIZE,
            io::stdout(),
        ))),
    }
}

/// Byte line iterator that reuses a buffer to avoid allocations
///
/// Lines are returned undecoded so a single line of invalid UTF-8 can be
/// reported and skipped without ending the read.
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Read the next line as bytes, without the line terminator
    /// Returns None at EOF, Some(Ok(&[u8])) on success, Some(Err) on error
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                }
                if self.buffer.last() == Some(&b'\r') {
                    self.buffer.pop();
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Decode a raw line, `None` if it is not valid UTF-8
#[inline]
pub fn decode_line(bytes: &[u8]) -> Option<&str> {
    std::str::from_utf8(bytes).ok()
}
