//! Document I/O boundary
//!
//! The backend knows the document header (`%PDF-x.y`) and the end-of-file
//! marker, nothing more. Like the libraries it stands in for, it reports
//! failures as plain `io::Error` text; [`message_patterns`] holds the known
//! wordings so callers can classify them.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{ErrorKind, PatternError, TranslationSet};

const HEADER_PREFIX: &[u8] = b"%PDF-";
const EOF_MARKER: &[u8] = b"%%EOF";

/// Bytes searched for the header line.
const HEADER_LIMIT: u64 = 1024;

/// Bytes at the end of the file searched for the end-of-file marker.
const TRAILER_WINDOW: u64 = 1024;

const MSG_NO_VERSION: &str = "Header doesn't contain versioninfo";
const MSG_EMPTY: &str = "Error: End-of-File, expected line";

/// Header-level facts about one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub version: String,
    pub size_bytes: u64,
    pub has_eof_marker: bool,
}

/// Which side of a rewrite failed.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error(transparent)]
    Read(io::Error),

    #[error(transparent)]
    Write(io::Error),
}

/// Document access used by the operations.
pub trait DocumentBackend: Send + Sync {
    /// Version declared in the header.
    fn read_version(&self, path: &Path) -> io::Result<String>;

    fn inspect(&self, path: &Path) -> io::Result<DocumentInfo>;

    /// Copy `input` to `output` with the header declaring `version`.
    ///
    /// Returns the version the input declared. `output` may equal `input`.
    fn write_version(&self, input: &Path, output: &Path, version: &str)
        -> Result<String, RewriteError>;
}

/// Known failure wordings of [`HeaderBackend`], most specific first.
pub fn message_patterns() -> Result<TranslationSet, PatternError> {
    TranslationSet::from_specs(&[
        (
            ErrorKind::DocumentTruncated,
            r"Error: End-of-File, expected line",
            &[],
        ),
        (
            ErrorKind::DocumentInvalidHeader,
            r"Header doesn't contain versioninfo",
            &[],
        ),
    ])
}

/// Reads and rewrites the header line in place.
#[derive(Debug, Default)]
pub struct HeaderBackend;

impl DocumentBackend for HeaderBackend {
    #[instrument(level = "debug", skip(self))]
    fn read_version(&self, path: &Path) -> io::Result<String> {
        let mut reader = BufReader::new(File::open(path)?);
        let line = read_header_line(&mut reader)?;
        let (_, version) = locate_version(&line)?;
        debug!(%version, "read header");
        Ok(version)
    }

    #[instrument(level = "debug", skip(self))]
    fn inspect(&self, path: &Path) -> io::Result<DocumentInfo> {
        let mut file = File::open(path)?;
        let size_bytes = file.metadata()?.len();

        let line = read_header_line(&mut BufReader::new(&mut file))?;
        let (_, version) = locate_version(&line)?;

        let window = size_bytes.min(TRAILER_WINDOW);
        file.seek(SeekFrom::Start(size_bytes - window))?;
        let mut tail = Vec::with_capacity(window as usize);
        file.take(window).read_to_end(&mut tail)?;
        let has_eof_marker = tail.windows(EOF_MARKER.len()).any(|w| w == EOF_MARKER);

        Ok(DocumentInfo {
            version,
            size_bytes,
            has_eof_marker,
        })
    }

    #[instrument(level = "debug", skip(self))]
    fn write_version(
        &self,
        input: &Path,
        output: &Path,
        version: &str,
    ) -> Result<String, RewriteError> {
        let mut bytes = fs::read(input).map_err(RewriteError::Read)?;
        let permissions = fs::metadata(input)
            .map_err(RewriteError::Read)?
            .permissions();

        let head_len = bytes.len().min(HEADER_LIMIT as usize);
        let line = read_header_line(&mut &bytes[..head_len]).map_err(RewriteError::Read)?;
        let (start, previous) = locate_version(&line).map_err(RewriteError::Read)?;
        bytes.splice(start..start + previous.len(), version.bytes());

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(RewriteError::Write)?;
        tmp.write_all(&bytes).map_err(RewriteError::Write)?;
        // NamedTempFile is created 0600; the result keeps the input's mode.
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(RewriteError::Write)?;
        tmp.as_file().sync_all().map_err(RewriteError::Write)?;
        tmp.persist(output).map_err(|e| RewriteError::Write(e.error))?;

        debug!(%previous, %version, output = %output.display(), "rewrote header");
        Ok(previous)
    }
}

/// First line of the document, bounded by [`HEADER_LIMIT`].
fn read_header_line(reader: &mut impl BufRead) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    reader.take(HEADER_LIMIT).read_until(b'\n', &mut line)?;
    if line.is_empty() {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, MSG_EMPTY));
    }
    Ok(line)
}

/// Offset and text of the `d.d` version following the header prefix.
fn locate_version(line: &[u8]) -> io::Result<(usize, String)> {
    let no_version = || io::Error::new(io::ErrorKind::InvalidData, MSG_NO_VERSION);

    let prefix_at = line
        .windows(HEADER_PREFIX.len())
        .position(|w| w == HEADER_PREFIX)
        .ok_or_else(no_version)?;
    let start = prefix_at + HEADER_PREFIX.len();

    let run_on = line.get(start + 3).is_some_and(u8::is_ascii_digit);
    match line.get(start..start + 3) {
        Some([major, b'.', minor])
            if major.is_ascii_digit() && minor.is_ascii_digit() && !run_on =>
        {
            Ok((start, format!("{}.{}", *major as char, *minor as char)))
        }
        _ => Err(no_version()),
    }
}
