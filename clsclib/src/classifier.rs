//! Line classification for C source files.
//!
//! Each line is counted as blank, comment, or code. The only state carried
//! from one line to the next is whether a `/* ... */` block comment is still
//! open, so a block spanning several lines marks all of them as comment.
//!
//! The scan is purely lexical: `//`, `/*` and `*/` are recognized wherever
//! they appear, including inside string and character literals, and
//! preprocessor lines are treated like any other code.
//!
//! Lines are processed as raw bytes, so files that are not valid UTF-8 are
//! still classified and reading never fails because of content.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::ClscError;
use crate::stats::{LineCounts, LineKind};
use crate::Result;

/// Whitespace as understood by C's `isspace` in the "C" locale.
fn is_c_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Bytes read from a file per chunk. Lines longer than this are scanned
/// across several chunks and still count as one line.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// State carried across the lines of one file, plus the scan of the line in
/// progress.
///
/// Bytes are fed with [`scan`](Self::scan) in as many pieces as needed and
/// the line is closed with [`finish_line`](Self::finish_line). A delimiter
/// split between two pieces is still recognized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationState {
    inside_block_comment: bool,
    started_in_block: bool,
    saw_code: bool,
    saw_comment: bool,
    in_line_comment: bool,
    /// `/` outside a block or `*` inside one, waiting for the next byte
    pending: Option<u8>,
}

impl ClassificationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `/*` has been seen without its matching `*/`.
    pub fn inside_block_comment(&self) -> bool {
        self.inside_block_comment
    }

    /// Classify one complete line and update the block comment state.
    ///
    /// Code wins over comment: a line with both is code. A line that only
    /// closes a block comment is comment.
    pub fn classify(&mut self, line: &[u8]) -> LineKind {
        self.scan(line);
        self.finish_line()
    }

    /// Feed the next bytes of the current line.
    pub fn scan(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.in_line_comment {
                return;
            }
            self.feed(byte);
        }
    }

    fn feed(&mut self, byte: u8) {
        if self.inside_block_comment {
            self.saw_comment = true;
            if self.pending == Some(b'*') && byte == b'/' {
                self.inside_block_comment = false;
                self.pending = None;
            } else {
                self.pending = (byte == b'*').then_some(byte);
            }
            return;
        }

        if self.pending.take() == Some(b'/') {
            match byte {
                b'*' => {
                    self.inside_block_comment = true;
                    self.saw_comment = true;
                    return;
                }
                b'/' => {
                    self.saw_comment = true;
                    self.in_line_comment = true;
                    return;
                }
                _ => self.saw_code = true,
            }
        }

        if byte == b'/' {
            self.pending = Some(byte);
        } else if !is_c_space(byte) {
            self.saw_code = true;
        }
    }

    /// Close the current line and return its kind. Delimiters never span
    /// lines, so a dangling `/` counts as code and a dangling `*` is dropped.
    pub fn finish_line(&mut self) -> LineKind {
        if !self.inside_block_comment && self.pending == Some(b'/') {
            self.saw_code = true;
        }

        let kind = if self.saw_code {
            LineKind::Code
        } else if self.saw_comment || self.started_in_block {
            LineKind::Comment
        } else {
            LineKind::Blank
        };

        *self = Self {
            inside_block_comment: self.inside_block_comment,
            started_in_block: self.inside_block_comment,
            ..Self::default()
        };
        kind
    }
}

/// Streams a source and counts line kinds.
///
/// Memory use is bounded by the reader's buffer: lines are scanned chunk by
/// chunk as they arrive and never collected.
pub struct LineClassifier<R: BufRead> {
    reader: R,
    path: Option<PathBuf>,
    state: ClassificationState,
    counts: LineCounts,
}

impl LineClassifier<BufReader<File>> {
    /// Open a file for classification.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ClscError::FileUnreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut classifier = Self::from_reader(BufReader::with_capacity(CHUNK_SIZE, file));
        classifier.path = Some(path.to_path_buf());
        Ok(classifier)
    }
}

impl<R: BufRead> LineClassifier<R> {
    /// Create a classifier over any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            path: None,
            state: ClassificationState::new(),
            counts: LineCounts::new(),
        }
    }

    /// Read to the end and return the counts. The final line counts even
    /// without a trailing newline.
    pub fn classify(mut self) -> io::Result<LineCounts> {
        let mut line_no = 0u64;
        let mut line_open = false;

        loop {
            let chunk = match self.reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if chunk.is_empty() {
                break;
            }

            let (used, line_done) = match chunk.iter().position(|&b| b == b'\n') {
                Some(end) => (end + 1, true),
                None => (chunk.len(), false),
            };
            self.state.scan(&chunk[..used]);
            self.reader.consume(used);
            line_open = !line_done;

            if line_done {
                line_no += 1;
                self.record_line(line_no);
            }
        }

        if line_open {
            self.record_line(line_no + 1);
        }

        Ok(self.counts)
    }

    fn record_line(&mut self, line_no: u64) {
        let kind = self.state.finish_line();
        self.counts.record(kind);

        if let Some(path) = &self.path {
            trace!("{}:{line_no}: {kind:?}", path.display());
        }
    }
}

/// Classify every line of the file at `path`.
///
/// # Example
///
/// ```rust,ignore
/// use clsclib::classifier::classify_file;
///
/// let counts = classify_file("src/main.c")?;
/// println!("code: {}, comment: {}", counts.code, counts.comment);
/// ```
pub fn classify_file(path: impl AsRef<Path>) -> Result<LineCounts> {
    let path = path.as_ref();
    LineClassifier::open(path)?
        .classify()
        .map_err(|e| ClscError::FileUnreadable {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Classify any buffered reader.
pub fn classify_reader<R: BufRead>(reader: R) -> io::Result<LineCounts> {
    LineClassifier::from_reader(reader).classify()
}

/// Classify C source held in memory.
///
/// # Example
///
/// ```rust
/// use clsclib::classifier::classify_str;
///
/// let source = "int x = 1; // set\n/* a\n   b */\n\n";
/// let counts = classify_str(source);
/// assert_eq!(counts.code, 1);
/// assert_eq!(counts.comment, 2);
/// assert_eq!(counts.blank, 1);
/// ```
pub fn classify_str(source: &str) -> LineCounts {
    // Reading from a byte slice cannot fail.
    classify_reader(source.as_bytes()).unwrap_or_default()
}
