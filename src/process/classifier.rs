use std::fmt;
use std::io;
use std::str::FromStr;

use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

/// Which pipe of the child process a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// One complete line of tool output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: StreamKind,
    pub text: String,
}

/// How raw output bytes are turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Invalid sequences become U+FFFD
    #[default]
    Utf8,
    /// Every byte maps to the code point of the same value
    Latin1,
}

impl TextEncoding {
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            _ => Err(format!("unsupported text encoding: {}", s)),
        }
    }
}

/// Splits a byte stream into lines at `\r` and `\n`
///
/// Progress meters rewrite a single terminal line with `\r`, so both bytes
/// count as line ends. The marker bytes are dropped and empty lines are
/// never produced. NUL bytes are removed from the decoded text.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
    encoding: TextEncoding,
}

impl LineBuffer {
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            buffer: Vec::new(),
            encoding,
        }
    }

    /// Feed one byte, getting back a line if it completed one
    pub fn push(&mut self, byte: u8) -> Option<String> {
        if byte == b'\r' || byte == b'\n' {
            self.take()
        } else {
            self.buffer.push(byte);
            None
        }
    }

    /// Whatever is left once the stream has ended without a final marker
    pub fn finish(&mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = self.encoding.decode(&self.buffer).replace('\0', "");
        self.buffer.clear();
        Some(text)
    }
}

/// Lazily reads complete lines from one output pipe of a child process
///
/// Lines are produced as soon as their end marker arrives, so a slow tool
/// still shows progress while it runs.
pub struct LineReader<R> {
    reader: BufReader<R>,
    lines: LineBuffer,
    stream: StreamKind,
    done: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R, stream: StreamKind, encoding: TextEncoding) -> Self {
        Self {
            reader: BufReader::new(reader),
            lines: LineBuffer::new(encoding),
            stream,
            done: false,
        }
    }

    /// Next complete line, or `None` once the pipe is closed and drained
    pub async fn next_line(&mut self) -> io::Result<Option<OutputLine>> {
        while !self.done {
            let byte = match self.reader.read_u8().await {
                Ok(byte) => byte,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    self.done = true;
                    let rest = self.lines.finish();
                    return Ok(self.emit(rest));
                }
                Err(e) => return Err(e),
            };
            if let Some(text) = self.lines.push(byte) {
                return Ok(self.emit(Some(text)));
            }
        }
        Ok(None)
    }

    fn emit(&self, text: Option<String>) -> Option<OutputLine> {
        text.map(|text| OutputLine {
            stream: self.stream,
            text,
        })
    }
}
