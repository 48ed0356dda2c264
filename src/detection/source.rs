//! Source units and file kind classification

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::AsyncRead;

const SCRIPT_EXTENSIONS: &[&str] = &["js", "coffee", "ts", "jsx"];
const STYLE_EXTENSIONS: &[&str] = &["css", "scss", "sass", "styl", "less"];

/// Kind of source file, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Scripts reference features as `Modernizr.<property>`
    Script,
    /// Stylesheets reference features as `html.<class>` selectors
    Style,
    Other,
}

impl SourceKind {
    /// Classifies a path by its (case-insensitive) extension
    pub fn classify(path: &Path) -> Self {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_lowercase(),
            None => return SourceKind::Other,
        };

        let extension = match file_name.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => return SourceKind::Other,
        };

        if SCRIPT_EXTENSIONS.contains(&extension) {
            SourceKind::Script
        } else if STYLE_EXTENSIONS.contains(&extension) {
            SourceKind::Style
        } else {
            SourceKind::Other
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, SourceKind::Other)
    }
}

/// Payload of a source unit
pub enum SourceContents {
    Buffer(Vec<u8>),
    /// No contents at all (e.g. a directory entry)
    Null,
    /// A live stream; sessions reject these
    Stream(Pin<Box<dyn AsyncRead + Send>>),
}

impl fmt::Debug for SourceContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceContents::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
            SourceContents::Null => write!(f, "Null"),
            SourceContents::Stream(_) => write!(f, "Stream"),
        }
    }
}

/// One file-like input item
#[derive(Debug)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub contents: SourceContents,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: SourceContents::Buffer(contents.into()),
        }
    }

    pub fn null(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: SourceContents::Null,
        }
    }

    pub fn stream(path: impl Into<PathBuf>, reader: impl AsyncRead + Send + 'static) -> Self {
        Self {
            path: path.into(),
            contents: SourceContents::Stream(Box::pin(reader)),
        }
    }

    /// Reads a file from disk into a buffered unit
    pub async fn read(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let contents = tokio::fs::read(&path).await?;
        Ok(Self {
            path,
            contents: SourceContents::Buffer(contents),
        })
    }

    pub fn kind(&self) -> SourceKind {
        SourceKind::classify(&self.path)
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.contents, SourceContents::Stream(_))
    }

    /// Buffered contents as text; invalid UTF-8 is replaced
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match &self.contents {
            SourceContents::Buffer(bytes) => Some(String::from_utf8_lossy(bytes)),
            SourceContents::Null | SourceContents::Stream(_) => None,
        }
    }
}
