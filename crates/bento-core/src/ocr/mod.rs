//! Boundary to an external text recognizer.
//!
//! The core never recognizes text itself: a [`SlipRecognizer`] turns a slip
//! image into a text blob, and everything downstream works on that text.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::error::OcrError;

/// Language hint passed to recognizers.
pub const DEFAULT_LANGUAGES: &str = "tha+eng";

/// An input image (or pre-recognized text) awaiting recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlipImage {
    /// Display name, usually the file name.
    pub name: String,

    /// Raw file contents. Empty for images not read from `path` yet.
    pub bytes: Vec<u8>,

    /// Source path, when the image lives on disk.
    pub path: Option<PathBuf>,
}

impl SlipImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            path: None,
        }
    }

    /// Refer to an image on disk. The file is read by [`SlipImage::contents`]
    /// so an unreadable file fails only its own slip.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            bytes: Vec::new(),
            path: Some(path.to_path_buf()),
        }
    }

    /// The image contents, read from `path` when not held in memory.
    pub fn contents(&self) -> std::result::Result<Cow<'_, [u8]>, OcrError> {
        match &self.path {
            Some(path) if self.bytes.is_empty() => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| OcrError::InvalidImage(format!("{}: {}", path.display(), e))),
            _ => Ok(Cow::Borrowed(&self.bytes)),
        }
    }

    /// Whether the input is already text rather than an image.
    pub fn is_text(&self) -> bool {
        self.path
            .as_deref()
            .and_then(Path::extension)
            .or_else(|| Path::new(&self.name).extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
    }
}

/// Turns a slip image into text.
///
/// Batches call this one image at a time, never concurrently.
#[allow(async_fn_in_trait)]
pub trait SlipRecognizer {
    async fn recognize(&self, image: &SlipImage) -> std::result::Result<String, OcrError>;
}

/// Recognizer for inputs that already hold UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRecognizer;

impl SlipRecognizer for PlainTextRecognizer {
    async fn recognize(&self, image: &SlipImage) -> std::result::Result<String, OcrError> {
        String::from_utf8(image.contents()?.into_owned())
            .map_err(|e| OcrError::InvalidImage(format!("{}: {}", image.name, e)))
    }
}
