//! Local image files used as transfer handles.

use std::io;
use std::path::{Path, PathBuf};

/// Content type used when the extension is not a known image type.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A file on disk, described well enough to validate and upload it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Location of the bytes.
    pub path: PathBuf,
    /// Display name, normally the file name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl ImageFile {
    /// Describe a file without touching the filesystem.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            content_type: content_type.into(),
            size,
        }
    }

    /// Stat `path` and infer its content type from the extension.
    ///
    /// # Errors
    ///
    /// Fails if the metadata cannot be read or the path is not a regular file.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let content_type = content_type_for(path).unwrap_or(FALLBACK_CONTENT_TYPE);
        Ok(Self::new(path, name, content_type, metadata.len()))
    }
}

/// Image content type for a path's extension, case-insensitively.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
