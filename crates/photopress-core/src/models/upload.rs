use bytes::Bytes;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::QualityLevel;
use crate::config::UploadLimits;
use crate::error::FileLoadError;
use crate::validation::validate_file_metadata;

/// Content type used when the extension does not identify an image.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Guess a content type from a file extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// A file chosen by the user, held for the duration of one submission attempt.
#[derive(Clone)]
pub struct SelectedFile {
    name: String,
    content_type: String,
    data: Bytes,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk. The content type is derived from the extension
    /// unless one is given. Type and size are checked against `limits` from
    /// the file's metadata, so a rejected file is never read.
    pub fn from_path(
        path: &Path,
        content_type: Option<String>,
        limits: &UploadLimits,
    ) -> Result<Self, FileLoadError> {
        let io_error = |source| FileLoadError::Io {
            path: path.display().to_string(),
            source,
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| FileLoadError::InvalidName(path.display().to_string()))?;

        let content_type =
            content_type.unwrap_or_else(|| content_type_for_path(path).to_string());

        let mut file = File::open(path).map_err(io_error)?;
        let size = file.metadata().map_err(io_error)?.len();
        validate_file_metadata(&content_type, size, limits)?;

        let mut data = Vec::with_capacity(size as usize);
        file.read_to_end(&mut data).map_err(io_error)?;

        Ok(Self::new(name, content_type, data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Raw form values as entered, before validation.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub email: String,
    pub quality: Option<String>,
    pub file: Option<SelectedFile>,
}

/// A submission that passed validation.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub email: String,
    pub quality: QualityLevel,
    pub file: SelectedFile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIB;
    use crate::error::ValidationError;
    use std::io::Write;

    #[test]
    fn test_content_type_for_path() {
        assert_eq!(content_type_for_path(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(content_type_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(
            content_type_for_path(Path::new("notes.txt")),
            FALLBACK_CONTENT_TYPE
        );
        assert_eq!(
            content_type_for_path(Path::new("no_extension")),
            FALLBACK_CONTENT_TYPE
        );
    }

    #[test]
    fn test_from_path_reads_bytes_and_guesses_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not really a png").unwrap();

        let limits = UploadLimits::default();
        let selected = SelectedFile::from_path(&path, None, &limits).unwrap();
        assert_eq!(selected.name(), "photo.png");
        assert_eq!(selected.content_type(), "image/png");
        assert_eq!(selected.size(), 16);

        let overridden =
            SelectedFile::from_path(&path, Some("image/jpeg".to_string()), &limits).unwrap();
        assert_eq!(overridden.content_type(), "image/jpeg");
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SelectedFile::from_path(
            Path::new("/definitely/not/here.png"),
            None,
            &UploadLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FileLoadError::Io { .. }));
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_from_path_rejects_oversized_file_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        // Sparse: the length is set without writing any data
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(4 * 1024 * MIB).unwrap();

        let err = SelectedFile::from_path(&path, None, &UploadLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            FileLoadError::Rejected(ValidationError::FileTooLarge {
                size,
                max_bytes: 10_485_760,
            }) if size == 4 * 1024 * MIB
        ));
        assert_eq!(err.to_string(), "File size must be less than 10MB");
    }

    #[test]
    fn test_from_path_rejects_type_before_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.gif");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(11 * MIB).unwrap();

        let err = SelectedFile::from_path(&path, None, &UploadLimits::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please select a valid image file (PNG, JPG, or JPEG)"
        );
    }

    #[test]
    fn test_debug_omits_contents() {
        let file = SelectedFile::new("x.png", "image/png", vec![0u8; 4]);
        let debug = format!("{:?}", file);
        assert!(debug.contains("x.png"));
        assert!(debug.contains("size: 4"));
    }
}
