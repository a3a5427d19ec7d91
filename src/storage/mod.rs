//! Uploaded file storage.
//!
//! Files are written under a single directory using a sanitized form of the
//! client-supplied name. They are never deleted; every query re-reads them.

use crate::rag::loader::extension_of;
use crate::types::{AppError, Result};
use crate::utils::config::UploadsConfig;
use std::path::{Path, PathBuf};

/// A file accepted by `/upload` and written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    /// Sanitized name the file is stored (and later queried) under
    pub filename: String,
    pub path: PathBuf,
    /// Size in bytes
    pub size: usize,
    /// Lowercase extension without the dot
    pub extension: String,
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Path separators become spaces, runs of whitespace become a single `_`,
/// anything outside `[A-Za-z0-9_.-]` is dropped, and leading or trailing
/// dots and underscores are trimmed. The result may be empty.
pub fn sanitize_filename(name: &str) -> String {
    let unseparated = name.replace(['/', '\\'], " ");
    let joined = unseparated.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

pub struct UploadStore {
    dir: PathBuf,
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl UploadStore {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            max_file_size: config.max_file_size,
            allowed_extensions: config.allowed_extensions.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Whether `filename` carries one of the allowed extensions
    /// (compared case-insensitively).
    pub fn is_allowed(&self, filename: &str) -> bool {
        if !filename.contains('.') {
            return false;
        }
        let ext = extension_of(Path::new(filename));
        !ext.is_empty() && self.allowed_extensions.iter().any(|a| *a == ext)
    }

    /// Validate and write an uploaded file. Nothing is written when
    /// validation fails.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        if original_name.is_empty() {
            return Err(AppError::InvalidInput("No selected file".to_string()));
        }

        if !self.is_allowed(original_name) {
            return Err(AppError::InvalidInput("File type not allowed".to_string()));
        }

        let filename = sanitize_filename(original_name);
        if filename.is_empty() || !self.is_allowed(&filename) {
            return Err(AppError::InvalidInput("File type not allowed".to_string()));
        }

        if bytes.len() > self.max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_file_size
            )));
        }

        self.ensure_dir().await?;
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(
            filename = %filename,
            size = bytes.len(),
            path = %path.display(),
            "Stored upload"
        );

        Ok(StoredFile {
            extension: extension_of(&path),
            size: bytes.len(),
            filename,
            path,
        })
    }

    /// Resolve a filename sent with a query to a stored file.
    pub async fn locate(&self, filename: &str) -> Result<PathBuf> {
        let sanitized = sanitize_filename(filename);
        if sanitized.is_empty() {
            return Err(AppError::NotFound("File not found".to_string()));
        }

        let path = self.dir.join(&sanitized);
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            _ => Err(AppError::NotFound("File not found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn store(dir: &TempDir, max_file_size: usize) -> UploadStore {
        UploadStore::new(&UploadsConfig {
            dir: dir.path().join("uploads"),
            max_file_size,
            ..UploadsConfig::default()
        })
    }

    #[rstest]
    #[case("notes.txt", "notes.txt")]
    #[case("My Report 2024.pdf", "My_Report_2024.pdf")]
    #[case("../../etc/passwd", "etc_passwd")]
    #[case("..\\windows\\system.ini", "windows_system.ini")]
    #[case("  spaced   out .csv", "spaced_out_.csv")]
    #[case("café.docx", "caf.docx")]
    #[case(".hidden.txt", "hidden.txt")]
    #[case("...", "")]
    #[case("", "")]
    fn test_sanitize_filename(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(input), expected);
    }

    #[rstest]
    #[case("report.pdf", true)]
    #[case("REPORT.PDF", true)]
    #[case("sheet.xls", true)]
    #[case("archive.tar.csv", true)]
    #[case("program.exe", false)]
    #[case("noextension", false)]
    #[case("trailingdot.", false)]
    fn test_is_allowed(#[case] name: &str, #[case] allowed: bool) {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir, 1024).is_allowed(name), allowed);
    }

    #[tokio::test]
    async fn test_save_then_locate() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 1024);

        let stored = store.save("My Notes.TXT", b"The sky is blue.").await.unwrap();
        assert_eq!(stored.filename, "My_Notes.TXT");
        assert_eq!(stored.extension, "txt");
        assert_eq!(stored.size, 16);
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"The sky is blue.");

        assert_eq!(store.locate("My Notes.TXT").await.unwrap(), stored.path);
        assert_eq!(store.locate("My_Notes.TXT").await.unwrap(), stored.path);
    }

    #[tokio::test]
    async fn test_rejected_uploads_write_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 8);

        assert!(matches!(
            store.save("", b"x").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            store.save("virus.exe", b"x").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            store.save("big.txt", b"123456789").await,
            Err(AppError::PayloadTooLarge(_))
        ));

        assert!(!store.dir().exists());
    }

    #[tokio::test]
    async fn test_same_name_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 1024);

        store.save("a.txt", b"first").await.unwrap();
        let stored = store.save("a.txt", b"second").await.unwrap();
        assert_eq!(std::fs::read_to_string(stored.path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_locate_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 1024);

        assert!(matches!(
            store.locate("ghost.pdf").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(store.locate("../").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_locate_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 1024);
        std::fs::create_dir_all(store.dir().join("nested.txt")).unwrap();

        assert!(matches!(
            store.locate("nested.txt").await,
            Err(AppError::NotFound(_))
        ));
    }
}
