//! Flat-file storage for uploads, extracted text and confirmed items.

mod naming;

pub use naming::{create_unique, create_unique_named, sanitize_filename, timestamp};

use naming::write_new;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{RequestError, StockscanError, StorageError};
use crate::models::config::StorageConfig;

/// An uploaded sheet image as received from a client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied filename, unsanitized.
    pub filename: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Write-once store for extracted text.
pub trait TextSink {
    /// Persist `text` verbatim and return the name it was stored under.
    fn persist_text(&self, text: &str) -> Result<String, StorageError>;
}

/// Directory-backed storage.
#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    text_dir: PathBuf,
}

impl Storage {
    /// Open storage, creating both directories if needed.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        for dir in [&config.upload_dir, &config.text_dir] {
            fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }

        debug!(
            "Storage ready (uploads: {}, texts: {})",
            config.upload_dir.display(),
            config.text_dir.display()
        );

        Ok(Self {
            upload_dir: config.upload_dir.clone(),
            text_dir: config.text_dir.clone(),
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn text_dir(&self) -> &Path {
        &self.text_dir
    }

    /// Save an upload under its sanitized filename and return the path.
    ///
    /// A name already present in the upload directory gets a counter suffix
    /// (`image.jpg`, `image_1.jpg`, ...), so every request reads its own bytes.
    pub fn save_upload(&self, upload: &ImageUpload) -> Result<PathBuf, StockscanError> {
        let filename = sanitize_filename(&upload.filename);
        if filename.is_empty() {
            return Err(RequestError::MissingInput("No selected file".to_string()).into());
        }

        let (stem, ext) = match filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, ext),
            _ => (filename.as_str(), ""),
        };
        let (name, file) = create_unique_named(&self.upload_dir, stem, ext)?;
        let path = self.upload_dir.join(name);
        write_new(&path, file, &upload.bytes)?;

        debug!("Saved upload {} ({} bytes)", path.display(), upload.bytes.len());
        Ok(path)
    }

    /// Write a caller-confirmed list of items verbatim as pretty JSON.
    pub fn save_confirmed_items(&self, items: &[serde_json::Value]) -> Result<String, StockscanError> {
        if items.is_empty() {
            return Err(RequestError::EmptyConfirmedItems.into());
        }

        let content = serde_json::to_string_pretty(items).map_err(StorageError::from)?;
        let (name, file) = create_unique(&self.text_dir, "confirmed_items", &timestamp(), "json")?;
        write_new(&self.text_dir.join(&name), file, content.as_bytes())?;

        info!("Saved {} confirmed items to {}", items.len(), name);
        Ok(name)
    }
}

impl TextSink for Storage {
    fn persist_text(&self, text: &str) -> Result<String, StorageError> {
        let (name, file) = create_unique(&self.text_dir, "text", &timestamp(), "txt")?;
        write_new(&self.text_dir.join(&name), file, text.as_bytes())?;

        debug!("Persisted {} bytes of text to {}", text.len(), name);
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn storage(root: &Path) -> Storage {
        Storage::open(&StorageConfig {
            upload_dir: root.join("uploads"),
            text_dir: root.join("texts"),
        })
        .unwrap()
    }

    #[test]
    fn test_open_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        assert!(storage.upload_dir().is_dir());
        assert!(storage.text_dir().is_dir());
    }

    #[test]
    fn test_persist_text_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let text = "  line one\n\nline two\n";
        let name = storage.persist_text(text).unwrap();
        assert!(name.starts_with("text_") && name.ends_with(".txt"));

        let stored = fs::read_to_string(storage.text_dir().join(&name)).unwrap();
        assert_eq!(stored, text);
    }

    #[test]
    fn test_consecutive_persists_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let a = storage.persist_text("a").unwrap();
        let b = storage.persist_text("b").unwrap();
        assert_ne!(a, b);
        assert_eq!(fs::read_to_string(storage.text_dir().join(&a)).unwrap(), "a");
        assert_eq!(fs::read_to_string(storage.text_dir().join(&b)).unwrap(), "b");
    }

    #[test]
    fn test_save_upload_sanitizes_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let path = storage
            .save_upload(&ImageUpload::new("../stock sheet.png", b"bytes".to_vec()))
            .unwrap();
        assert_eq!(path, storage.upload_dir().join("stock_sheet.png"));
        assert_eq!(fs::read(&path).unwrap(), b"bytes");
    }

    #[test]
    fn test_same_name_uploads_are_kept_apart() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let first = storage
            .save_upload(&ImageUpload::new("image.jpg", b"request A".to_vec()))
            .unwrap();
        let second = storage
            .save_upload(&ImageUpload::new("image.jpg", b"request B".to_vec()))
            .unwrap();
        let bare = storage
            .save_upload(&ImageUpload::new("scan", b"no extension".to_vec()))
            .unwrap();

        assert_eq!(first, storage.upload_dir().join("image.jpg"));
        assert_eq!(second, storage.upload_dir().join("image_1.jpg"));
        assert_eq!(bare, storage.upload_dir().join("scan"));
        assert_eq!(fs::read(&first).unwrap(), b"request A");
        assert_eq!(fs::read(&second).unwrap(), b"request B");
    }

    #[test]
    fn test_save_upload_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let err = storage
            .save_upload(&ImageUpload::new("..", b"bytes".to_vec()))
            .unwrap_err();
        assert!(matches!(
            err,
            StockscanError::Request(RequestError::MissingInput(_))
        ));
    }

    #[test]
    fn test_confirmed_items_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let items = vec![
            serde_json::json!({"sn": 1, "name": "Coca Cola 500ml", "quantity": 20}),
            serde_json::json!({"anything": ["goes", "here"]}),
        ];
        let name = storage.save_confirmed_items(&items).unwrap();
        assert!(name.starts_with("confirmed_items_") && name.ends_with(".json"));

        let stored = fs::read_to_string(storage.text_dir().join(&name)).unwrap();
        assert_eq!(stored, serde_json::to_string_pretty(&items).unwrap());
        let reloaded: Vec<serde_json::Value> = serde_json::from_str(&stored).unwrap();
        assert_eq!(reloaded, items);
    }

    #[test]
    fn test_empty_confirmed_items_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let err = storage.save_confirmed_items(&[]).unwrap_err();
        assert!(matches!(
            err,
            StockscanError::Request(RequestError::EmptyConfirmedItems)
        ));
        assert_eq!(fs::read_dir(storage.text_dir()).unwrap().count(), 0);
    }
}
