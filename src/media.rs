//! Media objects referenced by image elements.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};

/// Opaque reference to a file attached to a media object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaFile {
    xref: String,
    filename: PathBuf,
}

impl MediaFile {
    /// Creates a reference to `filename` belonging to media record `xref`.
    pub fn new(xref: impl Into<String>, filename: impl Into<PathBuf>) -> Self {
        Self {
            xref: xref.into(),
            filename: filename.into(),
        }
    }

    /// Identifier of the owning media record.
    pub fn xref(&self) -> &str {
        &self.xref
    }

    /// Path of the file, relative to the media store.
    pub fn filename(&self) -> &Path {
        &self.filename
    }
}

/// Turns media references into displayable bytes.
pub trait MediaStore {
    /// Loads the bytes of `media`, failing with [`ReportError::MissingImageSource`].
    fn load(&self, media: &MediaFile) -> Result<Vec<u8>>;
}

/// Media stored below a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct FilesystemMediaStore {
    root: PathBuf,
}

impl FilesystemMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaStore for FilesystemMediaStore {
    fn load(&self, media: &MediaFile) -> Result<Vec<u8>> {
        if media.filename().is_absolute()
            || media
                .filename()
                .components()
                .any(|part| matches!(part, std::path::Component::ParentDir))
        {
            return Err(ReportError::missing_image(
                media.xref(),
                format!("{} escapes the media directory", media.filename().display()),
            ));
        }

        let path = self.root.join(media.filename());
        fs::read(&path).map_err(|err| {
            ReportError::missing_image(media.xref(), format!("{}: {err}", path.display()))
        })
    }
}

/// A store without any media; every lookup fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMedia;

impl MediaStore for NoMedia {
    fn load(&self, media: &MediaFile) -> Result<Vec<u8>> {
        Err(ReportError::missing_image(media.xref(), "no media store configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_store_reads_relative_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("photo.png"), b"bytes").expect("write fixture");

        let store = FilesystemMediaStore::new(dir.path());
        let bytes = store.load(&MediaFile::new("M1", "photo.png")).expect("load");
        assert_eq!(bytes, b"bytes");
    }

    #[test]
    fn filesystem_store_reports_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FilesystemMediaStore::new(dir.path());
        let err = store.load(&MediaFile::new("M2", "absent.jpg")).unwrap_err();
        assert!(matches!(err, ReportError::MissingImageSource { ref source_name, .. } if source_name == "M2"));
    }

    #[test]
    fn filesystem_store_rejects_parent_traversal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FilesystemMediaStore::new(dir.path());
        assert!(store.load(&MediaFile::new("M3", "../secret.png")).is_err());
    }

    #[test]
    fn no_media_always_fails() {
        assert!(NoMedia.load(&MediaFile::new("M4", "x.png")).is_err());
    }
}
