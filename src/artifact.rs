//! Persisting rendered charts.

use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::group::GroupKey;
use crate::output::PngEncoder;
use std::path::{Path, PathBuf};
use tracing::info;

/// Image file extension for every artifact.
pub const EXTENSION: &str = "png";

/// Writes one image per group into an output directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
    encoder: PngEncoder,
}

impl ArtifactWriter {
    /// Writer targeting `output_dir`, tagging images with `dpi`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            output_dir: output_dir.into(),
            encoder: PngEncoder::new(dpi),
        }
    }

    /// Destination directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolution written into each image.
    #[must_use]
    pub fn dpi(&self) -> u32 {
        self.encoder.dpi()
    }

    /// Path the artifact for `key` is written to.
    #[must_use]
    pub fn path_for(&self, key: &GroupKey) -> PathBuf {
        self.output_dir.join(format!("{}.{EXTENSION}", key.file_stem()))
    }

    /// Encode `fb` and write it for `key`, creating the output directory if
    /// needed. Overwrites an existing file of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArtifactWrite`] naming the group on any I/O or
    /// encoding failure.
    pub fn write(&self, fb: &Framebuffer, key: &GroupKey) -> Result<PathBuf> {
        let path = self.path_for(key);
        let result = std::fs::create_dir_all(&self.output_dir)
            .map_err(Error::from)
            .and_then(|()| self.encoder.write_to_file(fb, &path));

        match result {
            Ok(()) => {
                info!(key = %key, path = %path.display(), "wrote chart");
                Ok(path)
            }
            Err(source) => Err(Error::ArtifactWrite {
                key: key.to_string(),
                path,
                source: Box::new(source),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(8, 8).unwrap();
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_global_and_per_entity_names() {
        let writer = ArtifactWriter::new("out", 300);
        assert_eq!(
            writer.path_for(&GroupKey::global("DeleteAllAsync")),
            Path::new("out").join("DeleteAllAsync_all_entities.png")
        );
        assert_eq!(
            writer.path_for(&GroupKey::per_entity("Athlete", "GetAllAsync")),
            Path::new("out").join("Athlete_GetAllAsync.png")
        );
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path().join("charts").join("nested"), 300);
        let path = writer.write(&canvas(), &GroupKey::global("GetAllAsync")).unwrap();
        assert!(path.exists());
        assert_eq!(writer.dpi(), 300);
    }

    #[test]
    fn test_write_failure_names_group() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let writer = ArtifactWriter::new(&blocker, 300);
        let err = writer.write(&canvas(), &GroupKey::per_entity("Team", "UpdateAsync")).unwrap_err();
        match err {
            Error::ArtifactWrite { key, .. } => assert_eq!(key, "Team/UpdateAsync"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
