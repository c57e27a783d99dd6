//! Request-scoped scratch file lifecycle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

/// Guard over a uniquely named output path inside a shared scratch root.
///
/// The filename embeds a freshly generated UUID, which is the sole mechanism
/// keeping concurrent requests from overwriting each other's output. The
/// underlying file (written later by the collaborator) is removed when the
/// guard drops, on every exit path.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Reserve a unique `.mp3` path under `root`.
    ///
    /// The path is generated, not created; the collaborator produces the file
    /// as a side effect of a successful fetch.
    #[must_use]
    pub fn create(root: &Path) -> Self {
        let path = root.join(format!("{}.mp3", Uuid::new_v4()));
        Self { path }
    }

    /// Location the collaborator must write the MP3 to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the produced artifact, if the collaborator materialised one.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error when the file exists but cannot be
    /// read. A missing file is reported as `io::ErrorKind::NotFound`.
    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// Whether the collaborator left an artifact at the reserved path.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path)
            && err.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %err, "failed to remove scratch file");
        }
    }
}
