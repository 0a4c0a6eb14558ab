//! Destinations for the generated document.
//!
//! In a browser the response blob is handed to the download manager under a
//! fixed name. Here an [`ArtifactSink`] plays that role: [`DirectorySink`]
//! saves into a directory (keeping earlier downloads, like a browser does),
//! [`StdoutSink`] streams the bytes to standard output.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::error::SubmitError;

/// Binary document returned by the server on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseArtifact {
    /// Download filename.
    pub filename: String,
    /// `Content-Type` reported by the server, if any.
    pub content_type: Option<String>,
    /// Raw body.
    pub bytes: Vec<u8>,
}

/// Where a staged artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    File(PathBuf),
    Stdout,
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdout => f.write_str("<stdout>"),
        }
    }
}

/// Receives the document of a successful submission.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Stores `artifact` and reports where it went.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Io`] when the bytes cannot be written.
    async fn save(&self, artifact: &ResponseArtifact) -> Result<ArtifactLocation, SubmitError>;
}

/// Saves artifacts into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    /// Saves into `dir`, choosing `name_2.pdf`, `name_3.pdf`, ... when the
    /// plain name is taken.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    /// Replaces an existing file of the same name instead of picking a new one.
    #[must_use]
    pub fn overwriting(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

}

#[async_trait]
impl ArtifactSink for DirectorySink {
    #[instrument(skip(self, artifact), fields(dir = %self.dir.display(), bytes = artifact.bytes.len()))]
    async fn save(&self, artifact: &ResponseArtifact) -> Result<ArtifactLocation, SubmitError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SubmitError::io(self.dir.clone(), e))?;

        let path = if self.overwrite {
            self.dir.join(&artifact.filename)
        } else {
            resolve_unique_path(&self.dir, &artifact.filename)
        };
        debug!(path = %path.display(), "resolved output path");

        let file = File::create(&path)
            .await
            .map_err(|e| SubmitError::io(path.clone(), e))?;

        if let Err(error) = write_all_flushed(file, &artifact.bytes, &path).await {
            debug!(path = %path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&path).await;
            return Err(error);
        }

        info!(path = %path.display(), bytes = artifact.bytes.len(), "artifact saved");
        Ok(ArtifactLocation::File(path))
    }
}

async fn write_all_flushed(file: File, bytes: &[u8], path: &Path) -> Result<(), SubmitError> {
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .await
        .map_err(|e| SubmitError::io(path.to_path_buf(), e))?;
    writer
        .flush()
        .await
        .map_err(|e| SubmitError::io(path.to_path_buf(), e))
}

/// Writes artifacts to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

#[async_trait]
impl ArtifactSink for StdoutSink {
    async fn save(&self, artifact: &ResponseArtifact) -> Result<ArtifactLocation, SubmitError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(&artifact.bytes)
            .await
            .map_err(|e| SubmitError::io("<stdout>", e))?;
        stdout
            .flush()
            .await
            .map_err(|e| SubmitError::io("<stdout>", e))?;
        Ok(ArtifactLocation::Stdout)
    }
}

/// First free path among `name.ext`, `name_2.ext`, `name_3.ext`, ...
fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let base_path = dir.join(filename);
    if !base_path.exists() {
        return base_path;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 => (&filename[..pos], &filename[pos..]),
        _ => (filename, ""),
    };

    for i in 2..1000 {
        let candidate = dir.join(format!("{stem}_{i}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    dir.join(format!("{stem}_{timestamp}{ext}"))
}
