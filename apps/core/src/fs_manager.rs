use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SAATHI_DATA_DIR";

/// On-disk layout under the data directory:
///
/// ```text
/// data/
///   models/
///     embeddings/   fastembed ONNX cache
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortablePathManager {
    data_dir: PathBuf,
}

impl PortablePathManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `SAATHI_DATA_DIR` if set, else `./data` under the working directory.
    pub fn from_env() -> Self {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::new(dir),
            _ => Self::new(Self::root_dir().join("data")),
        }
    }

    /// Working directory, or `.` if it cannot be determined.
    pub fn root_dir() -> PathBuf {
        match std::env::current_dir() {
            Ok(path) => path,
            Err(e) => {
                warn!("Failed to get current directory: {}. Falling back to '.'", e);
                PathBuf::from(".")
            }
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn models_dir(&self) -> PathBuf {
        self.data_dir.join("models")
    }

    /// Cache directory for the sentence-embedding model.
    pub fn embeddings_dir(&self) -> PathBuf {
        self.models_dir().join("embeddings")
    }

    /// Create the directory tree if missing.
    pub fn init(&self) -> Result<(), std::io::Error> {
        for dir in [self.data_dir.clone(), self.models_dir(), self.embeddings_dir()] {
            if !dir.exists() {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}

impl Default for PortablePathManager {
    fn default() -> Self {
        Self::from_env()
    }
}
