use std::path::PathBuf;

/// Errors that can occur across the voxmap crates.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate promotes it to a `miette` report at the
/// boundary.
///
/// # Examples
///
/// ```
/// use voxmap_core::VoxmapError;
///
/// let err = VoxmapError::Config("unknown exclude pattern".into());
/// assert!(err.to_string().contains("unknown exclude pattern"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum VoxmapError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Source code parsing failure.
    #[error("parse error: {0}")]
    Parse(String),

    /// Filesystem watcher failure.
    #[error("watch error: {0}")]
    Watch(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file or directory was not found.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A query was issued before the index finished initializing.
    #[error("index not initialized")]
    NotInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: VoxmapError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = VoxmapError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn not_found_shows_path() {
        let err = VoxmapError::NotFound(PathBuf::from("/tmp/missing"));
        assert!(err.to_string().contains("/tmp/missing"));
    }

    #[test]
    fn not_initialized_message() {
        assert_eq!(
            VoxmapError::NotInitialized.to_string(),
            "index not initialized"
        );
    }
}
