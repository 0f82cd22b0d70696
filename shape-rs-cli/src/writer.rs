//! File writer for projected documents and generated config.
//!
//! Supports dry-run mode, where nothing touches the disk and the content is
//! handed back to the caller instead.

use std::path::{Path, PathBuf};

use crate::error::{CliResult, WriteError};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// File writer with dry-run and overwrite control.
#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
    overwrite: bool,
}

impl FileWriter {
    /// Create a writer that overwrites existing files.
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            overwrite: true,
        }
    }

    /// Refuse to replace existing files unless `overwrite` is set.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Serialize a JSON document and write it.
    pub fn write_json(
        &self,
        path: &Path,
        document: &serde_json::Value,
        pretty: bool,
    ) -> CliResult<WriteResult> {
        let mut content = if pretty {
            serde_json::to_string_pretty(document).map_err(WriteError::from)?
        } else {
            serde_json::to_string(document).map_err(WriteError::from)?
        };
        content.push('\n');
        self.write(path, &content)
    }

    /// Write content to a file.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if !self.overwrite && path.exists() {
            return Err(WriteError::AlreadyExists {
                path: path.to_path_buf(),
            }
            .into());
        }

        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file");

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/User.schema.json");

        let writer = FileWriter::new(false);
        let result = writer
            .write_json(&path, &json!({"type": "object"}), false)
            .unwrap();

        assert!(result.was_written());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"type\":\"object\"}\n"
        );
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("User.schema.json");

        let writer = FileWriter::new(true);
        let result = writer.write_json(&path, &json!({"a": 1}), true).unwrap();

        assert!(!result.was_written());
        assert!(!path.exists());
        match result {
            WriteResult::DryRun { content, .. } => assert!(content.contains("\"a\": 1")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shape-rs.toml");
        std::fs::write(&path, "old").unwrap();

        let writer = FileWriter::new(false).with_overwrite(false);
        let err = writer.write(&path, "new").unwrap_err();
        assert!(err.to_string().contains("Refusing to overwrite"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");

        let writer = FileWriter::new(false).with_overwrite(true);
        writer.write(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_result_path() {
        let path = PathBuf::from("/test/path.json");
        let dry_run = WriteResult::DryRun {
            content: "{}".to_string(),
            path: path.clone(),
        };
        assert_eq!(dry_run.path(), path.as_path());
    }
}
