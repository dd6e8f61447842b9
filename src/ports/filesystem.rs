//! Filesystem port for the inbound directory tree.

use std::path::Path;

/// Provides the file operations the migration needs.
///
/// Abstracting the filesystem keeps the pipeline testable without
/// touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Creates a directory and any missing parents. Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Lists the entry names in a directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Renames `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing or the rename is refused.
    fn rename(
        &self,
        from: &Path,
        to: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;
}
