use std::io::{Read, Seek, Write};
use std::sync::Arc;

use crate::error::ErrorKind;
use crate::{AppDirError, AppDirResult};

use super::attributes::FileAttributes;
use super::category::DirectoryCategory;
use super::file_path::FilePath;

/// Trait combining Read + Seek for file operations.
///
/// This trait enables returning opaque file handles that support both reading
/// and seeking, useful for different implementations (real files, in-memory buffers, etc.)
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Names of the immediate children of a directory, in name order.
pub type DirectoryEntries = Box<dyn Iterator<Item = AppDirResult<String>> + 'static>;

/* 📖 # Why is Pal a trait instead of a struct?

Using a trait enables two key benefits:
1. **Testability**: MockPal implements Pal for fast, deterministic tests without filesystem side effects
2. **Injection**: the facade is handed its platform at construction, there is no global file manager

The operations are deliberately primitive. Policy such as "refuse to overwrite on
rename" lives in the facade, so every Pal implementation gets it for free.
*/

/// Platform Abstraction Layer (PAL) trait providing filesystem operations.
///
/// Two implementations are provided:
/// - `RealPal`: Uses the real filesystem via `std::fs`
/// - `MockPal`: In-memory implementation for testing
///
/// Query methods (`file_exists`, `is_directory`, `is_readable`, `is_writable`)
/// never fail: anything that prevents an answer is reported as `false`.
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Absolute location of a special directory.
    ///
    /// Fails with [`ErrorKind::Configuration`] if the platform has no such directory.
    fn special_directory(&self, category: DirectoryCategory) -> AppDirResult<FilePath>;

    /// Check if a file or directory exists at the given path.
    fn file_exists(&self, path: &FilePath) -> bool;

    /// Check if the given path is an existing directory.
    fn is_directory(&self, path: &FilePath) -> bool;

    /// Check if the current process may read the given path.
    fn is_readable(&self, path: &FilePath) -> bool;

    /// Check if the current process may write the given path.
    fn is_writable(&self, path: &FilePath) -> bool;

    /// Open a file for reading.
    fn read_file(&self, path: &FilePath) -> AppDirResult<Box<dyn ReadSeek + 'static>>;

    /// Read entire file contents as a UTF-8 string.
    ///
    /// This is a convenience method with a default implementation. It reads the file,
    /// validates UTF-8, and returns the string or a [`ErrorKind::Decode`] error.
    fn read_file_to_string(&self, path: &FilePath) -> AppDirResult<String> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|e| Box::new(AppDirError::from_io(path.as_path(), e)))?;
        String::from_utf8(contents).map_err(|source| {
            Box::new(AppDirError::new(ErrorKind::Decode {
                path: path.as_path().to_path_buf(),
                source,
            }))
        })
    }

    /// Create a new file, truncating it if it exists.
    fn create_file(&self, path: &FilePath) -> AppDirResult<Box<dyn Write>>;

    /// Remove a file.
    fn remove_file(&self, path: &FilePath) -> AppDirResult<()>;

    /// Rename or move a file. An existing destination may be replaced.
    fn rename(&self, from: &FilePath, to: &FilePath) -> AppDirResult<()>;

    /// Copy a file's contents. An existing destination may be replaced.
    fn copy_file(&self, from: &FilePath, to: &FilePath) -> AppDirResult<()>;

    /// Create a directory and all parent directories.
    fn create_directory_all(&self, path: &FilePath) -> AppDirResult<()>;

    /// List the names of the immediate children of a directory, sorted by name.
    ///
    /// Fails with [`ErrorKind::NotFound`] if the directory does not exist.
    fn read_directory(&self, path: &FilePath) -> AppDirResult<DirectoryEntries>;

    /// Attributes of a file or directory. Symbolic links are not followed.
    fn attributes(&self, path: &FilePath) -> AppDirResult<FileAttributes>;
}

/* 📖 # Why use Arc<dyn Pal> with PalHandle?

Arc enables cheap cloning of the entire PAL implementation, allowing it to be
shared by the facade, its scopes and its listings (thread-safe via dyn Pal bounds).
PalHandle wraps this for ergonomic Deref access and Clone support.
This pattern avoids lifetime parameters on everything that holds a PAL.
*/

/// Handle to a PAL implementation, enabling shared ownership.
///
/// # Examples
///
/// ```no_run
/// use appdir_base::{PalHandle, RealPal};
///
/// let pal = PalHandle::new(RealPal::new());
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
