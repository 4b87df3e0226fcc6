use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::io::{self, Cursor, Write};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::error::ErrorKind;
use crate::{AppDirError, AppDirResult};

use super::attributes::{AttributeKey, AttributeValue, FileAttributes, FileKind};
use super::category::DirectoryCategory;
use super::file_path::FilePath;
use super::traits::{DirectoryEntries, Pal, ReadSeek};

/* 📖 # Why use in-memory maps for MockPal storage?

MockPal keeps files and directories in ordered maps behind an Arc<Mutex<T>>:
1. **Speed**: No filesystem I/O, deterministic and fast for unit tests
2. **Isolation**: No side effects on the real filesystem
3. **Control**: Tests can remove category directories, mark paths read-only or
   make a special directory unavailable
4. **Ordering**: BTreeMap keys give listings in name order for free

Clones share the same state, so a test can keep one clone for setup and
assertions while the facade owns another inside a PalHandle.
*/

/// Root below which MockPal lays out the category directories.
pub const MOCK_ROOT: &str = "/mock";

/// In-memory PAL implementation for testing.
///
/// All four category directories exist initially, below [`MOCK_ROOT`] in the
/// sandbox layout (`/mock/Documents`, `/mock/Documents/Inbox`, `/mock/Library`,
/// `/mock/tmp`).
///
/// # Examples
///
/// ```
/// use appdir_base::{FilePath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("/mock/Documents/test.txt"), b"content".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("/mock/Documents/test.txt")).unwrap();
/// assert_eq!(content, "content");
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    files: BTreeMap<FilePath, MockFile>,
    directories: BTreeSet<FilePath>,
    read_only: HashSet<FilePath>,
    special_directories: HashMap<DirectoryCategory, FilePath>,
    rename_crosses_devices: bool,
    removal_denied: HashSet<FilePath>,
}

#[derive(Debug, Clone)]
struct MockFile {
    content: Vec<u8>,
    modified: SystemTime,
}

impl MockFile {
    fn new(content: Vec<u8>) -> Self {
        Self {
            content,
            modified: SystemTime::now(),
        }
    }
}

impl MockState {
    fn exists(&self, path: &FilePath) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn parent_exists(&self, path: &FilePath) -> bool {
        path.parent()
            .is_some_and(|parent| self.directories.contains(&parent))
    }

    fn is_writable(&self, path: &FilePath) -> bool {
        self.exists(path) && !self.read_only.contains(path)
    }

    /// Checks that a file may be created or replaced at `path`.
    fn check_writable_target(&self, path: &FilePath) -> AppDirResult<()> {
        let denied = |message: &str| {
            Box::new(AppDirError::new(ErrorKind::Write {
                path: path.as_path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, message.to_string()),
            }))
        };
        if self.directories.contains(path) {
            return Err(Box::new(AppDirError::new(ErrorKind::Write {
                path: path.as_path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::IsADirectory, "is a directory"),
            })));
        }
        let Some(parent) = path.parent().filter(|p| self.directories.contains(p)) else {
            return Err(Box::new(AppDirError::new(ErrorKind::Write {
                path: path.as_path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "directory does not exist"),
            })));
        };
        if self.read_only.contains(&parent) {
            return Err(denied("directory is read-only"));
        }
        if self.read_only.contains(path) {
            return Err(denied("file is read-only"));
        }
        Ok(())
    }

    fn source_file(&self, path: &FilePath) -> AppDirResult<&MockFile> {
        self.files
            .get(path)
            .ok_or_else(|| Box::new(AppDirError::not_found(path.as_path())))
    }

    /// Checks the preconditions shared by rename and copy.
    fn check_transfer(&self, from: &FilePath, to: &FilePath) -> AppDirResult<()> {
        self.source_file(from)?;
        if !self.parent_exists(to) {
            let parent = to.parent().unwrap_or_else(|| to.clone());
            return Err(Box::new(AppDirError::not_found(parent.as_path())));
        }
        if self.directories.contains(to) {
            return Err(Box::new(AppDirError::new(ErrorKind::FileError {
                path: to.as_path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::IsADirectory, "is a directory"),
            })));
        }
        Ok(())
    }
}

impl MockPal {
    /// Create a MockPal with all category directories present and no files.
    pub fn new() -> Self {
        let root = FilePath::from(MOCK_ROOT);
        let mut state = MockState::default();
        for category in DirectoryCategory::ALL {
            let directory = root.join(category.sandbox_path());
            state.special_directories.insert(category, directory.clone());
            state.directories.insert(directory);
        }
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Add a file to the mock storage, creating its parent directories.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        let mut state = self.state.lock();
        let mut parent = path.parent();
        while let Some(directory) = parent {
            parent = directory.parent();
            state.directories.insert(directory);
        }
        state.files.insert(path, MockFile::new(content));
    }

    /// Add a directory to the mock storage.
    pub fn add_directory(&self, path: FilePath) {
        self.state.lock().directories.insert(path);
    }

    /// Remove a directory together with everything below it.
    pub fn remove_directory(&self, path: &FilePath) {
        let mut state = self.state.lock();
        state
            .directories
            .retain(|directory| !directory.as_path().starts_with(path.as_path()));
        state
            .files
            .retain(|file, _| !file.as_path().starts_with(path.as_path()));
    }

    /// Mark a file or directory as read-only.
    pub fn set_read_only(&self, path: FilePath) {
        self.state.lock().read_only.insert(path);
    }

    /// Override where a category lives; `None` makes the category unavailable.
    pub fn set_special_directory(&self, category: DirectoryCategory, directory: Option<FilePath>) {
        let mut state = self.state.lock();
        match directory {
            Some(directory) => {
                state.special_directories.insert(category, directory);
            }
            None => {
                state.special_directories.remove(&category);
            }
        }
    }

    /// Make every rename fail as if source and destination were on different devices.
    pub fn set_rename_crosses_devices(&self, crosses: bool) {
        self.state.lock().rename_crosses_devices = crosses;
    }

    /// Make `remove_file` fail for `path` with a permission error.
    pub fn deny_removal(&self, path: FilePath) {
        self.state.lock().removal_denied.insert(path);
    }

    /// Raw file content, bypassing the Pal interface.
    pub fn file_content(&self, path: &FilePath) -> Option<Vec<u8>> {
        self.state
            .lock()
            .files
            .get(path)
            .map(|file| file.content.clone())
    }

    /// Number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.state.lock().files.len()
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn special_directory(&self, category: DirectoryCategory) -> AppDirResult<FilePath> {
        self.state
            .lock()
            .special_directories
            .get(&category)
            .cloned()
            .ok_or_else(|| {
                Box::new(AppDirError::configuration(format!(
                    "Platform provides no {} directory",
                    category
                )))
            })
    }

    fn file_exists(&self, path: &FilePath) -> bool {
        self.state.lock().exists(path)
    }

    fn is_directory(&self, path: &FilePath) -> bool {
        self.state.lock().directories.contains(path)
    }

    fn is_readable(&self, path: &FilePath) -> bool {
        self.state.lock().exists(path)
    }

    fn is_writable(&self, path: &FilePath) -> bool {
        self.state.lock().is_writable(path)
    }

    fn read_file(&self, path: &FilePath) -> AppDirResult<Box<dyn ReadSeek + 'static>> {
        let state = self.state.lock();
        let content = state.source_file(path)?.content.clone();
        Ok(Box::new(Cursor::new(content)))
    }

    fn create_file(&self, path: &FilePath) -> AppDirResult<Box<dyn Write>> {
        let mut state = self.state.lock();
        state.check_writable_target(path)?;
        state.files.insert(path.clone(), MockFile::new(Vec::new()));
        // Return a writer that will store in the mock storage when dropped
        Ok(Box::new(MockFileWriter {
            path: path.clone(),
            state: Arc::clone(&self.state),
            buffer: Vec::new(),
        }))
    }

    fn remove_file(&self, path: &FilePath) -> AppDirResult<()> {
        let mut state = self.state.lock();
        if state.directories.contains(path) {
            return Err(Box::new(AppDirError::new(ErrorKind::FileError {
                path: path.as_path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::IsADirectory, "is a directory"),
            })));
        }
        if state.removal_denied.contains(path) && state.files.contains_key(path) {
            return Err(Box::new(AppDirError::new(ErrorKind::FileError {
                path: path.as_path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "removal denied"),
            })));
        }
        state
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Box::new(AppDirError::not_found(path.as_path())))
    }

    fn rename(&self, from: &FilePath, to: &FilePath) -> AppDirResult<()> {
        let mut state = self.state.lock();
        state.check_transfer(from, to)?;
        if state.rename_crosses_devices {
            return Err(Box::new(AppDirError::new(ErrorKind::FileError {
                path: to.as_path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::CrossesDevices, "cross-device link"),
            })));
        }
        if let Some(file) = state.files.remove(from) {
            state.files.insert(to.clone(), file);
        }
        Ok(())
    }

    fn copy_file(&self, from: &FilePath, to: &FilePath) -> AppDirResult<()> {
        let mut state = self.state.lock();
        state.check_transfer(from, to)?;
        let content = state.source_file(from)?.content.clone();
        state.files.insert(to.clone(), MockFile::new(content));
        Ok(())
    }

    fn create_directory_all(&self, path: &FilePath) -> AppDirResult<()> {
        let mut state = self.state.lock();
        if state.files.contains_key(path) {
            return Err(Box::new(AppDirError::conflict(path.as_path())));
        }
        let mut directory = Some(path.clone());
        while let Some(current) = directory {
            directory = current.parent();
            state.directories.insert(current);
        }
        Ok(())
    }

    fn read_directory(&self, path: &FilePath) -> AppDirResult<DirectoryEntries> {
        let state = self.state.lock();
        if !state.directories.contains(path) {
            return Err(Box::new(AppDirError::not_found(path.as_path())));
        }
        let is_child = |candidate: &FilePath| candidate.parent().as_ref() == Some(path);
        let names: BTreeSet<String> = state
            .files
            .keys()
            .chain(state.directories.iter())
            .filter(|candidate| is_child(*candidate))
            .filter_map(|candidate| candidate.file_name().map(str::to_string))
            .collect();
        Ok(Box::new(names.into_iter().map(Ok)))
    }

    fn attributes(&self, path: &FilePath) -> AppDirResult<FileAttributes> {
        let state = self.state.lock();
        let read_only = AttributeValue::Flag(state.read_only.contains(path));
        if let Some(file) = state.files.get(path) {
            return Ok([
                (AttributeKey::Type, AttributeValue::Kind(FileKind::File)),
                (
                    AttributeKey::Size,
                    AttributeValue::Integer(file.content.len() as u64),
                ),
                (AttributeKey::ModificationDate, AttributeValue::Time(file.modified)),
                (AttributeKey::ReadOnly, read_only),
            ]
            .into_iter()
            .collect());
        }
        if state.directories.contains(path) {
            return Ok([
                (AttributeKey::Type, AttributeValue::Kind(FileKind::Directory)),
                (AttributeKey::ReadOnly, read_only),
            ]
            .into_iter()
            .collect());
        }
        Err(Box::new(AppDirError::not_found(path.as_path())))
    }
}

/// Helper struct for writing files to MockPal.
struct MockFileWriter {
    path: FilePath,
    state: Arc<Mutex<MockState>>,
    buffer: Vec<u8>,
}

impl Write for MockFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MockFileWriter {
    fn drop(&mut self) {
        self.state.lock().files.insert(
            self.path.clone(),
            MockFile::new(std::mem::take(&mut self.buffer)),
        );
    }
}
