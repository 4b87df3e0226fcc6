use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::error::ErrorKind;
use crate::{AppDirError, AppDirResult};

use super::attributes::{AttributeKey, AttributeValue, FileAttributes, FileKind};
use super::category::DirectoryCategory;
use super::file_path::FilePath;
use super::traits::{DirectoryEntries, Pal, ReadSeek};

/* 📖 # Why use std::fs instead of async or other crates?

Every facade operation is a single blocking call that completes or fails, with no
cancellation. std::fs is:
- Sufficient for synchronous whole-file operations
- Well-tested and reliable
- Easy to map onto the ErrorKinds

walkdir is only used for listing because it gives sorted, lazily produced entries.
*/

/// Concrete PAL implementation using the real filesystem via std::fs.
///
/// Special directories come either from the platform (via the `dirs` crate) or,
/// when a root is configured, from a sandbox layout below that root:
///
/// ```text
/// <root>/Documents
/// <root>/Documents/Inbox
/// <root>/Library
/// <root>/tmp
/// ```
#[derive(Debug, Default)]
pub struct RealPal {
    root: Option<PathBuf>,
}

impl RealPal {
    /// Create a RealPal that uses the platform's own directories.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Create a RealPal that places every category below `root`.
    ///
    /// # Arguments
    /// * `root` - Sandbox root; made absolute when a category is resolved
    pub fn with_root(root: PathBuf) -> Self {
        Self { root: Some(root) }
    }

    #[instrument(skip(self))]
    fn platform_directory(&self, category: DirectoryCategory) -> AppDirResult<PathBuf> {
        let directory = match category {
            DirectoryCategory::Documents => dirs::document_dir(),
            DirectoryCategory::Inbox => {
                dirs::document_dir().map(|documents| documents.join(category.name()))
            }
            DirectoryCategory::Library => dirs::data_dir(),
            DirectoryCategory::Temp => Some(std::env::temp_dir()),
        };
        directory.ok_or_else(|| {
            debug!("platform has no directory for category");
            Box::new(AppDirError::configuration(format!(
                "Platform provides no {} directory",
                category
            )))
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Write,
}

/// Permission check for the calling process. Never opens the path, so FIFOs and
/// device files cannot block it.
#[cfg(unix)]
fn has_access(path: &Path, access: Access) -> bool {
    use nix::unistd::AccessFlags;
    let flags = match access {
        Access::Read => AccessFlags::R_OK,
        Access::Write => AccessFlags::W_OK,
    };
    nix::unistd::access(path, flags).is_ok()
}

#[cfg(not(unix))]
fn has_access(path: &Path, access: Access) -> bool {
    match (fs::metadata(path), access) {
        (Ok(_), Access::Read) => true,
        (Ok(metadata), Access::Write) => !metadata.permissions().readonly(),
        (Err(_), _) => false,
    }
}

fn file_error(path: &FilePath, source: std::io::Error) -> Box<AppDirError> {
    Box::new(AppDirError::from_io(path.as_path(), source))
}

impl Pal for RealPal {
    #[instrument(skip(self))]
    fn special_directory(&self, category: DirectoryCategory) -> AppDirResult<FilePath> {
        let directory = match &self.root {
            Some(root) => {
                let root = std::path::absolute(root).map_err(|e| {
                    Box::new(AppDirError::configuration(format!(
                        "Cannot make sandbox root {} absolute: {}",
                        root.display(),
                        e
                    )))
                })?;
                FilePath::from(root).join(category.sandbox_path())
            }
            None => FilePath::from(self.platform_directory(category)?),
        };
        debug!(directory = %directory, "resolved special directory");
        Ok(directory)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> bool {
        let exists = fs::symlink_metadata(path.as_path()).is_ok();
        debug!(exists, "checked file existence");
        exists
    }

    fn is_directory(&self, path: &FilePath) -> bool {
        path.as_path().is_dir()
    }

    #[instrument(skip(self), fields(path = %path))]
    fn is_readable(&self, path: &FilePath) -> bool {
        let readable = has_access(path.as_path(), Access::Read);
        debug!(readable, "checked readability");
        readable
    }

    #[instrument(skip(self), fields(path = %path))]
    fn is_writable(&self, path: &FilePath) -> bool {
        let writable = has_access(path.as_path(), Access::Write);
        debug!(writable, "checked writability");
        writable
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> AppDirResult<Box<dyn ReadSeek + 'static>> {
        let file = fs::File::open(path.as_path()).map_err(|e| {
            debug!(error = %e, "failed to open file");
            file_error(path, e)
        })?;
        debug!("file opened successfully");
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_file(&self, path: &FilePath) -> AppDirResult<Box<dyn Write>> {
        let file = fs::File::create(path.as_path()).map_err(|e| {
            debug!(error = %e, "failed to create file");
            Box::new(AppDirError::new(ErrorKind::Write {
                path: path.as_path().to_path_buf(),
                source: e,
            }))
        })?;
        debug!("file created successfully");
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn remove_file(&self, path: &FilePath) -> AppDirResult<()> {
        fs::remove_file(path.as_path()).map_err(|e| {
            debug!(error = %e, "failed to remove file");
            file_error(path, e)
        })?;
        debug!("file removed successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(from = %from, to = %to))]
    fn rename(&self, from: &FilePath, to: &FilePath) -> AppDirResult<()> {
        fs::rename(from.as_path(), to.as_path()).map_err(|e| {
            debug!(error = %e, "failed to rename");
            // A missing source and a missing destination directory both report
            // NotFound; blame the one that is actually absent.
            let blamed = match to.parent() {
                Some(parent) if from.as_path().exists() => parent,
                _ => from.clone(),
            };
            file_error(&blamed, e)
        })?;
        debug!("renamed successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(from = %from, to = %to))]
    fn copy_file(&self, from: &FilePath, to: &FilePath) -> AppDirResult<()> {
        let bytes = fs::copy(from.as_path(), to.as_path()).map_err(|e| {
            debug!(error = %e, "failed to copy");
            let blamed = match to.parent() {
                Some(parent) if from.as_path().exists() => parent,
                _ => from.clone(),
            };
            file_error(&blamed, e)
        })?;
        debug!(bytes, "copied successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_directory_all(&self, path: &FilePath) -> AppDirResult<()> {
        fs::create_dir_all(path.as_path()).map_err(|e| {
            debug!(error = %e, "failed to create directory");
            file_error(path, e)
        })?;
        debug!("directory created successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_directory(&self, path: &FilePath) -> AppDirResult<DirectoryEntries> {
        if !path.as_path().is_dir() {
            debug!("directory not found");
            return Err(Box::new(AppDirError::not_found(path.as_path())));
        }

        let iter = WalkDir::new(path.as_path())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| match entry {
                Ok(entry) => match entry.file_name().to_str() {
                    Some(name) => Ok(name.to_string()),
                    None => {
                        let lossy = entry.file_name().to_string_lossy().into_owned();
                        debug!(name = %lossy, "directory entry is not valid UTF-8");
                        Err(Box::new(AppDirError::invalid_name(
                            lossy,
                            "name is not valid UTF-8",
                        )))
                    }
                },
                Err(e) => {
                    debug!(error = %e, "error reading directory entry");
                    let path = e
                        .path()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| PathBuf::from("unknown"));
                    Err(Box::new(AppDirError::new(ErrorKind::FileError {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    })))
                }
            });

        debug!("returning directory iterator");
        Ok(Box::new(iter))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn attributes(&self, path: &FilePath) -> AppDirResult<FileAttributes> {
        let metadata = fs::symlink_metadata(path.as_path()).map_err(|e| {
            debug!(error = %e, "failed to read metadata");
            file_error(path, e)
        })?;

        let mut attributes = FileAttributes::new();
        attributes.insert(
            AttributeKey::Type,
            AttributeValue::Kind(FileKind::from(metadata.file_type())),
        );
        attributes.insert(AttributeKey::Size, AttributeValue::Integer(metadata.len()));
        attributes.insert(
            AttributeKey::ReadOnly,
            AttributeValue::Flag(metadata.permissions().readonly()),
        );
        if let Ok(modified) = metadata.modified() {
            attributes.insert(AttributeKey::ModificationDate, AttributeValue::Time(modified));
        }
        if let Ok(created) = metadata.created() {
            attributes.insert(AttributeKey::CreationDate, AttributeValue::Time(created));
        }
        if let Ok(accessed) = metadata.accessed() {
            attributes.insert(AttributeKey::AccessDate, AttributeValue::Time(accessed));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            attributes.insert(
                AttributeKey::Permissions,
                AttributeValue::Permissions(metadata.mode() & 0o7777),
            );
            attributes.insert(
                AttributeKey::OwnerId,
                AttributeValue::Integer(u64::from(metadata.uid())),
            );
            attributes.insert(
                AttributeKey::GroupId,
                AttributeValue::Integer(u64::from(metadata.gid())),
            );
            attributes.insert(
                AttributeKey::ReferenceCount,
                AttributeValue::Integer(metadata.nlink()),
            );
        }

        debug!(count = attributes.len(), "read attributes");
        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, RealPal) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let pal = RealPal::with_root(temp_dir.path().to_path_buf());
        (temp_dir, pal)
    }

    fn documents(pal: &RealPal) -> FilePath {
        let documents = pal
            .special_directory(DirectoryCategory::Documents)
            .unwrap();
        fs::create_dir_all(documents.as_path()).unwrap();
        documents
    }

    #[test]
    fn test_special_directory_uses_sandbox_layout() {
        let (temp_dir, pal) = setup_test_dir();

        let inbox = pal.special_directory(DirectoryCategory::Inbox).unwrap();
        assert_eq!(inbox.as_path(), temp_dir.path().join("Documents").join("Inbox"));
        let temp = pal.special_directory(DirectoryCategory::Temp).unwrap();
        assert_eq!(temp.as_path(), temp_dir.path().join("tmp"));
    }

    #[test]
    fn test_special_directory_is_absolute_for_relative_root() {
        let pal = RealPal::with_root(PathBuf::from("sandbox"));
        let library = pal.special_directory(DirectoryCategory::Library).unwrap();
        assert!(library.is_absolute());
        assert!(library.as_path().ends_with("sandbox/Library"));
    }

    #[test]
    fn test_platform_temp_directory_is_available() {
        let pal = RealPal::new();
        let temp = pal.special_directory(DirectoryCategory::Temp).unwrap();
        assert_eq!(temp.as_path(), std::env::temp_dir());
    }

    #[test]
    fn test_file_exists() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = documents(&pal).join("test.txt");
        assert!(!pal.file_exists(&path));

        fs::write(path.as_path(), "content").unwrap();
        assert!(pal.file_exists(&path));
    }

    #[test]
    fn test_readable_and_writable_existing_file() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = documents(&pal).join("test.txt");
        fs::write(path.as_path(), "content").unwrap();

        assert!(pal.is_readable(&path));
        assert!(pal.is_writable(&path));
        assert_eq!(fs::read_to_string(path.as_path()).unwrap(), "content");
    }

    #[test]
    fn test_readable_and_writable_missing_file() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = documents(&pal).join("missing.txt");

        assert!(!pal.is_readable(&path));
        assert!(!pal.is_writable(&path));
    }

    #[cfg(unix)]
    #[test]
    fn test_status_queries_do_not_block_on_fifo() {
        use nix::sys::stat::Mode;
        use std::sync::mpsc;
        use std::time::Duration;

        let (temp_dir, pal) = setup_test_dir();
        let pipe = documents(&pal).join("pipe");
        nix::unistd::mkfifo(pipe.as_path(), Mode::S_IRUSR | Mode::S_IWUSR).unwrap();

        let (sender, receiver) = mpsc::channel();
        let root = temp_dir.path().to_path_buf();
        std::thread::spawn(move || {
            let pal = RealPal::with_root(root);
            let _ = sender.send((pal.is_readable(&pipe), pal.is_writable(&pipe)));
        });

        let answers = receiver
            .recv_timeout(Duration::from_secs(3))
            .expect("status queries blocked on a FIFO");
        assert_eq!(answers, (true, true));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_writable_only_for_permitted_user() {
        use std::os::unix::fs::{MetadataExt, PermissionsExt};

        let (_temp_dir, pal) = setup_test_dir();
        let shared = documents(&pal).join("shared");
        fs::create_dir(shared.as_path()).unwrap();
        assert!(pal.is_writable(&shared));

        // Group may write, the owning user may not.
        fs::set_permissions(shared.as_path(), fs::Permissions::from_mode(0o575)).unwrap();
        let running_as_root = fs::metadata(shared.as_path()).unwrap().uid() == 0;

        assert_eq!(pal.is_writable(&shared), running_as_root);
        assert!(pal.is_readable(&shared));
        fs::set_permissions(shared.as_path(), fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_create_and_read_file() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = documents(&pal).join("new.txt");

        let mut writer = pal.create_file(&path).unwrap();
        writer.write_all(b"test content").unwrap();
        drop(writer);

        assert_eq!(pal.read_file_to_string(&path).unwrap(), "test content");
    }

    #[test]
    fn test_create_file_in_missing_directory_is_write_error() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = pal
            .special_directory(DirectoryCategory::Library)
            .unwrap()
            .join("a.txt");

        let err = pal.create_file(&path).err().unwrap();
        assert!(matches!(err.kind(), ErrorKind::Write { .. }));
    }

    #[test]
    fn test_read_file_not_found() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = documents(&pal).join("nonexistent.txt");

        let err = pal.read_file(&path).err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_invalid_utf8_is_decode_error() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = documents(&pal).join("bad.txt");
        fs::write(path.as_path(), [0xFF, 0xFE]).unwrap();

        let err = pal.read_file_to_string(&path).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode { .. }));
    }

    #[test]
    fn test_remove_file_not_found() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = documents(&pal).join("nonexistent.txt");

        let err = pal.remove_file(&path).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rename_into_missing_directory_blames_directory() {
        let (_temp_dir, pal) = setup_test_dir();
        let source = documents(&pal).join("a.txt");
        fs::write(source.as_path(), "a").unwrap();
        let library = pal.special_directory(DirectoryCategory::Library).unwrap();

        let err = pal.rename(&source, &library.join("a.txt")).unwrap_err();
        match err.kind() {
            ErrorKind::NotFound { path } => assert_eq!(path, library.as_path()),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_copy_file() {
        let (_temp_dir, pal) = setup_test_dir();
        let documents = documents(&pal);
        fs::write(documents.join("a.txt").as_path(), "copy me").unwrap();

        pal.copy_file(&documents.join("a.txt"), &documents.join("b.txt"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(documents.join("b.txt").as_path()).unwrap(),
            "copy me"
        );
        assert!(pal.file_exists(&documents.join("a.txt")));
    }

    #[test]
    fn test_read_directory_sorted() {
        let (_temp_dir, pal) = setup_test_dir();
        let documents = documents(&pal);
        fs::write(documents.join("b.txt").as_path(), "").unwrap();
        fs::write(documents.join("a.txt").as_path(), "").unwrap();
        fs::create_dir(documents.join("c").as_path()).unwrap();

        let names: Vec<String> = pal
            .read_directory(&documents)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_read_directory_reports_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_temp_dir, pal) = setup_test_dir();
        let documents = documents(&pal);
        fs::write(documents.as_path().join("a.txt"), "").unwrap();
        fs::write(documents.as_path().join(OsStr::from_bytes(b"\xffdata.txt")), "").unwrap();

        let entries: Vec<_> = pal.read_directory(&documents).unwrap().collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].as_ref().unwrap(), "a.txt");
        let err = entries[1].as_ref().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidName { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid file name '\u{FFFD}data.txt': name is not valid UTF-8"
        );
    }

    #[test]
    fn test_read_directory_not_found() {
        let (_temp_dir, pal) = setup_test_dir();
        let library = pal.special_directory(DirectoryCategory::Library).unwrap();

        let err = pal.read_directory(&library).err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_attributes_of_file() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = documents(&pal).join("a.txt");
        fs::write(path.as_path(), "hello").unwrap();

        let attributes = pal.attributes(&path).unwrap();
        assert_eq!(attributes.kind(), Some(FileKind::File));
        assert_eq!(attributes.size(), Some(5));
        assert!(attributes.modified().is_some());
    }

    #[test]
    fn test_attributes_of_directory() {
        let (_temp_dir, pal) = setup_test_dir();
        let documents = documents(&pal);

        let attributes = pal.attributes(&documents).unwrap();
        assert_eq!(attributes.kind(), Some(FileKind::Directory));
    }

    #[test]
    fn test_attributes_not_found() {
        let (_temp_dir, pal) = setup_test_dir();
        let path = documents(&pal).join("missing.txt");

        let err = pal.attributes(&path).unwrap_err();
        assert!(err.is_not_found());
    }
}
