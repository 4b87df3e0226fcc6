use std::io::{self, Write};

use tracing::{debug, info, instrument, warn};

use appdir_base::error::ErrorKind;
use appdir_base::{
    AppDirError, AppDirResult, DirectoryCategory, FileAttributes, FilePath, PalHandle,
    ResultExt,
};

use crate::config::FileServiceConfig;
use crate::listing::DirectoryListing;
use crate::naming::{replace_extension, validate_file_name};
use crate::scope::CategoryScope;

/* 📖 # Why is DirectoryFileService a single concrete type?

Every operation is one decision ("does the destination already exist?") plus one
platform call. A trait hierarchy would only spread that over more files. The
platform itself is the seam: the service is handed a PalHandle at construction,
so the same code runs against the real file system and against MockPal.
*/

/// Facade over the platform's file operations, scoped by [`DirectoryCategory`].
///
/// Paths are resolved on every call and never cached, so results always
/// reflect the current state of the platform. Operations are synchronous and
/// perform no locking; concurrent writers to the same file get whatever the
/// underlying storage provides.
///
/// # Examples
///
/// ```
/// use appdir_base::{DirectoryCategory, MockPal, PalHandle};
/// use appdir_files::DirectoryFileService;
///
/// let service = DirectoryFileService::new(
///     PalHandle::new(MockPal::new()),
///     DirectoryCategory::Documents,
/// ).unwrap();
///
/// service.write(DirectoryCategory::Documents, "a.txt", "hello").unwrap();
/// assert_eq!(service.read(DirectoryCategory::Documents, "a.txt").unwrap(), "hello");
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryFileService {
    pal: PalHandle,
    working_directory: DirectoryCategory,
}

impl DirectoryFileService {
    /// Creates the service, checking that the working directory can be resolved.
    ///
    /// Fails with [`ErrorKind::Configuration`] if the platform cannot supply the
    /// working directory; callers should treat that as fatal.
    #[instrument(skip(pal))]
    pub fn new(pal: PalHandle, working_directory: DirectoryCategory) -> AppDirResult<Self> {
        let resolved = pal
            .special_directory(working_directory)
            .context("Failed to initialize file service")?;
        info!(directory = %resolved, "file service ready");
        Ok(Self {
            pal,
            working_directory,
        })
    }

    /// Creates the service on the real file system as described by `config`.
    pub fn from_config(config: &FileServiceConfig) -> AppDirResult<Self> {
        Self::new(config.build_pal(), config.working_directory)
    }

    pub fn working_directory(&self) -> DirectoryCategory {
        self.working_directory
    }

    pub fn pal(&self) -> &PalHandle {
        &self.pal
    }

    /// A view bound to one category.
    pub fn scope(&self, category: DirectoryCategory) -> CategoryScope<'_> {
        CategoryScope::new(self, category)
    }

    /// A view bound to the working directory chosen at construction.
    pub fn working_scope(&self) -> CategoryScope<'_> {
        self.scope(self.working_directory)
    }

    /// Absolute location of a category's directory.
    pub fn resolve(&self, category: DirectoryCategory) -> AppDirResult<FilePath> {
        self.pal.special_directory(category)
    }

    /// Absolute location of `file_name` inside a category. Nothing is checked on disk.
    pub fn build_path(&self, category: DirectoryCategory, file_name: &str) -> AppDirResult<FilePath> {
        Ok(self.resolve(category)?.join(file_name))
    }

    /// Creates the category's directory if it does not exist yet.
    #[instrument(skip(self))]
    pub fn ensure_directory(&self, category: DirectoryCategory) -> AppDirResult<FilePath> {
        let directory = self.resolve(category)?;
        if !self.pal.is_directory(&directory) {
            debug!(directory = %directory, "creating category directory");
            self.pal
                .create_directory_all(&directory)
                .with_context(|| format!("Failed to create {} directory", category))?;
        }
        Ok(directory)
    }

    /// Creates or truncates a file and writes `contents` as UTF-8.
    ///
    /// Every failure is reported as [`ErrorKind::Write`].
    #[instrument(skip(self, contents), fields(bytes = contents.len()))]
    pub fn write(
        &self,
        category: DirectoryCategory,
        file_name: &str,
        contents: &str,
    ) -> AppDirResult<()> {
        let path = self.build_path(category, file_name)?;
        let write_error = |source: io::Error| {
            Box::new(AppDirError::new(ErrorKind::Write {
                path: path.as_path().to_path_buf(),
                source,
            }))
        };
        let mut writer = self.pal.create_file(&path).map_err(|err| match err.kind() {
            ErrorKind::Write { .. } => err,
            _ => write_error(io::Error::other(err.to_string())),
        })?;
        writer.write_all(contents.as_bytes()).map_err(write_error)?;
        writer.flush().map_err(write_error)?;
        debug!(path = %path, "file written");
        Ok(())
    }

    /// Reads a whole file as UTF-8 text.
    #[instrument(skip(self))]
    pub fn read(&self, category: DirectoryCategory, file_name: &str) -> AppDirResult<String> {
        let path = self.build_path(category, file_name)?;
        self.pal
            .read_file_to_string(&path)
            .with_context(|| format!("Failed to read {} in {}", file_name, category))
    }

    /// Removes a file. A missing file is reported as [`ErrorKind::NotFound`].
    #[instrument(skip(self))]
    pub fn delete(&self, category: DirectoryCategory, file_name: &str) -> AppDirResult<()> {
        let path = self.build_path(category, file_name)?;
        self.pal
            .remove_file(&path)
            .with_context(|| format!("Failed to delete {} in {}", file_name, category))?;
        debug!(path = %path, "file deleted");
        Ok(())
    }

    /// Renames a file within a category without replacing an existing file.
    ///
    /// Both names must be single path components, so a file never leaves its
    /// category through a rename.
    #[instrument(skip(self))]
    pub fn rename(
        &self,
        category: DirectoryCategory,
        old_name: &str,
        new_name: &str,
    ) -> AppDirResult<()> {
        let source = self.build_path(category, old_name)?;
        let destination = self.build_path(category, new_name)?;
        validate_file_name(old_name)
            .and_then(|()| validate_file_name(new_name))
            .and_then(|()| self.check_transfer(&source, &destination))
            .and_then(|()| self.pal.rename(&source, &destination))
            .with_context(|| format!("Failed to rename {} to {}", old_name, new_name))?;
        debug!(from = %source, to = %destination, "file renamed");
        Ok(())
    }

    /// Moves a file to another category without replacing an existing file.
    ///
    /// A plain rename is tried first. If the platform reports that the two
    /// categories live on different devices, the file is copied and the source
    /// removed afterwards. That fallback is not atomic: an interruption between
    /// the two steps leaves the file in both places, and if the removal fails the
    /// error is returned even though the destination has already been written.
    #[instrument(skip(self))]
    pub fn move_file(
        &self,
        file_name: &str,
        from: DirectoryCategory,
        to: DirectoryCategory,
    ) -> AppDirResult<()> {
        let source = self.build_path(from, file_name)?;
        let destination = self.build_path(to, file_name)?;
        validate_file_name(file_name)
            .and_then(|()| self.check_transfer(&source, &destination))
            .and_then(|()| self.move_across(&source, &destination))
            .with_context(|| format!("Failed to move {} from {} to {}", file_name, from, to))?;
        debug!(from = %source, to = %destination, "file moved");
        Ok(())
    }

    /// Copies a file to another category without replacing an existing file.
    #[instrument(skip(self))]
    pub fn copy(
        &self,
        file_name: &str,
        from: DirectoryCategory,
        to: DirectoryCategory,
    ) -> AppDirResult<()> {
        let source = self.build_path(from, file_name)?;
        let destination = self.build_path(to, file_name)?;
        validate_file_name(file_name)
            .and_then(|()| self.check_transfer(&source, &destination))
            .and_then(|()| self.pal.copy_file(&source, &destination))
            .with_context(|| format!("Failed to copy {} from {} to {}", file_name, from, to))?;
        debug!(from = %source, to = %destination, "file copied");
        Ok(())
    }

    /// Replaces the extension of a file and renames it, returning the new name.
    ///
    /// Fails with [`ErrorKind::InvalidName`] if either name is malformed,
    /// otherwise exactly like [`rename`](Self::rename).
    #[instrument(skip(self))]
    pub fn change_extension(
        &self,
        file_name: &str,
        category: DirectoryCategory,
        new_extension: &str,
    ) -> AppDirResult<String> {
        let new_name = replace_extension(file_name, new_extension)
            .with_context(|| format!("Failed to change extension of {}", file_name))?;
        self.rename(category, file_name, &new_name)?;
        Ok(new_name)
    }

    pub fn exists(&self, path: &FilePath) -> bool {
        self.pal.file_exists(path)
    }

    pub fn is_readable(&self, path: &FilePath) -> bool {
        self.pal.is_readable(path)
    }

    pub fn is_writable(&self, path: &FilePath) -> bool {
        self.pal.is_writable(path)
    }

    /// Lists a category's directory.
    ///
    /// Fails with [`ErrorKind::NotFound`] if the directory does not exist. An
    /// existing empty directory gives an empty listing.
    #[instrument(skip(self))]
    pub fn list(&self, category: DirectoryCategory) -> AppDirResult<DirectoryListing> {
        let directory = self.resolve(category)?;
        if !self.pal.is_directory(&directory) {
            debug!(directory = %directory, "category directory missing");
            return Err(Box::new(
                AppDirError::not_found(directory.as_path())
                    .context(format!("Failed to list {}", category)),
            ));
        }
        Ok(DirectoryListing::new(self.pal.clone(), directory))
    }

    /// Snapshot of the attributes of a file or directory.
    #[instrument(skip(self), fields(path = %path))]
    pub fn attributes(&self, path: &FilePath) -> AppDirResult<FileAttributes> {
        self.pal.attributes(path)
    }

    fn check_transfer(&self, source: &FilePath, destination: &FilePath) -> AppDirResult<()> {
        if !self.pal.file_exists(source) {
            return Err(Box::new(AppDirError::not_found(source.as_path())));
        }
        if self.pal.file_exists(destination) {
            return Err(Box::new(AppDirError::conflict(destination.as_path())));
        }
        Ok(())
    }

    fn move_across(&self, source: &FilePath, destination: &FilePath) -> AppDirResult<()> {
        match self.pal.rename(source, destination) {
            Err(err) if err.io_kind() == Some(io::ErrorKind::CrossesDevices) => {
                warn!(from = %source, to = %destination, "rename crosses devices, copying instead");
                self.pal.copy_file(source, destination)?;
                self.pal.remove_file(source).map_err(|err| {
                    Box::new(
                        AppDirError::message(format!(
                            "Copied {} to {} but could not remove the source",
                            source, destination
                        ))
                        .caused_by(err),
                    )
                })
            }
            other => other,
        }
    }
}
