use appdir_base::{AppDirResult, DirectoryCategory, FileAttributes, FilePath};

use crate::listing::DirectoryListing;
use crate::service::DirectoryFileService;

/// A [`DirectoryFileService`] bound to one category.
///
/// Every method forwards to the service with the scope's category filled in,
/// so a scope behaves exactly like the corresponding service call.
///
/// ```
/// use appdir_base::{DirectoryCategory, MockPal, PalHandle};
/// use appdir_files::DirectoryFileService;
///
/// let service = DirectoryFileService::new(
///     PalHandle::new(MockPal::new()),
///     DirectoryCategory::Temp,
/// ).unwrap();
/// let scratch = service.working_scope();
///
/// scratch.write("draft.txt", "text").unwrap();
/// assert_eq!(scratch.list().unwrap().names().unwrap(), vec!["draft.txt"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CategoryScope<'a> {
    service: &'a DirectoryFileService,
    category: DirectoryCategory,
}

impl<'a> CategoryScope<'a> {
    pub(crate) fn new(service: &'a DirectoryFileService, category: DirectoryCategory) -> Self {
        Self { service, category }
    }

    pub fn category(&self) -> DirectoryCategory {
        self.category
    }

    pub fn directory(&self) -> AppDirResult<FilePath> {
        self.service.resolve(self.category)
    }

    pub fn path(&self, file_name: &str) -> AppDirResult<FilePath> {
        self.service.build_path(self.category, file_name)
    }

    pub fn write(&self, file_name: &str, contents: &str) -> AppDirResult<()> {
        self.service.write(self.category, file_name, contents)
    }

    pub fn read(&self, file_name: &str) -> AppDirResult<String> {
        self.service.read(self.category, file_name)
    }

    pub fn delete(&self, file_name: &str) -> AppDirResult<()> {
        self.service.delete(self.category, file_name)
    }

    pub fn rename(&self, old_name: &str, new_name: &str) -> AppDirResult<()> {
        self.service.rename(self.category, old_name, new_name)
    }

    /// Returns the new file name.
    pub fn change_extension(&self, file_name: &str, new_extension: &str) -> AppDirResult<String> {
        self.service
            .change_extension(file_name, self.category, new_extension)
    }

    pub fn exists(&self, file_name: &str) -> AppDirResult<bool> {
        Ok(self.service.exists(&self.path(file_name)?))
    }

    pub fn list(&self) -> AppDirResult<DirectoryListing> {
        self.service.list(self.category)
    }

    pub fn attributes(&self, file_name: &str) -> AppDirResult<FileAttributes> {
        self.service.attributes(&self.path(file_name)?)
    }
}
