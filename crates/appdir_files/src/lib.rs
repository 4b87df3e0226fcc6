/* 📖 # What does appdir_files add on top of the PAL?

The PAL knows how to touch files. This crate knows what an application means by
"the file notes.txt in Documents": it resolves categories, refuses to overwrite on
rename, move and copy, derives names for extension changes and hands out lazy
directory listings. Everything here goes through a PalHandle, so the whole crate
is tested against MockPal.
*/

pub mod config;
pub mod listing;
pub mod naming;
pub mod scope;
pub mod service;

pub use config::{FileServiceConfig, load_config};
pub use listing::DirectoryListing;
pub use naming::{replace_extension, validate_file_name};
pub use scope::CategoryScope;
pub use service::DirectoryFileService;
