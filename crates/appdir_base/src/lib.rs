/* 📖 # Why have appdir_base as a foundation crate?
appdir_base provides the error type, logging setup and the platform abstraction layer.
The facade crate builds on these; keeping them apart means the PAL and its mock can be
tested without the facade, and the facade never touches std::fs directly.
*/

pub mod error;
mod error_tests;
pub mod pal;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{AppDirError, AppDirResult, ErrorKind, ResultExt};
pub use pal::{
    AttributeKey, AttributeValue, DirectoryCategory, FileAttributes, FileKind, FilePath,
    MockPal, Pal, PalHandle, ReadSeek, RealPal,
};
