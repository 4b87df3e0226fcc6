/* 📖 # What is the Platform Abstraction Layer?

The PAL provides a trait-based abstraction over the platform's file operations:
special-directory lookup, whole-file reads and writes, rename/copy/delete, listing
and attribute queries.

- Testability: MockPal allows deterministic unit tests without filesystem access
- Injection: the facade receives a PalHandle at construction instead of reaching
  for a process-wide file manager
- Consistency: all filesystem failures are classified into the same ErrorKinds

Code above this layer depends on the Pal trait, never on RealPal or MockPal directly.
*/

mod attributes;
mod category;
mod file_path;
pub mod mock;
pub mod real_pal;
mod traits;

pub use attributes::{AttributeKey, AttributeValue, FileAttributes, FileKind};
pub use category::DirectoryCategory;
pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{DirectoryEntries, Pal, PalHandle, ReadSeek};
