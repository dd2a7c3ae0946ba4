//! Sandboxed, tool-scoped document workspace for ToolDesk.
//! ToolDesk 的沙箱化工作區：所有檔案操作都限制在單一根目錄之內。

mod entry;
mod error;
pub mod guard;
pub mod names;
mod response;
mod search;
mod store;
mod tool;
pub mod walker;

pub use entry::{Entry, EntryKind, Placement};
pub use error::{ErrorKind, StoreError};
pub use guard::{expand_home, normalize, PathGuard};
pub use names::{allocate, CollisionScheme};
pub use response::Response;
pub use search::{count_occurrences, SearchHit};
pub use store::WorkspaceStore;
pub use tool::{ToolScope, UnknownToolScope};
