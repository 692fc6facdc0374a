//! Catalog, membership and lending records for a small library, kept in
//! two `;`-delimited text files.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod shell;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;
pub use crate::config::AppConfig;

pub use crate::adapters::{
    clock::{FixedClock, SystemClock},
    storage::{LocalStorage, MemoryStore},
};
pub use crate::core::registry::{Diagnostic, LendingPolicy, Registry};
pub use crate::domain::model::{Book, LibraryStats, Member, RecordKind};
pub use crate::shell::Shell;
pub use crate::utils::error::{LibraryError, Result};
