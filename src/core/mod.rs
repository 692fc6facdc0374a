pub mod codec;
pub mod fines;
pub mod registry;

pub use crate::domain::model::{Book, LibraryStats, Loan, Member, RecordKind};
pub use crate::domain::ports::{Clock, RecordStore};
pub use crate::utils::error::Result;
