use crate::core::codec::Record;
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Load-all / save-all persistence for record files.
///
/// `load` on a store with nothing saved yet returns an empty vector. `save`
/// replaces everything previously stored for that record kind.
pub trait RecordStore {
    fn load<R: Record>(&self) -> Result<Vec<R>>;
    fn save<R: Record>(&self, records: &[R]) -> Result<()>;
}

/// Source of "today" for lending decisions.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}
