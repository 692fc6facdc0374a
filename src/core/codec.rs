//! Line format for the two record files.
//!
//! Books: `isbn;title;author;year;available;borrowedBy;dueDate`
//! Members: `id;name;isbn1,isbn2,...`
//!
//! Fields are never quoted or escaped. A `;` inside a title, author or name
//! shifts every following field, so such a line no longer decodes to the
//! record that was written.

use crate::domain::model::{Book, Loan, Member, RecordKind};
use crate::utils::error::{LibraryError, Result};
use chrono::NaiveDate;
use csv::{ByteRecord, StringRecord};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

pub const FIELD_DELIMITER: u8 = b';';
pub const ISBN_LIST_SEPARATOR: &str = ",";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// What to do with a line whose field count is right but whose year, due date
/// or text encoding is bad. Short lines are always skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the whole load.
    #[default]
    Abort,
    /// Drop only the offending line.
    Skip,
}

/// A value stored as one line of a record file.
pub trait Record: Sized {
    const KIND: RecordKind;
    const FIELD_COUNT: usize;

    fn to_fields(&self) -> Vec<String>;

    /// `fields` holds at least `FIELD_COUNT` entries; extras are ignored.
    fn from_fields(fields: &StringRecord, line: u64) -> Result<Self>;
}

impl Record for Book {
    const KIND: RecordKind = RecordKind::Book;
    const FIELD_COUNT: usize = 7;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.isbn.clone(),
            self.title.clone(),
            self.author.clone(),
            self.year.to_string(),
            self.is_available().to_string(),
            self.borrower().unwrap_or_default().to_string(),
            self.due_date()
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ]
    }

    fn from_fields(fields: &StringRecord, line: u64) -> Result<Self> {
        let year = fields[3].parse::<i32>().map_err(|_| {
            LibraryError::malformed(Self::KIND, line, format!("invalid year '{}'", &fields[3]))
        })?;
        let available = fields[4].eq_ignore_ascii_case("true");
        let borrower = non_empty(&fields[5]);
        let due_date = match non_empty(&fields[6]) {
            Some(raw) => Some(NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                LibraryError::malformed(Self::KIND, line, format!("invalid due date '{}'", raw))
            })?),
            None => None,
        };

        let loan = match (available, borrower, due_date) {
            (false, Some(member_id), Some(due_date)) => Some(Loan {
                member_id: member_id.to_string(),
                due_date,
            }),
            (true, None, None) => None,
            (_, borrower, due_date) => {
                tracing::warn!(
                    "{} line {}: available={} with borrower {:?} and due date {:?}, loading as available",
                    Self::KIND,
                    line,
                    &fields[4],
                    borrower,
                    due_date
                );
                None
            }
        };

        Ok(Book::new(&fields[0], &fields[1], &fields[2], year).with_loan(loan))
    }
}

impl Record for Member {
    const KIND: RecordKind = RecordKind::Member;
    const FIELD_COUNT: usize = 3;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.borrowed_isbns().join(ISBN_LIST_SEPARATOR),
        ]
    }

    fn from_fields(fields: &StringRecord, _line: u64) -> Result<Self> {
        let borrowed = fields[2]
            .split(ISBN_LIST_SEPARATOR)
            .filter(|isbn| !isbn.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Member::new(&fields[0], &fields[1]).with_borrowed(borrowed))
    }
}

fn non_empty(field: &str) -> Option<&str> {
    if field.is_empty() {
        None
    } else {
        Some(field)
    }
}

pub fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(source)
}

pub fn writer<W: Write>(sink: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink)
}

/// Decodes every line of `reader`. Lines with too few fields are skipped;
/// parse failures, including text that is not UTF-8, follow `policy`.
pub fn decode_all<R: Record, S: Read>(
    reader: &mut csv::Reader<S>,
    policy: MalformedPolicy,
) -> Result<Vec<R>> {
    let mut records = Vec::new();

    for (index, result) in reader.byte_records().enumerate() {
        let raw = result?;
        let line = raw
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);

        match decode_record::<R>(raw, line) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e @ LibraryError::MalformedRecord { .. }) if policy == MalformedPolicy::Skip => {
                tracing::warn!("Skipping {}", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(records)
}

/// `Ok(None)` when the line has too few fields.
fn decode_record<R: Record>(raw: ByteRecord, line: u64) -> Result<Option<R>> {
    if raw.len() < R::FIELD_COUNT {
        tracing::debug!(
            "Skipping {} line {}: {} of {} fields",
            R::KIND,
            line,
            raw.len(),
            R::FIELD_COUNT
        );
        return Ok(None);
    }

    let fields = StringRecord::from_byte_record(raw).map_err(|e| {
        LibraryError::malformed(
            R::KIND,
            line,
            format!("field {} is not valid UTF-8", e.utf8_error().field() + 1),
        )
    })?;
    R::from_fields(&fields, line).map(Some)
}

pub fn encode_all<R: Record, W: Write>(writer: &mut csv::Writer<W>, records: &[R]) -> Result<()> {
    for record in records {
        writer.write_record(record.to_fields())?;
    }
    writer.flush()?;
    Ok(())
}

/// Encodes one record without its line terminator.
pub fn encode_line<R: Record>(record: &R) -> Result<String> {
    let mut w = writer(Vec::new());
    w.write_record(record.to_fields())?;
    let bytes = w
        .into_inner()
        .map_err(|e| LibraryError::IoError(e.into_error()))?;
    let mut line = String::from_utf8(bytes).map_err(|e| {
        LibraryError::malformed(R::KIND, 1, format!("encoded line is not UTF-8: {}", e))
    })?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Decodes one line; `Ok(None)` when the line has too few fields.
pub fn decode_line<R: Record>(line: &str) -> Result<Option<R>> {
    let mut r = reader(line.as_bytes());
    match r.byte_records().next() {
        None => Ok(None),
        Some(result) => decode_record(result?, 1),
    }
}
