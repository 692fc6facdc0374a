use crate::domain::model::RecordKind;
use thiserror::Error;

/// Why a lending transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendingConflict {
    AlreadyBorrowed { isbn: String },
    NotBorrowed { isbn: String },
    MemberMismatch { isbn: String, member_id: String },
}

impl std::fmt::Display for LendingConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LendingConflict::AlreadyBorrowed { isbn } => {
                write!(f, "book {} is already borrowed", isbn)
            }
            LendingConflict::NotBorrowed { isbn } => {
                write!(f, "book {} is not currently borrowed", isbn)
            }
            LendingConflict::MemberMismatch { isbn, member_id } => {
                write!(f, "member {} did not borrow book {}", member_id, isbn)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Book not found with ISBN: {isbn}")]
    BookNotFound { isbn: String },

    #[error("Member not found with ID: {id}")]
    MemberNotFound { id: String },

    #[error("Invalid lending state: {0}")]
    InvalidState(LendingConflict),

    #[error("Duplicate {kind} identifier: {id}")]
    Duplicate { kind: RecordKind, id: String },

    #[error("Malformed {kind} record at line {line}: {reason}")]
    MalformedRecord {
        kind: RecordKind,
        line: u64,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Delimited file error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    InvalidState,
    Conflict,
    MalformedRecord,
    IoFailure,
    Configuration,
}

impl LibraryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LibraryError::BookNotFound { .. } | LibraryError::MemberNotFound { .. } => {
                ErrorCategory::NotFound
            }
            LibraryError::InvalidState(_) => ErrorCategory::InvalidState,
            LibraryError::Duplicate { .. } => ErrorCategory::Conflict,
            LibraryError::MalformedRecord { .. } => ErrorCategory::MalformedRecord,
            LibraryError::IoError(_) => ErrorCategory::IoFailure,
            // csv wraps both IO failures and UTF-8 problems
            LibraryError::CsvError(e) => match e.kind() {
                csv::ErrorKind::Io(_) => ErrorCategory::IoFailure,
                _ => ErrorCategory::MalformedRecord,
            },
            LibraryError::ConfigError { .. } | LibraryError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// One-line message for the menu; no error chain, no debug formatting.
    pub fn user_friendly_message(&self) -> String {
        match self {
            LibraryError::BookNotFound { .. } => "Book not found!".to_string(),
            LibraryError::MemberNotFound { .. } => "Member not found!".to_string(),
            LibraryError::InvalidState(LendingConflict::AlreadyBorrowed { .. }) => {
                "Book is already borrowed!".to_string()
            }
            LibraryError::InvalidState(LendingConflict::NotBorrowed { .. }) => {
                "Book is not currently borrowed.".to_string()
            }
            LibraryError::InvalidState(LendingConflict::MemberMismatch { .. }) => {
                "This member did not borrow that book.".to_string()
            }
            LibraryError::Duplicate { kind, id } => {
                format!("A {} with identifier {} already exists.", kind, id)
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn malformed(kind: RecordKind, line: u64, reason: impl Into<String>) -> Self {
        LibraryError::MalformedRecord {
            kind,
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
