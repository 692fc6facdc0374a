use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two record files a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Book,
    Member,
}

impl RecordKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            RecordKind::Book => "books.txt",
            RecordKind::Member => "members.txt",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            RecordKind::Book => "books",
            RecordKind::Member => "members",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Book => f.write_str("book"),
            RecordKind::Member => f.write_str("member"),
        }
    }
}

/// An outstanding loan: who holds the book and when it is due back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub member_id: String,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    loan: Option<Loan>,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            year,
            loan: None,
        }
    }

    pub(crate) fn with_loan(mut self, loan: Option<Loan>) -> Self {
        self.loan = loan;
        self
    }

    pub fn is_available(&self) -> bool {
        self.loan.is_none()
    }

    pub fn loan(&self) -> Option<&Loan> {
        self.loan.as_ref()
    }

    pub fn borrower(&self) -> Option<&str> {
        self.loan.as_ref().map(|l| l.member_id.as_str())
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.loan.as_ref().map(|l| l.due_date)
    }

    /// Overdue means strictly past the due date.
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.due_date().is_some_and(|due| as_of > due)
    }

    pub(crate) fn set_loan(&mut self, loan: Loan) {
        self.loan = Some(loan);
    }

    pub(crate) fn clear_loan(&mut self) {
        self.loan = None;
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ISBN: {} | Title: {} | Author: {} | Year: {} | ",
            self.isbn, self.title, self.author, self.year
        )?;
        match &self.loan {
            None => f.write_str("Available"),
            Some(loan) => write!(f, "Borrowed by: {} (due {})", loan.member_id, loan.due_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    borrowed_isbns: Vec<String>,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            borrowed_isbns: Vec::new(),
        }
    }

    pub(crate) fn with_borrowed(mut self, isbns: Vec<String>) -> Self {
        self.borrowed_isbns = isbns;
        self
    }

    pub fn borrowed_isbns(&self) -> &[String] {
        &self.borrowed_isbns
    }

    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed_isbns.iter().any(|b| b == isbn)
    }

    /// Set insert; keeps first-seen order.
    pub(crate) fn add_borrowed(&mut self, isbn: &str) {
        if !self.has_borrowed(isbn) {
            self.borrowed_isbns.push(isbn.to_string());
        }
    }

    pub(crate) fn remove_borrowed(&mut self, isbn: &str) -> bool {
        let before = self.borrowed_isbns.len();
        self.borrowed_isbns.retain(|b| b != isbn);
        self.borrowed_isbns.len() != before
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let borrowed = if self.borrowed_isbns.is_empty() {
            "None".to_string()
        } else {
            self.borrowed_isbns.join(", ")
        };
        write!(f, "ID: {} | Name: {} | Borrowed: {}", self.id, self.name, borrowed)
    }
}

/// Aggregate counts over the catalog, computed for a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total_books: usize,
    pub available_books: usize,
    pub borrowed_books: usize,
    pub overdue_books: usize,
    pub registered_members: usize,
}

/// A cross-entity inconsistency found in loaded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanAnomaly {
    /// The book names a borrower that is not registered.
    UnknownBorrower { isbn: String, member_id: String },
    /// The book names a borrower whose set does not list it.
    MissingFromMember { isbn: String, member_id: String },
    /// A member lists an ISBN that is not on loan to them.
    StaleMemberEntry { isbn: String, member_id: String },
}

impl fmt::Display for LoanAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanAnomaly::UnknownBorrower { isbn, member_id } => {
                write!(f, "book {} is lent to unknown member {}", isbn, member_id)
            }
            LoanAnomaly::MissingFromMember { isbn, member_id } => {
                write!(f, "book {} is lent to {} but missing from their list", isbn, member_id)
            }
            LoanAnomaly::StaleMemberEntry { isbn, member_id } => {
                write!(f, "member {} lists {} which is not lent to them", member_id, isbn)
            }
        }
    }
}
