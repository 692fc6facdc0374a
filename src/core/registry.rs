use crate::core::codec::Record;
use crate::core::fines::{self, DEFAULT_FINE_PER_DAY};
use crate::domain::model::{Book, LibraryStats, Loan, LoanAnomaly, Member, RecordKind};
use crate::domain::ports::RecordStore;
use crate::utils::error::{ErrorCategory, LendingConflict, LibraryError, Result};
use chrono::{Days, NaiveDate};
use std::fmt;

pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;

/// Lending rules applied by the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LendingPolicy {
    pub loan_period_days: u32,
    pub fine_per_day: f64,
    /// Reject a book or member whose identifier is already registered.
    pub unique_ids: bool,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            fine_per_day: DEFAULT_FINE_PER_DAY,
            unique_ids: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Load,
    Save,
}

/// A persistence failure the registry absorbed instead of failing the
/// operation that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub operation: StoreOperation,
    pub kind: RecordKind,
    pub category: ErrorCategory,
    pub message: String,
}

impl Diagnostic {
    fn new(operation: StoreOperation, kind: RecordKind, error: &LibraryError) -> Self {
        Self {
            operation,
            kind,
            category: error.category(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.operation {
            StoreOperation::Load => "loading",
            StoreOperation::Save => "saving",
        };
        write!(f, "Error {} {}: {}", verb, self.kind.plural(), self.message)
    }
}

/// The catalog and member list, plus every lending transition between them.
///
/// All mutations go through here and each successful one rewrites the
/// affected record files. A failed write does not undo the in-memory change;
/// it is logged and queued as a [`Diagnostic`] until the caller drains it.
///
/// Only `link` and `unlink` touch lending state, and they always update the
/// book and the member together.
pub struct Registry<S: RecordStore> {
    store: S,
    books: Vec<Book>,
    members: Vec<Member>,
    policy: LendingPolicy,
    diagnostics: Vec<Diagnostic>,
}

impl<S: RecordStore> Registry<S> {
    /// Loads both record files. A file that cannot be read leaves its
    /// collection empty and queues a diagnostic; opening never fails.
    pub fn open(store: S, policy: LendingPolicy) -> Self {
        let mut diagnostics = Vec::new();
        let books = load_or_empty::<Book, S>(&store, &mut diagnostics);
        let members = load_or_empty::<Member, S>(&store, &mut diagnostics);

        tracing::info!("Loaded {} books and {} members", books.len(), members.len());

        let registry = Self {
            store,
            books,
            members,
            policy,
            diagnostics,
        };

        for anomaly in registry.audit_loans() {
            tracing::warn!("Loan records disagree: {}", anomaly);
        }

        registry
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Persistence failures queued since the last call.
    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    // --- books ---

    pub fn add_book(&mut self, book: Book) -> Result<()> {
        if self.policy.unique_ids && self.book_index(&book.isbn).is_some() {
            return Err(LibraryError::Duplicate {
                kind: RecordKind::Book,
                id: book.isbn,
            });
        }
        warn_on_delimiter(RecordKind::Book, &book.isbn, [&book.isbn, &book.title, &book.author]);

        tracing::info!("Book added: {} ({})", book.title, book.isbn);
        self.books.push(book);
        self.persist(RecordKind::Book);
        Ok(())
    }

    /// Removes the first book with `isbn`. A book out on loan is removed as
    /// well and disappears from its borrower's list.
    pub fn remove_book(&mut self, isbn: &str) -> Result<Book> {
        let book_idx = self.require_book(isbn)?;

        let mut members_changed = false;
        if let Some(member_id) = self.books[book_idx].borrower().map(str::to_string) {
            tracing::warn!("Removing book {} while lent to {}", isbn, member_id);
            if let Some(member_idx) = self.member_index(&member_id) {
                self.unlink(book_idx, member_idx);
                members_changed = true;
            }
        }

        let book = self.books.remove(book_idx);
        tracing::info!("Book removed: {} ({})", book.title, book.isbn);

        self.persist(RecordKind::Book);
        if members_changed {
            self.persist(RecordKind::Member);
        }
        Ok(book)
    }

    pub fn find_book_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.isbn == isbn)
    }

    /// Case-insensitive substring match on title or author, catalog order.
    pub fn search_books(&self, keyword: &str) -> Vec<&Book> {
        let needle = keyword.to_lowercase();
        self.books
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&needle) || b.author.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn overdue_books(&self, as_of: NaiveDate) -> Vec<&Book> {
        self.books.iter().filter(|b| b.is_overdue(as_of)).collect()
    }

    // --- members ---

    pub fn register_member(&mut self, member: Member) -> Result<()> {
        if self.policy.unique_ids && self.member_index(&member.id).is_some() {
            return Err(LibraryError::Duplicate {
                kind: RecordKind::Member,
                id: member.id,
            });
        }
        warn_on_delimiter(RecordKind::Member, &member.id, [&member.id, &member.name]);

        tracing::info!("Member registered: {} ({})", member.name, member.id);
        self.members.push(member);
        self.persist(RecordKind::Member);
        Ok(())
    }

    pub fn find_member_by_id(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Books currently lent to `member_id`.
    pub fn member_loans(&self, member_id: &str) -> Result<Vec<&Book>> {
        if self.member_index(member_id).is_none() {
            return Err(LibraryError::MemberNotFound {
                id: member_id.to_string(),
            });
        }
        Ok(self
            .books
            .iter()
            .filter(|b| b.borrower() == Some(member_id))
            .collect())
    }

    // --- lending ---

    /// Lends `isbn` to `member_id` and returns the due date.
    ///
    /// Checked in order: the book exists, the member exists, the book is
    /// available. Nothing changes unless all three hold.
    pub fn borrow_book(&mut self, isbn: &str, member_id: &str, today: NaiveDate) -> Result<NaiveDate> {
        let book_idx = self.require_book(isbn)?;
        let member_idx = self.require_member(member_id)?;

        if !self.books[book_idx].is_available() {
            return Err(LibraryError::InvalidState(LendingConflict::AlreadyBorrowed {
                isbn: isbn.to_string(),
            }));
        }

        let due_date = today
            .checked_add_days(Days::new(u64::from(self.policy.loan_period_days)))
            .ok_or_else(|| LibraryError::ConfigError {
                message: format!(
                    "a {} day loan from {} ends outside the supported calendar",
                    self.policy.loan_period_days, today
                ),
            })?;

        self.link(book_idx, member_idx, due_date);
        tracing::info!("Book {} lent to {} until {}", isbn, member_id, due_date);

        self.persist(RecordKind::Book);
        self.persist(RecordKind::Member);
        Ok(due_date)
    }

    /// Takes `isbn` back from `member_id` and returns the overdue fine as of
    /// `today`.
    ///
    /// Checked in order: the book exists, the member exists, the book is on
    /// loan, the book is lent to this member and their list holds it.
    pub fn return_book(&mut self, isbn: &str, member_id: &str, today: NaiveDate) -> Result<f64> {
        let book_idx = self.require_book(isbn)?;
        let member_idx = self.require_member(member_id)?;

        if self.books[book_idx].is_available() {
            return Err(LibraryError::InvalidState(LendingConflict::NotBorrowed {
                isbn: isbn.to_string(),
            }));
        }
        if self.books[book_idx].borrower() != Some(member_id)
            || !self.members[member_idx].has_borrowed(isbn)
        {
            return Err(LibraryError::InvalidState(LendingConflict::MemberMismatch {
                isbn: isbn.to_string(),
                member_id: member_id.to_string(),
            }));
        }

        let fine = self.calculate_fine(&self.books[book_idx], today);
        self.unlink(book_idx, member_idx);
        tracing::info!("Book {} returned by {}, fine {:.2}", isbn, member_id, fine);

        self.persist(RecordKind::Book);
        self.persist(RecordKind::Member);
        Ok(fine)
    }

    pub fn calculate_fine(&self, book: &Book, as_of: NaiveDate) -> f64 {
        fines::calculate_fine(book.due_date(), as_of, self.policy.fine_per_day)
    }

    // --- reporting ---

    pub fn statistics(&self, as_of: NaiveDate) -> LibraryStats {
        let available_books = self.books.iter().filter(|b| b.is_available()).count();
        LibraryStats {
            total_books: self.books.len(),
            available_books,
            borrowed_books: self.books.len() - available_books,
            overdue_books: self.overdue_books(as_of).len(),
            registered_members: self.members.len(),
        }
    }

    /// Places where a book's borrower and the members' lists disagree.
    /// Empty unless the record files were edited or written by older code.
    pub fn audit_loans(&self) -> Vec<LoanAnomaly> {
        let mut anomalies = Vec::new();

        for book in &self.books {
            let Some(member_id) = book.borrower() else {
                continue;
            };
            match self.find_member_by_id(member_id) {
                None => anomalies.push(LoanAnomaly::UnknownBorrower {
                    isbn: book.isbn.clone(),
                    member_id: member_id.to_string(),
                }),
                Some(member) if !member.has_borrowed(&book.isbn) => {
                    anomalies.push(LoanAnomaly::MissingFromMember {
                        isbn: book.isbn.clone(),
                        member_id: member_id.to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        for member in &self.members {
            for isbn in member.borrowed_isbns() {
                let held = self
                    .books
                    .iter()
                    .any(|b| &b.isbn == isbn && b.borrower() == Some(member.id.as_str()));
                if !held {
                    anomalies.push(LoanAnomaly::StaleMemberEntry {
                        isbn: isbn.clone(),
                        member_id: member.id.clone(),
                    });
                }
            }
        }

        anomalies
    }

    // --- internals ---

    fn book_index(&self, isbn: &str) -> Option<usize> {
        self.books.iter().position(|b| b.isbn == isbn)
    }

    fn member_index(&self, id: &str) -> Option<usize> {
        self.members.iter().position(|m| m.id == id)
    }

    fn require_book(&self, isbn: &str) -> Result<usize> {
        self.book_index(isbn).ok_or_else(|| LibraryError::BookNotFound {
            isbn: isbn.to_string(),
        })
    }

    fn require_member(&self, id: &str) -> Result<usize> {
        self.member_index(id)
            .ok_or_else(|| LibraryError::MemberNotFound { id: id.to_string() })
    }

    fn link(&mut self, book_idx: usize, member_idx: usize, due_date: NaiveDate) {
        let member = &mut self.members[member_idx];
        let book = &mut self.books[book_idx];
        member.add_borrowed(&book.isbn);
        book.set_loan(Loan {
            member_id: member.id.clone(),
            due_date,
        });
    }

    fn unlink(&mut self, book_idx: usize, member_idx: usize) {
        let member = &mut self.members[member_idx];
        let book = &mut self.books[book_idx];
        member.remove_borrowed(&book.isbn);
        book.clear_loan();
    }

    fn persist(&mut self, kind: RecordKind) {
        let result = match kind {
            RecordKind::Book => self.store.save(self.books.as_slice()),
            RecordKind::Member => self.store.save(self.members.as_slice()),
        };

        if let Err(e) = result {
            tracing::error!("Failed to save {}: {}", kind.plural(), e);
            self.diagnostics
                .push(Diagnostic::new(StoreOperation::Save, kind, &e));
        }
    }
}

fn load_or_empty<R: Record, S: RecordStore>(store: &S, diagnostics: &mut Vec<Diagnostic>) -> Vec<R> {
    match store.load::<R>() {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to load {}: {}", R::KIND.plural(), e);
            diagnostics.push(Diagnostic::new(StoreOperation::Load, R::KIND, &e));
            Vec::new()
        }
    }
}

fn warn_on_delimiter<const N: usize>(kind: RecordKind, id: &str, fields: [&String; N]) {
    if fields.iter().any(|f| f.contains(';')) {
        tracing::warn!("{} {} contains ';' and will not read back intact", kind, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn today() -> NaiveDate {
        date("2024-03-01")
    }

    fn registry() -> Registry<MemoryStore> {
        let mut registry = Registry::open(MemoryStore::new(), LendingPolicy::default());
        registry
            .add_book(Book::new("001", "Dune", "Herbert", 1965))
            .unwrap();
        registry
            .add_book(Book::new("002", "The Hobbit", "J.R.R. Tolkien", 1937))
            .unwrap();
        registry.register_member(Member::new("M1", "Alice")).unwrap();
        registry.register_member(Member::new("M2", "Bob")).unwrap();
        registry
    }

    #[test]
    fn test_open_empty_store() {
        let mut registry = Registry::open(MemoryStore::new(), LendingPolicy::default());
        assert!(registry.books().is_empty());
        assert!(registry.members().is_empty());
        assert!(registry.drain_diagnostics().is_empty());
    }

    #[test]
    fn test_add_book_persists_catalog() {
        let registry = registry();
        assert_eq!(registry.books().len(), 2);
        assert_eq!(
            registry.store().lines(RecordKind::Book),
            vec!["001;Dune;Herbert;1965;true;;", "002;The Hobbit;J.R.R. Tolkien;1937;true;;"]
        );
        assert_eq!(
            registry.store().lines(RecordKind::Member),
            vec!["M1;Alice;", "M2;Bob;"]
        );
    }

    #[test]
    fn test_duplicate_isbn_first_match_wins() {
        let mut registry = registry();
        registry
            .add_book(Book::new("001", "Dune (2nd copy)", "Herbert", 1965))
            .unwrap();
        assert_eq!(registry.books().len(), 3);
        assert_eq!(registry.find_book_by_isbn("001").unwrap().title, "Dune");
    }

    #[test]
    fn test_unique_ids_rejects_duplicates() {
        let policy = LendingPolicy {
            unique_ids: true,
            ..LendingPolicy::default()
        };
        let mut registry = Registry::open(MemoryStore::new(), policy);
        registry.add_book(Book::new("001", "Dune", "Herbert", 1965)).unwrap();
        registry.register_member(Member::new("M1", "Alice")).unwrap();

        let err = registry
            .add_book(Book::new("001", "Other", "Someone", 2000))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Conflict);

        let err = registry.register_member(Member::new("M1", "Alias")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Conflict);

        assert_eq!(registry.books().len(), 1);
        assert_eq!(registry.members().len(), 1);
    }

    #[test]
    fn test_remove_missing_book_leaves_catalog_unchanged() {
        let mut registry = registry();
        let before = registry.books().to_vec();

        let err = registry.remove_book("999").unwrap_err();
        assert!(matches!(err, LibraryError::BookNotFound { .. }));
        assert_eq!(registry.books(), before.as_slice());
    }

    #[test]
    fn test_remove_book() {
        let mut registry = registry();
        let removed = registry.remove_book("001").unwrap();
        assert_eq!(removed.title, "Dune");
        assert!(registry.find_book_by_isbn("001").is_none());
        assert_eq!(registry.store().lines(RecordKind::Book).len(), 1);
    }

    #[test]
    fn test_remove_lent_book_clears_member_entry() {
        let mut registry = registry();
        registry.borrow_book("001", "M1", today()).unwrap();

        registry.remove_book("001").unwrap();
        assert!(registry.find_member_by_id("M1").unwrap().borrowed_isbns().is_empty());
        assert_eq!(registry.store().lines(RecordKind::Member)[0], "M1;Alice;");
        assert!(registry.audit_loans().is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_on_title_and_author() {
        let registry = registry();

        let by_author = registry.search_books("tolkien");
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].isbn, "002");

        let by_title = registry.search_books("DUNE");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].isbn, "001");

        assert_eq!(registry.search_books("").len(), 2);
        assert!(registry.search_books("asimov").is_empty());
    }

    #[test]
    fn test_borrow_sets_both_sides() {
        let mut registry = registry();
        let due = registry.borrow_book("001", "M1", today()).unwrap();
        assert_eq!(due, date("2024-03-15"));

        let book = registry.find_book_by_isbn("001").unwrap();
        assert!(!book.is_available());
        assert_eq!(book.borrower(), Some("M1"));
        assert_eq!(book.due_date(), Some(due));
        assert!(registry.find_member_by_id("M1").unwrap().has_borrowed("001"));

        assert_eq!(
            registry.store().lines(RecordKind::Book)[0],
            "001;Dune;Herbert;1965;false;M1;2024-03-15"
        );
        assert_eq!(registry.store().lines(RecordKind::Member)[0], "M1;Alice;001");
    }

    #[test]
    fn test_borrow_precondition_order() {
        let mut registry = registry();

        // missing book reported before missing member
        let err = registry.borrow_book("999", "M9", today()).unwrap_err();
        assert!(matches!(err, LibraryError::BookNotFound { .. }));

        let err = registry.borrow_book("001", "M9", today()).unwrap_err();
        assert!(matches!(err, LibraryError::MemberNotFound { .. }));

        registry.borrow_book("001", "M1", today()).unwrap();
        let err = registry.borrow_book("001", "M2", today()).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::InvalidState(LendingConflict::AlreadyBorrowed { .. })
        ));
        assert!(!registry.find_member_by_id("M2").unwrap().has_borrowed("001"));
        assert_eq!(registry.find_book_by_isbn("001").unwrap().borrower(), Some("M1"));
    }

    #[test]
    fn test_return_same_day_has_no_fine() {
        let mut registry = registry();
        registry.borrow_book("001", "M1", today()).unwrap();

        let fine = registry.return_book("001", "M1", today()).unwrap();
        assert_eq!(fine, 0.0);

        let book = registry.find_book_by_isbn("001").unwrap();
        assert!(book.is_available());
        assert_eq!(book.borrower(), None);
        assert_eq!(book.due_date(), None);
        assert!(registry.find_member_by_id("M1").unwrap().borrowed_isbns().is_empty());
    }

    #[test]
    fn test_return_late_charges_per_day() {
        let mut registry = registry();
        let due = registry.borrow_book("001", "M1", today()).unwrap();

        let fine = registry
            .return_book("001", "M1", due.checked_add_days(Days::new(5)).unwrap())
            .unwrap();
        assert_eq!(fine, 5.0);
    }

    #[test]
    fn test_return_precondition_order() {
        let mut registry = registry();

        let err = registry.return_book("999", "M1", today()).unwrap_err();
        assert!(matches!(err, LibraryError::BookNotFound { .. }));

        let err = registry.return_book("001", "M9", today()).unwrap_err();
        assert!(matches!(err, LibraryError::MemberNotFound { .. }));

        let err = registry.return_book("001", "M1", today()).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::InvalidState(LendingConflict::NotBorrowed { .. })
        ));
    }

    #[test]
    fn test_return_by_other_member_changes_nothing() {
        let mut registry = registry();
        registry.borrow_book("001", "M1", today()).unwrap();
        let books_before = registry.store().lines(RecordKind::Book);
        let members_before = registry.store().lines(RecordKind::Member);

        let err = registry.return_book("001", "M2", today()).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::InvalidState(LendingConflict::MemberMismatch { .. })
        ));

        assert_eq!(registry.find_book_by_isbn("001").unwrap().borrower(), Some("M1"));
        assert!(registry.find_member_by_id("M1").unwrap().has_borrowed("001"));
        assert_eq!(registry.store().lines(RecordKind::Book), books_before);
        assert_eq!(registry.store().lines(RecordKind::Member), members_before);
    }

    #[test]
    fn test_stale_member_entry_cannot_return() {
        let store = MemoryStore::new()
            .with_lines(RecordKind::Book, ["001;Dune;Herbert;1965;false;M1;2024-03-15"])
            .with_lines(RecordKind::Member, ["M1;Alice;001", "M2;Bob;001"]);
        let mut registry = Registry::open(store, LendingPolicy::default());

        let err = registry.return_book("001", "M2", date("2024-03-20")).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::InvalidState(LendingConflict::MemberMismatch { .. })
        ));
        assert_eq!(registry.find_book_by_isbn("001").unwrap().borrower(), Some("M1"));
        assert!(registry.find_member_by_id("M1").unwrap().has_borrowed("001"));

        let fine = registry.return_book("001", "M1", date("2024-03-20")).unwrap();
        assert_eq!(fine, 5.0);
        assert!(registry.find_book_by_isbn("001").unwrap().is_available());
        assert!(!registry.find_member_by_id("M1").unwrap().has_borrowed("001"));
        assert_eq!(
            registry.audit_loans(),
            vec![LoanAnomaly::StaleMemberEntry {
                isbn: "001".to_string(),
                member_id: "M2".to_string(),
            }]
        );
    }

    #[test]
    fn test_statistics_and_overdue() {
        let mut registry = registry();
        let due = registry.borrow_book("001", "M1", today()).unwrap();

        let on_time = registry.statistics(due);
        assert_eq!(
            on_time,
            LibraryStats {
                total_books: 2,
                available_books: 1,
                borrowed_books: 1,
                overdue_books: 0,
                registered_members: 2,
            }
        );

        let late = due.checked_add_days(Days::new(1)).unwrap();
        assert_eq!(registry.statistics(late).overdue_books, 1);
        assert_eq!(registry.overdue_books(late)[0].isbn, "001");
    }

    #[test]
    fn test_member_loans() {
        let mut registry = registry();
        registry.borrow_book("001", "M1", today()).unwrap();
        registry.borrow_book("002", "M1", today()).unwrap();

        let loans = registry.member_loans("M1").unwrap();
        assert_eq!(loans.len(), 2);
        assert!(registry.member_loans("M2").unwrap().is_empty());
        assert!(registry.member_loans("M9").is_err());
    }

    #[test]
    fn test_open_reports_unreadable_lines_and_audits() {
        let store = MemoryStore::new()
            .with_lines(
                RecordKind::Book,
                ["001;Dune;Herbert;1965;false;M1;2024-03-15", "002;Emma;Austen;1815;true;;"],
            )
            .with_lines(RecordKind::Member, ["M1;Alice;", "M2;Bob;002"]);

        let mut registry = Registry::open(store, LendingPolicy::default());
        assert!(registry.drain_diagnostics().is_empty());

        let anomalies = registry.audit_loans();
        assert_eq!(
            anomalies,
            vec![
                LoanAnomaly::MissingFromMember {
                    isbn: "001".to_string(),
                    member_id: "M1".to_string(),
                },
                LoanAnomaly::StaleMemberEntry {
                    isbn: "002".to_string(),
                    member_id: "M2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_malformed_year_empties_collection_with_diagnostic() {
        let store = MemoryStore::new()
            .with_lines(
                RecordKind::Book,
                ["001;Dune;Herbert;1965;true;;", "002;Emma;Austen;eighteen;true;;"],
            )
            .with_lines(RecordKind::Member, ["M1;Alice;"]);

        let mut registry = Registry::open(store, LendingPolicy::default());
        assert!(registry.books().is_empty());
        assert_eq!(registry.members().len(), 1);

        let diagnostics = registry.drain_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].operation, StoreOperation::Load);
        assert_eq!(diagnostics[0].kind, RecordKind::Book);
        assert_eq!(diagnostics[0].category, ErrorCategory::MalformedRecord);
        assert!(diagnostics[0].to_string().starts_with("Error loading books:"));
        assert!(registry.drain_diagnostics().is_empty());
    }
}
