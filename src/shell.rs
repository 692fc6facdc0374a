//! Numbered text menu over a [`Registry`].
//!
//! The shell only prompts, parses and prints. Every rule about books,
//! members and loans lives in the registry; failures come back as
//! [`LibraryError`] values and are printed as one line each.

use crate::core::registry::Registry;
use crate::domain::model::{Book, Member};
use crate::domain::ports::{Clock, RecordStore};
use crate::utils::error::LibraryError;
use crate::utils::validation::validate_non_empty_string;
use std::io::{self, BufRead, Write};

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a, S: RecordStore, R: BufRead, W: Write> {
    registry: &'a mut Registry<S>,
    clock: Box<dyn Clock>,
    input: R,
    output: W,
}

impl<'a, S: RecordStore, R: BufRead, W: Write> Shell<'a, S, R, W> {
    pub fn new(registry: &'a mut Registry<S>, clock: Box<dyn Clock>, input: R, output: W) -> Self {
        Self {
            registry,
            clock,
            input,
            output,
        }
    }

    /// Runs until the user picks Exit or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.print_diagnostics()?;

        loop {
            self.print_menu()?;
            let Some(choice) = self.read_int("Enter your choice: ")? else {
                break;
            };

            let flow = match choice {
                1 => self.add_book()?,
                2 => self.remove_book()?,
                3 => self.list_books()?,
                4 => self.search_books()?,
                5 => self.register_member()?,
                6 => self.list_members()?,
                7 => self.borrow_book()?,
                8 => self.return_book()?,
                9 => self.show_statistics()?,
                0 => {
                    writeln!(self.output, "Exiting... Goodbye!")?;
                    Flow::Exit
                }
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };

            self.print_diagnostics()?;
            if flow == Flow::Exit {
                break;
            }
        }

        self.output.flush()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== LIBRARY MANAGEMENT SYSTEM ===")?;
        writeln!(self.output, "1. Add New Book")?;
        writeln!(self.output, "2. Remove Book")?;
        writeln!(self.output, "3. View All Books")?;
        writeln!(self.output, "4. Search Books")?;
        writeln!(self.output, "5. Register Member")?;
        writeln!(self.output, "6. View All Members")?;
        writeln!(self.output, "7. Borrow Book")?;
        writeln!(self.output, "8. Return Book")?;
        writeln!(self.output, "9. View Library Statistics")?;
        writeln!(self.output, "0. Exit")
    }

    fn print_diagnostics(&mut self) -> io::Result<()> {
        for diagnostic in self.registry.drain_diagnostics() {
            writeln!(self.output, "{}", diagnostic)?;
        }
        Ok(())
    }

    fn print_failure(&mut self, error: &LibraryError) -> io::Result<Flow> {
        tracing::debug!("Command failed ({:?}): {}", error.category(), error);
        writeln!(self.output, "{}", error.user_friendly_message())?;
        Ok(Flow::Continue)
    }

    // --- input ---

    /// `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn read_int(&mut self, prompt: &str) -> io::Result<Option<i32>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match line.parse::<i32>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    fn read_non_empty(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            if validate_non_empty_string("input", &line).is_ok() {
                return Ok(Some(line));
            }
            writeln!(self.output, "Input cannot be empty.")?;
        }
    }

    // --- commands ---

    fn add_book(&mut self) -> io::Result<Flow> {
        let Some(isbn) = self.read_non_empty("Enter ISBN: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(title) = self.read_non_empty("Enter title: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(author) = self.read_non_empty("Enter author: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(year) = self.read_int("Enter publication year: ")? else {
            return Ok(Flow::Exit);
        };

        let book = Book::new(isbn, title, author, year);
        let title = book.title.clone();
        match self.registry.add_book(book) {
            Ok(()) => {
                writeln!(self.output, "Book added successfully: {}", title)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.print_failure(&e),
        }
    }

    fn remove_book(&mut self) -> io::Result<Flow> {
        let Some(isbn) = self.read_non_empty("Enter ISBN to remove: ")? else {
            return Ok(Flow::Exit);
        };

        match self.registry.remove_book(&isbn) {
            Ok(_) => {
                writeln!(self.output, "Book removed successfully")?;
                Ok(Flow::Continue)
            }
            Err(LibraryError::BookNotFound { isbn }) => {
                writeln!(self.output, "Book not found with ISBN: {}", isbn)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.print_failure(&e),
        }
    }

    fn list_books(&mut self) -> io::Result<Flow> {
        let books = self.registry.books();
        if books.is_empty() {
            writeln!(self.output, "No books in the library.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output)?;
        writeln!(self.output, "=== ALL BOOKS ===")?;
        writeln!(self.output, "Total books: {}", books.len())?;
        writeln!(self.output, "{}", "-".repeat(RULE_WIDTH))?;
        for (i, book) in books.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, book)?;
        }
        Ok(Flow::Continue)
    }

    fn search_books(&mut self) -> io::Result<Flow> {
        let Some(keyword) = self.read_non_empty("Enter keyword (title/author): ")? else {
            return Ok(Flow::Exit);
        };

        let results = self.registry.search_books(&keyword);
        if results.is_empty() {
            writeln!(self.output, "No books found for keyword: {}", keyword)?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output)?;
        writeln!(self.output, "=== SEARCH RESULTS ===")?;
        for (i, book) in results.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, book)?;
        }
        Ok(Flow::Continue)
    }

    fn register_member(&mut self) -> io::Result<Flow> {
        let Some(id) = self.read_non_empty("Enter member ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(name) = self.read_non_empty("Enter member name: ")? else {
            return Ok(Flow::Exit);
        };

        match self.registry.register_member(Member::new(id, name.clone())) {
            Ok(()) => {
                writeln!(self.output, "Member registered successfully: {}", name)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.print_failure(&e),
        }
    }

    fn list_members(&mut self) -> io::Result<Flow> {
        let members = self.registry.members();
        if members.is_empty() {
            writeln!(self.output, "No members registered.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output)?;
        writeln!(self.output, "=== ALL MEMBERS ===")?;
        writeln!(self.output, "Total members: {}", members.len())?;
        writeln!(self.output, "{}", "-".repeat(RULE_WIDTH))?;
        for (i, member) in members.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, member)?;
        }
        Ok(Flow::Continue)
    }

    fn borrow_book(&mut self) -> io::Result<Flow> {
        let Some(isbn) = self.read_non_empty("Enter ISBN to borrow: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(member_id) = self.read_non_empty("Enter member ID: ")? else {
            return Ok(Flow::Exit);
        };

        let today = self.clock.today();
        match self.registry.borrow_book(&isbn, &member_id, today) {
            Ok(due_date) => {
                writeln!(self.output, "Book borrowed successfully!")?;
                writeln!(self.output, "Due date: {}", due_date)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.print_failure(&e),
        }
    }

    fn return_book(&mut self) -> io::Result<Flow> {
        let Some(isbn) = self.read_non_empty("Enter ISBN to return: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(member_id) = self.read_non_empty("Enter member ID: ")? else {
            return Ok(Flow::Exit);
        };

        let today = self.clock.today();
        match self.registry.return_book(&isbn, &member_id, today) {
            Ok(fine) => {
                writeln!(
                    self.output,
                    "Book returned successfully. Overdue fine: {:.2}",
                    fine
                )?;
                Ok(Flow::Continue)
            }
            Err(e) => self.print_failure(&e),
        }
    }

    fn show_statistics(&mut self) -> io::Result<Flow> {
        let stats = self.registry.statistics(self.clock.today());

        writeln!(self.output)?;
        writeln!(self.output, "=== LIBRARY STATISTICS ===")?;
        writeln!(self.output, "Total Books: {}", stats.total_books)?;
        writeln!(self.output, "Available Books: {}", stats.available_books)?;
        writeln!(self.output, "Borrowed Books: {}", stats.borrowed_books)?;
        writeln!(self.output, "Registered Members: {}", stats.registered_members)?;
        if stats.borrowed_books > 0 {
            writeln!(self.output, "Overdue Books: {}", stats.overdue_books)?;
        }
        Ok(Flow::Continue)
    }
}
