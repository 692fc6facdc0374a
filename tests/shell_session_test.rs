use anyhow::Result;
use chrono::NaiveDate;
use small_library::{FixedClock, LendingPolicy, LocalStorage, Registry, Shell};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

fn run_session(data_dir: &std::path::Path, today: NaiveDate, script: &str) -> Result<String> {
    let mut registry = Registry::open(LocalStorage::new(data_dir), LendingPolicy::default());
    let mut output = Vec::new();
    Shell::new(
        &mut registry,
        Box::new(FixedClock(today)),
        Cursor::new(script.as_bytes()),
        &mut output,
    )
    .run()?;
    Ok(String::from_utf8(output)?)
}

/// Two sessions on the same data directory: lend on day one, return late on day two.
#[test]
fn test_late_return_across_sessions() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().join("data");

    let first = run_session(
        &data_dir,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        "1\n001\nDune\nHerbert\n1965\n5\nM1\nAlice\n7\n001\nM1\n7\n001\nM1\n0\n",
    )?;
    assert!(first.contains("Due date: 2024-03-15"));
    assert!(first.contains("Book is already borrowed!"));

    let second = run_session(
        &data_dir,
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
        "9\n6\n8\n001\nM1\n0\n",
    )?;
    assert!(second.contains("Overdue Books: 1"));
    assert!(second.contains("1. ID: M1 | Name: Alice | Borrowed: 001"));
    assert!(second.contains("Book returned successfully. Overdue fine: 5.00"));

    assert_eq!(fs::read_to_string(data_dir.join("members.txt"))?, "M1;Alice;\n");
    assert_eq!(
        fs::read_to_string(data_dir.join("books.txt"))?,
        "001;Dune;Herbert;1965;true;;\n"
    );

    Ok(())
}

/// Load and save failures reach the user as one line each.
#[test]
fn test_diagnostics_are_printed() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let blocker = temp_dir.path().join("data");
    fs::write(&blocker, "not a directory")?;

    let output = run_session(
        &blocker,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        "5\nM1\nAlice\n0\n",
    )?;
    assert!(output.contains("Member registered successfully: Alice"));
    assert!(output.contains("Error saving members:"));

    Ok(())
}
