//! The interactive eight-option menu and the operations behind it.
//!
//! Each operation reports storage failures to the operator and returns to the
//! menu; only I/O errors on the terminal itself end the loop.

use crate::prompt::Prompter;
use crate::render;
use analytics::AnalyticsEngine;
use core_types::{CoreError, NewStudent, StudentUpdate};
use database::{DbError, DeleteOutcome, StudentRepository, UpdateOutcome};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    ViewAll,
    Update,
    Delete,
    SearchSection,
    SearchName,
    Analytics,
    Exit,
}

impl MenuChoice {
    pub fn from_number(number: u32) -> Option<Self> {
        Some(match number {
            1 => MenuChoice::Add,
            2 => MenuChoice::ViewAll,
            3 => MenuChoice::Update,
            4 => MenuChoice::Delete,
            5 => MenuChoice::SearchSection,
            6 => MenuChoice::SearchName,
            7 => MenuChoice::Analytics,
            8 => MenuChoice::Exit,
            _ => return None,
        })
    }
}

fn write_menu<W: Write>(out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(50);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "         GRADE ANALYTICS DASHBOARD")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "1. Add Student")?;
    writeln!(out, "2. View All Students")?;
    writeln!(out, "3. Update Student")?;
    writeln!(out, "4. Delete Student")?;
    writeln!(out, "5. Search by Section")?;
    writeln!(out, "6. Search Student")?;
    writeln!(out, "7. View Analytics")?;
    writeln!(out, "8. Exit")?;
    writeln!(out, "{rule}")
}

fn is_end_of_input(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::UnexpectedEof)
}

/// Runs the menu until the operator picks Exit or the input ends.
pub async fn run_menu<R: BufRead, W: Write>(
    repo: &mut StudentRepository,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    loop {
        write_menu(prompter.output())?;
        let number = match prompter.whole_number("Enter your choice (1-8): ") {
            Ok(number) => number,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        };

        match MenuChoice::from_number(number) {
            Some(MenuChoice::Exit) => {
                writeln!(prompter.output(), "\nExiting Grade Analytics Dashboard...")?;
                writeln!(prompter.output(), "Thank you for using the system!")?;
                return Ok(());
            }
            Some(choice) => {
                if let Err(e) = perform(repo, prompter, choice).await {
                    if is_end_of_input(&e) {
                        break;
                    }
                    report_failure(prompter.output(), choice, e)?;
                }
            }
            None => writeln!(prompter.output(), "Invalid choice. Please select 1-8.")?,
        }

        match prompter.pause() {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
    }
    tracing::info!("Input closed; leaving the menu.");
    Ok(())
}

/// Storage and validation failures are shown and swallowed; anything else
/// (a broken terminal) is passed up.
fn report_failure<W: Write>(
    out: &mut W,
    choice: MenuChoice,
    err: anyhow::Error,
) -> anyhow::Result<()> {
    if let Some(db_err) = err.downcast_ref::<DbError>() {
        if db_err.is_connectivity() {
            tracing::error!(?choice, error = %db_err, "Database connection lost.");
            writeln!(out, "Connection error: {db_err}")?;
            writeln!(out, "Check that the database server is still running, then try again.")?;
        } else {
            tracing::error!(?choice, error = %db_err, "Database operation failed.");
            writeln!(out, "Database error: {db_err}")?;
        }
        Ok(())
    } else if let Some(core_err) = err.downcast_ref::<CoreError>() {
        tracing::warn!(?choice, error = %core_err, "Rejected operator input.");
        writeln!(out, "{core_err}")?;
        Ok(())
    } else {
        Err(err)
    }
}

async fn perform<R: BufRead, W: Write>(
    repo: &mut StudentRepository,
    p: &mut Prompter<R, W>,
    choice: MenuChoice,
) -> anyhow::Result<()> {
    match choice {
        MenuChoice::Add => add_student(repo, p).await,
        MenuChoice::ViewAll => view_students(repo, p).await,
        MenuChoice::Update => update_student(repo, p).await,
        MenuChoice::Delete => delete_student(repo, p).await,
        MenuChoice::SearchSection => search_section(repo, p).await,
        MenuChoice::SearchName => search_name(repo, p).await,
        MenuChoice::Analytics => show_analytics(repo, p).await,
        MenuChoice::Exit => Ok(()),
    }
}

async fn add_student<R: BufRead, W: Write>(
    repo: &mut StudentRepository,
    p: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    writeln!(p.output(), "\n=== ADD NEW STUDENT ===")?;
    let name = p.name("Enter student name: ")?;
    let section = p.read_line("Enter section: ")?;
    let scores = p.scores()?;

    let student = repo.create(NewStudent::new(name, section, scores)?).await?;
    writeln!(
        p.output(),
        "✓ Student added successfully! (ID {}, average {:.1}, {})",
        student.id,
        student.average,
        student.remarks
    )?;
    Ok(())
}

async fn view_students<R: BufRead, W: Write>(
    repo: &mut StudentRepository,
    p: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let records = repo.list_all().await?;
    writeln!(p.output(), "\n=== STUDENT RECORDS ===")?;
    render::write_records(p.output(), &records, "No student records found.")?;
    Ok(())
}

async fn update_student<R: BufRead, W: Write>(
    repo: &mut StudentRepository,
    p: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    writeln!(p.output(), "\n=== UPDATE STUDENT ===")?;
    let name = p.name("Enter student name to update: ")?;

    let Some(current) = repo.find_exact_by_name(&name).await? else {
        writeln!(p.output(), "Student not found.")?;
        return Ok(());
    };
    writeln!(p.output(), "\n--- Current Record ---")?;
    render::write_record_details(p.output(), &current)?;

    writeln!(p.output(), "\n--- Enter New Information ---")?;
    let new_name = p.optional_name("Enter new name (or press Enter to keep current): ")?;
    let new_section = p.read_line("Enter new section (or press Enter to keep current): ")?;
    writeln!(p.output(), "Current grades will be updated. Enter new grades:")?;
    let scores = p.scores()?;

    let update = StudentUpdate::from_input(&new_name, &new_section, scores);
    match repo.update(&name, update).await? {
        UpdateOutcome::Updated(record) => writeln!(
            p.output(),
            "✓ Student updated successfully! (average {:.1}, {})",
            record.average,
            record.remarks
        )?,
        UpdateOutcome::NotFound => writeln!(p.output(), "Student not found.")?,
    }
    Ok(())
}

async fn delete_student<R: BufRead, W: Write>(
    repo: &mut StudentRepository,
    p: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    writeln!(p.output(), "\n=== DELETE STUDENT ===")?;
    let name = p.read_line("Enter student name to delete: ")?;

    let Some(current) = repo.find_exact_by_name(&name).await? else {
        writeln!(p.output(), "Student not found.")?;
        return Ok(());
    };
    writeln!(p.output(), "\n--- Student to be deleted ---")?;
    render::write_record_details(p.output(), &current)?;

    let confirmed = p.confirm("\nAre you sure you want to delete this student? (Y/N): ")?;
    let message = match repo.delete(&name, confirmed).await? {
        DeleteOutcome::Deleted(_) => "✓ Student deleted successfully!",
        DeleteOutcome::Cancelled => "Delete operation cancelled.",
        DeleteOutcome::NotFound => "Student not found.",
    };
    writeln!(p.output(), "{message}")?;
    Ok(())
}

async fn search_section<R: BufRead, W: Write>(
    repo: &mut StudentRepository,
    p: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    writeln!(p.output(), "\n=== SEARCH BY SECTION ===")?;
    let section = p.read_line("Enter section to search: ")?;

    let records = repo.find_by_section(&section).await?;
    writeln!(p.output(), "\n--- Students in Section \"{section}\" ---")?;
    let empty = format!("No students found in section \"{section}\".");
    render::write_records(p.output(), &records, &empty)?;
    Ok(())
}

async fn search_name<R: BufRead, W: Write>(
    repo: &mut StudentRepository,
    p: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    writeln!(p.output(), "\n=== SEARCH STUDENT ===")?;
    let query = p.name("Enter student name to search: ")?;

    let records = repo.find_by_name_substring(&query).await?;
    writeln!(p.output(), "\n--- Search Results for \"{query}\" ---")?;
    let empty = format!("No students found with the name containing \"{query}\".");
    render::write_records(p.output(), &records, &empty)?;
    Ok(())
}

async fn show_analytics<R: BufRead, W: Write>(
    repo: &mut StudentRepository,
    p: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let columns = repo.grade_columns().await?;
    let report = AnalyticsEngine::new().calculate(&columns);
    render::write_report(p.output(), &report)?;
    Ok(())
}
