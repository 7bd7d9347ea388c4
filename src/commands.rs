//! Non-interactive subcommands: print and exit.

use crate::cli::{Commands, SearchArgs};
use crate::menu::run_menu;
use crate::prompt::Prompter;
use crate::render;
use analytics::AnalyticsEngine;
use database::StudentRepository;
use std::io::{self, Write};

/// Runs one command against an open repository.
pub async fn run_command<W: Write>(
    repo: &mut StudentRepository,
    command: Commands,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Menu => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), out);
            run_menu(repo, &mut prompter).await
        }
        Commands::List => {
            let records = repo.list_all().await?;
            render::write_records(out, &records, "No student records found.")?;
            Ok(())
        }
        Commands::Search(SearchArgs { name: Some(name), .. }) => {
            let records = repo.find_by_name_substring(&name).await?;
            let empty = format!("No students found with the name containing \"{name}\".");
            render::write_records(out, &records, &empty)?;
            Ok(())
        }
        Commands::Search(SearchArgs { section, .. }) => {
            let section = section.unwrap_or_default();
            let records = repo.find_by_section(&section).await?;
            let empty = format!("No students found in section \"{section}\".");
            render::write_records(out, &records, &empty)?;
            Ok(())
        }
        Commands::Analytics => {
            let report = AnalyticsEngine::new().calculate(&repo.grade_columns().await?);
            render::write_report(out, &report)?;
            Ok(())
        }
    }
}
