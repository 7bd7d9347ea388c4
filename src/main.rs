use clap::Parser;
use database::{Bootstrapped, DbError, StudentRepository};
use gradebook::cli::Cli;
use gradebook::commands::run_command;
use gradebook::logging;
use std::process::ExitCode;

/// The main entry point for the Gradebook console.
///
/// One operator, one connection, one statement at a time, so a
/// single-threaded runtime is all that is needed.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load GRADEBOOK__* overrides from a .env file if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match configuration::load_config(cli.config.as_deref()) {
        Ok(config) => cli.apply_overrides(config),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Held until the end of main so the file appender flushes.
    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("=== GRADE ANALYTICS DASHBOARD ===");
    eprintln!("Initializing database connection...");
    let bootstrapped = match database::connect(&config.database).await {
        Ok(bootstrapped) => bootstrapped,
        Err(e) => {
            print_troubleshooting(&e);
            return ExitCode::FAILURE;
        }
    };
    print_bootstrap_report(&bootstrapped);

    // The repository owns the connection from here on; it is closed below on
    // every path out of the session.
    let mut repo = StudentRepository::new(bootstrapped.connection);
    let stdout = std::io::stdout();
    let result = run_command(&mut repo, cli.resolved_command(), &mut stdout.lock()).await;

    if let Err(e) = repo.close().await {
        tracing::warn!(error = %e, "Failed to close the database connection cleanly.");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed.");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_bootstrap_report(bootstrapped: &Bootstrapped) {
    for attempt in &bootstrapped.failed {
        eprintln!("✗ Connection failed on {} - {}", attempt.endpoint, attempt.reason);
    }
    eprintln!("✓ Connected to {}", bootstrapped.endpoint);
    eprintln!("✓ Table 'students' ready");
}

fn print_troubleshooting(error: &DbError) {
    if let DbError::Bootstrap { failed } = error {
        for attempt in failed {
            eprintln!("✗ Connection failed on {} - {}", attempt.endpoint, attempt.reason);
        }
    }
    eprintln!("\n{error}");
    eprintln!("\n=== TROUBLESHOOTING GUIDE ===");
    eprintln!("1. Make sure the MySQL server is running");
    eprintln!("2. Check the endpoints under [[database.candidates]] in config.toml,");
    eprintln!("   or pass one explicitly with --database-url");
    eprintln!("3. Verify the user name and password for the server");
    eprintln!("4. Create the database: CREATE DATABASE grades_dashboard;");
}
