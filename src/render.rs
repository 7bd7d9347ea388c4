//! Table rendering for records and the analytics dashboard.

use analytics::{GradeReport, TierCounts};
use comfy_table::{Cell, CellAlignment, Table};
use core_types::{StudentRecord, TIMESTAMP_FORMAT};
use std::io::{self, Write};

const RECORD_HEADER: [&str; 9] = [
    "ID",
    "Name",
    "Section",
    "Math",
    "Science",
    "English",
    "Average",
    "Remarks",
    "Created At",
];

fn grade_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.1}")).set_alignment(CellAlignment::Right)
}

/// One row per record, scores to one decimal place.
pub fn records_table(records: &[StudentRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(RECORD_HEADER);
    for record in records {
        table.add_row(vec![
            Cell::new(record.id).set_alignment(CellAlignment::Right),
            Cell::new(&record.name),
            Cell::new(&record.section),
            grade_cell(record.math),
            grade_cell(record.science),
            grade_cell(record.english),
            grade_cell(record.average),
            Cell::new(record.remarks),
            Cell::new(record.created_at.format(TIMESTAMP_FORMAT)),
        ]);
    }
    table
}

/// Writes the records as a table, or `empty_message` when there are none.
pub fn write_records<W: Write>(
    out: &mut W,
    records: &[StudentRecord],
    empty_message: &str,
) -> io::Result<()> {
    if records.is_empty() {
        writeln!(out, "{empty_message}")
    } else {
        writeln!(out, "{}", records_table(records))
    }
}

/// A single record as a label/value listing, shown before update and delete.
pub fn write_record_details<W: Write>(out: &mut W, record: &StudentRecord) -> io::Result<()> {
    writeln!(out, "ID: {}", record.id)?;
    writeln!(out, "Name: {}", record.name)?;
    writeln!(out, "Section: {}", record.section)?;
    writeln!(out, "Math: {:.1}", record.math)?;
    writeln!(out, "Science: {:.1}", record.science)?;
    writeln!(out, "English: {:.1}", record.english)?;
    writeln!(out, "Average: {:.1}", record.average)?;
    writeln!(out, "Remarks: {}", record.remarks)
}

/// Highest / lowest / mean per subject plus the overall row.
pub fn report_table(report: &GradeReport) -> Table {
    let mut table = Table::new();
    table.set_header(["Subject", "Highest", "Lowest", "Average", "Students"]);
    let overall = ("Overall", &report.overall);
    for (label, stats) in report.subjects().into_iter().chain(std::iter::once(overall)) {
        table.add_row(vec![
            Cell::new(label),
            grade_cell(stats.highest),
            grade_cell(stats.lowest),
            grade_cell(stats.mean),
            Cell::new(stats.count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn write_distribution<W: Write>(out: &mut W, counts: &TierCounts) -> io::Result<()> {
    writeln!(out, "\n--- Performance Distribution ---")?;
    writeln!(out, "Excellent (90+): {} students", counts.excellent)?;
    writeln!(out, "Good (75-89): {} students", counts.good)?;
    writeln!(out, "Needs Improvement (<75): {} students", counts.needs_improvement)
}

/// The full analytics dashboard.
pub fn write_report<W: Write>(out: &mut W, report: &GradeReport) -> io::Result<()> {
    writeln!(out, "\n=== GRADE ANALYTICS DASHBOARD ===")?;
    if report.is_empty() {
        return writeln!(out, "No student data available for analytics.");
    }
    writeln!(out, "{}", report_table(report))?;
    write_distribution(out, &report.distribution)
}
