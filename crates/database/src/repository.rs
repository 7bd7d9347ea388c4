use crate::DbError;
use chrono::{Local, NaiveDateTime, SubsecRound};
use core_types::validation::validate_name;
use core_types::{
    GradeColumns, NewStudent, Scores, StudentRecord, StudentUpdate, Tier, DEFAULT_SECTION,
    TIMESTAMP_FORMAT,
};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::AnyConnection;
use sqlx::query::Query;
use sqlx::{Any, Connection, Row};

// The `Any` driver cannot decode DATETIME columns, so timestamps are read back as text.
const SELECT_STUDENT: &str = r#"
    SELECT id, name, section, math, science, english, average, remarks,
           CAST(created_at AS CHAR) AS created_at,
           CAST(updated_at AS CHAR) AS updated_at
    FROM students
"#;

const INSERT_STUDENT: &str = r#"
    INSERT INTO students (name, section, math, science, english, average, remarks, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Result of `StudentRepository::update`.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The record as it is now stored.
    Updated(StudentRecord),
    NotFound,
}

/// Result of `StudentRepository::delete`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The record that was removed.
    Deleted(StudentRecord),
    /// The operator did not confirm; the row is untouched.
    Cancelled,
    NotFound,
}

/// The `StudentRepository` provides a high-level, application-specific interface
/// to the `students` table. It encapsulates all SQL queries and data access logic.
///
/// Lookups by exact name resolve duplicates to the row with the lowest id, and
/// `update` / `delete` act on that row only.
pub struct StudentRepository {
    connection: AnyConnection,
}

impl StudentRepository {
    pub fn new(connection: AnyConnection) -> Self {
        Self { connection }
    }

    /// The sqlx backend behind the connection, e.g. `MySQL` or `SQLite`.
    pub fn backend_name(&self) -> &str {
        self.connection.backend_name()
    }

    /// Inserts a new student. `average`, `remarks` and both timestamps are
    /// computed here; the id is assigned by the database.
    pub async fn create(&mut self, student: NewStudent) -> Result<StudentRecord, DbError> {
        validate_name(&student.name)?;
        let section = if student.section.trim().is_empty() {
            DEFAULT_SECTION.to_string()
        } else {
            student.section
        };
        let scores = student.scores;
        let now = now();
        let returning = self.connection.backend_name() == "SQLite";

        // The id is read inside the transaction, so a failure leaves no row behind.
        let mut tx = self.connection.begin().await?;
        let id: i64 = if returning {
            bind_new_student(
                sqlx::query(&format!("{INSERT_STUDENT} RETURNING id")),
                &student.name,
                &section,
                &scores,
                &now,
            )
            .fetch_one(&mut *tx)
            .await?
            .try_get::<i64, _>("id")?
        } else {
            bind_new_student(sqlx::query(INSERT_STUDENT), &student.name, &section, &scores, &now)
                .execute(&mut *tx)
                .await?
                .last_insert_id()
                .ok_or_else(|| {
                    DbError::Decode("the backend did not report the new row id".to_string())
                })?
        };
        tx.commit().await?;

        tracing::info!(id, name = %student.name, "Student added.");
        Ok(StudentRecord {
            id,
            name: student.name,
            section,
            math: scores.math(),
            science: scores.science(),
            english: scores.english(),
            average: scores.average(),
            remarks: scores.remarks(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Every stored record, ordered by id.
    pub async fn list_all(&mut self) -> Result<Vec<StudentRecord>, DbError> {
        let rows = sqlx::query(&format!("{SELECT_STUDENT} ORDER BY id"))
            .fetch_all(&mut self.connection)
            .await?;
        rows.iter().map(map_student).collect()
    }

    /// Case-insensitive substring search on the name, ordered by name.
    ///
    /// The query itself must be a valid name, which also keeps `LIKE`
    /// wildcards out of it.
    pub async fn find_by_name_substring(
        &mut self,
        query: &str,
    ) -> Result<Vec<StudentRecord>, DbError> {
        validate_name(query)?;
        let pattern = format!("%{}%", query.to_lowercase());
        let rows = sqlx::query(&format!(
            "{SELECT_STUDENT} WHERE LOWER(name) LIKE ? ORDER BY LOWER(name), id"
        ))
        .bind(pattern)
        .fetch_all(&mut self.connection)
        .await?;
        rows.iter().map(map_student).collect()
    }

    /// Case-insensitive exact match on the section, ordered by name. Both sides
    /// are folded by the database's `LOWER`, so stored text always matches itself.
    pub async fn find_by_section(&mut self, section: &str) -> Result<Vec<StudentRecord>, DbError> {
        let rows = sqlx::query(&format!(
            "{SELECT_STUDENT} WHERE LOWER(section) = LOWER(?) ORDER BY LOWER(name), id"
        ))
        .bind(section)
        .fetch_all(&mut self.connection)
        .await?;
        rows.iter().map(map_student).collect()
    }

    /// Case-insensitive exact match on the name. When several students share
    /// the name, the one stored first (lowest id) is returned.
    pub async fn find_exact_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<StudentRecord>, DbError> {
        let row = sqlx::query(&format!(
            "{SELECT_STUDENT} WHERE LOWER(name) = LOWER(?) ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&mut self.connection)
        .await?;
        row.as_ref().map(map_student).transpose()
    }

    /// Overwrites the student found by `find_exact_by_name(name)`.
    ///
    /// `None` in the update keeps the stored name / section. The grades are
    /// always replaced and `average`, `remarks` and `updated_at` recomputed;
    /// `created_at` never changes.
    pub async fn update(
        &mut self,
        name: &str,
        update: StudentUpdate,
    ) -> Result<UpdateOutcome, DbError> {
        if let Some(new_name) = &update.name {
            validate_name(new_name)?;
        }
        let Some(existing) = self.find_exact_by_name(name).await? else {
            tracing::debug!(%name, "Update target not found.");
            return Ok(UpdateOutcome::NotFound);
        };

        let scores = update.scores;
        let record = StudentRecord {
            id: existing.id,
            name: update.name.unwrap_or(existing.name),
            section: update.section.unwrap_or(existing.section),
            math: scores.math(),
            science: scores.science(),
            english: scores.english(),
            average: scores.average(),
            remarks: scores.remarks(),
            created_at: existing.created_at,
            updated_at: now(),
        };

        sqlx::query(
            r#"
            UPDATE students
            SET name = ?, section = ?, math = ?, science = ?, english = ?, average = ?, remarks = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(record.name.as_str())
        .bind(record.section.as_str())
        .bind(record.math)
        .bind(record.science)
        .bind(record.english)
        .bind(record.average)
        .bind(record.remarks.label())
        .bind(format_timestamp(&record.updated_at))
        .bind(record.id)
        .execute(&mut self.connection)
        .await?;

        tracing::info!(id = record.id, name = %record.name, "Student updated.");
        Ok(UpdateOutcome::Updated(record))
    }

    /// Removes the student found by `find_exact_by_name(name)`, but only when
    /// the operator `confirmed` it.
    pub async fn delete(&mut self, name: &str, confirmed: bool) -> Result<DeleteOutcome, DbError> {
        let Some(existing) = self.find_exact_by_name(name).await? else {
            return Ok(DeleteOutcome::NotFound);
        };
        if !confirmed {
            tracing::debug!(id = existing.id, "Delete cancelled by operator.");
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(existing.id)
            .execute(&mut self.connection)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(DeleteOutcome::NotFound);
        }
        tracing::info!(id = existing.id, name = %existing.name, "Student deleted.");
        Ok(DeleteOutcome::Deleted(existing))
    }

    /// Scans the numeric columns of every stored record for the analytics
    /// dashboard. Nothing is cached; each call reads the table afresh.
    pub async fn grade_columns(&mut self) -> Result<GradeColumns, DbError> {
        let rows = sqlx::query("SELECT math, science, english, average FROM students ORDER BY id")
            .fetch_all(&mut self.connection)
            .await?;

        let mut columns = GradeColumns::default();
        for row in &rows {
            columns.push(
                row.try_get("math")?,
                row.try_get("science")?,
                row.try_get("english")?,
                row.try_get("average")?,
            );
        }
        Ok(columns)
    }

    /// Closes the connection cleanly.
    pub async fn close(self) -> Result<(), DbError> {
        self.connection.close().await?;
        tracing::info!("Database connection closed.");
        Ok(())
    }
}

/// The current local time at the precision of a DATETIME column.
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

fn bind_new_student<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    name: &str,
    section: &str,
    scores: &Scores,
    stamp: &NaiveDateTime,
) -> Query<'q, Any, AnyArguments<'q>> {
    query
        .bind(name.to_string())
        .bind(section.to_string())
        .bind(scores.math())
        .bind(scores.science())
        .bind(scores.english())
        .bind(scores.average())
        .bind(scores.remarks().label())
        .bind(format_timestamp(stamp))
        .bind(format_timestamp(stamp))
}

fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(column: &str, value: Option<String>) -> Result<NaiveDateTime, DbError> {
    let value = value.ok_or_else(|| DbError::Decode(format!("{column} is NULL")))?;
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| DbError::Decode(format!("{column} '{value}': {e}")))
}

fn map_student(row: &AnyRow) -> Result<StudentRecord, DbError> {
    let average: f64 = row.try_get("average")?;
    let remarks = match row.try_get::<Option<String>, _>("remarks")? {
        Some(label) => label
            .parse::<Tier>()
            .map_err(|e| DbError::Decode(e.to_string()))?,
        None => Tier::from_average(average),
    };
    let section = row
        .try_get::<Option<String>, _>("section")?
        .unwrap_or_else(|| DEFAULT_SECTION.to_string());

    Ok(StudentRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        section,
        math: row.try_get("math")?,
        science: row.try_get("science")?,
        english: row.try_get("english")?,
        average,
        remarks,
        created_at: parse_timestamp("created_at", row.try_get("created_at")?)?,
        updated_at: parse_timestamp("updated_at", row.try_get("updated_at")?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect_url;
    use std::time::Duration;

    async fn repository() -> StudentRepository {
        StudentRepository::new(connect_url("sqlite::memory:").await.unwrap())
    }

    fn student(name: &str, section: &str, m: f64, s: f64, e: f64) -> NewStudent {
        NewStudent::new(name, section, Scores::new(m, s, e).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_ids_and_derived_fields() {
        let mut repo = repository().await;

        let ana = repo.create(student("Ana", "A", 95.0, 92.0, 91.0)).await.unwrap();
        let bo = repo.create(student("Bo", "", 70.0, 60.0, 65.0)).await.unwrap();

        assert!(bo.id > ana.id);
        assert!((ana.average - 278.0 / 3.0).abs() < 1e-9);
        assert_eq!(ana.remarks, Tier::Excellent);
        assert_eq!(ana.created_at, ana.updated_at);
        assert_eq!(bo.section, DEFAULT_SECTION);
        assert_eq!(bo.remarks, Tier::NeedsImprovement);
    }

    #[tokio::test]
    async fn create_rejects_an_invalid_name_without_inserting() {
        let mut repo = repository().await;
        let mut bad = student("Ana", "A", 50.0, 50.0, 50.0);
        bad.name = "Ana2".to_string();

        assert!(matches!(repo.create(bad).await, Err(DbError::Validation(_))));
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_returns_the_row_it_stored() {
        let mut repo = repository().await;

        let ana = repo.create(student("Ana", "A", 95.0, 92.0, 91.0)).await.unwrap();

        assert!(ana.id > 0);
        assert_eq!(repo.list_all().await.unwrap(), vec![ana.clone()]);
        assert_eq!(repo.find_exact_by_name("Ana").await.unwrap(), Some(ana));
    }

    #[tokio::test]
    async fn list_all_is_ordered_by_id_and_round_trips() {
        let mut repo = repository().await;
        assert!(repo.list_all().await.unwrap().is_empty());

        let zed = repo.create(student("Zed", "B", 80.0, 80.0, 80.0)).await.unwrap();
        let amy = repo.create(student("Amy", "B", 90.0, 90.0, 90.0)).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all, vec![zed, amy]);
    }

    #[tokio::test]
    async fn name_search_is_case_insensitive_substring_ordered_by_name() {
        let mut repo = repository().await;
        repo.create(student("Maria Lopez", "A", 80.0, 80.0, 80.0)).await.unwrap();
        repo.create(student("Amaro", "B", 80.0, 80.0, 80.0)).await.unwrap();
        repo.create(student("Bo", "B", 80.0, 80.0, 80.0)).await.unwrap();

        let found = repo.find_by_name_substring("MAR").await.unwrap();
        let names: Vec<_> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Amaro", "Maria Lopez"]);

        assert!(repo.find_by_name_substring("xyz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn name_search_validates_the_query() {
        let mut repo = repository().await;
        assert!(matches!(
            repo.find_by_name_substring("%").await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            repo.find_by_name_substring("").await,
            Err(DbError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn section_search_is_exact_and_case_insensitive() {
        let mut repo = repository().await;
        repo.create(student("Cy", "10-A", 80.0, 80.0, 80.0)).await.unwrap();
        repo.create(student("Al", "10-a", 80.0, 80.0, 80.0)).await.unwrap();
        repo.create(student("Di", "10-AB", 80.0, 80.0, 80.0)).await.unwrap();

        let found = repo.find_by_section("10-A").await.unwrap();
        let names: Vec<_> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Al", "Cy"]);
    }

    #[tokio::test]
    async fn section_search_matches_non_ascii_text() {
        let mut repo = repository().await;
        let stored = repo.create(student("Eva", "Ärzte", 80.0, 80.0, 80.0)).await.unwrap();

        assert_eq!(repo.find_by_section("Ärzte").await.unwrap(), vec![stored.clone()]);
        assert_eq!(repo.find_by_section("ÄRZTE").await.unwrap(), vec![stored]);
        assert!(repo.find_by_section("Arzte").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_names_resolve_to_the_first_stored() {
        let mut repo = repository().await;
        let first = repo.create(student("Sam", "A", 60.0, 60.0, 60.0)).await.unwrap();
        let second = repo.create(student("sam", "B", 99.0, 99.0, 99.0)).await.unwrap();

        let found = repo.find_exact_by_name("SAM").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);

        let outcome = repo.delete("Sam", true).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted(first));

        let remaining = repo.list_all().await.unwrap();
        assert_eq!(remaining, vec![second]);
    }

    #[tokio::test]
    async fn update_with_blank_fields_keeps_name_and_section() {
        let mut repo = repository().await;
        let created = repo.create(student("Ana", "A", 95.0, 92.0, 91.0)).await.unwrap();

        let scores = Scores::new(70.0, 80.0, 75.0).unwrap();
        let outcome = repo
            .update("ana", StudentUpdate::from_input("", "", scores))
            .await
            .unwrap();

        let UpdateOutcome::Updated(updated) = outcome else {
            panic!("expected the record to be updated");
        };
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.section, "A");
        assert!((updated.average - 75.0).abs() < 1e-9);
        assert_eq!(updated.remarks, Tier::Good);
        assert_eq!(updated.created_at, created.created_at);

        let stored = repo.find_exact_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_only() {
        let mut repo = repository().await;
        let created = repo.create(student("Ana", "A", 95.0, 92.0, 91.0)).await.unwrap();

        // Timestamps have whole-second precision.
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let scores = Scores::new(95.0, 92.0, 91.0).unwrap();
        repo.update("Ana", StudentUpdate::from_input("", "", scores))
            .await
            .unwrap();

        let stored = repo.find_exact_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(stored.created_at, created.created_at);
        assert!(stored.updated_at > created.created_at);
    }

    #[tokio::test]
    async fn update_replaces_name_and_section_when_given() {
        let mut repo = repository().await;
        repo.create(student("Ana", "A", 95.0, 92.0, 91.0)).await.unwrap();

        let scores = Scores::new(95.0, 92.0, 91.0).unwrap();
        repo.update("Ana", StudentUpdate::from_input("Ana Maria", "C", scores))
            .await
            .unwrap();

        assert!(repo.find_exact_by_name("Ana").await.unwrap().is_none());
        let renamed = repo.find_exact_by_name("ana maria").await.unwrap().unwrap();
        assert_eq!(renamed.section, "C");
    }

    #[tokio::test]
    async fn update_reports_missing_students_and_bad_names() {
        let mut repo = repository().await;
        let scores = Scores::new(50.0, 50.0, 50.0).unwrap();

        let outcome = repo
            .update("Nobody", StudentUpdate::from_input("", "", scores))
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);

        repo.create(student("Ana", "A", 50.0, 50.0, 50.0)).await.unwrap();
        let result = repo
            .update("Ana", StudentUpdate::from_input("Ana 2", "", scores))
            .await;
        assert!(matches!(result, Err(DbError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let mut repo = repository().await;
        repo.create(student("Ana", "A", 95.0, 92.0, 91.0)).await.unwrap();

        assert_eq!(repo.delete("Ana", false).await.unwrap(), DeleteOutcome::Cancelled);
        assert!(repo.find_exact_by_name("Ana").await.unwrap().is_some());

        assert!(matches!(
            repo.delete("ANA", true).await.unwrap(),
            DeleteOutcome::Deleted(_)
        ));
        assert!(repo.find_exact_by_name("Ana").await.unwrap().is_none());
        assert_eq!(repo.delete("Ana", true).await.unwrap(), DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let mut repo = repository().await;
        let first = repo.create(student("Ana", "A", 50.0, 50.0, 50.0)).await.unwrap();
        repo.delete("Ana", true).await.unwrap();
        let second = repo.create(student("Ana", "A", 50.0, 50.0, 50.0)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn grade_columns_scan_every_record() {
        let mut repo = repository().await;
        assert!(repo.grade_columns().await.unwrap().is_empty());

        repo.create(student("Ana", "A", 95.0, 92.0, 91.0)).await.unwrap();
        repo.create(student("Bo", "B", 70.0, 60.0, 65.0)).await.unwrap();

        let columns = repo.grade_columns().await.unwrap();
        assert_eq!(columns.math, vec![95.0, 70.0]);
        assert_eq!(columns.science, vec![92.0, 60.0]);
        assert_eq!(columns.english, vec![91.0, 65.0]);
        assert_eq!(columns.len(), 2);
        assert!((columns.averages[1] - 65.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn close_releases_the_connection() {
        let repo = repository().await;
        assert_eq!(repo.backend_name(), "SQLite");
        repo.close().await.unwrap();
    }
}
