use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, StoreContext, StoreError};

/// Table definitions in creation order. Foreign keys are declared for
/// documentation but not enforced, so deleting a parent leaves its children
/// pointing at a missing row.
const SCHEMA: &[(&str, &str)] = &[
    (
        "failed to create students table",
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            surname TEXT NOT NULL,
            department TEXT NOT NULL,
            date_of_birth DATE NOT NULL
        )",
    ),
    (
        "failed to create teachers table",
        "CREATE TABLE IF NOT EXISTS teachers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            surname TEXT NOT NULL,
            department TEXT NOT NULL
        )",
    ),
    (
        "failed to create courses table",
        "CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            teacher_id INTEGER,
            FOREIGN KEY(teacher_id) REFERENCES teachers(id)
        )",
    ),
    (
        "failed to create exams table",
        "CREATE TABLE IF NOT EXISTS exams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date_of_exam DATE NOT NULL,
            course_id INTEGER,
            max_score INTEGER,
            FOREIGN KEY(course_id) REFERENCES courses(id)
        )",
    ),
    (
        "failed to create grades table",
        "CREATE TABLE IF NOT EXISTS grades (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER,
            exam_id INTEGER,
            score INTEGER NOT NULL,
            FOREIGN KEY(student_id) REFERENCES students(id),
            FOREIGN KEY(exam_id) REFERENCES exams(id)
        )",
    ),
];

/// Drop order for [`RecordStore::reset_all`]: children before parents.
const DROP_TABLES: &str = "
    DROP TABLE IF EXISTS grades;
    DROP TABLE IF EXISTS exams;
    DROP TABLE IF EXISTS courses;
    DROP TABLE IF EXISTS teachers;
    DROP TABLE IF EXISTS students;
";

/// Owner of the single SQLite connection used for the whole session. Every
/// store operation runs as its own autocommitted statement.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open (or create) the database file at `path`, creating the parent
    /// directory and any missing tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                context: "failed to create data directory",
                source,
            })?;
        }

        let conn = Connection::open(path).context("failed to open SQLite database")?;
        let store = Self::from_connection(conn)?;
        info!(path = %path.display(), "opened record store");
        Ok(store)
    }

    /// Fresh private database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = OFF", [])
            .context("failed to configure foreign keys")?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        for &(context, sql) in SCHEMA {
            self.conn.execute(sql, []).context(context)?;
        }
        debug!("schema ready");
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Drop every table and recreate the empty schema. Identifier sequences
    /// restart as well.
    pub fn reset_all(&self) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("failed to begin reset")?;
        tx.execute_batch(DROP_TABLES)
            .context("failed to drop tables")?;
        for &(context, sql) in SCHEMA {
            tx.execute(sql, []).context(context)?;
        }
        tx.commit().context("failed to commit reset")?;
        info!("record store reset");
        Ok(())
    }

    /// Release the connection, surfacing any error SQLite reports while
    /// closing.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("failed to close database")?;
        info!("record store closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(store: &RecordStore) -> i64 {
        store
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('students', 'teachers', 'courses', 'exams', 'grades')",
                [],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn open_creates_every_table() {
        let store = RecordStore::open_in_memory().unwrap();
        assert_eq!(table_count(&store), 5);
    }

    #[test]
    fn reset_recreates_schema() {
        let store = RecordStore::open_in_memory().unwrap();
        store
            .conn()
            .execute("INSERT INTO teachers (name, surname, department) VALUES ('a', 'b', 'c')", [])
            .unwrap();
        store.reset_all().unwrap();
        assert_eq!(table_count(&store), 5);
        let rows: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM teachers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("university.sqlite");
        let store = RecordStore::open(&path).unwrap();
        store.close().unwrap();
        assert!(path.exists());
    }
}
