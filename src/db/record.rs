//! Generic lookups shared by every entity: equality filters, full listings,
//! and row deletion. Column names come from per-entity enums so no caller
//! ever splices free text into SQL.

use rusqlite::{params, OptionalExtension, Row, ToSql};
use tracing::debug;

use crate::error::{Result, StoreContext};
use crate::models::Entity;

use super::RecordStore;

/// A column that may appear in a `WHERE column = ?` filter.
pub trait Column: Copy {
    fn name(self) -> &'static str;
}

/// A row type backed by one table.
pub trait Record: Sized {
    const ENTITY: Entity;
    /// Comma-separated select list matching [`Record::from_row`].
    const COLUMNS: &'static str;
    type Column: Column;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl RecordStore {
    /// Every row whose `column` equals `value`, ordered by id.
    pub fn find_by<R: Record>(&self, column: R::Column, value: impl ToSql) -> Result<Vec<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY id",
            R::COLUMNS,
            R::ENTITY.table(),
            column.name()
        );
        let mut stmt = self
            .conn()
            .prepare(&sql)
            .context("failed to prepare lookup query")?;

        let rows = stmt
            .query_map(params![value], R::from_row)
            .context("failed to run lookup query")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to collect lookup results")?;

        let entity = R::ENTITY;
        debug!(%entity, column = column.name(), matches = rows.len(), "find_by");
        Ok(rows)
    }

    /// Every row of one entity, ordered by id.
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", R::COLUMNS, R::ENTITY.table());
        let mut stmt = self
            .conn()
            .prepare(&sql)
            .context("failed to prepare listing query")?;

        let rows = stmt
            .query_map([], R::from_row)
            .context("failed to run listing query")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to collect listing")?;

        Ok(rows)
    }

    /// Fetch one row by id.
    pub fn get<R: Record>(&self, id: i64) -> Result<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            R::COLUMNS,
            R::ENTITY.table()
        );
        self.conn()
            .query_row(&sql, [id], R::from_row)
            .optional()
            .context("failed to load record")
    }

    /// Remove the row with `id`. Dependent rows are left untouched. Returns
    /// whether a row was actually removed; a missing id is not an error.
    pub fn delete<R: Record>(&self, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::ENTITY.table());
        let deleted = self
            .conn()
            .execute(&sql, [id])
            .context("failed to delete record")?;

        let entity = R::ENTITY;
        debug!(%entity, id, deleted, "delete");
        Ok(deleted > 0)
    }
}
