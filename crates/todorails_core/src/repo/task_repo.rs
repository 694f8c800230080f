//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide find/save/delete APIs over the `tasks` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save` inserts when `id` is `None` and returns the storage-assigned id.
//! - `tasks.title` is guarded by a unique index.
//! - Read paths reject invalid persisted state instead of masking it.

use super::{bool_to_int, RepoError, RepoResult};
use crate::db::migrations::ensure_schema_ready;
use crate::model::task::{Task, TaskId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed,
    due_date
FROM tasks";

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage collaborator for task records.
pub trait TaskRepository {
    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn find_by_title(&self, title: &str) -> RepoResult<Option<Task>>;
    /// Returns every task ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Task>>;
    /// Inserts a new task or replaces an existing one by id.
    fn save(&self, task: &Task) -> RepoResult<Task>;
    fn delete(&self, task: &Task) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }

    fn find_one(&self, filter: &str, value: &dyn rusqlite::ToSql) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE {filter} = ?1;"))?;
        let row = stmt
            .query_row([value], |row| Ok(parse_task_row(row)))
            .optional()?;
        row.transpose()
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.find_one("id", &id)
    }

    fn find_by_title(&self, title: &str) -> RepoResult<Option<Task>> {
        self.find_one("title", &title)
    }

    fn find_all(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn save(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;
        let due_date = task.due_date.format(DUE_DATE_FORMAT).to_string();

        let Some(id) = task.id else {
            self.conn.execute(
                "INSERT INTO tasks (title, description, completed, due_date)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    task.title.as_str(),
                    task.description.as_str(),
                    bool_to_int(task.completed),
                    due_date,
                ],
            )?;
            return Ok(Task {
                id: Some(self.conn.last_insert_rowid()),
                ..task.clone()
            });
        };

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                completed = ?3,
                due_date = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                bool_to_int(task.completed),
                due_date,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(task.clone())
    }

    fn delete(&self, task: &Task) -> RepoResult<()> {
        let id = task
            .id
            .ok_or_else(|| RepoError::InvalidData("cannot delete unsaved task".to_string()))?;

        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    let due_text: String = row.get("due_date")?;
    let due_date = NaiveDate::parse_from_str(&due_text, DUE_DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{due_text}` in tasks.due_date"))
    })?;

    let task = Task {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        description: row.get("description")?,
        completed,
        due_date,
    };
    task.validate()?;
    Ok(task)
}
