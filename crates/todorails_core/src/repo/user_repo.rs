//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide find/save/delete APIs over the `users` table.
//!
//! # Invariants
//! - `users.username` and `users.email` are guarded by unique indexes.
//! - The repository stores `password` as given; hashing is a service concern.

use super::{RepoError, RepoResult};
use crate::db::migrations::ensure_schema_ready;
use crate::model::user::{User, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    email,
    password
FROM users";

/// Storage collaborator for user records.
pub trait UserRepository {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Returns every user ordered by id.
    fn find_all(&self) -> RepoResult<Vec<User>>;
    /// Inserts a new user or replaces an existing one by id.
    fn save(&self, user: &User) -> RepoResult<User>;
    fn delete(&self, user: &User) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }

    fn find_one(&self, filter: &str, value: &dyn rusqlite::ToSql) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE {filter} = ?1;"))?;
        let user = stmt.query_row([value], parse_user_row).optional()?;
        Ok(user)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        self.find_one("id", &id)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.find_one("username", &username)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_one("email", &email)
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let users = stmt
            .query_map([], parse_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn save(&self, user: &User) -> RepoResult<User> {
        user.validate()?;

        let Some(id) = user.id else {
            self.conn.execute(
                "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3);",
                params![
                    user.username.as_str(),
                    user.email.as_str(),
                    user.password.as_str()
                ],
            )?;
            return Ok(User {
                id: Some(self.conn.last_insert_rowid()),
                ..user.clone()
            });
        };

        let changed = self.conn.execute(
            "UPDATE users
             SET
                username = ?1,
                email = ?2,
                password = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                user.username.as_str(),
                user.email.as_str(),
                user.password.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(user.clone())
    }

    fn delete(&self, user: &User) -> RepoResult<()> {
        let id = user
            .id
            .ok_or_else(|| RepoError::InvalidData("cannot delete unsaved user".to_string()))?;

        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get("id")?),
        username: row.get("username")?,
        email: row.get("email")?,
        password: row.get("password")?,
    })
}
