use chrono::NaiveDate;
use log::{debug, info, warn};
use rusqlite::{params, OptionalExtension, Row};

use crate::base::repository_traits::UserRepository;
use crate::data::database::DbPool;
use crate::error::{DbError, Result};
use crate::models::{Role, User, UserId};

const USER_COLUMNS: &str = "user_id, username, password, register_date, role_name";

/// SQLite-based user repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Maps a database row to a User
    fn map_row(row: &Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get("user_id")?,
            username: row.get("username")?,
            password: row.get("password")?,
            register_date: row.get("register_date")?,
            role: row.get("role_name")?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    fn create(&self, username: &str, password: &str, register_date: NaiveDate) -> Result<UserId> {
        self.create_with_role(username, password, register_date, Role::Regular)
    }

    fn create_with_role(
        &self,
        username: &str,
        password: &str,
        register_date: NaiveDate,
        role: Role,
    ) -> Result<UserId> {
        if username.trim().is_empty() {
            return Err(DbError::InvalidInput("username must not be empty".to_string()));
        }

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO users (username, password, register_date, role_name)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, password, register_date, role],
        )
        .map_err(|e| match DbError::from(e) {
            DbError::DuplicateKey(_) => {
                DbError::DuplicateKey(format!("username '{username}' is already taken"))
            }
            other => other,
        })?;

        let id = UserId(conn.last_insert_rowid());
        info!("Created {} user '{}' with id {}", role, username, id);
        Ok(id)
    }

    fn delete(&self, id: UserId) -> Result<()> {
        let conn = self.pool.get()?;
        let affected = conn.execute("DELETE FROM users WHERE user_id = ?1", params![id])?;
        if affected == 0 {
            return Err(DbError::not_found("User", id));
        }
        info!("Deleted user {}", id);
        Ok(())
    }

    fn exists(&self, id: UserId) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE user_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get(&self, id: UserId) -> Result<User> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"))?;
        stmt.query_row(params![id], Self::map_row)
            .optional()?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"))?;
        let user = stmt.query_row(params![username], Self::map_row).optional()?;
        Ok(user)
    }

    fn validate(&self, username: &str, password: &str) -> Result<Option<UserId>> {
        debug!("Validating credentials for '{}'", username);
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT user_id FROM users WHERE username = ?1 AND password = ?2")?;
        let ids = stmt
            .query_map(params![username, password], |row| row.get::<_, UserId>("user_id"))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        match ids.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            many => {
                warn!("{} accounts share the credentials of '{}'", many.len(), username);
                Err(DbError::IntegrityViolation(format!(
                    "{} users match username '{}'",
                    many.len(),
                    username
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::seeded_pool;

    fn repo() -> anyhow::Result<SqliteUserRepository> {
        Ok(SqliteUserRepository::new(seeded_pool()?))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_known_users() -> anyhow::Result<()> {
        let users = repo()?;

        let bob = users.validate("bob", "123")?;
        assert_eq!(bob, Some(UserId(1)));
        assert_eq!(users.validate("bob", "123")?, bob, "validation should be repeatable");
        assert_eq!(users.validate("rick", "123")?, Some(UserId(2)));
        Ok(())
    }

    #[test]
    fn test_validate_rejects_wrong_credentials() -> anyhow::Result<()> {
        let users = repo()?;

        assert_eq!(users.validate("bob", "wrong_password")?, None);
        assert_eq!(users.validate("nonexistent_user", "password")?, None);
        Ok(())
    }

    #[test]
    fn test_validate_flags_duplicate_accounts() -> anyhow::Result<()> {
        let pool = seeded_pool()?;
        {
            let conn = pool.get()?;
            conn.execute_batch(
                "DROP INDEX idx_users_username;
                 INSERT INTO users (username, password, register_date) VALUES ('bob', '123', '2022-01-01');",
            )?;
        }
        let users = SqliteUserRepository::new(pool);

        let result = users.validate("bob", "123");
        assert!(matches!(result, Err(DbError::IntegrityViolation(_))), "got {result:?}");
        Ok(())
    }

    #[test]
    fn test_get_user() -> anyhow::Result<()> {
        let users = repo()?;

        let bob = users.get(UserId(1))?;
        assert_eq!(bob.username, "bob");
        assert_eq!(bob.password, "123");
        assert_eq!(bob.role, Role::Regular);

        let rick = users.get(UserId(2))?;
        assert_eq!(rick.username, "rick");
        assert_eq!(rick.role, Role::Admin);

        assert!(users.get(UserId(-1)).unwrap_err().is_not_found());
        assert!(users.get(UserId(3)).unwrap_err().is_not_found());
        Ok(())
    }

    #[test]
    fn test_create_and_delete() -> anyhow::Result<()> {
        let users = repo()?;

        let id = users.create("carol", "s3cret", date(2023, 4, 10))?;
        assert!(users.exists(id)?);
        assert_eq!(users.validate("carol", "s3cret")?, Some(id));
        assert_eq!(users.get(id)?.register_date, date(2023, 4, 10));

        users.delete(id)?;
        assert!(!users.exists(id)?);
        assert!(users.delete(id).unwrap_err().is_not_found());
        Ok(())
    }

    #[test]
    fn test_create_rejects_duplicate_username() -> anyhow::Result<()> {
        let users = repo()?;

        let result = users.create("bob", "other", date(2023, 1, 1));
        assert!(matches!(result, Err(DbError::DuplicateKey(_))), "got {result:?}");
        Ok(())
    }

    #[test]
    fn test_create_rejects_blank_username() -> anyhow::Result<()> {
        let users = repo()?;

        assert!(matches!(
            users.create("  ", "pw", date(2023, 1, 1)),
            Err(DbError::InvalidInput(_))
        ));
        Ok(())
    }

    #[test]
    fn test_get_by_username() -> anyhow::Result<()> {
        let users = repo()?;

        let admin_id = users.create_with_role("ada", "pw", date(2023, 2, 2), Role::Admin)?;
        let ada = users.get_by_username("ada")?.expect("ada should exist");
        assert_eq!(ada.id, admin_id);
        assert_eq!(ada.role, Role::Admin);
        assert!(users.get_by_username("nobody")?.is_none());
        Ok(())
    }
}
