use rusqlite::{params, OptionalExtension, Row};

use crate::base::repository_traits::CategoryRepository;
use crate::data::database::DbPool;
use crate::error::{DbError, Result};
use crate::models::Category;

pub struct SqliteCategoryRepository {
    pool: DbPool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &Row) -> rusqlite::Result<Category> {
        Ok(Category {
            name: row.get("cat_name")?,
            description: row.get("description")?,
        })
    }
}

// cat_name is declared COLLATE NOCASE, so equality below ignores case
impl CategoryRepository for SqliteCategoryRepository {
    fn exists(&self, name: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE cat_name = ?1",
            params![name.trim()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get(&self, name: &str) -> Result<Category> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT cat_name, description FROM categories WHERE cat_name = ?1")?;
        stmt.query_row(params![name.trim()], Self::map_row)
            .optional()?
            .ok_or_else(|| DbError::not_found("Category", name))
    }

    fn list_all(&self) -> Result<Vec<Category>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT cat_name, description FROM categories ORDER BY cat_name ASC")?;

        let categories = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }
}
