use rusqlite::{params, OptionalExtension, Row};

use crate::base::repository_traits::TagRepository;
use crate::data::database::DbPool;
use crate::error::{DbError, Result};
use crate::models::{Tag, TagId};

/// SQLite implementation of the TagRepository trait
pub struct SqliteTagRepository {
    pool: DbPool,
}

impl SqliteTagRepository {
    /// Creates a new SQLite tag repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Maps a database row to a Tag
    fn map_row(row: &Row) -> rusqlite::Result<Tag> {
        Ok(Tag {
            id: row.get("tag_id")?,
            name: row.get("tag_name")?,
            category_name: row.get("cat_name")?,
        })
    }
}

impl TagRepository for SqliteTagRepository {
    fn exists(&self, id: TagId) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tags WHERE tag_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get(&self, id: TagId) -> Result<Tag> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT tag_id, tag_name, cat_name FROM tags WHERE tag_id = ?1")?;
        stmt.query_row(params![id], Self::map_row)
            .optional()?
            .ok_or_else(|| DbError::not_found("Tag", id))
    }

    fn list_all(&self) -> Result<Vec<Tag>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT tag_id, tag_name, cat_name
             FROM tags
             ORDER BY tag_name ASC",
        )?;

        let tags = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }

    fn list_by_category(&self, category: &str) -> Result<Vec<Tag>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT tag_id, tag_name, cat_name
             FROM tags
             WHERE cat_name = ?1
             ORDER BY tag_name ASC",
        )?;

        let tags = stmt
            .query_map(params![category.trim()], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::seeded_pool;

    #[test]
    fn test_get_tag() -> anyhow::Result<()> {
        let tags = SqliteTagRepository::new(seeded_pool()?);

        let tag = tags.get(TagId(1))?;
        assert_eq!(tag.name, "world leaders");
        assert_eq!(tag.category_name, "politics");

        assert!(tags.exists(TagId(5))?);
        assert!(!tags.exists(TagId(6))?);
        assert!(tags.get(TagId(6)).unwrap_err().is_not_found());
        Ok(())
    }

    #[test]
    fn test_list_tags() -> anyhow::Result<()> {
        let tags = SqliteTagRepository::new(seeded_pool()?);

        let names: Vec<String> = tags.list_all()?.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["ai", "elections", "football", "gadgets", "world leaders"]);

        let tech: Vec<TagId> = tags
            .list_by_category("TECHNOLOGY")?
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(tech, vec![TagId(4), TagId(5)]);
        assert!(tags.list_by_category("science")?.is_empty());
        Ok(())
    }
}
