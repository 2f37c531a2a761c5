//! Resolves the article ↔ tag ↔ category associations.
//!
//! Every function borrows the caller's connection so a listing can resolve its rows
//! without checking out a second connection from the pool.

use log::debug;
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{Article, ArticleId};

/// Distinct tag names on one article, ordered by name
pub fn tag_names_for(conn: &Connection, article_id: ArticleId) -> Result<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT t.tag_name AS tag_name
         FROM tags t
         JOIN article_tags at ON t.tag_id = at.tag_id
         WHERE at.article_id = ?1
         GROUP BY t.tag_name
         ORDER BY t.tag_name",
    )?;

    let names = stmt
        .query_map(params![article_id], |row| row.get::<_, String>("tag_name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// Categories of an article, derived through its tags; empty for an untagged article
pub fn category_names_for(conn: &Connection, article_id: ArticleId) -> Result<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT DISTINCT c.cat_name AS cat_name
         FROM categories c
         JOIN tags t ON t.cat_name = c.cat_name
         JOIN article_tags at ON at.tag_id = t.tag_id
         WHERE at.article_id = ?1
         ORDER BY c.cat_name",
    )?;

    let names = stmt
        .query_map(params![article_id], |row| row.get::<_, String>("cat_name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// Fills in `tags` on one article
pub fn with_tags(conn: &Connection, mut article: Article) -> Result<Article> {
    article.tags = tag_names_for(conn, article.id)?;
    Ok(article)
}

/// Resolves tags one row at a time
pub fn attach_tags(conn: &Connection, articles: Vec<Article>) -> Result<Vec<Article>> {
    debug!("Resolving tags for {} articles", articles.len());
    articles
        .into_iter()
        .map(|article| with_tags(conn, article))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::seeded_pool;

    #[test]
    fn test_tag_names_are_deduplicated_and_sorted() -> anyhow::Result<()> {
        let pool = seeded_pool()?;
        let conn = pool.get()?;

        assert_eq!(tag_names_for(&conn, ArticleId(3))?, vec!["ai", "gadgets"]);
        assert_eq!(tag_names_for(&conn, ArticleId(1))?, vec!["world leaders"]);
        assert!(tag_names_for(&conn, ArticleId(5))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_categories_are_derived_through_tags() -> anyhow::Result<()> {
        let pool = seeded_pool()?;
        let conn = pool.get()?;

        // Two technology tags still yield one category
        assert_eq!(category_names_for(&conn, ArticleId(3))?, vec!["technology"]);
        assert_eq!(category_names_for(&conn, ArticleId(4))?, vec!["politics"]);
        // Untagged article belongs to no category
        assert!(category_names_for(&conn, ArticleId(5))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_article_has_no_tags() -> anyhow::Result<()> {
        let pool = seeded_pool()?;
        let conn = pool.get()?;

        assert!(tag_names_for(&conn, ArticleId(999))?.is_empty());
        Ok(())
    }
}
