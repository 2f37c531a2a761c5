use log::{debug, info};
use rusqlite::{params, OptionalExtension, Params, Row, TransactionBehavior};

use crate::base::repository_traits::ArticleRepository;
use crate::data::database::DbPool;
use crate::data::repositories::relationship;
use crate::error::{DbError, Result};
use crate::models::{Article, ArticleId, Comment, CommentId, NewArticle, SortBy, TagId, UserId};
use crate::utils::{current_timestamp, format_datetime};

const ARTICLE_COLUMNS: &str = "a.article_id AS article_id, a.title AS title, a.author AS author,
     a.publish_date AS publish_date, a.content AS content";

/// SQLite-based article repository implementation
pub struct SqliteArticleRepository {
    pool: DbPool,
}

impl SqliteArticleRepository {
    /// Creates a new SQLite article repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Maps a database row to an Article; tags are resolved separately
    fn map_row(row: &Row) -> rusqlite::Result<Article> {
        Ok(Article {
            id: row.get("article_id")?,
            title: row.get("title")?,
            author: row.get("author")?,
            publish_date: row.get("publish_date")?,
            content: row.get("content")?,
            tags: Vec::new(),
        })
    }

    fn map_comment(row: &Row) -> rusqlite::Result<Comment> {
        Ok(Comment {
            id: row.get("comment_id")?,
            article_id: row.get("article_id")?,
            user_id: row.get("user_id")?,
            comment_date: row.get("comment_date")?,
            content: row.get("content")?,
            username: row.get("username")?,
        })
    }

    /// Runs an article listing and resolves the tags of every row on the same connection
    fn query_articles<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Article>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let articles = stmt
            .query_map(params, Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!("Article query returned {} rows", articles.len());
        relationship::attach_tags(&conn, articles)
    }

    fn listing_sql(filter: &str, sort_by: SortBy) -> String {
        format!(
            "SELECT {ARTICLE_COLUMNS}
             FROM articles a
             {filter}
             ORDER BY {} ASC, a.article_id ASC",
            sort_by.column()
        )
    }
}

/// Escapes LIKE wildcards so the query matches literally
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

impl ArticleRepository for SqliteArticleRepository {
    fn create(&self, article: &NewArticle) -> Result<ArticleId> {
        if article.title.trim().is_empty() {
            return Err(DbError::InvalidInput("article title must not be empty".to_string()));
        }

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO articles (title, author, publish_date, content) VALUES (?1, ?2, ?3, ?4)",
            params![article.title, article.author, article.publish_date, article.content],
        )?;

        let id = ArticleId(conn.last_insert_rowid());
        info!("Created article {} '{}'", id, article.title);
        Ok(id)
    }

    fn attach_tag(&self, article_id: ArticleId, tag_id: TagId) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO article_tags (article_id, tag_id) VALUES (?1, ?2)",
            params![article_id, tag_id],
        )?;
        debug!("Tagged article {} with tag {}", article_id, tag_id);
        Ok(())
    }

    fn exists(&self, id: ArticleId) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE article_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get(&self, id: ArticleId) -> Result<Article> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.article_id = ?1"
        ))?;
        let article = stmt
            .query_row(params![id], Self::map_row)
            .optional()?
            .ok_or_else(|| DbError::not_found("Article", id))?;

        relationship::with_tags(&conn, article)
    }

    fn list_all(&self, sort_by: SortBy) -> Result<Vec<Article>> {
        self.query_articles(&Self::listing_sql("", sort_by), [])
    }

    fn list_by_category(&self, category: &str, sort_by: SortBy) -> Result<Vec<Article>> {
        let sql = Self::listing_sql(
            "WHERE EXISTS (
                 SELECT 1
                 FROM article_tags at
                 JOIN tags t ON at.tag_id = t.tag_id
                 WHERE at.article_id = a.article_id AND t.cat_name = ?1
             )",
            sort_by,
        );
        self.query_articles(&sql, params![category.trim()])
    }

    fn list_by_tag(&self, tag_id: TagId, sort_by: SortBy) -> Result<Vec<Article>> {
        let sql = Self::listing_sql(
            "WHERE EXISTS (
                 SELECT 1 FROM article_tags at
                 WHERE at.article_id = a.article_id AND at.tag_id = ?1
             )",
            sort_by,
        );
        self.query_articles(&sql, params![tag_id])
    }

    fn search(&self, query: &str, sort_by: SortBy) -> Result<Vec<Article>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DbError::InvalidInput("search query must not be empty".to_string()));
        }

        let sql = Self::listing_sql(
            "WHERE a.title LIKE ?1 ESCAPE '\\'
                OR a.author LIKE ?1 ESCAPE '\\'
                OR a.content LIKE ?1 ESCAPE '\\'",
            sort_by,
        );
        self.query_articles(&sql, params![like_pattern(query)])
    }

    fn get_tags(&self, id: ArticleId) -> Result<Vec<String>> {
        let conn = self.pool.get()?;
        relationship::tag_names_for(&conn, id)
    }

    fn get_categories(&self, id: ArticleId) -> Result<Vec<String>> {
        let conn = self.pool.get()?;
        relationship::category_names_for(&conn, id)
    }

    fn get_comments(&self, id: ArticleId) -> Result<Vec<Comment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT c.comment_id AS comment_id, c.article_id AS article_id, c.user_id AS user_id,
                    c.comment_date AS comment_date, c.content AS content, u.username AS username
             FROM comments c
             JOIN users u ON c.user_id = u.user_id
             WHERE c.article_id = ?1",
        )?;

        let comments = stmt
            .query_map(params![id], Self::map_comment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(comments)
    }

    fn add_view(&self, article_id: ArticleId, user_id: UserId) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO article_views (article_id, user_id, viewed_at) VALUES (?1, ?2, ?3)",
            params![article_id, user_id, format_datetime(current_timestamp())],
        )?;
        debug!("Recorded view of article {} by user {}", article_id, user_id);
        Ok(())
    }

    fn add_comment(
        &self,
        article_id: ArticleId,
        user_id: UserId,
        content: &str,
    ) -> Result<CommentId> {
        if content.trim().is_empty() {
            return Err(DbError::InvalidInput("comment must not be empty".to_string()));
        }

        let mut conn = self.pool.get()?;
        // IMMEDIATE takes the write lock before reading the max id, so two writers
        // can never compute the same next id.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let highest: Option<i64> =
            tx.query_row("SELECT MAX(comment_id) FROM comments", [], |row| row.get(0))?;
        let comment_id = CommentId(highest.unwrap_or(0) + 1);

        tx.execute(
            "INSERT INTO comments (comment_id, article_id, user_id, comment_date, content)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                comment_id,
                article_id,
                user_id,
                format_datetime(current_timestamp()),
                content
            ],
        )?;
        tx.commit()?;

        info!("User {} commented on article {} (comment {})", user_id, article_id, comment_id);
        Ok(comment_id)
    }
}
