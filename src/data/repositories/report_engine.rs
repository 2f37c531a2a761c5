//! Year-scoped usage reports.
//!
//! Each query binds the year once as `?1` (the `strftime('%Y', ...)` text form) and
//! coalesces missing aggregates to 0, so every subject row is present even without
//! activity.

use log::{debug, info};
use rusqlite::{params, Row};

use crate::base::repository_traits::ReportEngine;
use crate::data::database::DbPool;
use crate::error::{DbError, Result};
use crate::models::{Cell, ReportKind, ReportTable, Year};

const ARTICLE_VIEW_REPORT: &str = "
    SELECT a.article_id AS article_id,
           a.title AS title,
           COALESCE(v.view_count, 0) AS view_count,
           COALESCE(c.comment_count, 0) AS comment_count
    FROM articles a
    LEFT JOIN (SELECT article_id, COUNT(*) AS view_count
               FROM article_views
               WHERE strftime('%Y', viewed_at) = ?1
               GROUP BY article_id) v ON v.article_id = a.article_id
    LEFT JOIN (SELECT article_id, COUNT(*) AS comment_count
               FROM comments
               WHERE strftime('%Y', comment_date) = ?1
               GROUP BY article_id) c ON c.article_id = a.article_id
    WHERE strftime('%Y', a.publish_date) = ?1
    ORDER BY view_count DESC, a.article_id ASC";

const TAG_REPORT: &str = "
    SELECT t.tag_id AS tag_id,
           t.tag_name AS tag_name,
           t.cat_name AS cat_name,
           COALESCE(ac.article_count, 0) AS article_count,
           COALESCE(vc.view_count, 0) AS view_count
    FROM tags t
    LEFT JOIN (SELECT at.tag_id AS tag_id, COUNT(DISTINCT at.article_id) AS article_count
               FROM article_tags at
               JOIN articles a ON a.article_id = at.article_id
               WHERE strftime('%Y', a.publish_date) = ?1
               GROUP BY at.tag_id) ac ON ac.tag_id = t.tag_id
    LEFT JOIN (SELECT at.tag_id AS tag_id, COUNT(*) AS view_count
               FROM article_tags at
               JOIN articles a ON a.article_id = at.article_id
               JOIN article_views v ON v.article_id = a.article_id
               WHERE strftime('%Y', a.publish_date) = ?1
                 AND strftime('%Y', v.viewed_at) = ?1
               GROUP BY at.tag_id) vc ON vc.tag_id = t.tag_id
    ORDER BY view_count DESC, t.tag_id ASC";

// Activity is summed over the DISTINCT (category, article) pairs, so an article
// carrying several tags of one category is counted once for that category.
const CATEGORY_REPORT: &str = "
    WITH category_articles AS (
        SELECT DISTINCT t.cat_name AS cat_name, a.article_id AS article_id
        FROM tags t
        JOIN article_tags at ON at.tag_id = t.tag_id
        JOIN articles a ON a.article_id = at.article_id
        WHERE strftime('%Y', a.publish_date) = ?1
    ),
    article_views_in_year AS (
        SELECT article_id, COUNT(*) AS n
        FROM article_views
        WHERE strftime('%Y', viewed_at) = ?1
        GROUP BY article_id
    ),
    article_comments_in_year AS (
        SELECT article_id, COUNT(*) AS n
        FROM comments
        WHERE strftime('%Y', comment_date) = ?1
        GROUP BY article_id
    )
    SELECT c.cat_name AS cat_name,
           COUNT(ca.article_id) AS article_count,
           COALESCE(SUM(cm.n), 0) AS comment_count,
           COALESCE(SUM(v.n), 0) AS view_count
    FROM categories c
    LEFT JOIN category_articles ca ON ca.cat_name = c.cat_name
    LEFT JOIN article_views_in_year v ON v.article_id = ca.article_id
    LEFT JOIN article_comments_in_year cm ON cm.article_id = ca.article_id
    GROUP BY c.cat_name
    ORDER BY view_count DESC, c.cat_name ASC";

// viewed_all: there is no article this user has not viewed, in any year
const USER_ACTIVITY_REPORT: &str = "
    SELECT u.user_id AS user_id,
           u.username AS username,
           COALESCE(cm.comment_count, 0) AS comment_count,
           COALESCE(v.view_count, 0) AS view_count,
           NOT EXISTS (
               SELECT 1 FROM articles a
               WHERE NOT EXISTS (
                   SELECT 1 FROM article_views av
                   WHERE av.article_id = a.article_id AND av.user_id = u.user_id
               )
           ) AS viewed_all
    FROM users u
    LEFT JOIN (SELECT user_id, COUNT(*) AS comment_count
               FROM comments
               WHERE strftime('%Y', comment_date) = ?1
               GROUP BY user_id) cm ON cm.user_id = u.user_id
    LEFT JOIN (SELECT user_id, COUNT(*) AS view_count
               FROM article_views
               WHERE strftime('%Y', viewed_at) = ?1
               GROUP BY user_id) v ON v.user_id = u.user_id
    ORDER BY view_count DESC, u.user_id ASC";

type RowMapper = fn(&Row) -> rusqlite::Result<Vec<Cell>>;

fn article_view_row(row: &Row) -> rusqlite::Result<Vec<Cell>> {
    Ok(vec![
        Cell::Int(row.get("article_id")?),
        Cell::Text(row.get("title")?),
        Cell::Int(row.get("view_count")?),
        Cell::Int(row.get("comment_count")?),
    ])
}

fn tag_row(row: &Row) -> rusqlite::Result<Vec<Cell>> {
    Ok(vec![
        Cell::Int(row.get("tag_id")?),
        Cell::Text(row.get("tag_name")?),
        Cell::Text(row.get("cat_name")?),
        Cell::Int(row.get("article_count")?),
        Cell::Int(row.get("view_count")?),
    ])
}

fn category_row(row: &Row) -> rusqlite::Result<Vec<Cell>> {
    Ok(vec![
        Cell::Text(row.get("cat_name")?),
        Cell::Int(row.get("article_count")?),
        Cell::Int(row.get("comment_count")?),
        Cell::Int(row.get("view_count")?),
    ])
}

fn user_activity_row(row: &Row) -> rusqlite::Result<Vec<Cell>> {
    Ok(vec![
        Cell::Int(row.get("user_id")?),
        Cell::Text(row.get("username")?),
        Cell::Int(row.get("comment_count")?),
        Cell::Int(row.get("view_count")?),
        Cell::Bool(row.get("viewed_all")?),
    ])
}

/// Runs the report queries directly against the store
pub struct SqliteReportEngine {
    pool: DbPool,
}

impl SqliteReportEngine {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn build(&self, kind: ReportKind, year: Year, sql: &str, map: RowMapper) -> Result<ReportTable> {
        debug!("Running '{}' report for {}", kind, year);
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![year.as_sql_text()], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut table = ReportTable::new(kind, year);
        for row in rows {
            table.push_row(row)?;
        }

        if table.is_empty() {
            return Err(DbError::EmptyResult {
                report: kind.title(),
                year: year.to_string(),
            });
        }

        info!("Report '{}' for {} produced {} rows", kind, year, table.data().len());
        Ok(table)
    }
}

impl ReportEngine for SqliteReportEngine {
    fn article_view_report(&self, year: Year) -> Result<ReportTable> {
        self.build(ReportKind::ArticleViews, year, ARTICLE_VIEW_REPORT, article_view_row)
    }

    fn tag_report(&self, year: Year) -> Result<ReportTable> {
        self.build(ReportKind::Tags, year, TAG_REPORT, tag_row)
    }

    fn category_report(&self, year: Year) -> Result<ReportTable> {
        self.build(ReportKind::Categories, year, CATEGORY_REPORT, category_row)
    }

    fn user_activity_report(&self, year: Year) -> Result<ReportTable> {
        self.build(ReportKind::UserActivity, year, USER_ACTIVITY_REPORT, user_activity_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::seeded_pool;

    fn engine() -> anyhow::Result<SqliteReportEngine> {
        Ok(SqliteReportEngine::new(seeded_pool()?))
    }

    fn year(y: i32) -> Year {
        Year::new(y).unwrap()
    }

    fn column(table: &ReportTable, label: &str) -> Vec<Cell> {
        let idx = table.column_index(label).unwrap();
        table.data().iter().map(|row| row[idx].clone()).collect()
    }

    fn ints(cells: Vec<Cell>) -> Vec<i64> {
        cells.iter().map(|c| c.as_int().unwrap()).collect()
    }

    #[test]
    fn test_article_view_report() -> anyhow::Result<()> {
        let table = engine()?.article_view_report(year(2022))?;

        assert_eq!(table.header(), &[
            Cell::from("ID"),
            Cell::from("Title"),
            Cell::from("Views"),
            Cell::from("Comments"),
        ]);
        // Article 4 was published in 2021 and is excluded despite its 2022 view
        assert_eq!(ints(column(&table, "ID")), vec![1, 2, 3, 5]);
        assert_eq!(ints(column(&table, "Views")), vec![3, 2, 2, 1]);
        assert_eq!(ints(column(&table, "Comments")), vec![2, 0, 1, 0]);
        Ok(())
    }

    #[test]
    fn test_article_view_report_scopes_activity_to_year() -> anyhow::Result<()> {
        let table = engine()?.article_view_report(year(2021))?;

        assert_eq!(table.data().len(), 1);
        let row = table.find_row("ID", &Cell::Int(4)).unwrap();
        // One of its three views happened in 2022
        assert_eq!(row[2], Cell::Int(2));
        assert_eq!(row[3], Cell::Int(1));
        Ok(())
    }

    #[test]
    fn test_empty_year_is_empty_result() -> anyhow::Result<()> {
        let result = engine()?.article_view_report(year(1999));
        assert!(matches!(result, Err(DbError::EmptyResult { .. })), "got {result:?}");
        Ok(())
    }

    #[test]
    fn test_tag_report() -> anyhow::Result<()> {
        let table = engine()?.tag_report(year(2022))?;

        assert_eq!(ints(column(&table, "ID")), vec![1, 3, 4, 5, 2]);
        assert_eq!(ints(column(&table, "Views")), vec![3, 2, 2, 2, 0]);
        assert_eq!(ints(column(&table, "Articles")), vec![1, 1, 1, 1, 0]);

        let elections = table.find_row("Tag", &Cell::from("elections")).unwrap();
        assert_eq!(elections[2], Cell::from("politics"));
        Ok(())
    }

    #[test]
    fn test_category_report_counts_each_article_once() -> anyhow::Result<()> {
        let table = engine()?.category_report(year(2022))?;

        assert_eq!(
            column(&table, "Category"),
            vec![
                Cell::from("politics"),
                Cell::from("sports"),
                Cell::from("technology"),
                Cell::from("science"),
            ]
        );

        // Article 3 carries both technology tags
        let tech = table.find_row("Category", &Cell::from("technology")).unwrap();
        assert_eq!(tech[1], Cell::Int(1), "articles");
        assert_eq!(tech[2], Cell::Int(1), "comments");
        assert_eq!(tech[3], Cell::Int(2), "views");

        let politics = table.find_row("Category", &Cell::from("politics")).unwrap();
        assert_eq!(&politics[1..], &[Cell::Int(1), Cell::Int(2), Cell::Int(3)]);

        let science = table.find_row("Category", &Cell::from("science")).unwrap();
        assert_eq!(&science[1..], &[Cell::Int(0), Cell::Int(0), Cell::Int(0)]);
        Ok(())
    }

    #[test]
    fn test_user_activity_report() -> anyhow::Result<()> {
        let table = engine()?.user_activity_report(year(2022))?;

        assert_eq!(
            column(&table, "Username"),
            vec![Cell::from("rick"), Cell::from("bob")]
        );
        assert_eq!(ints(column(&table, "Views")), vec![5, 4]);
        assert_eq!(ints(column(&table, "Comments")), vec![1, 2]);
        assert_eq!(
            column(&table, "Viewed All"),
            vec![Cell::Bool(true), Cell::Bool(false)]
        );
        Ok(())
    }

    #[test]
    fn test_viewed_all_ignores_year() -> anyhow::Result<()> {
        let table = engine()?.user_activity_report(year(2030))?;

        let rick = table.find_row("Username", &Cell::from("rick")).unwrap();
        assert_eq!(rick[3], Cell::Int(0));
        assert_eq!(rick[4], Cell::Bool(true));
        Ok(())
    }

    #[test]
    fn test_run_dispatches_by_kind() -> anyhow::Result<()> {
        let engine = engine()?;

        for kind in ReportKind::ALL {
            let table = engine.run(kind, year(2022))?;
            assert_eq!(table.kind, kind);
            assert_eq!(table.header().len(), kind.header().len());
        }
        Ok(())
    }
}
