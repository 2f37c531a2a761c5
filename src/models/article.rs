use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DbError;

/// Unique identifier for articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArticleId(pub i64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(ArticleId)
            .map_err(|_| DbError::InvalidInput(format!("article id must be numeric, got '{s}'")))
    }
}

/// Column an article listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Title,
    Author,
}

impl SortBy {
    /// The `articles` column backing this sort key
    pub fn column(&self) -> &'static str {
        match self {
            SortBy::Date => "a.publish_date",
            SortBy::Title => "a.title",
            SortBy::Author => "a.author",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Title => "title",
            SortBy::Author => "author",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "title" => Ok(SortBy::Title),
            "author" => Ok(SortBy::Author),
            other => Err(DbError::InvalidInput(format!(
                "unknown sort key '{other}', expected date, title or author"
            ))),
        }
    }
}

/// A news article together with the names of its tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub author: String,
    pub publish_date: NaiveDate,
    pub content: String,
    /// Tag names, resolved through the article_tags junction
    pub tags: Vec<String>,
}

impl Article {
    /// Returns true if the article carries a tag with this name
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Article {}: {} ({}, {})",
            self.id, self.title, self.author, self.publish_date
        )
    }
}

/// Input for inserting a new article into the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub author: String,
    pub publish_date: NaiveDate,
    pub content: String,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, author: impl Into<String>, publish_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publish_date,
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_parsing() {
        assert_eq!("date".parse::<SortBy>().unwrap(), SortBy::Date);
        assert_eq!(" Title ".parse::<SortBy>().unwrap(), SortBy::Title);
        assert_eq!("AUTHOR".parse::<SortBy>().unwrap(), SortBy::Author);
        assert!(matches!("views".parse::<SortBy>(), Err(DbError::InvalidInput(_))));
    }

    #[test]
    fn test_sort_by_maps_date_to_publish_date() {
        assert_eq!(SortBy::Date.column(), "a.publish_date");
        assert_eq!(SortBy::default(), SortBy::Date);
    }

    #[test]
    fn test_article_id_rejects_non_numeric() {
        assert_eq!("17".parse::<ArticleId>().unwrap(), ArticleId(17));
        assert!(matches!("abc".parse::<ArticleId>(), Err(DbError::InvalidInput(_))));
    }

    #[test]
    fn test_new_article_builder() {
        let date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let article = NewArticle::new("Title", "Jane Doe", date).with_content("Body");

        assert_eq!(article.title, "Title");
        assert_eq!(article.content, "Body");
        assert_eq!(article.publish_date, date);
    }
}
