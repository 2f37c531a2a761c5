use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DbError, Result};

/// A four-digit calendar year used to scope reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Year(u16);

impl Year {
    pub fn new(year: i32) -> Result<Self> {
        u16::try_from(year)
            .ok()
            .filter(|y| *y <= 9999)
            .map(Year)
            .ok_or_else(|| {
                DbError::InvalidInput(format!("year must be between 0000 and 9999, got {year}"))
            })
    }

    /// The form SQLite's `strftime('%Y', ...)` produces
    pub fn as_sql_text(&self) -> String {
        format!("{:04}", self.0)
    }
}

impl FromStr for Year {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DbError::InvalidInput(format!(
                "year must have exactly four digits, got '{s}'"
            )));
        }
        let value: i32 = trimmed
            .parse()
            .map_err(|_| DbError::InvalidInput(format!("invalid year '{s}'")))?;
        Year::new(value)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// The four usage reports available to administrators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    ArticleViews,
    Tags,
    Categories,
    UserActivity,
}

impl ReportKind {
    #[cfg(test)]
    pub const ALL: [ReportKind; 4] = [
        ReportKind::ArticleViews,
        ReportKind::Tags,
        ReportKind::Categories,
        ReportKind::UserActivity,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::ArticleViews => "most viewed articles",
            ReportKind::Tags => "most popular tags",
            ReportKind::Categories => "most popular categories",
            ReportKind::UserActivity => "most active users",
        }
    }

    /// Column labels, emitted as row 0 of every table of this kind
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            ReportKind::ArticleViews => &["ID", "Title", "Views", "Comments"],
            ReportKind::Tags => &["ID", "Tag", "Category", "Articles", "Views"],
            ReportKind::Categories => &["Category", "Articles", "Comments", "Views"],
            ReportKind::UserActivity => &["ID", "Username", "Comments", "Views", "Viewed All"],
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One typed value in a report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl Cell {
    #[cfg(test)]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Bool(true) => f.write_str("yes"),
            Cell::Bool(false) => f.write_str("no"),
            Cell::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

/// Tabular report output. Row 0 is always the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub kind: ReportKind,
    pub year: Year,
    rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    /// Starts a table holding only the header row for `kind`
    pub fn new(kind: ReportKind, year: Year) -> Self {
        let header = kind.header().iter().map(|label| Cell::from(*label)).collect();
        Self {
            kind,
            year,
            rows: vec![header],
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        let width = self.kind.header().len();
        if row.len() != width {
            return Err(DbError::Mapping(format!(
                "{} row has {} columns, expected {}",
                self.kind,
                row.len(),
                width
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn header(&self) -> &[Cell] {
        &self.rows[0]
    }

    pub fn data(&self) -> &[Vec<Cell>] {
        &self.rows[1..]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.len() <= 1
    }

    /// Index of a header label, for looking values up by column name
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.kind.header().iter().position(|h| *h == label)
    }

    /// Finds the first data row whose `key_column` equals `key`
    pub fn find_row(&self, key_column: &str, key: &Cell) -> Option<&[Cell]> {
        let idx = self.column_index(key_column)?;
        self.data()
            .iter()
            .find(|row| &row[idx] == key)
            .map(|row| row.as_slice())
    }
}
