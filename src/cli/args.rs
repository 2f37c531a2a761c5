use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::ReportKind;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ReportArg {
    Articles,
    Tags,
    Categories,
    Users,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Articles => ReportKind::ArticleViews,
            ReportArg::Tags => ReportKind::Tags,
            ReportArg::Categories => ReportKind::Categories,
            ReportArg::Users => ReportKind::UserActivity,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse the news catalog and run usage reports.")]
pub struct Cli {
    /// Database file (overrides NEWSDB_PATH).
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the schema, optionally loading the sample catalog.
    Init {
        #[arg(long)]
        seed: bool,
    },
    /// Drop every table.
    Drop,
    /// Check credentials and print the user id.
    Login {
        username: String,
        #[arg(long, env = "NEWSDB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List articles, optionally filtered by category, tag or a search term.
    Articles {
        /// date, title or author.
        #[arg(long, default_value = "date")]
        sort: String,
        #[arg(long, conflicts_with_all = ["tag", "search"])]
        category: Option<String>,
        /// Tag id.
        #[arg(long, conflicts_with = "search")]
        tag: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show one article with its tags, categories and comments.
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Record that a user read an article.
    View { article: String, user: String },
    /// Add a comment to an article.
    Comment {
        article: String,
        user: String,
        text: String,
    },
    /// List categories.
    Categories,
    /// List tags.
    Tags,
    /// Run a usage report for a year (administrators only).
    Report {
        #[arg(value_enum)]
        kind: ReportArg,
        /// Four-digit year.
        year: String,
        /// Administrator username.
        #[arg(long = "as", value_name = "USERNAME")]
        as_user: String,
        #[arg(long, env = "NEWSDB_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        json: bool,
    },
}
