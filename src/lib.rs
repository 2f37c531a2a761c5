pub mod base;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod utils;

// Re-export repository traits
pub use base::repository_traits::{
    ArticleRepository,
    CategoryRepository,
    ReportEngine,
    TagRepository,
    UserRepository,
};

// Re-export models
pub use models::{
    article::{Article, ArticleId, NewArticle, SortBy},
    category::Category,
    comment::{Comment, CommentId},
    report::{Cell, ReportKind, ReportTable, Year},
    tag::{Tag, TagId},
    user::{Role, User, UserId},
};

pub use config::AppConfig;
pub use data::NewsDb;
pub use error::{DbError, Result};
