use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{
    Article, ArticleId, Category, Comment, CommentId, NewArticle, ReportKind, ReportTable, Role,
    SortBy, Tag, TagId, User, UserId, Year,
};

pub trait UserRepository: Send + Sync {
    /// Registers a regular user; fails with `DuplicateKey` if the username is taken
    fn create(&self, username: &str, password: &str, register_date: NaiveDate) -> Result<UserId>;
    fn create_with_role(
        &self,
        username: &str,
        password: &str,
        register_date: NaiveDate,
        role: Role,
    ) -> Result<UserId>;
    /// Fails with `NotFound` when no such user exists
    fn delete(&self, id: UserId) -> Result<()>;
    fn exists(&self, id: UserId) -> Result<bool>;
    fn get(&self, id: UserId) -> Result<User>;
    fn get_by_username(&self, username: &str) -> Result<Option<User>>;
    /// `Some(id)` for exactly one match, `None` for none, `IntegrityViolation` for several
    fn validate(&self, username: &str, password: &str) -> Result<Option<UserId>>;
}

pub trait ArticleRepository: Send + Sync {
    fn create(&self, article: &NewArticle) -> Result<ArticleId>;
    fn attach_tag(&self, article_id: ArticleId, tag_id: TagId) -> Result<()>;
    fn exists(&self, id: ArticleId) -> Result<bool>;
    fn get(&self, id: ArticleId) -> Result<Article>;
    fn list_all(&self, sort_by: SortBy) -> Result<Vec<Article>>;
    fn list_by_category(&self, category: &str, sort_by: SortBy) -> Result<Vec<Article>>;
    fn list_by_tag(&self, tag_id: TagId, sort_by: SortBy) -> Result<Vec<Article>>;
    fn search(&self, query: &str, sort_by: SortBy) -> Result<Vec<Article>>;
    fn get_tags(&self, id: ArticleId) -> Result<Vec<String>>;
    /// Categories reached through the article's tags
    fn get_categories(&self, id: ArticleId) -> Result<Vec<String>>;
    fn get_comments(&self, id: ArticleId) -> Result<Vec<Comment>>;
    fn add_view(&self, article_id: ArticleId, user_id: UserId) -> Result<()>;
    fn add_comment(&self, article_id: ArticleId, user_id: UserId, content: &str)
        -> Result<CommentId>;
}

pub trait TagRepository: Send + Sync {
    fn exists(&self, id: TagId) -> Result<bool>;
    fn get(&self, id: TagId) -> Result<Tag>;
    fn list_all(&self) -> Result<Vec<Tag>>;
    fn list_by_category(&self, category: &str) -> Result<Vec<Tag>>;
}

pub trait CategoryRepository: Send + Sync {
    fn exists(&self, name: &str) -> Result<bool>;
    fn get(&self, name: &str) -> Result<Category>;
    fn list_all(&self) -> Result<Vec<Category>>;
}

/// Year-scoped usage reports
pub trait ReportEngine: Send + Sync {
    fn article_view_report(&self, year: Year) -> Result<ReportTable>;
    fn tag_report(&self, year: Year) -> Result<ReportTable>;
    fn category_report(&self, year: Year) -> Result<ReportTable>;
    fn user_activity_report(&self, year: Year) -> Result<ReportTable>;

    fn run(&self, kind: ReportKind, year: Year) -> Result<ReportTable> {
        match kind {
            ReportKind::ArticleViews => self.article_view_report(year),
            ReportKind::Tags => self.tag_report(year),
            ReportKind::Categories => self.category_report(year),
            ReportKind::UserActivity => self.user_activity_report(year),
        }
    }
}
