use std::path::Path;
use std::sync::Arc;

use crate::base::repository_traits::{
    ArticleRepository, CategoryRepository, ReportEngine, TagRepository, UserRepository,
};
use crate::data::database::{self, DbPool};
use crate::data::repositories::{
    SqliteArticleRepository, SqliteCategoryRepository, SqliteReportEngine, SqliteTagRepository,
    SqliteUserRepository,
};
use crate::error::Result;

/// Single entry point to the data layer: every repository and the report engine,
/// all sharing one connection pool.
#[derive(Clone)]
pub struct NewsDb {
    pool: DbPool,
    users: Arc<dyn UserRepository>,
    articles: Arc<dyn ArticleRepository>,
    tags: Arc<dyn TagRepository>,
    categories: Arc<dyn CategoryRepository>,
    reports: Arc<dyn ReportEngine>,
}

impl NewsDb {
    /// Wires the SQLite repositories to an existing pool
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            articles: Arc::new(SqliteArticleRepository::new(pool.clone())),
            tags: Arc::new(SqliteTagRepository::new(pool.clone())),
            categories: Arc::new(SqliteCategoryRepository::new(pool.clone())),
            reports: Arc::new(SqliteReportEngine::new(pool.clone())),
            pool,
        }
    }

    /// Opens the database file, creating the schema if it is missing
    pub fn open(path: &Path, pool_size: u32) -> Result<Self> {
        Ok(Self::from_pool(database::init_database(path, pool_size)?))
    }

    /// A fresh, empty in-memory database
    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_pool(database::memory_pool()?))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    pub fn articles(&self) -> &dyn ArticleRepository {
        self.articles.as_ref()
    }

    pub fn tags(&self) -> &dyn TagRepository {
        self.tags.as_ref()
    }

    pub fn categories(&self) -> &dyn CategoryRepository {
        self.categories.as_ref()
    }

    pub fn reports(&self) -> &dyn ReportEngine {
        self.reports.as_ref()
    }

    pub fn load_seed(&self) -> Result<()> {
        let conn = self.pool.get()?;
        database::load_seed(&conn)
    }
}
