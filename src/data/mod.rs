pub mod database;
pub mod news_db;
pub mod repositories;
pub mod types;

pub use crate::data::database::DbPool;
pub use crate::data::news_db::NewsDb;
pub use crate::data::repositories::{
    SqliteArticleRepository, SqliteCategoryRepository, SqliteReportEngine, SqliteTagRepository,
    SqliteUserRepository,
};

#[cfg(test)]
pub(crate) mod test_support {
    use super::database::{load_seed, memory_pool, DbPool};
    use super::NewsDb;
    use crate::error::Result;

    /// In-memory pool loaded with the sample catalog
    pub fn seeded_pool() -> Result<DbPool> {
        let pool = memory_pool()?;
        load_seed(&*pool.get()?)?;
        Ok(pool)
    }

    pub fn seeded_db() -> Result<NewsDb> {
        Ok(NewsDb::from_pool(seeded_pool()?))
    }
}
