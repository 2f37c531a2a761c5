mod article_repository;
mod category_repository;
pub mod relationship;
mod report_engine;
mod tag_repository;
mod user_repository;

pub use article_repository::SqliteArticleRepository;
pub use category_repository::SqliteCategoryRepository;
pub use report_engine::SqliteReportEngine;
pub use tag_repository::SqliteTagRepository;
pub use user_repository::SqliteUserRepository;
