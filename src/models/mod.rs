pub mod article;
pub mod category;
pub mod comment;
pub mod report;
pub mod tag;
pub mod user;

pub use article::{Article, ArticleId, NewArticle, SortBy};
pub use category::Category;
pub use comment::{Comment, CommentId};
pub use report::{Cell, ReportKind, ReportTable, Year};
pub use tag::{Tag, TagId};
pub use user::{Role, User, UserId};
