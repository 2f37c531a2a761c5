use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::article::ArticleId;
use super::user::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A comment left on an article, with the author's username for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub user_id: UserId,
    pub comment_date: NaiveDateTime,
    pub content: String,
    pub username: String,
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.username,
            self.comment_date.format("%Y-%m-%d %H:%M"),
            self.content
        )
    }
}
