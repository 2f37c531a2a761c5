use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DbError;

/// A unique identifier for a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(pub i64);

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TagId {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(TagId)
            .map_err(|_| DbError::InvalidInput(format!("tag id must be numeric, got '{s}'")))
    }
}

/// A tag attached to articles; every tag belongs to exactly one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub category_name: String,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display_is_name() {
        let tag = Tag {
            id: TagId(3),
            name: "world leaders".to_string(),
            category_name: "politics".to_string(),
        };

        assert_eq!(tag.to_string(), "world leaders");
    }

    #[test]
    fn test_tag_id_parse() {
        assert_eq!("3".parse::<TagId>().unwrap(), TagId(3));
        assert!("3x".parse::<TagId>().is_err());
    }
}
