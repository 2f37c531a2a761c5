use serde::{Deserialize, Serialize};
use std::fmt;

/// Category model grouping tags; the name is the key and the store compares it
/// case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub description: Option<String>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display_and_json() {
        let category = Category {
            name: "politics".to_string(),
            description: Some("Elections and governments".to_string()),
        };

        assert_eq!(category.to_string(), "politics");
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["description"], "Elections and governments");
    }
}
