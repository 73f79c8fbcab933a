use serde::{Deserialize, Serialize};

/// Longest category name accepted by the back-office forms.
pub const MAX_CATEGORY_NAME_LEN: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Category with the number of books assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub book_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub category_name: String,
}
