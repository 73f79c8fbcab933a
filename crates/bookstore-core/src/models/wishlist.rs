use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A wishlisted book, newest additions first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct WishlistBook {
    pub id: i64,
    pub title: String,
    pub price: Option<Decimal>,
    pub cover: String,
    pub author_name: String,
    pub category_name: String,
    pub added_at: DateTime<Utc>,
}

/// Result of toggling a book on a wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WishlistToggle {
    Added,
    Removed,
}

impl WishlistToggle {
    pub fn message(self) -> &'static str {
        match self {
            WishlistToggle::Added => "Added to wishlist.",
            WishlistToggle::Removed => "Removed from wishlist.",
        }
    }
}
