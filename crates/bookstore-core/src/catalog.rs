//! Catalog query types: store filters, sort keys and pagination math.

use serde::{Deserialize, Serialize};

use crate::validation::parse_id;

pub const STORE_PER_PAGE: i64 = 12;
pub const HOME_NEW_BOOKS_LIMIT: i64 = 24;
pub const HOME_FEATURED_COUNT: usize = 5;
pub const RELATED_BOOKS_LIMIT: i64 = 8;
pub const WISHLIST_PAGE_LIMIT: i64 = 24;

/// Sort keys accepted by the store page.
///
/// Each key maps to a fixed `ORDER BY` clause; user input never reaches SQL text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSort {
    #[default]
    Newest,
    TitleAsc,
    PriceAsc,
    PriceDesc,
}

impl StoreSort {
    /// Parses a sort key, falling back to [`StoreSort::Newest`] for anything unknown.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("title_asc") => StoreSort::TitleAsc,
            Some("price_asc") => StoreSort::PriceAsc,
            Some("price_desc") => StoreSort::PriceDesc,
            _ => StoreSort::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreSort::Newest => "newest",
            StoreSort::TitleAsc => "title_asc",
            StoreSort::PriceAsc => "price_asc",
            StoreSort::PriceDesc => "price_desc",
        }
    }

    /// Static `ORDER BY` body for the books alias `b`.
    pub fn order_by_clause(&self) -> &'static str {
        match self {
            StoreSort::Newest => "b.id DESC",
            StoreSort::TitleAsc => "b.title ASC",
            StoreSort::PriceAsc => "b.price ASC NULLS LAST",
            StoreSort::PriceDesc => "b.price DESC NULLS LAST",
        }
    }
}

/// Raw query string of `GET /store`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreParams {
    pub q: Option<String>,
    pub category_id: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

/// Normalized store filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreQuery {
    pub q: Option<String>,
    pub category_id: Option<i64>,
    pub sort: StoreSort,
    pub page: i64,
}

impl From<StoreParams> for StoreQuery {
    fn from(params: StoreParams) -> Self {
        let q = params
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        let category_id = params.category_id.as_deref().and_then(parse_id);
        let page = params
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);

        StoreQuery {
            q,
            category_id,
            sort: StoreSort::parse(params.sort.as_deref()),
            page,
        }
    }
}

/// Page window over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Clamps `requested_page` into `1..=total_pages`; an empty set still has one page.
    pub fn new(requested_page: i64, per_page: i64, total: i64) -> Self {
        let per_page = per_page.max(1);
        let total = total.max(0);
        let total_pages = ((total + per_page - 1) / per_page).max(1);
        let page = requested_page.clamp(1, total_pages);

        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Headline counts shown on the home and about pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub books: i64,
    pub authors: i64,
    pub categories: i64,
}
