//! Catalog wire types.

use serde::{Deserialize, Serialize};

use velora_core::{Price, ProductId};

/// A product as served by the backend catalog.
///
/// Read-only from the storefront's perspective. The cart snapshots the
/// fields it needs at add time, so later server-side edits never rewrite
/// lines already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    pub stock: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Gallery images; older backend revisions only populate `image_url`.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// The ordered image URLs to display, falling back to the single
    /// `image_url` when no gallery is present.
    #[must_use]
    pub fn image_refs(&self) -> Vec<String> {
        if self.images.is_empty() {
            self.image_url.iter().cloned().collect()
        } else {
            self.images.clone()
        }
    }

    /// Whether the product is available for purchase.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Server-understood sort orders for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    Name,
}

impl SortKey {
    /// The query-parameter value the backend expects.
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Name => "name",
        }
    }
}

/// Filter criteria for a product listing.
///
/// Category and sort are delegated to the server; the text search is applied
/// client-side on the returned results so the listing can react to keystrokes
/// without a round-trip per character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub sort: Option<SortKey>,
    pub search: Option<String>,
}

impl ProductQuery {
    /// A query matching the whole catalog.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            category: None,
            sort: None,
            search: None,
        }
    }

    /// Restrict to a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Apply a sort order.
    #[must_use]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Apply a client-side text search.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}
