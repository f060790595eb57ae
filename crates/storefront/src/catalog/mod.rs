//! Catalog access over the backend REST API.
//!
//! Listing failures never propagate: the storefront degrades to a fixed
//! fallback catalog so there is always something to render. Lookup failures
//! collapse to `None`, whether the product is missing or the backend is
//! down - callers show one generic not-found state for both.
//!
//! Listings and lookups are cached via `moka` (5-minute TTL). Search queries
//! bypass the listing cache key only in the sense that the text filter is
//! applied client-side after the cached page is fetched.

mod fallback;
mod types;

pub use types::{Product, ProductQuery, SortKey};

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument, warn};

use velora_core::ProductId;

use crate::http::ApiClient;

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cached catalog responses.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}

/// Client for the product catalog.
///
/// Cheaply cloneable; all clones share the cache and connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    api: ApiClient,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self { api, cache }
    }

    /// List products matching `query`.
    ///
    /// Category and sort are delegated to the server; the text search runs
    /// client-side on the returned page. When the backend cannot be reached
    /// the fixed fallback catalog is filtered the same way instead - callers
    /// cannot tell live data from fallback data through the return type.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Vec<Product> {
        let cache_key = format!(
            "products:{}:{}",
            query.category.as_deref().unwrap_or(""),
            query.sort.map_or("", SortKey::as_query_value),
        );

        if let Some(CacheValue::Products(products)) = self.cache.get(&cache_key).await {
            debug!("cache hit for product listing");
            return apply_search(products.as_ref().clone(), query.search.as_deref());
        }

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        if let Some(sort) = query.sort {
            params.push(("sort", sort.as_query_value().to_owned()));
        }

        match self
            .api
            .get_json::<Vec<Product>>("/api/products", &params)
            .await
        {
            Ok(products) => {
                self.cache
                    .insert(cache_key, CacheValue::Products(Arc::new(products.clone())))
                    .await;
                apply_search(products, query.search.as_deref())
            }
            Err(e) => {
                // Degraded mode: serve the fixed local set, filtered the way
                // the server would have filtered live data. Not cached, so a
                // recovered backend is picked up on the next call.
                warn!(error = %e, "product listing unavailable, serving fallback catalog");
                let mut products: Vec<Product> = fallback::fallback_catalog().to_vec();
                if let Some(category) = &query.category {
                    products.retain(|p| p.category.eq_ignore_ascii_case(category));
                }
                if let Some(sort) = query.sort {
                    apply_sort(&mut products, sort);
                }
                apply_search(products, query.search.as_deref())
            }
        }
    }

    /// Look up a single product.
    ///
    /// Returns `None` both when the product does not exist and when the
    /// backend cannot be reached.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Option<Product> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Some(*product);
        }

        match self
            .api
            .get_json::<Product>(&format!("/api/products/{id}"), &[])
            .await
        {
            Ok(product) => {
                self.cache
                    .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
                    .await;
                Some(product)
            }
            Err(crate::error::ApiError::NotFound(_)) => {
                debug!("product not found");
                None
            }
            Err(e) => {
                warn!(error = %e, "product lookup failed");
                None
            }
        }
    }

    /// The distinct category labels of the fallback catalog, in display order.
    ///
    /// Used to seed the category filter UI before live data arrives.
    #[must_use]
    pub fn fallback_categories() -> Vec<String> {
        let mut categories = Vec::new();
        for product in fallback::fallback_catalog() {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

/// Client-side text search over name and description, case-insensitive.
fn apply_search(mut products: Vec<Product>, search: Option<&str>) -> Vec<Product> {
    let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) else {
        return products;
    };
    let term = term.to_lowercase();

    products.retain(|p| {
        p.name.to_lowercase().contains(&term)
            || p.description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    });
    products
}

/// Client-side ordering used for the fallback catalog, matching the sort the
/// server would have applied.
fn apply_sort(products: &mut [Product], sort: SortKey) {
    match sort {
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Name => products.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::StorefrontConfig;
    use crate::session::{AuthSession, MemoryTokenStore};

    /// A client pointed at a port nothing listens on, so every request fails
    /// at the transport layer and the fallback path is exercised.
    fn unreachable_client() -> CatalogClient {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_API_BASE_URL" => Some("http://127.0.0.1:9".to_owned()),
            "STOREFRONT_REQUEST_TIMEOUT_SECS" => Some("1".to_owned()),
            _ => None,
        })
        .expect("config");
        let session = AuthSession::new(Arc::new(MemoryTokenStore::new()));
        let api = ApiClient::new(&config, session).expect("client");
        CatalogClient::new(api)
    }

    #[tokio::test]
    async fn test_listing_falls_back_when_unreachable() {
        let catalog = unreachable_client();

        let first = catalog.list_products(&ProductQuery::all()).await;
        let second = catalog.list_products(&ProductQuery::all()).await;

        assert_eq!(first.len(), 8);
        // Deterministic: the same fixed set on every call.
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fallback_honours_category_and_sort() {
        let catalog = unreachable_client();

        let query = ProductQuery::all()
            .with_category("Rings")
            .with_sort(SortKey::PriceAsc);
        let rings = catalog.list_products(&query).await;

        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|p| p.category == "Rings"));
        assert!(rings[0].price <= rings[1].price);
    }

    #[tokio::test]
    async fn test_fallback_search_is_client_side() {
        let catalog = unreachable_client();

        let query = ProductQuery::all().with_search("pearl");
        let hits = catalog.list_products(&query).await;

        assert!(!hits.is_empty());
        assert!(hits.iter().all(|p| {
            p.name.to_lowercase().contains("pearl")
                || p.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains("pearl"))
        }));
    }

    #[tokio::test]
    async fn test_lookup_collapses_failures_to_none() {
        let catalog = unreachable_client();
        let missing = catalog.get_product(&ProductId::new("nope")).await;
        assert!(missing.is_none());
    }

    #[test]
    fn test_search_matches_description() {
        let products = fallback::fallback_catalog().to_vec();
        let hits = apply_search(products, Some("handcrafted"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Vintage Silver Bracelet");
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let products = fallback::fallback_catalog().to_vec();
        let hits = apply_search(products.clone(), Some("   "));
        assert_eq!(hits, products);
    }

    #[test]
    fn test_sort_orders() {
        let mut products = fallback::fallback_catalog().to_vec();

        apply_sort(&mut products, SortKey::PriceDesc);
        assert_eq!(products[0].name, "Diamond Solitaire Ring");

        apply_sort(&mut products, SortKey::Name);
        assert_eq!(products[0].name, "Diamond Solitaire Ring");

        apply_sort(&mut products, SortKey::PriceAsc);
        assert_eq!(products[0].name, "Silver Hoop Earrings");
    }

    #[test]
    fn test_fallback_categories_are_distinct() {
        let categories = CatalogClient::fallback_categories();
        assert_eq!(
            categories,
            vec!["Bracelets", "Earrings", "Rings", "Necklaces"]
        );
    }
}
