//! Fixed fallback catalog served when the backend is unreachable.
//!
//! The storefront must always render something, so listing failures degrade
//! to this set instead of an error page. The set is fixed for the lifetime
//! of the process: every call sees the same eight products.

use std::sync::LazyLock;

use rust_decimal::Decimal;

use velora_core::{Price, ProductId};

use super::types::Product;

static FALLBACK: LazyLock<Vec<Product>> = LazyLock::new(|| {
    [
        (
            "1",
            "Gold Chain Bracelet",
            "Elegant 14-karat gold chain bracelet, ideal for everyday wear",
            2500,
            12,
            "https://images.unsplash.com/photo-1515562141207-7a88fb7ce338?w=400&h=400&fit=crop",
            "Bracelets",
        ),
        (
            "2",
            "Pearl Earring Set",
            "Silver earring set adorned with natural pearls",
            1800,
            8,
            "https://images.unsplash.com/photo-1535632066927-ab7c9ab60908?w=400&h=400&fit=crop",
            "Earrings",
        ),
        (
            "3",
            "Diamond Solitaire Ring",
            "18-karat white gold ring with a 0.5 carat diamond",
            15000,
            3,
            "https://images.unsplash.com/photo-1603561596112-db542eeb2503?w=400&h=400&fit=crop",
            "Rings",
        ),
        (
            "4",
            "Rose Gold Necklace",
            "Minimalist rose gold necklace with a heart motif",
            3200,
            15,
            "https://images.unsplash.com/photo-1599643478518-a784e5dc4c8f?w=400&h=400&fit=crop",
            "Necklaces",
        ),
        (
            "5",
            "Silver Hoop Earrings",
            "Modern silver hoop earrings, suited to any occasion",
            650,
            20,
            "https://images.unsplash.com/photo-1506629905607-84e28e57d98d?w=400&h=400&fit=crop",
            "Earrings",
        ),
        (
            "6",
            "Vintage Silver Bracelet",
            "Antique-look silver bracelet with handcrafted detailing",
            1200,
            7,
            "https://images.unsplash.com/photo-1611652022419-a9419f74343d?w=400&h=400&fit=crop",
            "Bracelets",
        ),
        (
            "7",
            "Emerald Ring",
            "Silver ring set with a natural emerald, exclusive design",
            4500,
            5,
            "https://images.unsplash.com/photo-1584302179602-e4819e3a2468?w=400&h=400&fit=crop",
            "Rings",
        ),
        (
            "8",
            "Layered Pearl Necklace",
            "Multi-strand gold necklace with pearl detailing",
            5800,
            6,
            "https://images.unsplash.com/photo-1515562141207-7a88fb7ce338?w=400&h=400&fit=crop",
            "Necklaces",
        ),
    ]
    .into_iter()
    .map(|(id, name, description, price, stock, image_url, category)| Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        price: Price::new(Decimal::from(price)).expect("fallback prices are non-negative"),
        stock,
        image_url: Some(image_url.to_owned()),
        images: Vec::new(),
        category: category.to_owned(),
    })
    .collect()
});

/// The fixed fallback product set.
pub(crate) fn fallback_catalog() -> &'static [Product] {
    &FALLBACK
}
