//! Account-local data: the address book and favorites.
//!
//! Both stores follow the cart's construction discipline - explicit handles
//! created at startup, in-memory only. The original design kept these
//! client-side with no server persistence, and that baseline is preserved.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use velora_core::{AddressId, ProductId};

/// Kind of saved address.
///
/// A closed enumeration rather than a label string, so match sites are
/// exhaustiveness-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    Home,
    Work,
    Other,
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: AddressId,
    pub title: String,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub district: String,
    pub postal_code: String,
    pub kind: AddressKind,
    pub is_default: bool,
}

/// Input for creating or updating an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub title: String,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub district: String,
    pub postal_code: String,
    pub kind: AddressKind,
}

/// In-memory address book.
///
/// Cheaply cloneable handle; all clones share the same state.
#[derive(Clone, Default)]
pub struct AddressBook {
    inner: Arc<Mutex<Vec<Address>>>,
}

impl AddressBook {
    /// Create an empty address book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a new address. The first saved address becomes the default.
    pub fn add(&self, input: NewAddress) -> Address {
        let mut addresses = self.state();
        let address = Address {
            id: AddressId::new(Uuid::new_v4().to_string()),
            title: input.title,
            full_name: input.full_name,
            phone: input.phone,
            street: input.street,
            city: input.city,
            district: input.district,
            postal_code: input.postal_code,
            kind: input.kind,
            is_default: addresses.is_empty(),
        };
        addresses.push(address.clone());
        address
    }

    /// Replace an address's fields, keeping its id and default flag.
    /// Returns false when the id is unknown.
    pub fn update(&self, id: &AddressId, input: NewAddress) -> bool {
        let mut addresses = self.state();
        let Some(address) = addresses.iter_mut().find(|address| &address.id == id) else {
            return false;
        };
        address.title = input.title;
        address.full_name = input.full_name;
        address.phone = input.phone;
        address.street = input.street;
        address.city = input.city;
        address.district = input.district;
        address.postal_code = input.postal_code;
        address.kind = input.kind;
        true
    }

    /// Remove an address. Removing the default promotes the first survivor.
    pub fn remove(&self, id: &AddressId) {
        let mut addresses = self.state();
        let was_default = addresses
            .iter()
            .any(|address| &address.id == id && address.is_default);
        addresses.retain(|address| &address.id != id);

        if was_default && let Some(first) = addresses.first_mut() {
            first.is_default = true;
        }
    }

    /// Make an address the sole default. Returns false when the id is
    /// unknown, leaving defaults unchanged.
    pub fn set_default(&self, id: &AddressId) -> bool {
        let mut addresses = self.state();
        if !addresses.iter().any(|address| &address.id == id) {
            return false;
        }
        for address in addresses.iter_mut() {
            address.is_default = &address.id == id;
        }
        true
    }

    /// All saved addresses, in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Address> {
        self.state().clone()
    }

    /// The default address, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<Address> {
        self.state()
            .iter()
            .find(|address| address.is_default)
            .cloned()
    }

    fn state(&self) -> MutexGuard<'_, Vec<Address>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory favorites list.
///
/// Cheaply cloneable handle; all clones share the same state.
#[derive(Clone, Default)]
pub struct Favorites {
    inner: Arc<Mutex<BTreeSet<ProductId>>>,
}

impl Favorites {
    /// Create an empty favorites list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a product's favorite status. Returns whether it is now a
    /// favorite.
    pub fn toggle(&self, id: &ProductId) -> bool {
        let mut favorites = self.state();
        if favorites.remove(id) {
            false
        } else {
            favorites.insert(id.clone());
            true
        }
    }

    /// Whether a product is marked as favorite.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.state().contains(id)
    }

    /// All favorite product ids, ordered.
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.state().iter().cloned().collect()
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().len()
    }

    /// Whether no favorites are saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().is_empty()
    }

    fn state(&self) -> MutexGuard<'_, BTreeSet<ProductId>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
