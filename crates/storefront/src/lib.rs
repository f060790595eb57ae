//! Velora Storefront - core library for the jewelry storefront.
//!
//! This crate is the framework-independent heart of the customer-facing
//! storefront: catalog access, the shopping cart, schema-driven form
//! validation, the multi-step checkout, and session tracking. Views and
//! routing live in the embedding application and consume this crate.
//!
//! # Architecture
//!
//! - [`state::AppState`] is the single construction point; everything else
//!   is reached through it
//! - Stores ([`cart::CartStore`], [`account::AddressBook`]) are explicit
//!   in-memory handles, never globals, with synchronous total transitions
//! - Clients ([`catalog::CatalogClient`], [`auth::AuthClient`]) talk to the
//!   backend REST API over `reqwest`; a 401 anywhere forces the session to
//!   log out
//! - Catalog listing failures degrade to a fixed fallback set so the
//!   storefront always has something to render

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod session;
pub mod state;

pub use state::AppState;
