//! Schema-driven form validation and state.
//!
//! - [`schema`] - declarative field rules, validated as pure functions
//! - [`controller`] - per-form values/errors/touched state with lazy-then-live
//!   validation
//! - [`schemas`] - the storefront's canonical schemas

pub mod controller;
pub mod schema;
pub mod schemas;

pub use controller::Form;
pub use schema::{FieldErrors, FieldName, FormValues, Schema, SchemaBuilder, SchemaError};
