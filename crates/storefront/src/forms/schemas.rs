//! Canonical validation schemas for the storefront's forms.
//!
//! Schemas are built once, at first use. Construction failures are
//! programmer errors (a typo in a cross-field reference, a bad pattern) and
//! fail fast here rather than surfacing mid-checkout.

use std::sync::{Arc, LazyLock};

use super::schema::{FieldName, Schema};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const PHONE_PATTERN: &str = r"^(\+90|0)?[0-9]{10}$";
const POSTAL_CODE_PATTERN: &str = r"^[0-9]{5}$";
const CARD_NUMBER_PATTERN: &str = r"^[0-9]{16}$";
const EXPIRY_PATTERN: &str = r"^(0[1-9]|1[0-2])/([0-9]{2})$";
const CVV_PATTERN: &str = r"^[0-9]{3,4}$";

/// Checkout fields, grouped by the step that owns them.
pub mod checkout_fields {
    use super::FieldName;

    pub const IDENTITY: &[FieldName] = &["first_name", "last_name", "email", "phone"];
    pub const ADDRESS: &[FieldName] = &["street", "city", "postal_code"];
    pub const PAYMENT: &[FieldName] = &["card_holder", "card_number", "expiry_date", "cvv"];
}

static LOGIN: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let schema = Schema::builder()
        .field("email")
        .required("Email is required")
        .pattern(EMAIL_PATTERN, "Enter a valid email address")
        .field("password")
        .required("Password is required")
        .min_len(6, "Password must be at least 6 characters")
        .build()
        .expect("login schema is well-formed");
    Arc::new(schema)
});

static REGISTER: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let schema = Schema::builder()
        .field("first_name")
        .required("First name is required")
        .min_len(2, "First name must be at least 2 characters")
        .max_len(50, "First name must be at most 50 characters")
        .field("last_name")
        .required("Last name is required")
        .min_len(2, "Last name must be at least 2 characters")
        .max_len(50, "Last name must be at most 50 characters")
        .field("email")
        .required("Email is required")
        .pattern(EMAIL_PATTERN, "Enter a valid email address")
        .field("password")
        .required("Password is required")
        .min_len(8, "Password must be at least 8 characters")
        .pattern(r"[a-z]", "Password must contain a lowercase letter")
        .pattern(r"[A-Z]", "Password must contain an uppercase letter")
        .pattern(r"[0-9]", "Password must contain a digit")
        .field("confirm_password")
        .required("Password confirmation is required")
        .equals_field("password", "Passwords do not match")
        .build()
        .expect("register schema is well-formed");
    Arc::new(schema)
});

static CHECKOUT: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let schema = Schema::builder()
        // Identity
        .field("first_name")
        .required("First name is required")
        .min_len(2, "First name must be at least 2 characters")
        .field("last_name")
        .required("Last name is required")
        .min_len(2, "Last name must be at least 2 characters")
        .field("email")
        .required("Email is required")
        .pattern(EMAIL_PATTERN, "Enter a valid email address")
        .field("phone")
        .required("Phone number is required")
        .pattern(PHONE_PATTERN, "Enter a valid phone number")
        // Address
        .field("street")
        .required("Address is required")
        .min_len(10, "Address must be at least 10 characters")
        .field("city")
        .required("City is required")
        .field("postal_code")
        .required("Postal code is required")
        .pattern(POSTAL_CODE_PATTERN, "Postal code must be 5 digits")
        // Payment
        .field("card_holder")
        .required("Card holder name is required")
        .min_len(2, "Card holder name must be at least 2 characters")
        .field("card_number")
        .required("Card number is required")
        .pattern(CARD_NUMBER_PATTERN, "Card number must be 16 digits")
        .field("expiry_date")
        .required("Expiry date is required")
        .pattern(EXPIRY_PATTERN, "Enter a valid date (MM/YY)")
        .field("cvv")
        .required("CVV is required")
        .pattern(CVV_PATTERN, "CVV must be 3 or 4 digits")
        .build()
        .expect("checkout schema is well-formed");
    Arc::new(schema)
});

static ADDRESS: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let schema = Schema::builder()
        .field("title")
        .required("Address title is required")
        .max_len(50, "Address title must be at most 50 characters")
        .field("full_name")
        .required("Full name is required")
        .min_len(2, "Full name must be at least 2 characters")
        .field("phone")
        .required("Phone number is required")
        .pattern(PHONE_PATTERN, "Enter a valid phone number")
        .field("street")
        .required("Address is required")
        .min_len(10, "Address must be at least 10 characters")
        .field("city")
        .required("City is required")
        .field("district")
        .required("District is required")
        .field("postal_code")
        .required("Postal code is required")
        .pattern(POSTAL_CODE_PATTERN, "Postal code must be 5 digits")
        .build()
        .expect("address schema is well-formed");
    Arc::new(schema)
});

static PROFILE: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let schema = Schema::builder()
        .field("full_name")
        .required("Full name is required")
        .min_len(2, "Full name must be at least 2 characters")
        .max_len(100, "Full name must be at most 100 characters")
        .field("email")
        .required("Email is required")
        .pattern(EMAIL_PATTERN, "Enter a valid email address")
        .field("phone")
        .pattern(PHONE_PATTERN, "Enter a valid phone number")
        .build()
        .expect("profile schema is well-formed");
    Arc::new(schema)
});

/// Login form schema.
#[must_use]
pub fn login() -> Arc<Schema> {
    Arc::clone(&LOGIN)
}

/// Registration form schema.
#[must_use]
pub fn register() -> Arc<Schema> {
    Arc::clone(&REGISTER)
}

/// Multi-step checkout schema (identity, address, payment fields).
#[must_use]
pub fn checkout() -> Arc<Schema> {
    Arc::clone(&CHECKOUT)
}

/// Address-book entry schema.
#[must_use]
pub fn address() -> Arc<Schema> {
    Arc::clone(&ADDRESS)
}

/// Profile form schema; phone is optional but validated when present.
#[must_use]
pub fn profile() -> Arc<Schema> {
    Arc::clone(&PROFILE)
}
