//! Form state bound to a validation schema.
//!
//! [`Form`] wires a [`Schema`] to a values/errors/touched triple and to the
//! input events a view forwards. Validation is lazy until a field is
//! touched, then live: the error for a touched field clears or updates on
//! every subsequent change without waiting for another blur.

use std::sync::Arc;

use super::schema::{FieldErrors, FieldName, FormValues, Schema};

/// Mutable state for one mounted form.
pub struct Form {
    schema: Arc<Schema>,
    initial: FormValues,
    values: FormValues,
    errors: FieldErrors,
    touched: std::collections::BTreeSet<FieldName>,
}

impl Form {
    /// Create a form over `schema`, seeding values from `defaults`.
    ///
    /// Every schema field gets an entry; fields without a default start
    /// empty. Defaults for names the schema does not declare are ignored.
    #[must_use]
    pub fn new(
        schema: Arc<Schema>,
        defaults: impl IntoIterator<Item = (FieldName, String)>,
    ) -> Self {
        let mut initial: FormValues = schema
            .field_names()
            .map(|name| (name, String::new()))
            .collect();
        for (name, value) in defaults {
            if schema.contains(name) {
                initial.insert(name, value);
            }
        }

        Self {
            schema,
            values: initial.clone(),
            initial,
            errors: FieldErrors::new(),
            touched: std::collections::BTreeSet::new(),
        }
    }

    /// Update a field's value.
    ///
    /// Untouched fields are not validated here, so a field the user has
    /// never visited cannot grow an error from typing; once touched, the
    /// field re-validates immediately and its error clears or updates
    /// without another blur.
    pub fn set_value(&mut self, name: FieldName, value: impl Into<String>) {
        if !self.schema.contains(name) {
            tracing::debug!(field = name, "ignoring value for unknown field");
            return;
        }

        self.values.insert(name, value.into());

        if self.touched.contains(name) {
            self.revalidate_field(name);
        }
    }

    /// Mark a field touched and validate it.
    pub fn blur(&mut self, name: FieldName) {
        if !self.schema.contains(name) {
            return;
        }
        self.touched.insert(name);
        self.revalidate_field(name);
    }

    /// Validate every field in one pass, replacing the whole error map.
    ///
    /// Used to gate submission; prior touched state is irrelevant.
    pub fn submit_validate(&mut self) -> bool {
        match self.schema.validate_all(&self.values) {
            Ok(()) => {
                self.errors.clear();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Validate a subset of fields, marking them touched and replacing only
    /// their error entries. Errors outside the subset are left untouched.
    ///
    /// This is the step gate of a multi-step form: the current step's fields
    /// validate and surface errors while other steps keep theirs.
    pub fn validate_subset(&mut self, subset: &[FieldName]) -> bool {
        for &name in subset {
            if self.schema.contains(name) {
                self.touched.insert(name);
            }
        }

        match self.schema.validate_fields(&self.values, subset) {
            Ok(()) => {
                for name in subset {
                    self.errors.remove(name);
                }
                true
            }
            Err(errors) => {
                for &name in subset {
                    match errors.get(name) {
                        Some(message) => {
                            self.errors.insert(name, message.clone());
                        }
                        None => {
                            self.errors.remove(name);
                        }
                    }
                }
                false
            }
        }
    }

    /// Restore initial values, clearing errors and touched state.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
    }

    /// Current value of a field.
    #[must_use]
    pub fn value(&self, name: FieldName) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    /// All current values.
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current error message for a field, if any.
    #[must_use]
    pub fn error(&self, name: FieldName) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// All current errors.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the user has interacted with a field.
    #[must_use]
    pub fn is_touched(&self, name: FieldName) -> bool {
        self.touched.contains(name)
    }

    /// Whether no errors are currently reported.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The schema this form validates against.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn revalidate_field(&mut self, name: FieldName) {
        match self.schema.validate_field(&self.values, name) {
            Ok(()) => {
                self.errors.remove(name);
            }
            Err(message) => {
                self.errors.insert(name, message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::forms::schema::Schema;

    fn email_password_form() -> Form {
        let schema = Schema::builder()
            .field("email")
            .required("Email is required")
            .pattern(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", "Enter a valid email address")
            .field("password")
            .required("Password is required")
            .min_len(6, "Password must be at least 6 characters")
            .build()
            .expect("valid schema");
        Form::new(Arc::new(schema), [])
    }

    #[test]
    fn test_untouched_fields_are_not_validated_on_change() {
        let mut form = email_password_form();

        form.set_value("email", "not-an-email");

        assert!(form.error("email").is_none());
        assert!(!form.is_touched("email"));
    }

    #[test]
    fn test_blur_touches_and_validates() {
        let mut form = email_password_form();

        form.blur("email");

        assert!(form.is_touched("email"));
        assert_eq!(form.error("email"), Some("Email is required"));
    }

    #[test]
    fn test_touched_field_revalidates_live() {
        let mut form = email_password_form();

        // Blur on the empty field reports it; typing a valid address then
        // clears the error with no further blur.
        form.blur("email");
        assert!(form.error("email").is_some());

        form.set_value("email", "a@b.com");
        assert!(form.error("email").is_none());

        form.set_value("email", "broken");
        assert_eq!(form.error("email"), Some("Enter a valid email address"));
    }

    #[test]
    fn test_submit_validate_replaces_error_map() {
        let mut form = email_password_form();
        form.set_value("email", "a@b.com");

        assert!(!form.submit_validate());
        assert!(form.error("email").is_none());
        assert_eq!(form.error("password"), Some("Password is required"));

        form.set_value("password", "secret1");
        assert!(form.submit_validate());
        assert!(form.is_valid());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let schema = Schema::builder()
            .field("email")
            .required("Email is required")
            .build()
            .expect("valid schema");
        let mut form = Form::new(
            Arc::new(schema),
            [("email", "seed@velora.example".to_owned())],
        );

        form.set_value("email", "changed@velora.example");
        form.blur("email");
        form.reset();

        assert_eq!(form.value("email"), "seed@velora.example");
        assert!(form.errors().is_empty());
        assert!(!form.is_touched("email"));
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let mut form = email_password_form();

        form.set_value("stray", "value");
        form.blur("stray");

        assert!(form.values().get("stray").is_none());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_validate_subset_keeps_foreign_errors() {
        let mut form = email_password_form();

        // A failed submit leaves errors on both fields.
        assert!(!form.submit_validate());
        assert!(form.error("password").is_some());

        // Fixing and re-validating only the email leaves the password error.
        form.set_value("email", "a@b.com");
        assert!(form.validate_subset(&["email"]));
        assert!(form.error("email").is_none());
        assert!(form.error("password").is_some());
    }

    #[test]
    fn test_validate_subset_marks_touched() {
        let mut form = email_password_form();

        assert!(!form.validate_subset(&["email"]));
        assert!(form.is_touched("email"));
        assert!(!form.is_touched("password"));

        // Touched via the gate, so edits now live-validate.
        form.set_value("email", "a@b.com");
        assert!(form.error("email").is_none());
    }
}
