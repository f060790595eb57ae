//! Declarative field validation schemas.
//!
//! A [`Schema`] is an ordered set of named fields, each with an ordered rule
//! list. Validation is a pure function of (schema, values): rules run in
//! declaration order and the first failing rule per field wins, so a message
//! never concatenates with another.
//!
//! Schema construction is where programmer errors surface: an equality rule
//! referencing an unknown field, an invalid pattern, or a duplicate field
//! fails [`SchemaBuilder::build`] - never a validation call.

use std::collections::BTreeMap;

use regex::Regex;
use thiserror::Error;

/// Field names are schema-defined compile-time constants.
pub type FieldName = &'static str;

/// Current form values, keyed by schema field name.
pub type FormValues = BTreeMap<FieldName, String>;

/// Validation outcome: field name to first-violated-rule message.
pub type FieldErrors = BTreeMap<FieldName, String>;

/// Errors detectable at schema construction time.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The same field was declared twice.
    #[error("duplicate field {0:?}")]
    DuplicateField(FieldName),

    /// A rule was added before any field was declared.
    #[error("rule declared before any field")]
    RuleOutsideField,

    /// An equality rule references a field the schema does not declare.
    #[error("field {field:?} references unknown field {other:?}")]
    UnknownFieldReference {
        field: FieldName,
        other: FieldName,
    },

    /// A pattern rule holds an invalid regular expression.
    #[error("field {field:?} has an invalid pattern: {source}")]
    InvalidPattern {
        field: FieldName,
        source: regex::Error,
    },
}

enum Rule {
    Required { message: String },
    MinLen { min: usize, message: String },
    MaxLen { max: usize, message: String },
    Pattern { pattern: Regex, message: String },
    EqualsField { other: FieldName, message: String },
}

struct Field {
    name: FieldName,
    rules: Vec<Rule>,
}

/// A validation schema over named string fields.
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Start building a schema.
    #[must_use]
    pub const fn builder() -> SchemaBuilder {
        SchemaBuilder {
            fields: Vec::new(),
            error: None,
        }
    }

    /// The declared field names, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// Whether the schema declares `name`.
    #[must_use]
    pub fn contains(&self, name: FieldName) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    /// Validate every field in one pass.
    ///
    /// # Errors
    ///
    /// Returns the full error map when any field is invalid.
    pub fn validate_all(&self, values: &FormValues) -> Result<(), FieldErrors> {
        let errors: FieldErrors = self
            .fields
            .iter()
            .filter_map(|field| {
                check_field(field, values).map(|message| (field.name, message))
            })
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validate only `name`, seeing the full value object.
    ///
    /// Cross-field rules depend on sibling values, so the whole map is
    /// consulted even though only this field's outcome is reported. A name
    /// the schema does not declare is never invalid.
    ///
    /// # Errors
    ///
    /// Returns the field's first-violated-rule message.
    pub fn validate_field(&self, values: &FormValues, name: FieldName) -> Result<(), String> {
        match self.fields.iter().find(|field| field.name == name) {
            Some(field) => match check_field(field, values) {
                Some(message) => Err(message),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }

    /// Validate a projection of the schema: only the named subset.
    ///
    /// Used by step gates in multi-step forms, where one step owns a subset
    /// of the fields but shares the value object with the others.
    ///
    /// # Errors
    ///
    /// Returns the error map restricted to `subset`.
    pub fn validate_fields(
        &self,
        values: &FormValues,
        subset: &[FieldName],
    ) -> Result<(), FieldErrors> {
        let errors: FieldErrors = self
            .fields
            .iter()
            .filter(|field| subset.contains(&field.name))
            .filter_map(|field| {
                check_field(field, values).map(|message| (field.name, message))
            })
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// First violated rule for a field, if any.
///
/// Empty values fail only `Required`: every other rule skips them, which is
/// how an optional-but-validated field (a phone number, say) passes when
/// left blank.
fn check_field(field: &Field, values: &FormValues) -> Option<String> {
    let value = values.get(field.name).map_or("", String::as_str);

    for rule in &field.rules {
        match rule {
            Rule::Required { message } => {
                if value.is_empty() {
                    return Some(message.clone());
                }
            }
            Rule::MinLen { min, message } => {
                if !value.is_empty() && value.chars().count() < *min {
                    return Some(message.clone());
                }
            }
            Rule::MaxLen { max, message } => {
                if value.chars().count() > *max {
                    return Some(message.clone());
                }
            }
            Rule::Pattern { pattern, message } => {
                if !value.is_empty() && !pattern.is_match(value) {
                    return Some(message.clone());
                }
            }
            Rule::EqualsField { other, message } => {
                let sibling = values.get(*other).map_or("", String::as_str);
                if !value.is_empty() && value != sibling {
                    return Some(message.clone());
                }
            }
        }
    }

    None
}

/// Rules as declared, before patterns are compiled.
enum BuilderRule {
    Required { message: String },
    MinLen { min: usize, message: String },
    MaxLen { max: usize, message: String },
    Pattern { pattern: String, message: String },
    EqualsField { other: FieldName, message: String },
}

struct BuilderField {
    name: FieldName,
    rules: Vec<BuilderRule>,
}

/// Builder for [`Schema`].
///
/// Rule methods apply to the most recently declared field. Misuse is
/// collected and reported by [`SchemaBuilder::build`], keeping the fluent
/// chain panic-free.
pub struct SchemaBuilder {
    fields: Vec<BuilderField>,
    error: Option<SchemaError>,
}

impl SchemaBuilder {
    /// Declare a new field. Subsequent rule calls attach to it.
    #[must_use]
    pub fn field(mut self, name: FieldName) -> Self {
        if self.fields.iter().any(|field| field.name == name) {
            self.error.get_or_insert(SchemaError::DuplicateField(name));
            return self;
        }
        self.fields.push(BuilderField {
            name,
            rules: Vec::new(),
        });
        self
    }

    /// The field must not be empty.
    #[must_use]
    pub fn required(self, message: &str) -> Self {
        self.push_rule(BuilderRule::Required {
            message: message.to_owned(),
        })
    }

    /// The field, when present, must have at least `min` characters.
    #[must_use]
    pub fn min_len(self, min: usize, message: &str) -> Self {
        self.push_rule(BuilderRule::MinLen {
            min,
            message: message.to_owned(),
        })
    }

    /// The field must have at most `max` characters.
    #[must_use]
    pub fn max_len(self, max: usize, message: &str) -> Self {
        self.push_rule(BuilderRule::MaxLen {
            max,
            message: message.to_owned(),
        })
    }

    /// The field, when present, must match `pattern` (compiled at build).
    #[must_use]
    pub fn pattern(self, pattern: &str, message: &str) -> Self {
        self.push_rule(BuilderRule::Pattern {
            pattern: pattern.to_owned(),
            message: message.to_owned(),
        })
    }

    /// The field, when present, must equal the named sibling field.
    #[must_use]
    pub fn equals_field(self, other: FieldName, message: &str) -> Self {
        self.push_rule(BuilderRule::EqualsField {
            other,
            message: message.to_owned(),
        })
    }

    /// Finish the schema.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for any construction-time defect: builder
    /// misuse, a duplicate field, a dangling equality reference, or an
    /// invalid pattern.
    pub fn build(self) -> Result<Schema, SchemaError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let names: Vec<FieldName> = self.fields.iter().map(|field| field.name).collect();

        let mut fields = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            let mut rules = Vec::with_capacity(field.rules.len());
            for rule in field.rules {
                rules.push(match rule {
                    BuilderRule::Required { message } => Rule::Required { message },
                    BuilderRule::MinLen { min, message } => Rule::MinLen { min, message },
                    BuilderRule::MaxLen { max, message } => Rule::MaxLen { max, message },
                    BuilderRule::Pattern { pattern, message } => {
                        // Compile now so an invalid pattern fails construction.
                        let pattern = Regex::new(&pattern).map_err(|source| {
                            SchemaError::InvalidPattern {
                                field: field.name,
                                source,
                            }
                        })?;
                        Rule::Pattern { pattern, message }
                    }
                    BuilderRule::EqualsField { other, message } => {
                        if !names.contains(&other) {
                            return Err(SchemaError::UnknownFieldReference {
                                field: field.name,
                                other,
                            });
                        }
                        Rule::EqualsField { other, message }
                    }
                });
            }
            rules.shrink_to_fit();
            fields.push(Field {
                name: field.name,
                rules,
            });
        }

        Ok(Schema { fields })
    }

    fn push_rule(mut self, rule: BuilderRule) -> Self {
        match self.fields.last_mut() {
            Some(field) => field.rules.push(rule),
            None => {
                self.error.get_or_insert(SchemaError::RuleOutsideField);
            }
        }
        self
    }
}
