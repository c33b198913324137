//! Validation of change entries against an allowed-values schema.

use crate::entry::ChangeEntry;
use crate::error::{Error, Result};

/// Entry types accepted when no configuration overrides them.
pub const DEFAULT_TYPES: &[&str] = &["feature", "bugfix", "enhancement"];

/// Categories accepted when no configuration overrides them (any value).
pub const DEFAULT_CATEGORIES: &[&str] = &[];

/// Allowed values for the constrained entry fields.
///
/// An empty list means any non-empty value is accepted for that field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySchema {
    /// Allowed values for the `type` field.
    pub types: Vec<String>,
    /// Allowed values for the `category` field.
    pub categories: Vec<String>,
}

impl Default for EntrySchema {
    fn default() -> Self {
        Self {
            types: DEFAULT_TYPES.iter().map(ToString::to_string).collect(),
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl EntrySchema {
    /// Create a schema with explicit allowed values.
    #[must_use]
    pub fn new(types: Vec<String>, categories: Vec<String>) -> Self {
        Self { types, categories }
    }

    /// Constrained fields paired with their allowed values, in check order.
    fn constraints(&self) -> [(&'static str, &[String]); 2] {
        [
            ("type", self.types.as_slice()),
            ("category", self.categories.as_slice()),
        ]
    }
}

/// Validate an entry, collecting every violation before failing.
///
/// Allowed-value checks run first for each constrained field, followed by
/// the non-empty check for every field.
///
/// # Errors
///
/// Returns [`Error::Validation`] listing every violated rule.
pub fn validate(entry: &ChangeEntry, schema: &EntrySchema) -> Result<()> {
    let fields = entry.fields();
    let value_of = |name: &str| {
        fields
            .iter()
            .find(|(field, _)| *field == name)
            .map_or("", |(_, value)| *value)
    };

    let mut errors = Vec::new();

    for (field, allowed) in schema.constraints() {
        let value = value_of(field);
        if !allowed.is_empty() && !allowed.iter().any(|a| a == value) {
            errors.push(format!(
                "The \"{field}\" value must be one of: {}, received: \"{value}\"",
                allowed.join(", ")
            ));
        }
    }

    for (field, value) in fields {
        if value.is_empty() {
            errors.push(format!("The \"{field}\" value cannot be empty."));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(violations = errors.len(), "Change entry failed validation");
        Err(Error::validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(types: &[&str]) -> EntrySchema {
        EntrySchema::new(types.iter().map(ToString::to_string).collect(), Vec::new())
    }

    fn violations(result: Result<()>) -> Vec<String> {
        match result {
            Err(Error::Validation { errors }) => errors,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_entry_passes() {
        let entry = ChangeEntry::new("feature", "foo", "My feature");
        assert!(validate(&entry, &schema(&["feature", "bugfix"])).is_ok());
    }

    #[test]
    fn test_disallowed_type() {
        let entry = ChangeEntry::new("notafeature", "foo", "bar");
        let errors = violations(validate(&entry, &schema(&["feature", "bugfix"])));
        assert_eq!(
            errors,
            vec![
                "The \"type\" value must be one of: feature, bugfix, received: \"notafeature\""
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_empty_description() {
        let entry = ChangeEntry::new("feature", "foo", "");
        let errors = violations(validate(&entry, &schema(&["feature", "bugfix"])));
        assert_eq!(errors, vec!["The \"description\" value cannot be empty.".to_string()]);
    }

    #[test]
    fn test_every_violation_is_reported_in_order() {
        let entry = ChangeEntry::new("notafeature", "", "");
        let schema = EntrySchema::new(
            vec!["feature".to_string()],
            vec!["parser".to_string(), "lexer".to_string()],
        );
        let errors = violations(validate(&entry, &schema));
        assert_eq!(
            errors,
            vec![
                "The \"type\" value must be one of: feature, received: \"notafeature\"".to_string(),
                "The \"category\" value must be one of: parser, lexer, received: \"\"".to_string(),
                "The \"category\" value cannot be empty.".to_string(),
                "The \"description\" value cannot be empty.".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_allowed_list_accepts_any_non_empty_value() {
        let entry = ChangeEntry::new("anything", "whatever", "bar");
        assert!(validate(&entry, &schema(&[])).is_ok());

        let errors = violations(validate(&ChangeEntry::new("", "x", "y"), &schema(&[])));
        assert_eq!(errors, vec!["The \"type\" value cannot be empty.".to_string()]);
    }

    #[test]
    fn test_default_schema() {
        let schema = EntrySchema::default();
        assert_eq!(schema.types, vec!["feature", "bugfix", "enhancement"]);
        assert!(schema.categories.is_empty());
        assert!(validate(&ChangeEntry::new("enhancement", "cli", "Faster"), &schema).is_ok());
    }

    #[test]
    fn test_validation_leaves_entry_untouched() {
        let entry = ChangeEntry::new("bad", "", "");
        let before = entry.clone();
        let _ = validate(&entry, &EntrySchema::default());
        assert_eq!(entry, before);
    }
}
