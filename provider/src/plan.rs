//! Plan helpers on top of the SDK schema.
//!
//! The SDK validates types and required attributes and diffs states. These
//! helpers add what a plan needs beyond that: defaults for unset optional
//! attributes, enumerated string values, and computed attributes that keep
//! their prior value.

use hemmer_provider_sdk::schema::{Attribute, Diagnostic, DiagnosticSeverity, Schema};
use hemmer_provider_sdk::ProviderError;
use serde_json::{Map, Value};

pub fn is_configurable(attribute: &Attribute) -> bool {
    attribute.flags.required || attribute.flags.optional
}

/// Planned values for a configuration.
///
/// Configurable attributes take the configured value, else their default.
/// Computed-only attributes are null until the provider sets them. Keys
/// outside the schema are dropped.
pub fn planned_from_config(schema: &Schema, config: &Value) -> Map<String, Value> {
    schema
        .block
        .attributes
        .iter()
        .map(|(name, attribute)| {
            let value = if is_configurable(attribute) {
                config
                    .get(name)
                    .filter(|value| !value.is_null())
                    .or(attribute.default.as_ref())
                    .cloned()
                    .unwrap_or(Value::Null)
            } else {
                Value::Null
            };
            (name.clone(), value)
        })
        .collect()
}

/// Whether every configurable attribute of `planned` equals `prior`.
pub fn configuration_unchanged(schema: &Schema, prior: &Value, planned: &Map<String, Value>) -> bool {
    schema
        .block
        .attributes
        .iter()
        .filter(|(_, attribute)| is_configurable(attribute))
        .all(|(name, _)| prior.get(name).unwrap_or(&Value::Null) == planned.get(name).unwrap_or(&Value::Null))
}

/// Carry prior values of `names` into the plan. For attributes the server
/// sets once and an update never changes.
pub fn use_state_for_unknown(planned: &mut Map<String, Value>, prior: &Value, names: &[&str]) {
    for name in names {
        if let Some(value) = prior.get(*name).filter(|value| !value.is_null()) {
            planned.insert((*name).to_string(), value.clone());
        }
    }
}

/// Error when the string at `name` is set and not one of `allowed`.
pub fn check_one_of(config: &Value, name: &str, allowed: &[&str]) -> Option<Diagnostic> {
    let value = config.get(name)?.as_str()?;
    if allowed.contains(&value) {
        return None;
    }
    Some(
        Diagnostic::error("Invalid Attribute Value Match")
            .with_detail(format!("Attribute {name} value must be one of: {allowed:?}, got: {value:?}"))
            .with_attribute(name),
    )
}

/// Fail with every error diagnostic joined into one validation error.
pub fn into_result(diagnostics: Vec<Diagnostic>) -> Result<(), ProviderError> {
    let errors: Vec<String> = diagnostics
        .iter()
        .filter(|diag| diag.severity == DiagnosticSeverity::Error)
        .map(describe)
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::Validation(errors.join("; ")))
    }
}

fn describe(diag: &Diagnostic) -> String {
    let mut text = diag.summary.clone();
    if let Some(attribute) = &diag.attribute {
        text.push_str(&format!(" (at {attribute})"));
    }
    if let Some(detail) = &diag.detail {
        text.push_str(&format!(": {detail}"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("name", Attribute::required_string())
            .with_attribute("size", Attribute::optional_string().with_default(json!("small")))
    }

    #[test]
    fn planned_values_fill_defaults_and_null_computed() {
        let planned = planned_from_config(&schema(), &json!({"name": "a", "extra": 1}));
        assert_eq!(Value::Object(planned), json!({"id": null, "name": "a", "size": "small"}));

        let planned = planned_from_config(&schema(), &json!({"name": "a", "size": null}));
        assert_eq!(planned["size"], json!("small"));
    }

    #[test]
    fn unchanged_ignores_computed_attributes() {
        let prior = json!({"id": "1", "name": "a", "size": "small"});
        let planned = planned_from_config(&schema(), &json!({"name": "a"}));
        assert!(configuration_unchanged(&schema(), &prior, &planned));

        let planned = planned_from_config(&schema(), &json!({"name": "b"}));
        assert!(!configuration_unchanged(&schema(), &prior, &planned));
    }

    #[test]
    fn prior_values_fill_stable_attributes() {
        let mut planned = planned_from_config(&schema(), &json!({"name": "b"}));
        use_state_for_unknown(&mut planned, &json!({"id": "1"}), &["id", "missing"]);
        assert_eq!(planned["id"], json!("1"));
        assert!(!planned.contains_key("missing"));
    }

    #[test]
    fn one_of_skips_unset_values() {
        assert!(check_one_of(&json!({}), "size", &["small"]).is_none());
        assert!(check_one_of(&json!({"size": null}), "size", &["small"]).is_none());
        assert!(check_one_of(&json!({"size": "small"}), "size", &["small"]).is_none());

        let diag = check_one_of(&json!({"size": "huge"}), "size", &["small"]).unwrap();
        assert_eq!(diag.summary, "Invalid Attribute Value Match");
        assert_eq!(diag.attribute.as_deref(), Some("size"));
    }

    #[test]
    fn errors_join_into_one_validation_error() {
        assert!(into_result(vec![Diagnostic::warning("careful")]).is_ok());

        let err = into_result(vec![
            Diagnostic::error("first").with_attribute("a"),
            Diagnostic::error("second").with_detail("why"),
        ])
        .unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
        assert_eq!(err.message(), "first (at a); second: why");
    }
}
