//! Schema-driven form derivation and input coercion.
//!
//! An elicitation schema is a JSON-Schema-like object description. No fixed
//! structure is known at compile time, so the schema maps to a tagged
//! [`FieldDescriptor`] sequence plus two pure functions:
//!
//! - [`derive_fields`] turns a schema into the ordered list of fields a
//!   rendering surface should display.
//! - [`coerce`] turns the string-keyed raw input a plain form surface can
//!   produce back into typed content satisfying the schema.
//!
//! Both functions are total. Malformed schema fragments degrade (a missing
//! `type` renders as text) and unparseable numeric input falls back to zero,
//! so a partially specified schema or an incomplete submission never aborts
//! the flow.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of input a field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form text input.
    Text,
    /// Floating-point numeric input.
    Number,
    /// Integer numeric input.
    Integer,
    /// Boolean checkbox input.
    Boolean,
    /// Selection from a fixed set of choices.
    Choice,
}

/// A single renderable field derived from an elicitation schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Property name in the schema.
    pub name: String,
    /// Input kind.
    pub kind: FieldKind,
    /// Human-readable description. Falls back to the property name.
    pub description: String,
    /// Whether the schema lists this field as required.
    pub required: bool,
    /// Allowed choices, in schema order. Empty unless `kind` is
    /// [`FieldKind::Choice`].
    pub choices: Vec<String>,
}

/// Derive the ordered field list from an elicitation schema.
///
/// Fields follow the schema's property declaration order. A schema without
/// an object-valued `properties` entry yields no fields.
#[must_use]
pub fn derive_fields(schema: &Value) -> Vec<FieldDescriptor> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    let required = required_names(schema);

    properties
        .iter()
        .map(|(name, prop)| {
            let kind = field_kind(prop);
            let choices = if kind == FieldKind::Choice {
                enum_choices(prop)
            } else {
                Vec::new()
            };
            let description = prop
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string();
            FieldDescriptor {
                name: name.clone(),
                kind,
                description,
                required: required.contains(&name.as_str()),
                choices,
            }
        })
        .collect()
}

/// Coerce raw string-keyed form input into typed content for the schema.
///
/// For each key present in `raw`: boolean fields map the literal `"true"` to
/// `true` and anything else to `false`; numeric fields parse as `f64` and
/// silently fall back to zero; everything else passes through as a string.
/// Keys absent from `raw` are omitted, not defaulted. The result is never
/// larger than `raw`.
#[must_use]
pub fn coerce(raw: &HashMap<String, String>, schema: &Value) -> Map<String, Value> {
    let empty = Map::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut content = Map::new();
    // Schema-declared fields first, in declaration order.
    for (name, prop) in properties {
        if let Some(value) = raw.get(name) {
            content.insert(name.clone(), coerce_value(value, field_kind(prop)));
        }
    }
    // Raw keys the schema does not describe pass through as strings.
    for (name, value) in raw {
        if !properties.contains_key(name) {
            content.insert(name.clone(), Value::String(value.clone()));
        }
    }
    content
}

fn required_names(schema: &Value) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn field_kind(prop: &Value) -> FieldKind {
    if prop.get("enum").and_then(Value::as_array).is_some() {
        return FieldKind::Choice;
    }
    match prop.get("type").and_then(Value::as_str) {
        Some("boolean") => FieldKind::Boolean,
        Some("number") => FieldKind::Number,
        Some("integer") => FieldKind::Integer,
        // Missing or unknown kinds render as plain text.
        _ => FieldKind::Text,
    }
}

fn enum_choices(prop: &Value) -> Vec<String> {
    prop.get("enum")
        .and_then(Value::as_array)
        .map(|choices| {
            choices
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn coerce_value(raw: &str, kind: FieldKind) -> Value {
    match kind {
        FieldKind::Boolean => Value::Bool(raw == "true"),
        FieldKind::Number | FieldKind::Integer => {
            let parsed = raw.parse::<f64>().unwrap_or(0.0);
            serde_json::Number::from_f64(parsed)
                .map_or_else(|| Value::Number(0.into()), Value::Number)
        },
        FieldKind::Text | FieldKind::Choice => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Multi-field form mirroring the demo server's preferences fixture.
    fn preferences_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "favorite_color": {"type": "string", "description": "Your favorite color"},
                "age": {"type": "integer", "description": "Your age"},
                "likes_mcp": {"type": "boolean", "description": "Do you like MCP?"},
                "comments": {"type": "string", "description": "Any additional comments (optional)"}
            },
            "required": ["favorite_color", "age", "likes_mcp"]
        })
    }

    fn enum_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "value": {"enum": ["red", "green", "blue", "yellow", "purple", "orange"]}
            },
            "required": ["value"]
        })
    }

    fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn derive_fields_follows_declaration_order() {
        let fields = derive_fields(&preferences_schema());
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["favorite_color", "age", "likes_mcp", "comments"]);
    }

    #[test]
    fn derive_fields_kinds_and_requiredness() {
        let fields = derive_fields(&preferences_schema());
        assert_eq!(fields[0].kind, FieldKind::Text);
        assert_eq!(fields[1].kind, FieldKind::Integer);
        assert_eq!(fields[2].kind, FieldKind::Boolean);
        assert!(fields[0].required);
        assert!(fields[2].required);
        assert!(!fields[3].required);
    }

    #[test]
    fn derive_fields_enum_choices_ordered() {
        let fields = derive_fields(&enum_schema());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].kind, FieldKind::Choice);
        assert_eq!(
            fields[0].choices,
            ["red", "green", "blue", "yellow", "purple", "orange"]
        );
    }

    #[test]
    fn derive_fields_missing_kind_defaults_to_text() {
        let schema = json!({"properties": {"anything": {}}});
        let fields = derive_fields(&schema);
        assert_eq!(fields[0].kind, FieldKind::Text);
    }

    #[test]
    fn derive_fields_unknown_kind_defaults_to_text() {
        let schema = json!({"properties": {"blob": {"type": "array"}}});
        assert_eq!(derive_fields(&schema)[0].kind, FieldKind::Text);
    }

    #[test]
    fn derive_fields_description_falls_back_to_name() {
        let schema = json!({"properties": {"name": {"type": "string"}}});
        assert_eq!(derive_fields(&schema)[0].description, "name");
    }

    #[test]
    fn derive_fields_tolerates_malformed_schema() {
        assert!(derive_fields(&json!("not an object")).is_empty());
        assert!(derive_fields(&json!({"properties": 42})).is_empty());
        assert!(derive_fields(&Value::Null).is_empty());
    }

    #[test]
    fn coerce_typed_round_trip() {
        let content = coerce(
            &raw(&[
                ("favorite_color", "teal"),
                ("age", "42"),
                ("likes_mcp", "true"),
                ("comments", "none"),
            ]),
            &preferences_schema(),
        );
        assert_eq!(content["favorite_color"], json!("teal"));
        assert_eq!(content["age"], json!(42.0));
        assert_eq!(content["likes_mcp"], json!(true));
        assert_eq!(content["comments"], json!("none"));
    }

    #[test]
    fn coerce_boolean_anything_else_is_false() {
        let schema = json!({"properties": {"flag": {"type": "boolean"}}});
        assert_eq!(coerce(&raw(&[("flag", "yes")]), &schema)["flag"], json!(false));
        assert_eq!(coerce(&raw(&[("flag", "True")]), &schema)["flag"], json!(false));
        assert_eq!(coerce(&raw(&[("flag", "true")]), &schema)["flag"], json!(true));
    }

    #[test]
    fn coerce_unparseable_number_is_zero() {
        let schema = json!({"properties": {"age": {"type": "number"}}});
        assert_eq!(coerce(&raw(&[("age", "not a number")]), &schema)["age"], json!(0.0));
        assert_eq!(coerce(&raw(&[("age", "")]), &schema)["age"], json!(0.0));
    }

    #[test]
    fn coerce_non_finite_number_is_zero() {
        let schema = json!({"properties": {"x": {"type": "number"}}});
        assert_eq!(coerce(&raw(&[("x", "NaN")]), &schema)["x"], json!(0));
        assert_eq!(coerce(&raw(&[("x", "inf")]), &schema)["x"], json!(0));
    }

    #[test]
    fn coerce_absent_fields_are_omitted() {
        let content = coerce(&raw(&[("favorite_color", "red")]), &preferences_schema());
        assert_eq!(content.len(), 1);
        assert!(!content.contains_key("age"));
        assert!(!content.contains_key("likes_mcp"));
    }

    #[test]
    fn coerce_enum_passes_through_as_string() {
        let content = coerce(&raw(&[("value", "green")]), &enum_schema());
        assert_eq!(content["value"], json!("green"));
    }

    #[test]
    fn coerce_undeclared_keys_pass_through() {
        let content = coerce(&raw(&[("mystery", "42")]), &preferences_schema());
        assert_eq!(content["mystery"], json!("42"));
    }

    #[test]
    fn coerce_never_exceeds_raw_size() {
        let input = raw(&[("favorite_color", "red"), ("age", "3")]);
        let content = coerce(&input, &preferences_schema());
        assert!(content.len() <= input.len());
    }

    #[test]
    fn full_round_trip_per_field_kind() {
        // derive_fields -> synthesized surface input -> coerce recovers
        // a value of the right kind for every field kind tested.
        let schema = json!({
            "properties": {
                "s": {"type": "string"},
                "n": {"type": "number"},
                "b": {"type": "boolean"},
                "e": {"enum": ["a", "b"]}
            }
        });
        let fields = derive_fields(&schema);
        let mut input = HashMap::new();
        for field in &fields {
            let value = match field.kind {
                FieldKind::Text => "hello",
                FieldKind::Number | FieldKind::Integer => "1.5",
                FieldKind::Boolean => "true",
                FieldKind::Choice => field.choices[0].as_str(),
            };
            input.insert(field.name.clone(), value.to_string());
        }
        let content = coerce(&input, &schema);
        assert!(content["s"].is_string());
        assert!(content["n"].is_number());
        assert!(content["b"].is_boolean());
        assert_eq!(content["e"], json!("a"));
    }
}
