//! Turning raw authoring responses into schemas.

use crate::error::ParseError;
use crate::schema::{CacheKey, FieldSpec, Schema, SchemaOrigin};
use indexmap::IndexMap;
use log::warn;
use serde_json::{Map, Value};

/// Keys that describe a field entry rather than parameterize it.
const ENTRY_KEYS: &[&str] = &[
    "faker_method",
    "method",
    "type",
    "parameters",
    "params",
    "description",
];

const CHOICE_METHODS: &[&str] = &[
    "random_element",
    "random_elements",
    "random_choices",
    "random_choice",
];

/// Parses authoring responses in the shapes models actually produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Parse `text` into a validated schema for `key`.
    ///
    /// Invalid field entries are skipped as long as at least one field
    /// survives.
    pub fn parse(text: &str, key: &CacheKey, origin: SchemaOrigin) -> Result<Schema, ParseError> {
        let json = extract_json_object(text).ok_or(ParseError::NotJson)?;
        let value: Value =
            serde_json::from_str(json).map_err(|err| ParseError::InvalidJson(err.to_string()))?;
        let Value::Object(root) = value else {
            return Err(ParseError::NotAnObject);
        };

        let domain = root
            .get("domain")
            .and_then(Value::as_str)
            .map(|domain| domain.trim().to_lowercase())
            .filter(|domain| !domain.is_empty())
            .unwrap_or_else(|| "general".to_string());

        let wrapped = ["fields", "schema"]
            .iter()
            .find_map(|name| root.get(*name).and_then(Value::as_object));
        let entries: Vec<(&String, &Value)> = match wrapped {
            Some(fields) => fields.iter().collect(),
            None => root
                .iter()
                .filter(|(name, value)| !(name.as_str() == "domain" && value.is_string()))
                .collect(),
        };

        let mut fields = IndexMap::new();
        let mut first_error = None;
        for (name, entry) in entries {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            match parse_field(name, entry) {
                Ok(spec) => {
                    fields.insert(name.to_string(), spec);
                }
                Err(err) => {
                    warn!("skipping invalid field in authoring response (field={name}): {err}");
                    first_error.get_or_insert(err);
                }
            }
        }

        if fields.is_empty() {
            return Err(first_error.unwrap_or(ParseError::NoFields));
        }
        let schema = Schema::new(key.clone(), domain, fields, origin);
        schema.validate()?;
        Ok(schema)
    }
}

fn parse_field(name: &str, entry: &Value) -> Result<FieldSpec, ParseError> {
    let invalid = |reason: &str| ParseError::InvalidField {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let map = match entry {
        Value::String(method) if !method.trim().is_empty() => {
            return Ok(FieldSpec::native(method.trim()));
        }
        Value::Object(map) => map,
        _ => return Err(invalid("expected an object or a method name")),
    };

    if map.contains_key("kind") {
        let spec: FieldSpec = serde_json::from_value(entry.clone())
            .map_err(|err| invalid(&format!("unrecognized kind: {err}")))?;
        if matches!(&spec, FieldSpec::EnumeratedChoice { choices, .. } if choices.is_empty()) {
            return Err(invalid("choices must not be empty"));
        }
        if spec.method().is_some_and(|method| method.trim().is_empty()) {
            return Err(invalid("method must not be empty"));
        }
        return Ok(spec);
    }

    let description = map
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Some(choices) = map.get("choices").and_then(Value::as_array) {
        if choices.is_empty() {
            return Err(invalid("choices must not be empty"));
        }
        return Ok(with_description(
            FieldSpec::choice(choices.iter().cloned()),
            description,
        ));
    }

    let method = ["faker_method", "method", "type"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|method| !method.is_empty())
        .ok_or_else(|| invalid("missing faker_method"))?;

    let mut params = Map::new();
    for key in ["parameters", "params"] {
        if let Some(Value::Object(nested)) = map.get(key) {
            params.extend(nested.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
    for (key, value) in map {
        if !ENTRY_KEYS.contains(&key.as_str()) {
            params.insert(key.clone(), value.clone());
        }
    }

    if CHOICE_METHODS.contains(&method.to_ascii_lowercase().as_str()) {
        if let Some(elements) = params.get("elements").and_then(Value::as_array) {
            if !elements.is_empty() {
                return Ok(with_description(
                    FieldSpec::choice(elements.iter().cloned()),
                    description,
                ));
            }
        }
    }

    let spec = if params.is_empty() {
        FieldSpec::native(method)
    } else {
        FieldSpec::parameterized(method, params)
    };
    Ok(with_description(spec, description))
}

fn with_description(spec: FieldSpec, description: Option<String>) -> FieldSpec {
    match description {
        Some(text) => spec.with_description(text),
        None => spec,
    }
}

/// Locate the first balanced JSON object, looking past code fences and prose.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    // Unbalanced: hand the tail to serde so the error names the problem.
    Some(&text[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::ContentHasher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(text: &str) -> Result<Schema, ParseError> {
        ResponseParser::parse(text, &ContentHasher::hash("test"), SchemaOrigin::Authored)
    }

    #[test]
    fn parses_tagged_top_level_shape() {
        let schema = parse(r#"{"name":{"kind":"NativeMethod","method":"productName"}}"#)
            .expect("schema");
        assert_eq!(schema.field_names(), vec!["name"]);
        assert_eq!(schema.fields["name"], FieldSpec::native("productName"));
        assert_eq!(schema.domain, "general");
    }

    #[test]
    fn parses_faker_shape_inside_code_fence() {
        let text = r#"Here you go:
```json
{
  "domain": "Retail",
  "fields": {
    "customer": {"faker_method": "name", "parameters": {}, "description": "Buyer"},
    "total": {"faker_method": "pydecimal", "parameters": {"right_digits": 2}},
    "status": {"faker_method": "random_element", "parameters": {"elements": ["new", "paid"]}}
  }
}
```
Let me know if you need more."#;
        let schema = parse(text).expect("schema");
        assert_eq!(schema.domain, "retail");
        assert_eq!(schema.field_names(), vec!["customer", "total", "status"]);
        assert_eq!(
            schema.fields["customer"],
            FieldSpec::native("name").with_description("Buyer")
        );
        let mut params = Map::new();
        params.insert("right_digits".to_string(), json!(2));
        assert_eq!(
            schema.fields["total"],
            FieldSpec::parameterized("pydecimal", params)
        );
        assert_eq!(schema.fields["status"], FieldSpec::choice(["new", "paid"]));
    }

    #[test]
    fn inline_parameters_are_collected() {
        let schema = parse(
            r#"{"schema": {"rating": {"faker_method": "random_int", "min": 1, "max": 5}}}"#,
        )
        .expect("schema");
        let FieldSpec::ParameterizedMethod { method, params, .. } = &schema.fields["rating"] else {
            panic!("expected parameterized field");
        };
        assert_eq!(method, "random_int");
        assert_eq!(params.get("min"), Some(&json!(1)));
        assert_eq!(params.get("max"), Some(&json!(5)));
    }

    #[test]
    fn braces_inside_strings_do_not_end_the_object() {
        let schema = parse(r#"{"code": {"faker_method": "bothify", "text": "{##}"}} trailing }"#)
            .expect("schema");
        assert_eq!(schema.field_names(), vec!["code"]);
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let schema = parse(r#"{"ok": "email", "bad": 42, "worse": {"parameters": {}}}"#)
            .expect("schema");
        assert_eq!(schema.field_names(), vec!["ok"]);
    }

    #[test]
    fn rejects_malformed_responses() {
        assert_eq!(parse("I cannot help with that"), Err(ParseError::NotJson));
        assert!(matches!(
            parse(r#"{"name": {"faker_method": "name",}"#),
            Err(ParseError::InvalidJson(_))
        ));
        assert_eq!(parse("{}"), Err(ParseError::NoFields));
        assert!(matches!(
            parse(r#"{"tier": {"kind": "EnumeratedChoice", "choices": []}}"#),
            Err(ParseError::InvalidField { .. })
        ));
    }
}
