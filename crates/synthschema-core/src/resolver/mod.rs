//! Binding field specs to value-producing rules.
//!
//! Resolution never fails. An unknown method degrades, in order, to a
//! domain vocabulary named by the method, a vocabulary matched by the field
//! name, a field-name heuristic, and finally a placeholder choice over
//! `<field>_1` … `<field>_5`.

mod catalog;
mod params;
mod vocab;
mod words;

pub use catalog::methods as catalog_methods;
pub use params::{Params, parse_date};

use crate::schema::FieldSpec;
use catalog::Generator;
use log::debug;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde_json::{Map, Value};
use std::fmt;

/// How a rule was bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A built-in catalog generator.
    Catalog,
    /// The field's own enumerated choices.
    Choice,
    /// A built-in domain vocabulary.
    Vocabulary,
    /// A generator picked from the field name.
    Heuristic,
    /// Synthetic `<field>_N` values.
    Placeholder,
}

type RuleFn = Box<dyn Fn(&mut StdRng) -> Value + Send + Sync>;

/// A bound generator for one field.
pub struct ValueRule {
    field: String,
    resolution: Resolution,
    generate: RuleFn,
}

impl ValueRule {
    fn new(
        field: &str,
        resolution: Resolution,
        generate: impl Fn(&mut StdRng) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            field: field.to_string(),
            resolution,
            generate: Box::new(generate),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn generate(&self, rng: &mut StdRng) -> Value {
        (self.generate)(rng)
    }
}

impl fmt::Debug for ValueRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueRule")
            .field("field", &self.field)
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}

const ALIASES: &[(&str, &str)] = &[
    ("phone", "phone_number"),
    ("telephone", "phone_number"),
    ("full_name", "name"),
    ("username", "user_name"),
    ("email_address", "email"),
    ("zipcode", "postcode"),
    ("zip_code", "postcode"),
    ("zip", "postcode"),
    ("postal_code", "postcode"),
    ("datetime", "date_time"),
    ("timestamp", "date_time"),
    ("birth_date", "date_of_birth"),
    ("birthdate", "date_of_birth"),
    ("dob", "date_of_birth"),
    ("float", "pyfloat"),
    ("decimal", "pydecimal"),
    ("int", "random_int"),
    ("integer", "random_int"),
    ("number", "random_int"),
    ("bool", "boolean"),
    ("uuid", "uuid4"),
    ("guid", "uuid4"),
    ("street", "street_address"),
    ("company_name", "company"),
    ("job_title", "job"),
    ("ip", "ipv4"),
    ("ip_address", "ipv4"),
    ("ipv4_address", "ipv4"),
    ("product", "product_name"),
    ("color", "color_name"),
    ("lorem", "text"),
    ("random_choice", "random_element"),
];

/// Normalize a method identifier: camelCase to snake_case, lowercase,
/// `-`, `.` and spaces to `_`, with a leading `faker.` namespace dropped.
pub fn canonicalize(method: &str) -> String {
    let trimmed = method.trim();
    let trimmed = ["faker.", "fake."]
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);

    let mut out = String::with_capacity(trimmed.len() + 4);
    let mut prev: Option<char> = None;
    for ch in trimmed.chars() {
        if ch.is_ascii_uppercase() {
            if prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else if matches!(ch, '-' | ' ' | '.') {
            out.push('_');
        } else {
            out.push(ch.to_ascii_lowercase());
        }
        prev = Some(ch);
    }

    let mut collapsed = String::with_capacity(out.len());
    for ch in out.chars() {
        if ch == '_' && (collapsed.is_empty() || collapsed.ends_with('_')) {
            continue;
        }
        collapsed.push(ch);
    }
    while collapsed.ends_with('_') {
        collapsed.pop();
    }

    match ALIASES.iter().find(|(alias, _)| *alias == collapsed) {
        Some((_, target)) => (*target).to_string(),
        None => collapsed,
    }
}

/// A field-name keyword rule: `(keywords, generator)`.
type Heuristic = (&'static [&'static str], &'static str);

/// Checked in order; short keywords match whole name tokens only.
const HEURISTICS: &[Heuristic] = &[
    (&["date", "birth", "created", "updated"], "past_date"),
    (&["first", "fname", "given"], "first_name"),
    (&["last", "lname", "surname", "family"], "last_name"),
    (&["name"], "name"),
    (&["email", "mail"], "email"),
    (&["phone", "tel", "mobile"], "phone_number"),
    (&["address", "street"], "street_address"),
    (&["city"], "city"),
    (&["state", "province"], "state"),
    (&["country", "nation"], "country"),
    (&["zip", "postal"], "postcode"),
    (&["price", "cost", "amount", "salary"], "price"),
    (&["age"], "age"),
    (&["year"], "year"),
    (&["id", "number", "num", "count"], "identifier"),
    (&["description", "comment", "note"], "text"),
    (&["title", "subject"], "sentence"),
    (&["company", "employer", "organization"], "company"),
    (&["job", "position", "role"], "job"),
    (&["active", "enabled", "valid", "is"], "boolean"),
];

fn keyword_matches(field: &str, keyword: &str) -> bool {
    if keyword.len() <= 3 {
        field.split('_').any(|token| token == keyword)
    } else {
        field.contains(keyword)
    }
}

fn heuristic_for(field: &str) -> Option<(&'static str, Generator)> {
    let (_, method) = HEURISTICS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| keyword_matches(field, kw)))?;
    let generator: Generator = match *method {
        "age" => |rng, _| Value::from(rng.random_range(18..=80)),
        "identifier" => |rng, _| Value::from(rng.random_range(1..=100_000)),
        other => catalog::lookup(other)?,
    };
    Some((*method, generator))
}

/// Resolves field specs against the catalog, vocabularies and heuristics.
#[derive(Debug, Clone, Default)]
pub struct FieldResolver {
    domain: Option<String>,
}

impl FieldResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer vocabularies from `domain` when matching by field name.
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
        }
    }

    pub fn resolve(&self, name: &str, spec: &FieldSpec) -> ValueRule {
        match spec {
            FieldSpec::NativeMethod { method, .. } => self.resolve_method(name, method, Map::new()),
            FieldSpec::ParameterizedMethod { method, params, .. } => {
                self.resolve_method(name, method, params.clone())
            }
            FieldSpec::EnumeratedChoice { choices, .. } if !choices.is_empty() => {
                let choices = choices.clone();
                ValueRule::new(name, Resolution::Choice, move |rng| {
                    choices.choose(rng).cloned().unwrap_or(Value::Null)
                })
            }
            FieldSpec::EnumeratedChoice { .. } => placeholder(name),
        }
    }

    fn resolve_method(&self, name: &str, method: &str, params: Map<String, Value>) -> ValueRule {
        let canonical = canonicalize(method);
        if let Some(generator) = catalog::lookup(&canonical) {
            return ValueRule::new(name, Resolution::Catalog, move |rng| {
                generator(rng, &Params::new(&params))
            });
        }

        let field = canonicalize(name);
        let vocabulary = vocab::by_category(&canonical)
            .or_else(|| vocab::by_field(&field, self.domain.as_deref()));
        if let Some(vocabulary) = vocabulary {
            debug!(
                "unknown generator resolved by vocabulary (field={name}, method={method}, category={})",
                vocabulary.category
            );
            let words = vocabulary.words;
            return ValueRule::new(name, Resolution::Vocabulary, move |rng| words.pick(rng));
        }

        if let Some((label, generator)) = heuristic_for(&field) {
            debug!("unknown generator resolved by field name (field={name}, method={method}, rule={label})");
            return ValueRule::new(name, Resolution::Heuristic, move |rng| {
                generator(rng, &Params::empty())
            });
        }

        debug!("unknown generator; using placeholders (field={name}, method={method})");
        placeholder(name)
    }
}

fn placeholder(name: &str) -> ValueRule {
    let values: Vec<Value> = (1..=5).map(|idx| Value::from(format!("{name}_{idx}"))).collect();
    ValueRule::new(name, Resolution::Placeholder, move |rng| {
        values.choose(rng).cloned().unwrap_or(Value::Null)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use serde_json::json;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn canonicalize_handles_common_spellings() {
        assert_eq!(canonicalize("productName"), "product_name");
        assert_eq!(canonicalize("Phone-Number"), "phone_number");
        assert_eq!(canonicalize("faker.first_name"), "first_name");
        assert_eq!(canonicalize("zipcode"), "postcode");
        assert_eq!(canonicalize("IPv4"), "ipv4");
        assert_eq!(canonicalize("  full name "), "name");
        assert_eq!(canonicalize("dateTimeThisYear"), "date_time_this_year");
    }

    #[test]
    fn native_methods_bind_to_catalog() {
        let rule = FieldResolver::new().resolve("name", &FieldSpec::native("productName"));
        assert_eq!(rule.resolution(), Resolution::Catalog);
        assert!(rule.generate(&mut rng()).is_string());
    }

    #[test]
    fn enumerated_choice_picks_members() {
        let rule = FieldResolver::new().resolve("tier", &FieldSpec::choice(["gold", "silver"]));
        assert_eq!(rule.resolution(), Resolution::Choice);
        let mut rng = rng();
        for _ in 0..20 {
            let value = rule.generate(&mut rng);
            assert!(value == json!("gold") || value == json!("silver"));
        }
    }

    #[test]
    fn unknown_method_uses_vocabulary() {
        let rule = FieldResolver::new().resolve("blood", &FieldSpec::native("blood_type"));
        assert_eq!(rule.resolution(), Resolution::Vocabulary);

        let rule = FieldResolver::for_domain("finance")
            .resolve("payment_status", &FieldSpec::native("mystery"));
        assert_eq!(rule.resolution(), Resolution::Vocabulary);
        let value = rule.generate(&mut rng());
        let allowed = ["Pending", "Completed", "Failed", "Cancelled", "Processing"];
        assert!(allowed.contains(&value.as_str().unwrap_or_default()));
    }

    #[test]
    fn unknown_method_falls_back_to_field_name() {
        let rule = FieldResolver::new().resolve("contact_email", &FieldSpec::native("whatever"));
        assert_eq!(rule.resolution(), Resolution::Heuristic);
        let value = rule.generate(&mut rng());
        assert!(value.as_str().unwrap_or_default().contains('@'));

        let rule = FieldResolver::new().resolve("paid", &FieldSpec::native("nope"));
        assert_eq!(rule.resolution(), Resolution::Placeholder);
    }

    #[test]
    fn placeholder_values_are_synthetic() {
        let rule = FieldResolver::new().resolve("widget", &FieldSpec::native("no_such_method"));
        assert_eq!(rule.resolution(), Resolution::Placeholder);
        let mut rng = rng();
        for _ in 0..20 {
            let value = rule.generate(&mut rng);
            let text = value.as_str().expect("text");
            assert!(text.starts_with("widget_"));
            let idx: u32 = text["widget_".len()..].parse().expect("index");
            assert!((1..=5).contains(&idx));
        }
    }

    #[test]
    fn parameterized_methods_apply_params() {
        let mut params = Map::new();
        params.insert("min".to_string(), json!(5));
        params.insert("max".to_string(), json!(1));
        let rule = FieldResolver::new().resolve("stars", &FieldSpec::parameterized("randomInt", params));
        assert_eq!(rule.resolution(), Resolution::Catalog);
        let mut rng = rng();
        for _ in 0..20 {
            let value = rule.generate(&mut rng).as_i64().expect("int");
            assert!((1..=5).contains(&value));
        }
    }

    #[test]
    fn seeded_rules_are_reproducible() {
        let rule = FieldResolver::new().resolve("id", &FieldSpec::native("uuid4"));
        let first = rule.generate(&mut rng());
        let second = rule.generate(&mut rng());
        assert_eq!(first, second);
    }
}
