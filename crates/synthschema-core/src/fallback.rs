//! Generic schema used when authoring cannot produce one.

use crate::schema::{CacheKey, FieldSpec, Schema, SchemaOrigin};
use indexmap::IndexMap;

const FALLBACK_FIELDS: &[(&str, &str, &str)] = &[
    ("id", "uuid4", "Unique identifier"),
    ("name", "name", "Full name"),
    ("email", "email", "Email address"),
    ("phone_number", "phone_number", "Phone number"),
    ("address", "address", "Postal address"),
    ("created_at", "date_time_this_year", "Creation timestamp"),
];

/// The built-in person-like schema, keyed to `key`.
pub fn fallback_schema(key: &CacheKey) -> Schema {
    let fields: IndexMap<String, FieldSpec> = FALLBACK_FIELDS
        .iter()
        .map(|(name, method, description)| {
            (
                (*name).to_string(),
                FieldSpec::native(*method).with_description(*description),
            )
        })
        .collect();
    Schema::new(key.clone(), "general", fields, SchemaOrigin::Fallback)
}
