//! Expanding a schema into a stream of records.

use crate::resolver::{FieldResolver, ValueRule};
use crate::schema::{Record, Schema};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Produces records from schemas using its own random source.
#[derive(Debug, Clone)]
pub struct RecordExpander {
    rng: StdRng,
}

impl RecordExpander {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Identical seeds and schemas yield identical records.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Bind every field once, then yield exactly `rows` records.
    ///
    /// Each stream draws from an independent generator forked from this
    /// expander, so consecutive streams differ while a seeded expander
    /// stays reproducible.
    pub fn expand(&mut self, schema: &Schema, rows: usize) -> RecordStream {
        let resolver = FieldResolver::for_domain(schema.domain.clone());
        let rules = schema
            .fields
            .iter()
            .map(|(name, spec)| resolver.resolve(name, spec))
            .collect();
        RecordStream {
            rules,
            rng: StdRng::from_rng(&mut self.rng),
            remaining: rows,
        }
    }
}

impl Default for RecordExpander {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Finite, non-restartable sequence of records.
#[derive(Debug)]
pub struct RecordStream {
    rules: Vec<ValueRule>,
    rng: StdRng,
    remaining: usize,
}

impl RecordStream {
    /// Field names in emission order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(ValueRule::field)
    }

    pub fn rules(&self) -> &[ValueRule] {
        &self.rules
    }
}

impl Iterator for RecordStream {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let rng = &mut self.rng;
        Some(
            self.rules
                .iter()
                .map(|rule| (rule.field().to_string(), rule.generate(rng)))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RecordStream {}

impl std::iter::FusedIterator for RecordStream {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::ContentHasher;
    use crate::schema::{FieldSpec, SchemaOrigin};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        let mut fields = IndexMap::new();
        fields.insert("sku".to_string(), FieldSpec::native("uuid4"));
        fields.insert("name".to_string(), FieldSpec::native("productName"));
        fields.insert("tier".to_string(), FieldSpec::choice(["gold", "silver"]));
        fields.insert("mystery".to_string(), FieldSpec::native("not_a_method"));
        Schema::new(
            ContentHasher::hash("catalog"),
            "ecommerce",
            fields,
            SchemaOrigin::Authored,
        )
    }

    #[test]
    fn yields_exact_row_count_in_field_order() {
        let schema = schema();
        let stream = RecordExpander::seeded(1).expand(&schema, 7);
        assert_eq!(stream.len(), 7);
        let records: Vec<Record> = stream.collect();
        assert_eq!(records.len(), 7);
        for record in &records {
            let keys: Vec<&str> = record.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["sku", "name", "tier", "mystery"]);
        }
    }

    #[test]
    fn zero_rows_is_empty() {
        let mut stream = RecordExpander::seeded(1).expand(&schema(), 0);
        assert!(stream.next().is_none());
    }

    #[test]
    fn seeded_expanders_are_reproducible() {
        let schema = schema();
        let first: Vec<Record> = RecordExpander::seeded(99).expand(&schema, 5).collect();
        let second: Vec<Record> = RecordExpander::seeded(99).expand(&schema, 5).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn consecutive_streams_differ() {
        let schema = schema();
        let mut expander = RecordExpander::seeded(5);
        let first: Vec<Record> = expander.expand(&schema, 3).collect();
        let second: Vec<Record> = expander.expand(&schema, 3).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn stream_is_not_restartable() {
        let mut stream = RecordExpander::seeded(2).expand(&schema(), 2);
        assert!(stream.next().is_some());
        assert!(stream.next().is_some());
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }
}
