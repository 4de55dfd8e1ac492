//! CSV rendering of generated datasets.

use crate::pipeline::Dataset;
use serde_json::Value;
use std::io::Write;

/// Write a header row followed by one row per record, in field order.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&dataset.field_names)?;
    for record in &dataset.records {
        out.write_record(
            dataset
                .field_names
                .iter()
                .map(|name| record.get(name).map(cell).unwrap_or_default()),
        )?;
    }
    out.flush()?;
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn renders_header_and_cells_in_field_order() {
        let mut first = synthschema_core::Record::new();
        first.insert("name".to_string(), json!("Ada, Countess"));
        first.insert("age".to_string(), json!(36));
        first.insert("tags".to_string(), json!(["a", "b"]));
        let mut second = synthschema_core::Record::new();
        second.insert("age".to_string(), Value::Null);
        second.insert("name".to_string(), json!("Grace"));
        let dataset = Dataset {
            domain: "general".to_string(),
            field_names: vec!["name".to_string(), "age".to_string(), "tags".to_string()],
            records: vec![first, second],
            generation_time: Duration::ZERO,
        };

        let mut buffer = Vec::new();
        write_csv(&dataset, &mut buffer).expect("csv");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(
            text,
            "name,age,tags\n\"Ada, Countess\",36,\"[\"\"a\"\",\"\"b\"\"]\"\nGrace,,\n"
        );
    }
}
