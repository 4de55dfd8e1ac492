//! Prompt construction for schema authoring.

const DESCRIPTION_OPEN: &str = "<description>";
const DESCRIPTION_CLOSE: &str = "</description>";

const INSTRUCTIONS: &str = r#"Design a schema for generating synthetic rows of tabular data.

Reply with ONE JSON object shaped like this:
{
  "domain": "ecommerce",
  "fields": {
    "customer_name": {"faker_method": "name", "parameters": {}, "description": "Customer full name"},
    "order_total": {"faker_method": "pydecimal", "parameters": {"left_digits": 3, "right_digits": 2, "positive": true}, "description": "Order total"},
    "status": {"faker_method": "random_element", "parameters": {"elements": ["pending", "shipped", "delivered"]}, "description": "Order status"}
  }
}

Rules:
- Use common Faker method names (name, email, phone_number, address, date_between, random_int, pydecimal, sentence, company, uuid4, boolean, random_element, ...).
- Include 3 to 15 fields relevant to the description.
- Field names are descriptive snake_case.
- Use random_element with an "elements" list for categorical columns.
- Pick a short domain label such as ecommerce, healthcare, finance, education or social_media."#;

const STRICT_SUFFIX: &str = r#"
Your previous reply could not be parsed. Output raw JSON only: no Markdown fences, no comments, no trailing commas, no text before or after the object."#;

/// Builds bounded authoring prompts from user descriptions.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_description_chars: usize,
}

impl PromptBuilder {
    /// Descriptions longer than `max_description_chars` are truncated.
    pub fn new(max_description_chars: usize) -> Self {
        Self {
            max_description_chars: max_description_chars.max(1),
        }
    }

    pub fn build(&self, description: &str) -> String {
        format!(
            "{INSTRUCTIONS}\n\n{DESCRIPTION_OPEN}\n{}\n{DESCRIPTION_CLOSE}",
            self.bounded(description)
        )
    }

    /// Stricter prompt used after a malformed response.
    pub fn build_refined(&self, description: &str) -> String {
        format!("{}\n{STRICT_SUFFIX}", self.build(description))
    }

    fn bounded<'a>(&self, description: &'a str) -> &'a str {
        let trimmed = description.trim();
        match trimmed.char_indices().nth(self.max_description_chars) {
            Some((cut, _)) => &trimmed[..cut],
            None => trimmed,
        }
    }
}

/// Recover the description embedded in a prompt built by `PromptBuilder`.
pub fn extract_description(prompt: &str) -> Option<&str> {
    let start = prompt.find(DESCRIPTION_OPEN)? + DESCRIPTION_OPEN.len();
    let end = prompt[start..].find(DESCRIPTION_CLOSE)? + start;
    Some(prompt[start..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prompt_embeds_description() {
        let prompt = PromptBuilder::new(100).build("  library loans  ");
        assert_eq!(extract_description(&prompt), Some("library loans"));
        assert!(prompt.contains("faker_method"));
    }

    #[test]
    fn long_descriptions_are_truncated_on_char_boundaries() {
        let builder = PromptBuilder::new(5);
        let prompt = builder.build("ééééééééé");
        assert_eq!(extract_description(&prompt), Some("ééééé"));
        let short = PromptBuilder::new(4000).build("x").len();
        let long = PromptBuilder::new(4000).build(&"x".repeat(10_000)).len();
        assert_eq!(long - short, 3999);
    }

    #[test]
    fn refined_prompt_is_stricter() {
        let builder = PromptBuilder::new(100);
        let refined = builder.build_refined("orders");
        assert!(refined.starts_with(&builder.build("orders")));
        assert!(refined.contains("raw JSON only"));
    }
}
