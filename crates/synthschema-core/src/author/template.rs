//! Offline keyword templates for demo mode.

use super::{AuthorError, SchemaAuthor};
use crate::prompt::extract_description;
use crate::schema::SchemaOrigin;
use async_trait::async_trait;
use log::debug;
use serde_json::{Value, json};
use std::time::Duration;

/// Keyword lists checked in order; the first match wins.
const TEMPLATE_KEYWORDS: &[(&str, &[&str])] = &[
    ("ecommerce", &["ecommerce", "product", "shop", "store", "catalog"]),
    (
        "healthcare",
        &["healthcare", "patient", "medical", "hospital", "health"],
    ),
    (
        "finance",
        &["finance", "account", "bank", "transaction", "payment"],
    ),
    ("employee", &["employee", "staff", "worker", "job", "salary"]),
    ("social", &["social", "user", "profile", "follower", "post"]),
    (
        "education",
        &["student", "education", "school", "grade", "university"],
    ),
];

/// Serves a canned schema chosen by keywords in the description.
///
/// Never touches the network and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateAuthor;

impl TemplateAuthor {
    pub fn new() -> Self {
        Self
    }

    /// Template name that would be served for `description`.
    pub fn template_for(description: &str) -> &'static str {
        let lowered = description.to_lowercase();
        TEMPLATE_KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|word| lowered.contains(word)))
            .map(|(name, _)| *name)
            .unwrap_or("default")
    }
}

#[async_trait]
impl SchemaAuthor for TemplateAuthor {
    async fn request(&self, prompt: &str, _timeout: Duration) -> Result<String, AuthorError> {
        let description = extract_description(prompt).unwrap_or(prompt);
        let name = Self::template_for(description);
        debug!("serving demo template (template={name})");
        Ok(template(name).to_string())
    }

    fn name(&self) -> &str {
        "demo"
    }

    fn origin(&self) -> SchemaOrigin {
        SchemaOrigin::Template
    }
}

fn template(name: &str) -> Value {
    match name {
        "ecommerce" => json!({
            "domain": "ecommerce",
            "fields": {
                "product_name": {"faker_method": "catch_phrase"},
                "category": {"faker_method": "word"},
                "brand": {"faker_method": "company"},
                "price": {"faker_method": "pydecimal", "min_value": 10, "max_value": 1000, "right_digits": 2},
                "rating": {"faker_method": "random_int", "min": 1, "max": 5},
                "in_stock": {"faker_method": "boolean"},
                "sku": {"faker_method": "bothify", "text": "###-???-###"}
            }
        }),
        "healthcare" => json!({
            "domain": "healthcare",
            "fields": {
                "patient_name": {"faker_method": "name"},
                "age": {"faker_method": "random_int", "min": 1, "max": 100},
                "gender": {"faker_method": "random_element", "elements": ["Male", "Female", "Other"]},
                "blood_type": {"faker_method": "random_element", "elements": ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"]},
                "condition": {"faker_method": "random_element", "elements": ["Diabetes", "Hypertension", "Asthma", "Heart Disease", "Arthritis"]},
                "department": {"faker_method": "random_element", "elements": ["Emergency", "Surgery", "Pediatrics", "Cardiology", "Neurology"]}
            }
        }),
        "finance" => json!({
            "domain": "finance",
            "fields": {
                "account_holder": {"faker_method": "name"},
                "account_number": {"faker_method": "bban"},
                "account_type": {"faker_method": "random_element", "elements": ["Checking", "Savings", "Credit", "Loan"]},
                "balance": {"faker_method": "pydecimal", "min_value": 100, "max_value": 100000, "right_digits": 2},
                "transaction_date": {"faker_method": "date_this_year"},
                "merchant": {"faker_method": "company"}
            }
        }),
        "employee" => json!({
            "domain": "business",
            "fields": {
                "employee_name": {"faker_method": "name"},
                "job_title": {"faker_method": "job"},
                "department": {"faker_method": "random_element", "elements": ["Engineering", "Sales", "Marketing", "HR", "Finance"]},
                "salary": {"faker_method": "random_int", "min": 40000, "max": 200000},
                "hire_date": {"faker_method": "date_between", "start_date": "-10y", "end_date": "today"},
                "email": {"faker_method": "company_email"}
            }
        }),
        "social" => json!({
            "domain": "social_media",
            "fields": {
                "username": {"faker_method": "user_name"},
                "bio": {"faker_method": "sentence"},
                "followers": {"faker_method": "random_int", "min": 0, "max": 1000000},
                "posts": {"faker_method": "random_int", "min": 0, "max": 10000},
                "registration_date": {"faker_method": "date_between", "start_date": "-5y", "end_date": "today"},
                "verified": {"faker_method": "boolean", "chance_of_getting_true": 20}
            }
        }),
        "education" => json!({
            "domain": "education",
            "fields": {
                "student_name": {"faker_method": "name"},
                "student_id": {"faker_method": "bothify", "text": "STU-####"},
                "grade": {"faker_method": "random_int", "min": 1, "max": 12},
                "gpa": {"faker_method": "pydecimal", "min_value": 0, "max_value": 4, "right_digits": 2},
                "major": {"faker_method": "random_element", "elements": ["Computer Science", "Mathematics", "Physics", "Biology", "Literature"]},
                "enrollment_date": {"faker_method": "date_this_decade"}
            }
        }),
        _ => json!({
            "domain": "general",
            "fields": {
                "id": {"faker_method": "uuid4"},
                "name": {"faker_method": "name"},
                "email": {"faker_method": "email"},
                "phone": {"faker_method": "phone_number"},
                "address": {"faker_method": "address"},
                "created_at": {"faker_method": "date_time_this_year"}
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn picks_template_by_first_matching_keyword() {
        assert_eq!(TemplateAuthor::template_for("Online SHOP orders"), "ecommerce");
        assert_eq!(TemplateAuthor::template_for("hospital admissions"), "healthcare");
        assert_eq!(TemplateAuthor::template_for("bank payments"), "finance");
        assert_eq!(TemplateAuthor::template_for("university courses"), "education");
        assert_eq!(TemplateAuthor::template_for("weather readings"), "default");
    }

    #[tokio::test]
    async fn request_reads_description_out_of_prompt() {
        let prompt = PromptBuilder::new(4000).build("staff salary bands");
        let text = TemplateAuthor::new()
            .request(&prompt, Duration::from_secs(1))
            .await
            .expect("template");
        let value: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["domain"], "business");
        assert_eq!(TemplateAuthor::new().origin(), SchemaOrigin::Template);
    }
}
