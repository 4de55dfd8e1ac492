//! Domain vocabularies for categorical columns the catalog does not know.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Words {
    Text(&'static [&'static str]),
    Numbers(&'static [i64]),
}

impl Words {
    pub(crate) fn pick(&self, rng: &mut StdRng) -> Value {
        match self {
            Words::Text(words) => words
                .choose(rng)
                .map_or(Value::Null, |word| Value::from(*word)),
            Words::Numbers(numbers) => numbers
                .choose(rng)
                .map_or(Value::Null, |number| Value::from(*number)),
        }
    }
}

/// A named category inside a domain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Vocabulary {
    pub domain: &'static str,
    pub category: &'static str,
    pub words: Words,
}

const fn text(
    domain: &'static str,
    category: &'static str,
    words: &'static [&'static str],
) -> Vocabulary {
    Vocabulary {
        domain,
        category,
        words: Words::Text(words),
    }
}

pub(crate) const VOCABULARIES: &[Vocabulary] = &[
    text("ecommerce", "category", &["Electronics", "Clothing", "Books", "Home & Garden", "Sports", "Toys"]),
    text("ecommerce", "brand", &["Apple", "Samsung", "Nike", "Adidas", "Sony", "Microsoft", "Amazon"]),
    Vocabulary {
        domain: "ecommerce",
        category: "rating",
        words: Words::Numbers(&[1, 2, 3, 4, 5]),
    },
    text("ecommerce", "product_type", &["Physical", "Digital", "Service", "Subscription"]),
    text("ecommerce", "shipping_method", &["Standard", "Express", "Overnight", "Free Shipping"]),
    text("healthcare", "blood_type", &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"]),
    text("healthcare", "condition", &["Diabetes", "Hypertension", "Asthma", "Arthritis", "Heart Disease"]),
    text("healthcare", "treatment", &["Medication", "Physical Therapy", "Surgery", "Monitoring", "Lifestyle Change"]),
    text("healthcare", "insurance", &["Medicare", "Medicaid", "Private", "Uninsured", "VA Benefits"]),
    text("healthcare", "department", &["Cardiology", "Neurology", "Orthopedics", "Pediatrics", "Emergency"]),
    text("finance", "account_type", &["Checking", "Savings", "Credit", "Investment", "Loan"]),
    text("finance", "transaction_type", &["Deposit", "Withdrawal", "Transfer", "Payment", "Fee"]),
    text("finance", "status", &["Pending", "Completed", "Failed", "Cancelled", "Processing"]),
    text("finance", "merchant_category", &["Gas Station", "Grocery Store", "Restaurant", "Online Purchase", "ATM"]),
    text("finance", "risk_level", &["Low", "Medium", "High", "Very High"]),
    text("education", "grade_level", &["Freshman", "Sophomore", "Junior", "Senior", "Graduate"]),
    text("education", "subject", &["Mathematics", "Science", "English", "History", "Art", "Physical Education"]),
    text("education", "degree", &["Bachelor", "Master", "PhD", "Associate", "Certificate"]),
    text("education", "major", &["Computer Science", "Business", "Engineering", "Psychology", "Biology"]),
    text("education", "semester", &["Fall", "Spring", "Summer", "Winter"]),
    text("education", "grade", &["A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D", "F"]),
    text("general", "gender", &["Male", "Female", "Non-binary", "Prefer not to say"]),
    text("general", "marital_status", &["Single", "Married", "Divorced", "Widowed", "Separated"]),
    text("general", "priority", &["Low", "Medium", "High", "Critical"]),
    text("general", "status", &["Active", "Inactive", "Pending", "Suspended"]),
    text("general", "language", &["English", "Spanish", "French", "German", "Chinese", "Japanese"]),
    text("general", "timezone", &["PST", "EST", "CST", "MST", "UTC"]),
];

/// Vocabulary whose category is exactly `method`.
pub(crate) fn by_category(method: &str) -> Option<&'static Vocabulary> {
    VOCABULARIES.iter().find(|vocab| vocab.category == method)
}

/// Vocabulary whose category appears in `field`, preferring `domain`.
///
/// Longer categories win so `transaction_type` beats a bare `status`.
pub(crate) fn by_field(field: &str, domain: Option<&str>) -> Option<&'static Vocabulary> {
    domain
        .and_then(|domain| longest_match(field, |vocab| vocab.domain == domain))
        .or_else(|| longest_match(field, |_| true))
}

fn longest_match(
    field: &str,
    accept: impl Fn(&Vocabulary) -> bool,
) -> Option<&'static Vocabulary> {
    let mut best: Option<&'static Vocabulary> = None;
    for vocab in VOCABULARIES.iter().filter(|vocab| accept(vocab)) {
        if !contains_token_run(field, vocab.category) {
            continue;
        }
        if best.is_none_or(|current| vocab.category.len() > current.category.len()) {
            best = Some(vocab);
        }
    }
    best
}

/// `needle` appears in `haystack` aligned on `_` boundaries.
fn contains_token_run(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = start == 0 || haystack.as_bytes()[start - 1] == b'_';
        let after = end == haystack.len() || haystack.as_bytes()[end] == b'_';
        before && after
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn category_lookup_is_exact() {
        assert_eq!(by_category("blood_type").map(|v| v.domain), Some("healthcare"));
        assert!(by_category("blood").is_none());
    }

    #[test]
    fn field_lookup_respects_token_boundaries() {
        assert_eq!(
            by_field("patient_blood_type", None).map(|v| v.category),
            Some("blood_type")
        );
        assert_eq!(by_field("order_status", Some("finance")).map(|v| v.domain), Some("finance"));
        assert_eq!(by_field("order_status", None).map(|v| v.domain), Some("finance"));
        assert_eq!(by_field("status", Some("general")).map(|v| v.domain), Some("general"));
        assert!(by_field("statusbar", None).is_none());
        assert!(by_field("subcategory", None).is_none());
    }

    #[test]
    fn picks_come_from_the_list() {
        let mut rng = StdRng::seed_from_u64(7);
        let vocab = by_category("rating").expect("rating");
        for _ in 0..20 {
            let value = vocab.words.pick(&mut rng);
            let rating = value.as_i64().expect("number");
            assert!((1..=5).contains(&rating));
        }
    }
}
