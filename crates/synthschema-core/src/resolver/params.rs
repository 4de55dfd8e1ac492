//! Lenient accessors over generator parameters.
//!
//! Missing, mistyped or out-of-range values fall back to the caller's
//! default instead of failing.

use chrono::{Days, Months, NaiveDate, Utc};
use serde_json::{Map, Value};

/// Borrowed parameter map of a `ParameterizedMethod` field.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Params<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map: Some(map) }
    }

    pub fn empty() -> Self {
        Self { map: None }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map?.get(key)
    }

    /// Integers, integral floats and numeric strings are accepted.
    pub fn i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64)),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
        .filter(|value| value.is_finite())
    }

    /// Non-negative integer clamped to `max`.
    pub fn count(&self, key: &str, default: usize, max: usize) -> usize {
        self.i64(key)
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or(default)
            .min(max)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(value) => Some(*value),
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            Value::Number(number) => number.as_i64().map(|value| value != 0),
            _ => None,
        }
    }

    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key)?.as_str()
    }

    /// Non-empty array value.
    pub fn array(&self, key: &str) -> Option<&'a [Value]> {
        self.get(key)?
            .as_array()
            .map(Vec::as_slice)
            .filter(|values| !values.is_empty())
    }

    /// First integer found under any of `keys`.
    pub fn first_i64(&self, keys: &[&str]) -> Option<i64> {
        keys.iter().find_map(|key| self.i64(key))
    }

    pub fn first_f64(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| self.f64(key))
    }

    /// Inclusive integer bounds from `min`/`max` (or `min_value`/`max_value`),
    /// reordered when swapped.
    pub fn int_range(&self, default_min: i64, default_max: i64) -> (i64, i64) {
        let min = self.first_i64(&["min", "min_value"]).unwrap_or(default_min);
        let max = self.first_i64(&["max", "max_value"]).unwrap_or(default_max);
        if min <= max { (min, max) } else { (max, min) }
    }

    pub fn float_range(&self, default_min: f64, default_max: f64) -> (f64, f64) {
        let min = self.first_f64(&["min", "min_value"]).unwrap_or(default_min);
        let max = self.first_f64(&["max", "max_value"]).unwrap_or(default_max);
        if !(max - min).is_finite() {
            return (default_min, default_max);
        }
        if min <= max { (min, max) } else { (max, min) }
    }

    /// Probability in `0.0..=1.0` from a percentage parameter.
    pub fn chance(&self, key: &str, default_percent: f64) -> f64 {
        (self.f64(key).unwrap_or(default_percent) / 100.0).clamp(0.0, 1.0)
    }

    /// A date parameter: relative offset (`-2y`, `+30d`, `today`) or ISO date.
    pub fn date(&self, key: &str, default: &str) -> NaiveDate {
        let today = Utc::now().date_naive();
        self.str(key)
            .and_then(|raw| parse_date(raw, today))
            .or_else(|| parse_date(default, today))
            .unwrap_or(today)
    }

    /// Ordered `(start, end)` pair from `start_date`/`end_date`.
    pub fn date_range(&self, default_start: &str, default_end: &str) -> (NaiveDate, NaiveDate) {
        let start = self.date("start_date", default_start);
        let end = self.date("end_date", default_end);
        if start <= end { (start, end) } else { (end, start) }
    }
}

/// Parse `today`, `now`, signed offsets with a `y`/`m`/`w`/`d` unit, or
/// `YYYY-MM-DD`.
pub fn parse_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let raw = raw.trim().to_ascii_lowercase();
    if raw == "today" || raw == "now" {
        return Some(today);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Some(date);
    }

    let (negative, rest) = match raw.as_bytes().first()? {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw.as_str()),
    };
    let unit = rest.chars().last()?;
    let amount: u32 = rest[..rest.len() - unit.len_utf8()].parse().ok()?;
    match unit {
        'y' => shift_months(today, amount.checked_mul(12)?, negative),
        'm' => shift_months(today, amount, negative),
        'w' => shift_days(today, u64::from(amount) * 7, negative),
        'd' => shift_days(today, u64::from(amount), negative),
        _ => None,
    }
}

fn shift_months(date: NaiveDate, months: u32, negative: bool) -> Option<NaiveDate> {
    if negative {
        date.checked_sub_months(Months::new(months))
    } else {
        date.checked_add_months(Months::new(months))
    }
}

fn shift_days(date: NaiveDate, days: u64, negative: bool) -> Option<NaiveDate> {
    if negative {
        date.checked_sub_days(Days::new(days))
    } else {
        date.checked_add_days(Days::new(days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn swapped_bounds_are_reordered() {
        let raw = map(json!({"min": 50, "max": 10}));
        assert_eq!(Params::new(&raw).int_range(0, 1), (10, 50));
        let raw = map(json!({"min_value": "2.5", "max_value": 1}));
        assert_eq!(Params::new(&raw).float_range(0.0, 9.0), (1.0, 2.5));
    }

    #[test]
    fn unbounded_float_span_uses_defaults() {
        let raw = map(json!({"min": -1e308, "max": 1e308}));
        assert_eq!(Params::new(&raw).float_range(1.0, 9.0), (1.0, 9.0));
        let raw = map(json!({"min": 1e308, "max": -1e308}));
        assert_eq!(Params::new(&raw).float_range(1.0, 9.0), (1.0, 9.0));
    }

    #[test]
    fn mistyped_values_use_defaults() {
        let raw = map(json!({"min": "low", "nb_words": -3, "elements": []}));
        let params = Params::new(&raw);
        assert_eq!(params.int_range(1, 1000), (1, 1000));
        assert_eq!(params.count("nb_words", 6, 50), 6);
        assert!(params.array("elements").is_none());
        assert_eq!(Params::empty().chance("chance_of_getting_true", 50.0), 0.5);
    }

    #[test]
    fn relative_dates_parse() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).expect("date");
        assert_eq!(parse_date("today", today), Some(today));
        assert_eq!(parse_date("-2y", today), NaiveDate::from_ymd_opt(2022, 3, 31));
        assert_eq!(parse_date("+30d", today), NaiveDate::from_ymd_opt(2024, 4, 30));
        assert_eq!(parse_date("-1m", today), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("-2w", today), NaiveDate::from_ymd_opt(2024, 3, 17));
        assert_eq!(parse_date("2020-01-15", today), NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(parse_date("soon", today), None);
        assert_eq!(parse_date("-", today), None);
    }

    #[test]
    fn date_range_orders_endpoints() {
        let raw = map(json!({"start_date": "+1y", "end_date": "-1y"}));
        let (start, end) = Params::new(&raw).date_range("-30d", "today");
        assert!(start < end);
    }
}
