//! Built-in generator catalog keyed by canonical method name.

use super::params::Params;
use super::words::*;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde_json::Value;
use uuid::Uuid;

/// A value generator; params are empty for `NativeMethod` fields.
pub(crate) type Generator = fn(&mut StdRng, &Params<'_>) -> Value;

const CATALOG: &[(&str, Generator)] = &[
    // names
    ("name", name),
    ("first_name", first_name),
    ("last_name", last_name),
    ("user_name", user_name),
    // contact
    ("email", email),
    ("safe_email", email),
    ("free_email", free_email),
    ("company_email", company_email),
    ("phone_number", phone_number),
    // dates
    ("date", date),
    ("past_date", past_date),
    ("future_date", future_date),
    ("date_between", date_between),
    ("date_of_birth", date_of_birth),
    ("date_this_year", date_this_year),
    ("date_time", date_time),
    ("date_time_this_year", date_time_this_year),
    ("iso8601", date_time),
    ("time", time),
    ("unix_time", unix_time),
    ("year", year),
    ("month", month),
    ("month_name", month_name),
    ("day_of_week", day_of_week),
    // numbers
    ("random_int", random_int),
    ("random_number", random_number),
    ("random_digit", random_digit),
    ("pyint", pyint),
    ("pyfloat", pyfloat),
    ("pydecimal", pyfloat),
    ("price", price),
    ("currency", currency),
    // addresses
    ("address", address),
    ("street_address", street_address),
    ("street_name", street_name),
    ("building_number", building_number),
    ("city", city),
    ("state", state),
    ("state_abbr", state_abbr),
    ("country", country),
    ("country_code", country_code),
    ("postcode", postcode),
    ("latitude", latitude),
    ("longitude", longitude),
    // text
    ("word", word),
    ("words", words),
    ("sentence", sentence),
    ("paragraph", paragraph),
    ("text", text),
    ("catch_phrase", catch_phrase),
    ("bs", bs),
    ("slug", slug),
    ("lexify", lexify),
    ("numerify", numerify),
    ("bothify", bothify),
    // business
    ("company", company),
    ("company_suffix", company_suffix),
    ("job", job),
    ("department", department),
    ("currency_code", currency_code),
    // internet
    ("url", url),
    ("domain_name", domain_name),
    ("ipv4", ipv4),
    ("ipv6", ipv6),
    ("mac_address", mac_address),
    // identifiers
    ("uuid4", uuid4),
    ("ssn", ssn),
    ("ein", ein),
    ("credit_card_number", credit_card_number),
    ("iban", iban),
    // booleans
    ("boolean", boolean),
    ("pybool", boolean),
    // colors
    ("color_name", color_name),
    ("safe_color_name", color_name),
    ("hex_color", hex_color),
    ("rgb_color", rgb_color),
    // products
    ("product_name", product_name),
    // choices
    ("random_element", random_element),
    ("random_choices", random_element),
];

pub(crate) fn lookup(method: &str) -> Option<Generator> {
    CATALOG
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, generator)| *generator)
}

/// Canonical names of every catalog generator.
pub fn methods() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(name, _)| *name)
}

fn pick(rng: &mut StdRng, words: &[&'static str]) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

fn digits(rng: &mut StdRng, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

fn letter(rng: &mut StdRng) -> char {
    char::from(b'a' + rng.random_range(0..26u8))
}

fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

fn random_date(rng: &mut StdRng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(0).unsigned_abs();
    start
        .checked_add_days(Days::new(rng.random_range(0..=span)))
        .unwrap_or(start)
}

fn random_timestamp(rng: &mut StdRng, start: i64, end: i64) -> NaiveDateTime {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let seconds = rng.random_range(start..=end);
    DateTime::from_timestamp(seconds, 0)
        .unwrap_or_default()
        .naive_utc()
}

fn start_of_year() -> i64 {
    let today = Utc::now().date_naive();
    NaiveDate::from_ymd_opt(today.year(), 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or(0, |start| start.and_utc().timestamp())
}

fn format_date(date: NaiveDate) -> Value {
    Value::from(date.format("%Y-%m-%d").to_string())
}

fn format_date_time(at: NaiveDateTime) -> Value {
    Value::from(at.format("%Y-%m-%dT%H:%M:%S").to_string())
}

fn first_name(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, FIRST_NAMES))
}

fn last_name(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, LAST_NAMES))
}

fn name(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)))
}

fn handle(rng: &mut StdRng) -> String {
    let first = pick(rng, FIRST_NAMES).to_lowercase();
    let last = pick(rng, LAST_NAMES).to_lowercase();
    match rng.random_range(0..3) {
        0 => format!("{first}.{last}"),
        1 => format!("{first}{}", rng.random_range(1..100)),
        _ => format!("{}{last}", &first[..1]),
    }
}

fn user_name(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(handle(rng).replace('.', "_"))
}

fn email(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let handle = handle(rng);
    Value::from(format!("{handle}@{}", pick(rng, EMAIL_DOMAINS)))
}

fn free_email(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let handle = handle(rng);
    Value::from(format!("{handle}@{}", pick(rng, FREE_EMAIL_DOMAINS)))
}

fn company_email(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let handle = handle(rng);
    let company = pick(rng, LAST_NAMES).to_lowercase();
    Value::from(format!("{handle}@{company}.{}", pick(rng, TLDS)))
}

fn phone_number(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let area = rng.random_range(201..990);
    let exchange = rng.random_range(200..1000);
    let line = digits(rng, 4);
    let formatted = match rng.random_range(0..3) {
        0 => format!("({area}) {exchange}-{line}"),
        1 => format!("{area}-{exchange}-{line}"),
        _ => format!("+1-{area}-{exchange}-{line}"),
    };
    Value::from(formatted)
}

fn date(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let end = Utc::now().date_naive();
    let start = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(end);
    format_date(random_date(rng, start, end))
}

fn past_date(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let (start, end) = params.date_range("-2y", "today");
    format_date(random_date(rng, start, end))
}

fn future_date(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let (start, end) = params.date_range("today", "+2y");
    format_date(random_date(rng, start, end))
}

fn date_between(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let (start, end) = params.date_range("-1y", "+1y");
    format_date(random_date(rng, start, end))
}

fn date_of_birth(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let minimum = params.count("minimum_age", 18, 115);
    let maximum = params.count("maximum_age", 80, 115);
    let (minimum, maximum) = if minimum <= maximum {
        (minimum, maximum)
    } else {
        (maximum, minimum)
    };
    let today = Utc::now().date_naive();
    let latest = super::params::parse_date(&format!("-{minimum}y"), today).unwrap_or(today);
    let earliest = super::params::parse_date(&format!("-{maximum}y"), today).unwrap_or(latest);
    format_date(random_date(rng, earliest, latest))
}

fn date_this_year(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let today = Utc::now().date_naive();
    let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
    format_date(random_date(rng, start, today))
}

fn date_time(rng: &mut StdRng, _: &Params<'_>) -> Value {
    format_date_time(random_timestamp(rng, 0, Utc::now().timestamp()))
}

fn date_time_this_year(rng: &mut StdRng, _: &Params<'_>) -> Value {
    format_date_time(random_timestamp(rng, start_of_year(), Utc::now().timestamp()))
}

fn time(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!(
        "{:02}:{:02}:{:02}",
        rng.random_range(0..24),
        rng.random_range(0..60),
        rng.random_range(0..60)
    ))
}

fn unix_time(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(rng.random_range(0..=Utc::now().timestamp()))
}

fn year(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(rng.random_range(1970..=Utc::now().year()).to_string())
}

fn month(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!("{:02}", rng.random_range(1..=12)))
}

fn month_name(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, MONTHS))
}

fn day_of_week(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, WEEKDAYS))
}

fn random_int(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let (min, max) = params.int_range(1, 1000);
    Value::from(rng.random_range(min..=max))
}

fn random_number(rng: &mut StdRng, params: &Params<'_>) -> Value {
    match params.i64("digits").filter(|digits| (1..=18).contains(digits)) {
        Some(digits) => {
            let max = 10i64.pow(digits as u32) - 1;
            Value::from(rng.random_range(0..=max))
        }
        None => Value::from(rng.random_range(1..=10_000)),
    }
}

fn random_digit(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(rng.random_range(0..10))
}

fn pyint(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let (min, max) = params.int_range(0, 9999);
    Value::from(rng.random_range(min..=max))
}

fn pyfloat(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let right = params.count("right_digits", 2, 10) as u32;
    let positive = params.bool("positive").unwrap_or(true);
    if params.first_f64(&["min_value", "min", "max_value", "max"]).is_some() {
        let (min, max) = params.float_range(0.0, 1000.0);
        return Value::from(round_to(rng.random_range(min..=max), right));
    }
    let left = params.count("left_digits", 3, 15) as i32;
    let bound = 10f64.powi(left);
    let magnitude = round_to(rng.random_range(0.0..bound), right);
    let value = if !positive && rng.random_bool(0.5) {
        -magnitude
    } else {
        magnitude
    };
    Value::from(value)
}

fn price(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let (min, max) = params.float_range(1.0, 9999.99);
    Value::from(round_to(rng.random_range(min..=max), 2))
}

fn currency(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!("${:.2}", rng.random_range(0.0..1000.0)))
}

fn building_number(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(rng.random_range(1..10_000).to_string())
}

fn street(rng: &mut StdRng) -> String {
    format!("{} {}", pick(rng, STREET_NAMES), pick(rng, STREET_SUFFIXES))
}

fn street_name(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(street(rng))
}

fn street_line(rng: &mut StdRng) -> String {
    let number = rng.random_range(1..10_000);
    format!("{number} {}", street(rng))
}

fn street_address(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(street_line(rng))
}

fn address(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let line = street_line(rng);
    let city = pick(rng, CITIES);
    let state = STATES.choose(rng).map_or("", |(_, abbr)| *abbr);
    let postcode = digits(rng, 5);
    Value::from(format!("{line}, {city}, {state} {postcode}"))
}

fn city(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, CITIES))
}

fn state(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(STATES.choose(rng).map_or("", |(name, _)| *name))
}

fn state_abbr(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(STATES.choose(rng).map_or("", |(_, abbr)| *abbr))
}

fn country(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(COUNTRIES.choose(rng).map_or("", |(name, _)| *name))
}

fn country_code(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(COUNTRIES.choose(rng).map_or("", |(_, code)| *code))
}

fn postcode(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(digits(rng, 5))
}

fn latitude(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(round_to(rng.random_range(-90.0..=90.0), 6))
}

fn longitude(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(round_to(rng.random_range(-180.0..=180.0), 6))
}

fn lorem_words(rng: &mut StdRng, count: usize) -> Vec<&'static str> {
    (0..count).map(|_| pick(rng, LOREM)).collect()
}

fn capitalized_sentence(rng: &mut StdRng, count: usize) -> String {
    let body = lorem_words(rng, count.max(1)).join(" ");
    let mut chars = body.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn word(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, LOREM))
}

fn words(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let default = rng.random_range(2..=5);
    let count = params.first_i64(&["nb", "nb_words"]).map_or(default, |count| {
        usize::try_from(count).unwrap_or(default).clamp(1, 50)
    });
    Value::from(lorem_words(rng, count).join(" "))
}

fn sentence(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let count = params.count("nb_words", 6, 50).max(1);
    Value::from(capitalized_sentence(rng, count))
}

fn paragraph(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let sentences = params.count("nb_sentences", 3, 20).max(1);
    let text: Vec<String> = (0..sentences)
        .map(|_| {
            let count = rng.random_range(4..=10);
            capitalized_sentence(rng, count)
        })
        .collect();
    Value::from(text.join(" "))
}

fn text(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let max_chars = params.count("max_nb_chars", 200, 10_000).max(5);
    let mut out = String::new();
    loop {
        let count = rng.random_range(4..=10);
        let next = capitalized_sentence(rng, count);
        let needed = if out.is_empty() { next.len() } else { next.len() + 1 };
        if out.len() + needed > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&next);
    }
    if out.is_empty() {
        // Limit shorter than any sentence: emit a truncated word run.
        let mut words = String::new();
        for word in lorem_words(rng, max_chars) {
            if words.len() + word.len() + 1 > max_chars - 1 {
                break;
            }
            if !words.is_empty() {
                words.push(' ');
            }
            words.push_str(word);
        }
        out = format!("{words}.");
    }
    Value::from(out)
}

fn catch_phrase(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!(
        "{} {}",
        pick(rng, CATCH_ADJECTIVES),
        pick(rng, CATCH_NOUNS)
    ))
}

fn bs(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!(
        "{} {} {}",
        pick(rng, BS_VERBS),
        pick(rng, CATCH_ADJECTIVES).to_lowercase(),
        pick(rng, BS_NOUNS)
    ))
}

fn slug(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let count = rng.random_range(2..=4);
    Value::from(lorem_words(rng, count).join("-"))
}

fn fill_pattern(rng: &mut StdRng, pattern: &str, letters: bool, numbers: bool) -> String {
    pattern
        .chars()
        .map(|ch| match ch {
            '#' if numbers => char::from(b'0' + rng.random_range(0..10u8)),
            '%' if numbers => char::from(b'1' + rng.random_range(0..9u8)),
            '?' if letters => letter(rng),
            other => other,
        })
        .collect()
}

fn lexify(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let pattern = params.str("text").unwrap_or("????");
    Value::from(fill_pattern(rng, pattern, true, false))
}

fn numerify(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let pattern = params.str("text").unwrap_or("###");
    Value::from(fill_pattern(rng, pattern, false, true))
}

fn bothify(rng: &mut StdRng, params: &Params<'_>) -> Value {
    let pattern = params.str("text").unwrap_or("## ??");
    Value::from(fill_pattern(rng, pattern, true, true))
}

fn company(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let value = match rng.random_range(0..3) {
        0 => format!(
            "{}, {} and {}",
            pick(rng, LAST_NAMES),
            pick(rng, LAST_NAMES),
            pick(rng, LAST_NAMES)
        ),
        1 => format!("{}-{}", pick(rng, LAST_NAMES), pick(rng, LAST_NAMES)),
        _ => format!("{} {}", pick(rng, LAST_NAMES), pick(rng, COMPANY_SUFFIXES)),
    };
    Value::from(value)
}

fn company_suffix(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, COMPANY_SUFFIXES))
}

fn job(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, JOBS))
}

fn department(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, DEPARTMENTS))
}

fn currency_code(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, CURRENCY_CODES))
}

fn domain(rng: &mut StdRng) -> String {
    format!("{}.{}", pick(rng, LAST_NAMES).to_lowercase(), pick(rng, TLDS))
}

fn domain_name(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(domain(rng))
}

fn url(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!("https://www.{}/", domain(rng)))
}

fn ipv4(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let octets: [u8; 4] = rng.random();
    Value::from(std::net::Ipv4Addr::from(octets).to_string())
}

fn ipv6(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let segments: [u16; 8] = rng.random();
    Value::from(std::net::Ipv6Addr::from(segments).to_string())
}

fn mac_address(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let bytes: [u8; 6] = rng.random();
    let parts: Vec<String> = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
    Value::from(parts.join(":"))
}

fn uuid4(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Value::from(Uuid::from_bytes(bytes).to_string())
}

fn ssn(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!(
        "{:03}-{:02}-{:04}",
        rng.random_range(1..900),
        rng.random_range(1..100),
        rng.random_range(1..10_000)
    ))
}

fn ein(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!("{:02}-{}", rng.random_range(10..100), digits(rng, 7)))
}

/// Visa-style 16-digit number with a valid Luhn check digit.
fn credit_card_number(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let mut number = format!("4{}", digits(rng, 14));
    let sum: u32 = number
        .chars()
        .rev()
        .filter_map(|ch| ch.to_digit(10))
        .enumerate()
        .map(|(idx, digit)| {
            if idx % 2 == 0 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    let check = (10 - sum % 10) % 10;
    number.push(char::from(b'0' + check as u8));
    Value::from(number)
}

fn iban(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let bank: String = (0..4).map(|_| letter(rng).to_ascii_uppercase()).collect();
    Value::from(format!("GB{}{bank}{}", digits(rng, 2), digits(rng, 14)))
}

fn boolean(rng: &mut StdRng, params: &Params<'_>) -> Value {
    Value::from(rng.random_bool(params.chance("chance_of_getting_true", 50.0)))
}

fn color_name(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(pick(rng, COLORS))
}

fn hex_color(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let [r, g, b]: [u8; 3] = rng.random();
    Value::from(format!("#{r:02x}{g:02x}{b:02x}"))
}

fn rgb_color(rng: &mut StdRng, _: &Params<'_>) -> Value {
    let [r, g, b]: [u8; 3] = rng.random();
    Value::from(format!("{r},{g},{b}"))
}

fn product_name(rng: &mut StdRng, _: &Params<'_>) -> Value {
    Value::from(format!(
        "{} {} {}",
        pick(rng, PRODUCT_ADJECTIVES),
        pick(rng, PRODUCT_MATERIALS),
        pick(rng, PRODUCT_NOUNS)
    ))
}

fn random_element(rng: &mut StdRng, params: &Params<'_>) -> Value {
    match params.array("elements") {
        Some(elements) => elements.choose(rng).cloned().unwrap_or(Value::Null),
        None => Value::from(pick(rng, &["a", "b", "c"])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use serde_json::{Map, json};

    fn run(method: &str, params: Value) -> Value {
        let map: Map<String, Value> = params.as_object().cloned().unwrap_or_default();
        let generator = lookup(method).expect("catalog method");
        let mut rng = StdRng::seed_from_u64(11);
        generator(&mut rng, &Params::new(&map))
    }

    #[test]
    fn every_method_produces_a_value() {
        let mut rng = StdRng::seed_from_u64(3);
        for method in methods() {
            let generator = lookup(method).expect("listed method");
            let value = generator(&mut rng, &Params::empty());
            assert!(!value.is_null(), "{method} produced null");
        }
    }

    #[test]
    fn random_int_honours_bounds() {
        for seed in 0..50 {
            let map: Map<String, Value> =
                json!({"min": 10, "max": 12}).as_object().cloned().unwrap_or_default();
            let mut rng = StdRng::seed_from_u64(seed);
            let value = random_int(&mut rng, &Params::new(&map));
            let value = value.as_i64().expect("int");
            assert!((10..=12).contains(&value));
        }
    }

    #[test]
    fn pydecimal_respects_precision() {
        let value = run(
            "pydecimal",
            json!({"left_digits": 2, "right_digits": 1, "positive": true}),
        );
        let value = value.as_f64().expect("float");
        assert!((0.0..100.0).contains(&value));
        assert_eq!(round_to(value, 1), value);
    }

    #[test]
    fn extreme_float_bounds_fall_back_to_defaults() {
        for method in ["price", "pyfloat", "pydecimal"] {
            let value = run(method, json!({"min": -1e308, "max": 1e308}));
            let value = value.as_f64().expect("float");
            assert!(value.is_finite(), "{method} produced {value}");
            assert!((0.0..=9999.99).contains(&value), "{method} produced {value}");
        }
    }

    #[test]
    fn patterns_are_filled() {
        let value = run("bothify", json!({"text": "SKU-####-??"}));
        let text = value.as_str().expect("text");
        assert_eq!(text.len(), 11);
        assert!(text.starts_with("SKU-"));
        assert!(text[4..8].chars().all(|c| c.is_ascii_digit()));
        assert!(text[9..].chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn text_stays_within_limit() {
        for limit in [5, 20, 200] {
            let value = run("text", json!({"max_nb_chars": limit}));
            let text = value.as_str().expect("text");
            assert!(text.len() <= limit, "{text:?} exceeds {limit}");
        }
    }

    #[test]
    fn uuid_is_version_four() {
        let value = run("uuid4", json!({}));
        let uuid = Uuid::parse_str(value.as_str().expect("text")).expect("uuid");
        assert_eq!(uuid.get_version_num(), 4);
    }

    #[test]
    fn credit_card_passes_luhn() {
        let value = run("credit_card_number", json!({}));
        let number = value.as_str().expect("text");
        assert_eq!(number.len(), 16);
        let sum: u32 = number
            .chars()
            .rev()
            .filter_map(|c| c.to_digit(10))
            .enumerate()
            .map(|(idx, d)| if idx % 2 == 1 { (d * 2) % 10 + (d * 2) / 10 } else { d })
            .sum();
        assert_eq!(sum % 10, 0);
    }

    #[test]
    fn random_element_uses_elements() {
        let value = run("random_element", json!({"elements": ["x"]}));
        assert_eq!(value, json!("x"));
    }

    #[test]
    fn date_between_uses_offsets() {
        let value = run("date_between", json!({"start_date": "today", "end_date": "today"}));
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(value, json!(today));
    }
}
