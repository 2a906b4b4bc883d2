use crate::{Field, Record};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A record with `price` and `category` coerced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Product {
	pub price: f64,
	pub category: Vec<String>,
	fields: Record,
}

impl Product {
	pub fn new() -> Self {
		Product::default()
	}

	pub fn from_record(mut record: Record) -> Self {
		let price = match record.remove(Field::Price.as_str()) {
			Some(raw) => coerce_price(&raw),
			None => 0.0,
		};
		let category = match record.remove(Field::Category.as_str()) {
			Some(raw) => split_categories(&raw),
			None => Vec::new(),
		};
		Product {
			price,
			category,
			fields: record,
		}
	}

	/// Sets a text field. `price` and `category` are coerced like parsed values.
	pub fn with_field(mut self, name: &str, value: &str) -> Self {
		match Field::from_name(name) {
			Field::Price => self.price = coerce_price(value),
			Field::Category => self.category = split_categories(value),
			_ => self.fields.insert(name, value),
		}
		self
	}

	/// Any text field by canonical name
	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields.get(name)
	}

	pub fn title(&self) -> Option<&str> {
		self.get(Field::Title.as_str())
	}

	pub fn url(&self) -> Option<&str> {
		self.get(Field::Url.as_str())
	}

	pub fn image(&self) -> Option<&str> {
		self.get(Field::Image.as_str())
	}

	pub fn store(&self) -> Option<&str> {
		self.get(Field::Store.as_str())
	}

	pub fn notes(&self) -> Option<&str> {
		self.get(Field::Notes.as_str())
	}

	pub fn recommendation(&self) -> Option<Recommendation> {
		self.get(Field::Recommendation.as_str())
			.and_then(Recommendation::parse)
	}

	/// Text fields, excluding `price` and `category`
	pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
		self.fields.iter()
	}
}

impl Serialize for Product {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
		for (name, value) in self.fields.iter() {
			map.serialize_entry(name, value)?;
		}
		map.serialize_entry(Field::Price.as_str(), &self.price)?;
		map.serialize_entry(Field::Category.as_str(), &self.category)?;
		map.end()
	}
}

/// Editorial verdict shown as a badge on a product card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
	Recommended,
	Ok,
	Avoid,
}

impl Recommendation {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_lowercase().as_str() {
			"recommended" => Some(Recommendation::Recommended),
			"ok" => Some(Recommendation::Ok),
			"avoid" => Some(Recommendation::Avoid),
			_ => None,
		}
	}

	pub fn badge(&self) -> &'static str {
		match self {
			Recommendation::Recommended => "BNB PICK",
			Recommendation::Ok => "GOOD FIND",
			Recommendation::Avoid => "NOT OUR FAVE",
		}
	}
}

/// Keeps only digits, `.` and `-`, then reads the longest leading number.
/// Anything without a number in front is `0`.
pub(crate) fn coerce_price(raw: &str) -> f64 {
	let cleaned: String = raw
		.chars()
		.filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
		.collect();
	let number = leading_number(&cleaned);
	match number.parse::<f64>() {
		Ok(price) if price.is_finite() => price,
		_ => 0.0,
	}
}

/// `-?digits[.digits]` from the start of `s`, normalized so `str::parse` accepts it
fn leading_number(s: &str) -> String {
	let bytes = s.as_bytes();
	let mut end = 0;
	if bytes.first() == Some(&b'-') {
		end = 1;
	}
	let int_start = end;
	while end < bytes.len() && bytes[end].is_ascii_digit() {
		end += 1;
	}
	let int_digits = end - int_start;

	let mut frac_digits = 0;
	if end < bytes.len() && bytes[end] == b'.' {
		let mut frac_end = end + 1;
		while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
			frac_end += 1;
		}
		frac_digits = frac_end - end - 1;
		if frac_digits > 0 {
			end = frac_end;
		}
	}

	if int_digits == 0 && frac_digits == 0 {
		return String::new();
	}
	let mut number = String::with_capacity(end + 1);
	number.push_str(&s[..int_start]);
	if int_digits == 0 {
		number.push('0');
	}
	number.push_str(&s[int_start..end]);
	number
}

/// Comma separated, trimmed, empties dropped. Order and duplicates are kept.
pub(crate) fn split_categories(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(str::trim)
		.filter(|c| !c.is_empty())
		.map(String::from)
		.collect()
}
