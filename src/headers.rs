use std::collections::BTreeMap;
use std::fmt;

/// A recognized storefront column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
	Title,
	Url,
	Image,
	Store,
	Category,
	Notes,
	Price,
	Recommendation,
	Other(String),
}

impl Field {
	/// The recognized columns, in export order
	pub const CANONICAL: [Field; 8] = [
		Field::Title,
		Field::Url,
		Field::Image,
		Field::Store,
		Field::Category,
		Field::Notes,
		Field::Price,
		Field::Recommendation,
	];

	pub fn as_str(&self) -> &str {
		match self {
			Field::Title => "title",
			Field::Url => "url",
			Field::Image => "image",
			Field::Store => "store",
			Field::Category => "category",
			Field::Notes => "notes",
			Field::Price => "price",
			Field::Recommendation => "recommendation",
			Field::Other(name) => name,
		}
	}

	/// Looks up a canonical name. Anything unrecognized becomes `Field::Other`.
	pub fn from_name(name: &str) -> Self {
		Self::CANONICAL
			.iter()
			.find(|field| field.as_str() == name)
			.cloned()
			.unwrap_or_else(|| Field::Other(name.to_string()))
	}
}
impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Maps normalized header labels to canonical field names
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderAliases {
	map: BTreeMap<String, String>,
}

impl Default for HeaderAliases {
	fn default() -> Self {
		let map = [
			("title", Field::Title),
			("name", Field::Title),
			("product url", Field::Url),
			("image url", Field::Image),
			("store", Field::Store),
			("category", Field::Category),
			("notes", Field::Notes),
			("price", Field::Price),
			("recommendation", Field::Recommendation),
		]
		.into_iter()
		.map(|(raw, field)| (raw.to_string(), field.as_str().to_string()))
		.collect();
		HeaderAliases { map }
	}
}

impl HeaderAliases {
	/// An alias table that passes every label through unchanged
	pub fn empty() -> Self {
		HeaderAliases {
			map: BTreeMap::new(),
		}
	}

	/// Adds or replaces an alias. `raw` is normalized the same way header labels are.
	pub fn with_alias(mut self, raw: &str, canonical: &str) -> Self {
		self.map.insert(normalize(raw), canonical.to_string());
		self
	}

	/// Canonical name for a raw header label. Unknown labels pass through normalized.
	pub fn canonical(&self, raw: &str) -> String {
		let normalized = normalize(raw);
		match self.map.get(&normalized) {
			Some(canonical) => canonical.clone(),
			None => normalized,
		}
	}
}

fn normalize(raw: &str) -> String {
	raw.trim().to_lowercase()
}

/// The canonical column names of a table, by position
#[derive(Debug, Clone, PartialEq)]
pub struct Headers {
	names: Vec<String>,
	indexes: BTreeMap<String, usize>,
}

impl Headers {
	/// Header lines are split on the bare delimiter, without quote handling.
	pub fn from_line(line: &str, delimiter: char, aliases: &HeaderAliases) -> Self {
		let mut headers = Headers {
			names: Vec::new(),
			indexes: BTreeMap::new(),
		};
		for raw in line.split(delimiter) {
			headers.push_field(&aliases.canonical(raw));
		}
		headers
	}

	/// Repeated names keep every position, lookups resolve to the last one
	fn push_field(&mut self, name: &str) {
		self.names.push(name.to_string());
		if !name.is_empty() {
			self.indexes.insert(name.to_string(), self.names.len() - 1);
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.indexes.contains_key(name)
	}

	pub fn get_index(&self, name: &str) -> Option<usize> {
		self.indexes.get(name).copied()
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

impl<'a> IntoIterator for &'a Headers {
	type Item = &'a str;
	type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

	fn into_iter(self) -> Self::IntoIter {
		self.names
			.iter()
			.map(String::as_str as fn(&'a String) -> &'a str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn names(headers: &Headers) -> Vec<&str> {
		headers.into_iter().collect()
	}

	#[test]
	fn aliases_are_case_and_space_insensitive() {
		let aliases = HeaderAliases::default();
		assert_eq!(aliases.canonical("Product URL"), "url");
		assert_eq!(aliases.canonical("  NAME "), "title");
		assert_eq!(aliases.canonical("Image Url"), "image");
		assert_eq!(aliases.canonical("Recommendation"), "recommendation");
	}

	#[test]
	fn unknown_labels_pass_through_normalized() {
		let aliases = HeaderAliases::default();
		assert_eq!(aliases.canonical(" SKU "), "sku");
		assert_eq!(aliases.canonical("url"), "url");
	}

	#[test]
	fn custom_alias() {
		let aliases = HeaderAliases::default().with_alias(" Link ", "url");
		assert_eq!(aliases.canonical("LINK"), "url");
		assert_eq!(HeaderAliases::empty().canonical("Name"), "name");
	}

	#[test]
	fn header_line() {
		let headers = Headers::from_line("Name, Product URL ,Price", ',', &HeaderAliases::default());
		assert_eq!(names(&headers), vec!["title", "url", "price"]);
		assert_eq!(headers.get_index("price"), Some(2));
		assert!(!headers.contains("notes"));
	}

	#[test]
	fn repeated_names_resolve_to_last() {
		let headers = Headers::from_line("title,name,,store", ',', &HeaderAliases::default());
		assert_eq!(names(&headers), vec!["title", "title", "", "store"]);
		assert_eq!(headers.get_index("title"), Some(1));
		assert!(!headers.contains(""));
		assert_eq!(headers.len(), 4);
	}

	#[test]
	fn field_names() {
		assert_eq!(Field::from_name("price"), Field::Price);
		assert_eq!(Field::from_name("sku"), Field::Other("sku".to_string()));
		assert_eq!(Field::Url.to_string(), "url");
	}
}
