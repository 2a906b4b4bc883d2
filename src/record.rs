use crate::{Headers, Row};
use linked_hash_map::LinkedHashMap;

/// One data line keyed by canonical field name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
	fields: LinkedHashMap<String, String>,
}

impl Record {
	pub fn new() -> Self {
		Record {
			fields: LinkedHashMap::new(),
		}
	}

	/// Pairs header names with values by position. Extra values are dropped,
	/// missing trailing values leave their fields absent, unnamed columns are skipped.
	pub fn assemble(headers: &Headers, row: &Row) -> Self {
		let mut record = Record::new();
		for (name, value) in headers.into_iter().zip(row.iter()) {
			if name.is_empty() {
				continue;
			}
			record.insert(name, value);
		}
		record
	}

	pub fn insert(&mut self, name: &str, value: &str) {
		self.fields.insert(name.to_string(), value.to_string());
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields.get(name).map(String::as_str)
	}

	pub fn remove(&mut self, name: &str) -> Option<String> {
		self.fields.remove(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.fields
			.iter()
			.map(|(name, value)| (name.as_str(), value.as_str()))
	}
}
