//! Tolerant parsing of spreadsheet exports into storefront product records.
//!
//! ```
//! use storefront_csv::parse;
//!
//! let parsed = parse("Name,Price,Category\n\"Cat Tree\",\"$1,299.00\",\"Cat Gear, Home\"");
//! let product = &parsed.products[0];
//!
//! assert_eq!(product.title(), Some("Cat Tree"));
//! assert_eq!(product.price, 1299.0);
//! assert_eq!(product.category, vec!["Cat Gear", "Home"]);
//! ```

mod catalog;
mod config;
mod fields;
mod headers;
mod lines;
mod parser;
mod product;
mod record;
mod target;

pub use catalog::{Catalog, CatalogView, SortOrder, Source, SourceError};
pub use config::{ButtonLabel, CategoryConfig, Profile, SocialLink, StoreConfig};
pub use headers::{Field, HeaderAliases, Headers};
pub use parser::{parse, parse_bytes, Diagnostic, FailureKind, ParseOptions, Parsed, Parser};
pub use product::{Product, Recommendation};
pub use record::Record;
pub use target::{PathTarget, StdoutTarget, StringTarget, Target};

use std::fmt;
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	Io(String),
	Csv(String),
	Config(String),
	/// Only `.csv` and `.tsv` files can be loaded by path
	UnsupportedFile(String),
}
impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::Io(e) => write!(f, "IO error: {}", e),
			Error::Csv(e) => write!(f, "CSV error: {}", e),
			Error::Config(e) => write!(f, "Invalid config: {}", e),
			Error::UnsupportedFile(path) => write!(f, "Unsupported file {}", path),
		}
	}
}
impl std::error::Error for Error {}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		Error::Io(err.to_string())
	}
}
impl From<csv::Error> for Error {
	fn from(err: csv::Error) -> Self {
		Error::Csv(err.to_string())
	}
}
impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Config(err.to_string())
	}
}

pub type Row = csv::StringRecord;
