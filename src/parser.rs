use crate::fields::split_fields;
use crate::lines::logical_lines;
use crate::{Error, HeaderAliases, Headers, Product, Record};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
	/// The payload was not text
	InvalidUtf8 { valid_up_to: usize },
	/// A bug in the scanner, carrying the panic message
	Internal(String),
}

/// Something noteworthy about a parse. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
	/// Fewer than two non-blank logical lines
	EmptyOrHeaderOnly,
	ParseFailure(FailureKind),
}
impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Diagnostic::EmptyOrHeaderOnly => write!(f, "No data rows"),
			Diagnostic::ParseFailure(FailureKind::InvalidUtf8 { valid_up_to }) => {
				write!(f, "Input is not valid UTF-8 after byte {}", valid_up_to)
			}
			Diagnostic::ParseFailure(FailureKind::Internal(message)) => {
				write!(f, "Parse failure: {}", message)
			}
		}
	}
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parsed {
	pub products: Vec<Product>,
	pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
	/// True when at least one product was parsed and nothing was reported
	pub fn is_clean(&self) -> bool {
		!self.products.is_empty() && self.diagnostics.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
	pub delimiter: u8,
	pub aliases: HeaderAliases,
}

impl Default for ParseOptions {
	fn default() -> Self {
		ParseOptions {
			delimiter: b',',
			aliases: HeaderAliases::default(),
		}
	}
}

impl ParseOptions {
	/// Options for a CSV or TSV file, picked by extension
	pub fn for_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
		let path = path.as_ref();
		let ext = path.extension().unwrap_or_default();
		let delimiter = match ext.to_string_lossy().to_lowercase().as_str() {
			"tsv" => b'\t',
			"csv" => b',',
			_ => return Err(Error::UnsupportedFile(path.display().to_string())),
		};
		Ok(ParseOptions::default().delimiter(delimiter))
	}

	pub fn delimiter(mut self, delimiter: u8) -> Self {
		self.delimiter = delimiter;
		self
	}

	pub fn alias(mut self, raw: &str, canonical: &str) -> Self {
		self.aliases = self.aliases.with_alias(raw, canonical);
		self
	}
}

/// Turns delimited text into products.
///
/// ## Example
///
/// ```
/// use storefront_csv::{ParseOptions, Parser};
///
/// let parser = Parser::new(ParseOptions::default().delimiter(b'\t').alias("Link", "url"));
/// let parsed = parser.parse("Title\tLink\nCat Tree\thttps://example.com/tree");
///
/// assert_eq!(parsed.products[0].url(), Some("https://example.com/tree"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parser {
	options: ParseOptions,
}

impl Parser {
	pub fn new(options: ParseOptions) -> Self {
		Parser { options }
	}

	pub fn options(&self) -> &ParseOptions {
		&self.options
	}

	/// Never panics. Products assembled before an internal failure are kept.
	pub fn parse(&self, text: &str) -> Parsed {
		let mut parsed = Parsed::default();
		let scanned = panic::catch_unwind(AssertUnwindSafe(|| {
			self.scan(text, &mut parsed.products)
		}));
		match scanned {
			Ok(true) => {}
			Ok(false) => parsed.diagnostics.push(Diagnostic::EmptyOrHeaderOnly),
			Err(payload) => parsed
				.diagnostics
				.push(Diagnostic::ParseFailure(FailureKind::Internal(panic_message(payload)))),
		}
		for diagnostic in &parsed.diagnostics {
			log::warn!("{}", diagnostic);
		}
		parsed
	}

	/// Like [`Parser::parse`], for payloads that may not be text
	pub fn parse_bytes(&self, bytes: &[u8]) -> Parsed {
		match std::str::from_utf8(bytes) {
			Ok(text) => self.parse(text),
			Err(e) => {
				let diagnostic = Diagnostic::ParseFailure(FailureKind::InvalidUtf8 {
					valid_up_to: e.valid_up_to(),
				});
				log::warn!("{}", diagnostic);
				Parsed {
					products: Vec::new(),
					diagnostics: vec![diagnostic],
				}
			}
		}
	}

	/// Returns false when there is no header or no data line
	fn scan(&self, text: &str, products: &mut Vec<Product>) -> bool {
		let lines = logical_lines(text);
		if lines.len() < 2 {
			return false;
		}
		let delimiter = char::from(self.options.delimiter);
		let headers = Headers::from_line(lines[0], delimiter, &self.options.aliases);
		for line in &lines[1..] {
			let row = split_fields(line, delimiter);
			products.push(Product::from_record(Record::assemble(&headers, &row)));
		}
		log::debug!(
			"Parsed {} products from {} lines with {} columns",
			products.len(),
			lines.len(),
			headers.len()
		);
		true
	}
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		message.to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic".to_string()
	}
}

/// Parses with the default options
pub fn parse(text: &str) -> Parsed {
	Parser::default().parse(text)
}

/// Parses possibly non-text input with the default options
pub fn parse_bytes(bytes: &[u8]) -> Parsed {
	Parser::default().parse_bytes(bytes)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_aliasing() {
		for (header, field) in [
			("Title", "title"),
			("  NAME ", "title"),
			("Product URL", "url"),
			("IMAGE URL", "image"),
			("Store", "store"),
			("Notes ", "notes"),
			("Recommendation", "recommendation"),
		] {
			let parsed = parse(&format!("{}\nvalue", header));
			assert_eq!(parsed.products.len(), 1, "{}", header);
			assert_eq!(parsed.products[0].get(field), Some("value"), "{}", header);
		}
		let parsed = parse("PRICE\n12");
		assert_eq!(parsed.products[0].price, 12.0);
		let parsed = parse(" Category \nvalue");
		assert_eq!(parsed.products[0].category, vec!["value"]);
		assert_eq!(parsed.products[0].get("category"), None);
	}

	#[test]
	fn byte_order_mark_before_header() {
		let parsed = parse_bytes(b"\xef\xbb\xbfName,Price\r\nBed,$20");
		assert_eq!(parsed.products[0].title(), Some("Bed"));
		assert_eq!(parsed.products[0].price, 20.0);
	}

	#[test]
	fn quoted_field_integrity() {
		let parsed = parse("title,notes\n\"Cat Tree\",\"Great, comfy, and tall\"");
		assert_eq!(parsed.products.len(), 1);
		assert_eq!(parsed.products[0].title(), Some("Cat Tree"));
		assert_eq!(parsed.products[0].notes(), Some("Great, comfy, and tall"));
		assert!(parsed.is_clean());
	}

	#[test]
	fn escaped_quote() {
		let parsed = parse("title\n\"5\"\" Widget\"");
		assert_eq!(parsed.products[0].title(), Some("5\" Widget"));
	}

	#[test]
	fn embedded_newline() {
		let parsed = parse("title,notes\n\"Item\",\"Line one\nLine two\"");
		assert_eq!(parsed.products.len(), 1);
		assert_eq!(parsed.products[0].notes(), Some("Line one\nLine two"));
	}

	#[test]
	fn coerced_fields() {
		let parsed = parse(
			"Name,Price,Category\n\
			A,\"₹1,299.00\",\"Cat-Bedding, home ,\"\n\
			B,$15,\n\
			C,,Toys\n\
			D,N/A",
		);
		let prices: Vec<f64> = parsed.products.iter().map(|p| p.price).collect();
		assert_eq!(prices, vec![1299.0, 15.0, 0.0, 0.0]);
		assert_eq!(parsed.products[0].category, vec!["Cat-Bedding", "home"]);
		assert!(parsed.products[1].category.is_empty());
		assert_eq!(parsed.products[2].category, vec!["Toys"]);
		assert!(parsed.products[3].category.is_empty());
	}

	#[test]
	fn deterministic() {
		let text = "title,price\n\"a, b\",1\nc,2\n";
		assert_eq!(parse(text), parse(text));
	}

	#[test]
	fn empty_inputs() {
		for text in ["", "\n", "title,url", "title,url\n\n  \r\n"] {
			let parsed = parse(text);
			assert!(parsed.products.is_empty(), "{:?}", text);
			assert_eq!(parsed.diagnostics, vec![Diagnostic::EmptyOrHeaderOnly]);
		}
	}

	#[test]
	fn short_rows_do_not_misalign() {
		let parsed = parse("title,store,notes\nOnly title\nA,Amazon");
		assert_eq!(parsed.products.len(), 2);
		assert_eq!(parsed.products[0].title(), Some("Only title"));
		assert_eq!(parsed.products[0].store(), None);
		assert_eq!(parsed.products[1].store(), Some("Amazon"));
		assert_eq!(parsed.products[1].notes(), None);
	}

	#[test]
	fn extra_fields_are_dropped() {
		let parsed = parse("title\nA,B,C");
		assert_eq!(parsed.products[0].fields().count(), 1);
	}

	#[test]
	fn pass_through_columns() {
		let parsed = parse("Title,SKU\nBed,B-1");
		assert_eq!(parsed.products[0].get("sku"), Some("B-1"));
	}

	#[test]
	fn blank_data_lines_are_skipped() {
		let parsed = parse("title\r\n\r\nA\r\n   \r\nB\r\n");
		let titles: Vec<_> = parsed.products.iter().filter_map(|p| p.title()).collect();
		assert_eq!(titles, vec!["A", "B"]);
	}

	#[test]
	fn invalid_utf8() {
		let parsed = parse_bytes(b"title\n\xff\xfe");
		assert!(parsed.products.is_empty());
		assert_eq!(
			parsed.diagnostics,
			vec![Diagnostic::ParseFailure(FailureKind::InvalidUtf8 { valid_up_to: 6 })]
		);
		assert_eq!(parse_bytes(b"title\nA").products.len(), 1);
	}

	#[test]
	fn options_for_path() {
		assert_eq!(ParseOptions::for_path("a/b.TSV").unwrap().delimiter, b'\t');
		assert_eq!(ParseOptions::for_path("b.csv").unwrap().delimiter, b',');
		assert_eq!(
			ParseOptions::for_path("b.xlsx"),
			Err(Error::UnsupportedFile("b.xlsx".to_string()))
		);
	}

	#[test]
	fn panic_messages() {
		assert_eq!(panic_message(Box::new("boom")), "boom");
		assert_eq!(panic_message(Box::new("boom".to_string())), "boom");
		assert_eq!(panic_message(Box::new(3)), "unknown panic");
	}
}
