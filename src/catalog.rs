use crate::target::{StringTarget, Target};
use crate::{Diagnostic, Error, Field, ParseOptions, Parser, Product, Row};
use std::cmp::Ordering;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// The category that always sorts first in [`Catalog::categories`]
const TOP_PICKS: &str = "Top Picks";

/// Where a table of products comes from
pub enum Source {
	Text(String),
	/// A `.csv` or `.tsv` file
	Path(PathBuf),
	Reader(Box<dyn Read>),
}

/// A source that could not be loaded, by its position in the source list
#[derive(Debug, Clone, PartialEq)]
pub struct SourceError {
	pub source: usize,
	pub error: Error,
}

/// The products of one page session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
	products: Vec<Product>,
	pub diagnostics: Vec<Diagnostic>,
	pub source_errors: Vec<SourceError>,
}

impl Catalog {
	pub fn from_products(products: Vec<Product>) -> Self {
		Catalog {
			products,
			..Catalog::default()
		}
	}

	pub fn from_text(text: &str) -> Self {
		Self::from_text_with(&Parser::default(), text)
	}

	pub fn from_text_with(parser: &Parser, text: &str) -> Self {
		let parsed = parser.parse(text);
		Catalog {
			products: parsed.products,
			diagnostics: parsed.diagnostics,
			source_errors: Vec::new(),
		}
	}

	/// Reads a comma separated table. Only read errors are returned, bad content becomes diagnostics.
	pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, Error> {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes)?;
		let parsed = Parser::default().parse_bytes(&bytes);
		Ok(Catalog {
			products: parsed.products,
			diagnostics: parsed.diagnostics,
			source_errors: Vec::new(),
		})
	}

	/// Load a CSV or TSV file.
	///
	/// ## Example
	///
	/// ```
	/// use storefront_csv::Catalog;
	///
	/// let catalog = Catalog::from_path("test/products.tsv").unwrap();
	///
	/// assert_eq!(catalog.products()[0].title(), Some("Interactive Cat Toy"));
	/// ```
	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
		let parser = Parser::new(ParseOptions::for_path(&path)?);
		let bytes = fs::read(path)?;
		let parsed = parser.parse_bytes(&bytes);
		Ok(Catalog {
			products: parsed.products,
			diagnostics: parsed.diagnostics,
			source_errors: Vec::new(),
		})
	}

	/// Load every source, keeping the products of the ones that succeed.
	///
	/// ## Example
	///
	/// ```
	/// use storefront_csv::{Catalog, Source};
	///
	/// let catalog = Catalog::from_sources(vec![
	///   Source::Text("title\nA".to_string()),
	///   Source::Path("test/missing.csv".into()),
	///   Source::Text("name\nB".to_string()),
	/// ]);
	///
	/// assert_eq!(catalog.len(), 2);
	/// assert_eq!(catalog.source_errors[0].source, 1);
	/// ```
	pub fn from_sources(sources: Vec<Source>) -> Self {
		let mut catalog = Catalog::default();
		for (index, source) in sources.into_iter().enumerate() {
			let loaded = match source {
				Source::Text(text) => Ok(Catalog::from_text(&text)),
				Source::Path(path) => Catalog::from_path(path),
				Source::Reader(reader) => Catalog::from_reader(reader),
			};
			match loaded {
				Ok(loaded) => catalog.extend(loaded),
				Err(error) => {
					log::warn!("Source {} failed to load: {}", index, error);
					catalog.source_errors.push(SourceError {
						source: index,
						error,
					});
				}
			}
		}
		catalog
	}

	/// Append another catalog's products, diagnostics and source errors
	pub fn extend(&mut self, other: Catalog) {
		self.products.extend(other.products);
		self.diagnostics.extend(other.diagnostics);
		self.source_errors.extend(other.source_errors);
	}

	pub fn products(&self) -> &[Product] {
		&self.products
	}

	pub fn len(&self) -> usize {
		self.products.len()
	}

	pub fn is_empty(&self) -> bool {
		self.products.is_empty()
	}

	/// Unique categories in first-seen order, with "Top Picks" first when present
	pub fn categories(&self) -> Vec<&str> {
		let mut categories: Vec<&str> = Vec::new();
		for category in self.products.iter().flat_map(|p| &p.category) {
			if !categories.contains(&category.as_str()) {
				categories.push(category);
			}
		}
		if let Some(index) = categories.iter().position(|c| *c == TOP_PICKS) {
			let top = categories.remove(index);
			categories.insert(0, top);
		}
		categories
	}

	pub fn with_notes(&self) -> impl Iterator<Item = &Product> {
		self.products
			.iter()
			.filter(|p| p.notes().map_or(false, |notes| !notes.is_empty()))
	}

	pub fn view(&self) -> CatalogView<'_> {
		CatalogView {
			products: &self.products,
			category: None,
			query: String::new(),
			order: SortOrder::Featured,
		}
	}

	/// Write the products as a canonical table: recognized columns first, then
	/// other columns in first-seen order.
	pub fn write(&self, mut target: impl Target) -> Result<(), Error> {
		let columns = self.columns();
		target.write_headers(&columns)?;
		for product in &self.products {
			let row: Row = columns
				.iter()
				.map(|column| export_value(product, column))
				.collect();
			target.write_row(&row)?;
		}
		target.flush()?;
		Ok(())
	}

	/// Shorthand for writing to a [`StringTarget`].
	///
	/// ## Example
	///
	/// ```
	/// use storefront_csv::Catalog;
	///
	/// let csv = Catalog::from_text("Name,Price,Category\nBed,$20.50,\"home, cat-gear\"")
	///   .collect_into_string()
	///   .unwrap();
	///
	/// assert_eq!(csv, "title,category,price\nBed,\"home, cat-gear\",20.5\n");
	/// ```
	pub fn collect_into_string(&self) -> Result<String, Error> {
		let mut csv = String::new();
		self.write(StringTarget::new(&mut csv))?;
		Ok(csv)
	}

	fn columns(&self) -> Vec<String> {
		let mut others: Vec<&str> = Vec::new();
		let mut present: Vec<&str> = Vec::new();
		for product in &self.products {
			for (name, _) in product.fields() {
				if present.contains(&name) {
					continue;
				}
				present.push(name);
				if let Field::Other(_) = Field::from_name(name) {
					others.push(name);
				}
			}
		}
		Field::CANONICAL
			.iter()
			.filter(|field| {
				matches!(field, Field::Price | Field::Category) || present.contains(&field.as_str())
			})
			.map(|field| field.as_str().to_string())
			.chain(others.into_iter().map(String::from))
			.collect()
	}
}

fn export_value(product: &Product, column: &str) -> String {
	match Field::from_name(column) {
		Field::Price => product.price.to_string(),
		Field::Category => product.category.join(", "),
		_ => product.get(column).unwrap_or_default().to_string(),
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
	/// Source order
	#[default]
	Featured,
	PriceAsc,
	PriceDesc,
	/// Case-insensitive by title, untitled or blank titles last
	TitleAsc,
	TitleDesc,
}

impl SortOrder {
	/// Reads a sort selector value like `price-asc`. Unknown values keep source order.
	pub fn from_name(name: &str) -> Self {
		match name {
			"price-asc" => SortOrder::PriceAsc,
			"price-desc" => SortOrder::PriceDesc,
			"name-asc" => SortOrder::TitleAsc,
			"name-desc" => SortOrder::TitleDesc,
			_ => SortOrder::Featured,
		}
	}
}

/// A filtered, sorted selection of a catalog.
///
/// ## Example
///
/// ```
/// use storefront_csv::{Catalog, SortOrder};
///
/// let catalog = Catalog::from_text(
///   "title,price,category\n\
///    Cat Tree,80,Cat Gear\n\
///    Cat Toy,5,\"Cat Gear, Top Picks\"\n\
///    Lamp,30,Home",
/// );
/// let titles: Vec<_> = catalog
///   .view()
///   .category("Cat Gear")
///   .search("CAT")
///   .sort(SortOrder::PriceAsc)
///   .collect()
///   .into_iter()
///   .filter_map(|p| p.title())
///   .collect();
///
/// assert_eq!(titles, vec!["Cat Toy", "Cat Tree"]);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogView<'a> {
	products: &'a [Product],
	category: Option<String>,
	query: String,
	order: SortOrder,
}

impl<'a> CatalogView<'a> {
	/// Only products in `category`. `"All"` removes the filter.
	pub fn category(mut self, category: &str) -> Self {
		self.category = match category {
			"All" => None,
			category => Some(category.to_string()),
		};
		self
	}

	/// Case-insensitive title search
	pub fn search(mut self, query: &str) -> Self {
		self.query = query.to_lowercase();
		self
	}

	pub fn sort(mut self, order: SortOrder) -> Self {
		self.order = order;
		self
	}

	pub fn collect(self) -> Vec<&'a Product> {
		let mut products: Vec<&'a Product> = self
			.products
			.iter()
			.filter(|p| match &self.category {
				Some(category) => p.category.iter().any(|c| c == category),
				None => true,
			})
			.filter(|p| {
				self.query.is_empty()
					|| p.title()
						.map_or(false, |title| title.to_lowercase().contains(&self.query))
			})
			.collect();
		match self.order {
			SortOrder::Featured => {}
			SortOrder::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
			SortOrder::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
			SortOrder::TitleAsc => products.sort_by(|a, b| compare_titles(a, b, false)),
			SortOrder::TitleDesc => products.sort_by(|a, b| compare_titles(a, b, true)),
		}
		products
	}
}

fn compare_titles(a: &Product, b: &Product, descending: bool) -> Ordering {
	let a = a.title().filter(|title| !title.is_empty());
	let b = b.title().filter(|title| !title.is_empty());
	match (a, b) {
		(Some(a), Some(b)) => {
			let order = a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b));
			if descending {
				order.reverse()
			} else {
				order
			}
		}
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn catalog() -> Catalog {
		Catalog::from_text(
			"Name,Price,Category,Notes\n\
			Bed,40,Home,\n\
			Toy,5,\"Cat Gear, Top Picks\",\"Squeaks\"\n\
			Feeder,40,\"Tech, Home\",\n\
			Brush,12,Cat Gear,\"Soft\"",
		)
	}

	fn titles(products: Vec<&Product>) -> Vec<&str> {
		products.into_iter().filter_map(|p| p.title()).collect()
	}

	#[test]
	fn unique_categories_top_picks_first() {
		assert_eq!(catalog().categories(), vec!["Top Picks", "Home", "Cat Gear", "Tech"]);
	}

	#[test]
	fn all_category_is_unfiltered() {
		let catalog = catalog();
		assert_eq!(catalog.view().category("All").collect().len(), 4);
		assert_eq!(titles(catalog.view().category("Home").collect()), vec!["Bed", "Feeder"]);
		assert!(catalog.view().category("home").collect().is_empty());
	}

	#[test]
	fn stable_price_sort() {
		let catalog = catalog();
		assert_eq!(
			titles(catalog.view().sort(SortOrder::PriceAsc).collect()),
			vec!["Toy", "Brush", "Bed", "Feeder"]
		);
		assert_eq!(
			titles(catalog.view().sort(SortOrder::PriceDesc).collect()),
			vec!["Bed", "Feeder", "Brush", "Toy"]
		);
		assert_eq!(
			titles(catalog.view().sort(SortOrder::from_name("featured")).collect()),
			vec!["Bed", "Toy", "Feeder", "Brush"]
		);
	}

	#[test]
	fn stable_title_sort() {
		let catalog = Catalog::from_text("title,price\nzebra,1\n,2\nApple,3\nbanana,4\nApple,5");
		let asc = catalog.view().sort(SortOrder::from_name("name-asc")).collect();
		assert_eq!(titles(asc.clone()), vec!["Apple", "Apple", "banana", "zebra", ""]);
		assert_eq!(asc[1].price, 5.0);
		assert_eq!(asc[4].price, 2.0);

		let desc = catalog.view().sort(SortOrder::from_name("name-desc")).collect();
		assert_eq!(titles(desc.clone()), vec!["zebra", "banana", "Apple", "Apple", ""]);
		assert_eq!(desc[2].price, 3.0);
		assert_eq!(desc[4].title(), Some(""));
	}

	#[test]
	fn search_skips_untitled() {
		let mut catalog = catalog();
		catalog.extend(Catalog::from_products(vec![Product::new().with_field("store", "Amazon")]));
		assert_eq!(catalog.view().search("").collect().len(), 5);
		assert_eq!(titles(catalog.view().search("e").collect()), vec!["Bed", "Feeder"]);
	}

	#[test]
	fn notes() {
		let catalog = catalog();
		let with_notes: Vec<_> = catalog.with_notes().filter_map(|p| p.title()).collect();
		assert_eq!(with_notes, vec!["Toy", "Brush"]);
	}

	#[test]
	fn sources_settle_independently() {
		let catalog = Catalog::from_sources(vec![
			Source::Path("test/products.csv".into()),
			Source::Path("test/products.json".into()),
			Source::Reader(Box::new("title\nReader item".as_bytes())),
			Source::Text("title".to_string()),
		]);
		assert_eq!(catalog.len(), 5);
		assert_eq!(catalog.products()[4].title(), Some("Reader item"));
		assert_eq!(
			catalog.source_errors,
			vec![SourceError {
				source: 1,
				error: Error::UnsupportedFile("test/products.json".to_string()),
			}]
		);
		assert_eq!(catalog.diagnostics, vec![Diagnostic::EmptyOrHeaderOnly]);
	}

	#[test]
	fn missing_file() {
		let err = Catalog::from_path("test/missing.csv").unwrap_err();
		assert!(matches!(err, Error::Io(_)));
	}

	#[test]
	fn export_reparses() {
		let catalog = Catalog::from_path("test/products.csv").unwrap();
		let csv = catalog.collect_into_string().unwrap();
		let reparsed = Catalog::from_text(&csv);
		assert_eq!(reparsed.products(), catalog.products());
	}

	#[test]
	fn export_columns() {
		let catalog = Catalog::from_text("SKU,Store,Title\n1,Amazon,Bed");
		let csv = catalog.collect_into_string().unwrap();
		assert_eq!(csv, "title,store,category,price,sku\nBed,Amazon,,0,1\n");
	}
}
