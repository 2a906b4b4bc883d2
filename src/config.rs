use crate::product::coerce_price;
use crate::{Catalog, Error, Product, Source};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const DEFAULT_BUTTON_TEXT: &str = "View Item";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Profile {
	pub name: String,
	pub bio: String,
	pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SocialLink {
	pub name: String,
	pub url: String,
	pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
	pub id: String,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ButtonLabel {
	pub text: String,
	pub icon: Option<String>,
}

/// A storefront page's configuration.
///
/// ## Example
///
/// ```
/// use storefront_csv::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{
///   "profile": { "name": "Bella & Bagheera" },
///   "products": [{ "title": "Pet Camera", "category": "tech home", "store": "Flipkart" }],
///   "buttonMap": { "Flipkart": { "text": "View on Flipkart", "icon": "" } },
///   "footerText": "© {year} Bella & Bagheera"
/// }"#).unwrap();
///
/// let products = config.static_products();
/// assert_eq!(products[0].category, vec!["tech", "home"]);
/// assert_eq!(config.button_for("Flipkart").text, "View on Flipkart");
/// assert_eq!(config.footer_text(2024).unwrap(), "© 2024 Bella & Bagheera");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
	pub profile: Profile,
	pub socials: Vec<SocialLink>,
	pub categories: Vec<CategoryConfig>,
	products: Vec<StaticProduct>,
	#[serde(alias = "buttonMap")]
	pub button_map: BTreeMap<String, ButtonLabel>,
	/// Paths of `.csv` or `.tsv` sheet exports. Empty means the static products are used.
	/// A published sheet URL is not fetched here: the host downloads it and
	/// passes the body to [`Catalog::from_sources`] as [`Source::Text`].
	#[serde(
		alias = "sheetSources",
		alias = "googleSheetUrl",
		deserialize_with = "one_or_many"
	)]
	pub sheet_sources: Vec<String>,
	#[serde(alias = "footerText")]
	pub footer_text: Option<String>,
	#[serde(alias = "affiliateDisclosure")]
	pub affiliate_disclosure: Option<String>,
}

impl StoreConfig {
	pub fn from_json(json: &str) -> Result<Self, Error> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
		let json = fs::read_to_string(path)?;
		Self::from_json(&json)
	}

	/// Button for a store. Stores without text fall back to "View Item".
	pub fn button_for(&self, store: &str) -> ButtonLabel {
		let entry = self.button_map.get(store);
		let text = match entry {
			Some(label) if !label.text.is_empty() => label.text.clone(),
			_ => DEFAULT_BUTTON_TEXT.to_string(),
		};
		let icon = entry
			.and_then(|label| label.icon.clone())
			.filter(|icon| !icon.is_empty());
		ButtonLabel { text, icon }
	}

	pub fn footer_text(&self, year: i32) -> Option<String> {
		self.footer_text
			.as_deref()
			.filter(|text| !text.is_empty())
			.map(|text| text.replace("{year}", &year.to_string()))
	}

	pub fn static_products(&self) -> Vec<Product> {
		self.products.iter().map(StaticProduct::to_product).collect()
	}

	/// The configured sheets when there are any, the static products otherwise
	pub fn load_catalog(&self) -> Catalog {
		if self.sheet_sources.is_empty() {
			return Catalog::from_products(self.static_products());
		}
		Catalog::from_sources(
			self.sheet_sources
				.iter()
				.map(|path| Source::Path(path.into()))
				.collect(),
		)
	}
}

/// A hard-coded product. Categories are whitespace separated or a list.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct StaticProduct {
	#[serde(default)]
	category: Option<Categories>,
	#[serde(default)]
	price: Option<Value>,
	#[serde(flatten)]
	fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Categories {
	Words(String),
	List(Vec<String>),
}

impl StaticProduct {
	fn to_product(&self) -> Product {
		let mut product = Product::new();
		for (name, value) in &self.fields {
			match value {
				Value::String(s) => product = product.with_field(name, s),
				Value::Number(n) => product = product.with_field(name, &n.to_string()),
				Value::Bool(b) => product = product.with_field(name, &b.to_string()),
				_ => {}
			}
		}
		product.price = match &self.price {
			Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
			Some(Value::String(s)) => coerce_price(s),
			_ => 0.0,
		};
		product.category = match &self.category {
			Some(Categories::Words(words)) => words.split_whitespace().map(String::from).collect(),
			Some(Categories::List(list)) => list
				.iter()
				.map(|c| c.trim())
				.filter(|c| !c.is_empty())
				.map(String::from)
				.collect(),
			None => Vec::new(),
		};
		product
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
	One(String),
	Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
	let sources = match OneOrMany::deserialize(deserializer)? {
		OneOrMany::One(source) => vec![source],
		OneOrMany::Many(sources) => sources,
	};
	Ok(sources
		.into_iter()
		.filter(|source| !source.trim().is_empty())
		.collect())
}
