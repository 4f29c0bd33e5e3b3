use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub mod filter;

pub type ProductId = u32;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch catalog from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id {0} in catalog")]
    DuplicateId(ProductId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Cleanser,
    Moisturizer,
    Skincare,
    Suncare,
    Haircare,
    HairColor,
    HairStyling,
    Makeup,
    MensGrooming,
    Fragrance,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Self::Cleanser,
        Self::Moisturizer,
        Self::Skincare,
        Self::Suncare,
        Self::Haircare,
        Self::HairColor,
        Self::HairStyling,
        Self::Makeup,
        Self::MensGrooming,
        Self::Fragrance,
    ];

    /// Wire name used by the catalog source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleanser => "cleanser",
            Self::Moisturizer => "moisturizer",
            Self::Skincare => "skincare",
            Self::Suncare => "suncare",
            Self::Haircare => "haircare",
            Self::HairColor => "hair color",
            Self::HairStyling => "hair styling",
            Self::Makeup => "makeup",
            Self::MensGrooming => "men's grooming",
            Self::Fragrance => "fragrance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cleanser => "Cleanser",
            Self::Moisturizer => "Moisturizer",
            Self::Skincare => "Skincare",
            Self::Suncare => "Suncare",
            Self::Haircare => "Haircare",
            Self::HairColor => "Hair Color",
            Self::HairStyling => "Hair Styling",
            Self::Makeup => "Makeup",
            Self::MensGrooming => "Men's Grooming",
            Self::Fragrance => "Fragrance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown product category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| {
                category.as_str().eq_ignore_ascii_case(needle)
                    || category.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownCategory(raw.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub category: Category,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

impl Product {
    /// `"{name} ({brand})"`, the form products take inside chat prompts.
    pub fn short_label(&self) -> String {
        format!("{} ({})", self.name, self.brand)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        for (index, product) in products.iter().enumerate() {
            if products[..index].iter().any(|prior| prior.id == product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_slice(bytes)?;
        Self::new(document.products)
    }

    pub async fn load(source: &CatalogSource) -> Result<Self, CatalogError> {
        Self::load_with(&reqwest::Client::new(), source).await
    }

    pub async fn load_with(
        client: &reqwest::Client,
        source: &CatalogSource,
    ) -> Result<Self, CatalogError> {
        let bytes = match source {
            CatalogSource::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| CatalogError::Read {
                        path: path.clone(),
                        source,
                    })?
            }
            CatalogSource::Url(url) => {
                let fetch_err = |source| CatalogError::Fetch {
                    url: url.clone(),
                    source,
                };
                client
                    .get(url)
                    .send()
                    .await
                    .map_err(fetch_err)?
                    .error_for_status()
                    .map_err(fetch_err)?
                    .bytes()
                    .await
                    .map_err(fetch_err)?
                    .to_vec()
            }
        };

        let catalog = Self::from_json(&bytes)?;
        if catalog.is_empty() {
            log::warn!("catalog {source} has no products");
        }
        log::info!("loaded {} products from {source}", catalog.len());
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn product(id: ProductId, name: &str, brand: &str, category: Category) -> Product {
    Product {
        id,
        name: name.to_string(),
        brand: brand.to_string(),
        category,
        image: format!("https://img.example/{id}.png"),
        description: format!("{name} by {brand}"),
    }
}
