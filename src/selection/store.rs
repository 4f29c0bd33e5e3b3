use crate::catalog::{Catalog, Product, ProductId};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write selection to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode selection: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ordered, id-unique selection mirrored to a JSON file.
#[derive(Debug, Default)]
pub struct SelectionStore {
    products: Vec<Product>,
    path: Option<PathBuf>,
}

impl SelectionStore {
    /// A store that never touches disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Rehydrates from `path`. Missing or malformed data yields an empty selection.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let products = match read_selection_file(&path) {
            Ok(products) => products,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                log::warn!("resetting selection, {}: {err}", path.display());
                Vec::new()
            }
        };

        let mut store = Self {
            products: Vec::with_capacity(products.len()),
            path: Some(path),
        };
        for product in products {
            if !store.contains(product.id) {
                store.products.push(product);
            }
        }
        store
    }

    /// Replaces stored copies with the catalog's and drops ids it no longer has.
    pub fn reconcile(&mut self, catalog: &Catalog) {
        let refreshed: Vec<Product> = self
            .products
            .iter()
            .filter_map(|stored| catalog.get(stored.id).cloned())
            .collect();
        if refreshed == self.products {
            return;
        }

        let dropped = self.products.len() - refreshed.len();
        if dropped > 0 {
            log::info!("dropped {dropped} selected products missing from catalog");
        }
        self.products = refreshed;
        self.persist_logged();
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|product| product.id).collect()
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.products.iter().any(|product| product.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Appends `product` unless its id is already selected. Returns whether it was added.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        log::debug!("selected product {}", product.id);
        self.products.push(product);
        self.persist_logged();
        true
    }

    /// Removes `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|product| product.id != id);
        if self.products.len() == before {
            return false;
        }
        log::debug!("removed product {id} from selection");
        self.persist_logged();
        true
    }

    fn persist_logged(&self) {
        if let Err(err) = self.persist() {
            log::error!("{err}");
        }
    }

    pub fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(&self.products)?;
        write_atomically(path, &bytes).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })
    }
}

fn read_selection_file(path: &Path) -> io::Result<Vec<Product>> {
    let data = fs::read(path)?;
    serde_json::from_slice(&data).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, bytes)?;
    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if path.exists() {
                fs::remove_file(path)?;
                fs::rename(&tmp_path, path)
            } else {
                Err(rename_err)
            }
        }
    }
}
