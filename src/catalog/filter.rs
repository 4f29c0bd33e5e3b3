use crate::catalog::{Catalog, Category, Product};
use crate::selection::store::SelectionStore;

/// Category and search box state for the catalog view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub search: String,
}

impl ProductFilter {
    fn needle(&self) -> String {
        self.search.trim().to_lowercase()
    }

    /// Nothing chosen yet: the view shows a prompt instead of every product.
    pub fn is_idle(&self) -> bool {
        self.category.is_none() && self.search.trim().is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }

        let needle = self.needle();
        if needle.is_empty() {
            return true;
        }

        [&product.name, &product.description, &product.brand]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Products that pass the filter and are not already selected, in catalog order.
    pub fn visible<'a>(&self, catalog: &'a Catalog, selection: &SelectionStore) -> Vec<&'a Product> {
        catalog
            .products()
            .iter()
            .filter(|product| !selection.contains(product.id))
            .filter(|product| self.matches(product))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product;

    fn sample_catalog() -> Catalog {
        let mut foaming = product(1, "Foaming Facial Cleanser", "CeraVe", Category::Cleanser);
        foaming.description = "Removes oil".to_string();
        let mut gel = product(2, "Purifying Gel", "Garnier", Category::Cleanser);
        gel.description = "A gel that turns to FOAM on contact".to_string();
        let balm = product(3, "Cleansing Balm", "Foamify", Category::Cleanser);
        let mut oil = product(4, "Micellar Oil", "Garnier", Category::Cleanser);
        oil.description = "No lather".to_string();
        let mut mousse = product(5, "Foam Mousse", "L'Oreal", Category::HairStyling);
        mousse.description = "Volume".to_string();
        Catalog::new(vec![foaming, gel, balm, oil, mousse]).expect("sample catalog")
    }

    #[test]
    fn category_and_search_combine() {
        let catalog = sample_catalog();
        let selection = SelectionStore::in_memory();
        let filter = ProductFilter {
            category: Some(Category::Cleanser),
            search: "foam".to_string(),
        };

        let ids: Vec<_> = filter
            .visible(&catalog, &selection)
            .into_iter()
            .map(|product| product.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for product in filter.visible(&catalog, &selection) {
            assert_eq!(product.category, Category::Cleanser);
        }
    }

    #[test]
    fn empty_filter_passes_everything() {
        let catalog = sample_catalog();
        let selection = SelectionStore::in_memory();
        let filter = ProductFilter::default();
        assert!(filter.is_idle());
        assert_eq!(filter.visible(&catalog, &selection).len(), catalog.len());
    }

    #[test]
    fn search_is_trimmed_and_case_insensitive() {
        let catalog = sample_catalog();
        let selection = SelectionStore::in_memory();
        let filter = ProductFilter {
            category: None,
            search: "  GARNIER ".to_string(),
        };
        assert!(!filter.is_idle());
        let ids: Vec<_> = filter
            .visible(&catalog, &selection)
            .into_iter()
            .map(|product| product.id)
            .collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn selected_products_never_appear_in_catalog_view() {
        let catalog = sample_catalog();
        let mut selection = SelectionStore::in_memory();
        selection.add(catalog.products()[0].clone());
        selection.add(catalog.products()[4].clone());

        let filters = [
            ProductFilter::default(),
            ProductFilter {
                category: Some(Category::Cleanser),
                search: String::new(),
            },
            ProductFilter {
                category: None,
                search: "foam".to_string(),
            },
        ];
        for filter in filters {
            for product in filter.visible(&catalog, &selection) {
                assert!(!selection.contains(product.id), "{} leaked", product.id);
            }
        }
    }
}
