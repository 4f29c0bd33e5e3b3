pub mod store;

pub const SELECTION_FILE: &str = "selected_products.json";

/// Plain-text drag payload carrying a product id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload(pub String);

impl DragPayload {
    pub fn for_product(id: crate::catalog::ProductId) -> Self {
        Self(id.to_string())
    }

    pub fn product_id(&self) -> Option<crate::catalog::ProductId> {
        self.0.trim().parse().ok()
    }
}
