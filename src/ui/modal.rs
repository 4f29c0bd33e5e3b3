use crate::catalog::Product;
use crate::theme::Theme;
use eframe::egui::{self, RichText};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub body: String,
}

impl ModalContent {
    pub fn describe(product: &Product) -> Self {
        Self {
            title: product.name.clone(),
            body: product.description.clone(),
        }
    }
}

/// Draws the description overlay. Returns true once it should close.
pub fn show(ctx: &egui::Context, theme: &Theme, content: &ModalContent) -> bool {
    let response = egui::Modal::new(egui::Id::new("description_modal")).show(ctx, |ui| {
        ui.set_max_width(440.0);
        ui.heading(content.title.as_str());
        ui.add_space(theme.spacing_8);
        ui.label(RichText::new(&content.body).color(theme.text_primary));
        ui.add_space(theme.spacing_12);
        ui.button("Close").clicked()
    });
    response.inner || response.should_close()
}
