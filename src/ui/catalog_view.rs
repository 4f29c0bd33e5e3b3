use crate::catalog::filter::ProductFilter;
use crate::catalog::{Category, Product};
use crate::selection::DragPayload;
use crate::theme::Theme;
use crate::ui::card::{product_card, CardRole};
use crate::ui::CardAction;
use eframe::egui::{self, RichText, ScrollArea};

pub const IDLE_PLACEHOLDER: &str = "Select a category to view products";

/// Category picker and search box.
pub fn filter_bar(ui: &mut egui::Ui, filter: &mut ProductFilter) {
    let selected_text = filter
        .category
        .map(|category| category.label())
        .unwrap_or("All categories");

    egui::ComboBox::from_id_salt("category_filter")
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut filter.category, None, "All categories");
            for category in Category::ALL {
                ui.selectable_value(&mut filter.category, Some(category), category.label());
            }
        });

    ui.add(
        egui::TextEdit::singleline(&mut filter.search)
            .desired_width(f32::INFINITY)
            .hint_text("Search products by name, brand or keyword"),
    );
}

pub fn show(
    ui: &mut egui::Ui,
    theme: &Theme,
    filter: &ProductFilter,
    visible: &[&Product],
    scroll_to_top: bool,
    actions: &mut Vec<CardAction>,
) {
    if filter.is_idle() {
        ui.label(RichText::new(IDLE_PLACEHOLDER).color(theme.text_muted));
        return;
    }
    if visible.is_empty() {
        ui.label(RichText::new("No products match").color(theme.text_muted));
        return;
    }

    let mut area = ScrollArea::vertical()
        .id_salt("catalog_cards")
        .auto_shrink([false, false]);
    if scroll_to_top {
        area = area.vertical_scroll_offset(0.0);
    }
    area.show(ui, |ui| {
        for product in visible {
            let drag_id = egui::Id::new(("catalog_product", product.id));
            ui.dnd_drag_source(drag_id, DragPayload::for_product(product.id), |ui| {
                product_card(ui, theme, product, CardRole::Available, actions);
            });
            ui.add_space(theme.spacing_4);
        }
    });
}
