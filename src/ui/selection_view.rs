use crate::catalog::Product;
use crate::selection::DragPayload;
use crate::theme::Theme;
use crate::ui::card::{product_card, CardRole};
use crate::ui::CardAction;
use eframe::egui::{self, RichText, ScrollArea};

/// Selected products inside a drop zone that accepts dragged catalog cards.
pub fn show(
    ui: &mut egui::Ui,
    theme: &Theme,
    selected: &[Product],
    max_height: f32,
    actions: &mut Vec<CardAction>,
) {
    let (_, dropped) = ui.dnd_drop_zone::<DragPayload, ()>(theme.drop_zone_frame(), |ui| {
        ui.set_min_width(ui.available_width());
        ui.set_min_height(120.0);
        if selected.is_empty() {
            ui.label(
                RichText::new("Drag products here or press Add").color(theme.text_muted),
            );
            return;
        }

        ScrollArea::vertical()
            .id_salt("selected_cards")
            .max_height(max_height)
            .show(ui, |ui| {
                for product in selected {
                    product_card(ui, theme, product, CardRole::Selected, actions);
                    ui.add_space(theme.spacing_4);
                }
            });
    });

    if let Some(payload) = dropped {
        actions.push(CardAction::Dropped((*payload).clone()));
    }
}
