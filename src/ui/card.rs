use crate::catalog::Product;
use crate::theme::Theme;
use crate::ui::CardAction;
use eframe::egui::{self, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardRole {
    Available,
    Selected,
}

/// Maps a catalog image reference onto a loader URI. Bare paths are read from disk.
fn image_uri(image: &str) -> Option<String> {
    let image = image.trim();
    if image.is_empty() {
        return None;
    }
    if ["http://", "https://", "file://", "bytes://"]
        .iter()
        .any(|scheme| image.starts_with(scheme))
    {
        return Some(image.to_string());
    }
    Some(format!("file://{image}"))
}

pub fn product_card(
    ui: &mut egui::Ui,
    theme: &Theme,
    product: &Product,
    role: CardRole,
    actions: &mut Vec<CardAction>,
) {
    theme.card_frame().show(ui, |ui| {
        ui.set_width(theme.card_width);
        if let Some(uri) = image_uri(&product.image) {
            ui.add(
                egui::Image::from_uri(uri)
                    .max_height(theme.card_image_height)
                    .maintain_aspect_ratio(true),
            );
        }
        ui.label(RichText::new(&product.name).strong());
        ui.label(RichText::new(&product.brand).color(theme.text_muted));
        ui.label(
            RichText::new(product.category.label())
                .small()
                .color(theme.accent_muted),
        );
        ui.add_space(theme.spacing_4);
        ui.horizontal(|ui| {
            if ui.button("Description").clicked() {
                actions.push(CardAction::Describe(product.id));
            }
            match role {
                CardRole::Available => {
                    if ui.button("Add").clicked() {
                        actions.push(CardAction::Add(product.id));
                    }
                }
                CardRole::Selected => {
                    if ui.button("Remove").clicked() {
                        actions.push(CardAction::Remove(product.id));
                    }
                }
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_images_pass_through_unchanged() {
        let url = "https://img.example/1.png";
        assert_eq!(image_uri(url).as_deref(), Some(url));
    }

    #[test]
    fn bare_paths_load_from_disk() {
        assert_eq!(
            image_uri(" data/a.png ").as_deref(),
            Some("file://data/a.png")
        );
    }

    #[test]
    fn blank_image_is_skipped() {
        assert_eq!(image_uri("   "), None);
    }
}
