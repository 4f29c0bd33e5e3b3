use crate::chat::transcript::{BubbleKind, ChatBubble};
use crate::theme::Theme;
use eframe::egui::{self, Align, Layout, RichText, ScrollArea};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    Send(String),
    ExportTranscript,
}

fn bubble(ui: &mut egui::Ui, theme: &Theme, bubble: &ChatBubble) {
    let layout = if bubble.kind == BubbleKind::User {
        Layout::right_to_left(Align::TOP)
    } else {
        Layout::left_to_right(Align::TOP)
    };
    ui.with_layout(layout, |ui| {
        theme.bubble_frame(&bubble.kind).show(ui, |ui| {
            ui.set_max_width(ui.available_width() * 0.8);
            if bubble.is_typing() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("typing").color(theme.text_muted));
                });
                return;
            }
            ui.vertical(|ui| {
                for line in bubble.lines() {
                    ui.label(line);
                }
            });
        });
    });
}

pub fn show(
    ui: &mut egui::Ui,
    theme: &Theme,
    bubbles: &[ChatBubble],
    input_buffer: &mut String,
    scroll_to_bottom: bool,
) -> Option<ChatAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Chat");
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui
                .add_enabled(!bubbles.is_empty(), egui::Button::new("Export transcript"))
                .clicked()
            {
                action = Some(ChatAction::ExportTranscript);
            }
        });
    });
    ui.separator();

    let transcript_height = (ui.available_height() - 60.0).max(120.0);
    ScrollArea::vertical()
        .id_salt("chat_transcript")
        .max_height(transcript_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if bubbles.is_empty() {
                ui.label(
                    RichText::new("Ask about your routine, or pick products and press Generate Routine.")
                        .color(theme.text_muted),
                );
            }
            for entry in bubbles {
                bubble(ui, theme, entry);
            }
            if scroll_to_bottom {
                ui.scroll_to_cursor(Some(Align::BOTTOM));
            }
        });

    ui.separator();
    let mut send_now = false;
    ui.horizontal(|ui| {
        let button_width = 72.0;
        let response = ui.add(
            egui::TextEdit::singleline(input_buffer)
                .desired_width(ui.available_width() - button_width)
                .hint_text("Ask me about products or routines..."),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send_now = true;
            response.request_focus();
        }
        send_now |= ui
            .add_enabled(!input_buffer.trim().is_empty(), egui::Button::new("Send"))
            .clicked();
    });

    if send_now && !input_buffer.trim().is_empty() {
        action = Some(ChatAction::Send(std::mem::take(input_buffer)));
    }
    action
}
