use crate::catalog::{Catalog, CatalogError};
use crate::chat::client::ChatError;
use crate::chat::RequestId;
use eframe::egui;
use std::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    ChatCompleted {
        request_id: RequestId,
        result: Result<String, ChatError>,
    },
    CatalogRefreshed(Result<Catalog, CatalogError>),
}

/// Posts events from runtime tasks back to the UI thread and wakes it.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<AppEvent>,
    ctx: egui::Context,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<AppEvent>, ctx: egui::Context) -> Self {
        Self { tx, ctx }
    }

    pub fn send(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            log::warn!("event dropped, ui receiver is gone");
            return;
        }
        self.ctx.request_repaint();
    }
}
