use crate::catalog::filter::ProductFilter;
use crate::catalog::{Catalog, CatalogSource};
use crate::chat::transcript;
use crate::chat::ChatController;
use crate::event::{AppEvent, EventSink};
use crate::selection::store::SelectionStore;
use crate::theme::Theme;
use crate::ui::chat_view::ChatAction;
use crate::ui::modal::ModalContent;
use crate::ui::{catalog_view, chat_view, modal, selection_view, CardAction};
use eframe::egui::{self, Color32, RichText, ScrollArea};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::runtime::Handle;

pub struct PickerApp {
    rx: Receiver<AppEvent>,
    events: EventSink,
    runtime_handle: Handle,
    catalog_source: CatalogSource,
    catalog: Catalog,
    selection: SelectionStore,
    filter: ProductFilter,
    shown_filter: ProductFilter,
    chat: ChatController,
    modal: Option<ModalContent>,
    input_buffer: String,
    diagnostics_log: Vec<String>,
    state_dir: PathBuf,
    theme: Theme,
    refreshing: bool,
    scroll_to_bottom: bool,
}

pub struct PickerParts {
    pub rx: Receiver<AppEvent>,
    pub events: EventSink,
    pub runtime_handle: Handle,
    pub catalog_source: CatalogSource,
    pub catalog: Catalog,
    pub selection: SelectionStore,
    pub chat: ChatController,
    pub state_dir: PathBuf,
}

impl PickerApp {
    pub fn new(ctx: &egui::Context, parts: PickerParts) -> Self {
        let theme = Theme::default();
        theme.apply_visuals(ctx);

        let mut app = Self {
            rx: parts.rx,
            events: parts.events,
            runtime_handle: parts.runtime_handle,
            catalog_source: parts.catalog_source,
            catalog: parts.catalog,
            selection: parts.selection,
            filter: ProductFilter::default(),
            shown_filter: ProductFilter::default(),
            chat: parts.chat,
            modal: None,
            input_buffer: String::new(),
            diagnostics_log: Vec::new(),
            state_dir: parts.state_dir,
            theme,
            refreshing: false,
            scroll_to_bottom: false,
        };
        app.log_diagnostic(format!(
            "{} products loaded, {} selected",
            app.catalog.len(),
            app.selection.len()
        ));
        app
    }

    fn timestamp() -> u64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs(),
            Err(_) => 0,
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ChatCompleted { request_id, result } => {
                if let Err(err) = &result {
                    self.log_diagnostic(format!("chat request {request_id} failed: {err}"));
                }
                self.chat.complete(request_id, result);
                self.scroll_to_bottom = true;
            }
            AppEvent::CatalogRefreshed(result) => {
                self.refreshing = false;
                match result {
                    Ok(catalog) => {
                        self.catalog = catalog;
                        self.selection.reconcile(&self.catalog);
                        self.log_diagnostic(format!(
                            "catalog refreshed: {} products",
                            self.catalog.len()
                        ));
                    }
                    Err(err) => {
                        log::error!("catalog refresh failed: {err}");
                        self.log_diagnostic(format!("catalog refresh failed: {err}"));
                    }
                }
            }
        }
    }

    fn refresh_catalog(&mut self) {
        if self.refreshing {
            return;
        }
        self.refreshing = true;
        let source = self.catalog_source.clone();
        let events = self.events.clone();
        self.runtime_handle.spawn(async move {
            let result = Catalog::load(&source).await;
            events.send(AppEvent::CatalogRefreshed(result));
        });
    }

    fn apply_card_action(&mut self, action: CardAction) {
        match action {
            CardAction::Describe(id) => {
                let product = self
                    .catalog
                    .get(id)
                    .or_else(|| self.selection.products().iter().find(|p| p.id == id));
                if let Some(product) = product {
                    self.modal = Some(ModalContent::describe(product));
                }
            }
            CardAction::Add(id) => {
                if let Some(product) = self.catalog.get(id) {
                    self.selection.add(product.clone());
                }
            }
            CardAction::Remove(id) => {
                self.selection.remove(id);
            }
            CardAction::Dropped(payload) => {
                let Some(id) = payload.product_id() else {
                    log::debug!("ignoring drop with payload {:?}", payload.0);
                    return;
                };
                match self.catalog.get(id) {
                    Some(product) => {
                        self.selection.add(product.clone());
                    }
                    None => log::debug!("ignoring drop of unknown product {id}"),
                }
            }
        }
    }

    /// True once after each filter edit, so the product list can jump back to the top.
    fn take_filter_change(&mut self) -> bool {
        if self.filter == self.shown_filter {
            return false;
        }
        self.shown_filter = self.filter.clone();
        true
    }

    fn export_transcript(&mut self) {
        let path = self
            .state_dir
            .join(format!("transcript-{}.html", Self::timestamp()));
        match transcript::export_html(self.chat.bubbles(), &path) {
            Ok(()) => {
                log::info!("exported transcript to {}", path.display());
                self.log_diagnostic(format!("transcript exported to {}", path.display()));
            }
            Err(err) => {
                log::error!("failed to export transcript: {err}");
                self.log_diagnostic(format!("failed to export transcript: {err}"));
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let mut refresh = false;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Routine Picker");
                ui.separator();
                ui.label(
                    RichText::new(format!("Catalog: {}", self.catalog_source))
                        .color(self.theme.text_muted),
                );
                ui.label(format!("{} products", self.catalog.len()));
                ui.separator();
                if self.refreshing {
                    ui.spinner();
                } else {
                    refresh = ui.button("Refresh catalog").clicked();
                }
            });
        });
        if refresh {
            self.refresh_catalog();
        }
    }

    fn render_catalog_panel(&mut self, ctx: &egui::Context, actions: &mut Vec<CardAction>) {
        egui::SidePanel::left("catalog_panel")
            .resizable(true)
            .default_width(self.theme.card_width + 40.0)
            .show(ctx, |ui| {
                ui.heading("Products");
                catalog_view::filter_bar(ui, &mut self.filter);
                let scroll_to_top = self.take_filter_change();
                ui.separator();
                let visible = self.filter.visible(&self.catalog, &self.selection);
                catalog_view::show(
                    ui,
                    &self.theme,
                    &self.filter,
                    &visible,
                    scroll_to_top,
                    actions,
                );
            });
    }

    fn render_selection_panel(&mut self, ctx: &egui::Context, actions: &mut Vec<CardAction>) {
        let mut generate = false;
        egui::SidePanel::right("selection_panel")
            .resizable(true)
            .default_width(self.theme.card_width + 40.0)
            .show(ctx, |ui| {
                ui.heading(format!("Selected Products ({})", self.selection.len()));
                ui.separator();
                let list_height = (ui.available_height() - 180.0).max(120.0);
                selection_view::show(
                    ui,
                    &self.theme,
                    self.selection.products(),
                    list_height,
                    actions,
                );
                ui.add_space(self.theme.spacing_8);
                generate = ui
                    .add_sized(
                        [ui.available_width(), 36.0],
                        egui::Button::new(RichText::new("Generate Routine").strong())
                            .fill(self.theme.accent_primary),
                    )
                    .clicked();

                ui.separator();
                egui::CollapsingHeader::new("Diagnostics")
                    .default_open(false)
                    .show(ui, |ui| {
                        ScrollArea::vertical()
                            .id_salt("diagnostics_log")
                            .max_height(90.0)
                            .stick_to_bottom(true)
                            .show(ui, |ui| {
                                for entry in &self.diagnostics_log {
                                    ui.label(RichText::new(entry).small().color(Color32::GRAY));
                                }
                            });
                    });
            });

        if generate {
            if self.chat.generate_routine(&self.selection).is_none() {
                self.log_diagnostic("generate routine skipped: nothing selected");
            }
            self.scroll_to_bottom = true;
        }
    }

    fn render_chat_panel(&mut self, ctx: &egui::Context) {
        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            action = chat_view::show(
                ui,
                &self.theme,
                self.chat.bubbles(),
                &mut self.input_buffer,
                self.scroll_to_bottom,
            );
        });
        self.scroll_to_bottom = false;

        match action {
            Some(ChatAction::Send(text)) => {
                self.chat.submit(&text, &self.selection, &self.catalog);
                self.scroll_to_bottom = true;
            }
            Some(ChatAction::ExportTranscript) => self.export_transcript(),
            None => {}
        }
    }

    fn render_modal(&mut self, ctx: &egui::Context) {
        let Some(content) = &self.modal else {
            return;
        };
        if modal::show(ctx, &self.theme, content) {
            self.modal = None;
        }
    }
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        let mut actions = Vec::new();
        self.render_top_bar(ctx);
        self.render_catalog_panel(ctx, &mut actions);
        self.render_selection_panel(ctx, &mut actions);
        self.render_chat_panel(ctx);
        self.render_modal(ctx);

        for action in actions {
            self.apply_card_action(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{product, CatalogError, Category};
    use crate::chat::{ChatBackend, ChatRequest};
    use crate::selection::DragPayload;
    use std::sync::mpsc;

    struct SilentBackend;

    impl ChatBackend for SilentBackend {
        fn dispatch(&self, _request: ChatRequest) {}
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product(1, "Foaming Cleanser", "CeraVe", Category::Cleanser),
            product(2, "Daily Lotion", "CeraVe", Category::Moisturizer),
            product(3, "Sheer SPF", "La Roche-Posay", Category::Suncare),
        ])
        .expect("catalog")
    }

    fn app(runtime: &tokio::runtime::Runtime, state_dir: PathBuf) -> PickerApp {
        let ctx = egui::Context::default();
        let (tx, rx) = mpsc::channel();
        let parts = PickerParts {
            rx,
            events: EventSink::new(tx, ctx.clone()),
            runtime_handle: runtime.handle().clone(),
            catalog_source: CatalogSource::File(state_dir.join("unused.json")),
            catalog: catalog(),
            selection: SelectionStore::in_memory(),
            chat: ChatController::new(Box::new(SilentBackend)),
            state_dir,
        };
        PickerApp::new(&ctx, parts)
    }

    fn drop_payload(app: &mut PickerApp, payload: &str) {
        app.apply_card_action(CardAction::Dropped(DragPayload(payload.to_string())));
    }

    #[test]
    fn drops_add_known_products_once_and_ignore_the_rest() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(&runtime, dir.path().to_path_buf());

        drop_payload(&mut app, "1");
        drop_payload(&mut app, "1");
        drop_payload(&mut app, "99");
        drop_payload(&mut app, "x");

        assert_eq!(app.selection.ids(), vec![1]);
    }

    #[test]
    fn failed_refresh_keeps_current_catalog() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(&runtime, dir.path().to_path_buf());
        app.apply_card_action(CardAction::Add(2));
        app.refreshing = true;

        app.apply_event(AppEvent::CatalogRefreshed(Err(CatalogError::DuplicateId(3))));

        assert_eq!(app.catalog.len(), 3);
        assert_eq!(app.selection.ids(), vec![2]);
        assert!(!app.refreshing);
        assert!(app
            .diagnostics_log
            .last()
            .is_some_and(|entry| entry.contains("catalog refresh failed")));
    }

    #[test]
    fn successful_refresh_reconciles_selection() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(&runtime, dir.path().to_path_buf());
        app.apply_card_action(CardAction::Add(1));
        app.apply_card_action(CardAction::Add(3));

        let refreshed = Catalog::new(vec![
            product(2, "Daily Lotion", "CeraVe", Category::Moisturizer),
            product(3, "Sheer SPF 50", "La Roche-Posay", Category::Suncare),
        ])
        .expect("catalog");
        app.apply_event(AppEvent::CatalogRefreshed(Ok(refreshed)));

        assert_eq!(app.catalog.len(), 2);
        assert_eq!(app.selection.ids(), vec![3]);
        assert_eq!(app.selection.products()[0].name, "Sheer SPF 50");
    }

    #[test]
    fn filter_edit_requests_one_scroll_reset() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(&runtime, dir.path().to_path_buf());
        assert!(!app.take_filter_change());

        app.filter.category = Some(Category::Cleanser);
        assert!(app.take_filter_change());
        assert!(!app.take_filter_change());

        app.filter.search.push_str("foam");
        assert!(app.take_filter_change());
    }
}
