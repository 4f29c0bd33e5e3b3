mod app;
mod catalog;
mod chat;
mod config;
mod event;
mod selection;
mod theme;
mod ui;

use app::{PickerApp, PickerParts};
use catalog::Catalog;
use chat::client::HttpChatBackend;
use chat::ChatController;
use clap::Parser;
use config::Config;
use eframe::egui;
use event::EventSink;
use selection::store::SelectionStore;
use selection::SELECTION_FILE;
use std::sync::mpsc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("routine-picker-runtime")
        .build()?;

    let catalog_source = config.catalog_source();
    let catalog = runtime.block_on(Catalog::load(&catalog_source))?;

    let state_dir = config.state_dir();
    let mut selection = SelectionStore::load(state_dir.join(SELECTION_FILE));
    selection.reconcile(&catalog);
    log::info!(
        "restored {} selected products from {}",
        selection.len(),
        state_dir.display()
    );

    let (tx, rx) = mpsc::channel();
    let runtime_handle = runtime.handle().clone();
    let endpoint = config.endpoint.clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Routine Picker",
        native_options,
        Box::new(move |creation_context| {
            let ctx = creation_context.egui_ctx.clone();
            egui_extras::install_image_loaders(&ctx);
            let events = EventSink::new(tx, ctx.clone());
            let backend = HttpChatBackend::new(endpoint, runtime_handle.clone(), events.clone());
            let parts = PickerParts {
                rx,
                events,
                runtime_handle,
                catalog_source,
                catalog,
                selection,
                chat: ChatController::new(Box::new(backend)),
                state_dir,
            };
            Ok(Box::new(PickerApp::new(&ctx, parts)))
        }),
    )?;

    drop(runtime);
    Ok(())
}
