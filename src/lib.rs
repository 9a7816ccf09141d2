pub mod breath;
pub mod coherence;
pub mod controller;
pub mod error;
pub mod insight;
pub mod lists;
pub mod locale;
pub mod state;
pub mod symbol;
pub mod transition;
pub mod types;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
use std::sync::Arc;

#[cfg(feature = "desktop")]
use controller::AppController;

/// Install the global logger. `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A second init (tests, embedding hosts) keeps the first logger.
    let _ = builder.format_timestamp_millis().try_init();
}

/// Tauri builder with the controller managed and every command registered.
///
/// The host supplies the context (`tauri::generate_context!()`) and calls
/// `.run(...)`. Breath updates are emitted to the webview as `breath-phase`
/// and `breath-pulse` events.
#[cfg(feature = "desktop")]
pub fn builder(controller: Arc<AppController>) -> tauri::Builder<tauri::Wry> {
    use tauri::Manager;

    tauri::Builder::default()
        .setup(move |app| {
            controller.set_breath_sink(Arc::new(commands::WebviewSink::new(
                app.handle().clone(),
            )));
            app.manage(controller);
            log::info!("Desktop shell ready");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_snapshot,
            commands::add_item,
            commands::remove_item,
            commands::set_symbol,
            commands::set_language,
            commands::request_insight,
            commands::enter_meditation,
            commands::exit_meditation,
        ])
}
