//! Tauri IPC commands and the webview breath sink.

use std::sync::Arc;

use tauri::{AppHandle, Emitter, State};

use crate::breath::{BreathSink, PulseFrame};
use crate::controller::{AppController, Snapshot};
use crate::types::{BreathPhase, Insight, Language, ListKind};

/// Forwards breath updates to the webview as events.
pub struct WebviewSink {
    app: AppHandle,
}

impl WebviewSink {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl BreathSink for WebviewSink {
    fn phase_changed(&self, phase: BreathPhase) {
        report_emit("breath-phase", self.app.emit("breath-phase", phase), log::Level::Warn);
    }

    // Runs once per frame, so failures stay at debug.
    fn frame(&self, frame: PulseFrame) {
        report_emit("breath-pulse", self.app.emit("breath-pulse", frame), log::Level::Debug);
    }
}

/// Log a failed emit at `level`. Returns whether the emit succeeded.
fn report_emit<E: std::fmt::Display>(
    event: &str,
    result: Result<(), E>,
    level: log::Level,
) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::log!(level, "Failed to emit {}: {}", event, e);
            false
        }
    }
}

#[tauri::command]
pub fn get_snapshot(state: State<Arc<AppController>>) -> Snapshot {
    state.snapshot()
}

/// Add to a list. Returns the new id, or `None` for blank text.
#[tauri::command]
pub fn add_item(
    kind: ListKind,
    text: String,
    state: State<Arc<AppController>>,
) -> Result<Option<String>, String> {
    Ok(state.add_item(kind, &text))
}

#[tauri::command]
pub fn remove_item(
    kind: ListKind,
    id: String,
    state: State<Arc<AppController>>,
) -> Result<bool, String> {
    Ok(state.remove_item(kind, &id))
}

#[tauri::command]
pub fn set_symbol(input: String, state: State<Arc<AppController>>) -> Option<String> {
    state.set_symbol(&input)
}

#[tauri::command]
pub fn set_language(language: String, state: State<Arc<AppController>>) -> Result<(), String> {
    let language =
        Language::from_tag(&language).ok_or_else(|| format!("Unknown language: {}", language))?;
    state.set_language(language);
    Ok(())
}

/// Run the insight provider. `None` when a request is already in flight.
#[tauri::command]
pub async fn request_insight(
    state: State<'_, Arc<AppController>>,
) -> Result<Option<Insight>, String> {
    Ok(state.request_insight().await)
}

// Async so the transition timer is spawned on the tokio runtime.
#[tauri::command]
pub async fn enter_meditation(state: State<'_, Arc<AppController>>) -> Result<bool, String> {
    Ok(state.inner().enter_meditation())
}

#[tauri::command]
pub async fn exit_meditation(state: State<'_, Arc<AppController>>) -> Result<bool, String> {
    Ok(state.exit_meditation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_emit_outcome() {
        assert!(report_emit::<String>("breath-pulse", Ok(()), log::Level::Debug));
        assert!(!report_emit(
            "breath-pulse",
            Err("window closed".to_string()),
            log::Level::Debug
        ));
    }
}
