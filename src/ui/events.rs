//! Application event handling.
//!
//! Applies background task results (page fetches, detail loads) to the
//! application state.

use crate::app::{App, AppEvent};
use crate::feed::Applied;

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PageLoaded { ticket, result } => {
            let applied = app.handle_page_loaded(&ticket, result);
            if applied != Applied::Discarded {
                // The task that produced this result has finished.
                app.fetch_handle = None;
            }
            match applied {
                Applied::Appended { added, duplicates } => {
                    tracing::debug!(added, duplicates, offset = ticket.offset, "Page shown");
                }
                Applied::Exhausted => {
                    tracing::debug!(total = app.feed.state().len(), "Feed exhausted");
                }
                Applied::Failed(_) | Applied::Discarded => {}
            }
        }
        AppEvent::PageAbandoned { ticket, error } => {
            app.fetch_handle = None;
            app.handle_page_abandoned(&ticket, &error);
            app.set_status("Internal error while loading books");
        }
        AppEvent::DetailLoaded {
            key,
            generation,
            result,
        } => {
            app.handle_detail_loaded(key, generation, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            if task == "detail_load" {
                if let Some(overlay) = app.detail.as_mut() {
                    overlay.loading = false;
                }
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
