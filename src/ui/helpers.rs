//! Background task spawning shared across the UI layer.

use crate::app::{App, AppEvent, DetailRequest};
use crate::catalog::CatalogClient;
use crate::feed::PageTicket;
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of a spawned task silently disappearing, the panic message comes
/// back as `Err(String)` so the event loop can report it.
///
/// ```ignore
/// tokio::spawn(async move {
///     match catch_task_panic(async { do_work().await }).await {
///         Ok(result) => handle_result(result),
///         Err(panic_msg) => {
///             let _ = tx.send(AppEvent::TaskPanicked { task: "work", error: panic_msg }).await;
///         }
///     }
/// });
/// ```
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Run `ticket` in the background and report through `AppEvent::PageLoaded`.
///
/// Any previous fetch task is aborted. Its ticket is stale by construction:
/// the controller only issues a new ticket once the old one is resolved or
/// its signature was replaced.
pub(super) fn spawn_page_fetch(app: &mut App, ticket: PageTicket, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.fetch_handle.take() {
        handle.abort();
        tracing::debug!("Aborted superseded page fetch");
    }

    let client = app.client.clone();
    let tx = event_tx.clone();
    app.fetch_handle = Some(tokio::spawn(run_page_fetch(client, ticket, tx)));
}

async fn run_page_fetch(client: CatalogClient, ticket: PageTicket, tx: mpsc::Sender<AppEvent>) {
    match catch_task_panic(client.fetch_page(&ticket.request)).await {
        Ok(result) => {
            if let Err(e) = tx.send(AppEvent::PageLoaded { ticket, result }).await {
                tracing::warn!(error = %e, event = "PageLoaded", "Channel send failed (receiver dropped)");
            }
        }
        Err(panic_msg) => {
            tracing::error!(task = "page_fetch", offset = ticket.offset, error = %panic_msg, "Background task panicked");
            let _ = tx
                .send(AppEvent::PageAbandoned {
                    ticket,
                    error: panic_msg,
                })
                .await;
        }
    }
}

/// Start the detail enrichment described by `request`.
pub(super) fn spawn_detail_load(
    app: &mut App,
    request: DetailRequest,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    if let Some(handle) = app.detail_handle.take() {
        handle.abort();
    }

    let client = app.client.clone();
    let tx = event_tx.clone();
    app.detail_handle = Some(tokio::spawn(async move {
        let DetailRequest { key, generation } = request;
        match catch_task_panic(client.fetch_detail(&key)).await {
            Ok(result) => {
                if let Err(e) = tx
                    .send(AppEvent::DetailLoaded {
                        key,
                        generation,
                        result,
                    })
                    .await
                {
                    tracing::warn!(error = %e, event = "DetailLoaded", "Channel send failed (receiver dropped)");
                }
            }
            Err(panic_msg) => {
                tracing::error!(task = "detail_load", key = %key, error = %panic_msg, "Background task panicked");
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "detail_load",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    }));
}

/// Open the current record's catalog page in the system browser.
pub(super) fn open_in_browser(app: &mut App) {
    let Some(url) = app.current_page_url() else {
        app.set_status("This book has no catalog page");
        return;
    };

    // Validate before open::that() so a crafted key cannot reach the shell
    match validate_url_for_open(&url) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => app.set_status("Opening in browser..."),
            Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
        },
    }
}
