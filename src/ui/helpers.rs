//! Task spawning and navigation helpers shared by the UI layer.
//!
//! Every network call runs in its own task and reports back through the
//! `AppEvent` channel. Tasks are never aborted: a superseding action simply
//! spawns another one, and the view models decide what to display.

use crate::api::WatchlistOp;
use crate::app::{App, AppEvent, Navigation, View};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing (caught by Tokio's runtime but not
/// handled), panics are converted to `Err(String)` containing the panic message.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
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

async fn send_event(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, "Failed to send task result (receiver dropped)");
    }
}

fn panicked(task: &'static str, epoch: u64, error: String) -> AppEvent {
    tracing::error!(task, error = %error, "Background task panicked");
    AppEvent::TaskPanicked {
        task,
        epoch,
        ticket: None,
        error,
    }
}

/// Navigate to `target` and start whatever load the view needs on entry.
///
/// Entering the watchlist always issues a fresh fetch; nothing is fetched
/// when the guard redirects.
pub fn enter_view(app: &mut App, target: View, event_tx: &mpsc::Sender<AppEvent>) -> Navigation {
    let nav = app.navigate(target);
    if nav == Navigation::Entered(View::Watchlist) {
        spawn_watchlist_op(app, WatchlistOp::Fetch, event_tx);
    }
    nav
}

/// Submit the login form.
pub fn spawn_login(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.login_form.submitting {
        return;
    }
    app.login_form.error = None;
    app.login_form.notice = None;
    app.login_form.submitting = true;

    let auth = app.auth.clone();
    let username = app.login_form.value(0).to_string();
    let password = app.login_form.value(1).to_string();
    let epoch = app.session_epoch;
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let event = match catch_task_panic(auth.login(&username, &password)).await {
            Ok(result) => AppEvent::LoginFinished(result),
            Err(panic_msg) => panicked("login", epoch, panic_msg),
        };
        send_event(&tx, event).await;
    });
}

/// Submit the registration form.
pub fn spawn_register(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.register_form.submitting {
        return;
    }
    app.register_form.error = None;
    app.register_form.notice = None;
    app.register_form.submitting = true;

    let auth = app.auth.clone();
    let username = app.register_form.value(0).to_string();
    let password = app.register_form.value(1).to_string();
    let confirm = app.register_form.value(2).to_string();
    let epoch = app.session_epoch;
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let event = match catch_task_panic(auth.register(&username, &password, &confirm)).await {
            Ok(result) => AppEvent::RegisterFinished(result),
            Err(panic_msg) => panicked("register", epoch, panic_msg),
        };
        send_event(&tx, event).await;
    });
}

/// Log out: best-effort remote call, then the local session is dropped.
pub fn spawn_logout(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let auth = app.auth.clone();
    let epoch = app.session_epoch;
    let tx = event_tx.clone();
    app.set_status("Logging out...");

    tokio::spawn(async move {
        let event = match catch_task_panic(auth.logout()).await {
            Ok(result) => AppEvent::LogoutFinished(result.map_err(|e| format!("{e:#}"))),
            Err(panic_msg) => panicked("logout", epoch, panic_msg),
        };
        send_event(&tx, event).await;
    });
}

/// Submit the typed title for recommendations.
///
/// A blank title sets the validation message and spawns nothing.
pub fn spawn_recommendations(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(ticket) = app.recommendations.begin(&app.title_input) else {
        return;
    };
    app.selected_recommendation = 0;

    let client = app.recommender.clone();
    let title = app.title_input.trim().to_string();
    let epoch = app.session_epoch;
    let tx = event_tx.clone();

    tracing::debug!(seq = ticket.seq(), "Spawning recommendation request");

    tokio::spawn(async move {
        let event = match catch_task_panic(client.fetch(&title)).await {
            Ok(result) => AppEvent::RecommendationsLoaded {
                epoch,
                ticket,
                result,
            },
            Err(panic_msg) => {
                tracing::error!(error = %panic_msg, "Recommendation task panicked");
                AppEvent::TaskPanicked {
                    task: "recommendations",
                    epoch,
                    ticket: Some(ticket),
                    error: panic_msg,
                }
            }
        };
        send_event(&tx, event).await;
    });
}

/// Run one watchlist operation: mutation, then re-fetch, as a single task.
pub fn spawn_watchlist_op(app: &mut App, op: WatchlistOp, event_tx: &mpsc::Sender<AppEvent>) {
    let ticket = app.watchlist.begin(&op);
    let epoch = app.session_epoch;
    let remote = app.watchlist_remote.clone();
    let tx = event_tx.clone();

    tracing::debug!(seq = ticket.seq(), op = ?op, "Spawning watchlist operation");

    tokio::spawn(async move {
        let refresh_tx = tx.clone();
        let on_refreshing = move || {
            if let Err(e) = refresh_tx.try_send(AppEvent::WatchlistRefreshing { epoch, ticket }) {
                tracing::debug!(error = %e, "Could not report refresh start");
            }
        };

        let outcome = catch_task_panic(remote.run_observed(&op, on_refreshing)).await;
        let event = match outcome {
            Ok(result) => AppEvent::WatchlistSynced {
                epoch,
                ticket,
                op,
                result,
            },
            Err(panic_msg) => {
                tracing::error!(error = %panic_msg, "Watchlist task panicked");
                AppEvent::TaskPanicked {
                    task: "watchlist",
                    epoch,
                    ticket: Some(ticket),
                    error: panic_msg,
                }
            }
        };
        send_event(&tx, event).await;
    });
}
