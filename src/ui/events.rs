//! Application event handling.
//!
//! This module applies the results of background network tasks to the app
//! state: login and registration outcomes, recommendation results and
//! watchlist snapshots. Session loss detected here (a 401, or a protected
//! call without a token) destroys the session and sends the user to login.

use crate::api::auth::{LOGIN_FALLBACK, REGISTER_FALLBACK};
use crate::api::{ApplyOutcome, LoginOutcome, SyncError, WatchlistOp};
use crate::app::{App, AppEvent, View};

/// Handle application events from background tasks.
pub async fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::LoginFinished(result) => {
            app.login_form.submitting = false;
            match result {
                Ok(LoginOutcome::SessionEstablished) => {
                    app.advance_session_epoch();
                    app.login_form.clear_values();
                    app.login_form.error = None;
                    app.navigate(View::Recommendations);
                    app.set_status("Logged in");
                }
                Ok(LoginOutcome::NoToken) => {
                    tracing::warn!("Login succeeded but no token was returned");
                }
                Err(e) => {
                    tracing::info!(error = %e, "Login failed");
                    app.login_form.error = Some(e.user_message(LOGIN_FALLBACK));
                }
            }
        }

        AppEvent::RegisterFinished(result) => {
            app.register_form.submitting = false;
            match result {
                Ok(message) => {
                    app.register_form.clear_values();
                    app.register_form.error = None;
                    app.register_form.notice = Some(message);
                }
                Err(e) => {
                    tracing::info!(error = %e, "Registration failed");
                    app.register_form.notice = None;
                    app.register_form.error = Some(e.user_message(REGISTER_FALLBACK));
                }
            }
        }

        AppEvent::LogoutFinished(result) => {
            app.reset_protected_state();
            app.view = View::Login;
            match result {
                Ok(()) => app.set_status("Logged out"),
                Err(e) => {
                    tracing::warn!(error = %e, "Session cleared in memory but not on disk");
                    app.set_status("Logged out (saved session could not be removed)");
                }
            }
        }

        AppEvent::RecommendationsLoaded {
            epoch,
            ticket,
            result,
        } => {
            if !app.is_current_epoch(epoch) {
                tracing::debug!(seq = ticket.seq(), "Dropping recommendations from a previous session");
                return;
            }
            let session_lost = result.as_ref().is_err_and(App::is_session_error);
            if app.recommendations.apply(ticket, result) {
                app.selected_recommendation = 0;
            }
            if session_lost {
                app.expire_session().await;
            }
        }

        AppEvent::WatchlistRefreshing { epoch, ticket } => {
            if app.is_current_epoch(epoch) {
                app.watchlist.mark_refreshing(ticket);
            }
        }

        AppEvent::WatchlistSynced {
            epoch,
            ticket,
            op,
            result,
        } => {
            if !app.is_current_epoch(epoch) {
                tracing::debug!(seq = ticket.seq(), op = ?op, "Dropping watchlist result from a previous session");
                return;
            }
            handle_watchlist_synced(app, ticket, op, result).await;
        }

        AppEvent::TaskPanicked {
            task,
            epoch,
            ticket,
            error,
        } => {
            let ticket = ticket.filter(|_| app.is_current_epoch(epoch));
            match (task, ticket) {
                ("watchlist", Some(t)) => app.watchlist.abandon(t),
                ("recommendations", Some(t)) => app.recommendations.abandon(t),
                ("login", _) => app.login_form.submitting = false,
                ("register", _) => app.register_form.submitting = false,
                _ => {}
            }
            app.set_status(format!("Internal error in {task}: {error}"));
        }
    }
}

async fn handle_watchlist_synced(
    app: &mut App,
    ticket: crate::api::Ticket,
    op: WatchlistOp,
    result: Result<Vec<crate::api::WatchlistEntry>, SyncError>,
) {
    let session_lost = result
        .as_ref()
        .is_err_and(|e| App::is_session_error(e.api_error()));

    // Adding from the recommendations view reports through the status bar.
    // The mutation itself succeeded unless it was the mutation that failed.
    let add_status = match (&op, &result) {
        (WatchlistOp::Add(title), Ok(_) | Err(SyncError::Refresh(_))) => {
            Some(format!("\"{title}\" added to watchlist!"))
        }
        (WatchlistOp::Add(_), Err(e @ SyncError::Mutation(_))) => Some(e.user_message(&op)),
        _ => None,
    };

    let outcome = app.watchlist.apply(ticket, result);

    if session_lost {
        app.expire_session().await;
        return;
    }

    match outcome {
        ApplyOutcome::Applied => {
            if let WatchlistOp::MoveUp(title) | WatchlistOp::MoveDown(title) = &op {
                app.select_watchlist_title(title);
            }
            app.clamp_selections();
        }
        ApplyOutcome::Failed(message) => {
            tracing::debug!(op = ?op, message = %message, "Watchlist operation failed");
        }
        ApplyOutcome::Discarded => {}
    }

    if let Some(status) = add_status {
        app.set_status(status);
    }
}
