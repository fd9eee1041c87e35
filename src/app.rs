use crate::api::{
    ApiError, AuthClient, Gateway, LoginOutcome, RecommendationQuery, RecommendationsClient,
    SyncError, Ticket, WatchlistController, WatchlistEntry, WatchlistOp, WatchlistRemote,
};
use crate::config::Config;
use crate::session::{GuardDecision, SessionGuard, TokenStore};
use crate::theme::{Palette, ThemeVariant};
use std::borrow::Cow;
use tokio::time::Instant;

// ============================================================================
// View Enum
// ============================================================================

/// Screens of the client. The guard runs on every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Login,
    Register,
    Recommendations,
    Watchlist,
}

impl View {
    /// Protected views need a session token to be entered.
    pub fn is_protected(self) -> bool {
        matches!(self, View::Recommendations | View::Watchlist)
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Landing => "Home",
            View::Login => "Login",
            View::Register => "Register",
            View::Recommendations => "Recommendations",
            View::Watchlist => "Watchlist",
        }
    }
}

/// Where a navigation request actually ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Entered(View),
    /// The target was protected and no session existed.
    Redirected,
}

/// Which half of the recommendations view takes keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecFocus {
    Input,
    Results,
}

// ============================================================================
// Forms
// ============================================================================

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    /// Rendered masked.
    pub secret: bool,
}

impl FormField {
    fn new(label: &'static str, secret: bool) -> Self {
        Self {
            label,
            value: String::new(),
            secret,
        }
    }
}

/// Text-entry form for login and registration.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub submitting: bool,
}

/// Upper bound on any single form field.
pub const MAX_FIELD_LENGTH: usize = 256;

impl Form {
    pub fn login() -> Self {
        Self::with_fields(vec![
            FormField::new("Username", false),
            FormField::new("Password", true),
        ])
    }

    pub fn register() -> Self {
        Self::with_fields(vec![
            FormField::new("Username", false),
            FormField::new("Password", true),
            FormField::new("Confirm password", true),
        ])
    }

    fn with_fields(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            focus: 0,
            error: None,
            notice: None,
            submitting: false,
        }
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.value.chars().count() < MAX_FIELD_LENGTH {
                field.value.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Blank every field, keeping messages.
    pub fn clear_values(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focus = 0;
    }
}

// ============================================================================
// Background Task Events
// ============================================================================

/// Completion events sent by spawned network tasks.
#[derive(Debug)]
pub enum AppEvent {
    LoginFinished(Result<LoginOutcome, ApiError>),
    RegisterFinished(Result<String, ApiError>),
    /// Local session is gone. Carries the persistence error, if any.
    LogoutFinished(Result<(), String>),
    RecommendationsLoaded {
        epoch: u64,
        ticket: Ticket,
        result: Result<Vec<String>, ApiError>,
    },
    /// A watchlist mutation succeeded and its re-fetch started.
    WatchlistRefreshing {
        epoch: u64,
        ticket: Ticket,
    },
    WatchlistSynced {
        epoch: u64,
        ticket: Ticket,
        op: WatchlistOp,
        result: Result<Vec<WatchlistEntry>, SyncError>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "login", "watchlist")
    /// - `epoch`: Session epoch when the task was spawned
    /// - `ticket`: The request the task was carrying, if it had one
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked {
        task: &'static str,
        epoch: u64,
        ticket: Option<Ticket>,
        error: String,
    },
}

// ============================================================================
// App State
// ============================================================================

pub struct App {
    pub config: Config,
    pub tokens: TokenStore,
    guard: SessionGuard,

    // Clients
    pub auth: AuthClient,
    pub recommender: RecommendationsClient,
    pub watchlist_remote: WatchlistRemote,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: Palette,

    // Navigation
    pub view: View,
    pub show_help: bool,
    pub help_scroll_offset: usize,

    // Forms
    pub login_form: Form,
    pub register_form: Form,

    // Recommendations
    pub title_input: String,
    pub rec_focus: RecFocus,
    pub recommendations: RecommendationQuery,
    pub selected_recommendation: usize,

    // Watchlist
    pub watchlist: WatchlistController,
    pub selected_entry: usize,

    /// Session epoch for in-flight request tracking.
    ///
    /// Bumped whenever the session changes hands (login, logout, expiry).
    /// Every protected task carries the epoch it was spawned under, and its
    /// result is dropped if the epoch has moved on since.
    pub session_epoch: u64,

    // UI State
    /// Status message with timestamp for auto-expiry.
    /// Uses Cow to avoid allocation for static strings.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Whether the UI needs to be redrawn.
    pub needs_redraw: bool,
    /// Spinner frame index for loading animation (0..9).
    pub spinner_frame: usize,
}

impl App {
    pub fn new(config: Config, gateway: Gateway) -> Self {
        let tokens = gateway.tokens().clone();
        let consistency = config.watchlist_consistency;
        let theme_variant = config.theme;

        Self {
            guard: SessionGuard::new(tokens.clone()),
            tokens,
            auth: AuthClient::new(gateway.clone()),
            recommender: RecommendationsClient::new(gateway.clone()),
            watchlist_remote: WatchlistRemote::new(gateway),
            theme_variant,
            theme: theme_variant.palette(),
            view: View::Landing,
            show_help: false,
            help_scroll_offset: 0,
            login_form: Form::login(),
            register_form: Form::register(),
            title_input: String::new(),
            rec_focus: RecFocus::Input,
            recommendations: RecommendationQuery::new(consistency),
            selected_recommendation: 0,
            watchlist: WatchlistController::new(consistency),
            selected_entry: 0,
            session_epoch: 0,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            config,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.is_present()
    }

    /// Move to `target`, running the session guard first.
    ///
    /// Loading data for the new view is the caller's job, and must only happen
    /// on `Navigation::Entered`.
    pub fn navigate(&mut self, target: View) -> Navigation {
        match self.guard.check(target) {
            GuardDecision::Proceed => {
                tracing::debug!(from = ?self.view, to = ?target, "Navigating");
                self.view = target;
                self.show_help = false;
                Navigation::Entered(target)
            }
            GuardDecision::RedirectToLogin => {
                self.view = View::Login;
                self.set_status("Please log in first");
                Navigation::Redirected
            }
        }
    }

    /// True for errors that mean the session is gone: a 401 from the service,
    /// or a protected call attempted without a token.
    pub fn is_session_error(err: &ApiError) -> bool {
        err.is_auth_rejection() || matches!(err, ApiError::Unauthenticated)
    }

    /// Destroy the session after a rejection and send the user to login.
    pub async fn expire_session(&mut self) {
        if let Err(e) = self.tokens.clear().await {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
        self.reset_protected_state();
        self.view = View::Login;
        self.set_status("Session expired, please log in again");
    }

    /// Forget everything that belongs to the logged-in user.
    ///
    /// Also starts a new session epoch, so results of requests issued under
    /// the old session are ignored when they arrive.
    pub fn reset_protected_state(&mut self) {
        self.advance_session_epoch();
        self.watchlist.reset();
        self.selected_entry = 0;
        self.recommendations.reset();
        self.selected_recommendation = 0;
        self.title_input.clear();
        self.rec_focus = RecFocus::Input;
    }

    pub fn advance_session_epoch(&mut self) {
        self.session_epoch = self.session_epoch.wrapping_add(1);
        tracing::debug!(epoch = self.session_epoch, "Session epoch advanced");
    }

    /// True if a result spawned under `epoch` still belongs to the current session.
    pub fn is_current_epoch(&self, epoch: u64) -> bool {
        epoch == self.session_epoch
    }

    pub fn cycle_theme(&mut self) {
        self.theme_variant = self.theme_variant.next();
        self.theme = self.theme_variant.palette();
        self.set_status(format!("Theme: {}", self.theme_variant.name()));
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn selected_watchlist_title(&self) -> Option<&str> {
        self.watchlist
            .entries()
            .get(self.selected_entry)
            .map(|e| e.title.as_str())
    }

    pub fn selected_recommendation_title(&self) -> Option<&str> {
        self.recommendations
            .results()
            .get(self.selected_recommendation)
            .map(String::as_str)
    }

    pub fn nav_down(&mut self) {
        match self.view {
            View::Watchlist => {
                let len = self.watchlist.entries().len();
                if len > 0 && self.selected_entry < len - 1 {
                    self.selected_entry += 1;
                }
            }
            View::Recommendations => {
                let len = self.recommendations.results().len();
                if len > 0 && self.selected_recommendation < len - 1 {
                    self.selected_recommendation += 1;
                }
            }
            _ => {}
        }
    }

    pub fn nav_up(&mut self) {
        match self.view {
            View::Watchlist => self.selected_entry = self.selected_entry.saturating_sub(1),
            View::Recommendations => {
                self.selected_recommendation = self.selected_recommendation.saturating_sub(1)
            }
            _ => {}
        }
    }

    /// Keep selection indices inside their lists after a snapshot lands.
    pub fn clamp_selections(&mut self) {
        let entries = self.watchlist.entries().len();
        self.selected_entry = self.selected_entry.min(entries.saturating_sub(1));
        let recs = self.recommendations.results().len();
        self.selected_recommendation = self.selected_recommendation.min(recs.saturating_sub(1));
    }

    /// Point the watchlist cursor at `title` if it is in the current snapshot.
    pub fn select_watchlist_title(&mut self, title: &str) {
        if let Some(idx) = self.watchlist.entries().iter().position(|e| e.title == title) {
            self.selected_entry = idx;
        }
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set a status message.
    ///
    /// Accepts `&'static str` (zero allocation) or `String`.
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestPolicy;
    use crate::session::SessionToken;
    use crate::util::parse_service_url;

    fn test_app() -> App {
        let base = parse_service_url("http://127.0.0.1:9").unwrap();
        let gateway = Gateway::new(base, TokenStore::in_memory(), RequestPolicy::default()).unwrap();
        App::new(Config::default(), gateway)
    }

    fn entry(title: &str, priority: i64) -> WatchlistEntry {
        WatchlistEntry {
            title: title.into(),
            priority,
        }
    }

    fn load_watchlist(app: &mut App, entries: Vec<WatchlistEntry>) {
        let ticket = app.watchlist.begin(&WatchlistOp::Fetch);
        app.watchlist.apply(ticket, Ok(entries));
    }

    #[test]
    fn test_protected_views() {
        assert!(View::Recommendations.is_protected());
        assert!(View::Watchlist.is_protected());
        assert!(!View::Landing.is_protected());
        assert!(!View::Login.is_protected());
        assert!(!View::Register.is_protected());
    }

    #[test]
    fn test_navigate_without_session_redirects() {
        let mut app = test_app();
        assert_eq!(app.navigate(View::Watchlist), Navigation::Redirected);
        assert_eq!(app.view, View::Login);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_navigate_with_session_enters() {
        let mut app = test_app();
        app.tokens.set(SessionToken::new("tok").unwrap()).await.unwrap();
        assert_eq!(
            app.navigate(View::Recommendations),
            Navigation::Entered(View::Recommendations)
        );
        assert_eq!(app.view, View::Recommendations);
    }

    #[tokio::test]
    async fn test_expire_session_clears_everything() {
        let mut app = test_app();
        app.tokens.set(SessionToken::new("tok").unwrap()).await.unwrap();
        app.navigate(View::Watchlist);
        load_watchlist(&mut app, vec![entry("Heat", 1)]);
        app.title_input.push_str("Alien");

        app.expire_session().await;

        assert!(!app.is_logged_in());
        assert_eq!(app.view, View::Login);
        assert!(app.watchlist.entries().is_empty());
        assert!(app.title_input.is_empty());
    }

    #[test]
    fn test_session_error_classification() {
        assert!(App::is_session_error(&ApiError::Unauthenticated));
        assert!(App::is_session_error(&ApiError::Remote {
            status: 401,
            message: None
        }));
        assert!(!App::is_session_error(&ApiError::Remote {
            status: 404,
            message: None
        }));
    }

    #[test]
    fn test_form_editing() {
        let mut form = Form::register();
        form.push_char('a');
        form.next_field();
        form.push_char('p');
        form.push_char('w');
        form.pop_char();
        form.prev_field();
        form.prev_field();
        assert_eq!(form.focus, 2);
        assert_eq!(form.value(0), "a");
        assert_eq!(form.value(1), "p");
        assert_eq!(form.value(9), "");

        form.clear_values();
        assert_eq!(form.value(0), "");
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_form_field_length_capped() {
        let mut form = Form::login();
        for _ in 0..(MAX_FIELD_LENGTH + 10) {
            form.push_char('x');
        }
        assert_eq!(form.value(0).len(), MAX_FIELD_LENGTH);
    }

    #[tokio::test]
    async fn test_watchlist_navigation_and_clamp() {
        let mut app = test_app();
        app.tokens.set(SessionToken::new("tok").unwrap()).await.unwrap();
        app.navigate(View::Watchlist);
        load_watchlist(&mut app, vec![entry("A", 1), entry("B", 2), entry("C", 3)]);

        app.nav_down();
        app.nav_down();
        app.nav_down();
        assert_eq!(app.selected_entry, 2);
        assert_eq!(app.selected_watchlist_title(), Some("C"));

        load_watchlist(&mut app, vec![entry("A", 1)]);
        app.clamp_selections();
        assert_eq!(app.selected_entry, 0);

        app.nav_up();
        assert_eq!(app.selected_entry, 0);
    }

    #[test]
    fn test_select_watchlist_title_follows_move() {
        let mut app = test_app();
        load_watchlist(&mut app, vec![entry("B", 1), entry("A", 2)]);
        app.select_watchlist_title("A");
        assert_eq!(app.selected_entry, 1);
        app.select_watchlist_title("missing");
        assert_eq!(app.selected_entry, 1);
    }

    #[test]
    fn test_cycle_theme() {
        let mut app = test_app();
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
        app.cycle_theme();
        assert_eq!(app.theme_variant, ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_status_expiry() {
        tokio::time::pause();
        let mut app = test_app();
        app.set_status("hello");
        assert!(!app.clear_expired_status());
        tokio::time::advance(std::time::Duration::from_secs(3)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
