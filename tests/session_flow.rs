//! Integration tests for the session lifecycle: login, credential attachment,
//! the protected-view guard, and logout.

mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use cinelist::app::{Navigation, View};
use cinelist::config::Consistency;
use cinelist::ui::{
    enter_view, handle_app_event, spawn_login, spawn_logout, spawn_recommendations,
    spawn_register,
};
use support::{app_for, channel, settle, FakeWatchlist, TOKEN};

fn fill(form: &mut cinelist::app::Form, values: &[&str]) {
    for (field, value) in form.fields.iter_mut().zip(values) {
        field.value = value.to_string();
    }
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_and_opens_recommendations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "a", "password": "b"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": TOKEN})))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server, false, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();
    app.navigate(View::Login);
    fill(&mut app.login_form, &["a", "b"]);

    spawn_login(&mut app, &tx);
    settle(&mut app, &mut rx).await;

    let token = app.tokens.get().expect("token stored");
    assert_eq!(token.bearer_header(), format!("Bearer {TOKEN}"));
    assert_eq!(app.view, View::Recommendations);
    assert!(app.login_form.error.is_none());
    assert_eq!(app.login_form.value(1), "");
}

#[tokio::test]
async fn test_login_without_token_stays_on_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;

    let mut app = app_for(&server, false, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();
    app.navigate(View::Login);
    fill(&mut app.login_form, &["a", "b"]);

    spawn_login(&mut app, &tx);
    settle(&mut app, &mut rx).await;

    assert!(!app.is_logged_in());
    assert_eq!(app.view, View::Login);
}

#[tokio::test]
async fn test_login_rejection_shows_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})))
        .mount(&server)
        .await;

    let mut app = app_for(&server, false, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();
    app.navigate(View::Login);
    fill(&mut app.login_form, &["a", "wrong"]);

    spawn_login(&mut app, &tx);
    settle(&mut app, &mut rx).await;

    assert_eq!(app.login_form.error.as_deref(), Some("Invalid credentials"));
    assert!(!app.is_logged_in());
    assert_eq!(app.view, View::Login);
}

#[tokio::test]
async fn test_blank_login_never_reaches_server() {
    let server = MockServer::start().await;
    let mut app = app_for(&server, false, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();

    spawn_login(&mut app, &tx);
    settle(&mut app, &mut rx).await;

    assert_eq!(
        app.login_form.error.as_deref(),
        Some("Username and password are required")
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_success_shows_notice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({"username": "neo", "password": "zion"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "User created"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server, false, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();
    app.navigate(View::Register);
    fill(&mut app.register_form, &["neo", "zion", "zion"]);

    spawn_register(&mut app, &tx);
    settle(&mut app, &mut rx).await;

    assert_eq!(app.register_form.notice.as_deref(), Some("User created"));
    assert!(app.register_form.error.is_none());
    assert!(!app.is_logged_in());
}

#[tokio::test]
async fn test_register_mismatch_is_local() {
    let server = MockServer::start().await;
    let mut app = app_for(&server, false, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();
    fill(&mut app.register_form, &["neo", "zion", "matrix"]);

    spawn_register(&mut app, &tx);
    settle(&mut app, &mut rx).await;

    assert_eq!(app.register_form.error.as_deref(), Some("Passwords do not match"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Credential attachment
// ============================================================================

#[tokio::test]
async fn test_requests_after_login_carry_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": TOKEN})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommendations"))
        .and(query_param("title", "Heat"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Ronin", "Thief"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server, false, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();
    fill(&mut app.login_form, &["a", "b"]);
    spawn_login(&mut app, &tx);
    settle(&mut app, &mut rx).await;

    app.title_input = "Heat".into();
    spawn_recommendations(&mut app, &tx);
    settle(&mut app, &mut rx).await;

    assert_eq!(app.recommendations.results(), ["Ronin", "Thief"]);
    assert!(app.recommendations.error().is_none());
}

#[tokio::test]
async fn test_anonymous_requests_carry_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(|req: &Request| !req.headers.contains_key("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server, false, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();
    fill(&mut app.register_form, &["neo", "zion", "zion"]);

    spawn_register(&mut app, &tx);
    settle(&mut app, &mut rx).await;

    assert_eq!(app.register_form.notice.as_deref(), Some("Registered successfully!"));
}

// ============================================================================
// Protected-view guard
// ============================================================================

#[tokio::test]
async fn test_guard_redirects_before_any_request() {
    let server = MockServer::start().await;
    FakeWatchlist::with_titles(&["Alien"]).mount(&server).await;

    let mut app = app_for(&server, false, Consistency::LastResponse).await;
    let (tx, _rx) = channel();

    assert_eq!(enter_view(&mut app, View::Watchlist, &tx), Navigation::Redirected);
    assert_eq!(enter_view(&mut app, View::Recommendations, &tx), Navigation::Redirected);
    assert_eq!(app.view, View::Login);
    assert!(!app.watchlist.is_busy());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_guard_admits_logged_in_user() {
    let server = MockServer::start().await;
    FakeWatchlist::with_titles(&["Alien"]).mount(&server).await;

    let mut app = app_for(&server, true, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();

    assert_eq!(
        enter_view(&mut app, View::Watchlist, &tx),
        Navigation::Entered(View::Watchlist)
    );
    settle(&mut app, &mut rx).await;
    assert_eq!(app.view, View::Watchlist);
    assert_eq!(app.watchlist.entries().len(), 1);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_session_even_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    FakeWatchlist::with_titles(&["Alien"]).mount(&server).await;

    let mut app = app_for(&server, true, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();
    enter_view(&mut app, View::Watchlist, &tx);
    settle(&mut app, &mut rx).await;
    assert!(!app.watchlist.entries().is_empty());

    spawn_logout(&mut app, &tx);
    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    handle_app_event(&mut app, event).await;

    assert!(!app.is_logged_in());
    assert_eq!(app.view, View::Login);
    assert!(app.watchlist.entries().is_empty());
    assert_eq!(enter_view(&mut app, View::Watchlist, &tx), Navigation::Redirected);
}

#[tokio::test]
async fn test_late_watchlist_after_logout_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/watchlist"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"title": "Private pick", "priority": 1}]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let mut app = app_for(&server, true, Consistency::LastResponse).await;
    let (tx, mut rx) = channel();
    enter_view(&mut app, View::Watchlist, &tx);
    spawn_logout(&mut app, &tx);

    for _ in 0..2 {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        handle_app_event(&mut app, event).await;
    }

    assert!(!app.is_logged_in());
    assert!(app.watchlist.entries().is_empty());
    assert!(!app.watchlist.is_busy());
}
