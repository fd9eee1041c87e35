//! In-process stand-in for the recommendation service.
//!
//! The watchlist lives in shared memory and is served with adjacency-swap
//! semantics: `move-up` swaps an entry with the one above it, `move-down`
//! with the one below, and moves at either end change nothing. Every
//! watchlist route demands `Authorization: Bearer <TOKEN>`.
#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use cinelist::api::{Gateway, RequestPolicy};
use cinelist::app::{App, AppEvent};
use cinelist::config::{Config, Consistency};
use cinelist::session::{SessionToken, TokenStore};
use cinelist::ui::handle_app_event;
use cinelist::util::parse_service_url;

pub const TOKEN: &str = "tok123";

#[derive(Clone, Default)]
pub struct FakeWatchlist {
    titles: Arc<Mutex<Vec<String>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl FakeWatchlist {
    pub fn with_titles(titles: &[&str]) -> Self {
        let fake = Self::default();
        *fake.titles.lock().unwrap() = titles.iter().map(|t| t.to_string()).collect();
        fake
    }

    /// Change the server state without going through the client.
    pub fn set_titles(&self, titles: &[&str]) {
        *self.titles.lock().unwrap() = titles.iter().map(|t| t.to_string()).collect();
    }

    /// Current server order.
    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }

    /// Hold back the response to any mutation naming `title`. The state
    /// change itself happens when the request arrives.
    pub fn delay_mutation(&self, title: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(title.to_string(), delay);
    }

    pub async fn mount(&self, server: &MockServer) {
        for (verb, route, kind) in [
            ("GET", "/api/watchlist", Route::List),
            ("POST", "/api/watchlist/add", Route::Add),
            ("POST", "/api/watchlist/remove", Route::Remove),
            ("POST", "/api/watchlist/move-up", Route::MoveUp),
            ("POST", "/api/watchlist/move-down", Route::MoveDown),
        ] {
            Mock::given(method(verb))
                .and(path(route))
                .respond_with(Responder {
                    route: kind,
                    fake: self.clone(),
                })
                .mount(server)
                .await;
        }
    }

    fn snapshot(&self) -> Value {
        let titles = self.titles.lock().unwrap();
        let entries: Vec<Value> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| json!({"title": t, "priority": i as i64 + 1}))
            .collect();
        Value::Array(entries)
    }
}

#[derive(Clone, Copy)]
enum Route {
    List,
    Add,
    Remove,
    MoveUp,
    MoveDown,
}

struct Responder {
    route: Route,
    fake: FakeWatchlist,
}

impl Respond for Responder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let expected = format!("Bearer {TOKEN}");
        let authorized = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected);
        if !authorized {
            return ResponseTemplate::new(401).set_body_json(json!({"msg": "Missing Authorization Header"}));
        }

        if let Route::List = self.route {
            return ResponseTemplate::new(200).set_body_json(self.fake.snapshot());
        }

        let title = serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|v| v.get("movie_title").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_default();

        let response = {
            let mut titles = self.fake.titles.lock().unwrap();
            let position = titles.iter().position(|t| *t == title);
            match (self.route, position) {
                (Route::Add, Some(_)) => {
                    ResponseTemplate::new(400).set_body_json(json!({"error": "Movie already in watchlist"}))
                }
                (Route::Add, None) => {
                    titles.push(title.clone());
                    ResponseTemplate::new(200).set_body_json(json!({"message": "Movie added to watchlist"}))
                }
                (_, None) => {
                    ResponseTemplate::new(404).set_body_json(json!({"error": "Movie not found in watchlist"}))
                }
                (Route::Remove, Some(i)) => {
                    titles.remove(i);
                    ResponseTemplate::new(200).set_body_json(json!({"message": "Movie removed"}))
                }
                (Route::MoveUp, Some(i)) => {
                    if i > 0 {
                        titles.swap(i, i - 1);
                    }
                    ResponseTemplate::new(200).set_body_json(json!({"message": "Moved up"}))
                }
                (Route::MoveDown, Some(i)) => {
                    if i + 1 < titles.len() {
                        titles.swap(i, i + 1);
                    }
                    ResponseTemplate::new(200).set_body_json(json!({"message": "Moved down"}))
                }
                (Route::List, _) => unreachable!(),
            }
        };

        match self.fake.delays.lock().unwrap().get(&title) {
            Some(delay) => response.set_delay(*delay),
            None => response,
        }
    }
}

/// App wired to `server`, optionally already holding [`TOKEN`].
pub async fn app_for(server: &MockServer, logged_in: bool, consistency: Consistency) -> App {
    let tokens = TokenStore::in_memory();
    if logged_in {
        tokens.set(SessionToken::new(TOKEN).unwrap()).await.unwrap();
    }
    let base = parse_service_url(&server.uri()).unwrap();
    let gateway = Gateway::new(base, tokens, RequestPolicy::default()).unwrap();
    let config = Config {
        watchlist_consistency: consistency,
        ..Config::default()
    };
    App::new(config, gateway)
}

pub fn channel() -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
    mpsc::channel(32)
}

/// Feed task results into the app until no request is outstanding.
pub async fn settle(app: &mut App, rx: &mut mpsc::Receiver<AppEvent>) {
    while app.watchlist.is_busy()
        || app.recommendations.is_loading()
        || app.login_form.submitting
        || app.register_form.submitting
    {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for a task result")
            .expect("event channel closed");
        handle_app_event(app, event).await;
    }
}

/// Titles currently displayed, in display order.
pub fn displayed(app: &App) -> Vec<String> {
    app.watchlist
        .entries()
        .iter()
        .map(|e| e.title.clone())
        .collect()
}
