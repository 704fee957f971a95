//! In-process fake of the quote REST service for integration tests.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use quotevote_core::models::auth::{encode_password, CredentialsRequest, LoginResponse};
use quotevote_core::models::quote::{QuoteTextRequest, VoteRequest};
use quotevote_core::{Quote, QuoteId};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};

pub const VALID_TOKEN: &str = "valid-token";
pub const USERNAME: &str = "alice1";
pub const PASSWORD: &str = "Secret1!";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub sorting: String,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub quotes: Vec<Quote>,
    pub next_id: QuoteId,
    pub searches: Vec<SearchParams>,
    pub registered: Vec<String>,
    pub fail_searches: bool,
}

pub type Shared = Arc<Mutex<FakeState>>;

pub struct FakeServer {
    pub base_url: String,
    pub state: Shared,
}

impl FakeServer {
    pub fn searches(&self) -> Vec<SearchParams> {
        self.state.lock().expect("state").searches.clone()
    }

    pub fn seed(&self, quotes: Vec<Quote>) {
        let mut state = self.state.lock().expect("state");
        state.next_id = quotes.iter().map(|q| q.id).max().unwrap_or(0) + 1;
        state.quotes = quotes;
    }
}

pub fn quote(id: QuoteId, text: &str, vote_count: u64) -> Quote {
    Quote {
        id,
        text: text.to_string(),
        author: USERNAME.to_string(),
        vote_count,
        created_at: "2024-05-01T10:00:00Z".to_string(),
        updated_at: "2024-05-01T10:00:00Z".to_string(),
    }
}

fn authorized(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {}", VALID_TOKEN);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn login(Json(body): Json<CredentialsRequest>) -> impl IntoResponse {
    if body.username == USERNAME && body.password == encode_password(PASSWORD) {
        return Json(LoginResponse {
            token: VALID_TOKEN.to_string(),
            username: body.username,
            role: "user".to_string(),
        })
        .into_response();
    }
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad credentials"}))).into_response()
}

async fn register(
    State(state): State<Shared>,
    Json(body): Json<CredentialsRequest>,
) -> impl IntoResponse {
    let mut state = state.lock().expect("state");
    if state.registered.contains(&body.username) {
        return (StatusCode::CONFLICT, Json(json!({"error": "taken"}))).into_response();
    }
    state.registered.push(body.username.clone());
    (StatusCode::CREATED, Json(json!({"username": body.username}))).into_response()
}

async fn search(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Quote>>, StatusCode> {
    authorized(&headers)?;
    let mut state = state.lock().expect("state");
    state.searches.push(params.clone());
    if state.fail_searches {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let needle = params.search.to_lowercase();
    let mut items: Vec<Quote> = state
        .quotes
        .iter()
        .filter(|q| q.text.to_lowercase().contains(&needle))
        .filter(|q| match params.filter.as_str() {
            "have" => q.vote_count > 0,
            "no" => q.vote_count == 0,
            _ => true,
        })
        .cloned()
        .collect();
    if params.sorting == "false" {
        items.sort_by_key(|q| q.vote_count);
    } else {
        items.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    }
    Ok(Json(items))
}

async fn vote(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<VoteRequest>,
) -> StatusCode {
    if let Err(status) = authorized(&headers) {
        return status;
    }
    let mut state = state.lock().expect("state");
    match state.quotes.iter_mut().find(|q| q.id == body.quote_id) {
        Some(quote) => {
            quote.vote_count += 1;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn create(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<QuoteTextRequest>,
) -> StatusCode {
    if let Err(status) = authorized(&headers) {
        return status;
    }
    let mut state = state.lock().expect("state");
    let id = state.next_id.max(1);
    state.next_id = id + 1;
    state.quotes.push(quote(id, &body.text, 0));
    StatusCode::CREATED
}

async fn update(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<QuoteId>,
    Json(body): Json<QuoteTextRequest>,
) -> impl IntoResponse {
    if let Err(status) = authorized(&headers) {
        return status.into_response();
    }
    let mut state = state.lock().expect("state");
    match state.quotes.iter_mut().find(|q| q.id == id) {
        Some(quote) if quote.vote_count > 0 => (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "quote has votes"})),
        )
            .into_response(),
        Some(quote) => {
            quote.text = body.text;
            StatusCode::OK.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn remove(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<QuoteId>,
) -> StatusCode {
    if let Err(status) = authorized(&headers) {
        return status;
    }
    let mut state = state.lock().expect("state");
    let before = state.quotes.len();
    state.quotes.retain(|q| q.id != id);
    if state.quotes.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

pub async fn spawn_fake_server() -> FakeServer {
    let state: Shared = Arc::new(Mutex::new(FakeState {
        next_id: 1,
        ..FakeState::default()
    }));
    let app = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/api/quotes/search", get(search))
        .route("/api/quotes/vote", post(vote))
        .route("/api/quotes", post(create))
        .route("/api/quotes-update/:id", post(update))
        .route("/api/quotes/:id", delete(remove))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake api");
    });

    FakeServer {
        base_url: format!("http://{}", addr),
        state,
    }
}
