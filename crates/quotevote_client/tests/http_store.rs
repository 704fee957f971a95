//! Integration tests for the reqwest quote store against a fake API.

mod support;

use quotevote_client::{HttpQuoteStore, QuoteRemote, StoreError};
use quotevote_core::models::auth::CredentialsRequest;
use quotevote_core::{QueryState, QuoteFilter, SortDirection};
use std::time::Duration;
use support::{quote, spawn_fake_server, SearchParams, PASSWORD, USERNAME, VALID_TOKEN};

fn store(base_url: &str) -> HttpQuoteStore {
    HttpQuoteStore::new(base_url, Duration::from_secs(5)).expect("store")
}

#[tokio::test]
async fn search_sends_query_params_and_bearer_token() {
    let server = spawn_fake_server().await;
    server.seed(vec![
        quote(1, "Stay hungry", 0),
        quote(2, "Stay foolish", 4),
        quote(3, "Carpe diem", 2),
    ]);
    let store = store(&server.base_url);

    let state = QueryState {
        search: "stay".to_string(),
        filter: QuoteFilter::All,
        sort: SortDirection::Ascending,
    };
    let items = store.search(VALID_TOKEN, &state).await.expect("search");
    let ids: Vec<i64> = items.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(
        server.searches(),
        vec![SearchParams {
            search: "stay".to_string(),
            filter: String::new(),
            sorting: "false".to_string(),
        }]
    );

    let voted = QueryState {
        filter: QuoteFilter::HasVotes,
        ..QueryState::default()
    };
    let items = store.search(VALID_TOKEN, &voted).await.expect("search");
    let ids: Vec<i64> = items.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn rejected_token_maps_to_unauthorized() {
    let server = spawn_fake_server().await;
    let store = store(&server.base_url);

    let err = store
        .search("stale", &QueryState::default())
        .await
        .expect_err("401");
    assert_eq!(err, StoreError::Unauthorized);
    assert_eq!(store.vote("stale", 1).await, Err(StoreError::Unauthorized));
}

#[tokio::test]
async fn error_bodies_surface_in_status_errors() {
    let server = spawn_fake_server().await;
    server.seed(vec![quote(1, "voted", 2)]);
    let store = store(&server.base_url);

    match store.update(VALID_TOKEN, 1, "edited").await {
        Err(StoreError::Status { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "quote has votes");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    match store.delete(VALID_TOKEN, 42).await {
        Err(StoreError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn mutations_hit_their_endpoints() {
    let server = spawn_fake_server().await;
    server.seed(vec![quote(1, "first", 0)]);
    let store = store(&server.base_url);

    store.vote(VALID_TOKEN, 1).await.expect("vote");
    store.create(VALID_TOKEN, "second").await.expect("create");
    store.update(VALID_TOKEN, 2, "second, edited").await.expect("update");
    store.delete(VALID_TOKEN, 1).await.expect("delete");

    let state = server.state.lock().expect("state");
    assert_eq!(state.quotes.len(), 1);
    assert_eq!(state.quotes[0].id, 2);
    assert_eq!(state.quotes[0].text, "second, edited");
}

#[tokio::test]
async fn login_and_register_round_trip() {
    let server = spawn_fake_server().await;
    let store = store(&server.base_url);

    let response = store
        .login(&CredentialsRequest::new(USERNAME, PASSWORD))
        .await
        .expect("login");
    assert_eq!(response.token, VALID_TOKEN);
    assert_eq!(response.role, "user");

    let err = store
        .login(&CredentialsRequest::new(USERNAME, "wrong"))
        .await
        .expect_err("bad password");
    assert_eq!(err, StoreError::Unauthorized);

    let request = CredentialsRequest::new("newuser1", "Abcdef1!");
    store.register(&request).await.expect("register");
    assert!(matches!(
        store.register(&request).await,
        Err(StoreError::Status { status: 409, .. })
    ));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let store = HttpQuoteStore::new(&format!("http://{}", addr), Duration::from_secs(2))
        .expect("store");
    let err = store
        .search(VALID_TOKEN, &QueryState::default())
        .await
        .expect_err("connection refused");
    assert!(matches!(err, StoreError::Transport(_)));
}
