//! Integration tests for the API client against a live fake API.
//!
//! Tests cover: listing decode, single-record fetch, booking confirmation,
//! rejection and decode failures, transport failures, and record writes.

use catalogue_client::{
    ApiClient, BookingPayload, BookingTarget, CatalogueItemPayload, MoviePayload,
};
use catalogue_core::SubmissionError;
use catalogue_test::{FakeApi, FakeServer, Reply};
use chrono::NaiveDate;
use serde_json::json;

async fn client_for(api: &FakeApi) -> (ApiClient, FakeServer) {
    let server = api.serve().await;
    let client = ApiClient::new(&server.url()).unwrap();
    (client, server)
}

fn dune_booking() -> BookingPayload {
    BookingPayload {
        name: "Jane".into(),
        phone: "0700000000".into(),
        booking_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        booking_to: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        target: BookingTarget::Movie {
            movie_id: 7,
            movie_title: "Dune".into(),
        },
    }
}

fn movie_payload() -> MoviePayload {
    MoviePayload {
        name: "Dune".into(),
        description: "Sand".into(),
        image: "https://img.example.com/dune.png".into(),
        director: "Villeneuve".into(),
        genre_id: 2,
        release_date: "2021-10-22".into(),
        rental_fee: 500.0,
    }
}

// ═════════════════════════════════════════════════════════════════════
// 1. Listings
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_listings_decode() {
    let api = FakeApi::new()
        .with_genres(vec![json!({"id": 1, "name": "Drama"})])
        .with_movies(vec![
            json!({"id": 7, "name": "Dune", "director": "Villeneuve", "rental_fee": 500, "is_rented": false}),
            json!({"id": 8, "title": "Alien", "is_rented": true}),
        ])
        .with_catalogue(vec![json!({"id": 3, "name": "Emma", "author": "Austen", "booking_fee": 50.5})]);
    let (client, server) = client_for(&api).await;

    let genres = client.genres().await.unwrap();
    assert_eq!(genres[0].name, "Drama");

    let movies = client.movies().await.unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].rental_fee, Some(500.0));
    assert_eq!(movies[1].name, "Alien");
    assert!(movies[1].is_rented);

    let books = client.catalogue().await.unwrap();
    assert_eq!(books[0].author.as_deref(), Some("Austen"));

    server.stop().await;
}

#[tokio::test]
async fn test_single_movie_and_missing_movie() {
    let api = FakeApi::new().with_movies(vec![json!({"id": 7, "name": "Dune"})]);
    let (client, server) = client_for(&api).await;

    assert_eq!(client.movie(7).await.unwrap().name, "Dune");

    let err = client.movie(99).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    server.stop().await;
}

#[tokio::test]
async fn test_listing_with_wrong_shape_is_decode_error() {
    let api = FakeApi::new().with_genres(vec![json!({"name": "no id"})]);
    let (client, server) = client_for(&api).await;

    let err = client.genres().await.unwrap_err();
    assert!(matches!(err, SubmissionError::DecodeError(_)));

    server.stop().await;
}

// ═════════════════════════════════════════════════════════════════════
// 2. Booking
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_book_returns_confirmation_verbatim() {
    let api = FakeApi::new();
    api.reply_to_bookings(Reply::new(201, r#"{"booking_id": 41, "status": "ok"}"#));
    let (client, server) = client_for(&api).await;

    let confirmation = client.book(&dune_booking()).await.unwrap();
    assert_eq!(
        confirmation.as_json(),
        &json!({"booking_id": 41, "status": "ok"})
    );

    let sent = api.bookings();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["movie_id"], 7);
    assert_eq!(sent[0]["movie_title"], "Dune");
    assert_eq!(sent[0]["booking_to"], "2024-01-05");

    server.stop().await;
}

#[tokio::test]
async fn test_book_rejected_keeps_status_and_body() {
    let api = FakeApi::new();
    api.reply_to_bookings(Reply::new(500, "database on fire"));
    let (client, server) = client_for(&api).await;

    let err = client.book(&dune_booking()).await.unwrap_err();
    assert_eq!(
        err,
        SubmissionError::ServerRejected {
            status: 500,
            body: "database on fire".into(),
        }
    );
    assert_eq!(api.booking_count(), 1);

    server.stop().await;
}

#[tokio::test]
async fn test_book_malformed_or_empty_confirmation() {
    let api = FakeApi::new();
    api.reply_to_bookings(Reply::new(200, "<html>ok</html>"));
    let (client, server) = client_for(&api).await;

    let err = client.book(&dune_booking()).await.unwrap_err();
    assert!(matches!(err, SubmissionError::DecodeError(_)));

    api.reply_to_bookings(Reply::new(200, ""));
    let err = client.book(&dune_booking()).await.unwrap_err();
    assert!(matches!(err, SubmissionError::DecodeError(_)));

    server.stop().await;
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{addr}")).unwrap();
    let err = client.book(&dune_booking()).await.unwrap_err();
    assert!(matches!(err, SubmissionError::NetworkError(_)));
}

// ═════════════════════════════════════════════════════════════════════
// 3. Record writes
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_writes_send_numbers_and_hit_the_right_paths() {
    let api = FakeApi::new();
    let (client, server) = client_for(&api).await;

    let created = client.create_movie(&movie_payload()).await.unwrap();
    assert_eq!(created, json!({"id": 1}));

    client.update_movie(7, &movie_payload()).await.unwrap();

    client
        .create_catalogue_item(&CatalogueItemPayload {
            name: "Emma".into(),
            description: "A novel".into(),
            image: "https://img.example.com/emma.png".into(),
            author: "Austen".into(),
            genre_id: 4,
            date_published: "1815-12-23".into(),
            booking_fee: 50.0,
        })
        .await
        .unwrap();

    let requests = api.requests();
    let summary: Vec<(&str, &str)> = requests
        .iter()
        .map(|r| (r.method.as_str(), r.path.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("POST", "/movies"),
            ("PUT", "/movies/7"),
            ("POST", "/catalogue"),
        ]
    );
    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["rental_fee"], json!(500.0));
    assert_eq!(body["genre_id"], json!(2));
    let body = requests[2].body.as_ref().unwrap();
    assert_eq!(body["booking_fee"], json!(50.0));

    server.stop().await;
}

#[tokio::test]
async fn test_write_with_empty_body_is_null() {
    let api = FakeApi::new();
    api.reply_to_writes(Reply::new(204, ""));
    let (client, server) = client_for(&api).await;

    let value = client.update_movie(7, &movie_payload()).await.unwrap();
    assert!(value.is_null());

    server.stop().await;
}

#[tokio::test]
async fn test_write_rejected() {
    let api = FakeApi::new();
    api.reply_to_writes(Reply::new(422, r#"{"error":"bad genre"}"#));
    let (client, server) = client_for(&api).await;

    let err = client.create_movie(&movie_payload()).await.unwrap_err();
    assert_eq!(err.status(), Some(422));

    server.stop().await;
}
