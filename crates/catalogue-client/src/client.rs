//! The HTTP client for the external catalogue/movie API.
//!
//! Every call is a single request with no retry. Failures are mapped onto
//! [`SubmissionError`]: a request that never got a response is a
//! `NetworkError`, a non-2xx status is `ServerRejected` with the body text
//! kept verbatim, and a body that does not decode is a `DecodeError`.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use catalogue_core::{CatalogueError, Settings, SubmissionError};

use crate::models::{
    BookingConfirmation, BookingPayload, CatalogueItem, CatalogueItemPayload, Genre, Movie,
    MoviePayload,
};

/// A client bound to one API base URL.
///
/// Cloning is cheap; clones share the underlying connection pool.
///
/// ```rust,no_run
/// use catalogue_client::ApiClient;
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ApiClient::new("http://localhost:3000")?;
///     for movie in client.movies().await? {
///         println!("{} ({})", movie.name, movie.id);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` with the default request timeout.
    pub fn new(base_url: &str) -> Result<Self, CatalogueError> {
        Self::from_settings(&Settings {
            base_url: base_url.to_string(),
            ..Settings::default()
        })
    }

    /// Creates a client from settings. The request timeout is applied to
    /// the transport.
    pub fn from_settings(settings: &Settings) -> Result<Self, CatalogueError> {
        let base = settings.api_base()?;
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| {
                CatalogueError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
            })?;
        Ok(Self::with_http(http, base))
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub const fn with_http(http: reqwest::Client, base: Url) -> Self {
        Self { http, base }
    }

    /// Returns the base URL requests are resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    // ── Listings ─────────────────────────────────────────────────────

    /// `GET /genres`
    pub async fn genres(&self) -> Result<Vec<Genre>, SubmissionError> {
        self.get_json("genres").await
    }

    /// `GET /movies`
    pub async fn movies(&self) -> Result<Vec<Movie>, SubmissionError> {
        self.get_json("movies").await
    }

    /// `GET /movies/{id}`
    pub async fn movie(&self, id: i64) -> Result<Movie, SubmissionError> {
        self.get_json(&format!("movies/{id}")).await
    }

    /// `GET /catalogue`
    pub async fn catalogue(&self) -> Result<Vec<CatalogueItem>, SubmissionError> {
        self.get_json("catalogue").await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// `POST /movies`. Returns the server's response body as JSON.
    pub async fn create_movie(
        &self,
        payload: &MoviePayload,
    ) -> Result<serde_json::Value, SubmissionError> {
        self.write(Method::POST, "movies", payload).await
    }

    /// `PUT /movies/{id}`. Returns the server's response body as JSON.
    pub async fn update_movie(
        &self,
        id: i64,
        payload: &MoviePayload,
    ) -> Result<serde_json::Value, SubmissionError> {
        self.write(Method::PUT, &format!("movies/{id}"), payload)
            .await
    }

    /// `POST /catalogue`. Returns the server's response body as JSON.
    pub async fn create_catalogue_item(
        &self,
        payload: &CatalogueItemPayload,
    ) -> Result<serde_json::Value, SubmissionError> {
        self.write(Method::POST, "catalogue", payload).await
    }

    /// `POST /booking`.
    ///
    /// The confirmation must be a JSON document; an empty body is a
    /// `DecodeError`.
    pub async fn book(
        &self,
        payload: &BookingPayload,
    ) -> Result<BookingConfirmation, SubmissionError> {
        let path = "booking";
        let url = self.endpoint(path)?;
        let body = self
            .execute(self.http.post(url).json(payload), &Method::POST, path)
            .await?;
        decode(&body)
    }

    // ── Plumbing ─────────────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Result<Url, SubmissionError> {
        self.base
            .join(path)
            .map_err(|e| SubmissionError::NetworkError(format!("Invalid endpoint '{path}': {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SubmissionError> {
        let url = self.endpoint(path)?;
        let body = self.execute(self.http.get(url), &Method::GET, path).await?;
        decode(&body)
    }

    async fn write<P: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        payload: &P,
    ) -> Result<serde_json::Value, SubmissionError> {
        let url = self.endpoint(path)?;
        let request = self.http.request(method.clone(), url).json(payload);
        let body = self.execute(request, &method, path).await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        decode(&body)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        method: &Method,
        path: &str,
    ) -> Result<String, SubmissionError> {
        tracing::debug!(%method, path, base = %self.base, "API request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "API request failed");
            SubmissionError::NetworkError(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%method, path, status = status.as_u16(), "API rejected request");
            return Err(SubmissionError::ServerRejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(%method, path, status = status.as_u16(), "API response");
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, SubmissionError> {
    serde_json::from_str(body).map_err(|e| SubmissionError::DecodeError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_base() {
        let client = ApiClient::new("http://api.example.com/v1").unwrap();
        assert_eq!(client.base_url().as_str(), "http://api.example.com/v1/");
        assert_eq!(
            client.endpoint("movies/3").unwrap().as_str(),
            "http://api.example.com/v1/movies/3"
        );
    }

    #[test]
    fn test_new_rejects_bad_base() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(CatalogueError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_decode_error() {
        let err = decode::<Vec<Genre>>("{oops").unwrap_err();
        assert!(matches!(err, SubmissionError::DecodeError(_)));
    }
}
