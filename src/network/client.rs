//! API client - executes catalog requests and maps responses

use crate::messages::ApiResponse;
use crate::models::{
    ApiError, AuthReply, BookEnvelope, BooksEnvelope, Credentials, Registration,
    ReservationsEnvelope, User,
};

/// Thin wrapper around a shared reqwest client and the API base URL.
/// One method per endpoint; every method resolves to an `ApiResponse`
/// so the network layer never panics on a bad wire interaction.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            http: create_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /books`
    pub async fn list_books(&self, id: u64) -> ApiResponse {
        let result = self.http.get(self.url("/books")).send().await;
        match result {
            Ok(resp) if resp.status().is_success() => {
                match resp.json::<BooksEnvelope>().await {
                    Ok(envelope) => ApiResponse::Books {
                        id,
                        books: envelope.books,
                    },
                    Err(e) => decode_failure(id, e),
                }
            }
            Ok(resp) => status_failure(id, resp).await,
            Err(e) => transport_failure(id, e),
        }
    }

    /// `GET /books/:id`
    pub async fn fetch_book(&self, id: u64, book_id: i64) -> ApiResponse {
        let url = self.url(&format!("/books/{}", book_id));
        let result = self.http.get(url).send().await;
        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<BookEnvelope>().await {
                Ok(envelope) => ApiResponse::BookDetail {
                    id,
                    book: envelope.book,
                },
                Err(e) => decode_failure(id, e),
            },
            Ok(resp) => status_failure(id, resp).await,
            Err(e) => transport_failure(id, e),
        }
    }

    /// `POST /users/login`. The API signals rejected credentials with a
    /// `message` body instead of a token, regardless of the status code.
    pub async fn login(&self, id: u64, credentials: &Credentials) -> ApiResponse {
        self.authenticate(
            id,
            self.url("/users/login"),
            credentials,
            "Incorrect username or password, please try again.",
        )
        .await
    }

    /// `POST /users/register`
    pub async fn register(&self, id: u64, form: &Registration) -> ApiResponse {
        self.authenticate(id, self.url("/users/register"), form, "Registration failed")
            .await
    }

    async fn authenticate<B: serde::Serialize>(
        &self,
        id: u64,
        url: String,
        body: &B,
        rejection: &str,
    ) -> ApiResponse {
        let result = self.http.post(url).json(body).send().await;
        match result {
            Ok(resp) => match resp.json::<AuthReply>().await {
                Ok(AuthReply {
                    token: Some(token), ..
                }) => ApiResponse::Authenticated { id, token },
                Ok(AuthReply { message, .. }) => ApiResponse::AuthRejected {
                    id,
                    message: message.unwrap_or_else(|| rejection.to_string()),
                },
                Err(e) => decode_failure(id, e),
            },
            Err(e) => transport_failure(id, e),
        }
    }

    /// `GET /users/me` with bearer token
    pub async fn fetch_user(&self, id: u64, token: &str) -> ApiResponse {
        let result = self
            .http
            .get(self.url("/users/me"))
            .bearer_auth(token)
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<User>().await {
                Ok(user) => ApiResponse::UserProfile { id, user },
                Err(e) => decode_failure(id, e),
            },
            Ok(resp) => status_failure(id, resp).await,
            Err(e) => transport_failure(id, e),
        }
    }

    /// `GET /reservations` with bearer token
    pub async fn fetch_reservations(&self, id: u64, token: &str) -> ApiResponse {
        let result = self
            .http
            .get(self.url("/reservations"))
            .bearer_auth(token)
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => {
                match resp.json::<ReservationsEnvelope>().await {
                    Ok(envelope) => ApiResponse::Reservations {
                        id,
                        reservations: envelope.reservation,
                    },
                    Err(e) => decode_failure(id, e),
                }
            }
            Ok(resp) => status_failure(id, resp).await,
            Err(e) => transport_failure(id, e),
        }
    }

    /// `PATCH /books/:id` with bearer token - flips the book's
    /// availability, which is how the API models a checkout.
    pub async fn checkout(&self, id: u64, token: &str, book_id: i64) -> ApiResponse {
        let url = self.url(&format!("/books/{}", book_id));
        let result = self.http.patch(url).bearer_auth(token).send().await;
        match result {
            Ok(resp) if resp.status().is_success() => ApiResponse::CheckedOut { id, book_id },
            Ok(resp) => status_failure(id, resp).await,
            Err(e) => transport_failure(id, e),
        }
    }

    /// `DELETE /reservations/:id` with bearer token
    pub async fn return_book(&self, id: u64, token: &str, reservation_id: i64) -> ApiResponse {
        let url = self.url(&format!("/reservations/{}", reservation_id));
        let result = self.http.delete(url).bearer_auth(token).send().await;
        match result {
            Ok(resp) if resp.status().is_success() => ApiResponse::Returned { id },
            Ok(resp) => status_failure(id, resp).await,
            Err(e) => transport_failure(id, e),
        }
    }
}

/// Map a non-2xx status to a response, preferring the API's own message
async fn status_failure(id: u64, resp: reqwest::Response) -> ApiResponse {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return ApiResponse::Unauthorized { id };
    }
    let message = resp
        .json::<ApiError>()
        .await
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
    ApiResponse::Failed { id, message }
}

/// Map a transport error to a user-readable message
fn transport_failure(id: u64, e: reqwest::Error) -> ApiResponse {
    let message = if e.is_timeout() {
        "Request timed out (30s)".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    };
    ApiResponse::Failed { id, message }
}

fn decode_failure(id: u64, e: reqwest::Error) -> ApiResponse {
    ApiResponse::Failed {
        id,
        message: format!("Error reading body: {}", e),
    }
}

/// Create an HTTP client with default configuration
fn create_client() -> reqwest::Client {
    use std::time::Duration;

    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
