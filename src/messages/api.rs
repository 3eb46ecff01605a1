//! API messages - communication between App and Network layers

use crate::models::{Book, Credentials, Registration, Reservation, User};

/// Commands sent from App layer to Network layer. Every command carries a
/// request id so the App layer can drop responses it no longer waits for.
#[derive(Debug, Clone)]
pub enum ApiCommand {
    /// Fetch the full book list
    FetchBooks { id: u64 },
    /// Fetch a single book's details
    FetchBook { id: u64, book_id: i64 },
    /// Log in with email and password
    Login { id: u64, credentials: Credentials },
    /// Register a new account
    Register { id: u64, form: Registration },
    /// Fetch the authenticated user's profile
    FetchUser { id: u64, token: String },
    /// Fetch the authenticated user's checked-out books
    FetchReservations { id: u64, token: String },
    /// Check out a book
    CheckoutBook {
        id: u64,
        token: String,
        book_id: i64,
    },
    /// Return a checked-out book
    ReturnBook {
        id: u64,
        token: String,
        reservation_id: i64,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum ApiResponse {
    Books { id: u64, books: Vec<Book> },
    BookDetail { id: u64, book: Book },
    /// Login or registration succeeded
    Authenticated { id: u64, token: String },
    /// Login or registration was rejected by the API
    AuthRejected { id: u64, message: String },
    UserProfile { id: u64, user: User },
    Reservations {
        id: u64,
        reservations: Vec<Reservation>,
    },
    CheckedOut { id: u64, book_id: i64 },
    Returned { id: u64 },
    /// The API rejected the bearer token (HTTP 401/403)
    Unauthorized { id: u64 },
    /// Transport or decoding failure
    Failed { id: u64, message: String },
}

impl ApiResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            ApiResponse::Books { id, .. } => *id,
            ApiResponse::BookDetail { id, .. } => *id,
            ApiResponse::Authenticated { id, .. } => *id,
            ApiResponse::AuthRejected { id, .. } => *id,
            ApiResponse::UserProfile { id, .. } => *id,
            ApiResponse::Reservations { id, .. } => *id,
            ApiResponse::CheckedOut { id, .. } => *id,
            ApiResponse::Returned { id } => *id,
            ApiResponse::Unauthorized { id } => *id,
            ApiResponse::Failed { id, .. } => *id,
        }
    }
}
