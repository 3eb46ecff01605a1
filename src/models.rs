use serde::{Deserialize, Serialize};

/// A book in the library catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Cover image URL, field name as the API spells it
    #[serde(default)]
    pub coverimage: String,
    pub available: bool,
}

impl Book {
    /// Case-insensitive substring match over title or author.
    /// An empty query matches every book.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.author.to_lowercase().contains(&query)
    }
}

/// The authenticated user, as returned by `/users/me`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// A checked-out book. The API flattens the book fields into the
/// reservation record; `id` is the reservation id, not the book id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub coverimage: String,
}

/// Login request body
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration request body
#[derive(Clone, Debug, Serialize)]
pub struct Registration {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

// ============================================================================
// Wire envelopes - response shapes exactly as the API sends them
// ============================================================================

/// `GET /books` response: `{"books": [...]}`
#[derive(Debug, Deserialize)]
pub struct BooksEnvelope {
    #[serde(default)]
    pub books: Vec<Book>,
}

/// `GET /books/:id` response: `{"book": {...}}`
#[derive(Debug, Deserialize)]
pub struct BookEnvelope {
    pub book: Book,
}

/// `GET /reservations` response: `{"reservation": [...]}`.
/// The key is singular and may be absent when nothing is checked out.
#[derive(Debug, Deserialize)]
pub struct ReservationsEnvelope {
    #[serde(default)]
    pub reservation: Vec<Reservation>,
}

/// Login/register reply. A token means success; the API reports auth
/// failures with HTTP 200 and a `message` instead of a token.
#[derive(Debug, Deserialize)]
pub struct AuthReply {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic error body many endpoints return on non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str) -> Book {
        Book {
            id: 1,
            title: title.to_string(),
            author: author.to_string(),
            description: String::new(),
            coverimage: String::new(),
            available: true,
        }
    }

    #[test]
    fn test_search_matches_title_case_insensitive() {
        let b = book("The Great Gatsby", "F. Scott Fitzgerald");
        assert!(b.matches("gatsby"));
        assert!(b.matches("GREAT"));
        assert!(!b.matches("mockingbird"));
    }

    #[test]
    fn test_search_matches_author() {
        let b = book("The Great Gatsby", "F. Scott Fitzgerald");
        assert!(b.matches("fitzgerald"));
        assert!(b.matches("scott"));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let b = book("Dune", "Frank Herbert");
        assert!(b.matches(""));
    }

    #[test]
    fn test_books_envelope_deserializes() {
        let json = r#"{"books":[{"id":2,"title":"Dune","author":"Frank Herbert","description":"Sand.","coverimage":"https://example.com/dune.jpg","available":false}]}"#;
        let envelope: BooksEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.books.len(), 1);
        assert_eq!(envelope.books[0].title, "Dune");
        assert!(!envelope.books[0].available);
    }

    #[test]
    fn test_reservations_envelope_missing_key_is_empty() {
        let envelope: ReservationsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.reservation.is_empty());
    }

    #[test]
    fn test_auth_reply_with_message_only() {
        let reply: AuthReply =
            serde_json::from_str(r#"{"message":"Incorrect password"}"#).unwrap();
        assert!(reply.token.is_none());
        assert_eq!(reply.message.as_deref(), Some("Incorrect password"));
    }

    #[test]
    fn test_auth_reply_with_token() {
        let reply: AuthReply = serde_json::from_str(r#"{"token":"abc123"}"#).unwrap();
        assert_eq!(reply.token.as_deref(), Some("abc123"));
    }
}
