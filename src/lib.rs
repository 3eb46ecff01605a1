//! # Book Buddy TUI
//!
//! A terminal-based client for a remote library catalog.
//!
//! ## Features
//! - Browse the catalog with type-to-search filtering
//! - Book detail view with checkout
//! - Login / registration with a persisted session token
//! - Account view listing checked-out books, with returns
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod constants;
pub mod messages;
pub mod models;
pub mod network;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use messages::{ApiCommand, ApiResponse, RenderState, UiEvent};
pub use models::{Book, Reservation, User};
pub use network::{ApiClient, NetworkActor};
pub use session::Session;
