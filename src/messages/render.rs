//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{InputMode, LoginField, RegisterField, Screen};
use crate::models::{Book, Reservation, User};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Navigation
    pub screen: Screen,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Auth
    pub logged_in: bool,
    pub user: Option<User>,

    // Books screen (list already filtered by the search query)
    pub books: Vec<Book>,
    pub search: String,
    pub selected_book: usize,
    pub books_error: String,

    // Book detail screen
    pub detail: Option<Book>,
    pub detail_error: String,

    // Login screen
    pub login_email: String,
    pub login_password: String,
    pub login_field: LoginField,
    pub login_error: String,

    // Register screen
    pub reg_firstname: String,
    pub reg_lastname: String,
    pub reg_email: String,
    pub reg_password: String,
    pub register_field: RegisterField,
    pub register_error: String,

    // Account screen
    pub reservations: Vec<Reservation>,
    pub selected_reservation: usize,
    pub account_error: String,

    // Chrome
    pub is_loading: bool,
    pub status_line: String,
    pub show_help: bool,
}
