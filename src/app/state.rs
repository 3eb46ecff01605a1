//! App state - pure data structure with no I/O logic

use crate::messages::ui_events::{InputMode, LoginField, RegisterField, Screen};
use crate::messages::RenderState;
use crate::models::{Book, Reservation, User};
use crate::session::Session;

/// Login form contents
#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form contents
#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

/// In-flight request ids, one slot per concern. A response whose id does
/// not match its slot is stale and gets dropped instead of overwriting
/// fresher state.
#[derive(Clone, Debug, Default)]
pub struct Pending {
    pub books: Option<u64>,
    pub detail: Option<u64>,
    pub auth: Option<u64>,
    pub user: Option<u64>,
    pub reservations: Option<u64>,
    pub checkout: Option<u64>,
    pub return_book: Option<u64>,
}

impl Pending {
    pub fn any(&self) -> bool {
        self.books.is_some()
            || self.detail.is_some()
            || self.auth.is_some()
            || self.user.is_some()
            || self.reservations.is_some()
            || self.checkout.is_some()
            || self.return_book.is_some()
    }
}

/// Main application state - pure data, no I/O beyond the session file
pub struct AppState {
    // Navigation
    pub screen: Screen,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Auth
    pub token: Option<String>,
    pub user: Option<User>,

    // Books screen
    pub books: Vec<Book>,
    pub search: String,
    pub selected_book: usize,
    pub books_error: String,

    // Book detail screen
    pub detail: Option<Book>,
    pub detail_error: String,

    // Login screen
    pub login: LoginForm,
    pub login_field: LoginField,
    pub login_error: String,

    // Register screen
    pub register: RegisterForm,
    pub register_field: RegisterField,
    pub register_error: String,

    // Account screen
    pub reservations: Vec<Reservation>,
    pub selected_reservation: usize,
    pub account_error: String,

    // Chrome
    pub status_line: String,
    pub show_help: bool,

    // Persisted session
    pub session: Session,

    // Request tracking
    pub next_request_id: u64,
    pub pending: Pending,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_session(Session::new())
    }

    pub fn with_session(session: Session) -> Self {
        let token = session.load_token();
        AppState {
            screen: Screen::Books,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            token,
            user: None,
            books: Vec::new(),
            search: String::new(),
            selected_book: 0,
            books_error: String::new(),
            detail: None,
            detail_error: String::new(),
            login: LoginForm::default(),
            login_field: LoginField::Email,
            login_error: String::new(),
            register: RegisterForm::default(),
            register_field: RegisterField::FirstName,
            register_error: String::new(),
            reservations: Vec::new(),
            selected_reservation: 0,
            account_error: String::new(),
            status_line: String::new(),
            show_help: false,
            session,
            next_request_id: 1,
            pending: Pending::default(),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Books matching the current search query
    pub fn filtered_books(&self) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.matches(&self.search))
            .cloned()
            .collect()
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.screen {
            Screen::Books => &self.search,
            Screen::Login => match self.login_field {
                LoginField::Email => &self.login.email,
                LoginField::Password => &self.login.password,
            },
            Screen::Register => match self.register_field {
                RegisterField::FirstName => &self.register.firstname,
                RegisterField::LastName => &self.register.lastname,
                RegisterField::Email => &self.register.email,
                RegisterField::Password => &self.register.password,
            },
            _ => "",
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> &mut String {
        match self.screen {
            Screen::Login => match self.login_field {
                LoginField::Email => &mut self.login.email,
                LoginField::Password => &mut self.login.password,
            },
            Screen::Register => match self.register_field {
                RegisterField::FirstName => &mut self.register.firstname,
                RegisterField::LastName => &mut self.register.lastname,
                RegisterField::Email => &mut self.register.email,
                RegisterField::Password => &mut self.register.password,
            },
            // Books search is also the fallback for screens with no input
            _ => &mut self.search,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            logged_in: self.logged_in(),
            user: self.user.clone(),
            books: self.filtered_books(),
            search: self.search.clone(),
            selected_book: self.selected_book,
            books_error: self.books_error.clone(),
            detail: self.detail.clone(),
            detail_error: self.detail_error.clone(),
            login_email: self.login.email.clone(),
            login_password: self.login.password.clone(),
            login_field: self.login_field,
            login_error: self.login_error.clone(),
            reg_firstname: self.register.firstname.clone(),
            reg_lastname: self.register.lastname.clone(),
            reg_email: self.register.email.clone(),
            reg_password: self.register.password.clone(),
            register_field: self.register_field,
            register_error: self.register_error.clone(),
            reservations: self.reservations.clone(),
            selected_reservation: self.selected_reservation,
            account_error: self.account_error.clone(),
            is_loading: self.pending.any(),
            status_line: self.status_line.clone(),
            show_help: self.show_help,
        }
    }
}
