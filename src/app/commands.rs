//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::messages::ui_events::{InputMode, LoginField, RegisterField, Screen};
use crate::messages::{ApiCommand, ApiResponse};
use crate::models::{Credentials, Registration};

impl AppState {
    // ========================
    // Startup
    // ========================

    /// Commands to fire when the app starts: always fetch the catalog,
    /// and resolve the persisted token into a user profile if present.
    pub fn startup(&mut self) -> Vec<ApiCommand> {
        let mut commands = vec![self.fetch_books()];
        if let Some(cmd) = self.fetch_user() {
            commands.push(cmd);
        }
        commands
    }

    fn fetch_books(&mut self) -> ApiCommand {
        let id = self.next_id();
        self.pending.books = Some(id);
        self.books_error.clear();
        ApiCommand::FetchBooks { id }
    }

    fn fetch_user(&mut self) -> Option<ApiCommand> {
        let token = self.token.clone()?;
        let id = self.next_id();
        self.pending.user = Some(id);
        Some(ApiCommand::FetchUser { id, token })
    }

    fn fetch_reservations(&mut self) -> Option<ApiCommand> {
        let token = self.token.clone()?;
        let id = self.next_id();
        self.pending.reservations = Some(id);
        self.account_error.clear();
        Some(ApiCommand::FetchReservations { id, token })
    }

    // ========================
    // Navigation
    // ========================

    /// Switch screens. Entering Account without a token routes to Login;
    /// entering it with one kicks off a reservations fetch.
    pub fn switch_screen(&mut self, screen: Screen) -> Option<ApiCommand> {
        self.input_mode = InputMode::Normal;
        self.status_line.clear();

        match screen {
            Screen::Account => {
                if self.token.is_none() {
                    self.screen = Screen::Login;
                    return None;
                }
                self.screen = Screen::Account;
                self.selected_reservation = 0;
                self.fetch_reservations()
            }
            Screen::Login => {
                self.screen = Screen::Login;
                self.login_error.clear();
                self.login_field = LoginField::Email;
                None
            }
            Screen::Register => {
                self.screen = Screen::Register;
                self.register_error.clear();
                self.register_field = RegisterField::FirstName;
                None
            }
            other => {
                self.screen = other;
                None
            }
        }
    }

    pub fn back_to_books(&mut self) {
        self.screen = Screen::Books;
        self.input_mode = InputMode::Normal;
        self.detail = None;
        self.detail_error.clear();
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let input = self.current_input_mut();
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
        if self.screen == Screen::Books {
            self.clamp_book_selection();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let cursor_pos = self.cursor_position;
            let input = self.current_input_mut();
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
        if self.screen == Screen::Books {
            self.clamp_book_selection();
        }
    }

    pub fn next_field(&mut self) {
        match self.screen {
            Screen::Login => self.login_field = self.login_field.next(),
            Screen::Register => self.register_field = self.register_field.next(),
            _ => return,
        }
        self.cursor_position = self.current_input().len();
    }

    // ========================
    // List navigation
    // ========================

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Books => {
                let len = self.filtered_books().len();
                if len > 0 {
                    self.selected_book = (self.selected_book + 1) % len;
                }
            }
            Screen::Account => {
                if !self.reservations.is_empty() {
                    self.selected_reservation =
                        (self.selected_reservation + 1) % self.reservations.len();
                }
            }
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Books => {
                let len = self.filtered_books().len();
                if len > 0 {
                    self.selected_book = self.selected_book.checked_sub(1).unwrap_or(len - 1);
                }
            }
            Screen::Account => {
                if !self.reservations.is_empty() {
                    self.selected_reservation = self
                        .selected_reservation
                        .checked_sub(1)
                        .unwrap_or(self.reservations.len() - 1);
                }
            }
            _ => {}
        }
    }

    fn clamp_book_selection(&mut self) {
        let len = self.filtered_books().len();
        if len == 0 {
            self.selected_book = 0;
        } else if self.selected_book >= len {
            self.selected_book = len - 1;
        }
    }

    // ========================
    // Book detail
    // ========================

    /// Open the selected book's detail screen and fetch it
    pub fn open_book(&mut self) -> Option<ApiCommand> {
        let book = self.filtered_books().get(self.selected_book).cloned()?;
        self.screen = Screen::BookDetail;
        self.detail = None;
        self.detail_error.clear();
        let id = self.next_id();
        self.pending.detail = Some(id);
        Some(ApiCommand::FetchBook {
            id,
            book_id: book.id,
        })
    }

    /// Check the displayed book out. Anonymous users are routed to Login,
    /// matching the original navigation guard.
    pub fn checkout(&mut self) -> Option<ApiCommand> {
        let book = self.detail.clone()?;

        let Some(token) = self.token.clone() else {
            self.screen = Screen::Login;
            self.login_error.clear();
            return None;
        };

        if !book.available {
            self.status_line = String::from("This book is already checked out");
            return None;
        }
        if self.pending.checkout.is_some() {
            return None;
        }

        let id = self.next_id();
        self.pending.checkout = Some(id);
        self.status_line = String::from("Checking out...");
        Some(ApiCommand::CheckoutBook {
            id,
            token,
            book_id: book.id,
        })
    }

    // ========================
    // Auth
    // ========================

    pub fn submit_login(&mut self) -> Option<ApiCommand> {
        if self.login.email.is_empty() || self.login.password.is_empty() {
            self.login_error = String::from("Email and password are required");
            return None;
        }
        if self.pending.auth.is_some() {
            return None;
        }

        self.input_mode = InputMode::Normal;
        self.login_error.clear();
        let id = self.next_id();
        self.pending.auth = Some(id);
        Some(ApiCommand::Login {
            id,
            credentials: Credentials {
                email: self.login.email.clone(),
                password: self.login.password.clone(),
            },
        })
    }

    pub fn submit_register(&mut self) -> Option<ApiCommand> {
        if self.register.email.is_empty() || self.register.password.is_empty() {
            self.register_error = String::from("Email and password are required");
            return None;
        }
        if self.pending.auth.is_some() {
            return None;
        }

        self.input_mode = InputMode::Normal;
        self.register_error.clear();
        let id = self.next_id();
        self.pending.auth = Some(id);
        Some(ApiCommand::Register {
            id,
            form: Registration {
                firstname: self.register.firstname.clone(),
                lastname: self.register.lastname.clone(),
                email: self.register.email.clone(),
                password: self.register.password.clone(),
            },
        })
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
        self.reservations.clear();
        self.pending.user = None;
        self.pending.reservations = None;
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "Failed to remove session file");
        }
        self.screen = Screen::Books;
        self.status_line = String::from("Logged out");
    }

    // ========================
    // Account
    // ========================

    pub fn return_book(&mut self) -> Option<ApiCommand> {
        let token = self.token.clone()?;
        let reservation_id = self.reservations.get(self.selected_reservation)?.id;
        if self.pending.return_book.is_some() {
            return None;
        }

        let id = self.next_id();
        self.pending.return_book = Some(id);
        self.status_line = String::from("Returning book...");
        Some(ApiCommand::ReturnBook {
            id,
            token,
            reservation_id,
        })
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply an API response. Responses whose id does not match the
    /// pending slot for their concern are stale and dropped. May emit
    /// follow-up commands (profile fetch after login, refreshes after
    /// checkout/return).
    pub fn handle_response(&mut self, response: ApiResponse) -> Vec<ApiCommand> {
        let mut follow_ups = Vec::new();

        match response {
            ApiResponse::Books { id, books } => {
                if self.pending.books.take_if_matches(id) {
                    self.books = books;
                    self.books_error.clear();
                    self.clamp_book_selection();
                }
            }
            ApiResponse::BookDetail { id, book } => {
                if self.pending.detail.take_if_matches(id) {
                    self.detail = Some(book);
                    self.detail_error.clear();
                }
            }
            ApiResponse::Authenticated { id, token } => {
                if self.pending.auth.take_if_matches(id) {
                    if let Err(e) = self.session.save_token(&token) {
                        tracing::warn!(error = %e, "Failed to persist session");
                    }
                    self.token = Some(token);
                    self.login = Default::default();
                    self.register = Default::default();
                    self.screen = Screen::Books;
                    self.status_line = String::from("Logged in");
                    if let Some(cmd) = self.fetch_user() {
                        follow_ups.push(cmd);
                    }
                }
            }
            ApiResponse::AuthRejected { id, message } => {
                if self.pending.auth.take_if_matches(id) {
                    match self.screen {
                        Screen::Register => self.register_error = message,
                        _ => self.login_error = message,
                    }
                }
            }
            ApiResponse::UserProfile { id, user } => {
                if self.pending.user.take_if_matches(id) {
                    self.user = Some(user);
                }
            }
            ApiResponse::Reservations { id, reservations } => {
                if self.pending.reservations.take_if_matches(id) {
                    self.reservations = reservations;
                    self.account_error.clear();
                    if self.selected_reservation >= self.reservations.len() {
                        self.selected_reservation =
                            self.reservations.len().saturating_sub(1);
                    }
                }
            }
            ApiResponse::CheckedOut { id, book_id } => {
                if self.pending.checkout.take_if_matches(id) {
                    self.status_line = String::from("Book checked out");
                    // Refresh the detail, then land on the account screen,
                    // matching the original post-checkout navigation.
                    let detail_id = self.next_id();
                    self.pending.detail = Some(detail_id);
                    follow_ups.push(ApiCommand::FetchBook {
                        id: detail_id,
                        book_id,
                    });
                    self.screen = Screen::Account;
                    self.selected_reservation = 0;
                    if let Some(cmd) = self.fetch_reservations() {
                        follow_ups.push(cmd);
                    }
                }
            }
            ApiResponse::Returned { id } => {
                if self.pending.return_book.take_if_matches(id) {
                    self.status_line = String::from("Book returned");
                    if let Some(cmd) = self.fetch_reservations() {
                        follow_ups.push(cmd);
                    }
                }
            }
            ApiResponse::Unauthorized { id } => self.handle_failure(id, None),
            ApiResponse::Failed { id, message } => self.handle_failure(id, Some(message)),
        }

        follow_ups
    }

    /// Route a failure to the screen that owns the pending request. A
    /// failed profile fetch silently demotes to anonymous, like the
    /// original clearing localStorage when `/users/me` errors.
    fn handle_failure(&mut self, id: u64, message: Option<String>) {
        if self.pending.user.take_if_matches(id) {
            self.token = None;
            self.user = None;
            if let Err(e) = self.session.clear() {
                tracing::warn!(error = %e, "Failed to remove session file");
            }
            return;
        }
        if self.pending.books.take_if_matches(id) {
            self.books_error = message.unwrap_or_else(|| String::from("Error fetching books"));
            return;
        }
        if self.pending.detail.take_if_matches(id) {
            self.detail_error =
                message.unwrap_or_else(|| String::from("Error fetching book details"));
            return;
        }
        if self.pending.auth.take_if_matches(id) {
            let text = message.unwrap_or_else(|| String::from("Error logging in"));
            match self.screen {
                Screen::Register => self.register_error = text,
                _ => self.login_error = text,
            }
            return;
        }
        if self.pending.reservations.take_if_matches(id) {
            self.account_error =
                message.unwrap_or_else(|| String::from("Error fetching checked out books"));
            return;
        }
        if self.pending.checkout.take_if_matches(id) {
            let text = message.unwrap_or_else(|| String::from("Failed to check out book"));
            self.detail_error = text.clone();
            self.status_line = text;
            return;
        }
        if self.pending.return_book.take_if_matches(id) {
            self.account_error = message.unwrap_or_else(|| String::from("Error returning book"));
            self.status_line.clear();
        }
    }
}

/// Take a pending slot only when the response id matches it
trait TakeIfMatches {
    fn take_if_matches(&mut self, id: u64) -> bool;
}

impl TakeIfMatches for Option<u64> {
    fn take_if_matches(&mut self, id: u64) -> bool {
        if *self == Some(id) {
            *self = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, Reservation, User};
    use crate::session::Session;

    fn state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = AppState::with_session(Session::at(dir.path().join("cfg")));
        (app, dir)
    }

    fn book(id: i64, title: &str, author: &str, available: bool) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            description: String::new(),
            coverimage: String::new(),
            available,
        }
    }

    fn user() -> User {
        User {
            id: 7,
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_startup_without_token_only_fetches_books() {
        let (mut app, _dir) = state();
        let commands = app.startup();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], ApiCommand::FetchBooks { .. }));
    }

    #[test]
    fn test_startup_with_token_also_fetches_user() {
        let (mut app, _dir) = state();
        app.token = Some("abc".to_string());
        let commands = app.startup();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[1], ApiCommand::FetchUser { .. }));
    }

    #[test]
    fn test_stale_books_response_is_dropped() {
        let (mut app, _dir) = state();
        let commands = app.startup();
        let ApiCommand::FetchBooks { id } = commands[0] else {
            panic!("expected FetchBooks");
        };

        // A response from an older, superseded request
        app.handle_response(ApiResponse::Books {
            id: id + 100,
            books: vec![book(1, "Stale", "Nobody", true)],
        });
        assert!(app.books.is_empty());

        app.handle_response(ApiResponse::Books {
            id,
            books: vec![book(1, "Dune", "Frank Herbert", true)],
        });
        assert_eq!(app.books.len(), 1);
    }

    #[test]
    fn test_search_filters_books() {
        let (mut app, _dir) = state();
        app.books = vec![
            book(1, "Dune", "Frank Herbert", true),
            book(2, "Emma", "Jane Austen", true),
        ];
        app.search = String::from("aust");
        let filtered = app.filtered_books();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Emma");
    }

    #[test]
    fn test_search_edit_clamps_selection() {
        let (mut app, _dir) = state();
        app.books = vec![
            book(1, "Dune", "Frank Herbert", true),
            book(2, "Emma", "Jane Austen", true),
        ];
        app.selected_book = 1;
        app.start_editing();
        for c in "dune".chars() {
            app.enter_char(c);
        }
        assert_eq!(app.selected_book, 0);
    }

    #[test]
    fn test_login_success_stores_token_and_fetches_user() {
        let (mut app, _dir) = state();
        app.screen = Screen::Login;
        app.login.email = String::from("ada@example.com");
        app.login.password = String::from("hunter2");

        let cmd = app.submit_login().expect("login command");
        let ApiCommand::Login { id, .. } = cmd else {
            panic!("expected Login");
        };

        let follow_ups = app.handle_response(ApiResponse::Authenticated {
            id,
            token: String::from("tok"),
        });
        assert_eq!(app.token.as_deref(), Some("tok"));
        assert_eq!(app.session.load_token().as_deref(), Some("tok"));
        assert_eq!(app.screen, Screen::Books);
        assert!(matches!(follow_ups[0], ApiCommand::FetchUser { .. }));
    }

    #[test]
    fn test_login_rejection_shows_api_message() {
        let (mut app, _dir) = state();
        app.screen = Screen::Login;
        app.login.email = String::from("ada@example.com");
        app.login.password = String::from("wrong");

        let ApiCommand::Login { id, .. } = app.submit_login().unwrap() else {
            panic!("expected Login");
        };
        app.handle_response(ApiResponse::AuthRejected {
            id,
            message: String::from("Incorrect password"),
        });
        assert!(app.token.is_none());
        assert_eq!(app.login_error, "Incorrect password");
    }

    #[test]
    fn test_empty_login_form_is_rejected_locally() {
        let (mut app, _dir) = state();
        app.screen = Screen::Login;
        assert!(app.submit_login().is_none());
        assert!(!app.login_error.is_empty());
    }

    #[test]
    fn test_failed_profile_fetch_demotes_to_anonymous() {
        let (mut app, _dir) = state();
        app.session.save_token("tok").unwrap();
        app.token = Some(String::from("tok"));
        app.user = Some(user());

        let commands = app.startup();
        let ApiCommand::FetchUser { id, .. } = commands[1] else {
            panic!("expected FetchUser");
        };
        app.handle_response(ApiResponse::Unauthorized { id });

        assert!(app.token.is_none());
        assert!(app.user.is_none());
        assert!(app.session.load_token().is_none());
    }

    #[test]
    fn test_account_without_token_routes_to_login() {
        let (mut app, _dir) = state();
        let cmd = app.switch_screen(Screen::Account);
        assert!(cmd.is_none());
        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn test_account_with_token_fetches_reservations() {
        let (mut app, _dir) = state();
        app.token = Some(String::from("tok"));
        let cmd = app.switch_screen(Screen::Account);
        assert!(matches!(cmd, Some(ApiCommand::FetchReservations { .. })));
        assert_eq!(app.screen, Screen::Account);
    }

    #[test]
    fn test_checkout_without_token_routes_to_login() {
        let (mut app, _dir) = state();
        app.screen = Screen::BookDetail;
        app.detail = Some(book(1, "Dune", "Frank Herbert", true));
        assert!(app.checkout().is_none());
        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn test_checkout_unavailable_book_is_blocked() {
        let (mut app, _dir) = state();
        app.token = Some(String::from("tok"));
        app.screen = Screen::BookDetail;
        app.detail = Some(book(1, "Dune", "Frank Herbert", false));
        assert!(app.checkout().is_none());
        assert!(!app.status_line.is_empty());
    }

    #[test]
    fn test_checkout_success_refreshes_and_lands_on_account() {
        let (mut app, _dir) = state();
        app.token = Some(String::from("tok"));
        app.screen = Screen::BookDetail;
        app.detail = Some(book(1, "Dune", "Frank Herbert", true));

        let ApiCommand::CheckoutBook { id, .. } = app.checkout().unwrap() else {
            panic!("expected CheckoutBook");
        };
        let follow_ups = app.handle_response(ApiResponse::CheckedOut { id, book_id: 1 });

        assert_eq!(app.screen, Screen::Account);
        assert!(follow_ups
            .iter()
            .any(|c| matches!(c, ApiCommand::FetchBook { .. })));
        assert!(follow_ups
            .iter()
            .any(|c| matches!(c, ApiCommand::FetchReservations { .. })));
    }

    #[test]
    fn test_return_refreshes_reservations() {
        let (mut app, _dir) = state();
        app.token = Some(String::from("tok"));
        app.screen = Screen::Account;
        app.reservations = vec![Reservation {
            id: 42,
            title: String::from("Dune"),
            author: String::from("Frank Herbert"),
            coverimage: String::new(),
        }];

        let ApiCommand::ReturnBook {
            id, reservation_id, ..
        } = app.return_book().unwrap()
        else {
            panic!("expected ReturnBook");
        };
        assert_eq!(reservation_id, 42);

        let follow_ups = app.handle_response(ApiResponse::Returned { id });
        assert!(matches!(
            follow_ups[0],
            ApiCommand::FetchReservations { .. }
        ));
    }

    #[test]
    fn test_logout_clears_everything() {
        let (mut app, _dir) = state();
        app.session.save_token("tok").unwrap();
        app.token = Some(String::from("tok"));
        app.user = Some(user());
        app.screen = Screen::Account;

        app.logout();

        assert!(app.token.is_none());
        assert!(app.user.is_none());
        assert!(app.session.load_token().is_none());
        assert_eq!(app.screen, Screen::Books);
    }

    #[test]
    fn test_reservation_failure_sets_account_error() {
        let (mut app, _dir) = state();
        app.token = Some(String::from("tok"));
        let Some(ApiCommand::FetchReservations { id, .. }) = app.switch_screen(Screen::Account)
        else {
            panic!("expected FetchReservations");
        };
        app.handle_response(ApiResponse::Failed {
            id,
            message: String::from("Connection failed"),
        });
        assert_eq!(app.account_error, "Connection failed");
        // Reservations failures do not demote the session
        assert!(app.token.is_some());
    }
}
