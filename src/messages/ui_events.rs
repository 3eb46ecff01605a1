//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens, mirroring the catalog's views
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Screen {
    #[default]
    Books,
    BookDetail,
    Login,
    Register,
    Account,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Screen navigation
    SwitchScreen(Screen),
    BackToBooks,

    // List navigation
    SelectNext,
    SelectPrev,
    OpenBook,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    NextField,

    // Catalog actions
    Checkout,
    ReturnBook,

    // Auth actions
    SubmitLogin,
    SubmitRegister,
    Logout,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Active login form field
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    pub fn next(&self) -> LoginField {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        }
    }
}

/// Active registration form field
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum RegisterField {
    #[default]
    FirstName,
    LastName,
    Email,
    Password,
}

impl RegisterField {
    pub fn next(&self) -> RegisterField {
        match self {
            RegisterField::FirstName => RegisterField::LastName,
            RegisterField::LastName => RegisterField::Email,
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::FirstName,
        }
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    input_mode: InputMode,
    show_help: bool,
    logged_in: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    // Screen switching mirrors the original navigation bar: Books is
    // always reachable; Account replaces Login/Register once logged in.
    if input_mode == InputMode::Normal {
        match key.code {
            KeyCode::Char('1') => return Some(UiEvent::SwitchScreen(Screen::Books)),
            KeyCode::Char('2') => {
                return Some(UiEvent::SwitchScreen(if logged_in {
                    Screen::Account
                } else {
                    Screen::Login
                }));
            }
            KeyCode::Char('3') if !logged_in => {
                return Some(UiEvent::SwitchScreen(Screen::Register));
            }
            KeyCode::Char('l') if logged_in => return Some(UiEvent::Logout),
            KeyCode::Char('q') => return Some(UiEvent::Quit),
            KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
            _ => {}
        }
    }

    match screen {
        Screen::Books => handle_books_keys(key, input_mode),
        Screen::BookDetail => handle_detail_keys(key),
        Screen::Login => handle_form_keys(key, input_mode, UiEvent::SubmitLogin),
        Screen::Register => handle_form_keys(key, input_mode, UiEvent::SubmitRegister),
        Screen::Account => handle_account_keys(key),
    }
}

/// Keys for the book list screen (search + selection)
fn handle_books_keys(key: KeyEvent, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('/') | KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Up => Some(UiEvent::SelectPrev),
            KeyCode::Down => Some(UiEvent::SelectNext),
            KeyCode::Enter => Some(UiEvent::OpenBook),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

/// Keys for the book detail screen
fn handle_detail_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('b') => Some(UiEvent::BackToBooks),
        KeyCode::Char('c') => Some(UiEvent::Checkout),
        _ => None,
    }
}

/// Keys for the login and register form screens
fn handle_form_keys(key: KeyEvent, input_mode: InputMode, submit: UiEvent) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::Enter | KeyCode::Char('s') => Some(submit),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::Enter => Some(submit),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

/// Keys for the account screen (checked-out books)
fn handle_account_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Up => Some(UiEvent::SelectPrev),
        KeyCode::Down => Some(UiEvent::SelectNext),
        KeyCode::Char('r') | KeyCode::Enter => Some(UiEvent::ReturnBook),
        KeyCode::Esc | KeyCode::Char('b') => Some(UiEvent::BackToBooks),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventKind, KeyEventState};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_slash_starts_search_on_books() {
        let event = key_to_ui_event(
            press(KeyCode::Char('/')),
            Screen::Books,
            InputMode::Normal,
            false,
            false,
        );
        assert!(matches!(event, Some(UiEvent::StartEditing)));
    }

    #[test]
    fn test_typing_while_searching_becomes_char_input() {
        let event = key_to_ui_event(
            press(KeyCode::Char('q')),
            Screen::Books,
            InputMode::Editing,
            false,
            false,
        );
        assert!(matches!(event, Some(UiEvent::CharInput('q'))));
    }

    #[test]
    fn test_nav_key_two_depends_on_auth() {
        let anonymous = key_to_ui_event(
            press(KeyCode::Char('2')),
            Screen::Books,
            InputMode::Normal,
            false,
            false,
        );
        assert!(matches!(
            anonymous,
            Some(UiEvent::SwitchScreen(Screen::Login))
        ));

        let logged_in = key_to_ui_event(
            press(KeyCode::Char('2')),
            Screen::Books,
            InputMode::Normal,
            false,
            true,
        );
        assert!(matches!(
            logged_in,
            Some(UiEvent::SwitchScreen(Screen::Account))
        ));
    }

    #[test]
    fn test_register_hidden_when_logged_in() {
        let event = key_to_ui_event(
            press(KeyCode::Char('3')),
            Screen::Books,
            InputMode::Normal,
            false,
            true,
        );
        assert!(event.is_none());
    }

    #[test]
    fn test_checkout_key_on_detail() {
        let event = key_to_ui_event(
            press(KeyCode::Char('c')),
            Screen::BookDetail,
            InputMode::Normal,
            false,
            true,
        );
        assert!(matches!(event, Some(UiEvent::Checkout)));
    }

    #[test]
    fn test_enter_submits_login_while_editing() {
        let event = key_to_ui_event(
            press(KeyCode::Enter),
            Screen::Login,
            InputMode::Editing,
            false,
            false,
        );
        assert!(matches!(event, Some(UiEvent::SubmitLogin)));
    }

    #[test]
    fn test_help_popup_swallows_keys() {
        let event = key_to_ui_event(
            press(KeyCode::Char('s')),
            Screen::Books,
            InputMode::Normal,
            true,
            false,
        );
        assert!(matches!(event, Some(UiEvent::CloseHelp)));
    }
}
