//! Book Buddy TUI - Actor-based library catalog client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async API execution

mod app;
mod constants;
mod messages;
mod models;
mod network;
mod session;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use app::AppActor;
use messages::ui_events::{key_to_ui_event, InputMode, LoginField, RegisterField, Screen};
use messages::{ApiCommand, ApiResponse, RenderState, UiEvent};
use network::{ApiClient, NetworkActor};
use ui::{availability_span, mask, render_input};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "bookbuddy.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let base_url = std::env::var(constants::API_URL_ENV)
        .unwrap_or_else(|_| constants::DEFAULT_API_URL.to_string());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (api_cmd_tx, api_cmd_rx) = mpsc::unbounded_channel::<ApiCommand>();
    let (api_resp_tx, api_resp_rx) = mpsc::unbounded_channel::<ApiResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(ApiClient::new(base_url), api_resp_tx);
    tokio::spawn(network_actor.run(api_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(api_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, api_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.logged_in,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Navigation bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_nav_bar(f, state, main_chunks[0]);

    match state.screen {
        Screen::Books => draw_books(f, state, main_chunks[1]),
        Screen::BookDetail => draw_book_detail(f, state, main_chunks[1]),
        Screen::Login => draw_login(f, state, main_chunks[1]),
        Screen::Register => draw_register(f, state, main_chunks[1]),
        Screen::Account => draw_account(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

/// Navigation bar, mirroring the original nav: Books is always there;
/// Login/Register swap for Account/Logout once a token is present.
fn draw_nav_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let tab = |label: &str, active: bool| {
        if active {
            Span::styled(
                format!(" {} ", label),
                Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray))
        }
    };

    let on_books = matches!(state.screen, Screen::Books | Screen::BookDetail);
    let mut spans = vec![tab("1:Books", on_books), Span::raw(" ")];

    if state.logged_in {
        spans.push(tab("2:Account", state.screen == Screen::Account));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(" l:Logout ", Style::default().fg(Color::Gray)));
        if let Some(user) = &state.user {
            spans.push(Span::styled(
                format!("  Welcome, {}", user.display_name()),
                Style::default().fg(Color::Green),
            ));
        }
    } else {
        spans.push(tab("2:Login", state.screen == Screen::Login));
        spans.push(Span::raw(" "));
        spans.push(tab("3:Register", state.screen == Screen::Register));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_books(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Book list
        ])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let search = render_input(&state.search, " Search (/:edit) ", true, editing);
    f.render_widget(search, chunks[0]);

    if editing {
        let max_x = chunks[0].x + chunks[0].width.saturating_sub(2);
        let cursor_x = (chunks[0].x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Books ({}) - Enter:details ", state.books.len()));

    if !state.books_error.is_empty() {
        let error = Paragraph::new(state.books_error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(error, chunks[1]);
        return;
    }

    if state.books.is_empty() {
        let empty = if state.search.is_empty() {
            "Loading books..."
        } else {
            "No books match your search"
        };
        let paragraph = Paragraph::new(empty)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = state
        .books
        .iter()
        .map(|book| {
            let line = Line::from(vec![
                Span::styled(book.title.clone(), Style::default().bold()),
                Span::raw(" by "),
                Span::raw(book.author.clone()),
                Span::raw("  "),
                availability_span(book.available),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_book));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_book_detail(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Book Details (b:back) ");

    let Some(book) = &state.detail else {
        let text = if state.detail_error.is_empty() {
            Line::from(Span::styled(
                "Loading book details...",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(Span::styled(
                state.detail_error.clone(),
                Style::default().fg(Color::Red),
            ))
        };
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            book.title.clone(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            format!("by {}", book.author),
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
        Line::from(vec![Span::raw("Status: "), availability_span(book.available)]),
        Line::default(),
    ];

    for text_line in book.description.lines() {
        lines.push(Line::from(text_line.to_string()));
    }

    if !state.detail_error.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            state.detail_error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    if book.available {
        lines.push(Line::default());
        let hint = if state.logged_in {
            "Press 'c' to check this book out"
        } else {
            "Press 'c' to check out (you will be asked to log in)"
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::Green),
        )));
    }

    let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(detail, area);
}

fn draw_login(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(2), // Error
            Constraint::Min(0),
        ])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let email_focused = state.login_field == LoginField::Email;

    let email = render_input(&state.login_email, " Email ", email_focused, editing);
    f.render_widget(email, chunks[0]);

    let password = mask(&state.login_password);
    let password = render_input(&password, " Password ", !email_focused, editing);
    f.render_widget(password, chunks[1]);

    set_form_cursor(
        f,
        state,
        if email_focused { chunks[0] } else { chunks[1] },
    );

    if !state.login_error.is_empty() {
        let error = Paragraph::new(state.login_error.as_str())
            .style(Style::default().fg(Color::Red));
        f.render_widget(error, chunks[2]);
    }
}

fn draw_register(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // First name
            Constraint::Length(3), // Last name
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(2), // Error
            Constraint::Min(0),
        ])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let fields = [
        (RegisterField::FirstName, " First Name ", state.reg_firstname.clone()),
        (RegisterField::LastName, " Last Name ", state.reg_lastname.clone()),
        (RegisterField::Email, " Email ", state.reg_email.clone()),
        (RegisterField::Password, " Password ", mask(&state.reg_password)),
    ];

    for (i, (field, title, content)) in fields.iter().enumerate() {
        let focused = state.register_field == *field;
        f.render_widget(render_input(content, title, focused, editing), chunks[i]);
        if focused {
            set_form_cursor(f, state, chunks[i]);
        }
    }

    if !state.register_error.is_empty() {
        let error = Paragraph::new(state.register_error.as_str())
            .style(Style::default().fg(Color::Red));
        f.render_widget(error, chunks[4]);
    }
}

fn draw_account(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Welcome header
            Constraint::Min(5),    // Checked out books
        ])
        .split(area);

    let welcome = match &state.user {
        Some(user) => format!("My Account - Welcome, {}", user.display_name()),
        None => String::from("My Account"),
    };
    let header = Paragraph::new(welcome).style(Style::default().fg(Color::Cyan).bold());
    f.render_widget(header, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Checked Out Books (r:return) ");

    if !state.account_error.is_empty() {
        let error = Paragraph::new(state.account_error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(block);
        f.render_widget(error, chunks[1]);
        return;
    }

    if state.reservations.is_empty() {
        let empty = Paragraph::new("No books checked out")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = state
        .reservations
        .iter()
        .map(|r| {
            let line = Line::from(vec![
                Span::styled(r.title.clone(), Style::default().bold()),
                Span::raw(" by "),
                Span::raw(r.author.clone()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_reservation));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

/// Place the cursor inside the focused form field while editing
fn set_form_cursor(f: &mut Frame, state: &RenderState, field_area: Rect) {
    if state.input_mode == InputMode::Editing {
        let max_x = field_area.x + field_area.width.saturating_sub(2);
        let cursor_x = (field_area.x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, field_area.y + 1));
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.is_loading {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | Tab:next field | Enter:confirm "
    } else {
        match state.screen {
            Screen::Books => " /:search | ↑/↓:select | Enter:details | ?:help | q:quit ",
            Screen::BookDetail => " c:check out | b:back | ?:help | q:quit ",
            Screen::Login | Screen::Register => {
                " e:edit | Tab:field | Enter:submit | ?:help | q:quit "
            }
            Screen::Account => " ↑/↓:select | r:return book | b:back | ?:help | q:quit ",
        }
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(Color::DarkGray))];
    if !state.status_line.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", state.status_line),
            Style::default().fg(Color::Yellow),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 BOOK BUDDY TUI - Keyboard Shortcuts

 NAVIGATION
   1                  Books
   2                  Account (or Login when logged out)
   3                  Register (when logged out)
   ↑ / ↓              Move selection

 BOOKS
   /                  Search by title or author
   Enter              Open book details
   c                  Check out (details screen)
   b / Esc            Back to the list

 ACCOUNT
   r / Enter          Return the selected book
   l                  Logout

 FORMS
   e                  Edit the focused field
   Tab                Next field
   Enter              Submit

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
