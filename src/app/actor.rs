//! App actor - message loop processing UI events and API responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{ApiCommand, ApiResponse, RenderState, UiEvent};

/// App actor that processes UI events and API responses
pub struct AppActor {
    state: AppState,
    api_tx: mpsc::UnboundedSender<ApiCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        api_tx: mpsc::UnboundedSender<ApiCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(),
            api_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut api_rx: mpsc::UnboundedReceiver<ApiResponse>,
    ) {
        // Kick off the initial fetches (book list, and the user profile
        // when a persisted token exists), then render.
        for cmd in self.state.startup() {
            let _ = self.api_tx.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.api_tx.send(ApiCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = api_rx.recv() => {
                    for cmd in self.state.handle_response(response) {
                        let _ = self.api_tx.send(cmd);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let command = match event {
            // Screen navigation
            UiEvent::SwitchScreen(screen) => self.state.switch_screen(screen),
            UiEvent::BackToBooks => {
                self.state.back_to_books();
                None
            }

            // List navigation
            UiEvent::SelectNext => {
                self.state.select_next();
                None
            }
            UiEvent::SelectPrev => {
                self.state.select_prev();
                None
            }
            UiEvent::OpenBook => self.state.open_book(),

            // Input editing
            UiEvent::StartEditing => {
                self.state.start_editing();
                None
            }
            UiEvent::StopEditing => {
                self.state.stop_editing();
                None
            }
            UiEvent::CharInput(c) => {
                self.state.enter_char(c);
                None
            }
            UiEvent::Backspace => {
                self.state.delete_char();
                None
            }
            UiEvent::CursorLeft => {
                self.state.move_cursor_left();
                None
            }
            UiEvent::CursorRight => {
                self.state.move_cursor_right();
                None
            }
            UiEvent::NextField => {
                self.state.next_field();
                None
            }

            // Catalog actions
            UiEvent::Checkout => self.state.checkout(),
            UiEvent::ReturnBook => self.state.return_book(),

            // Auth actions
            UiEvent::SubmitLogin => self.state.submit_login(),
            UiEvent::SubmitRegister => self.state.submit_register(),
            UiEvent::Logout => {
                self.state.logout();
                None
            }

            // Popups
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                None
            }
            UiEvent::CloseHelp => {
                self.state.close_help();
                None
            }

            // System
            UiEvent::Quit => return true,
        };

        if let Some(cmd) = command {
            let _ = self.api_tx.send(cmd);
        }
        false
    }
}
