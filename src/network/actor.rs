//! Network actor - runs API calls in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{ApiCommand, ApiResponse};
use crate::network::client::ApiClient;

/// Network actor that processes API commands concurrently. Requests are
/// independent and unordered; the App layer matches replies by id.
pub struct NetworkActor {
    client: ApiClient,
    response_tx: mpsc::UnboundedSender<ApiResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: ApiClient, response_tx: mpsc::UnboundedSender<ApiResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<ApiCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ApiCommand::Shutdown) | None => break,
                        Some(cmd) => self.dispatch(cmd),
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }

    fn dispatch(&mut self, cmd: ApiCommand) {
        let client = self.client.clone();
        let response_tx = self.response_tx.clone();

        self.active_requests.spawn(async move {
            let response = match cmd {
                ApiCommand::FetchBooks { id } => {
                    tracing::info!(id, "Fetching book list");
                    client.list_books(id).await
                }
                ApiCommand::FetchBook { id, book_id } => {
                    tracing::info!(id, book_id, "Fetching book detail");
                    client.fetch_book(id, book_id).await
                }
                ApiCommand::Login { id, credentials } => {
                    tracing::info!(id, email = %credentials.email, "Logging in");
                    client.login(id, &credentials).await
                }
                ApiCommand::Register { id, form } => {
                    tracing::info!(id, email = %form.email, "Registering");
                    client.register(id, &form).await
                }
                ApiCommand::FetchUser { id, token } => {
                    tracing::info!(id, "Fetching user profile");
                    client.fetch_user(id, &token).await
                }
                ApiCommand::FetchReservations { id, token } => {
                    tracing::info!(id, "Fetching reservations");
                    client.fetch_reservations(id, &token).await
                }
                ApiCommand::CheckoutBook { id, token, book_id } => {
                    tracing::info!(id, book_id, "Checking out book");
                    client.checkout(id, &token, book_id).await
                }
                ApiCommand::ReturnBook {
                    id,
                    token,
                    reservation_id,
                } => {
                    tracing::info!(id, reservation_id, "Returning book");
                    client.return_book(id, &token, reservation_id).await
                }
                ApiCommand::Shutdown => return,
            };
            tracing::info!(id = response.id(), "Request completed");
            let _ = response_tx.send(response);
        });
    }
}
